use chrono::{DateTime, FixedOffset};

#[derive(Debug, Clone, Default)]
pub struct Feed {
    /// Only used for display
    pub last_updated: Option<DateTime<FixedOffset>>,
    pub events: Vec<Event>,
}

/// Raw measure as published by the feed. Every field may be missing,
/// so nothing here is trusted until it goes through the coercer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Event {
    pub date: Option<String>,
    pub time: Option<String>,
    pub measure_type: Option<String>,
    pub description: Option<String>,
    pub what: Option<String>,
    pub place: Option<String>,
    pub who: Option<String>,
    pub reason: Option<String>,
    /// Comma separated URLs
    pub sources: Option<String>,
}
