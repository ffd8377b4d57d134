use super::coercer::CoercedEvent;
use super::status::{Status, StatusClassifier};
use crate::feed::model::Event;
use chrono::{DateTime, Utc};
use std::str::FromStr;

/// Selection value that disables a filter
pub const ALL: &str = "all";

/// Filters chosen by whoever is viewing the events. `None` stands for [ALL].
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct FilterCriteria {
    pub measure_type: Option<String>,
    pub status: Option<Status>,
    pub search_term: String,
}

impl FilterCriteria {
    pub fn new(
        measure_type: &str,
        status: &str,
        search_term: &str,
    ) -> Result<Self, strum::ParseError> {
        let status = match status {
            ALL => None,
            status => Some(Status::from_str(status)?),
        };

        Ok(Self {
            measure_type: (measure_type != ALL).then(|| measure_type.to_string()),
            status,
            search_term: search_term.to_string(),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.measure_type.is_none() && self.status.is_none() && self.search_term.is_empty()
    }
}

/// Keeps the events matching every criteria, in their original order
pub fn filter<'a>(
    events: &[CoercedEvent<'a>],
    criteria: &FilterCriteria,
    classifier: &StatusClassifier,
    now: DateTime<Utc>,
) -> Vec<CoercedEvent<'a>> {
    let search_term = criteria.search_term.to_lowercase();

    events
        .iter()
        .filter(|event| matches_type(event.raw(), criteria.measure_type.as_deref()))
        .filter(|event| {
            criteria
                .status
                .map_or(true, |status| classifier.classify(event, now) == status)
        })
        .filter(|event| matches_search(event.raw(), &search_term))
        .copied()
        .collect()
}

fn matches_type(event: &Event, measure_type: Option<&str>) -> bool {
    match measure_type {
        None => true,
        Some(measure_type) => event.measure_type.as_deref() == Some(measure_type),
    }
}

/// `search_term` must already be lowercase
fn matches_search(event: &Event, search_term: &str) -> bool {
    if search_term.is_empty() {
        return true;
    }

    [&event.place, &event.who, &event.reason]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(search_term))
}
