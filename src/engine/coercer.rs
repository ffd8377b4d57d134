use crate::feed::model::Event;
use chrono::{NaiveDate, NaiveTime};
use lazy_static::lazy_static;
use regex::Regex;

pub const EPOCH_DATE: &str = "1970-01-01";
pub const MIDNIGHT: &str = "00:00";
/// Sorts after every valid 24h time
pub const MISSING_TIME_SORT_KEY: &str = "99:99";
pub const NOT_SPECIFIED: &str = "No especificado";

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";

lazy_static! {
    static ref DATE_REGEX: Regex =
        Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("Failed to create date regex");
    static ref TIME_REGEX: Regex = Regex::new(r"^(\d{1,2}):(\d{2})(?::(\d{2}))?$")
        .expect("Failed to create time regex");
}

/// Read-only view of an [Event] with its date and time already resolved
#[derive(Debug, Clone, Copy)]
pub struct CoercedEvent<'a> {
    event: &'a Event,
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
}

impl<'a> CoercedEvent<'a> {
    pub fn from_event(event: &'a Event) -> Self {
        Self {
            event,
            date: event.date.as_deref().and_then(parse_date).unwrap_or(epoch()),
            time: event.time.as_deref().and_then(parse_time),
        }
    }

    pub fn raw(&self) -> &'a Event {
        self.event
    }

    pub fn start_time(&self) -> NaiveTime {
        self.time.unwrap_or(NaiveTime::MIN)
    }

    pub fn sort_key(&self) -> String {
        match self.time {
            Some(time) => time.format(TIME_FORMAT).to_string(),
            None => MISSING_TIME_SORT_KEY.to_string(),
        }
    }

    pub fn date_key(&self) -> String {
        format_date(self.date)
    }

    pub fn measure_type(&self) -> &'a str {
        or_not_specified(&self.event.measure_type)
    }

    pub fn description(&self) -> &'a str {
        self.event
            .description
            .as_deref()
            .or(self.event.what.as_deref())
            .unwrap_or(NOT_SPECIFIED)
    }

    pub fn place(&self) -> &'a str {
        or_not_specified(&self.event.place)
    }

    pub fn who(&self) -> &'a str {
        or_not_specified(&self.event.who)
    }

    pub fn reason(&self) -> &'a str {
        or_not_specified(&self.event.reason)
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn epoch() -> NaiveDate {
    NaiveDate::default()
}

fn or_not_specified(field: &Option<String>) -> &str {
    field.as_deref().unwrap_or(NOT_SPECIFIED)
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    if !DATE_REGEX.is_match(raw) {
        return None;
    }

    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
}

fn parse_time(raw: &str) -> Option<NaiveTime> {
    let captures = TIME_REGEX.captures(raw)?;
    let hour = captures[1].parse().ok()?;
    let minute = captures[2].parse().ok()?;
    let second: u32 = captures
        .get(3)
        .map_or(Some(0), |second| second.as_str().parse().ok())?;

    if second >= 60 {
        return None;
    }

    // Seconds are dropped so status and sort key read the same minute
    NaiveTime::from_hms_opt(hour, minute, 0)
}
