use super::bucket::REFERENCE_TIMEZONE;
use super::coercer::CoercedEvent;
use chrono::{DateTime, TimeDelta, TimeZone, Utc};

pub const DEFAULT_ACTIVITY_WINDOW_HOURS: i64 = 4;

/// Filter values are the `programado`/`activo`/`finalizado` vocabulary
#[derive(
    strum::IntoStaticStr,
    strum::EnumString,
    strum::Display,
    Debug,
    Copy,
    Clone,
    Eq,
    PartialEq,
    Hash,
)]
pub enum Status {
    #[strum(serialize = "programado")]
    Scheduled,
    #[strum(serialize = "activo")]
    Active,
    #[strum(serialize = "finalizado")]
    Finished,
}

impl Status {
    pub fn label(&self) -> &'static str {
        match self {
            Status::Scheduled => "Programada",
            Status::Active => "En desarrollo",
            Status::Finished => "Finalizada",
        }
    }
}

/// How the wall-clock `fecha` + `horario` of an event becomes an instant
#[derive(strum::EnumString, strum::Display, Debug, Copy, Clone, Default, Eq, PartialEq)]
#[strum(serialize_all = "snake_case")]
pub enum TimeAnchor {
    /// Fields read as UTC, which is what the published dashboards do
    #[default]
    Utc,
    /// Fields read in the same timezone as the day buckets
    BuenosAires,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct StatusClassifier {
    pub window: TimeDelta,
    pub anchor: TimeAnchor,
}

impl Default for StatusClassifier {
    fn default() -> Self {
        Self {
            window: TimeDelta::hours(DEFAULT_ACTIVITY_WINDOW_HOURS),
            anchor: TimeAnchor::default(),
        }
    }
}

impl StatusClassifier {
    pub fn new(window: TimeDelta, anchor: TimeAnchor) -> Self {
        Self { window, anchor }
    }

    pub fn start_instant(&self, event: &CoercedEvent) -> DateTime<Utc> {
        let wall_clock = event.date.and_time(event.start_time());

        match self.anchor {
            TimeAnchor::Utc => wall_clock.and_utc(),
            TimeAnchor::BuenosAires => REFERENCE_TIMEZONE
                .from_local_datetime(&wall_clock)
                .earliest()
                .map(|local| local.with_timezone(&Utc))
                .unwrap_or_else(|| wall_clock.and_utc()),
        }
    }

    /// The activity window is closed: both `start` and `start + window` are active
    pub fn classify(&self, event: &CoercedEvent, now: DateTime<Utc>) -> Status {
        let start = self.start_instant(event);
        let end = start + self.window;

        if now > end {
            Status::Finished
        } else if now >= start {
            Status::Active
        } else {
            Status::Scheduled
        }
    }
}
