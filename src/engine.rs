pub mod bucket;
pub mod category;
pub mod coercer;
pub mod filter;
pub mod sort;
pub mod sources;
pub mod status;

use crate::feed::model::Event;
use bucket::{BucketKeys, DayBucket};
use category::MeasureCategory;
use chrono::{DateTime, Utc};
use coercer::CoercedEvent;
use filter::FilterCriteria;
use itertools::Itertools;
use sort::{sort_by_time, Timed};
use sources::{parse_sources, SourceLink};
use status::{Status, StatusClassifier};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use strum::IntoEnumIterator;
use tracing::debug;

const MISSING_TIME_DISPLAY: &str = "N/A";

/// An event ready to be shown, nothing is left to compute
#[derive(Debug, Clone)]
pub struct ClassifiedEvent<'a> {
    pub event: CoercedEvent<'a>,
    pub status: Status,
    pub category: MeasureCategory,
    pub sources: Vec<SourceLink>,
}

impl<'a> ClassifiedEvent<'a> {
    pub fn new(event: CoercedEvent<'a>, classifier: &StatusClassifier, now: DateTime<Utc>) -> Self {
        let raw = event.raw();

        Self {
            status: classifier.classify(&event, now),
            category: MeasureCategory::of(raw.measure_type.as_deref()),
            sources: parse_sources(raw.sources.as_deref()),
            event,
        }
    }
}

impl Timed for ClassifiedEvent<'_> {
    fn sort_key(&self) -> String {
        self.event.sort_key()
    }
}

impl Display for ClassifiedEvent<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let time = match self.event.time {
            Some(_) => self.event.sort_key(),
            None => MISSING_TIME_DISPLAY.to_string(),
        };
        let category: &'static str = self.category.into();

        write!(
            f,
            "{} | {} ({}) | {} | {} | {} | {} | {} | {}",
            time,
            self.event.measure_type(),
            category,
            self.event.description(),
            self.event.place(),
            self.event.who(),
            self.event.reason(),
            self.status.label(),
            self.sources.iter().join(" ")
        )
    }
}

/// Counters over every event of today, filters don't apply
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct TodaySummary {
    pub total: usize,
    pub active: usize,
}

pub fn summarize(
    events: &[CoercedEvent],
    classifier: &StatusClassifier,
    now: DateTime<Utc>,
) -> TodaySummary {
    TodaySummary {
        total: events.len(),
        active: events
            .iter()
            .filter(|event| classifier.classify(event, now) == Status::Active)
            .count(),
    }
}

#[derive(Debug)]
pub struct DayViews<'a> {
    pub keys: BucketKeys,
    pub today: TodaySummary,
    views: BTreeMap<DayBucket, Vec<ClassifiedEvent<'a>>>,
}

impl<'a> DayViews<'a> {
    pub fn get(&self, bucket: DayBucket) -> &[ClassifiedEvent<'a>] {
        self.views.get(&bucket).map(Vec::as_slice).unwrap_or_default()
    }

    /// Ayer, hoy and manana, in that order
    pub fn iter(&self) -> impl Iterator<Item = (DayBucket, &[ClassifiedEvent<'a>])> {
        DayBucket::iter().map(|bucket| (bucket, self.get(bucket)))
    }
}

/// One full pass over the feed: bucket, filter, sort and annotate.
/// Keys are computed from `now` every time, so a pass after midnight sees a new day.
pub fn build_day_views<'a>(
    events: &'a [Event],
    criteria: &FilterCriteria,
    classifier: &StatusClassifier,
    now: DateTime<Utc>,
) -> DayViews<'a> {
    let keys = BucketKeys::at(now);
    let mut buckets: BTreeMap<DayBucket, Vec<CoercedEvent<'a>>> =
        DayBucket::iter().map(|bucket| (bucket, Vec::new())).collect();
    let mut outside_window = 0;

    for event in events.iter().map(CoercedEvent::from_event) {
        match keys.assign(&event) {
            Some(bucket) => buckets.entry(bucket).or_default().push(event),
            None => outside_window += 1,
        }
    }

    debug!(
        "{} of {} events are outside {} .. {}",
        outside_window,
        events.len(),
        keys.key(DayBucket::Ayer),
        keys.key(DayBucket::Manana)
    );

    let today = buckets
        .get(&DayBucket::Hoy)
        .map(|events| summarize(events, classifier, now))
        .unwrap_or_default();

    let views = buckets
        .into_iter()
        .map(|(bucket, events)| {
            let classified = filter::filter(&events, criteria, classifier, now)
                .into_iter()
                .map(|event| ClassifiedEvent::new(event, classifier, now))
                .collect();

            (bucket, sort_by_time(classified))
        })
        .collect();

    DayViews { keys, today, views }
}
