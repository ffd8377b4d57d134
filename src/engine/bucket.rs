use super::coercer::{format_date, CoercedEvent};
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::America::Argentina::Buenos_Aires;
use chrono_tz::Tz;
use strum::IntoEnumIterator;
use tracing::warn;

/// Every day key is computed in this timezone
pub const REFERENCE_TIMEZONE: Tz = Buenos_Aires;

#[derive(
    strum::IntoStaticStr,
    strum::Display,
    strum::EnumIter,
    Debug,
    Copy,
    Clone,
    Ord,
    PartialOrd,
    Eq,
    PartialEq,
    Hash,
)]
#[strum(serialize_all = "lowercase")]
pub enum DayBucket {
    Ayer,
    Hoy,
    Manana,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BucketKeys {
    pub ayer: NaiveDate,
    pub hoy: NaiveDate,
    pub manana: NaiveDate,
}

impl BucketKeys {
    /// Yesterday, today and tomorrow as seen on a wall clock in Buenos Aires
    pub fn at(reference: DateTime<Utc>) -> Self {
        let hoy = reference.with_timezone(&REFERENCE_TIMEZONE).date_naive();

        Self {
            ayer: hoy.pred_opt().unwrap_or(hoy),
            hoy,
            manana: hoy.succ_opt().unwrap_or(hoy),
        }
    }

    pub fn date(&self, bucket: DayBucket) -> NaiveDate {
        match bucket {
            DayBucket::Ayer => self.ayer,
            DayBucket::Hoy => self.hoy,
            DayBucket::Manana => self.manana,
        }
    }

    /// `YYYY-MM-DD` form of the bucket's day
    pub fn key(&self, bucket: DayBucket) -> String {
        format_date(self.date(bucket))
    }

    /// `None` means the event falls outside the three day window
    pub fn assign(&self, event: &CoercedEvent) -> Option<DayBucket> {
        let mut matches = DayBucket::iter().filter(|bucket| self.date(*bucket) == event.date);
        let first = matches.next()?;

        if let Some(other) = matches.next() {
            warn!(
                "Date {} matches both '{}' and '{}', keeping '{}'",
                event.date_key(),
                first,
                other,
                first
            );
        }

        Some(first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::model::Event;
    use chrono::TimeZone;

    fn at(rfc3339: &str) -> BucketKeys {
        BucketKeys::at(
            DateTime::parse_from_rfc3339(rfc3339)
                .unwrap()
                .with_timezone(&Utc),
        )
    }

    fn dated(date: &str) -> Event {
        Event {
            date: Some(date.to_string()),
            ..Default::default()
        }
    }

    #[test_log::test]
    fn should_compute_keys_in_buenos_aires_time() {
        let keys = at("2025-03-05T15:00:00Z");

        assert_eq!(keys.key(DayBucket::Ayer), "2025-03-04");
        assert_eq!(keys.key(DayBucket::Hoy), "2025-03-05");
        assert_eq!(keys.key(DayBucket::Manana), "2025-03-06");
    }

    #[test_log::test]
    fn when_utc_already_rolled_over_should_still_be_local_today() {
        // 01:30 UTC is 22:30 of the previous day in Buenos Aires
        let keys = at("2025-03-06T01:30:00Z");

        assert_eq!(keys.key(DayBucket::Hoy), "2025-03-05");
    }

    #[test_log::test]
    fn should_roll_over_at_local_midnight() {
        let before = Buenos_Aires
            .with_ymd_and_hms(2025, 3, 5, 23, 59, 59)
            .unwrap()
            .with_timezone(&Utc);
        let after = Buenos_Aires
            .with_ymd_and_hms(2025, 3, 6, 0, 0, 0)
            .unwrap()
            .with_timezone(&Utc);

        assert_eq!(BucketKeys::at(before).key(DayBucket::Hoy), "2025-03-05");
        assert_eq!(BucketKeys::at(after).key(DayBucket::Hoy), "2025-03-06");
    }

    #[test_log::test]
    fn should_carry_across_month_and_year_boundaries() {
        let new_year = at("2025-01-01T12:00:00Z");

        assert_eq!(new_year.key(DayBucket::Ayer), "2024-12-31");

        let new_year_eve = at("2024-12-31T12:00:00Z");

        assert_eq!(new_year_eve.key(DayBucket::Manana), "2025-01-01");

        let leap = at("2024-02-28T12:00:00Z");

        assert_eq!(leap.key(DayBucket::Manana), "2024-02-29");
    }

    #[test_log::test]
    fn should_assign_each_event_to_its_bucket() {
        let keys = at("2025-03-05T15:00:00Z");

        for (date, expected) in [
            ("2025-03-04", DayBucket::Ayer),
            ("2025-03-05", DayBucket::Hoy),
            ("2025-03-06", DayBucket::Manana),
        ] {
            let raw = dated(date);

            assert_eq!(keys.assign(&CoercedEvent::from_event(&raw)), Some(expected));
        }
    }

    #[test_log::test]
    fn when_date_is_outside_the_window_should_not_be_assigned() {
        let keys = at("2025-03-05T15:00:00Z");

        for raw in [dated("2025-03-03"), dated("2025-03-07"), Event::default()] {
            assert_eq!(keys.assign(&CoercedEvent::from_event(&raw)), None);
        }
    }

    #[test_log::test]
    fn when_keys_collide_should_keep_first_bucket() {
        let day = NaiveDate::from_ymd_opt(2025, 3, 5).unwrap();
        let keys = BucketKeys {
            ayer: day,
            hoy: day,
            manana: day,
        };
        let raw = dated("2025-03-05");

        assert_eq!(
            keys.assign(&CoercedEvent::from_event(&raw)),
            Some(DayBucket::Ayer)
        );
    }

    #[test_log::test]
    fn bucket_names_should_match_the_tabs() {
        let names: Vec<&'static str> = DayBucket::iter().map(|bucket| bucket.into()).collect();

        assert_eq!(names, vec!["ayer", "hoy", "manana"]);
    }
}
