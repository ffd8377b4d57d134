use crate::config::model::{Config, DebugConfig};
use crate::engine::filter::{FilterCriteria, ALL};
use crate::engine::status::{StatusClassifier, TimeAnchor, DEFAULT_ACTIVITY_WINDOW_HOURS};
use crate::feed::api::FeedSource;
use chrono::TimeDelta;
use std::env;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_REFRESH_INTERVAL_MINUTES: u64 = 5;
const MAX_ACTIVITY_WINDOW_HOURS: i64 = 24 * 7;

pub fn load_config() -> Config {
    let feed_source = FeedSource::parse(&load_required_config("FEED_URL"));
    let refresh_minutes =
        load_parsed_config("REFRESH_INTERVAL_MINUTES").unwrap_or(DEFAULT_REFRESH_INTERVAL_MINUTES);

    let window_hours =
        load_parsed_config("ACTIVITY_WINDOW_HOURS").unwrap_or(DEFAULT_ACTIVITY_WINDOW_HOURS);
    let anchor: TimeAnchor = load_parsed_config("STATUS_TIME_ANCHOR").unwrap_or_default();

    let criteria = load_criteria(
        &load_str_config("FILTER_TYPE", ALL),
        &load_str_config("FILTER_STATUS", ALL),
        &load_str_config("SEARCH_TERM", ""),
    );

    Config {
        debug_config: DebugConfig {
            run_once: load_bool_config("DEBUG_RUN_ONCE", false),
        },
        feed_source,
        refresh_interval: refresh_interval(refresh_minutes),
        classifier: StatusClassifier::new(activity_window(window_hours), anchor),
        criteria,
        loki_url: env::var("LOKI_URL").ok(),
    }
}

fn load_criteria(measure_type: &str, status: &str, search_term: &str) -> FilterCriteria {
    FilterCriteria::new(measure_type, status, search_term).unwrap_or_else(|_| {
        panic!(
            "Invalid config 'FILTER_STATUS'. Expected one of 'all', 'programado', 'activo' or 'finalizado'"
        )
    })
}

fn refresh_interval(minutes: u64) -> Duration {
    minutes
        .checked_mul(60)
        .filter(|_| minutes > 0)
        .map(Duration::from_secs)
        .unwrap_or_else(|| {
            panic!(
                "Invalid config 'REFRESH_INTERVAL_MINUTES'. Expected a number of minutes greater than 0, got {}",
                minutes
            )
        })
}

fn activity_window(hours: i64) -> TimeDelta {
    Some(hours)
        .filter(|hours| (1..=MAX_ACTIVITY_WINDOW_HOURS).contains(hours))
        .and_then(TimeDelta::try_hours)
        .unwrap_or_else(|| {
            panic!(
                "Invalid config 'ACTIVITY_WINDOW_HOURS'. Expected whole hours between 1 and {}, got {}",
                MAX_ACTIVITY_WINDOW_HOURS, hours
            )
        })
}

fn load_required_config(name: &str) -> String {
    env::var(name).unwrap_or_else(|_| panic!("{} must be set.", name))
}

fn load_str_config(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn load_bool_config(name: &str, default: bool) -> bool {
    env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .unwrap_or_else(|_| {
            panic!(
                "Invalid config '{}'. Expected either 'true' or 'false'",
                name
            )
        })
}

fn load_parsed_config<T: FromStr>(name: &str) -> Option<T> {
    match env::var(name) {
        Ok(value) => Some(
            value
                .parse()
                .unwrap_or_else(|_| panic!("Invalid config '{}': '{}'", name, value)),
        ),
        Err(_) => None,
    }
}
