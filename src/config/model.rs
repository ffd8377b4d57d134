use crate::engine::filter::FilterCriteria;
use crate::engine::status::StatusClassifier;
use crate::feed::api::FeedSource;
use std::time::Duration;

#[derive(Debug)]
pub struct Config {
    pub debug_config: DebugConfig,
    pub feed_source: FeedSource,
    pub refresh_interval: Duration,
    pub classifier: StatusClassifier,
    pub criteria: FilterCriteria,
    pub loki_url: Option<String>,
}

#[derive(Debug)]
pub struct DebugConfig {
    pub run_once: bool,
}
