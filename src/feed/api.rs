use super::{dto::parse_feed, model::Feed};
use chrono::Utc;
use lazy_static::lazy_static;
use reqwest::{Client, StatusCode};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::policies::ExponentialBackoff;
use reqwest_retry::RetryTransientMiddleware;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, error, info};
use url::Url;

const CACHE_BUST_PARAM: &str = "cachebust";
const MAX_RETRIES: u32 = 5;

lazy_static! {
    static ref REST_CLIENT: ClientWithMiddleware = ClientBuilder::new(Client::new())
        .with(RetryTransientMiddleware::new_with_policy(
            ExponentialBackoff::builder().build_with_max_retries(MAX_RETRIES)
        ))
        .build();
}

/// Where the `protests.json` document lives
#[derive(Debug, Clone, PartialEq)]
pub enum FeedSource {
    Http(Url),
    File(PathBuf),
}

impl FeedSource {
    /// Anything that isn't an http(s) URL is taken as a local path
    pub fn parse(location: &str) -> Self {
        match Url::parse(location) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => FeedSource::Http(url),
            _ => FeedSource::File(PathBuf::from(location)),
        }
    }
}

impl Display for FeedSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedSource::Http(url) => write!(f, "{}", url),
            FeedSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

pub struct FeedAPI;

impl FeedAPI {
    #[tracing::instrument(skip(source), fields(source = %source))]
    pub async fn get_feed(source: &FeedSource) -> Result<Feed, FeedError> {
        let body = match source {
            FeedSource::Http(url) => Self::download(url).await?,
            FeedSource::File(path) => tokio::fs::read_to_string(path).await?,
        };

        match parse_feed(&body) {
            Ok(feed) => {
                info!("Got {} events", feed.events.len());

                Ok(feed)
            }
            Err(e) => {
                error!("Feed parse failed: {:?}", e);
                Err(FeedError::InvalidResponse(e))
            }
        }
    }

    async fn download(url: &Url) -> Result<String, FeedError> {
        let url = cache_busted(url, Utc::now().timestamp_millis());

        debug!("Requesting {}", url);

        let response = REST_CLIENT.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(FeedError::Status(status));
        }

        Ok(response.text().await?)
    }
}

/// Intermediate caches would otherwise keep serving a stale feed
fn cache_busted(url: &Url, millis: i64) -> Url {
    let mut url = url.clone();

    url.query_pairs_mut()
        .append_pair(CACHE_BUST_PARAM, &millis.to_string());
    url
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest_middleware::Error),
    #[error("response body could not be read: {0}")]
    Body(#[from] reqwest::Error),
    #[error("server answered with {0}")]
    Status(StatusCode),
    #[error("feed file could not be read: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid feed document: {0}")]
    InvalidResponse(#[from] serde_json::Error),
}

impl FeedError {
    /// The feed could not be reached at all, as opposed to being reachable but broken
    pub fn is_unavailable(&self) -> bool {
        !matches!(self, FeedError::InvalidResponse(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn should_treat_http_locations_as_urls() {
        let source = FeedSource::parse("https://example.org/protests.json");

        assert_eq!(
            source,
            FeedSource::Http(Url::parse("https://example.org/protests.json").unwrap())
        );
    }

    #[test_log::test]
    fn should_treat_anything_else_as_a_file() {
        assert_eq!(
            FeedSource::parse("protests.json"),
            FeedSource::File(PathBuf::from("protests.json"))
        );
        assert_eq!(
            FeedSource::parse("/var/www/protests.json"),
            FeedSource::File(PathBuf::from("/var/www/protests.json"))
        );
    }

    #[test_log::test]
    fn should_append_cache_bust_keeping_existing_query() {
        let url = Url::parse("https://example.org/protests.json?v=2").unwrap();

        assert_eq!(
            cache_busted(&url, 1741180542000).as_str(),
            "https://example.org/protests.json?v=2&cachebust=1741180542000"
        );
    }

    #[test_log::test]
    fn only_parse_failures_should_not_count_as_unavailable() {
        let io = FeedError::Io(std::io::Error::from(std::io::ErrorKind::NotFound));
        let invalid = FeedError::InvalidResponse(serde_json::from_str::<u8>("x").unwrap_err());

        assert!(io.is_unavailable());
        assert!(FeedError::Status(StatusCode::NOT_FOUND).is_unavailable());
        assert!(!invalid.is_unavailable());
    }
}
