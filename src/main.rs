use chrono::Utc;
use monitorprotestas::config::env_loader::load_config;
use monitorprotestas::config::model::Config;
use monitorprotestas::engine::bucket::REFERENCE_TIMEZONE;
use monitorprotestas::engine::build_day_views;
use monitorprotestas::feed::api::FeedAPI;
use monitorprotestas::tracing::{setup_loki, shutdown_loki};
use tracing::{error, info};

const LAST_UPDATED_FORMAT: &str = "%d/%m/%Y %H:%M";

#[tokio::main]
async fn main() {
    let config = load_config();
    let loki = setup_loki(config.loki_url.as_deref()).await;

    info!(
        "Watching {} every {} minutes",
        config.feed_source,
        config.refresh_interval.as_secs() / 60
    );

    let mut interval = tokio::time::interval(config.refresh_interval);

    loop {
        tokio::select! {
            _ = interval.tick() => refresh(&config).await,
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        }

        if config.debug_config.run_once {
            break;
        }
    }

    shutdown_loki(loki).await;
}

#[tracing::instrument(skip(config))]
async fn refresh(config: &Config) {
    let feed = match FeedAPI::get_feed(&config.feed_source).await {
        Ok(feed) => feed,
        Err(err) if err.is_unavailable() => {
            error!("Feed unavailable: {}", err);
            return;
        }
        Err(err) => {
            error!("Feed is broken: {}", err);
            return;
        }
    };

    if let Some(last_updated) = feed.last_updated {
        info!(
            "Feed last updated at {}",
            last_updated
                .with_timezone(&REFERENCE_TIMEZONE)
                .format(LAST_UPDATED_FORMAT)
        );
    }

    let views = build_day_views(
        &feed.events,
        &config.criteria,
        &config.classifier,
        Utc::now(),
    );

    info!(
        "Today there are {} events, {} in progress",
        views.today.total, views.today.active
    );

    for (bucket, events) in views.iter() {
        info!(
            "{} ({}): {} events",
            bucket,
            views.keys.key(bucket),
            events.len()
        );

        for event in events {
            info!("  {}", event);
        }
    }
}
