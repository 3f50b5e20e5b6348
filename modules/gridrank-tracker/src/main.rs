use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use gridrank_client::{RankApiClient, RankCheckRequest};
use gridrank_common::{AppConfig, GridSpec, Target};
use gridrank_tracker::{
    CheckOutcome, PollConfig, ProcessingWatcher, RankTracker, TracingNotifier, TrackerConfig,
    WatcherConfig,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("gridrank_tracker=info".parse()?)
                .add_directive("gridrank_client=info".parse()?)
                .add_directive("gridrank_common=info".parse()?),
        )
        .init();

    info!("Grid rank tracker starting...");

    let config = AppConfig::from_env()?;
    let listing_id = config
        .listing_id
        .ok_or_else(|| anyhow::anyhow!("GRIDRANK_LISTING_ID environment variable is required"))?;
    if config.keywords.is_empty() {
        anyhow::bail!("GRIDRANK_KEYWORDS must name at least one keyword");
    }

    let target = Target::Listing(listing_id);
    let client = Arc::new(RankApiClient::new(
        &config.api_base_url,
        config.api_key.clone(),
    ));

    // Seed the check with the listing's geocoded center.
    let center = client.get_default_coordinates(target).await?;
    info!(lat = center.lat, lng = center.lng, "Resolved default coordinates");

    let request = RankCheckRequest::builder()
        .target(target)
        .keywords(config.keywords.clone())
        .grid(GridSpec {
            size: 5,
            distance_km: 1.0,
        })
        .coordinates(Some(center))
        .language(config.language.clone())
        .build();

    let interval = Duration::from_secs(config.poll_interval_secs.unwrap_or(5));
    let timeout = Duration::from_secs(config.poll_timeout_secs.unwrap_or(300));
    let tracker_config = TrackerConfig {
        poll: PollConfig::from_timeout(interval, timeout),
        ..TrackerConfig::default()
    };
    let tracker =
        RankTracker::new(Arc::clone(&client), Arc::new(TracingNotifier)).with_config(tracker_config);

    match tracker.check_rank(request).await? {
        CheckOutcome::Completed(report) => {
            info!(
                keyword_id = report.keyword_id,
                date_id = ?report.selected_date.as_ref().map(|d| d.id),
                rank_points = report.details.rank_points.len(),
                credits = report.keywords.credits,
                "Check complete"
            );
        }
        CheckOutcome::AlreadyQueued => {
            // No job id to poll; fall back to the listing-wide watcher.
            let watcher_config = WatcherConfig {
                interval: Duration::from_secs(config.watch_interval_secs.unwrap_or(5)),
                ..WatcherConfig::default()
            };
            let mut watcher = ProcessingWatcher::new(watcher_config);
            let fetch_client = Arc::clone(&client);
            let refresh_client = Arc::clone(&client);
            let outcome = watcher
                .watch(
                    None,
                    move || {
                        let client = Arc::clone(&fetch_client);
                        async move { client.check_status(target).await }
                    },
                    move || async move {
                        match refresh_client.get_keywords(target).await {
                            Ok(list) => {
                                info!(keywords = list.keywords.len(), "Keyword list refreshed")
                            }
                            Err(e) => warn!(error = %e, "Failed to refresh keyword list"),
                        }
                    },
                )
                .await;
            info!(?outcome, "Watcher finished");
        }
        CheckOutcome::TimedOut { attempts } => {
            warn!(attempts, "Check did not finish in time");
        }
    }

    Ok(())
}
