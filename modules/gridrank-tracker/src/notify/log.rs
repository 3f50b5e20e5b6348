use async_trait::async_trait;
use tracing::{info, warn};

use super::backend::Notifier;
use super::TrackEvent;

/// Structured-log notifier; the headless stand-in for the UI's toasts.
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn notify(&self, event: &TrackEvent) -> anyhow::Result<()> {
        match event {
            TrackEvent::CheckFailed { .. } | TrackEvent::CheckTimedOut { .. } => {
                warn!("{event}");
            }
            _ => info!("{event}"),
        }
        Ok(())
    }
}
