use async_trait::async_trait;

use super::TrackEvent;

/// Pluggable sink for user-visible tracking events.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, event: &TrackEvent) -> anyhow::Result<()>;
}
