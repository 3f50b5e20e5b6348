use async_trait::async_trait;

use super::backend::Notifier;
use super::TrackEvent;

/// No-op notifier for testing.
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn notify(&self, _event: &TrackEvent) -> anyhow::Result<()> {
        Ok(())
    }
}
