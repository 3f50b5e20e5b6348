use std::collections::HashSet;
use std::fmt;
use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, warn};

use gridrank_common::ProcessingKeyword;

#[derive(Debug, Clone, Copy)]
pub struct WatcherConfig {
    pub interval: Duration,
    /// Failures tolerated back-to-back before the watcher gives up.
    pub max_consecutive_errors: u32,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_consecutive_errors: 3,
        }
    }
}

/// Decision after one status observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatcherAction {
    /// Keywords still processing; poll again after the interval.
    Continue,
    /// Nothing processing and nothing was; no polling needed.
    Idle,
    /// The processing set just drained; refresh the keyword list once and stop.
    RefreshAndStop,
    /// Too many consecutive failures; stop rather than poll a broken
    /// connection forever.
    Abandon,
}

/// How a watch loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchOutcome {
    /// The processing set drained and the refresh callback has run.
    Drained,
    /// Nothing was processing on the first check.
    Idle,
    /// Gave up after repeated status-check failures; the set is cleared.
    Abandoned,
    /// The visibility source went away while the page was hidden.
    Detached,
}

/// Background watcher over the backend's "which keywords are still
/// computing" set. Independent of any single job: it recovers UI state after
/// a reload and surfaces completions submitted without a pollable job id.
/// The watcher exclusively owns the set; consumers read snapshots.
pub struct ProcessingWatcher {
    config: WatcherConfig,
    processing: HashSet<String>,
    was_processing: bool,
    consecutive_errors: u32,
}

impl ProcessingWatcher {
    pub fn new(config: WatcherConfig) -> Self {
        Self {
            config,
            processing: HashSet::new(),
            was_processing: false,
            consecutive_errors: 0,
        }
    }

    pub fn processing(&self) -> &HashSet<String> {
        &self.processing
    }

    pub fn is_processing(&self, keyword: &str) -> bool {
        self.processing.contains(keyword)
    }

    /// Fold one status response into the watcher state. The set is replaced
    /// wholesale on every tick, never patched.
    pub fn observe<E: fmt::Display>(
        &mut self,
        result: Result<Vec<ProcessingKeyword>, E>,
    ) -> WatcherAction {
        match result {
            Ok(keywords) => {
                self.consecutive_errors = 0;
                self.processing = keywords.into_iter().map(|k| k.keyword).collect();

                if self.processing.is_empty() {
                    if self.was_processing {
                        self.was_processing = false;
                        debug!("Processing set drained");
                        WatcherAction::RefreshAndStop
                    } else {
                        WatcherAction::Idle
                    }
                } else {
                    self.was_processing = true;
                    debug!(count = self.processing.len(), "Keywords still processing");
                    WatcherAction::Continue
                }
            }
            Err(e) => {
                self.consecutive_errors += 1;
                warn!(
                    error = %e,
                    strikes = self.consecutive_errors,
                    "Keyword status check failed"
                );
                if self.consecutive_errors >= self.config.max_consecutive_errors {
                    self.processing.clear();
                    self.was_processing = false;
                    WatcherAction::Abandon
                } else {
                    WatcherAction::Continue
                }
            }
        }
    }

    /// Drive the watcher: first check immediate, then one check per interval.
    /// While `visibility` reads false, ticks are suspended; flipping back to
    /// true resumes them. When the set drains after a busy stretch,
    /// `on_refresh` runs exactly once and the loop stops.
    pub async fn watch<F, Fut, E, R, RFut>(
        &mut self,
        mut visibility: Option<watch::Receiver<bool>>,
        mut fetch: F,
        on_refresh: R,
    ) -> WatchOutcome
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Vec<ProcessingKeyword>, E>>,
        E: fmt::Display,
        R: FnOnce() -> RFut,
        RFut: Future<Output = ()>,
    {
        loop {
            if let Some(rx) = visibility.as_mut() {
                while !*rx.borrow() {
                    if rx.changed().await.is_err() {
                        return WatchOutcome::Detached;
                    }
                }
            }

            match self.observe(fetch().await) {
                WatcherAction::Continue => tokio::time::sleep(self.config.interval).await,
                WatcherAction::Idle => return WatchOutcome::Idle,
                WatcherAction::RefreshAndStop => {
                    on_refresh().await;
                    return WatchOutcome::Drained;
                }
                WatcherAction::Abandon => return WatchOutcome::Abandoned,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords(names: &[&str]) -> Vec<ProcessingKeyword> {
        names
            .iter()
            .map(|n| ProcessingKeyword {
                keyword: n.to_string(),
            })
            .collect()
    }

    fn ok(names: &[&str]) -> Result<Vec<ProcessingKeyword>, String> {
        Ok(keywords(names))
    }

    fn err() -> Result<Vec<ProcessingKeyword>, String> {
        Err("connection refused".to_string())
    }

    #[test]
    fn set_mirrors_the_response_exactly() {
        let mut watcher = ProcessingWatcher::new(WatcherConfig::default());
        watcher.observe(ok(&["pizza near me", "coffee shop"]));

        let expected: HashSet<String> = ["coffee shop", "pizza near me"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(watcher.processing(), &expected);

        // Next tick replaces the set wholesale.
        watcher.observe(ok(&["coffee shop"]));
        assert!(watcher.is_processing("coffee shop"));
        assert!(!watcher.is_processing("pizza near me"));
    }

    #[test]
    fn empty_on_first_check_means_idle() {
        let mut watcher = ProcessingWatcher::new(WatcherConfig::default());
        assert_eq!(watcher.observe(ok(&[])), WatcherAction::Idle);
        assert_eq!(watcher.observe(ok(&[])), WatcherAction::Idle);
    }

    #[test]
    fn drain_transition_requests_one_refresh_then_idles() {
        let mut watcher = ProcessingWatcher::new(WatcherConfig::default());
        assert_eq!(watcher.observe(ok(&["pizza"])), WatcherAction::Continue);
        assert_eq!(watcher.observe(ok(&[])), WatcherAction::RefreshAndStop);
        // A later empty tick is no longer a transition.
        assert_eq!(watcher.observe(ok(&[])), WatcherAction::Idle);
    }

    #[test]
    fn three_consecutive_errors_abandon_and_clear() {
        let mut watcher = ProcessingWatcher::new(WatcherConfig::default());
        watcher.observe(ok(&["pizza"]));

        assert_eq!(watcher.observe(err()), WatcherAction::Continue);
        assert_eq!(watcher.observe(err()), WatcherAction::Continue);
        assert_eq!(watcher.observe(err()), WatcherAction::Abandon);
        assert!(watcher.processing().is_empty());
    }

    #[test]
    fn a_success_resets_the_strike_counter() {
        let mut watcher = ProcessingWatcher::new(WatcherConfig::default());
        watcher.observe(ok(&["pizza"]));

        watcher.observe(err());
        watcher.observe(err());
        assert_eq!(watcher.observe(ok(&["pizza"])), WatcherAction::Continue);
        watcher.observe(err());
        assert_eq!(watcher.observe(err()), WatcherAction::Continue);
    }
}
