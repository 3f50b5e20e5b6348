use std::future::Future;
use std::time::Duration;

/// Cadence and ceiling for one polling session.
#[derive(Debug, Clone, Copy)]
pub struct PollConfig {
    /// Grace period before the first status check, so the backend has a
    /// chance to begin work.
    pub initial_delay: Duration,
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        // 60 attempts at 5s = a 5-minute ceiling.
        Self {
            initial_delay: Duration::from_secs(2),
            interval: Duration::from_secs(5),
            max_attempts: 60,
        }
    }
}

impl PollConfig {
    /// Derive the attempt cap from a wall-clock ceiling.
    pub fn from_timeout(interval: Duration, timeout: Duration) -> Self {
        let max_attempts = (timeout.as_secs() / interval.as_secs().max(1)).max(1) as u32;
        Self {
            interval,
            max_attempts,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome<T> {
    Completed(T),
    TimedOut { attempts: u32 },
}

/// Poll `fetch` until it yields a value or the attempt cap is reached.
///
/// `fetch` receives the 1-based attempt number and returns `Ok(None)` while
/// the job is still pending. `on_pending` fires after every empty response,
/// driving progress display. Ticks are strictly serialized: the next check is
/// only scheduled once the previous response has been handled, so a slow
/// response can never overlap the next tick. A fetch error aborts the loop
/// and propagates. Cancellation is dropping the returned future.
pub async fn poll_until<T, E, F, Fut>(
    config: PollConfig,
    mut fetch: F,
    mut on_pending: impl FnMut(u32),
) -> Result<PollOutcome<T>, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Option<T>, E>>,
{
    tokio::time::sleep(config.initial_delay).await;

    let mut attempts = 0u32;
    loop {
        attempts += 1;
        if attempts > config.max_attempts {
            return Ok(PollOutcome::TimedOut {
                attempts: config.max_attempts,
            });
        }

        if let Some(value) = fetch(attempts).await? {
            return Ok(PollOutcome::Completed(value));
        }

        on_pending(attempts);
        if attempts % 6 == 0 {
            tracing::info!(
                attempt = attempts,
                max_attempts = config.max_attempts,
                "Job still in progress"
            );
        } else {
            tracing::debug!(attempt = attempts, "Job still in progress");
        }

        tokio::time::sleep(config.interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast(max_attempts: u32) -> PollConfig {
        PollConfig {
            initial_delay: Duration::ZERO,
            interval: Duration::from_millis(1),
            max_attempts,
        }
    }

    #[tokio::test]
    async fn completes_once_fetch_yields() {
        let outcome: Result<_, std::convert::Infallible> = poll_until(
            fast(10),
            |attempt| async move { Ok((attempt == 3).then_some("done")) },
            |_| {},
        )
        .await;
        assert_eq!(outcome.unwrap(), PollOutcome::Completed("done"));
    }

    #[tokio::test]
    async fn times_out_at_the_attempt_cap() {
        let mut pending = Vec::new();
        let outcome: Result<PollOutcome<()>, std::convert::Infallible> =
            poll_until(fast(4), |_| async { Ok(None) }, |attempt| {
                pending.push(attempt)
            })
            .await;
        assert_eq!(outcome.unwrap(), PollOutcome::TimedOut { attempts: 4 });
        assert_eq!(pending, vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn fetch_error_aborts_the_loop() {
        let mut calls = 0;
        let outcome: Result<PollOutcome<()>, &str> = poll_until(
            fast(10),
            |_| {
                calls += 1;
                async { Err("boom") }
            },
            |_| {},
        )
        .await;
        assert_eq!(outcome.unwrap_err(), "boom");
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn pending_hook_not_called_on_completion() {
        let mut pending = Vec::new();
        let outcome: Result<_, std::convert::Infallible> = poll_until(
            fast(10),
            |attempt| async move { Ok((attempt == 4).then_some(())) },
            |attempt| pending.push(attempt),
        )
        .await;
        assert_eq!(outcome.unwrap(), PollOutcome::Completed(()));
        assert_eq!(pending, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn aborting_the_task_stops_polling() {
        use std::sync::atomic::{AtomicU32, Ordering};
        use std::sync::Arc;

        let calls = Arc::new(AtomicU32::new(0));
        let calls_in_task = Arc::clone(&calls);
        let task = tokio::spawn(async move {
            let _: Result<PollOutcome<()>, std::convert::Infallible> = poll_until(
                PollConfig {
                    initial_delay: Duration::ZERO,
                    interval: Duration::from_millis(5),
                    max_attempts: 1000,
                },
                move |_| {
                    calls_in_task.fetch_add(1, Ordering::SeqCst);
                    async { Ok(None) }
                },
                |_| {},
            )
            .await;
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        task.abort();
        tokio::time::sleep(Duration::from_millis(20)).await;

        let frozen = calls.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(calls.load(Ordering::SeqCst), frozen);
    }

    #[test]
    fn attempt_cap_derived_from_timeout() {
        let config =
            PollConfig::from_timeout(Duration::from_secs(5), Duration::from_secs(300));
        assert_eq!(config.max_attempts, 60);
        assert_eq!(config.interval, Duration::from_secs(5));
    }
}
