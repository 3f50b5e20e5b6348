use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use gridrank_common::ProcessingKeyword;
use gridrank_tracker::{ProcessingWatcher, WatchOutcome, WatcherConfig};

fn fast_config() -> WatcherConfig {
    WatcherConfig {
        interval: Duration::from_millis(2),
        max_consecutive_errors: 3,
    }
}

fn keywords(names: &[&str]) -> Vec<ProcessingKeyword> {
    names
        .iter()
        .map(|n| ProcessingKeyword {
            keyword: n.to_string(),
        })
        .collect()
}

#[tokio::test]
async fn watch_refreshes_once_when_the_set_drains() {
    let fetches = Arc::new(AtomicUsize::new(0));
    let refreshes = Arc::new(AtomicUsize::new(0));

    let mut watcher = ProcessingWatcher::new(fast_config());
    let fetch_count = Arc::clone(&fetches);
    let refresh_count = Arc::clone(&refreshes);

    let outcome = watcher
        .watch(
            None,
            move || {
                let n = fetch_count.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n == 0 {
                        Ok::<_, String>(keywords(&["pizza near me"]))
                    } else {
                        Ok(vec![])
                    }
                }
            },
            || {
                let refresh_count = Arc::clone(&refresh_count);
                async move {
                    refresh_count.fetch_add(1, Ordering::SeqCst);
                }
            },
        )
        .await;

    assert_eq!(outcome, WatchOutcome::Drained);
    assert_eq!(fetches.load(Ordering::SeqCst), 2);
    assert_eq!(refreshes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn watch_abandons_after_three_consecutive_errors() {
    let fetches = Arc::new(AtomicUsize::new(0));
    let refreshes = Arc::new(AtomicUsize::new(0));

    let mut watcher = ProcessingWatcher::new(fast_config());
    let fetch_count = Arc::clone(&fetches);
    let refresh_count = Arc::clone(&refreshes);

    let outcome = watcher
        .watch(
            None,
            move || {
                fetch_count.fetch_add(1, Ordering::SeqCst);
                async { Err::<Vec<ProcessingKeyword>, _>("connection refused".to_string()) }
            },
            || {
                let refresh_count = Arc::clone(&refresh_count);
                async move {
                    refresh_count.fetch_add(1, Ordering::SeqCst);
                }
            },
        )
        .await;

    assert_eq!(outcome, WatchOutcome::Abandoned);
    assert_eq!(fetches.load(Ordering::SeqCst), 3);
    assert_eq!(refreshes.load(Ordering::SeqCst), 0);
    assert!(watcher.processing().is_empty());
}

#[tokio::test]
async fn watch_stops_quietly_when_nothing_was_processing() {
    let refreshes = Arc::new(AtomicUsize::new(0));
    let refresh_count = Arc::clone(&refreshes);

    let mut watcher = ProcessingWatcher::new(fast_config());
    let outcome = watcher
        .watch(
            None,
            || async { Ok::<_, String>(vec![]) },
            || {
                let refresh_count = Arc::clone(&refresh_count);
                async move {
                    refresh_count.fetch_add(1, Ordering::SeqCst);
                }
            },
        )
        .await;

    assert_eq!(outcome, WatchOutcome::Idle);
    assert_eq!(refreshes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn hidden_visibility_suspends_ticks_until_visible() {
    let fetches = Arc::new(AtomicUsize::new(0));
    let fetch_count = Arc::clone(&fetches);

    let (tx, rx) = watch::channel(false);
    let handle = tokio::spawn(async move {
        let mut watcher = ProcessingWatcher::new(fast_config());
        watcher
            .watch(
                Some(rx),
                move || {
                    fetch_count.fetch_add(1, Ordering::SeqCst);
                    async { Ok::<_, String>(vec![]) }
                },
                || async {},
            )
            .await
    });

    // Hidden: no status checks at all.
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert_eq!(fetches.load(Ordering::SeqCst), 0);

    tx.send(true).expect("watcher should still be listening");
    let outcome = handle.await.expect("watcher task panicked");
    assert_eq!(outcome, WatchOutcome::Idle);
    assert_eq!(fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn losing_the_visibility_source_while_hidden_detaches() {
    let (tx, rx) = watch::channel(false);
    let handle = tokio::spawn(async move {
        let mut watcher = ProcessingWatcher::new(fast_config());
        watcher
            .watch(Some(rx), || async { Ok::<_, String>(vec![]) }, || async {})
            .await
    });

    tokio::time::sleep(Duration::from_millis(10)).await;
    drop(tx);

    let outcome = handle.await.expect("watcher task panicked");
    assert_eq!(outcome, WatchOutcome::Detached);
}
