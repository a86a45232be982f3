//! Tests for the periodic report loop, using tokio's paused clock.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use riak_reporter::{
    AcceptAll, KeyValueStore, MetricFilter, MetricRegistry, ReporterError, Result, RiakReporter,
    ScheduledReporter, Snapshots,
};

/// Counts puts and optionally fails all of them.
#[derive(Default)]
struct CountingStore {
    puts: AtomicUsize,
    fail: bool,
}

#[async_trait]
impl KeyValueStore for CountingStore {
    fn namespace(&self) -> &str {
        "metrics"
    }

    async fn put(&self, key: &str, _document: &str) -> Result<()> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ReporterError::StorageWrite {
                key: key.to_string(),
                message: "down".to_string(),
            });
        }
        Ok(())
    }
}

async fn reporter(store: Arc<CountingStore>) -> Arc<RiakReporter> {
    let registry = MetricRegistry::new();
    registry.counter("requests").unwrap().inc();

    Arc::new(
        RiakReporter::for_registry(registry)
            .store(store)
            .build()
            .await
            .unwrap(),
    )
}

#[tokio::test(start_paused = true)]
async fn reports_every_period_and_once_more_on_stop() {
    let store = Arc::new(CountingStore::default());
    let handle = reporter(store.clone())
        .await
        .start(Duration::from_secs(10))
        .unwrap();

    // Ticks at 0s, 10s, 20s and 30s.
    tokio::time::sleep(Duration::from_secs(35)).await;
    assert_eq!(store.puts.load(Ordering::SeqCst), 4);

    handle.stop().await;
    assert_eq!(store.puts.load(Ordering::SeqCst), 5);
}

#[tokio::test(start_paused = true)]
async fn failing_store_does_not_stop_the_schedule() {
    let store = Arc::new(CountingStore {
        puts: AtomicUsize::new(0),
        fail: true,
    });
    let handle = reporter(store.clone())
        .await
        .start(Duration::from_secs(1))
        .unwrap();

    tokio::time::sleep(Duration::from_millis(5500)).await;
    assert!(!handle.is_finished());
    assert_eq!(store.puts.load(Ordering::SeqCst), 6);

    handle.stop().await;
}

#[tokio::test(start_paused = true)]
async fn panicking_gauge_only_drops_itself() {
    let store = Arc::new(CountingStore::default());
    let gauge_calls = Arc::new(AtomicUsize::new(0));

    let registry = MetricRegistry::new();
    registry.counter("requests").unwrap().inc();
    let calls = gauge_calls.clone();
    registry
        .gauge("queue.depth", move || -> i64 {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                panic!("queue not initialised");
            }
            3
        })
        .unwrap();

    let reporter = RiakReporter::for_registry(registry)
        .store(store.clone())
        .build()
        .await
        .unwrap();
    let handle = Arc::new(reporter).start(Duration::from_secs(1)).unwrap();

    // Six ticks: the first writes only the counter, the rest write both.
    tokio::time::sleep(Duration::from_millis(5500)).await;
    assert!(!handle.is_finished());
    assert_eq!(gauge_calls.load(Ordering::SeqCst), 6);
    assert_eq!(store.puts.load(Ordering::SeqCst), 11);

    handle.stop().await;
}

/// Panics on its first cycle, counts every cycle.
#[derive(Default)]
struct FlakyReporter {
    cycles: AtomicUsize,
}

#[async_trait]
impl ScheduledReporter for FlakyReporter {
    fn name(&self) -> &str {
        "flaky"
    }

    fn registry(&self) -> Option<&MetricRegistry> {
        None
    }

    fn filter(&self) -> &dyn MetricFilter {
        &AcceptAll
    }

    async fn report_snapshots(&self, _snapshots: &Snapshots) {
        if self.cycles.fetch_add(1, Ordering::SeqCst) == 0 {
            panic!("first cycle blew up");
        }
    }
}

#[tokio::test(start_paused = true)]
async fn panicking_cycle_does_not_stop_the_schedule() {
    let reporter = Arc::new(FlakyReporter::default());
    let handle = reporter.clone().start(Duration::from_secs(1)).unwrap();

    tokio::time::sleep(Duration::from_millis(2500)).await;
    assert!(!handle.is_finished());
    assert_eq!(reporter.cycles.load(Ordering::SeqCst), 3);

    handle.stop().await;
    assert_eq!(reporter.cycles.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn zero_period_is_rejected() {
    let store = Arc::new(CountingStore::default());
    let err = reporter(store).await.start(Duration::ZERO).unwrap_err();
    assert!(matches!(err, ReporterError::Configuration(_)));
}
