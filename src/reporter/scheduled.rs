//! The scheduled-reporter contract and its timer loop.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::metric::{MetricFilter, MetricRegistry, Snapshots};
use crate::{ReporterError, Result};

/// A reporter driven by a timer.
///
/// Implementors provide [`report_snapshots`](Self::report_snapshots); the
/// trait supplies registry polling and the periodic loop. A report never
/// fails from the caller's point of view: implementations deal with
/// per-metric errors themselves so one bad cycle cannot stop later ones.
#[async_trait]
pub trait ScheduledReporter: Send + Sync + 'static {
    /// Name used in log lines.
    fn name(&self) -> &str;

    /// The registry polled by [`report`](Self::report), if any.
    fn registry(&self) -> Option<&MetricRegistry>;

    /// Filter applied when snapshotting the registry.
    fn filter(&self) -> &dyn MetricFilter;

    /// Export one set of snapshots.
    async fn report_snapshots(&self, snapshots: &Snapshots);

    /// Snapshot the registry through the filter and export it.
    ///
    /// Without a registry this reports an empty set.
    async fn report(&self) {
        let snapshots = match self.registry() {
            Some(registry) => registry.snapshot(self.filter()),
            None => Snapshots::new(),
        };
        self.report_snapshots(&snapshots).await;
    }

    /// Report every `period`, starting immediately, on the current tokio runtime.
    ///
    /// Reports run one after another on a single task; a slow cycle delays
    /// the next tick instead of overlapping it.
    fn start(self: Arc<Self>, period: Duration) -> Result<ReporterHandle>
    where
        Self: Sized,
    {
        if period.is_zero() {
            return Err(ReporterError::Configuration(
                "report period must be greater than zero".to_string(),
            ));
        }

        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let reporter = self;
        let task = tokio::spawn(async move {
            info!(reporter = reporter.name(), ?period, "reporter started");
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => run_cycle(&reporter).await,
                    _ = &mut stop_rx => break,
                }
            }

            // Final cycle so the last interval's values are not lost.
            run_cycle(&reporter).await;
            info!(reporter = reporter.name(), "reporter stopped");
        });

        Ok(ReporterHandle {
            stop_tx: Some(stop_tx),
            task,
        })
    }
}

/// Run one report on its own task so a panic ends only that cycle.
async fn run_cycle<R: ScheduledReporter>(reporter: &Arc<R>) {
    let reporter = Arc::clone(reporter);
    let name = reporter.name().to_string();
    if let Err(e) = tokio::spawn(async move { reporter.report().await }).await {
        warn!(reporter = %name, error = %e, "report cycle aborted");
    }
}

/// Controls a running reporter loop.
///
/// Dropping the handle also stops the loop (after a final report), but
/// without waiting for it.
#[derive(Debug)]
pub struct ReporterHandle {
    stop_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl ReporterHandle {
    /// Stop the loop, run one last report, and wait for it to finish.
    pub async fn stop(mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        if let Err(e) = (&mut self.task).await {
            warn!(error = %e, "reporter task ended abnormally");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
