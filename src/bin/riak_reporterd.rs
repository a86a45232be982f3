//! riak-reporterd: stores process metrics in Riak on a schedule.
//!
//! Useful as a smoke test for a Riak setup: it registers a handful of
//! process-level metrics and reports them every configured interval until
//! interrupted.

use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use tracing::info;

use riak_reporter::config::Config;
use riak_reporter::{MetricRegistry, RiakReporter, ScheduledReporter};

/// Report process metrics to Riak.
#[derive(Parser)]
#[command(name = "riak-reporterd")]
#[command(version = riak_reporter::PKG_VERSION)]
#[command(about = "Periodically store process metrics in Riak")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long, env = "RIAK_REPORTER_CONFIG")]
    config: Option<std::path::PathBuf>,

    /// Override the Riak host from the config file.
    #[arg(long)]
    host: Option<String>,

    /// Override the Riak port from the config file.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut config = Config::load(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.riak.host = host;
    }
    if let Some(port) = args.port {
        config.riak.port = port;
    }

    let registry = MetricRegistry::new();
    register_process_metrics(&registry)?;

    let reporter = config
        .apply(RiakReporter::for_registry(registry.clone()))
        .build()
        .await?;

    info!(
        version = riak_reporter::PKG_VERSION,
        bucket = reporter.namespace(),
        interval_secs = config.report.interval_secs,
        "riak-reporterd starting"
    );

    let handle = Arc::new(reporter).start(config.interval())?;
    let heartbeats = registry.meter("riak_reporterd.heartbeats")?;
    let mut ticker = tokio::time::interval(Duration::from_secs(1));

    loop {
        tokio::select! {
            _ = ticker.tick() => heartbeats.mark(),
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    info!("shutting down");
    handle.stop().await;
    Ok(())
}

fn register_process_metrics(registry: &MetricRegistry) -> riak_reporter::Result<()> {
    let started = Instant::now();
    registry.gauge("riak_reporterd.uptime_seconds", move || {
        started.elapsed().as_secs()
    })?;
    registry.gauge("riak_reporterd.pid", std::process::id)?;
    registry.gauge("riak_reporterd.version", || riak_reporter::PKG_VERSION)?;
    Ok(())
}
