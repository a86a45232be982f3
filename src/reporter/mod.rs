//! Reporter implementations

mod builder;
mod riak;
mod scheduled;

pub use builder::{
    DEFAULT_BUCKET, DEFAULT_HOST, DEFAULT_PORT, ReporterSettings, RiakReporterBuilder,
};
pub use riak::RiakReporter;
pub use scheduled::{ReporterHandle, ScheduledReporter};
