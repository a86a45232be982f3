//! Public configuration types for the reporter.

mod locale;
mod unit;
mod zone;

pub use locale::Locale;
pub use unit::TimeUnit;
pub use zone::TimeZone;
