//! Time zone used when rendering report timestamps.

use chrono::{DateTime, FixedOffset, Local, SecondsFormat, Utc};

/// Time zone for rendered timestamps. Defaults to the platform zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeZone {
    #[default]
    Local,
    Utc,
    Fixed(FixedOffset),
}

impl TimeZone {
    /// A fixed offset east of UTC, in seconds. `None` if out of range.
    pub fn east(seconds: i32) -> Option<Self> {
        FixedOffset::east_opt(seconds).map(TimeZone::Fixed)
    }

    /// Render Unix epoch milliseconds as an RFC 3339 timestamp in this zone.
    pub fn format(&self, epoch_millis: u64) -> String {
        let Some(utc) = DateTime::<Utc>::from_timestamp_millis(epoch_millis as i64) else {
            return epoch_millis.to_string();
        };
        match self {
            TimeZone::Local => utc
                .with_timezone(&Local)
                .to_rfc3339_opts(SecondsFormat::Millis, false),
            TimeZone::Utc => utc.to_rfc3339_opts(SecondsFormat::Millis, true),
            TimeZone::Fixed(offset) => utc
                .with_timezone(offset)
                .to_rfc3339_opts(SecondsFormat::Millis, false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utc_rendering() {
        assert_eq!(TimeZone::Utc.format(0), "1970-01-01T00:00:00.000Z");
    }

    #[test]
    fn fixed_offset_rendering() {
        let zone = TimeZone::east(2 * 3600).unwrap();
        assert_eq!(zone.format(1_500), "1970-01-01T02:00:01.500+02:00");
    }

    #[test]
    fn out_of_range_offset() {
        assert!(TimeZone::east(48 * 3600).is_none());
    }
}
