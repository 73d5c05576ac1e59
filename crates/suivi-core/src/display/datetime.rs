//! DateTime display utilities.
//!
//! Wrapper types for formatting timestamps and durations in a consistent,
//! human-readable format.

use std::fmt;

use jiff::{SignedDuration, Timestamp, tz::TimeZone};

/// A wrapper around `Timestamp` that formats it in the system timezone as
/// `YYYY-MM-DD HH:MM:SS TZ`.
pub struct LocalDateTime<'a>(pub &'a Timestamp);

impl<'a> fmt::Display for LocalDateTime<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.0
                .to_zoned(TimeZone::system())
                .strftime("%Y-%m-%d %H:%M:%S %Z")
        )
    }
}

/// An optional timestamp, rendered as `-` when unset.
pub struct MaybeDateTime<'a>(pub Option<&'a Timestamp>);

impl<'a> fmt::Display for MaybeDateTime<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(ts) => write!(f, "{}", LocalDateTime(ts)),
            None => f.write_str("-"),
        }
    }
}

/// A duration rendered as `H:MM:SS`, with hours unbounded.
///
/// ```rust
/// use jiff::SignedDuration;
/// use suivi_core::display::Elapsed;
///
/// assert_eq!(Elapsed(&SignedDuration::from_secs(20)).to_string(), "0:00:20");
/// assert_eq!(Elapsed(&SignedDuration::from_secs(3725)).to_string(), "1:02:05");
/// ```
pub struct Elapsed<'a>(pub &'a SignedDuration);

impl<'a> fmt::Display for Elapsed<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.0.as_secs();
        let sign = if secs < 0 { "-" } else { "" };
        let total = secs.unsigned_abs();
        write!(
            f,
            "{sign}{}:{:02}:{:02}",
            total / 3600,
            (total % 3600) / 60,
            total % 60
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_format() {
        assert_eq!(Elapsed(&SignedDuration::ZERO).to_string(), "0:00:00");
        assert_eq!(Elapsed(&SignedDuration::from_secs(59)).to_string(), "0:00:59");
        assert_eq!(
            Elapsed(&SignedDuration::from_secs(26 * 3600 + 61)).to_string(),
            "26:01:01"
        );
        assert_eq!(Elapsed(&SignedDuration::from_secs(-90)).to_string(), "-0:01:30");
    }

    #[test]
    fn test_missing_timestamp_is_a_dash() {
        assert_eq!(MaybeDateTime(None).to_string(), "-");
        let ts = Timestamp::from_second(1_700_000_000).unwrap();
        assert_eq!(
            MaybeDateTime(Some(&ts)).to_string(),
            LocalDateTime(&ts).to_string()
        );
    }
}
