//! CF-convention time axis decoding.
//!
//! NetCDF time coordinates are stored as offsets from an epoch, described by a
//! `units` attribute such as `"days since 1979-01-01 00:00:00"` and an optional
//! `calendar` attribute. Only Gregorian-compatible calendars are supported.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Units string written to output files for the time axis.
pub const OUTPUT_TIME_UNITS: &str = "seconds since 1970-01-01 00:00:00";

/// Calendar written to output files.
pub const OUTPUT_CALENDAR: &str = "standard";

const SUPPORTED_CALENDARS: &[&str] = &["standard", "gregorian", "proleptic_gregorian"];

/// Step size of a CF time axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeStep {
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeStep {
    fn seconds(&self) -> f64 {
        match self {
            TimeStep::Seconds => 1.0,
            TimeStep::Minutes => 60.0,
            TimeStep::Hours => 3600.0,
            TimeStep::Days => 86400.0,
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "s" | "sec" | "secs" | "second" | "seconds" => Some(TimeStep::Seconds),
            "min" | "mins" | "minute" | "minutes" => Some(TimeStep::Minutes),
            "h" | "hr" | "hrs" | "hour" | "hours" => Some(TimeStep::Hours),
            "d" | "day" | "days" => Some(TimeStep::Days),
            _ => None,
        }
    }
}

/// Parsed `"<step> since <epoch>"` time units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CfTimeUnits {
    pub step: TimeStep,
    pub epoch: DateTime<Utc>,
}

impl CfTimeUnits {
    /// Parse a units attribute, checking the calendar if one is given.
    pub fn parse(units: &str, calendar: Option<&str>) -> Result<Self, TimeParseError> {
        if let Some(calendar) = calendar {
            let normalized = calendar.trim().to_ascii_lowercase();
            if !SUPPORTED_CALENDARS.contains(&normalized.as_str()) {
                return Err(TimeParseError::UnsupportedCalendar(calendar.to_string()));
            }
        }

        let (step, epoch) = units
            .split_once(" since ")
            .ok_or_else(|| TimeParseError::InvalidUnits(units.to_string()))?;
        let step =
            TimeStep::parse(step.trim()).ok_or_else(|| TimeParseError::InvalidUnits(units.to_string()))?;
        let epoch = parse_epoch(epoch.trim())
            .ok_or_else(|| TimeParseError::InvalidUnits(units.to_string()))?;

        Ok(Self { step, epoch })
    }

    /// Convert a raw offset into an absolute instant (millisecond precision).
    pub fn decode(&self, value: f64) -> Result<DateTime<Utc>, TimeParseError> {
        if !value.is_finite() {
            return Err(TimeParseError::OutOfRange(value));
        }
        let millis = (value * self.step.seconds() * 1000.0).round();
        if millis.abs() >= i64::MAX as f64 {
            return Err(TimeParseError::OutOfRange(value));
        }
        let offset =
            Duration::try_milliseconds(millis as i64).ok_or(TimeParseError::OutOfRange(value))?;
        self.epoch
            .checked_add_signed(offset)
            .ok_or(TimeParseError::OutOfRange(value))
    }
}

fn parse_epoch(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    let s = s
        .trim_end_matches("UTC")
        .trim_end_matches('Z')
        .trim_end_matches("+00:00")
        .trim();

    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&ndt));
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ndt| Utc.from_utc_datetime(&ndt))
}

/// Seconds since the Unix epoch, the encoding used for output time axes.
pub fn encode_output_time(dt: &DateTime<Utc>) -> f64 {
    dt.timestamp_millis() as f64 / 1000.0
}

/// ISO-8601 rendering used for time coverage attributes.
pub fn format_coverage(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S").to_string()
}

#[derive(Debug, thiserror::Error)]
pub enum TimeParseError {
    #[error("Invalid time units: {0}")]
    InvalidUnits(String),

    #[error("Unsupported calendar: {0}")]
    UnsupportedCalendar(String),

    #[error("Time value out of range: {0}")]
    OutOfRange(f64),
}
