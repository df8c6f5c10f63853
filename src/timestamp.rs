//! Build timestamp formatting.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};

use crate::error::{Result, StampError};

/// `YYYY-MM-DD HH:MM:SS`, sortable and human-readable.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Zone label appended in [`TimestampStyle::Utc`].
pub const UTC_LABEL: &str = "UTC";

/// Which wall clock the timestamp is rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampStyle {
    /// UTC wall time with a ` UTC` suffix, e.g. `2024-05-01 12:34:56 UTC`.
    Utc,
    /// Local wall time without a zone label, e.g. `2024-05-01 12:34:56`.
    Local,
}

impl fmt::Display for TimestampStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Utc => f.write_str("utc"),
            Self::Local => f.write_str("local"),
        }
    }
}

impl FromStr for TimestampStyle {
    type Err = StampError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utc" => Ok(Self::Utc),
            "local" => Ok(Self::Local),
            other => Err(StampError::Config(format!(
                "unknown timestamp style '{}', expected utc or local",
                other
            ))),
        }
    }
}

/// Source of the current time.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// The system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Render `instant` in the given style.
pub fn format_timestamp(instant: DateTime<Utc>, style: TimestampStyle) -> String {
    match style {
        TimestampStyle::Utc => format!("{} {}", instant.format(TIMESTAMP_FORMAT), UTC_LABEL),
        TimestampStyle::Local => instant
            .with_timezone(&Local)
            .format(TIMESTAMP_FORMAT)
            .to_string(),
    }
}

/// Read the clock and render the build timestamp. Never fails.
pub fn resolve_timestamp(clock: &impl Clock, style: TimestampStyle) -> String {
    format_timestamp(clock.now(), style)
}

/// Parse a rendered timestamp back into an instant.
///
/// A trailing ` UTC` label means UTC wall time; no label means local wall
/// time. Returns `None` for anything else, including local times that do not
/// exist (DST gaps).
pub fn parse_timestamp(rendered: &str) -> Option<DateTime<Utc>> {
    let rendered = rendered.trim();
    if let Some(wall) = rendered.strip_suffix(UTC_LABEL) {
        let naive = NaiveDateTime::parse_from_str(wall.trim_end(), TIMESTAMP_FORMAT).ok()?;
        return Some(Utc.from_utc_datetime(&naive));
    }
    let naive = NaiveDateTime::parse_from_str(rendered, TIMESTAMP_FORMAT).ok()?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
}
