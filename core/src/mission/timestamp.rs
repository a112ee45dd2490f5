use crate::prelude::{WizardError, WizardResult};
use chrono::{DateTime, Duration, NaiveDateTime, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Text layout shared by the backend and the wizard: `YYYY/MM/DD HH:MM:SS`.
pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Days covered by a locally generated window.
pub const SYNTHETIC_WINDOW_DAYS: i64 = 7;

/// A launch instant, always rendered in the fixed wizard format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LaunchTimestamp(NaiveDateTime);

impl LaunchTimestamp {
    pub fn new(value: NaiveDateTime) -> Self {
        Self(value.with_nanosecond(0).unwrap_or(value))
    }

    pub fn as_naive(&self) -> NaiveDateTime {
        self.0
    }

    pub fn offset_by(&self, delta: Duration) -> Self {
        Self::new(self.0 + delta)
    }
}

/// Checks the literal `DDDD/DD/DD DD:DD:DD` shape before chrono gets a say;
/// chrono alone would also accept unpadded fields.
fn matches_pattern(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() == 19
        && bytes.iter().enumerate().all(|(idx, &b)| match idx {
            4 | 7 => b == b'/',
            10 => b == b' ',
            13 | 16 => b == b':',
            _ => b.is_ascii_digit(),
        })
}

impl FromStr for LaunchTimestamp {
    type Err = WizardError;

    fn from_str(text: &str) -> WizardResult<Self> {
        let text = text.trim();
        if !matches_pattern(text) {
            return Err(WizardError::TimestampFormat);
        }
        NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT)
            .map(Self::new)
            .map_err(|_| WizardError::TimestampFormat)
    }
}

impl fmt::Display for LaunchTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIMESTAMP_FORMAT))
    }
}

impl Serialize for LaunchTimestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LaunchTimestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Inclusive range of launch instants the backend can reason about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampWindow {
    min: LaunchTimestamp,
    max: LaunchTimestamp,
}

impl TimestampWindow {
    pub fn new(min: LaunchTimestamp, max: LaunchTimestamp) -> WizardResult<Self> {
        if max < min {
            return Err(WizardError::InvertedWindow {
                min: min.to_string(),
                max: max.to_string(),
            });
        }
        Ok(Self { min, max })
    }

    /// Builds the window from the `{min, max}` strings served by `/get_timestamps`.
    pub fn from_bounds(min: &str, max: &str) -> WizardResult<Self> {
        Self::new(min.parse()?, max.parse()?)
    }

    /// Window used when no TLE catalogue is involved: now until a week later.
    pub fn synthetic(now: DateTime<Utc>) -> Self {
        let min = LaunchTimestamp::new(now.naive_utc());
        let max = min.offset_by(Duration::days(SYNTHETIC_WINDOW_DAYS));
        Self { min, max }
    }

    pub fn min(&self) -> LaunchTimestamp {
        self.min
    }

    pub fn max(&self) -> LaunchTimestamp {
        self.max
    }

    pub fn contains(&self, timestamp: &LaunchTimestamp) -> bool {
        self.min <= *timestamp && *timestamp <= self.max
    }

    pub fn validate(&self, input: &str) -> WizardResult<LaunchTimestamp> {
        let timestamp: LaunchTimestamp = input.parse()?;
        if !self.contains(&timestamp) {
            return Err(WizardError::TimestampOutOfWindow {
                min: self.min.to_string(),
                max: self.max.to_string(),
            });
        }
        Ok(timestamp)
    }

    /// Like [`validate`](Self::validate), but blank input may fall back to the window start.
    pub fn resolve(&self, input: &str, default_to_start: bool) -> WizardResult<LaunchTimestamp> {
        if default_to_start && input.trim().is_empty() {
            return Ok(self.min);
        }
        self.validate(input)
    }
}

impl fmt::Display for TimestampWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.min, self.max)
    }
}
