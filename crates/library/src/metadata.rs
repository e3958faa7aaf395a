//! JSON metadata stored in each content payload.
//!
//! Every lookup is per field with a typed default, so one malformed field
//! never discards the others. Only a payload that is not a JSON object at all
//! is reported as an error; callers then fall back to [`EntryMetadata::defaults`].

use alloc::borrow::ToOwned;
use alloc::string::String;

use serde_json::{Map, Value};
use time::macros::format_description;
use time::PrimitiveDateTime;

use platform::config::DEFAULT_DURATION_MS;

use crate::entry::MatrixAssignment;

/// Why a payload could not be decoded as a metadata object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MetadataError {
    /// The payload could not be read from flash
    Read,
    /// The payload is not valid JSON
    Json,
    /// The payload is valid JSON but not an object
    NotObject,
}

#[cfg(feature = "std")]
impl std::error::Error for MetadataError {}

impl core::fmt::Display for MetadataError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Read => write!(f, "metadata unreadable"),
            Self::Json => write!(f, "metadata is not valid JSON"),
            Self::NotObject => write!(f, "metadata is not a JSON object"),
        }
    }
}

/// Parse `bytes` as a JSON object.
///
/// # Errors
///
/// [`MetadataError::Json`] for invalid JSON, [`MetadataError::NotObject`]
/// for any other top-level value.
pub fn parse_object(bytes: &[u8]) -> Result<Map<String, Value>, MetadataError> {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(MetadataError::NotObject),
        Err(_) => Err(MetadataError::Json),
    }
}

fn non_empty_str<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    obj.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

fn u32_field(obj: &Map<String, Value>, key: &str) -> Option<u32> {
    obj.get(key)
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
}

// ---------------------------------------------------------------------------
// EntryMetadata
// ---------------------------------------------------------------------------

/// Fields every flash-backed catalog entry reads from its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryMetadata {
    /// `durationMs`, default 5000
    pub duration_ms: u32,
    /// `matrix0Scene` / `matrix1Scene` / `matrix2Scene`
    pub matrix: MatrixAssignment,
}

impl EntryMetadata {
    /// Metadata used when the payload has none: the entry's own path on matrices 0 and 1.
    pub fn defaults(path: &str) -> Self {
        Self {
            duration_ms: DEFAULT_DURATION_MS,
            matrix: MatrixAssignment::new(path.to_owned(), path.to_owned(), String::new()),
        }
    }

    /// Decode from a payload.
    ///
    /// # Errors
    ///
    /// See [`parse_object`].
    pub fn decode(bytes: &[u8], path: &str) -> Result<Self, MetadataError> {
        parse_object(bytes).map(|obj| Self::from_object(&obj, path))
    }

    /// Look up each field in `obj`, falling back per field.
    pub fn from_object(obj: &Map<String, Value>, path: &str) -> Self {
        let m0 = non_empty_str(obj, "matrix0Scene").unwrap_or(path).to_owned();
        let m1 = non_empty_str(obj, "matrix1Scene").map_or_else(|| m0.clone(), |s| s.to_owned());
        let m2 = obj
            .get("matrix2Scene")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned();
        Self {
            duration_ms: u32_field(obj, "durationMs").unwrap_or(DEFAULT_DURATION_MS),
            matrix: MatrixAssignment::new(m0, m1, m2),
        }
    }
}

// ---------------------------------------------------------------------------
// Scroll settings
// ---------------------------------------------------------------------------

/// Settings of a scrolling-text payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollSettings {
    /// `text`, default `"HELLO"`
    pub text: String,
    /// `speed`: milliseconds per scroll step, default 50
    pub speed_ms: u32,
}

impl ScrollSettings {
    /// Text shown when the payload does not name one.
    pub const DEFAULT_TEXT: &'static str = "HELLO";
    /// Step interval used when the payload does not name one.
    pub const DEFAULT_SPEED_MS: u32 = 50;

    /// Decode from a payload.
    ///
    /// # Errors
    ///
    /// See [`parse_object`].
    pub fn decode(bytes: &[u8]) -> Result<Self, MetadataError> {
        let obj = parse_object(bytes)?;
        Ok(Self {
            text: obj
                .get("text")
                .and_then(Value::as_str)
                .unwrap_or(Self::DEFAULT_TEXT)
                .to_owned(),
            speed_ms: u32_field(&obj, "speed").unwrap_or(Self::DEFAULT_SPEED_MS),
        })
    }
}

impl Default for ScrollSettings {
    fn default() -> Self {
        Self {
            text: Self::DEFAULT_TEXT.to_owned(),
            speed_ms: Self::DEFAULT_SPEED_MS,
        }
    }
}

// ---------------------------------------------------------------------------
// Countdown target
// ---------------------------------------------------------------------------

/// Why a countdown payload has no usable target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CountdownError {
    /// The payload is not a metadata object
    Metadata(MetadataError),
    /// No `targetDate` field
    MissingTarget,
    /// `targetDate` is neither epoch seconds nor `YYYY-MM-DD HH:MM:SS`
    InvalidTarget,
}

#[cfg(feature = "std")]
impl std::error::Error for CountdownError {}

impl core::fmt::Display for CountdownError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Metadata(e) => write!(f, "{e}"),
            Self::MissingTarget => write!(f, "no targetDate field"),
            Self::InvalidTarget => write!(f, "unparseable targetDate"),
        }
    }
}

impl From<MetadataError> for CountdownError {
    fn from(e: MetadataError) -> Self {
        Self::Metadata(e)
    }
}

/// Time remaining until a countdown target, each component clamped to 99.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Remaining {
    /// Whole days
    pub days: u8,
    /// Hours within the day
    pub hours: u8,
    /// Minutes within the hour
    pub minutes: u8,
    /// Seconds within the minute
    pub seconds: u8,
    /// `true` once the target has passed
    pub expired: bool,
}

/// Countdown target as UTC epoch seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CountdownTarget {
    /// Seconds since 1970-01-01 00:00:00 UTC
    pub epoch_secs: i64,
}

impl CountdownTarget {
    /// Decode `targetDate` from a payload.
    ///
    /// # Errors
    ///
    /// Returns [`CountdownError`] when the payload is not an object or the
    /// field is missing or unparseable.
    pub fn decode(bytes: &[u8]) -> Result<Self, CountdownError> {
        let obj = parse_object(bytes)?;
        let value = obj.get("targetDate").ok_or(CountdownError::MissingTarget)?;
        let epoch_secs = match value {
            Value::Number(n) => n.as_i64().ok_or(CountdownError::InvalidTarget)?,
            Value::String(s) => parse_date(s).ok_or(CountdownError::InvalidTarget)?,
            _ => return Err(CountdownError::InvalidTarget),
        };
        Ok(Self { epoch_secs })
    }

    /// Remaining time at `now_epoch_secs`.
    #[allow(clippy::arithmetic_side_effects)] // diff is clamped to [0, i64::MAX]; divisors are non-zero constants
    pub fn remaining(&self, now_epoch_secs: i64) -> Remaining {
        let diff = self.epoch_secs.saturating_sub(now_epoch_secs).max(0);
        let clamp = |v: i64| u8::try_from(v.min(99)).unwrap_or(99);
        Remaining {
            days: clamp(diff / 86_400),
            hours: clamp(diff % 86_400 / 3_600),
            minutes: clamp(diff % 3_600 / 60),
            seconds: clamp(diff % 60),
            expired: diff == 0,
        }
    }
}

/// Parse `YYYY-MM-DD HH:MM:SS` as UTC epoch seconds.
pub fn parse_date(text: &str) -> Option<i64> {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    PrimitiveDateTime::parse(text.trim(), format)
        .ok()
        .map(|dt| dt.assume_utc().unix_timestamp())
}
