//! # Scalar Types — Timestamps and Opaque Identifiers
//!
//! The two non-primitive scalars of the wire protocol: `Timestamp`, an
//! absolute instant with microsecond precision and optional zone awareness,
//! and `OpaqueId`, a validated 24-hex-character document identifier.
//!
//! ## Precision Invariant
//!
//! The wire format carries timestamps as float seconds since the epoch, and
//! round-trips must preserve at least six decimal digits of sub-second
//! precision. `Timestamp` therefore stores epoch **microseconds** as an
//! `i64` rather than holding a `DateTime` directly — the float conversion
//! happens only at the wire boundary, where `(secs * 1e6).round()` recovers
//! the exact microsecond count for any realistic instant.
//!
//! ## Zone Awareness
//!
//! A timestamp is either zone-aware (it denotes an absolute instant and may
//! be shifted to a display zone when rendered) or naive (wall-clock numbers
//! with no zone attached; display-zone shifting never applies). Decoded
//! wire timestamps are always zone-aware UTC.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::VoError;

/// Microseconds per second, for wire float conversion.
const MICROS_PER_SEC: f64 = 1_000_000.0;

/// Display format for normalized output: 24-hour clock, fixed six-digit
/// fractional seconds, no zone suffix.
const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// An absolute instant with microsecond precision and a zone-awareness flag.
///
/// # Construction
///
/// - [`Timestamp::now()`] — current UTC time, zone-aware.
/// - [`Timestamp::from_utc()`] — from a `DateTime<Utc>`, zone-aware.
/// - [`Timestamp::from_naive()`] — from wall-clock numbers, zone-naive.
/// - [`Timestamp::from_epoch_micros()`] / [`Timestamp::from_epoch_secs_f64()`]
///   — from epoch counts, zone-aware; used by the wire decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp {
    micros: i64,
    zone_aware: bool,
}

impl Timestamp {
    /// Create a zone-aware timestamp from the current UTC time.
    pub fn now() -> Self {
        Self {
            micros: Utc::now().timestamp_micros(),
            zone_aware: true,
        }
    }

    /// Create a zone-aware timestamp from a `chrono::DateTime<Utc>`.
    ///
    /// Sub-microsecond precision is discarded.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self {
            micros: dt.timestamp_micros(),
            zone_aware: true,
        }
    }

    /// Create a zone-naive timestamp from wall-clock numbers.
    ///
    /// The instant is stored as if the wall clock were UTC; display-zone
    /// shifting never applies to naive timestamps.
    pub fn from_naive(dt: NaiveDateTime) -> Self {
        Self {
            micros: dt.and_utc().timestamp_micros(),
            zone_aware: false,
        }
    }

    /// Create a zone-aware timestamp from an epoch microsecond count.
    ///
    /// # Errors
    ///
    /// Returns `InvalidScalar` if the count is outside chrono's
    /// representable range.
    pub fn from_epoch_micros(micros: i64) -> Result<Self, VoError> {
        if DateTime::from_timestamp_micros(micros).is_none() {
            return Err(VoError::InvalidScalar(format!(
                "epoch microseconds out of range: {micros}"
            )));
        }
        Ok(Self {
            micros,
            zone_aware: true,
        })
    }

    /// Create a zone-aware timestamp from wire float seconds, rounding to
    /// the nearest microsecond.
    ///
    /// # Errors
    ///
    /// Returns `InvalidScalar` for non-finite or out-of-range values.
    pub fn from_epoch_secs_f64(secs: f64) -> Result<Self, VoError> {
        if !secs.is_finite() {
            return Err(VoError::InvalidScalar(format!(
                "non-finite timestamp seconds: {secs}"
            )));
        }
        let micros = (secs * MICROS_PER_SEC).round();
        if micros < i64::MIN as f64 || micros > i64::MAX as f64 {
            return Err(VoError::InvalidScalar(format!(
                "timestamp seconds out of range: {secs}"
            )));
        }
        Self::from_epoch_micros(micros as i64)
    }

    /// The epoch microsecond count.
    pub fn epoch_micros(&self) -> i64 {
        self.micros
    }

    /// The wire representation: float seconds since the epoch.
    pub fn epoch_secs_f64(&self) -> f64 {
        self.micros as f64 / MICROS_PER_SEC
    }

    /// Whether display-zone shifting applies to this timestamp.
    pub fn is_zone_aware(&self) -> bool {
        self.zone_aware
    }

    /// The instant as a `chrono::DateTime<Utc>`.
    pub fn to_utc_datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_micros(self.micros).unwrap_or_default()
    }

    /// Render for normalized output: `YYYY-MM-DD HH:MM:SS.ffffff`.
    ///
    /// If a display zone is supplied and the timestamp is zone-aware, the
    /// wall-clock numbers are shifted to that zone first. The zone itself
    /// is never serialized — it only selects the numbers.
    pub fn format_display(&self, zone: Option<&chrono::FixedOffset>) -> String {
        let utc = self.to_utc_datetime();
        match zone {
            Some(z) if self.zone_aware => utc.with_timezone(z).format(DISPLAY_FORMAT).to_string(),
            _ => utc.format(DISPLAY_FORMAT).to_string(),
        }
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format_display(None))
    }
}

/// Expected length of an opaque identifier, in hex characters.
pub const OPAQUE_ID_LEN: usize = 24;

/// A fixed-format external identifier: exactly 24 hex characters,
/// normalized to lowercase. Semantically opaque beyond equality and
/// ordering.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OpaqueId(String);

impl OpaqueId {
    /// Validate and construct an identifier from its hex string form.
    ///
    /// # Errors
    ///
    /// Returns `InvalidIdentifier` if the string is not exactly 24 hex
    /// characters.
    pub fn new(raw: impl Into<String>) -> Result<Self, VoError> {
        let raw = raw.into();
        if raw.len() != OPAQUE_ID_LEN || !raw.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(VoError::InvalidIdentifier(format!(
                "expected {OPAQUE_ID_LEN} hex characters, got {raw:?}"
            )));
        }
        Ok(Self(raw.to_ascii_lowercase()))
    }

    /// The 24-hex-character string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OpaqueId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
