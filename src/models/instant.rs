//! Instant normalization.
//!
//! Every timestamp the engine compares is a [`PrimitiveDateTime`] in UTC.
//! Offset-aware inputs are converted to UTC and the offset is dropped; naive
//! inputs are taken to already be UTC.

use crate::error::{AppError, Result};
use time::format_description::well_known::Rfc3339;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

/// Output format for instants, e.g. `2026-03-10T08:00:00`.
const NAIVE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

const NAIVE_INPUT_FORMAT: &[BorrowedFormatItem<'static>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute][optional [:[second][optional [.[subsecond]]]]]"
);

/// Convert an offset-aware value to a naive UTC instant.
pub fn to_naive_utc(value: OffsetDateTime) -> PrimitiveDateTime {
    let utc = value.to_offset(UtcOffset::UTC);
    PrimitiveDateTime::new(utc.date(), utc.time())
}

/// Parse an ISO-8601 timestamp with or without an offset.
pub fn parse_instant(raw: &str) -> Result<PrimitiveDateTime> {
    let trimmed = raw.trim();
    if let Ok(aware) = OffsetDateTime::parse(trimmed, &Rfc3339) {
        return Ok(to_naive_utc(aware));
    }
    PrimitiveDateTime::parse(trimmed, NAIVE_INPUT_FORMAT).map_err(|e| {
        AppError::InvalidInput(format!("'{}' is not a valid ISO datetime: {}", raw, e))
    })
}

pub fn format_instant(value: PrimitiveDateTime) -> String {
    // The description only contains numeric components, formatting cannot fail.
    value
        .format(NAIVE_FORMAT)
        .unwrap_or_else(|_| value.to_string())
}

/// `#[serde(with = "iso")]` for `PrimitiveDateTime` fields.
pub mod iso {
    use super::{format_instant, parse_instant};
    use serde::{de, Deserialize, Deserializer, Serializer};
    use time::PrimitiveDateTime;

    pub fn serialize<S: Serializer>(
        value: &PrimitiveDateTime,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_instant(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<PrimitiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_instant(&raw).map_err(de::Error::custom)
    }
}
