//! Serde helpers for vendor timestamps.
//!
//! - Serialization: `Option<DateTime<Utc>>` -> RFC3339 string
//! - Deserialization: RFC3339 (`2017-01-03T12:00:00Z`,
//!   `2019-04-25T14:54:00.000+00:00`) or the compact offset form
//!   (`2019-04-25T14:54:00.000+0000`) some vendor endpoints emit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// Compact-offset layout used as a fallback when RFC3339 parsing fails.
const COMPACT_OFFSET_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%z";

#[allow(clippy::ref_option)]
pub fn serialize<S>(dt: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match dt {
        Some(dt) => serializer.serialize_some(&dt.to_rfc3339()),
        None => serializer.serialize_none(),
    }
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<String>::deserialize(deserializer)? {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => parse_vendor_timestamp(&s)
            .map(Some)
            .ok_or_else(|| Error::custom(format!("Invalid timestamp: {s}"))),
        None => Ok(None),
    }
}

/// Parse a vendor timestamp into UTC.
pub fn parse_vendor_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .or_else(|_| DateTime::parse_from_str(s, COMPACT_OFFSET_FORMAT))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
