//! Custom serde helpers for API wire formats.

/// (De)serializes `DateTime<Utc>` as Unix epoch seconds.
///
/// The time-series API keys and stamps every point in whole seconds.
pub mod timestamp_secs {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(ts.timestamp())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = i64::deserialize(deserializer)?;
        DateTime::<Utc>::from_timestamp(secs, 0)
            .ok_or_else(|| serde::de::Error::custom(format!("Invalid timestamp: {}", secs)))
    }
}
