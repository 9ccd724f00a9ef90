//! Shared newtypes and utilities used across all domain modules.
//!
//! These types are serialization-transparent: they serialize/deserialize identically
//! to the raw format the API uses, so they can be used directly in wire types
//! without conversion overhead.

pub mod serde_util;

use crate::error::SdkError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

// ─── ItemId ──────────────────────────────────────────────────────────────────

/// Identifier of a tradeable item in the priced catalog. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(u32);

impl ItemId {
    /// Returns `None` for `0`.
    pub fn new(id: u32) -> Option<Self> {
        (id > 0).then_some(Self(id))
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for ItemId {
    type Error = SdkError;

    fn try_from(id: u32) -> Result<Self, Self::Error> {
        ItemId::new(id).ok_or_else(|| SdkError::Validation("item id must be positive".into()))
    }
}

impl TryFrom<i64> for ItemId {
    type Error = SdkError;

    fn try_from(id: i64) -> Result<Self, Self::Error> {
        let id = u32::try_from(id)
            .map_err(|_| SdkError::Validation(format!("item id out of range: {}", id)))?;
        ItemId::try_from(id)
    }
}

impl FromStr for ItemId {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s
            .trim()
            .parse::<u32>()
            .map_err(|e| SdkError::Validation(format!("invalid item id {:?}: {}", s, e)))?;
        ItemId::try_from(id)
    }
}

impl Serialize for ItemId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u32(self.0)
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let id = u32::deserialize(deserializer)?;
        ItemId::new(id).ok_or_else(|| serde::de::Error::custom("item id must be positive"))
    }
}

// ─── Timestep ────────────────────────────────────────────────────────────────

/// Bucket width of the remote time series (`timestep` query parameter).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timestep {
    #[default]
    #[serde(rename = "5m")]
    FiveMinutes,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "6h")]
    SixHours,
    #[serde(rename = "24h")]
    TwentyFourHours,
}

impl Timestep {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FiveMinutes => "5m",
            Self::OneHour => "1h",
            Self::SixHours => "6h",
            Self::TwentyFourHours => "24h",
        }
    }
}

impl std::fmt::Display for Timestep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timestep {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "5m" => Ok(Self::FiveMinutes),
            "1h" => Ok(Self::OneHour),
            "6h" => Ok(Self::SixHours),
            "24h" => Ok(Self::TwentyFourHours),
            other => Err(SdkError::Validation(format!("unknown timestep: {}", other))),
        }
    }
}
