use crate::state::IndexingStatus;
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// Last known status of one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusRecord {
    pub status: IndexingStatus,

    /// When the status was fetched, stored with millisecond precision
    #[serde(with = "iso_millis")]
    pub last_checked_at: DateTime<Utc>,
}

impl StatusRecord {
    /// Creates a record checked at `checked_at`, truncated to milliseconds
    /// so it survives a write/read cycle unchanged
    pub fn new(status: IndexingStatus, checked_at: DateTime<Utc>) -> Self {
        Self {
            status,
            last_checked_at: checked_at.trunc_subsecs(3),
        }
    }

    /// Creates a record checked now
    pub fn checked_now(status: IndexingStatus) -> Self {
        Self::new(status, Utc::now())
    }
}

/// ISO-8601 timestamps in the `2024-01-01T00:00:00.000Z` form
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
