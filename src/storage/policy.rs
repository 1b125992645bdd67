//! Staleness policy for cached statuses

use crate::storage::StatusRecord;
use chrono::{DateTime, Duration, Utc};

/// Age after which any cached status is rechecked
pub const CACHE_HORIZON_DAYS: i64 = 14;

/// Longest horizon a configuration may ask for (about ten years)
pub const MAX_CACHE_HORIZON_DAYS: i64 = 3650;

/// Converts a horizon in days to a duration, clamped to `1..=MAX_CACHE_HORIZON_DAYS`
pub fn cache_horizon(days: i64) -> Duration {
    Duration::days(days.clamp(1, MAX_CACHE_HORIZON_DAYS))
}

/// Checks whether a cached record must be fetched again
///
/// A record is stale if its status is indexable (Google may have resolved
/// it since) or if it was last checked more than `horizon` before `now`.
///
/// # Example
///
/// ```
/// use chrono::{Duration, Utc};
/// use search_indexer::storage::{should_recheck, StatusRecord};
/// use search_indexer::IndexingStatus;
///
/// let now = Utc::now();
/// let fresh = StatusRecord::new(IndexingStatus::SubmittedAndIndexed, now);
/// assert!(!should_recheck(&fresh, now, Duration::days(14)));
/// ```
pub fn should_recheck(record: &StatusRecord, now: DateTime<Utc>, horizon: Duration) -> bool {
    record.status.is_indexable() || now - record.last_checked_at > horizon
}
