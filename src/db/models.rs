use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One stored feedback submission. Immutable after insertion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedbackRecord {
    pub id: i64,
    pub rating: i64,
    pub comment: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Aggregate counters over the whole feedback table. `average` is `None`
/// when no rows exist (SQL `AVG` over zero rows).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingSummary {
    pub total: i64,
    pub positive: i64,
    pub medium: i64,
    pub negative: i64,
    pub average: Option<f64>,
}
