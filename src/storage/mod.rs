pub mod database;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::core::error::{AppError, AppResult};

/// UUIDs and timestamps are stored as TEXT; decode failures are corruption,
/// not user error.
pub(crate) fn parse_uuid(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|e| AppError::Internal(format!("Invalid UUID in store: {}", e)))
}

pub(crate) fn parse_timestamp(raw: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::Internal(format!("Invalid timestamp in store: {}", e)))
}
