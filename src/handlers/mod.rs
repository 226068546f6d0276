//! HTTP handlers for developers and programming languages.

pub mod developer;
pub mod language;

use crate::error::AppError;

/// Path and query ids are any signed 64-bit integer; unknown ids are handled per operation.
fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| AppError::BadRequest(format!("invalid id: {}", raw)))
}
