//! Utility functions for the rating engine

use crate::error::{EngineError, Result};
use uuid::Uuid;

/// Generate a new unique record ID
pub fn generate_id() -> Uuid {
    Uuid::new_v4()
}

/// Parse a caller-supplied record identifier
pub fn parse_id(value: &str) -> Result<Uuid> {
    Uuid::parse_str(value.trim()).map_err(|_| EngineError::InvalidIdentifier {
        value: value.to_string(),
    })
}

/// Parse a caller-supplied result-count limit; must be a positive integer
pub fn parse_limit(value: &str) -> Result<usize> {
    match value.trim().parse::<usize>() {
        Ok(limit) if limit > 0 => Ok(limit),
        _ => Err(EngineError::InvalidLimit {
            value: value.to_string(),
        }),
    }
}
