//! Domain model for lendable items and the people holding them.
//!
//! # Responsibility
//! - Define canonical data structures used by the lending policy.
//! - Own field-level validation shared by repositories and services.
//!
//! # Invariants
//! - Every record is identified by a stable UUID.
//! - Names are trimmed, non-empty and bounded in length.
//! - Records are never hard-deleted by core logic.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod holder;
pub mod item;

/// Maximum accepted length (in chars) for item and holder names.
pub const MAX_NAME_CHARS: usize = 200;

/// Field validation failure for items and holders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Name is empty after trimming.
    EmptyName,
    /// Name exceeds `MAX_NAME_CHARS`.
    NameTooLong { max: usize, actual: usize },
    /// Token does not match the accepted token alphabet/length.
    InvalidToken,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::NameTooLong { max, actual } => {
                write!(f, "name is {actual} chars long; maximum is {max}")
            }
            // Token text is deliberately left out of messages.
            Self::InvalidToken => write!(f, "token has an invalid format"),
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    let actual = name.chars().count();
    if actual > MAX_NAME_CHARS {
        return Err(ValidationError::NameTooLong {
            max: MAX_NAME_CHARS,
            actual,
        });
    }
    Ok(())
}

pub(crate) fn now_epoch_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
        })
}
