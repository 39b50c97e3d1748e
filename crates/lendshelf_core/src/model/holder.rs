//! Holder domain model.
//!
//! # Responsibility
//! - Describe a person who can take items.
//! - Own the bearer token used to look a holder up.
//!
//! # Invariants
//! - `token` is unique across holders and never changes after creation.
//! - Token text never appears in `Debug` output.

use crate::model::{validate_name, ValidationError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter};
use uuid::Uuid;

/// Stable identifier for holders.
pub type HolderId = Uuid;

static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{8,64}$").expect("valid token regex"));

/// Opaque bearer capability identifying one holder.
///
/// Not a password: possession of the token is the whole check.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HolderToken(String);

impl HolderToken {
    /// Generates a fresh random token (32 lowercase hex chars).
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Parses caller-supplied token text.
    ///
    /// The text must match exactly; padded input is rejected, not trimmed.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        if !TOKEN_RE.is_match(value) {
            return Err(ValidationError::InvalidToken);
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Debug for HolderToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("HolderToken(<redacted>)")
    }
}

impl TryFrom<String> for HolderToken {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<HolderToken> for String {
    fn from(value: HolderToken) -> Self {
        value.0
    }
}

/// A person identified by token who may take and give back items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holder {
    pub uuid: HolderId,
    pub name: String,
    pub token: HolderToken,
}

impl Holder {
    /// Creates a holder with a generated id and token.
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        Self::with_token(Uuid::new_v4(), name, HolderToken::generate())
    }

    /// Creates a holder with caller-provided identity, used by fixtures/seed data.
    pub fn with_token(
        uuid: HolderId,
        name: impl Into<String>,
        token: HolderToken,
    ) -> Result<Self, ValidationError> {
        let holder = Self {
            uuid,
            name: name.into().trim().to_string(),
            token,
        };
        holder.validate()?;
        Ok(holder)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::{Holder, HolderToken};
    use crate::model::ValidationError;

    #[test]
    fn generated_tokens_are_valid_and_distinct() {
        let first = HolderToken::generate();
        let second = HolderToken::generate();
        assert_ne!(first, second);
        HolderToken::parse(first.as_str()).expect("generated token should parse");
    }

    #[test]
    fn parse_rejects_short_or_foreign_characters() {
        assert_eq!(
            HolderToken::parse("abc"),
            Err(ValidationError::InvalidToken)
        );
        assert_eq!(
            HolderToken::parse("abc def ghi"),
            Err(ValidationError::InvalidToken)
        );
        assert_eq!(
            HolderToken::parse("../../etc/passwd"),
            Err(ValidationError::InvalidToken)
        );
    }

    #[test]
    fn parse_does_not_trim_padded_tokens() {
        for padded in ["  ola-token-0001", "ola-token-0001\n", " ola-token-0001 "] {
            assert_eq!(
                HolderToken::parse(padded),
                Err(ValidationError::InvalidToken)
            );
        }
        assert_eq!(
            HolderToken::parse("ola-token-0001").unwrap().as_str(),
            "ola-token-0001"
        );
    }

    #[test]
    fn debug_output_hides_token() {
        let token = HolderToken::parse("secret-token-123").unwrap();
        let holder = Holder::with_token(uuid::Uuid::new_v4(), "Ola", token).unwrap();
        let rendered = format!("{holder:?}");
        assert!(!rendered.contains("secret-token-123"));
        assert!(rendered.contains("Ola"));
    }

    #[test]
    fn holder_name_is_trimmed_and_required() {
        let holder = Holder::new("  Tomek ").unwrap();
        assert_eq!(holder.name, "Tomek");
        assert_eq!(Holder::new("   "), Err(ValidationError::EmptyName));
    }
}
