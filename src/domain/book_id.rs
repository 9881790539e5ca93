//! BookId type
//!
//! Identifier of a catalog item. Always a UUID in its canonical lowercase,
//! hyphenated text form, validated at construction time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::DomainError;

/// BookId is the opaque identity of a `Book` aggregate.
///
/// # Invariants
/// - Never empty
/// - Text form is the canonical lowercase hyphenated UUID
///
/// # Example
/// ```
/// use library_catalog::domain::BookId;
///
/// let id = BookId::parse("550e8400-e29b-41d4-a716-446655440000").unwrap();
/// assert_eq!(id.to_string(), "550e8400-e29b-41d4-a716-446655440000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BookId(Uuid);

impl BookId {
    /// Parse a BookId from raw text.
    ///
    /// # Errors
    /// - `DomainError::BookIdEmpty` if the input is empty
    /// - `DomainError::BookIdInvalidFormat` if the input is not a canonical UUID
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        if value.is_empty() {
            return Err(DomainError::BookIdEmpty);
        }

        let uuid = Uuid::parse_str(value).map_err(|_| DomainError::BookIdInvalidFormat)?;

        // Uuid accepts braced, urn, simple and uppercase forms as well
        if uuid.hyphenated().to_string() != value {
            return Err(DomainError::BookIdInvalidFormat);
        }

        Ok(Self(uuid))
    }

    /// Generate a fresh, unique BookId.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for BookId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BookId::parse(s)
    }
}

impl TryFrom<String> for BookId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        BookId::parse(&value)
    }
}

impl From<BookId> for String {
    fn from(id: BookId) -> Self {
        id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_uuid() {
        let id = BookId::parse("550e8400-e29b-41d4-a716-446655440000").unwrap();
        assert_eq!(id.to_string(), "550e8400-e29b-41d4-a716-446655440000");
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(BookId::parse(""), Err(DomainError::BookIdEmpty));
    }

    #[test]
    fn test_parse_invalid_format() {
        assert_eq!(
            BookId::parse("not-a-uuid"),
            Err(DomainError::BookIdInvalidFormat)
        );
    }

    #[test]
    fn test_parse_rejects_non_canonical_forms() {
        let non_canonical = [
            "550E8400-E29B-41D4-A716-446655440000",
            "550e8400e29b41d4a716446655440000",
            "{550e8400-e29b-41d4-a716-446655440000}",
            "urn:uuid:550e8400-e29b-41d4-a716-446655440000",
            " 550e8400-e29b-41d4-a716-446655440000",
        ];

        for value in non_canonical {
            assert_eq!(
                BookId::parse(value),
                Err(DomainError::BookIdInvalidFormat),
                "Expected invalid format for: {}",
                value
            );
        }
    }

    #[test]
    fn test_generate_is_unique_and_canonical() {
        let a = BookId::generate();
        let b = BookId::generate();

        assert_ne!(a, b);
        assert_eq!(BookId::parse(&a.to_string()), Ok(a));
    }

    #[test]
    fn test_serde_as_string() {
        let id = BookId::parse("550e8400-e29b-41d4-a716-446655440000").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"550e8400-e29b-41d4-a716-446655440000\"");

        let invalid: Result<BookId, _> = serde_json::from_str("\"nope\"");
        assert!(invalid.is_err());
    }
}
