//! Core type definitions with validation.

use std::fmt;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::punch_kind::UnknownPunchKind;

/// Validation errors raised before reconstruction starts.
///
/// These are the only failures the engine reports. Malformed punch sequences
/// are absorbed by the reconstructor instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// A timestamp could not be parsed.
    #[error("invalid timestamp: {value}")]
    InvalidTimestamp { value: String },

    /// A punch kind string was not recognised.
    #[error(transparent)]
    UnknownKind(#[from] UnknownPunchKind),

    /// A month filter was outside 1..=12 or the year was out of range.
    #[error("invalid month: {year}-{month:02}")]
    InvalidMonth { year: i32, month: u32 },
}

/// Generates a validated string ID newtype with common trait implementations.
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $name:ident, $field_name:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new ID after validation.
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                if id.trim().is_empty() {
                    return Err(ValidationError::Empty { field: $field_name });
                }
                Ok(Self(id))
            }

            /// Returns the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_string_id!(
    /// A validated employee identifier.
    ///
    /// Every engine entry point takes the subject explicitly; resolving "who is
    /// the current employee" belongs to the caller's session layer.
    SubjectId, "subject ID"
);

define_string_id!(
    /// A validated punch identifier, unique within the store.
    PunchId, "punch ID"
);

/// Formats accepted for naive local timestamps, tried in order.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parses a punch timestamp into local wall-clock time.
///
/// Accepts RFC 3339 (converted to the local timezone) or a naive
/// `YYYY-MM-DD[T ]HH:MM[:SS[.fff]]`, which is taken as local already.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, ValidationError> {
    let trimmed = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Local).naive_local());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| ValidationError::InvalidTimestamp {
            value: value.to_string(),
        })
}

/// Parses a `YYYY-MM-DD` calendar date.
pub fn parse_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        ValidationError::InvalidTimestamp {
            value: value.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_id_rejects_empty() {
        assert_eq!(
            SubjectId::new(""),
            Err(ValidationError::Empty {
                field: "subject ID"
            })
        );
        assert!(SubjectId::new("   ").is_err());
        assert!(SubjectId::new("emp-1").is_ok());
    }

    #[test]
    fn subject_id_serde_roundtrip() {
        let id = SubjectId::new("emp-42").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"emp-42\"");
        let parsed: SubjectId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn subject_id_serde_rejects_empty() {
        let result: Result<SubjectId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }

    #[test]
    fn punch_id_as_ref() {
        let id = PunchId::new("p-1").unwrap();
        let s: &str = id.as_ref();
        assert_eq!(s, "p-1");
    }

    #[test]
    fn parse_timestamp_accepts_naive_forms() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 4)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        assert_eq!(parse_timestamp("2025-03-04T09:30:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2025-03-04 09:30:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2025-03-04T09:30").unwrap(), expected);
        assert_eq!(parse_timestamp(" 2025-03-04 09:30 ").unwrap(), expected);
    }

    #[test]
    fn parse_timestamp_keeps_milliseconds() {
        let parsed = parse_timestamp("2025-03-04T23:59:59.999").unwrap();
        assert_eq!(parsed.and_utc().timestamp_subsec_millis(), 999);
    }

    #[test]
    fn parse_timestamp_accepts_rfc3339() {
        assert!(parse_timestamp("2025-03-04T09:30:00Z").is_ok());
        assert!(parse_timestamp("2025-03-04T09:30:00+02:00").is_ok());
    }

    #[test]
    fn parse_timestamp_rejects_garbage() {
        let err = parse_timestamp("yesterday-ish").unwrap_err();
        assert_eq!(err.to_string(), "invalid timestamp: yesterday-ish");
        assert!(parse_timestamp("2025-13-01T00:00:00").is_err());
        assert!(parse_timestamp("").is_err());
    }

    #[test]
    fn parse_date_roundtrip() {
        assert_eq!(
            parse_date("2025-02-28").unwrap(),
            NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()
        );
        assert!(parse_date("2025-02-30").is_err());
    }
}
