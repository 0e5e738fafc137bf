//! Punch events as recorded by employees.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::punch_kind::PunchKind;
use crate::types::{PunchId, SubjectId, ValidationError, parse_timestamp};

/// A single timestamped clock action.
///
/// `occurred_at` is local wall-clock time; every day-boundary rule in the
/// engine works on its calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PunchEvent {
    /// Store identifier, when the punch came from a store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PunchId>,
    /// The employee who punched.
    pub subject_id: SubjectId,
    /// Which clock action this is.
    pub kind: PunchKind,
    /// When it happened (local time).
    pub occurred_at: NaiveDateTime,
    /// Classification tag; only meaningful on clock-ins.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Work-site label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Soft-delete flag. Inactive punches never reach the reconstructor.
    #[serde(default = "default_active")]
    pub active: bool,
}

const fn default_active() -> bool {
    true
}

impl PunchEvent {
    /// Creates an active punch with no category or location.
    pub fn new(subject_id: SubjectId, kind: PunchKind, occurred_at: NaiveDateTime) -> Self {
        Self {
            id: None,
            subject_id,
            kind,
            occurred_at,
            category: None,
            location: None,
            active: true,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: PunchId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    #[must_use]
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

/// An unvalidated punch as it arrives from an import file or a store row.
///
/// Converting it with [`RawPunch::validate`] is where missing subjects and
/// unparseable timestamps are rejected, before any reconstruction runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPunch {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub subject_id: String,
    pub kind: String,
    pub occurred_at: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

impl RawPunch {
    /// Validates the record into a [`PunchEvent`].
    pub fn validate(self) -> Result<PunchEvent, ValidationError> {
        let subject_id = SubjectId::new(self.subject_id)?;
        let kind = self.kind.trim().parse::<PunchKind>()?;
        let occurred_at = parse_timestamp(&self.occurred_at)?;
        let id = self
            .id
            .filter(|id| !id.trim().is_empty())
            .map(PunchId::new)
            .transpose()?;
        Ok(PunchEvent {
            id,
            subject_id,
            kind,
            occurred_at,
            category: non_blank(self.category),
            location: non_blank(self.location),
            active: self.active,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(subject: &str, kind: &str, at: &str) -> RawPunch {
        RawPunch {
            id: None,
            subject_id: subject.to_string(),
            kind: kind.to_string(),
            occurred_at: at.to_string(),
            category: None,
            location: None,
            active: true,
        }
    }

    #[test]
    fn validate_builds_event() {
        let mut record = raw("emp-1", "clock_in", "2025-01-15T09:00:00");
        record.category = Some(" training ".to_string());
        record.location = Some(String::new());
        let event = record.validate().unwrap();
        assert_eq!(event.subject_id.as_str(), "emp-1");
        assert_eq!(event.kind, PunchKind::ClockIn);
        assert_eq!(event.category.as_deref(), Some("training"));
        assert_eq!(event.location, None);
        assert!(event.active);
    }

    #[test]
    fn validate_rejects_missing_subject() {
        let err = raw("", "clock_in", "2025-01-15T09:00:00")
            .validate()
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::Empty {
                field: "subject ID"
            }
        );
    }

    #[test]
    fn validate_rejects_bad_timestamp() {
        let err = raw("emp-1", "clock_in", "15/01/2025 9am")
            .validate()
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidTimestamp { .. }));
    }

    #[test]
    fn validate_rejects_unknown_kind() {
        let err = raw("emp-1", "lunch", "2025-01-15T09:00:00")
            .validate()
            .unwrap_err();
        assert_eq!(err.to_string(), "unknown punch kind: lunch");
    }

    #[test]
    fn raw_punch_defaults_to_active() {
        let json = r#"{"subject_id":"emp-1","kind":"clock_out","occurred_at":"2025-01-15T17:00:00"}"#;
        let parsed: RawPunch = serde_json::from_str(json).unwrap();
        assert!(parsed.active);
        assert!(parsed.validate().is_ok());
    }
}
