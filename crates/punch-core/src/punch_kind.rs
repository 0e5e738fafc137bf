//! Punch kind enum as the single source of truth for punch kind strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The four clock actions an employee can record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PunchKind {
    ClockIn,
    BreakStart,
    BreakEnd,
    ClockOut,
}

impl PunchKind {
    /// String representation for storage and JSON.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ClockIn => "clock_in",
            Self::BreakStart => "break_start",
            Self::BreakEnd => "break_end",
            Self::ClockOut => "clock_out",
        }
    }
}

impl fmt::Display for PunchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PunchKind {
    type Err = UnknownPunchKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "clock_in" | "in" => Ok(Self::ClockIn),
            "break_start" => Ok(Self::BreakStart),
            "break_end" => Ok(Self::BreakEnd),
            "clock_out" | "out" => Ok(Self::ClockOut),
            _ => Err(UnknownPunchKind(s.to_string())),
        }
    }
}

impl Serialize for PunchKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PunchKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error type for unknown punch kind strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPunchKind(String);

impl fmt::Display for UnknownPunchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown punch kind: {}", self.0)
    }
}

impl std::error::Error for UnknownPunchKind {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_all_variants() {
        let variants = [
            PunchKind::ClockIn,
            PunchKind::BreakStart,
            PunchKind::BreakEnd,
            PunchKind::ClockOut,
        ];

        for variant in &variants {
            let s = variant.to_string();
            let parsed: PunchKind = s.parse().expect("should parse");
            assert_eq!(parsed, *variant, "roundtrip failed for {variant:?}");
        }
    }

    #[test]
    fn short_aliases_parse() {
        assert_eq!("in".parse::<PunchKind>().unwrap(), PunchKind::ClockIn);
        assert_eq!("out".parse::<PunchKind>().unwrap(), PunchKind::ClockOut);
    }

    #[test]
    fn unknown_kind_errors() {
        let result: Result<PunchKind, _> = "lunch".parse();
        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "unknown punch kind: lunch");
    }

    #[test]
    fn serde_uses_snake_case_names() {
        let json = serde_json::to_string(&PunchKind::BreakStart).unwrap();
        assert_eq!(json, "\"break_start\"");
        let parsed: PunchKind = serde_json::from_str("\"clock_out\"").unwrap();
        assert_eq!(parsed, PunchKind::ClockOut);
    }
}
