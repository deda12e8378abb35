//! Custom format definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::quality::Quality;
use crate::release::Protocol;

// ============================================================================
// Conditions
// ============================================================================

/// A single testable property of a release.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FormatCondition {
    /// Case-insensitive regex against the release title.
    ReleaseTitle { pattern: String },
    /// Case-insensitive regex against the parsed release group.
    ReleaseGroup { pattern: String },
    Quality { quality: Quality },
    /// Size range in bytes; a missing bound is open.
    Size {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_bytes: Option<u64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_bytes: Option<u64>,
    },
    Protocol { protocol: Protocol },
    Indexer { indexer_id: i64 },
}

impl FormatCondition {
    /// The regex pattern, for conditions that carry one.
    pub fn pattern(&self) -> Option<&str> {
        match self {
            FormatCondition::ReleaseTitle { pattern } | FormatCondition::ReleaseGroup { pattern } => {
                Some(pattern)
            }
            _ => None,
        }
    }
}

// ============================================================================
// Formats
// ============================================================================

/// One condition of a custom format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomFormatSpec {
    pub name: String,
    pub condition: FormatCondition,
    /// Invert the condition's result.
    #[serde(default)]
    pub negate: bool,
    /// Every required spec must hold. When a format has optional specs, at
    /// least one of them must hold too.
    #[serde(default)]
    pub required: bool,
}

impl CustomFormatSpec {
    pub fn new(name: impl Into<String>, condition: FormatCondition) -> Self {
        Self {
            name: name.into(),
            condition,
            negate: false,
            required: false,
        }
    }

    pub fn negated(mut self) -> Self {
        self.negate = true;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// A named set of conditions. Satisfied when every spec holds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomFormat {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub specs: Vec<CustomFormatSpec>,
}

impl CustomFormat {
    pub fn new(id: i64, name: impl Into<String>, specs: Vec<CustomFormatSpec>) -> Self {
        Self {
            id,
            name: name.into(),
            specs,
        }
    }
}

/// Errors raised while preparing custom formats.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CustomFormatError {
    #[error("Invalid pattern {pattern:?} in format '{format}', spec '{spec}': {message}")]
    InvalidPattern {
        format: String,
        spec: String,
        pattern: String,
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_deserialize() {
        let json = r#"[
            {"type": "release_title", "pattern": "\\bretail\\b"},
            {"type": "size", "max_bytes": 1048576},
            {"type": "protocol", "protocol": "torrent"},
            {"type": "quality", "quality": "epub"}
        ]"#;
        let conditions: Vec<FormatCondition> = serde_json::from_str(json).unwrap();

        assert_eq!(conditions[0].pattern(), Some("\\bretail\\b"));
        assert_eq!(
            conditions[1],
            FormatCondition::Size {
                min_bytes: None,
                max_bytes: Some(1048576)
            }
        );
        assert_eq!(
            conditions[2],
            FormatCondition::Protocol {
                protocol: Protocol::Torrent
            }
        );
        assert_eq!(conditions[3].pattern(), None);
    }

    #[test]
    fn test_spec_defaults() {
        let json = r#"{"name": "Retail", "condition": {"type": "release_title", "pattern": "retail"}}"#;
        let spec: CustomFormatSpec = serde_json::from_str(json).unwrap();
        assert!(!spec.negate);
        assert!(!spec.required);
    }

    #[test]
    fn test_error_display() {
        let err = CustomFormatError::InvalidPattern {
            format: "Retail".to_string(),
            spec: "title".to_string(),
            pattern: "(".to_string(),
            message: "unclosed group".to_string(),
        };
        assert!(err.to_string().starts_with("Invalid pattern \"(\" in format 'Retail'"));
    }
}
