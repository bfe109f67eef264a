//! `ValidationError` — the closed diagnostic taxonomy
//!
//! Validation failures are values, not exceptions: the engine stores them
//! in the [`MatchReport`](crate::MatchReport) and keeps going, so a single
//! `test` call always produces the complete per-key error map.
//!
//! The rendered `Display` messages are a stable contract — consumers log
//! them or surface them to end users verbatim.

use crate::Value;
use std::fmt;

/// One validation failure for one record key (or one missing required rule).
///
/// Each variant carries the expected constraint and the offending value.
///
/// # Example
///
/// ```
/// use shape::{Value, ValidationError};
///
/// let err = ValidationError::InvalidType {
///     expected: "string",
///     value: Value::from(10),
/// };
/// assert_eq!(err.to_string(), "Invalid type: expected (string) - value is (10)");
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum ValidationError {
    /// The value's runtime type does not match the rule's declared type.
    InvalidType {
        /// The declared type name (`"string"`, `"number"`, ...).
        expected: &'static str,
        /// The offending value.
        value: Value,
    },
    /// A string is shorter than the rule's minimum length.
    InvalidMinLength {
        /// The resolved minimum length.
        expected: usize,
        /// The offending value.
        value: Value,
    },
    /// A string is longer than the rule's maximum length.
    InvalidMaxLength {
        /// The resolved maximum length.
        expected: usize,
        /// The offending value.
        value: Value,
    },
    /// A number or date is below the rule's minimum (bounds are inclusive).
    InvalidMinValue {
        /// The resolved minimum.
        expected: Value,
        /// The offending value.
        value: Value,
    },
    /// A number or date is above the rule's maximum (bounds are inclusive).
    InvalidMaxValue {
        /// The resolved maximum.
        expected: Value,
        /// The offending value.
        value: Value,
    },
    /// A string does not satisfy the rule's regular expression.
    InvalidRegexp {
        /// The resolved regex pattern text.
        expected: String,
        /// The offending value.
        value: Value,
    },
    /// The record contains a key no rule resolves for.
    InvalidKey {
        /// The unresolvable key.
        key: String,
    },
    /// A required rule had no covering key in the record.
    ///
    /// Keyed by the rule's declaration: the literal key for exact rules,
    /// the original pattern text for regex-key rules.
    RequiredNotMatched {
        /// The uncovered declaration.
        key: String,
    },
}

impl ValidationError {
    /// A short machine-friendly name for the error kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidType { .. } => "invalid_type",
            Self::InvalidMinLength { .. } => "invalid_min_length",
            Self::InvalidMaxLength { .. } => "invalid_max_length",
            Self::InvalidMinValue { .. } => "invalid_min_value",
            Self::InvalidMaxValue { .. } => "invalid_max_value",
            Self::InvalidRegexp { .. } => "invalid_regexp",
            Self::InvalidKey { .. } => "invalid_key",
            Self::RequiredNotMatched { .. } => "required_not_matched",
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidType { expected, value } => {
                write!(f, "Invalid type: expected ({expected}) - value is ({value})")
            }
            Self::InvalidMinLength { expected, value } => {
                write!(
                    f,
                    "Invalid minimum length: expected ({expected}) - value is ({value})"
                )
            }
            Self::InvalidMaxLength { expected, value } => {
                write!(
                    f,
                    "Invalid maximum length: expected ({expected}) - value is ({value})"
                )
            }
            Self::InvalidMinValue { expected, value } => {
                write!(
                    f,
                    "Invalid minimum value: expected ({expected}) - value is ({value})"
                )
            }
            Self::InvalidMaxValue { expected, value } => {
                write!(
                    f,
                    "Invalid maximum value: expected ({expected}) - value is ({value})"
                )
            }
            Self::InvalidRegexp { expected, value } => {
                write!(
                    f,
                    "Invalid regexp: expected ({expected}) - value is ({value})"
                )
            }
            Self::InvalidKey { key } => {
                write!(f, "Invalid key: no rule found for the key ({key})")
            }
            Self::RequiredNotMatched { key } => {
                write!(f, "Required pattern not matched for the key ({key})")
            }
        }
    }
}

impl std::error::Error for ValidationError {}
