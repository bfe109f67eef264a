//! `MatchReport` — the per-key outcome of a `test` call

use crate::ValidationError;
use std::collections::BTreeMap;

/// The outcome of [`Pattern::test`](crate::Pattern::test): a matched flag
/// plus one error per offending or missing key.
///
/// `matched()` is `true` iff the error map is empty — there is no third
/// state.
///
/// # Example
///
/// ```
/// use shape::{record, Pattern, RuleSpec};
///
/// let pattern = Pattern::builder()
///     .rule("name", RuleSpec::string())
///     .build()?;
///
/// let report = pattern.test(&record! { "name" => 10 });
/// assert!(!report.matched());
/// assert!(report.error("name").is_some());
/// # Ok::<(), shape::PatternError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MatchReport {
    matched: bool,
    errors: BTreeMap<String, ValidationError>,
}

impl MatchReport {
    pub(crate) fn new(errors: BTreeMap<String, ValidationError>) -> Self {
        Self {
            matched: errors.is_empty(),
            errors,
        }
    }

    /// Whether the record satisfied every rule and required coverage.
    #[must_use]
    pub fn matched(&self) -> bool {
        self.matched
    }

    /// All per-key errors, keyed by record key (or, for missing required
    /// rules, by the rule's declaration).
    #[must_use]
    pub fn errors(&self) -> &BTreeMap<String, ValidationError> {
        &self.errors
    }

    /// The error recorded for one key, if any.
    #[must_use]
    pub fn error(&self, key: &str) -> Option<&ValidationError> {
        self.errors.get(key)
    }

    /// Number of errors in the report.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "serde")]
    #[test]
    fn test_report_serializes_with_tagged_errors() {
        use crate::{record, Pattern, RuleSpec};

        let pattern = Pattern::builder()
            .rule("name", RuleSpec::string().required())
            .rule("age", RuleSpec::number())
            .build()
            .unwrap();
        let report = pattern.test(&record! { "age" => "x", "extra" => true });

        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            serde_json::json!({
                "matched": false,
                "errors": {
                    "age": {
                        "kind": "invalid_type",
                        "expected": "number",
                        "value": "x",
                    },
                    "extra": { "kind": "invalid_key", "key": "extra" },
                    "name": { "kind": "required_not_matched", "key": "name" },
                }
            })
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_bound_errors_serialize_resolved_constraints() {
        use crate::Value;

        let err = ValidationError::InvalidMinLength {
            expected: 3,
            value: Value::from("ab"),
        };
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            serde_json::json!({
                "kind": "invalid_min_length",
                "expected": 3,
                "value": "ab",
            })
        );

        let err = ValidationError::InvalidMaxValue {
            expected: Value::from(3.0),
            value: Value::from(4.0),
        };
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            serde_json::json!({
                "kind": "invalid_max_value",
                "expected": 3.0,
                "value": 4.0,
            })
        );
    }

    #[test]
    fn test_matched_iff_no_errors() {
        let report = MatchReport::new(BTreeMap::new());
        assert!(report.matched());
        assert_eq!(report.error_count(), 0);

        let mut errors = BTreeMap::new();
        errors.insert(
            "age".to_string(),
            ValidationError::InvalidKey { key: "age".into() },
        );
        let report = MatchReport::new(errors);
        assert!(!report.matched());
        assert_eq!(report.error_count(), 1);
        assert_eq!(
            report.error("age"),
            Some(&ValidationError::InvalidKey { key: "age".into() })
        );
        assert_eq!(report.error("name"), None);
    }
}
