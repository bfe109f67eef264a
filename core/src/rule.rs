//! `LeafRule` / `RuleSpec` — the closed set of type matchers
//!
//! A [`LeafRule`] describes one expected value shape; dispatch is a `match`
//! over the closed enum, so adding a leaf kind is a compile-checked change
//! rather than a runtime-table edit. A [`RuleSpec`] is one leaf or an
//! alternation of leaves plus the required flag.
//!
//! # Evaluation contract
//!
//! - Type is checked before bounds; a value can fail for exactly one reason.
//! - Numeric and date bounds are inclusive.
//! - String length bounds count Unicode scalars.
//! - Alternation tries leaves in declaration order, succeeds on the first
//!   success, and surfaces the error of the LAST attempted leaf otherwise.

use crate::{Bound, Pattern, RegexSource, ValidationError, Value};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// One expected value shape: a type plus optional bounds.
#[derive(Debug, Clone)]
pub enum LeafRule {
    /// Text, optionally length-bounded.
    String {
        /// Inclusive minimum length in Unicode scalars.
        min_length: Option<Bound<usize>>,
        /// Inclusive maximum length in Unicode scalars.
        max_length: Option<Bound<usize>>,
    },
    /// A number, optionally bounded (inclusive).
    Number {
        /// Inclusive minimum.
        min: Option<Bound<f64>>,
        /// Inclusive maximum.
        max: Option<Bound<f64>>,
    },
    /// A boolean. No bounds.
    Boolean,
    /// An instant, optionally bounded (inclusive, compared by instant).
    Date {
        /// Inclusive earliest instant.
        min: Option<Bound<DateTime<Utc>>>,
        /// Inclusive latest instant.
        max: Option<Bound<DateTime<Utc>>>,
    },
    /// Any record value, contents unchecked — the opaque-blob leaf.
    /// Lists and nulls are rejected.
    Object,
    /// Text that must satisfy a regular expression (unanchored search).
    Regexp(RegexSource),
    /// A record validated recursively against a nested [`Pattern`].
    ///
    /// A nested mismatch surfaces as one opaque type error at the parent
    /// key; the nested per-field diagnostics are not hoisted.
    Pattern(Arc<Pattern>),
}

impl LeafRule {
    /// The declared type name, as used in `InvalidType` diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::String { .. } => "string",
            Self::Number { .. } => "number",
            Self::Boolean => "boolean",
            Self::Date { .. } => "date",
            Self::Object => "object",
            Self::Regexp(_) => "regexp",
            Self::Pattern(_) => "pattern",
        }
    }

    /// Nesting depth contributed by this leaf (0 unless it nests a pattern).
    pub(crate) fn depth(&self) -> usize {
        match self {
            Self::Pattern(p) => p.depth(),
            _ => 0,
        }
    }

    /// Evaluate one leaf against a candidate value.
    pub(crate) fn check(&self, value: &Value) -> Result<(), ValidationError> {
        match self {
            Self::String {
                min_length,
                max_length,
            } => {
                let Value::String(s) = value else {
                    return Err(invalid_type("string", value));
                };
                if let Some(bound) = min_length {
                    let min = bound.resolve();
                    if s.chars().count() < min {
                        return Err(ValidationError::InvalidMinLength {
                            expected: min,
                            value: value.clone(),
                        });
                    }
                }
                if let Some(bound) = max_length {
                    let max = bound.resolve();
                    if s.chars().count() > max {
                        return Err(ValidationError::InvalidMaxLength {
                            expected: max,
                            value: value.clone(),
                        });
                    }
                }
                Ok(())
            }
            Self::Number { min, max } => {
                let Value::Number(n) = value else {
                    return Err(invalid_type("number", value));
                };
                if let Some(bound) = min {
                    let m = bound.resolve();
                    // NaN fails every bound.
                    if !(*n >= m) {
                        return Err(ValidationError::InvalidMinValue {
                            expected: Value::Number(m),
                            value: value.clone(),
                        });
                    }
                }
                if let Some(bound) = max {
                    let m = bound.resolve();
                    if !(*n <= m) {
                        return Err(ValidationError::InvalidMaxValue {
                            expected: Value::Number(m),
                            value: value.clone(),
                        });
                    }
                }
                Ok(())
            }
            Self::Boolean => match value {
                Value::Bool(_) => Ok(()),
                _ => Err(invalid_type("boolean", value)),
            },
            Self::Date { min, max } => {
                let Value::Date(t) = value else {
                    return Err(invalid_type("date", value));
                };
                if let Some(bound) = min {
                    let m = bound.resolve();
                    if *t < m {
                        return Err(ValidationError::InvalidMinValue {
                            expected: Value::Date(m),
                            value: value.clone(),
                        });
                    }
                }
                if let Some(bound) = max {
                    let m = bound.resolve();
                    if *t > m {
                        return Err(ValidationError::InvalidMaxValue {
                            expected: Value::Date(m),
                            value: value.clone(),
                        });
                    }
                }
                Ok(())
            }
            Self::Object => match value {
                Value::Record(_) => Ok(()),
                _ => Err(invalid_type("object", value)),
            },
            Self::Regexp(source) => {
                let Value::String(s) = value else {
                    return Err(invalid_type("string", value));
                };
                let re = source.resolve();
                if re.is_match(s) {
                    Ok(())
                } else {
                    Err(ValidationError::InvalidRegexp {
                        expected: re.as_str().to_string(),
                        value: value.clone(),
                    })
                }
            }
            Self::Pattern(nested) => {
                let Value::Record(record) = value else {
                    return Err(invalid_type("object", value));
                };
                if nested.matches(record) {
                    Ok(())
                } else {
                    // Opaque boundary: one type error, no hoisted details.
                    Err(invalid_type("pattern", value))
                }
            }
        }
    }
}

fn invalid_type(expected: &'static str, value: &Value) -> ValidationError {
    ValidationError::InvalidType {
        expected,
        value: value.clone(),
    }
}

/// The expected shape of one rule's value: a leaf, or an alternation of
/// leaves, plus the required flag.
///
/// Built with chainable constructors; bound setters apply to the most
/// recently declared leaf.
///
/// # Example
///
/// ```
/// use shape::RuleSpec;
///
/// // string at least 3 scalars long, OR any number; mandatory
/// let spec = RuleSpec::string()
///     .min_length(3)
///     .or(RuleSpec::number())
///     .required();
/// assert_eq!(spec.leaves().len(), 2);
/// assert!(spec.is_required());
/// ```
#[derive(Debug, Clone)]
pub struct RuleSpec {
    leaves: Vec<LeafRule>,
    required: bool,
}

impl RuleSpec {
    /// A rule built around one leaf.
    #[must_use]
    pub fn of(leaf: LeafRule) -> Self {
        Self {
            leaves: vec![leaf],
            required: false,
        }
    }

    /// Expect text.
    #[must_use]
    pub fn string() -> Self {
        Self::of(LeafRule::String {
            min_length: None,
            max_length: None,
        })
    }

    /// Expect a number.
    #[must_use]
    pub fn number() -> Self {
        Self::of(LeafRule::Number {
            min: None,
            max: None,
        })
    }

    /// Expect a boolean.
    #[must_use]
    pub fn boolean() -> Self {
        Self::of(LeafRule::Boolean)
    }

    /// Expect a date.
    #[must_use]
    pub fn date() -> Self {
        Self::of(LeafRule::Date {
            min: None,
            max: None,
        })
    }

    /// Expect any record value, contents unchecked.
    #[must_use]
    pub fn object() -> Self {
        Self::of(LeafRule::Object)
    }

    /// Expect text satisfying a regular expression.
    #[must_use]
    pub fn regexp(source: impl Into<RegexSource>) -> Self {
        Self::of(LeafRule::Regexp(source.into()))
    }

    /// Expect a record matching a nested [`Pattern`].
    #[must_use]
    pub fn nested(pattern: impl Into<Arc<Pattern>>) -> Self {
        Self::of(LeafRule::Pattern(pattern.into()))
    }

    /// Add an alternative: the value may satisfy `other`'s leaves instead.
    ///
    /// Leaves are tried in declaration order; the first success wins, and
    /// when all fail the last leaf's error is surfaced.
    #[must_use]
    pub fn or(mut self, other: RuleSpec) -> Self {
        self.leaves.extend(other.leaves);
        self
    }

    /// Mark this rule as mandatory for required-coverage bookkeeping.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Whether this rule is mandatory.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// The alternation's leaves in declaration order.
    #[must_use]
    pub fn leaves(&self) -> &[LeafRule] {
        &self.leaves
    }

    /// Set the inclusive minimum length on the last declared string leaf.
    ///
    /// Debug builds panic when the last declared leaf is not a string
    /// leaf; release builds ignore the call.
    #[must_use]
    pub fn min_length(mut self, bound: impl Into<Bound<usize>>) -> Self {
        match self.leaves.last_mut() {
            Some(LeafRule::String { min_length, .. }) => *min_length = Some(bound.into()),
            _ => debug_assert!(false, "min_length() applies to string rules"),
        }
        self
    }

    /// Set the inclusive maximum length on the last declared string leaf.
    ///
    /// Debug builds panic when the last declared leaf is not a string
    /// leaf; release builds ignore the call.
    #[must_use]
    pub fn max_length(mut self, bound: impl Into<Bound<usize>>) -> Self {
        match self.leaves.last_mut() {
            Some(LeafRule::String { max_length, .. }) => *max_length = Some(bound.into()),
            _ => debug_assert!(false, "max_length() applies to string rules"),
        }
        self
    }

    /// Set the inclusive minimum on the last declared number leaf.
    ///
    /// Debug builds panic when the last declared leaf is not a number
    /// leaf; release builds ignore the call.
    #[must_use]
    pub fn min(mut self, bound: impl Into<Bound<f64>>) -> Self {
        match self.leaves.last_mut() {
            Some(LeafRule::Number { min, .. }) => *min = Some(bound.into()),
            _ => debug_assert!(false, "min() applies to number rules"),
        }
        self
    }

    /// Set the inclusive maximum on the last declared number leaf.
    ///
    /// Debug builds panic when the last declared leaf is not a number
    /// leaf; release builds ignore the call.
    #[must_use]
    pub fn max(mut self, bound: impl Into<Bound<f64>>) -> Self {
        match self.leaves.last_mut() {
            Some(LeafRule::Number { max, .. }) => *max = Some(bound.into()),
            _ => debug_assert!(false, "max() applies to number rules"),
        }
        self
    }

    /// Set the inclusive earliest instant on the last declared date leaf.
    ///
    /// Debug builds panic when the last declared leaf is not a date
    /// leaf; release builds ignore the call.
    #[must_use]
    pub fn min_date(mut self, bound: impl Into<Bound<DateTime<Utc>>>) -> Self {
        match self.leaves.last_mut() {
            Some(LeafRule::Date { min, .. }) => *min = Some(bound.into()),
            _ => debug_assert!(false, "min_date() applies to date rules"),
        }
        self
    }

    /// Set the inclusive latest instant on the last declared date leaf.
    ///
    /// Debug builds panic when the last declared leaf is not a date
    /// leaf; release builds ignore the call.
    #[must_use]
    pub fn max_date(mut self, bound: impl Into<Bound<DateTime<Utc>>>) -> Self {
        match self.leaves.last_mut() {
            Some(LeafRule::Date { max, .. }) => *max = Some(bound.into()),
            _ => debug_assert!(false, "max_date() applies to date rules"),
        }
        self
    }

    /// Nesting depth contributed by this rule's deepest leaf.
    pub(crate) fn depth(&self) -> usize {
        self.leaves.iter().map(LeafRule::depth).max().unwrap_or(0)
    }

    /// Evaluate the alternation against a candidate value.
    ///
    /// First success wins; when every leaf fails, the LAST attempted
    /// leaf's error is surfaced as the representative diagnostic.
    pub(crate) fn check(&self, value: &Value) -> Result<(), ValidationError> {
        let mut last_error = None;
        for leaf in &self.leaves {
            match leaf.check(value) {
                Ok(()) => return Ok(()),
                Err(err) => last_error = Some(err),
            }
        }
        // A spec with no leaves is unconstructible through the public API;
        // treat it as vacuously satisfied.
        last_error.map_or(Ok(()), Err)
    }
}
