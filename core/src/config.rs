//! Declarative rule-set configuration (feature = `config`).
//!
//! These types mirror the runtime rule types but are serde-deserializable,
//! so a rule set can live in JSON next to the service that enforces it and
//! compile to a runtime [`Pattern`] via [`PatternConfig::build`].
//!
//! # Relationship to runtime types
//!
//! | Config type | Runtime type |
//! |-------------|--------------|
//! | [`PatternConfig`] | [`Pattern`] |
//! | [`RuleEntryConfig`] | one builder declaration |
//! | [`LeafConfig`] | [`LeafRule`](crate::LeafRule) |
//!
//! Rule entries are a sequence, not a map: declaration order is the match
//! order for regex-key rules and must survive deserialization.
//!
//! Config bounds are literals only; supplier bounds are a code-level
//! construct. Date bounds are RFC 3339 timestamps.
//!
//! # Example
//!
//! ```
//! use shape::{config, record};
//!
//! let pattern = config::from_json(r#"{
//!     "rules": [
//!         { "key": "name", "required": true,
//!           "spec": { "type": "string", "min_length": 1 } },
//!         { "key_regex": "^meta_",
//!           "spec": [ { "type": "string" }, { "type": "number" } ] }
//!     ]
//! }"#)?;
//!
//! assert!(pattern.matches(&record! { "name" => "Ada", "meta_rank" => 1 }));
//! # Ok::<(), shape::PatternError>(())
//! ```

use crate::{Pattern, PatternError, RuleSpec};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Deserialize;

/// A whole rule set, deserializable from JSON.
#[derive(Debug, Clone, Deserialize)]
pub struct PatternConfig {
    /// Rule declarations in order.
    pub rules: Vec<RuleEntryConfig>,
}

/// One rule declaration.
///
/// Exactly one of `key` (exact) or `key_regex` (regex-key rule) must be
/// set.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleEntryConfig {
    /// Exact record key this rule governs.
    #[serde(default)]
    pub key: Option<String>,
    /// Regex matched against record keys (unanchored search).
    #[serde(default)]
    pub key_regex: Option<String>,
    /// Whether the rule must be covered by some record key.
    #[serde(default)]
    pub required: bool,
    /// The expected value shape: one leaf, or an alternation.
    pub spec: LeafOrAlternation,
}

/// One leaf, or a sequence of leaves with OR semantics.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LeafOrAlternation {
    /// A single expected shape.
    One(LeafConfig),
    /// Alternatives tried in declaration order.
    Many(Vec<LeafConfig>),
}

/// The declared type of a leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeafKind {
    /// Text.
    String,
    /// A number.
    Number,
    /// A boolean.
    Boolean,
    /// An instant in time.
    Date,
    /// Any record value, contents unchecked.
    Object,
    /// Text satisfying `regexp`.
    Regexp,
    /// A record matching the nested `pattern` rule set.
    Pattern,
}

/// One expected value shape.
///
/// Bound fields apply per kind and are ignored otherwise: `min_length` /
/// `max_length` for `string`, `min` / `max` for `number`, `min_date` /
/// `max_date` for `date`, `regexp` for `regexp`, `pattern` for `pattern`.
#[derive(Debug, Clone, Deserialize)]
pub struct LeafConfig {
    /// The declared type.
    #[serde(rename = "type")]
    pub kind: LeafKind,
    /// Inclusive minimum string length.
    #[serde(default)]
    pub min_length: Option<usize>,
    /// Inclusive maximum string length.
    #[serde(default)]
    pub max_length: Option<usize>,
    /// Inclusive numeric minimum.
    #[serde(default)]
    pub min: Option<f64>,
    /// Inclusive numeric maximum.
    #[serde(default)]
    pub max: Option<f64>,
    /// Inclusive earliest instant (RFC 3339).
    #[serde(default)]
    pub min_date: Option<DateTime<Utc>>,
    /// Inclusive latest instant (RFC 3339).
    #[serde(default)]
    pub max_date: Option<DateTime<Utc>>,
    /// Value regex for `regexp` leaves.
    #[serde(default)]
    pub regexp: Option<String>,
    /// Nested rule set for `pattern` leaves.
    #[serde(default)]
    pub pattern: Option<PatternConfig>,
}

impl PatternConfig {
    /// Compile this config into a runtime [`Pattern`].
    ///
    /// # Errors
    ///
    /// [`PatternError::InvalidConfig`] for structural problems in the
    /// config itself (ambiguous key form, missing `regexp`/`pattern`
    /// payloads, malformed value regex), plus every
    /// [`PatternBuilder::build`](crate::PatternBuilder::build) error.
    pub fn build(&self) -> Result<Pattern, PatternError> {
        let mut builder = Pattern::builder();
        for entry in &self.rules {
            let spec = entry.to_spec()?;
            builder = match (&entry.key, &entry.key_regex) {
                (Some(key), None) => builder.rule(key.clone(), spec),
                (None, Some(pattern)) => builder.regex_rule(pattern.clone(), spec),
                _ => {
                    return Err(PatternError::InvalidConfig {
                        source: "rule entry must set exactly one of `key` or `key_regex`"
                            .to_string(),
                    })
                }
            };
        }
        builder.build()
    }
}

impl RuleEntryConfig {
    fn to_spec(&self) -> Result<RuleSpec, PatternError> {
        let leaves = match &self.spec {
            LeafOrAlternation::One(leaf) => std::slice::from_ref(leaf),
            LeafOrAlternation::Many(leaves) => leaves.as_slice(),
        };
        let mut iter = leaves.iter();
        let first = iter.next().ok_or_else(|| PatternError::InvalidConfig {
            source: "rule alternation must declare at least one type".to_string(),
        })?;
        let mut spec = first.to_spec()?;
        for leaf in iter {
            spec = spec.or(leaf.to_spec()?);
        }
        Ok(if self.required { spec.required() } else { spec })
    }
}

impl LeafConfig {
    fn to_spec(&self) -> Result<RuleSpec, PatternError> {
        match self.kind {
            LeafKind::String => {
                let mut spec = RuleSpec::string();
                if let Some(min) = self.min_length {
                    spec = spec.min_length(min);
                }
                if let Some(max) = self.max_length {
                    spec = spec.max_length(max);
                }
                Ok(spec)
            }
            LeafKind::Number => {
                let mut spec = RuleSpec::number();
                if let Some(min) = self.min {
                    spec = spec.min(min);
                }
                if let Some(max) = self.max {
                    spec = spec.max(max);
                }
                Ok(spec)
            }
            LeafKind::Boolean => Ok(RuleSpec::boolean()),
            LeafKind::Date => {
                let mut spec = RuleSpec::date();
                if let Some(min) = self.min_date {
                    spec = spec.min_date(min);
                }
                if let Some(max) = self.max_date {
                    spec = spec.max_date(max);
                }
                Ok(spec)
            }
            LeafKind::Object => Ok(RuleSpec::object()),
            LeafKind::Regexp => {
                let Some(pattern) = &self.regexp else {
                    return Err(PatternError::InvalidConfig {
                        source: "`regexp` leaf requires a `regexp` field".to_string(),
                    });
                };
                let regex = Regex::new(pattern).map_err(|e| PatternError::InvalidConfig {
                    source: format!("invalid value regexp \"{pattern}\": {e}"),
                })?;
                Ok(RuleSpec::regexp(regex))
            }
            LeafKind::Pattern => {
                let Some(nested) = &self.pattern else {
                    return Err(PatternError::InvalidConfig {
                        source: "`pattern` leaf requires a `pattern` field".to_string(),
                    });
                };
                Ok(RuleSpec::nested(nested.build()?))
            }
        }
    }
}

/// Parse a JSON rule set and compile it to a [`Pattern`].
///
/// # Errors
///
/// [`PatternError::InvalidConfig`] for malformed JSON, plus every
/// [`PatternConfig::build`] error.
pub fn from_json(json: &str) -> Result<Pattern, PatternError> {
    let config: PatternConfig =
        serde_json::from_str(json).map_err(|e| PatternError::InvalidConfig {
            source: e.to_string(),
        })?;
    config.build()
}
