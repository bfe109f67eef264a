//! `Pattern` — compiled rule set with first-match-wins key resolution
//!
//! Construction partitions rules into exact-key rules and regex-key rules
//! (declaration order preserved) and records which declarations are
//! mandatory. Evaluation walks the record's keys, resolves each to a rule
//! (exact match wins unconditionally, then regex rules in declaration
//! order), evaluates the value, and aggregates every outcome into one
//! [`MatchReport`] — no per-key failure aborts the pass.

use crate::{
    MatchReport, PatternError, Record, RuleSpec, ValidationError, MAX_KEY_PATTERN_LENGTH,
    MAX_NESTING_DEPTH, MAX_RULES,
};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

/// A rule whose applicability is decided by matching record keys against a
/// regular expression. Carries the original pattern text: that text is the
/// unit of required-coverage bookkeeping and the key of
/// `RequiredNotMatched` diagnostics.
#[derive(Debug, Clone)]
struct RegexRule {
    source: String,
    regex: Regex,
    spec: RuleSpec,
}

/// An immutable compiled rule set usable to validate [`Record`]s.
///
/// Built once via [`Pattern::builder`], then shared freely: `Pattern` is
/// `Send + Sync` and `test`/`matches` take `&self`, so threads validate
/// concurrently without coordination (provided bound suppliers are pure).
///
/// # Precedence
///
/// - An exact-key rule always beats any regex rule, even when a regex
///   would also match the literal key — declare a specific override for
///   one key while a catch-all regex covers the rest.
/// - Among regex rules, the first declared wins. This ordering is an
///   observable contract.
///
/// # Example
///
/// ```
/// use shape::{record, Pattern, RuleSpec};
///
/// let pattern = Pattern::builder()
///     .rule("name", RuleSpec::string().min_length(1).required())
///     .rule("age", RuleSpec::number().min(0.0))
///     .build()?;
///
/// assert!(pattern.matches(&record! { "name" => "Ada", "age" => 36 }));
/// assert!(!pattern.matches(&record! { "age" => 36 }));
/// # Ok::<(), shape::PatternError>(())
/// ```
pub struct Pattern {
    exact: HashMap<String, RuleSpec>,
    regex_rules: Vec<RegexRule>,
    required: BTreeSet<String>,
    depth: usize,
}

impl Pattern {
    /// Start building a pattern.
    #[must_use]
    pub fn builder() -> PatternBuilder {
        PatternBuilder::new()
    }

    /// Returns `true` if the record complies with every rule.
    ///
    /// Sugar over [`test`](Self::test).
    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        self.test(record).matched()
    }

    /// Validate a record and return the complete per-key outcome.
    ///
    /// Every key is evaluated; failures are collected, never thrown. A key
    /// with no resolvable rule yields `InvalidKey` and is otherwise
    /// ignored. After the walk, every required declaration with no
    /// covering key yields `RequiredNotMatched` keyed by that declaration.
    ///
    /// A key counts as covering its rule even when its value fails
    /// validation: coverage tracks key resolution, not value success.
    #[must_use]
    pub fn test(&self, record: &Record) -> MatchReport {
        let mut errors: BTreeMap<String, ValidationError> = BTreeMap::new();
        let mut covered: BTreeSet<&str> = BTreeSet::new();

        for (key, value) in record {
            let Some((spec, coverage)) = self.resolve(key) else {
                errors.insert(
                    key.clone(),
                    ValidationError::InvalidKey { key: key.clone() },
                );
                continue;
            };
            if let Err(err) = spec.check(value) {
                errors.insert(key.clone(), err);
            }
            covered.insert(coverage);
        }

        for declaration in &self.required {
            if !covered.contains(declaration.as_str()) {
                errors.insert(
                    declaration.clone(),
                    ValidationError::RequiredNotMatched {
                        key: declaration.clone(),
                    },
                );
            }
        }

        MatchReport::new(errors)
    }

    /// The rule that governs a key, if any.
    ///
    /// Exact rules win unconditionally; regex rules are scanned in
    /// declaration order.
    #[must_use]
    pub fn rule_for_key(&self, key: &str) -> Option<&RuleSpec> {
        self.resolve(key).map(|(spec, _)| spec)
    }

    /// Resolve a key to its rule plus the coverage declaration (the
    /// literal key for exact rules, the original pattern text for regex
    /// rules).
    fn resolve(&self, key: &str) -> Option<(&RuleSpec, &str)> {
        if let Some((declared, spec)) = self.exact.get_key_value(key) {
            return Some((spec, declared.as_str()));
        }
        self.regex_rules
            .iter()
            .find(|rule| rule.regex.is_match(key))
            .map(|rule| (&rule.spec, rule.source.as_str()))
    }

    /// Nesting depth of this pattern (1 for a flat pattern).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of rules (exact plus regex).
    #[must_use]
    pub fn len(&self) -> usize {
        self.exact.len() + self.regex_rules.len()
    }

    /// Returns `true` if no rules are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.regex_rules.is_empty()
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pattern")
            .field("exact_rules", &self.exact.len())
            .field("regex_rules", &self.regex_rules.len())
            .field("required", &self.required.len())
            .field("depth", &self.depth)
            .finish()
    }
}

/// Builder for [`Pattern`].
///
/// Regex-key rules are declared through [`regex_rule`](Self::regex_rule),
/// an explicit variant rather than a sigil-prefixed key string, so the only
/// construction failure modes are a malformed key regex and the structural
/// guards.
#[derive(Debug, Default)]
pub struct PatternBuilder {
    entries: Vec<(KeyDecl, RuleSpec)>,
}

#[derive(Debug)]
enum KeyDecl {
    Exact(String),
    Regex(String),
}

impl PatternBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a rule for one exact key.
    ///
    /// Declaring the same key twice keeps the last declaration.
    #[must_use]
    pub fn rule(mut self, key: impl Into<String>, spec: RuleSpec) -> Self {
        self.entries.push((KeyDecl::Exact(key.into()), spec));
        self
    }

    /// Declare a rule whose applicability is decided by matching record
    /// keys against `pattern` (unanchored search). Declaration order is
    /// the match order.
    #[must_use]
    pub fn regex_rule(mut self, pattern: impl Into<String>, spec: RuleSpec) -> Self {
        self.entries.push((KeyDecl::Regex(pattern.into()), spec));
        self
    }

    /// Compile the declarations into an immutable [`Pattern`].
    ///
    /// # Errors
    ///
    /// - [`PatternError::InvalidKeyPattern`] if a key regex does not compile
    /// - [`PatternError::KeyPatternTooLong`] if a key regex exceeds
    ///   [`MAX_KEY_PATTERN_LENGTH`]
    /// - [`PatternError::TooManyRules`] past [`MAX_RULES`]
    /// - [`PatternError::DepthExceeded`] if `pattern`-typed leaves nest
    ///   deeper than [`MAX_NESTING_DEPTH`]
    pub fn build(self) -> Result<Pattern, PatternError> {
        if self.entries.len() > MAX_RULES {
            return Err(PatternError::TooManyRules {
                count: self.entries.len(),
                max: MAX_RULES,
            });
        }

        let mut exact: HashMap<String, RuleSpec> = HashMap::new();
        let mut regex_rules: Vec<RegexRule> = Vec::new();

        for (decl, spec) in self.entries {
            match decl {
                KeyDecl::Exact(key) => {
                    // Last declaration wins, like a literal rule map.
                    exact.insert(key, spec);
                }
                KeyDecl::Regex(pattern) => {
                    if pattern.len() > MAX_KEY_PATTERN_LENGTH {
                        return Err(PatternError::KeyPatternTooLong {
                            len: pattern.len(),
                            max: MAX_KEY_PATTERN_LENGTH,
                        });
                    }
                    let regex = Regex::new(&pattern).map_err(|e| {
                        PatternError::InvalidKeyPattern {
                            pattern: pattern.clone(),
                            source: e.to_string(),
                        }
                    })?;
                    regex_rules.push(RegexRule {
                        source: pattern,
                        regex,
                        spec,
                    });
                }
            }
        }

        let leaf_depth = exact
            .values()
            .chain(regex_rules.iter().map(|r| &r.spec))
            .map(RuleSpec::depth)
            .max()
            .unwrap_or(0);
        let depth = 1 + leaf_depth;
        if depth > MAX_NESTING_DEPTH {
            return Err(PatternError::DepthExceeded {
                depth,
                max: MAX_NESTING_DEPTH,
            });
        }

        let mut required = BTreeSet::new();
        for (key, spec) in &exact {
            if spec.is_required() {
                required.insert(key.clone());
            }
        }
        for rule in &regex_rules {
            if rule.spec.is_required() {
                required.insert(rule.source.clone());
            }
        }

        Ok(Pattern {
            exact,
            regex_rules,
            required,
            depth,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{record, RuleSpec};

    #[test]
    fn test_exact_rule_wins_over_regex() {
        let pattern = Pattern::builder()
            .regex_rule("[age]", RuleSpec::string())
            .rule("age", RuleSpec::number())
            .build()
            .unwrap();

        assert!(pattern.matches(&record! { "age" => 10 }));
        assert!(!pattern.matches(&record! { "age" => "Qux" }));
    }

    #[test]
    fn test_first_declared_regex_wins() {
        let pattern = Pattern::builder()
            .regex_rule("[name|age]", RuleSpec::string())
            .regex_rule("[age|time]", RuleSpec::number())
            .build()
            .unwrap();

        assert!(pattern.matches(&record! { "age" => "Pixel" }));
        assert!(!pattern.matches(&record! { "age" => 20 }));
    }

    #[test]
    fn test_unknown_key_reported_and_walk_continues() {
        let pattern = Pattern::builder()
            .rule("name", RuleSpec::string())
            .build()
            .unwrap();

        let report = pattern.test(&record! { "name" => "Pixel", "age" => 10 });
        assert!(!report.matched());
        assert_eq!(report.error_count(), 1);
        assert_eq!(
            report.error("age"),
            Some(&ValidationError::InvalidKey { key: "age".into() })
        );
    }

    #[test]
    fn test_required_exact_key() {
        let pattern = Pattern::builder()
            .rule("name", RuleSpec::string().required())
            .build()
            .unwrap();

        assert!(pattern.matches(&record! { "name" => "Pixel" }));
        let report = pattern.test(&record! {});
        assert!(!report.matched());
        assert_eq!(
            report.error("name"),
            Some(&ValidationError::RequiredNotMatched { key: "name".into() })
        );
    }

    #[test]
    fn test_required_coverage_via_regex_class() {
        let pattern = Pattern::builder()
            .regex_rule("[name|fullName]", RuleSpec::string().required())
            .build()
            .unwrap();

        assert!(pattern.matches(&record! { "name" => "Pixel" }));
        assert!(pattern.matches(&record! { "fullName" => "Pixel" }));

        let report = pattern.test(&record! {});
        assert!(!report.matched());
        assert_eq!(
            report.error("[name|fullName]"),
            Some(&ValidationError::RequiredNotMatched {
                key: "[name|fullName]".into()
            })
        );
    }

    #[test]
    fn test_failed_value_still_covers_required_rule() {
        let pattern = Pattern::builder()
            .rule("age", RuleSpec::number().required())
            .build()
            .unwrap();

        // Wrong type: the key resolves, so requiredness is satisfied and
        // the only error is the value failure.
        let report = pattern.test(&record! { "age" => "x" });
        assert!(!report.matched());
        assert_eq!(report.error_count(), 1);
        assert!(matches!(
            report.error("age"),
            Some(ValidationError::InvalidType { .. })
        ));
    }

    #[test]
    fn test_all_keys_evaluated_in_one_pass() {
        let pattern = Pattern::builder()
            .rule("name", RuleSpec::string().min_length(3))
            .rule("age", RuleSpec::number())
            .build()
            .unwrap();

        let report = pattern.test(&record! { "name" => "Pi", "age" => true });
        assert!(!report.matched());
        assert_eq!(report.error_count(), 2);
        assert!(report.error("name").is_some());
        assert!(report.error("age").is_some());
    }

    #[test]
    fn test_duplicate_exact_key_last_wins() {
        let pattern = Pattern::builder()
            .rule("age", RuleSpec::string())
            .rule("age", RuleSpec::number())
            .build()
            .unwrap();

        assert!(pattern.matches(&record! { "age" => 10 }));
        assert!(!pattern.matches(&record! { "age" => "x" }));
    }

    #[test]
    fn test_invalid_key_regex_fails_build() {
        let err = Pattern::builder()
            .regex_rule("[unclosed", RuleSpec::string())
            .build()
            .unwrap_err();
        assert!(matches!(err, PatternError::InvalidKeyPattern { .. }));
    }

    #[test]
    fn test_nested_pattern_depth_guard() {
        let mut current = Pattern::builder()
            .rule("leaf", RuleSpec::string())
            .build()
            .unwrap();
        assert_eq!(current.depth(), 1);

        for _ in 0..(MAX_NESTING_DEPTH - 1) {
            current = Pattern::builder()
                .rule("inner", RuleSpec::nested(current))
                .build()
                .unwrap();
        }
        assert_eq!(current.depth(), MAX_NESTING_DEPTH);

        // One more wrap pushes past the limit.
        let err = Pattern::builder()
            .rule("inner", RuleSpec::nested(current))
            .build()
            .unwrap_err();
        assert!(matches!(err, PatternError::DepthExceeded { .. }));
    }

    #[test]
    fn test_too_many_rules_guard() {
        let mut builder = Pattern::builder();
        for i in 0..=MAX_RULES {
            builder = builder.rule(format!("key{i}"), RuleSpec::string());
        }
        assert!(matches!(
            builder.build(),
            Err(PatternError::TooManyRules { .. })
        ));
    }

    #[test]
    fn test_key_pattern_length_guard() {
        let long = "a".repeat(MAX_KEY_PATTERN_LENGTH + 1);
        assert!(matches!(
            Pattern::builder()
                .regex_rule(long, RuleSpec::string())
                .build(),
            Err(PatternError::KeyPatternTooLong { .. })
        ));
    }

    #[test]
    fn test_empty_pattern_matches_empty_record_only() {
        let pattern = Pattern::builder().build().unwrap();
        assert!(pattern.is_empty());
        assert!(pattern.matches(&record! {}));
        assert!(!pattern.matches(&record! { "any" => 1 }));
    }

    #[test]
    fn test_idempotent_results() {
        let pattern = Pattern::builder()
            .rule("name", RuleSpec::string().min_length(3))
            .rule("age", RuleSpec::number().required())
            .build()
            .unwrap();
        let record = record! { "name" => "Pi", "other" => true };

        let first = pattern.test(&record);
        let second = pattern.test(&record);
        assert_eq!(first, second);
    }

    #[test]
    fn test_rule_for_key_resolution() {
        let pattern = Pattern::builder()
            .rule("age", RuleSpec::number())
            .regex_rule("^extra_", RuleSpec::string())
            .build()
            .unwrap();

        assert!(pattern.rule_for_key("age").is_some());
        assert!(pattern.rule_for_key("extra_tag").is_some());
        assert!(pattern.rule_for_key("unknown").is_none());
        assert_eq!(pattern.len(), 2);
    }

    #[test]
    fn test_pattern_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Pattern>();
    }
}
