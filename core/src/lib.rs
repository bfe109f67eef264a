//! shape — structural validation of key/value records
//!
//! A runtime validator: declare the expected shape of a record as a set of
//! rules, then ask whether an arbitrary record conforms and get a precise
//! per-key diagnostic when it does not.
//!
//! # Architecture
//!
//! - [`Value`] / [`Record`] — the data model records are decoded into
//! - [`RuleSpec`] / [`LeafRule`] — one expected value shape, or an
//!   alternation of shapes, with optional bounds
//! - [`Bound`] / [`RegexSource`] — literal or supplier-produced
//!   constraints, resolved at match time
//! - [`Pattern`] — an immutable compiled rule set; exact keys win over
//!   regex keys, regex keys match in declaration order
//! - [`MatchReport`] / [`ValidationError`] — the complete per-key outcome
//!   of one `test` call
//!
//! # Key Design Points
//!
//! 1. **Errors are data**: validation failures are collected into the
//!    report, never thrown; one `test` pass always evaluates every key.
//!
//! 2. **Exact beats regex**: an exact-key rule overrides any regex rule
//!    for that key, so a catch-all regex can coexist with per-key
//!    overrides.
//!
//! 3. **Required coverage**: a mandatory rule is satisfied by any one
//!    record key that resolves to it — for regex rules, any key the
//!    pattern accepts.
//!
//! # Example
//!
//! ```
//! use shape::{record, Pattern, RuleSpec};
//!
//! let pattern = Pattern::builder()
//!     .rule("name", RuleSpec::string().min_length(1).required())
//!     .rule("age", RuleSpec::number().min(0.0))
//!     .regex_rule("^meta_", RuleSpec::string().or(RuleSpec::number()))
//!     .build()?;
//!
//! assert!(pattern.matches(&record! {
//!     "name" => "Ada",
//!     "age" => 36,
//!     "meta_origin" => "import",
//! }));
//!
//! let report = pattern.test(&record! { "age" => -1 });
//! assert!(!report.matched());
//! assert!(report.error("age").is_some());       // bound violation
//! assert!(report.error("name").is_some());      // required, missing
//! # Ok::<(), shape::PatternError>(())
//! ```
//!
//! # Concurrency
//!
//! [`Pattern`] is `Send + Sync` and immutable after construction;
//! `test`/`matches` take `&self` and allocate only the transient report.
//! Share one instance across threads freely, provided bound suppliers and
//! nested patterns are pure.

mod bound;
mod error;
mod pattern;
mod report;
mod rule;
mod value;

#[cfg(feature = "config")]
pub mod config;

// Core types
pub use bound::{Bound, RegexSource};
pub use error::ValidationError;
pub use pattern::{Pattern, PatternBuilder};
pub use report::MatchReport;
pub use rule::{LeafRule, RuleSpec};
pub use value::{Record, Value};

/// Prelude module for convenient imports.
///
/// ```
/// use shape::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Bound, LeafRule, MatchReport, Pattern, PatternBuilder, PatternError, Record, RegexSource,
        RuleSpec, ValidationError, Value,
    };
}

/// Maximum nesting depth for `pattern`-typed leaves.
///
/// Nested patterns recurse during `test`; the builder rejects rule trees
/// deeper than this, so evaluation stack use is bounded at construction
/// time.
pub const MAX_NESTING_DEPTH: usize = 32;

/// Maximum number of rule declarations in a single [`Pattern`].
///
/// Width guard: a flat pattern with millions of rules bypasses
/// [`MAX_NESTING_DEPTH`] but still costs excessive memory and scan time.
pub const MAX_RULES: usize = 1024;

/// Maximum length for regex-key pattern text.
///
/// Regex compilation is expensive even with the linear-time `regex` crate.
pub const MAX_KEY_PATTERN_LENGTH: usize = 4096;

/// Errors from pattern construction.
///
/// These are caught at build time, not evaluation time: a [`Pattern`] that
/// builds successfully never fails structurally during `test`. Fix the
/// rule set and rebuild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// A regex-key pattern failed to compile.
    InvalidKeyPattern {
        /// The pattern text that failed to compile.
        pattern: String,
        /// The underlying error message.
        source: String,
    },
    /// `pattern`-typed leaves nest deeper than [`MAX_NESTING_DEPTH`].
    DepthExceeded {
        /// Actual depth of the rule tree.
        depth: usize,
        /// Maximum allowed depth.
        max: usize,
    },
    /// More rule declarations than [`MAX_RULES`].
    TooManyRules {
        /// Actual declaration count.
        count: usize,
        /// Maximum allowed.
        max: usize,
    },
    /// A regex-key pattern exceeds [`MAX_KEY_PATTERN_LENGTH`].
    KeyPatternTooLong {
        /// Actual length of the pattern text.
        len: usize,
        /// Maximum allowed length.
        max: usize,
    },
    /// A declarative rule-set config could not be turned into a pattern.
    InvalidConfig {
        /// The underlying error message.
        source: String,
    },
}

impl std::fmt::Display for PatternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidKeyPattern { pattern, source } => {
                write!(f, "invalid key pattern \"{pattern}\": {source}")
            }
            Self::DepthExceeded { depth, max } => {
                write!(
                    f,
                    "rule nesting depth is {depth}, but maximum allowed is {max} \
                     — flatten the nested patterns"
                )
            }
            Self::TooManyRules { count, max } => {
                write!(f, "pattern has {count} rules, but maximum allowed is {max}")
            }
            Self::KeyPatternTooLong { len, max } => {
                write!(
                    f,
                    "key pattern length is {len}, but maximum allowed is {max}"
                )
            }
            Self::InvalidConfig { source } => {
                write!(f, "invalid rule config: {source}")
            }
        }
    }
}

impl std::error::Error for PatternError {}
