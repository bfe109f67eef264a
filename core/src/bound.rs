//! `Bound` — literal or supplier-produced rule constraints
//!
//! Bounds on leaf rules (string lengths, numeric and date limits, value
//! regexes) accept either a literal or a zero-argument supplier. Suppliers
//! are resolved at match time, once per evaluation and never cached, so a
//! bound can track ambient state such as "no earlier than now".
//!
//! Suppliers must be pure: `Send + Sync` is enforced at the type level, and
//! the sharing contract of [`Pattern`](crate::Pattern) additionally requires
//! them to be side-effect-free.

use regex::Regex;
use std::fmt;
use std::sync::Arc;

/// A bound value: a literal, or a supplier evaluated at match time.
///
/// The supplier's return type is fixed per bound domain (`usize` for
/// lengths, `f64` for numeric bounds, `DateTime<Utc>` for date bounds), so
/// a mismatched supplier is a compile error rather than a runtime surprise.
///
/// # Example
///
/// ```
/// use shape::Bound;
///
/// let literal: Bound<f64> = 2.0.into();
/// let supplied = Bound::from_fn(|| 2.0);
/// assert_eq!(literal.resolve(), supplied.resolve());
/// ```
pub enum Bound<T> {
    /// A fixed value known at rule construction.
    Literal(T),
    /// A zero-argument supplier invoked at match time.
    Supplier(Arc<dyn Fn() -> T + Send + Sync>),
}

impl<T: Clone> Bound<T> {
    /// Create a supplier bound from a closure.
    pub fn from_fn(f: impl Fn() -> T + Send + Sync + 'static) -> Self {
        Self::Supplier(Arc::new(f))
    }

    /// Resolve the bound to a concrete value.
    ///
    /// Literals clone; suppliers are invoked. Called once per evaluation.
    #[must_use]
    pub fn resolve(&self) -> T {
        match self {
            Self::Literal(v) => v.clone(),
            Self::Supplier(f) => f(),
        }
    }
}

impl<T> From<T> for Bound<T> {
    fn from(value: T) -> Self {
        Self::Literal(value)
    }
}

impl<T: Clone> Clone for Bound<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Literal(v) => Self::Literal(v.clone()),
            Self::Supplier(f) => Self::Supplier(Arc::clone(f)),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Bound<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(v) => f.debug_tuple("Literal").field(v).finish(),
            Self::Supplier(_) => f.write_str("Supplier(..)"),
        }
    }
}

/// The regular expression a `regexp`-typed leaf checks values against:
/// a compiled literal, or a supplier invoked at match time.
///
/// # Example
///
/// ```
/// use regex::Regex;
/// use shape::RegexSource;
///
/// let source = RegexSource::from(Regex::new("[a|b]").unwrap());
/// assert!(source.resolve().is_match("a"));
/// ```
pub enum RegexSource {
    /// A regex compiled at rule construction.
    Literal(Regex),
    /// A zero-argument supplier invoked at match time.
    Supplier(Arc<dyn Fn() -> Regex + Send + Sync>),
}

impl RegexSource {
    /// Create a supplier source from a closure.
    pub fn from_fn(f: impl Fn() -> Regex + Send + Sync + 'static) -> Self {
        Self::Supplier(Arc::new(f))
    }

    /// Resolve to a concrete regex. Called once per evaluation.
    #[must_use]
    pub fn resolve(&self) -> Regex {
        match self {
            Self::Literal(re) => re.clone(),
            Self::Supplier(f) => f(),
        }
    }
}

impl From<Regex> for RegexSource {
    fn from(re: Regex) -> Self {
        Self::Literal(re)
    }
}

impl Clone for RegexSource {
    fn clone(&self) -> Self {
        match self {
            Self::Literal(re) => Self::Literal(re.clone()),
            Self::Supplier(f) => Self::Supplier(Arc::clone(f)),
        }
    }
}

impl fmt::Debug for RegexSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(re) => f.debug_tuple("Literal").field(&re.as_str()).finish(),
            Self::Supplier(_) => f.write_str("Supplier(..)"),
        }
    }
}
