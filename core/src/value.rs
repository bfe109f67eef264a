//! `Value` — the data model records are made of
//!
//! Rules never see caller structs directly; records are decoded into
//! [`Value`] trees before validation. This keeps the matcher engine
//! non-generic: one [`Pattern`](crate::Pattern) validates records from any
//! source (JSON bodies, message payloads, test fixtures).
//!
//! # Variants
//!
//! - `Null` — explicit absence (rejected by every type matcher)
//! - `Bool` — boolean data
//! - `Number` — numeric data (`f64`, matching decoded JSON numbers)
//! - `String` — text data, the most common case
//! - `Date` — an instant in time (`chrono::DateTime<Utc>`)
//! - `List` — ordered sequence; exists so the `object` matcher can tell
//!   arrays apart from records and reject them
//! - `Record` — a string-keyed map of values, the unit `Pattern` validates

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt;

/// A single value inside a record.
///
/// # Example
///
/// ```
/// use shape::Value;
///
/// let v = Value::from("hello");
/// assert_eq!(v.as_str(), Some("hello"));
/// assert_eq!(v.type_name(), "string");
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Value {
    /// Explicit absence. No type matcher accepts it.
    Null,
    /// Boolean data.
    Bool(bool),
    /// Numeric data. Stored as `f64`, matching decoded JSON numbers.
    Number(f64),
    /// Text data.
    String(String),
    /// An instant in time, compared by instant for date bounds.
    Date(DateTime<Utc>),
    /// Ordered sequence. Not a record: the `object` matcher rejects it.
    List(Vec<Value>),
    /// A nested key/value record.
    Record(Record),
}

impl Value {
    /// Returns `true` if this is the `Null` variant.
    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Try to get the value as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Try to get the value as a number.
    #[inline]
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get the value as a boolean.
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get the value as a date.
    #[inline]
    #[must_use]
    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Date(t) => Some(*t),
            _ => None,
        }
    }

    /// Try to get the value as a record.
    #[inline]
    #[must_use]
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Returns a string describing the type of this value.
    ///
    /// These names are the `expected` vocabulary used in
    /// [`ValidationError`](crate::ValidationError) messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Date(_) => "date",
            Self::List(_) => "list",
            Self::Record(_) => "object",
        }
    }
}

// Display is part of the diagnostic contract: error messages interpolate
// the offending value through this impl.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s}"),
            Self::Date(t) => write!(f, "{}", t.to_rfc3339()),
            Self::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Record(r) => {
                write!(f, "{{")?;
                for (i, (key, value)) in r.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<i64> for Value {
    // Records decoded from JSON carry f64 anyway; precision past 2^53
    // is not representable.
    #[allow(clippy::cast_precision_loss)]
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(t: DateTime<Utc>) -> Self {
        Self::Date(t)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

impl From<Record> for Value {
    fn from(r: Record) -> Self {
        Self::Record(r)
    }
}

/// A string-keyed record of values — the unit a [`Pattern`](crate::Pattern)
/// validates.
///
/// Keys iterate in sorted order, so repeated `test` calls over the same
/// record are deterministic.
///
/// # Example
///
/// ```
/// use shape::{record, Record, Value};
///
/// let r = Record::new()
///     .with("name", "alice")
///     .with("admin", true);
/// assert_eq!(r.get("name"), Some(&Value::from("alice")));
///
/// // Or via the record! macro:
/// let same = record! { "name" => "alice", "admin" => true };
/// assert_eq!(r, same);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Record(BTreeMap<String, Value>);

impl Record {
    /// Create an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key/value pair (builder pattern).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Insert a key/value pair.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Get a value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns `true` if the record contains the key.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Iterate over key/value pairs in sorted key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Iterate over keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    /// Number of keys in the record.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the record has no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = (&'a String, &'a Value);
    type IntoIter = std::collections::btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Build a [`Record`] from `key => value` pairs.
///
/// Values go through [`Value::from`], so plain literals work:
///
/// ```
/// use shape::record;
///
/// let r = record! {
///     "name" => "alice",
///     "age" => 36,
///     "admin" => true,
/// };
/// assert_eq!(r.len(), 3);
/// ```
#[macro_export]
macro_rules! record {
    () => {
        $crate::Record::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        $crate::Record::from_iter([
            $(($key, $crate::Value::from($value))),+
        ])
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_type_names() {
        assert_eq!(Value::Null.type_name(), "null");
        assert_eq!(Value::from(true).type_name(), "boolean");
        assert_eq!(Value::from(1.5).type_name(), "number");
        assert_eq!(Value::from("x").type_name(), "string");
        assert_eq!(Value::from(Utc::now()).type_name(), "date");
        assert_eq!(Value::List(vec![]).type_name(), "list");
        assert_eq!(Value::from(Record::new()).type_name(), "object");
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Value::from("hello").as_str(), Some("hello"));
        assert_eq!(Value::from(10).as_number(), Some(10.0));
        assert_eq!(Value::from(false).as_bool(), Some(false));
        assert_eq!(Value::from(10).as_str(), None);
        assert!(Value::Null.is_null());
        assert!(!Value::from(0).is_null());
    }

    #[test]
    fn test_display_rendering() {
        assert_eq!(Value::from("abc").to_string(), "abc");
        assert_eq!(Value::from(10).to_string(), "10");
        assert_eq!(Value::from(1.5).to_string(), "1.5");
        assert_eq!(Value::from(true).to_string(), "true");
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(
            Value::List(vec![Value::from(1), Value::from("a")]).to_string(),
            "[1, a]"
        );
        assert_eq!(
            Value::from(record! { "a" => 1, "b" => "x" }).to_string(),
            "{a: 1, b: x}"
        );

        let t = Utc.with_ymd_and_hms(2015, 7, 11, 0, 0, 0).unwrap();
        assert_eq!(Value::from(t).to_string(), "2015-07-11T00:00:00+00:00");
    }

    #[test]
    fn test_record_iteration_is_sorted() {
        let r = record! { "b" => 1, "a" => 2, "c" => 3 };
        let keys: Vec<&String> = r.keys().collect();
        assert_eq!(keys, ["a", "b", "c"]);
    }

    #[test]
    fn test_record_builder_and_macro_agree() {
        let built = Record::new().with("name", "alice").with("age", 30);
        let via_macro = record! { "name" => "alice", "age" => 30 };
        assert_eq!(built, via_macro);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_values_serialize_untagged() {
        assert_eq!(
            serde_json::to_value(Value::from("ab")).unwrap(),
            serde_json::json!("ab")
        );
        assert_eq!(
            serde_json::to_value(Value::from(true)).unwrap(),
            serde_json::json!(true)
        );
        assert_eq!(
            serde_json::to_value(Value::from(1.5)).unwrap(),
            serde_json::json!(1.5)
        );
        assert_eq!(
            serde_json::to_value(Value::Null).unwrap(),
            serde_json::json!(null)
        );
        assert_eq!(
            serde_json::to_value(Value::from(record! { "a" => 1.5 })).unwrap(),
            serde_json::json!({ "a": 1.5 })
        );
    }

    #[test]
    fn test_nested_record_values() {
        let r = record! {
            "name" => record! { "first" => "Ada", "last" => "Lovelace" },
        };
        let nested = r.get("name").and_then(Value::as_record).unwrap();
        assert_eq!(nested.get("first"), Some(&Value::from("Ada")));
    }
}
