//! Runtime values bound in a [`Variables`](crate::Variables) store.
//!
//! Templates only ever see five shapes of data: strings, booleans, integers,
//! records (string-keyed maps) and lists of records. Everything a resolver
//! computes is converted into one of these before rendering.

use std::collections::BTreeMap;
use std::fmt;

/// A string-keyed map of values, used for nested data and loop items.
pub type Record = BTreeMap<String, Value>;

/// A value that can be bound to a template variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Text value.
    String(String),
    /// Boolean flag.
    Bool(bool),
    /// Integer value (counts, 1-based labels, indices).
    Int(i64),
    /// Nested record, reachable through dotted paths.
    Record(Record),
    /// List of records, iterated by `{{#each}}`.
    List(Vec<Record>),
}

impl Value {
    /// Returns the truthiness used by `{{#if}}` and `{{#unless}}`.
    ///
    /// Empty strings, `false` and empty lists are falsy. Integers are
    /// always truthy, including zero.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::String(s) => !s.is_empty(),
            Value::Bool(b) => *b,
            Value::List(items) => !items.is_empty(),
            Value::Int(_) | Value::Record(_) => true,
        }
    }

    /// Returns the string form substituted for `{{name}}`.
    ///
    /// Records and lists have no textual form and render empty.
    pub fn to_output(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Bool(b) => b.to_string(),
            Value::Int(n) => n.to_string(),
            Value::Record(_) | Value::List(_) => String::new(),
        }
    }

    /// Extracts the string value, if present.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Extracts the boolean value, if present.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Extracts the integer value, if present.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Extracts the record, if present.
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Extracts the list of records, if present.
    pub fn as_list(&self) -> Option<&[Record]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Short type name used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Record(_) => "record",
            Value::List(_) => "list",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_output())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::String(s.clone())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Int(i64::try_from(n).unwrap_or(i64::MAX))
    }
}

impl From<Record> for Value {
    fn from(r: Record) -> Self {
        Value::Record(r)
    }
}

impl From<Vec<Record>> for Value {
    fn from(items: Vec<Record>) -> Self {
        Value::List(items)
    }
}

/// Builds a [`Record`] from `key => value` pairs.
///
/// ```
/// use promptsmith_template::{record, Value};
///
/// let item = record! { "name" => "Aki", "panel_number" => 1 };
/// assert_eq!(item.get("name"), Some(&Value::from("Aki")));
/// ```
#[macro_export]
macro_rules! record {
    () => { $crate::Record::new() };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut record = $crate::Record::new();
        $(record.insert(::std::string::String::from($key), $crate::Value::from($value));)+
        record
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness_rules() {
        assert!(!Value::from("").is_truthy());
        assert!(Value::from("x").is_truthy());
        assert!(!Value::from(false).is_truthy());
        assert!(Value::from(true).is_truthy());
        assert!(!Value::List(Vec::new()).is_truthy());
        assert!(Value::List(vec![Record::new()]).is_truthy());
        assert!(Value::from(0i64).is_truthy());
        assert!(Value::Record(Record::new()).is_truthy());
    }

    #[test]
    fn output_forms() {
        assert_eq!(Value::from(true).to_output(), "true");
        assert_eq!(Value::from(false).to_output(), "false");
        assert_eq!(Value::from(42i64).to_output(), "42");
        assert_eq!(Value::from(-3i32).to_output(), "-3");
        assert_eq!(Value::from("text").to_output(), "text");
        assert_eq!(Value::List(vec![Record::new()]).to_output(), "");
        assert_eq!(Value::Record(Record::new()).to_output(), "");
    }

    #[test]
    fn accessors_match_variant() {
        let v = Value::from("a");
        assert_eq!(v.as_str(), Some("a"));
        assert_eq!(v.as_bool(), None);
        assert_eq!(Value::from(7usize).as_int(), Some(7));
        assert_eq!(Value::from(true).type_name(), "bool");
    }

    #[test]
    fn record_macro_builds_map() {
        let r = record! { "a" => "x", "n" => 2, "flag" => true };
        assert_eq!(r.len(), 3);
        assert_eq!(r["n"], Value::Int(2));
        assert_eq!(r["flag"], Value::Bool(true));
    }
}
