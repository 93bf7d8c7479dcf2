//! The Variable Store: named values a template renders against.
//!
//! [`Variables`] is an ordered map from names to [`Value`]s. Lookups accept
//! dotted paths (`outfit.top`, `panels.0.scene`) that walk through nested
//! records and index into lists; a failed step yields `None`, never an error.
//!
//! Loops never mutate the store they iterate over. Each iteration renders
//! against a [`child`](Variables::child) copy shadowed by the current record's
//! fields and the synthetic `@index` / `@index_1` bindings.

use std::collections::BTreeMap;

use crate::value::{Record, Value};

/// Name of the 0-based loop index binding.
pub const INDEX: &str = "@index";
/// Name of the 1-based loop index binding.
pub const INDEX_1: &str = "@index_1";

/// Resolved template variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Variables {
    values: BTreeMap<String, Value>,
    loop_depth: usize,
}

impl Variables {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name` to `value`, replacing any previous binding.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Removes a binding, returning its previous value.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.values.remove(name)
    }

    /// Looks up a name or dotted path.
    ///
    /// An exact binding always wins, so a name that itself contains a dot
    /// can still be bound directly.
    pub fn get(&self, name: &str) -> Option<&Value> {
        if let Some(value) = self.values.get(name) {
            return Some(value);
        }
        if !name.contains('.') {
            return None;
        }

        let parts: Vec<&str> = name.split('.').collect();
        lookup(&self.values, &parts)
    }

    /// Returns the string bound to `name`, if it is a string.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// Returns the boolean bound to `name`, if it is a boolean.
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    /// Returns the list bound to `name`, if it is a list.
    pub fn get_list(&self, name: &str) -> Option<&[Record]> {
        self.get(name).and_then(Value::as_list)
    }

    /// Returns `true` when `name` resolves to a truthy value.
    ///
    /// Absent names are falsy.
    pub fn exists(&self, name: &str) -> bool {
        self.get(name).is_some_and(Value::is_truthy)
    }

    /// Returns `true` when `name` has a direct binding, truthy or not.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Copies in every binding of `other` whose name is not yet bound here.
    pub fn merge_missing(&mut self, other: &Variables) {
        for (name, value) in &other.values {
            self.values
                .entry(name.clone())
                .or_insert_with(|| value.clone());
        }
    }

    /// Copies in every binding of `other`, overwriting existing ones.
    pub fn extend<I, K, V>(&mut self, iter: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        for (name, value) in iter {
            self.set(name, value);
        }
    }

    /// Creates the store for one loop iteration.
    ///
    /// The child is a copy of `self` shadowed by every field of `item`, plus
    /// `@index` (0-based) and `@index_1` (1-based).
    pub fn child(&self, item: &Record, index: usize) -> Variables {
        let mut child = self.clone();
        for (name, value) in item {
            child.values.insert(name.clone(), value.clone());
        }
        child.set(INDEX, index);
        child.set(INDEX_1, index + 1);
        child.loop_depth = self.loop_depth + 1;
        child
    }

    /// Number of enclosing loops; zero at the top level.
    pub fn loop_depth(&self) -> usize {
        self.loop_depth
    }

    /// Iterates over bindings in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of direct bindings.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` when nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Variables {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut vars = Variables::new();
        vars.extend(iter);
        vars
    }
}

impl From<Record> for Variables {
    fn from(record: Record) -> Self {
        Variables {
            values: record,
            loop_depth: 0,
        }
    }
}

fn lookup<'a>(record: &'a Record, parts: &[&str]) -> Option<&'a Value> {
    let (first, rest) = parts.split_first()?;
    descend(record.get(*first)?, rest)
}

fn descend<'a>(value: &'a Value, parts: &[&str]) -> Option<&'a Value> {
    let Some((first, rest)) = parts.split_first() else {
        return Some(value);
    };
    match value {
        Value::Record(record) => lookup(record, parts),
        Value::List(items) => {
            let index: usize = first.parse().ok()?;
            // A bare list item is a record, not a value.
            lookup(items.get(index)?, rest)
        }
        _ => None,
    }
}
