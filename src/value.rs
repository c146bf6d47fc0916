//! Input/output value model for validation.
//!
//! Schemas validate `Value` trees rather than `serde_json::Value` directly
//! because the engine accepts values JSON cannot carry: dates, sets, maps
//! with non-string keys, and deferred (not-yet-resolved) values. Absence is
//! representable only at object key level; there is no `undefined` variant.

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures_util::future::{BoxFuture, FutureExt, Shared};

/// A deferred value: a shared future that resolves to a [`Value`].
///
/// Cloning is cheap and every clone resolves to the same value, so a
/// deferred value may be awaited more than once (e.g. once by the executor
/// and once by the host).
#[derive(Clone)]
pub struct DeferredValue {
    token: Arc<()>,
    future: Shared<BoxFuture<'static, Value>>,
}

impl DeferredValue {
    /// Wraps a future as a deferred value.
    pub fn new<F>(future: F) -> Self
    where
        F: Future<Output = Value> + Send + 'static,
    {
        Self {
            token: Arc::new(()),
            future: future.boxed().shared(),
        }
    }

    /// Awaits resolution of the underlying future.
    pub async fn resolve(&self) -> Value {
        self.future.clone().await
    }
}

impl fmt::Debug for DeferredValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DeferredValue(..)")
    }
}

impl PartialEq for DeferredValue {
    /// Two deferred values are equal only when they share the same
    /// underlying future.
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.token, &other.token)
    }
}

/// An input (or validated output) value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Explicit null.
    Null,
    /// Boolean.
    Bool(bool),
    /// Number (64-bit float, matching the numeric model schemas expect).
    Number(f64),
    /// UTF-8 string.
    String(String),
    /// Point in time.
    Date(DateTime<Utc>),
    /// Ordered sequence.
    Array(Vec<Value>),
    /// Keyed object. Keys are unique; a key that is not present is "absent",
    /// which is distinct from a key mapped to `Null`.
    Object(BTreeMap<String, Value>),
    /// Unordered collection of members.
    Set(Vec<Value>),
    /// Key/value entries where keys may be any value, not just strings.
    Map(Vec<(Value, Value)>),
    /// A value that is not available yet.
    Deferred(DeferredValue),
}

impl Value {
    /// Wraps a future as a deferred value.
    pub fn deferred<F>(future: F) -> Value
    where
        F: Future<Output = Value> + Send + 'static,
    {
        Value::Deferred(DeferredValue::new(future))
    }

    /// Builds an object value from key/value pairs.
    pub fn object<K, I>(pairs: I) -> Value
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Object(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Returns the type name for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Date(_) => "date",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Set(_) => "set",
            Value::Map(_) => "map",
            Value::Deferred(_) => "deferred",
        }
    }

    /// Returns true if this value is `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Converts a JSON value at the host boundary.
    ///
    /// Integers are widened to `f64`.
    pub fn from_json(json: serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Converts back to JSON for the host boundary.
    ///
    /// Dates render as RFC 3339 strings, sets as arrays, maps as arrays of
    /// `[key, value]` pairs. Returns `None` when the value contains a
    /// deferred or a non-finite number, neither of which JSON can carry.
    pub fn to_json(&self) -> Option<serde_json::Value> {
        Some(match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Number::from_f64(*n).map(serde_json::Value::Number)?,
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Date(d) => serde_json::Value::String(d.to_rfc3339()),
            Value::Array(items) | Value::Set(items) => serde_json::Value::Array(
                items
                    .iter()
                    .map(Value::to_json)
                    .collect::<Option<Vec<_>>>()?,
            ),
            Value::Object(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(k, v)| Some((k.clone(), v.to_json()?)))
                    .collect::<Option<serde_json::Map<_, _>>>()?,
            ),
            Value::Map(entries) => serde_json::Value::Array(
                entries
                    .iter()
                    .map(|(k, v)| {
                        Some(serde_json::Value::Array(vec![k.to_json()?, v.to_json()?]))
                    })
                    .collect::<Option<Vec<_>>>()?,
            ),
            Value::Deferred(_) => return None,
        })
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Value {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Value {
        Value::String(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Value {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Value {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Value {
        Value::Bool(b)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(d: DateTime<Utc>) -> Value {
        Value::Date(d)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Value {
        Value::Array(items)
    }
}
