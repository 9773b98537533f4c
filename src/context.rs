//! Request Context
//!
//! Caller-supplied metadata attached to every access request. A context is a
//! plain key/value bag of JSON values with one reserved entry, `purpose`, which
//! must hold a string. Keys are kept ordered so equality and hashing do not
//! depend on insertion order.

use crate::error::ContextError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

/// Reserved key holding the stated reason for accessing the data.
pub const PURPOSE: &str = "purpose";

/// Context contents: key to arbitrary JSON value.
pub type Contents = BTreeMap<String, Value>;

/// Per-request metadata bag
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ContextRepr")]
pub struct Context {
    contents: Contents,
}

#[derive(Deserialize)]
struct ContextRepr {
    #[serde(default)]
    contents: Contents,
}

impl TryFrom<ContextRepr> for Context {
    type Error = ContextError;

    fn try_from(repr: ContextRepr) -> Result<Self, Self::Error> {
        Context::from_contents(repr.contents)
    }
}

impl Context {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context from a caller-supplied mapping.
    pub fn from_contents(contents: Contents) -> Result<Self, ContextError> {
        let mut context = Self::new();
        context.set_contents(contents)?;
        Ok(context)
    }

    /// Replace the contents wholesale. Nothing is applied if any entry is invalid.
    pub fn set_contents(&mut self, contents: Contents) -> Result<&mut Self, ContextError> {
        for (key, value) in &contents {
            check_entry(key, value)?;
        }
        self.contents = contents;
        Ok(self)
    }

    /// Live contents.
    pub fn contents(&self) -> &Contents {
        &self.contents
    }

    /// Live, mutable contents. Writes made here bypass the null checks of `put`.
    pub fn contents_mut(&mut self) -> &mut Contents {
        &mut self.contents
    }

    /// Read-only snapshot of the contents, detached from this context.
    pub fn contents_copy(&self) -> ContentsView {
        ContentsView(Arc::new(self.contents.clone()))
    }

    /// Set the purpose for accessing the data.
    pub fn purpose(&mut self, purpose: impl Into<String>) -> &mut Self {
        self.contents
            .insert(PURPOSE.to_string(), Value::String(purpose.into()));
        self
    }

    /// Get the purpose, if one has been set.
    pub fn get_purpose(&self) -> Result<Option<&str>, ContextError> {
        match self.contents.get(PURPOSE) {
            None => Ok(None),
            Some(Value::String(purpose)) => Ok(Some(purpose.as_str())),
            Some(other) => Err(ContextError::TypeMismatch {
                key: PURPOSE.to_string(),
                expected: "string",
                found: value_kind(other),
            }),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.contents.get(key)
    }

    /// Insert or overwrite `key`.
    pub fn put(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<&mut Self, ContextError> {
        let (key, value) = (key.into(), value.into());
        check_entry(&key, &value)?;
        self.contents.insert(key, value);
        Ok(self)
    }

    /// Insert `key` only if it is not already present.
    pub fn put_if_absent(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<&mut Self, ContextError> {
        let (key, value) = (key.into(), value.into());
        check_entry(&key, &value)?;
        self.contents.entry(key).or_insert(value);
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }
}

impl Hash for Context {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.contents.len().hash(state);
        for (key, value) in &self.contents {
            key.hash(state);
            hash_value(value, state);
        }
    }
}

impl TryFrom<Contents> for Context {
    type Error = ContextError;

    fn try_from(contents: Contents) -> Result<Self, Self::Error> {
        Context::from_contents(contents)
    }
}

impl TryFrom<HashMap<String, Value>> for Context {
    type Error = ContextError;

    fn try_from(contents: HashMap<String, Value>) -> Result<Self, Self::Error> {
        Context::from_contents(contents.into_iter().collect())
    }
}

/// Immutable snapshot returned by [`Context::contents_copy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentsView(Arc<Contents>);

impl Deref for ContentsView {
    type Target = Contents;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a> IntoIterator for &'a ContentsView {
    type Item = (&'a String, &'a Value);
    type IntoIter = std::collections::btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

fn check_entry(key: &str, value: &Value) -> Result<(), ContextError> {
    if key.is_empty() {
        return Err(ContextError::NullArgument("key"));
    }
    if value.is_null() {
        return Err(ContextError::NullArgument("value"));
    }
    Ok(())
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// Object keys are visited in sorted order whatever map backs serde_json.
fn hash_value<H: Hasher>(value: &Value, state: &mut H) {
    std::mem::discriminant(value).hash(state);
    match value {
        Value::Null => {}
        Value::Bool(b) => b.hash(state),
        Value::Number(n) => n.to_string().hash(state),
        Value::String(s) => s.hash(state),
        Value::Array(items) => {
            items.len().hash(state);
            for item in items {
                hash_value(item, state);
            }
        }
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            entries.len().hash(state);
            for (key, item) in entries {
                key.hash(state);
                hash_value(item, state);
            }
        }
    }
}
