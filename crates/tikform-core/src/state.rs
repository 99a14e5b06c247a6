// ── Instance state ──

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Configured attribute values for one instance, keyed by attribute name.
pub type ResourceConfig = IndexMap<String, Value>;

/// State of one managed instance.
///
/// `id` is `None` once the remote entry is gone. `effective_defaults` are
/// written by read adapters and override schema defaults for this
/// instance only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceData {
    pub id: Option<String>,
    #[serde(default)]
    pub attributes: IndexMap<String, Value>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub effective_defaults: IndexMap<String, Value>,
}

impl ResourceData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    /// Mark the instance as gone.
    pub fn clear_id(&mut self) {
        self.id = None;
    }

    pub fn exists(&self) -> bool {
        self.id.is_some()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// The value of `name` if it is set to something other than its
    /// type's zero value (`""`, `0`, `false`, `null`).
    pub fn get_ok(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name).filter(|v| !is_zero(v))
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.attributes.insert(name.into(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.attributes.shift_remove(name)
    }

    pub fn effective_default(&self, name: &str) -> Option<&Value> {
        self.effective_defaults.get(name)
    }

    pub fn set_effective_default(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.effective_defaults.insert(name.into(), value.into());
    }

    pub fn clear_effective_default(&mut self, name: &str) {
        self.effective_defaults.shift_remove(name);
    }
}

/// Whether `value` is its type's zero value.
pub(crate) fn is_zero(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_i64() == Some(0) || n.as_u64() == Some(0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}
