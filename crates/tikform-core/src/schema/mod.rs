// ── Resource schemas ──
//
// A schema is a static table from attribute name to attribute descriptor,
// plus the menu path on the router, how instances are identified, and
// which lifecycle strategy drives them. Tables are built once and shared
// read-only; nothing mutates them after construction.

pub mod duration;
pub mod validation;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::state::{ResourceData, is_zero};

pub use duration::{DiffSuppress, parse_duration};
pub use validation::Validator;

// ── Attribute ───────────────────────────────────────────────────────

/// Semantic type of an attribute value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AttributeType {
    Bool,
    Int,
    String,
}

impl AttributeType {
    /// Whether a configured JSON value has this type.
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            Self::Bool => value.is_boolean(),
            Self::Int => value.is_i64(),
            Self::String => value.is_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Presence {
    Required,
    Optional,
}

/// Descriptor for one configuration field.
#[derive(Debug, Clone)]
pub struct Attribute {
    pub kind: AttributeType,
    pub presence: Presence,
    pub default: Option<Value>,
    pub description: &'static str,
    pub validator: Option<Validator>,
    /// Sensitive values never appear in rendered plans or logs.
    pub sensitive: bool,
    pub diff_suppress: Option<DiffSuppress>,
}

impl Attribute {
    const fn new(kind: AttributeType, presence: Presence) -> Self {
        Self {
            kind,
            presence,
            default: None,
            description: "",
            validator: None,
            sensitive: false,
            diff_suppress: None,
        }
    }

    pub const fn required_string() -> Self {
        Self::new(AttributeType::String, Presence::Required)
    }

    pub const fn optional_string() -> Self {
        Self::new(AttributeType::String, Presence::Optional)
    }

    pub const fn optional_int() -> Self {
        Self::new(AttributeType::Int, Presence::Optional)
    }

    pub const fn optional_bool() -> Self {
        Self::new(AttributeType::Bool, Presence::Optional)
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub const fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    pub const fn validate_with(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    pub const fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub const fn suppress_diff(mut self, rule: DiffSuppress) -> Self {
        self.diff_suppress = Some(rule);
        self
    }

    pub fn is_required(&self) -> bool {
        self.presence == Presence::Required
    }

    /// Whether `old -> new` is a real change for this attribute.
    ///
    /// An unset value and the type's zero value (`""`, `0`, `false`) are
    /// the same thing.
    pub fn differs(&self, old: Option<&Value>, new: Option<&Value>) -> bool {
        let old = old.filter(|v| !is_zero(v));
        let new = new.filter(|v| !is_zero(v));
        match (old, new) {
            (Some(a), Some(b)) if a == b => false,
            (Some(a), Some(b)) => !self.diff_suppress.is_some_and(|rule| rule.suppresses(a, b)),
            (None, None) => false,
            _ => true,
        }
    }
}

// ── Resource ────────────────────────────────────────────────────────

/// Lifecycle strategy of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ResourceKind {
    /// Entries of a list menu, each with its own `.id` and lifecycle.
    List,
    /// A settings menu that always exists and can only be changed.
    Singleton,
}

/// Which field identifies an instance on the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Identity {
    /// RouterOS internal `.id` (`*1`, `*1F`).
    Id,
    /// The entry's `name`; settings menus have none and use their path.
    Name,
}

/// Hook run after every read, on the freshly read instance.
pub type ReadAdapter = fn(&mut ResourceData);

/// Resource descriptor.
#[derive(Debug, Clone)]
pub struct ResourceSchema {
    type_name: &'static str,
    path: &'static str,
    kind: ResourceKind,
    identity: Identity,
    read_adapter: Option<ReadAdapter>,
    attributes: IndexMap<&'static str, Attribute>,
}

impl ResourceSchema {
    pub fn new(type_name: &'static str, path: &'static str, kind: ResourceKind) -> Self {
        Self {
            type_name,
            path,
            kind,
            identity: Identity::Id,
            read_adapter: None,
            attributes: IndexMap::new(),
        }
    }

    pub fn identity(mut self, identity: Identity) -> Self {
        self.identity = identity;
        self
    }

    pub fn read_adapter(mut self, adapter: ReadAdapter) -> Self {
        self.read_adapter = Some(adapter);
        self
    }

    /// Declare an attribute. Names are unique per table.
    pub fn attribute(mut self, name: &'static str, attribute: Attribute) -> Self {
        let previous = self.attributes.insert(name, attribute);
        assert!(
            previous.is_none(),
            "attribute {name} declared twice in {}",
            self.type_name
        );
        self
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn path(&self) -> &'static str {
        self.path
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn identity_field(&self) -> Identity {
        self.identity
    }

    pub fn adapter(&self) -> Option<ReadAdapter> {
        self.read_adapter
    }

    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// Attributes in declaration order.
    pub fn attributes(&self) -> impl Iterator<Item = (&'static str, &Attribute)> {
        self.attributes.iter().map(|(name, attr)| (*name, attr))
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Attributes whose planned value differs from `prior`, in declaration
    /// order. A `None` value means the attribute is being cleared.
    pub fn changes<'a>(
        &self,
        prior: &'a IndexMap<String, Value>,
        planned: &'a IndexMap<String, Value>,
    ) -> Vec<(&'static str, Option<&'a Value>)> {
        self.attributes()
            .filter_map(|(name, attr)| {
                let new = planned.get(name);
                attr.differs(prior.get(name), new).then_some((name, new))
            })
            .collect()
    }

    /// Id given to settings-menu instances: the path without the leading slash.
    pub fn singleton_id(&self) -> &'static str {
        self.path.trim_start_matches('/')
    }
}
