// ── Plans ──
//
// Validation of configured values, computation of planned values, and
// the diff between planned values and prior state. Sensitive attributes
// are redacted in every rendering of a change: Display, Debug and
// Serialize alike.

use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::diag::{Diagnostic, Diagnostics};
use crate::lifecycle::PlannedValues;
use crate::schema::ResourceSchema;
use crate::state::{ResourceConfig, ResourceData};

/// Placeholder shown instead of sensitive values.
pub const REDACTED: &str = "(sensitive value)";

// ── Validation ──────────────────────────────────────────────────────

/// Check a configuration against its schema without contacting the router.
///
/// Reports unknown attributes, type mismatches, validator failures and
/// missing required attributes, each scoped to the attribute.
pub fn validate(schema: &ResourceSchema, config: &ResourceConfig) -> Diagnostics {
    let mut diags = Diagnostics::new();

    for (name, value) in config {
        let Some(attr) = schema.get(name) else {
            diags.push(
                Diagnostic::error(format!(
                    "unsupported attribute \"{name}\" for {}",
                    schema.type_name()
                ))
                .at(name),
            );
            continue;
        };
        if value.is_null() {
            continue;
        }
        if !attr.kind.accepts(value) {
            diags.push(
                Diagnostic::error(format!("expected type of {name} to be {}", attr.kind)).at(name),
            );
            continue;
        }
        if let Some(validator) = attr.validator {
            if let Err(d) = validator.check(name, value) {
                diags.push(d);
            }
        }
    }

    for (name, attr) in schema.attributes() {
        let configured = config.get(name).is_some_and(|v| !v.is_null());
        if attr.is_required() && !configured {
            diags.push(
                Diagnostic::error(format!("the attribute \"{name}\" is required")).at(name),
            );
        }
    }

    diags
}

/// Planned value of every attribute: configured, else the instance's
/// effective default, else the schema default. Unset attributes are
/// omitted.
pub fn planned_values(
    schema: &ResourceSchema,
    config: &ResourceConfig,
    prior: Option<&ResourceData>,
) -> PlannedValues {
    schema
        .attributes()
        .filter_map(|(name, attr)| {
            let value = config
                .get(name)
                .filter(|v| !v.is_null())
                .or_else(|| prior.and_then(|p| p.effective_default(name)))
                .or(attr.default.as_ref())?;
            Some((name.to_owned(), value.clone()))
        })
        .collect()
}

// ── Plan model ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PlanAction {
    Create,
    Update,
    #[serde(rename = "no-op")]
    #[strum(serialize = "no-op")]
    NoOp,
    Delete,
}

impl PlanAction {
    /// Marker used in rendered plans.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Create => "+",
            Self::Update => "~",
            Self::NoOp => " ",
            Self::Delete => "-",
        }
    }
}

/// One attribute's transition.
#[derive(Clone, PartialEq)]
pub struct AttributeChange {
    pub name: String,
    pub before: Option<Value>,
    pub after: Option<Value>,
    pub sensitive: bool,
}

impl AttributeChange {
    pub fn action(&self) -> PlanAction {
        match (&self.before, &self.after) {
            (None, _) => PlanAction::Create,
            (_, None) => PlanAction::Delete,
            _ => PlanAction::Update,
        }
    }

    /// Rendered old value, redacted when sensitive.
    pub fn display_before(&self) -> String {
        self.render(self.before.as_ref())
    }

    /// Rendered new value, redacted when sensitive.
    pub fn display_after(&self) -> String {
        self.render(self.after.as_ref())
    }

    fn render(&self, value: Option<&Value>) -> String {
        match self.redact(value) {
            None => "(unset)".to_owned(),
            Some(Value::String(s)) if self.sensitive => s,
            Some(v) => v.to_string(),
        }
    }

    fn redact(&self, value: Option<&Value>) -> Option<Value> {
        value.map(|v| {
            if self.sensitive {
                Value::from(REDACTED)
            } else {
                v.clone()
            }
        })
    }
}

impl fmt::Debug for AttributeChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeChange")
            .field("name", &self.name)
            .field("before", &self.redact(self.before.as_ref()))
            .field("after", &self.redact(self.after.as_ref()))
            .field("sensitive", &self.sensitive)
            .finish()
    }
}

impl Serialize for AttributeChange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut out = serializer.serialize_struct("AttributeChange", 4)?;
        out.serialize_field("name", &self.name)?;
        out.serialize_field("action", &self.action())?;
        out.serialize_field("before", &self.redact(self.before.as_ref()))?;
        out.serialize_field("after", &self.redact(self.after.as_ref()))?;
        out.end()
    }
}

/// Planned transition of one instance.
#[derive(Clone, Serialize)]
pub struct Plan {
    /// `type.name` address from the manifest.
    pub address: String,
    pub type_name: &'static str,
    pub action: PlanAction,
    pub changes: Vec<AttributeChange>,
    /// Values to write when the plan is applied.
    #[serde(skip)]
    pub planned: PlannedValues,
}

impl fmt::Debug for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plan")
            .field("address", &self.address)
            .field("type_name", &self.type_name)
            .field("action", &self.action)
            .field("changes", &self.changes)
            .field("planned", &self.planned.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Plan {
    pub fn is_noop(&self) -> bool {
        self.action == PlanAction::NoOp
    }
}

/// Plan the transition of one instance from `prior` to `config`.
///
/// Returns the validation diagnostics when the configuration is invalid.
pub fn plan(
    schema: &ResourceSchema,
    address: &str,
    config: &ResourceConfig,
    prior: Option<&ResourceData>,
) -> Result<Plan, Diagnostics> {
    let diags = validate(schema, config);
    if diags.has_errors() {
        return Err(diags);
    }

    let planned = planned_values(schema, config, prior);
    let existing = prior.filter(|p| p.exists());
    let changes: Vec<AttributeChange> = match existing {
        Some(p) => schema
            .changes(&p.attributes, &planned)
            .into_iter()
            .map(|(name, after)| change(schema, name, p.get(name), after))
            .collect(),
        None => planned
            .iter()
            .map(|(name, value)| change(schema, name, None, Some(value)))
            .collect(),
    };

    let action = match (existing, changes.is_empty()) {
        (None, _) => PlanAction::Create,
        (Some(_), true) => PlanAction::NoOp,
        (Some(_), false) => PlanAction::Update,
    };

    Ok(Plan {
        address: address.to_owned(),
        type_name: schema.type_name(),
        action,
        changes,
        planned,
    })
}

/// Plan the removal of a tracked instance.
pub fn destroy_plan(schema: &ResourceSchema, address: &str, prior: &ResourceData) -> Plan {
    let changes = schema
        .attributes()
        .filter_map(|(name, _)| {
            let value = prior.get(name)?;
            Some(change(schema, name, Some(value), None))
        })
        .collect();
    Plan {
        address: address.to_owned(),
        type_name: schema.type_name(),
        action: PlanAction::Delete,
        changes,
        planned: PlannedValues::new(),
    }
}

fn change(
    schema: &ResourceSchema,
    name: &str,
    before: Option<&Value>,
    after: Option<&Value>,
) -> AttributeChange {
    AttributeChange {
        name: name.to_owned(),
        before: before.cloned(),
        after: after.cloned(),
        sensitive: schema.get(name).is_some_and(|a| a.sensitive),
    }
}

// ── Rendering ───────────────────────────────────────────────────────

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self.action {
            PlanAction::Create => "will be created",
            PlanAction::Update => "will be updated in-place",
            PlanAction::NoOp => "is up to date",
            PlanAction::Delete => "will be destroyed",
        };
        writeln!(f, "{} {} {verb}", self.action.symbol(), self.address)?;
        let width = self.changes.iter().map(|c| c.name.len()).max().unwrap_or(0);
        for c in &self.changes {
            match c.action() {
                PlanAction::Create => {
                    writeln!(f, "    + {:<width$} = {}", c.name, c.display_after())?;
                }
                PlanAction::Delete => {
                    writeln!(f, "    - {:<width$} = {}", c.name, c.display_before())?;
                }
                _ => writeln!(
                    f,
                    "    ~ {:<width$} = {} -> {}",
                    c.name,
                    c.display_before(),
                    c.display_after()
                )?,
            }
        }
        Ok(())
    }
}
