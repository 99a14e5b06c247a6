//! Schema command handler: describes the registered resource types.

use serde::Serialize;
use serde_json::Value;
use tabled::Tabled;

use tikform_core::schema::DiffSuppress;
use tikform_core::{Attribute, ResourceSchema, resources};

use crate::cli::{GlobalOpts, SchemaArgs};
use crate::error::CliError;
use crate::output;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Tabled)]
struct TypeRow {
    #[tabled(rename = "Type")]
    #[serde(rename = "type")]
    type_name: &'static str,
    #[tabled(rename = "Path")]
    path: &'static str,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Identity")]
    identity: String,
    #[tabled(rename = "Attributes")]
    attributes: usize,
}

impl From<&ResourceSchema> for TypeRow {
    fn from(s: &ResourceSchema) -> Self {
        Self {
            type_name: s.type_name(),
            path: s.path(),
            kind: s.kind().to_string(),
            identity: s.identity_field().to_string(),
            attributes: s.len(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Tabled)]
struct AttributeRow {
    #[tabled(rename = "Attribute")]
    name: &'static str,
    #[tabled(rename = "Type")]
    #[serde(rename = "type")]
    kind: String,
    #[tabled(rename = "Presence")]
    presence: String,
    #[tabled(rename = "Default")]
    default: String,
    #[tabled(rename = "Rules")]
    rules: String,
    #[tabled(rename = "Description")]
    description: &'static str,
}

impl AttributeRow {
    fn new(name: &'static str, a: &Attribute) -> Self {
        let mut rules = Vec::new();
        if let Some(v) = &a.validator {
            rules.push(v.to_string());
        }
        if a.sensitive {
            rules.push("sensitive".into());
        }
        if let Some(DiffSuppress::TimeEqual) = a.diff_suppress {
            rules.push("equal durations match".into());
        }
        Self {
            name,
            kind: a.kind.to_string(),
            presence: a.presence.to_string(),
            default: match &a.default {
                Some(Value::String(s)) => s.clone(),
                Some(v) => v.to_string(),
                None => String::new(),
            },
            rules: rules.join("; "),
            description: a.description,
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: SchemaArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let out = match args.resource_type {
        None => {
            let rows: Vec<TypeRow> = resources::all().iter().map(TypeRow::from).collect();
            output::render_list(&global.output, &rows, Clone::clone, |r| r.type_name.to_owned())?
        }
        Some(type_name) => {
            let schema = resources::lookup(&type_name)?;
            let rows: Vec<AttributeRow> = schema
                .attributes()
                .map(|(name, a)| AttributeRow::new(name, a))
                .collect();
            output::render_list(&global.output, &rows, Clone::clone, |r| r.name.to_owned())?
        }
    };
    output::print_output(&out, global.quiet);
    Ok(())
}
