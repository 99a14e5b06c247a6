// List menus: every instance is one entry with its own `.id`.

use serde_json::Value;
use tracing::{info, warn};

use super::PlannedValues;
use crate::backend::Backend;
use crate::convert::{record_id, record_to_state, state_to_record};
use crate::diag::{Diagnostic, Diagnostics};
use crate::error::CoreError;
use crate::schema::{Identity, ResourceSchema};
use crate::state::ResourceData;

const NAME_KEY: &str = "name";

pub(super) async fn create<B: Backend>(
    backend: &B,
    schema: &ResourceSchema,
    data: &mut ResourceData,
    planned: &PlannedValues,
) -> Diagnostics {
    let record = state_to_record(schema, planned.iter().map(|(k, v)| (k.as_str(), Some(v))));
    let created = match backend.add(schema.path(), &record).await {
        Ok(created) => created,
        Err(e) => return Diagnostics::from(Diagnostic::from(e)),
    };
    let Some(remote_id) = record_id(&created) else {
        return Diagnostics::from(Diagnostic::from(CoreError::MissingId {
            path: schema.path().to_owned(),
        }));
    };
    info!(resource = schema.type_name(), id = %remote_id, "created");
    // Name-identified entries are tracked by name, not by `.id`.
    let id = match schema.identity_field() {
        Identity::Id => Some(remote_id),
        Identity::Name => planned.get(NAME_KEY).and_then(Value::as_str),
    };
    let Some(id) = id else {
        return Diagnostics::from(Diagnostic::error(format!(
            "{} is identified by name but none was planned",
            schema.type_name()
        )));
    };
    data.set_id(id);
    Diagnostics::new()
}

pub(super) async fn read<B: Backend>(
    backend: &B,
    schema: &ResourceSchema,
    data: &mut ResourceData,
) -> Diagnostics {
    let Some(id) = data.id().map(str::to_owned) else {
        return Diagnostics::new();
    };
    let found = match schema.identity_field() {
        Identity::Id => backend.get(schema.path(), &id).await,
        Identity::Name => find_by_name(backend, schema, &id).await,
    };
    let record = match found {
        Ok(Some(record)) => record,
        Ok(None) => {
            warn!(
                resource = schema.type_name(),
                id = %id,
                "instance no longer exists on the router"
            );
            data.clear_id();
            data.attributes.clear();
            return Diagnostics::new();
        }
        Err(e) => return Diagnostics::from(Diagnostic::from(e)),
    };
    match record_to_state(schema, &record) {
        Ok(attributes) => {
            data.attributes = attributes;
            Diagnostics::new()
        }
        Err(e) => Diagnostics::from(Diagnostic::from(e)),
    }
}

pub(super) async fn update<B: Backend>(
    backend: &B,
    schema: &ResourceSchema,
    data: &mut ResourceData,
    planned: &PlannedValues,
) -> Diagnostics {
    let remote_id = match remote_id(backend, schema, data).await {
        Ok(id) => id,
        Err(diags) => return diags,
    };
    let changes = schema.changes(&data.attributes, planned);
    if changes.is_empty() {
        return Diagnostics::new();
    }
    let record = state_to_record(schema, changes);
    info!(
        resource = schema.type_name(),
        id = %remote_id,
        fields = record.len(),
        "updating"
    );
    Diagnostics::from_result(backend.set(schema.path(), &remote_id, &record).await)
}

pub(super) async fn delete<B: Backend>(
    backend: &B,
    schema: &ResourceSchema,
    data: &mut ResourceData,
) -> Diagnostics {
    let remote_id = match remote_id(backend, schema, data).await {
        Ok(id) => id,
        Err(diags) => return diags,
    };
    match backend.remove(schema.path(), &remote_id).await {
        Ok(()) => info!(resource = schema.type_name(), id = %remote_id, "deleted"),
        Err(e) if e.is_not_found() => {
            warn!(
                resource = schema.type_name(),
                id = %remote_id,
                "already removed from the router"
            );
        }
        Err(e) => return Diagnostics::from(Diagnostic::from(e)),
    }
    data.clear_id();
    Diagnostics::new()
}

// The `.id` to address on the router. Name-identified entries are
// looked up by their `name` property.
async fn remote_id<B: Backend>(
    backend: &B,
    schema: &ResourceSchema,
    data: &ResourceData,
) -> Result<String, Diagnostics> {
    let Some(id) = data.id() else {
        return Err(Diagnostics::from(Diagnostic::error(format!(
            "{} has no id; refresh or import it first",
            schema.type_name()
        ))));
    };
    match schema.identity_field() {
        Identity::Id => Ok(id.to_owned()),
        Identity::Name => match find_by_name(backend, schema, id).await {
            Ok(Some(record)) => record_id(&record).map(str::to_owned).ok_or_else(|| {
                Diagnostics::from(Diagnostic::from(CoreError::MissingId {
                    path: schema.path().to_owned(),
                }))
            }),
            Ok(None) => Err(Diagnostics::from(Diagnostic::from(CoreError::NotFound {
                path: format!("{}/{id}", schema.path()),
            }))),
            Err(e) => Err(Diagnostics::from(Diagnostic::from(e))),
        },
    }
}

async fn find_by_name<B: Backend>(
    backend: &B,
    schema: &ResourceSchema,
    name: &str,
) -> Result<Option<tikform_api::Record>, CoreError> {
    let records = backend.list(schema.path()).await?;
    Ok(records
        .into_iter()
        .find(|r| r.get(NAME_KEY).and_then(Value::as_str) == Some(name)))
}
