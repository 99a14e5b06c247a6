// Settings menus: one always-present entry, changed with `set`.

use tracing::{info, warn};

use super::PlannedValues;
use crate::backend::Backend;
use crate::convert::{record_to_state, state_to_record};
use crate::diag::{Diagnostic, Diagnostics};
use crate::schema::ResourceSchema;
use crate::state::ResourceData;

pub(super) async fn create<B: Backend>(
    backend: &B,
    schema: &ResourceSchema,
    data: &mut ResourceData,
    planned: &PlannedValues,
) -> Diagnostics {
    let record = state_to_record(schema, planned.iter().map(|(k, v)| (k.as_str(), Some(v))));
    info!(
        resource = schema.type_name(),
        path = schema.path(),
        "applying settings"
    );
    let diags = Diagnostics::from_result(backend.set_settings(schema.path(), &record).await);
    if !diags.has_errors() && !data.exists() {
        data.set_id(schema.singleton_id());
    }
    diags
}

pub(super) async fn read<B: Backend>(
    backend: &B,
    schema: &ResourceSchema,
    data: &mut ResourceData,
) -> Diagnostics {
    let record = match backend.get_settings(schema.path()).await {
        Ok(record) => record,
        Err(e) => return Diagnostics::from(Diagnostic::from(e)),
    };
    match record_to_state(schema, &record) {
        Ok(attributes) => {
            data.attributes = attributes;
            if !data.exists() {
                data.set_id(schema.singleton_id());
            }
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
    let changes = schema.changes(&data.attributes, planned);
    if changes.is_empty() {
        return Diagnostics::new();
    }
    let record = state_to_record(schema, changes);
    info!(
        resource = schema.type_name(),
        path = schema.path(),
        fields = record.len(),
        "updating settings"
    );
    Diagnostics::from_result(backend.set_settings(schema.path(), &record).await)
}

// The setting cannot be removed from the router; only local tracking ends.
pub(super) fn delete(schema: &ResourceSchema, data: &mut ResourceData) -> Diagnostics {
    warn!(
        resource = schema.type_name(),
        path = schema.path(),
        "settings stay on the router; forgetting local state only"
    );
    data.clear_id();
    Diagnostics::from(
        Diagnostic::warning(format!(
            "{} cannot be deleted; it was removed from state but the router keeps its current settings",
            schema.path()
        )),
    )
}
