// ── Generic lifecycle helpers ──
//
// Create/read/update/delete for any schema, dispatched on its
// `ResourceKind`. Every helper reports problems as diagnostics instead of
// failing; backend errors pass through with their message unchanged.
// Writes are always followed by a read so state reflects the router.

mod list;
mod system;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

use crate::backend::Backend;
use crate::diag::Diagnostics;
use crate::schema::{ResourceKind, ResourceSchema};
use crate::state::ResourceData;

/// Planned attribute values, keyed by attribute name.
pub type PlannedValues = IndexMap<String, Value>;

/// Create a new instance from its planned values.
pub async fn create<B: Backend>(
    backend: &B,
    schema: &ResourceSchema,
    planned: &PlannedValues,
) -> (ResourceData, Diagnostics) {
    let mut data = ResourceData::new();
    let mut diags = match schema.kind() {
        ResourceKind::List => list::create(backend, schema, &mut data, planned).await,
        ResourceKind::Singleton => system::create(backend, schema, &mut data, planned).await,
    };
    if !diags.has_errors() {
        diags.append(read(backend, schema, &mut data).await);
    }
    (data, diags)
}

/// Refresh `data` from the router, then run the schema's read adapter.
///
/// A list member that no longer exists leaves `data` without an id.
pub async fn read<B: Backend>(
    backend: &B,
    schema: &ResourceSchema,
    data: &mut ResourceData,
) -> Diagnostics {
    let diags = match schema.kind() {
        ResourceKind::List => list::read(backend, schema, data).await,
        ResourceKind::Singleton => system::read(backend, schema, data).await,
    };
    if let Some(adapter) = schema.adapter() {
        debug!(resource = schema.type_name(), "running read adapter");
        adapter(data);
    }
    diags
}

/// Push the attributes that differ between `data` and `planned`.
pub async fn update<B: Backend>(
    backend: &B,
    schema: &ResourceSchema,
    data: &mut ResourceData,
    planned: &PlannedValues,
) -> Diagnostics {
    let mut diags = match schema.kind() {
        ResourceKind::List => list::update(backend, schema, data, planned).await,
        ResourceKind::Singleton => system::update(backend, schema, data, planned).await,
    };
    if !diags.has_errors() {
        diags.append(read(backend, schema, data).await);
    }
    diags
}

/// Remove the instance. On success `data` no longer has an id.
pub async fn delete<B: Backend>(
    backend: &B,
    schema: &ResourceSchema,
    data: &mut ResourceData,
) -> Diagnostics {
    match schema.kind() {
        ResourceKind::List => list::delete(backend, schema, data).await,
        ResourceKind::Singleton => system::delete(schema, data),
    }
}

/// Adopt an existing remote instance: the id is taken verbatim.
pub fn import_passthrough(id: impl Into<String>) -> ResourceData {
    ResourceData::with_id(id)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::backend::{BackendCall, MemoryBackend};
    use crate::schema::{Attribute, Identity};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tikform_api::Record;

    fn planned(value: Value) -> PlannedValues {
        value
            .as_object()
            .unwrap()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    fn record(value: Value) -> Record {
        value.as_object().unwrap().clone()
    }

    fn servers() -> ResourceSchema {
        ResourceSchema::new("routeros_test_list", "/test/list", ResourceKind::List)
            .attribute("address", Attribute::required_string())
            .attribute("port", Attribute::optional_int().with_default(1812))
            .attribute("comment", Attribute::optional_string())
    }

    fn settings() -> ResourceSchema {
        ResourceSchema::new("routeros_test_settings", "/test/settings", ResourceKind::Singleton)
            .identity(Identity::Name)
            .attribute("accept", Attribute::optional_bool().with_default(false))
            .attribute("port", Attribute::optional_int().with_default(3799))
    }

    fn named() -> ResourceSchema {
        ResourceSchema::new("routeros_test_named", "/test/named", ResourceKind::List)
            .identity(Identity::Name)
            .attribute("name", Attribute::required_string())
            .attribute("port", Attribute::optional_int().with_default(1812))
    }

    fn tag_adapter(data: &mut ResourceData) {
        data.set_effective_default("marker", "seen");
    }

    #[tokio::test]
    async fn list_create_reads_back() {
        let backend = MemoryBackend::new();
        let (data, diags) = create(
            &backend,
            &servers(),
            &planned(json!({"address": "10.0.0.1", "port": 1812})),
        )
        .await;
        assert!(diags.is_empty(), "{diags}");
        assert_eq!(data.id(), Some("*1"));
        assert_eq!(data.get("port"), Some(&json!(1812)));
        assert_eq!(
            backend.calls(),
            vec![
                BackendCall::Add {
                    path: "/test/list".into(),
                    record: record(json!({"address": "10.0.0.1", "port": "1812"})),
                },
                BackendCall::Get {
                    path: "/test/list".into(),
                    id: "*1".into(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn list_update_sends_only_changes() {
        let backend = MemoryBackend::new();
        let id = backend.insert(
            "/test/list",
            record(json!({"address": "10.0.0.1", "port": "1812", "comment": "old"})),
        );
        let mut data = ResourceData::with_id(&id);
        assert!(read(&backend, &servers(), &mut data).await.is_empty());

        let diags = update(
            &backend,
            &servers(),
            &mut data,
            &planned(json!({"address": "10.0.0.1", "port": 1645})),
        )
        .await;
        assert!(diags.is_empty(), "{diags}");
        assert_eq!(data.get("port"), Some(&json!(1645)));
        assert_eq!(data.get("comment"), None);
        assert!(backend.calls().contains(&BackendCall::Set {
            path: "/test/list".into(),
            id,
            record: record(json!({"port": "1645", "comment": ""})),
        }));
    }

    #[tokio::test]
    async fn vanished_member_clears_id() {
        let backend = MemoryBackend::new();
        let mut data = ResourceData::with_id("*7");
        data.set("address", "10.0.0.1");
        let diags = read(&backend, &servers(), &mut data).await;
        assert!(diags.is_empty());
        assert!(!data.exists());
        assert!(data.attributes.is_empty());
    }

    #[tokio::test]
    async fn list_delete_tolerates_missing_member() {
        let backend = MemoryBackend::new();
        let mut data = ResourceData::with_id("*7");
        let diags = delete(&backend, &servers(), &mut data).await;
        assert!(!diags.has_errors());
        assert!(!data.exists());
    }

    #[tokio::test]
    async fn backend_errors_pass_through() {
        let backend = MemoryBackend::new();
        backend.fail_next("/test/list", "invalid value for argument address");
        let (data, diags) =
            create(&backend, &servers(), &planned(json!({"address": "10.0.0.1"}))).await;
        assert!(diags.has_errors());
        assert!(!data.exists());
        let d = diags.iter().next().unwrap();
        assert_eq!(d.detail.as_deref(), Some("invalid value for argument address"));
    }

    #[tokio::test]
    async fn named_member_is_tracked_by_name() {
        let backend = MemoryBackend::new();
        let (data, diags) = create(
            &backend,
            &named(),
            &planned(json!({"name": "edge", "port": 1812})),
        )
        .await;
        assert!(diags.is_empty(), "{diags}");
        assert_eq!(data.id(), Some("edge"));
        assert_eq!(data.get("port"), Some(&json!(1812)));
        assert_eq!(
            backend.calls().last(),
            Some(&BackendCall::List {
                path: "/test/named".into(),
            })
        );
    }

    #[tokio::test]
    async fn named_member_reads_by_name() {
        let backend = MemoryBackend::new();
        backend.insert("/test/named", record(json!({"name": "core", "port": "1645"})));
        backend.insert("/test/named", record(json!({"name": "edge", "port": "1700"})));
        let mut data = ResourceData::with_id("edge");
        let diags = read(&backend, &named(), &mut data).await;
        assert!(diags.is_empty(), "{diags}");
        assert_eq!(data.id(), Some("edge"));
        assert_eq!(data.get("port"), Some(&json!(1700)));
    }

    #[tokio::test]
    async fn named_member_writes_through_looked_up_id() {
        let backend = MemoryBackend::new();
        backend.insert("/test/named", record(json!({"name": "core", "port": "1645"})));
        let remote = backend.insert("/test/named", record(json!({"name": "edge", "port": "1812"})));
        let mut data = ResourceData::with_id("edge");
        assert!(read(&backend, &named(), &mut data).await.is_empty());

        let diags = update(
            &backend,
            &named(),
            &mut data,
            &planned(json!({"name": "edge", "port": 1700})),
        )
        .await;
        assert!(diags.is_empty(), "{diags}");
        assert_eq!(data.get("port"), Some(&json!(1700)));
        assert!(backend.calls().contains(&BackendCall::Set {
            path: "/test/named".into(),
            id: remote.clone(),
            record: record(json!({"port": "1700"})),
        }));

        let diags = delete(&backend, &named(), &mut data).await;
        assert!(diags.is_empty(), "{diags}");
        assert!(!data.exists());
        assert!(backend.calls().contains(&BackendCall::Remove {
            path: "/test/named".into(),
            id: remote,
        }));
        let left = backend.records("/test/named");
        assert_eq!(left.len(), 1);
        assert_eq!(left[0]["name"], json!("core"));
    }

    #[tokio::test]
    async fn missing_named_member_is_not_found() {
        let backend = MemoryBackend::new();
        backend.insert("/test/named", record(json!({"name": "core"})));
        let mut data = ResourceData::with_id("gone");
        data.set("name", "gone");

        let diags = update(
            &backend,
            &named(),
            &mut data,
            &planned(json!({"name": "gone", "port": 1700})),
        )
        .await;
        assert!(diags.has_errors());
        let d = diags.iter().next().unwrap();
        assert_eq!(d.summary, "Not found: /test/named/gone");

        let diags = delete(&backend, &named(), &mut data).await;
        assert!(diags.has_errors());
        assert_eq!(data.id(), Some("gone"));
    }

    #[tokio::test]
    async fn singleton_create_sets_path_and_derives_id() {
        let backend = MemoryBackend::new()
            .with_settings("/test/settings", record(json!({"accept": "false", "port": "3799"})));
        let (data, diags) = create(
            &backend,
            &settings(),
            &planned(json!({"accept": true, "port": 3799})),
        )
        .await;
        assert!(diags.is_empty(), "{diags}");
        assert_eq!(data.id(), Some("test/settings"));
        assert_eq!(data.get("accept"), Some(&json!(true)));
    }

    #[tokio::test]
    async fn singleton_read_keeps_existing_id() {
        let backend =
            MemoryBackend::new().with_settings("/test/settings", record(json!({"port": "1700"})));
        let mut data = import_passthrough("radius1");
        assert!(read(&backend, &settings(), &mut data).await.is_empty());
        assert_eq!(data.id(), Some("radius1"));
        assert_eq!(data.get("port"), Some(&json!(1700)));
    }

    #[tokio::test]
    async fn singleton_delete_only_forgets() {
        let backend =
            MemoryBackend::new().with_settings("/test/settings", record(json!({"port": "1700"})));
        let mut data = ResourceData::with_id("test/settings");
        let diags = delete(&backend, &settings(), &mut data).await;
        assert!(!diags.has_errors());
        assert_eq!(diags.len(), 1);
        assert!(!data.exists());
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn adapter_runs_after_failed_read() {
        let schema = settings().read_adapter(tag_adapter);
        let backend = MemoryBackend::new();
        let mut data = ResourceData::with_id("test/settings");
        let diags = read(&backend, &schema, &mut data).await;
        assert!(diags.has_errors());
        assert_eq!(data.effective_default("marker"), Some(&json!("seen")));
    }

    #[test]
    fn import_keeps_id_verbatim() {
        assert_eq!(import_passthrough("radius1").id(), Some("radius1"));
    }
}
