use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;
use tikform_api::Record;
use tikform_api::models::ID_KEY;

use super::Backend;
use crate::error::CoreError;

/// A request seen by [`MemoryBackend`], in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    List { path: String },
    Get { path: String, id: String },
    Add { path: String, record: Record },
    Set { path: String, id: String, record: Record },
    Remove { path: String, id: String },
    GetSettings { path: String },
    SetSettings { path: String, record: Record },
}

#[derive(Debug, Default)]
struct Inner {
    lists: HashMap<String, Vec<Record>>,
    settings: HashMap<String, Record>,
    next_id: u64,
    calls: Vec<BackendCall>,
    failure: Option<(String, String)>,
}

/// In-process router double.
///
/// List members get RouterOS-style ids (`*1`, `*2`, ... in hex). Settings
/// menus must be seeded with [`MemoryBackend::with_settings`] before they
/// can be read.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    inner: Mutex<Inner>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a settings menu.
    pub fn with_settings(self, path: &str, record: Record) -> Self {
        self.lock().settings.insert(path.to_owned(), record);
        self
    }

    /// Insert a list member directly, returning its id.
    pub fn insert(&self, path: &str, mut record: Record) -> String {
        let mut inner = self.lock();
        let id = match record.get(ID_KEY).and_then(Value::as_str) {
            Some(id) => id.to_owned(),
            None => {
                inner.next_id += 1;
                format!("*{:X}", inner.next_id)
            }
        };
        record.insert(ID_KEY.into(), Value::String(id.clone()));
        inner.lists.entry(path.to_owned()).or_default().push(record);
        id
    }

    /// Make the next call touching `path` fail with an API error.
    pub fn fail_next(&self, path: &str, detail: &str) {
        self.lock().failure = Some((path.to_owned(), detail.to_owned()));
    }

    pub fn records(&self, path: &str) -> Vec<Record> {
        self.lock().lists.get(path).cloned().unwrap_or_default()
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("memory backend lock poisoned")
    }

    fn begin(&self, call: BackendCall) -> Result<std::sync::MutexGuard<'_, Inner>, CoreError> {
        let mut inner = self.lock();
        let path = call_path(&call).to_owned();
        inner.calls.push(call);
        if inner.failure.as_ref().is_some_and(|(p, _)| *p == path) {
            let (_, detail) = inner.failure.take().unwrap_or_default();
            return Err(CoreError::Api {
                message: "Bad Request".into(),
                status: Some(400),
                detail: Some(detail),
            });
        }
        Ok(inner)
    }
}

fn call_path(call: &BackendCall) -> &str {
    match call {
        BackendCall::List { path }
        | BackendCall::Get { path, .. }
        | BackendCall::Add { path, .. }
        | BackendCall::Set { path, .. }
        | BackendCall::Remove { path, .. }
        | BackendCall::GetSettings { path }
        | BackendCall::SetSettings { path, .. } => path,
    }
}

fn not_found(path: &str, id: &str) -> CoreError {
    CoreError::NotFound {
        path: format!("{path}/{id}"),
    }
}

fn merge(target: &mut Record, changes: &Record) {
    for (key, value) in changes {
        target.insert(key.clone(), value.clone());
    }
}

fn has_id(record: &Record, id: &str) -> bool {
    record.get(ID_KEY).and_then(Value::as_str) == Some(id)
}

impl Backend for MemoryBackend {
    async fn list(&self, path: &str) -> Result<Vec<Record>, CoreError> {
        let inner = self.begin(BackendCall::List { path: path.into() })?;
        Ok(inner.lists.get(path).cloned().unwrap_or_default())
    }

    async fn get(&self, path: &str, id: &str) -> Result<Option<Record>, CoreError> {
        let inner = self.begin(BackendCall::Get {
            path: path.into(),
            id: id.into(),
        })?;
        Ok(inner
            .lists
            .get(path)
            .and_then(|records| records.iter().find(|r| has_id(r, id)))
            .cloned())
    }

    async fn add(&self, path: &str, record: &Record) -> Result<Record, CoreError> {
        let mut inner = self.begin(BackendCall::Add {
            path: path.into(),
            record: record.clone(),
        })?;
        inner.next_id += 1;
        let mut created = record.clone();
        created.insert(
            ID_KEY.into(),
            Value::String(format!("*{:X}", inner.next_id)),
        );
        inner
            .lists
            .entry(path.to_owned())
            .or_default()
            .push(created.clone());
        Ok(created)
    }

    async fn set(&self, path: &str, id: &str, record: &Record) -> Result<(), CoreError> {
        let mut inner = self.begin(BackendCall::Set {
            path: path.into(),
            id: id.into(),
            record: record.clone(),
        })?;
        let target = inner
            .lists
            .get_mut(path)
            .and_then(|records| records.iter_mut().find(|r| has_id(r, id)))
            .ok_or_else(|| not_found(path, id))?;
        merge(target, record);
        Ok(())
    }

    async fn remove(&self, path: &str, id: &str) -> Result<(), CoreError> {
        let mut inner = self.begin(BackendCall::Remove {
            path: path.into(),
            id: id.into(),
        })?;
        let records = inner.lists.get_mut(path).ok_or_else(|| not_found(path, id))?;
        let before = records.len();
        records.retain(|r| !has_id(r, id));
        if records.len() == before {
            return Err(not_found(path, id));
        }
        Ok(())
    }

    async fn get_settings(&self, path: &str) -> Result<Record, CoreError> {
        let inner = self.begin(BackendCall::GetSettings { path: path.into() })?;
        inner.settings.get(path).cloned().ok_or_else(|| CoreError::NotFound {
            path: path.to_owned(),
        })
    }

    async fn set_settings(&self, path: &str, record: &Record) -> Result<(), CoreError> {
        let mut inner = self.begin(BackendCall::SetSettings {
            path: path.into(),
            record: record.clone(),
        })?;
        merge(inner.settings.entry(path.to_owned()).or_default(), record);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        value.as_object().unwrap().clone()
    }

    #[tokio::test]
    async fn ids_are_routeros_style() {
        let backend = MemoryBackend::new();
        let mut ids = Vec::new();
        for _ in 0..10 {
            let created = backend
                .add("/radius", &record(json!({"address": "10.0.0.1"})))
                .await
                .unwrap();
            ids.push(created[".id"].clone());
        }
        assert_eq!(ids.first(), Some(&json!("*1")));
        assert_eq!(ids.last(), Some(&json!("*A")));
    }

    #[tokio::test]
    async fn missing_member_reads_as_none() {
        let backend = MemoryBackend::new();
        assert!(backend.get("/radius", "*9").await.unwrap().is_none());
        assert!(backend.remove("/radius", "*9").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn injected_failure_fires_once() {
        let backend = MemoryBackend::new().with_settings("/radius/incoming", Record::new());
        backend.fail_next("/radius/incoming", "bad port");
        let err = backend.get_settings("/radius/incoming").await.unwrap_err();
        assert!(matches!(err, CoreError::Api { detail: Some(ref d), .. } if d == "bad port"));
        assert!(backend.get_settings("/radius/incoming").await.is_ok());
        assert_eq!(backend.calls().len(), 2);
    }
}
