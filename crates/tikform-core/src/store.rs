// ── State file ──
//
// JSON document mapping `type.name` addresses to instance state. Written
// atomically (temp file + rename) after every apply, so an interrupted run
// never leaves a half-written file behind.

use std::path::Path;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CoreError;
use crate::state::ResourceData;

/// Current on-disk format version.
pub const STATE_VERSION: u32 = 1;

/// One tracked instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredResource {
    #[serde(rename = "type")]
    pub type_name: String,
    pub name: String,
    #[serde(flatten)]
    pub data: ResourceData,
}

impl StoredResource {
    /// `type.name` address.
    pub fn address(&self) -> String {
        address(&self.type_name, &self.name)
    }
}

/// `type.name` address of an instance.
pub fn address(type_name: &str, name: &str) -> String {
    format!("{type_name}.{name}")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateFile {
    pub version: u32,
    /// Incremented on every save.
    pub serial: u64,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub resources: IndexMap<String, StoredResource>,
}

impl Default for StateFile {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            serial: 0,
            updated_at: Utc::now(),
            resources: IndexMap::new(),
        }
    }
}

impl StateFile {
    /// Load state from `path`; a missing file is an empty state.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no state file yet");
                return Ok(Self::default());
            }
            Err(e) => return Err(state_error(path, &e)),
        };
        let state: Self = serde_json::from_str(&text).map_err(|e| state_error(path, &e))?;
        if state.version > STATE_VERSION {
            return Err(CoreError::State {
                path: path.display().to_string(),
                reason: format!(
                    "format version {} is newer than supported version {STATE_VERSION}",
                    state.version
                ),
            });
        }
        Ok(state)
    }

    /// Bump the serial and write to `path`.
    pub fn save(&mut self, path: &Path) -> Result<(), CoreError> {
        self.serial += 1;
        self.updated_at = Utc::now();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| state_error(path, &e))?;
        }
        let text = serde_json::to_string_pretty(self).map_err(|e| state_error(path, &e))?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, text).map_err(|e| state_error(&tmp, &e))?;
        std::fs::rename(&tmp, path).map_err(|e| state_error(path, &e))?;
        debug!(path = %path.display(), serial = self.serial, "state saved");
        Ok(())
    }

    pub fn get(&self, type_name: &str, name: &str) -> Option<&StoredResource> {
        self.resources.get(&address(type_name, name))
    }

    /// Track or replace an instance. Instances without an id are dropped.
    pub fn put(&mut self, type_name: &str, name: &str, data: ResourceData) {
        let key = address(type_name, name);
        if data.exists() {
            self.resources.insert(
                key,
                StoredResource {
                    type_name: type_name.to_owned(),
                    name: name.to_owned(),
                    data,
                },
            );
        } else {
            self.resources.shift_remove(&key);
        }
    }

    pub fn remove(&mut self, type_name: &str, name: &str) -> Option<StoredResource> {
        self.resources.shift_remove(&address(type_name, name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &StoredResource> {
        self.resources.values()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

fn state_error(path: &Path, err: &dyn std::fmt::Display) -> CoreError {
    CoreError::State {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
}
