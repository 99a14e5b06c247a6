//! Resource manifests.
//!
//! A manifest is a TOML file listing the desired instances:
//!
//! ```toml
//! [[resource]]
//! type = "routeros_radius"
//! name = "main"
//! address = "10.0.0.1"
//! service = "ppp,login"
//! secret_env = "RADIUS_SECRET"
//!
//! [[resource]]
//! type = "routeros_radius_incoming"
//! name = "this"
//! accept = true
//! ```
//!
//! Every key besides `type` and `name` is an attribute value. A key ending
//! in `_env` names an environment variable holding the value of the
//! attribute without the suffix, so secrets stay out of the file.

use std::collections::HashSet;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use tikform_core::ResourceConfig;

use crate::ConfigError;

const ENV_SUFFIX: &str = "_env";

/// One desired instance.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ManifestResource {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub name: String,
    #[serde(flatten)]
    pub attributes: IndexMap<String, Value>,
}

impl ManifestResource {
    /// `type.name` address.
    pub fn address(&self) -> String {
        format!("{}.{}", self.resource_type, self.name)
    }

    /// Attribute values with `*_env` indirections resolved.
    pub fn config(&self) -> Result<ResourceConfig, ConfigError> {
        self.config_with(&|name| std::env::var(name).ok())
    }

    fn config_with(&self, env: &dyn Fn(&str) -> Option<String>) -> Result<ResourceConfig, ConfigError> {
        let mut config = ResourceConfig::new();
        for (key, value) in &self.attributes {
            match key.strip_suffix(ENV_SUFFIX) {
                Some(attribute) => {
                    let var = value.as_str().ok_or_else(|| ConfigError::Validation {
                        field: format!("{}.{key}", self.address()),
                        reason: "expected the name of an environment variable".into(),
                    })?;
                    let resolved = env(var).ok_or_else(|| ConfigError::Validation {
                        field: format!("{}.{key}", self.address()),
                        reason: format!("environment variable {var} is not set"),
                    })?;
                    config.insert(attribute.to_owned(), Value::String(resolved));
                }
                None => {
                    config.insert(key.clone(), value.clone());
                }
            }
        }
        Ok(config)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Manifest {
    #[serde(default, rename = "resource")]
    pub resources: Vec<ManifestResource>,
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| manifest_error(path, &e))?;
        Self::parse(&text).map_err(|e| match e {
            ConfigError::Manifest { reason, .. } => manifest_error(path, &reason),
            other => other,
        })
    }

    /// Parse and check a manifest document.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let manifest: Self = toml::from_str(text).map_err(|e| ConfigError::Manifest {
            path: "<inline>".into(),
            reason: e.to_string(),
        })?;
        manifest.check()?;
        Ok(manifest)
    }

    fn check(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for resource in &self.resources {
            if resource.name.is_empty()
                || !resource
                    .name
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
            {
                return Err(ConfigError::Validation {
                    field: format!("{}.name", resource.resource_type),
                    reason: format!(
                        "'{}' must be non-empty and use only letters, digits, '_' and '-'",
                        resource.name
                    ),
                });
            }
            if !seen.insert(resource.address()) {
                return Err(ConfigError::Validation {
                    field: "resource".into(),
                    reason: format!("{} is declared more than once", resource.address()),
                });
            }
        }
        Ok(())
    }

    pub fn find(&self, type_name: &str, name: &str) -> Option<&ManifestResource> {
        self.resources
            .iter()
            .find(|r| r.resource_type == type_name && r.name == name)
    }
}

fn manifest_error(path: &Path, err: &dyn std::fmt::Display) -> ConfigError {
    ConfigError::Manifest {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
}
