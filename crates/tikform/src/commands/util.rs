//! Shared helpers for command handlers.

use std::io::IsTerminal;

use serde_json::Value;
use tracing::info;

use tikform_api::RestClient;
use tikform_core::{CoreError, Provider, ResourceData, resources};
use tikform_core::plan::REDACTED;

use crate::cli::GlobalOpts;
use crate::config::{self, Config};
use crate::error::CliError;

/// Build the REST client for the active profile and probe the router.
///
/// The probe reads `/system/resource` so that connection and credential
/// problems surface as one clear error before any resource is touched.
pub async fn connect(global: &GlobalOpts, cfg: &Config) -> Result<Provider<RestClient>, CliError> {
    let router = config::router_config(global, cfg)?;
    let client = router.client()?;

    let resource = client
        .system_resource()
        .await
        .map_err(|e| match CoreError::from(e) {
            CoreError::AuthenticationFailed { .. } => CliError::AuthFailed {
                profile: config::active_profile_name(global, cfg),
            },
            other => CliError::from(other),
        })?;

    let field = |key: &str| resource.get(key).and_then(Value::as_str).unwrap_or("?").to_owned();
    info!(
        url = %router.url,
        version = %field("version"),
        board = %field("board-name"),
        "connected"
    );
    Ok(Provider::new(client))
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Split a `type.name` address.
pub fn split_address(address: &str) -> Result<(&str, &str), CliError> {
    address
        .split_once('.')
        .filter(|(t, n)| !t.is_empty() && !n.is_empty())
        .ok_or_else(|| CliError::Validation {
            field: "address".into(),
            reason: format!("expected <type>.<name>, got '{address}'"),
        })
}

/// Copy of `data` with sensitive attribute values replaced.
pub fn redact(type_name: &str, data: &ResourceData) -> ResourceData {
    let mut out = data.clone();
    if let Ok(schema) = resources::lookup(type_name) {
        for (name, attribute) in schema.attributes() {
            if attribute.sensitive && out.get(name).is_some() {
                out.set(name, REDACTED);
            }
        }
    }
    out
}
