//! CLI configuration: thin wrapper around `tikform_config` shared types.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` flag overrides (--router, --username, etc.).

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use tikform_core::{RouterConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use tikform_config::{
    Config, Defaults, Manifest, Profile, config_path, load_config_or_default, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Comma-separated profile names for error help.
pub fn available_profiles(config: &Config) -> String {
    let mut names: Vec<_> = config.profiles.keys().cloned().collect();
    if names.is_empty() {
        return "(none)".into();
    }
    names.sort();
    names.join(", ")
}

/// Manifest path: flag > config default.
pub fn manifest_path(global: &GlobalOpts, config: &Config) -> PathBuf {
    global
        .manifest
        .clone()
        .unwrap_or_else(|| config.defaults.manifest.clone())
}

/// State file path: flag > config default.
pub fn state_path(global: &GlobalOpts, config: &Config) -> PathBuf {
    global
        .state_file
        .clone()
        .unwrap_or_else(|| config.defaults.state.clone())
}

/// Build a `RouterConfig` from the config file, profile, and CLI overrides.
pub fn router_config(global: &GlobalOpts, config: &Config) -> Result<RouterConfig, CliError> {
    let profile_name = active_profile_name(global, config);

    if let Some(profile) = config.profiles.get(&profile_name) {
        return resolve_profile(profile, &profile_name, global, &config.defaults);
    }

    // An explicitly requested profile must exist
    if global.profile.is_some() {
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: available_profiles(config),
        });
    }

    // No profile -- build from CLI flags / env vars alone
    let Some(router) = global.router.as_deref() else {
        return Err(CliError::NoConfig {
            path: config_path().display().to_string(),
        });
    };

    let profile = Profile {
        router: router.to_owned(),
        ..Profile::default()
    };
    resolve_profile(&profile, &profile_name, global, &config.defaults)
}

/// Translate a `Profile` + global flags into a `RouterConfig`.
///
/// CLI flag overrides take priority over profile values.
pub fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    global: &GlobalOpts,
    defaults: &Defaults,
) -> Result<RouterConfig, CliError> {
    // 1. Router URL (flag > env > profile)
    let url_str = global.router.as_deref().unwrap_or(&profile.router);
    let url: url::Url = url_str.parse().map_err(|_| CliError::Validation {
        field: "router".into(),
        reason: format!("invalid URL: {url_str}"),
    })?;

    // 2. Credentials
    let username = match global.username {
        Some(ref user) => user.clone(),
        None => tikform_config::resolve_username(profile, profile_name)?,
    };
    let password = match global.password {
        Some(ref pw) => SecretString::from(pw.clone()),
        None => tikform_config::resolve_password(profile, profile_name)?,
    };

    // 3. TLS verification
    let tls = if global.insecure {
        TlsVerification::DangerAcceptInvalid
    } else {
        tikform_config::profile_tls(profile, defaults)
    };

    // 4. Timeout (flag > profile > defaults)
    let timeout = Duration::from_secs(
        global
            .timeout
            .or(profile.timeout)
            .unwrap_or(defaults.timeout),
    );

    Ok(RouterConfig {
        url,
        username,
        password,
        tls,
        timeout,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::Parser;
    use secrecy::ExposeSecret;

    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["tikform"];
        argv.extend_from_slice(args);
        argv.push("validate");
        Cli::try_parse_from(argv).unwrap().global
    }

    fn lab_config() -> Config {
        let mut config = Config::default();
        config.profiles.insert(
            "lab".into(),
            Profile {
                router: "https://192.168.88.1".into(),
                username: Some("admin".into()),
                password: Some("plain".into()),
                insecure: Some(true),
                timeout: Some(10),
                ..Profile::default()
            },
        );
        config
    }

    #[test]
    fn flags_override_profile() {
        let g = global(&[
            "--profile",
            "lab",
            "--router",
            "https://10.0.0.1",
            "--username",
            "ops",
            "--password",
            "flag-pw",
            "--timeout",
            "3",
        ]);
        let rc = router_config(&g, &lab_config()).unwrap();
        assert_eq!(rc.url.as_str(), "https://10.0.0.1/");
        assert_eq!(rc.username, "ops");
        assert_eq!(rc.password.expose_secret(), "flag-pw");
        assert_eq!(rc.timeout, Duration::from_secs(3));
        assert_eq!(rc.tls, TlsVerification::DangerAcceptInvalid);
    }

    #[test]
    fn missing_profile_lists_available() {
        let g = global(&["--profile", "prod"]);
        let err = router_config(&g, &lab_config()).unwrap_err();
        match err {
            CliError::ProfileNotFound { name, available } => {
                assert_eq!(name, "prod");
                assert_eq!(available, "lab");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn profile_timeout_applies_without_flag() {
        let mut g = global(&["--profile", "lab", "--password", "pw"]);
        g.timeout = None;
        let rc = router_config(&g, &lab_config()).unwrap();
        assert_eq!(rc.timeout, Duration::from_secs(10));
    }

    #[test]
    fn paths_fall_back_to_defaults() {
        let mut g = global(&[]);
        g.manifest = None;
        g.state_file = None;
        let config = Config::default();
        assert_eq!(manifest_path(&g, &config), PathBuf::from("tikform.toml"));
        assert_eq!(state_path(&g, &config), PathBuf::from("tikform.state.json"));
    }
}
