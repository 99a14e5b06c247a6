// ── Runtime connection configuration ──
//
// These types describe *how* to reach a router. They carry credential
// data and connection tuning, but never touch disk. The CLI builds a
// `RouterConfig` from its profile and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use tikform_api::{Credentials, RestClient, TlsMode, TransportConfig};

use crate::error::CoreError;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (the router's self-signed `www-ssl` certificate).
    DangerAcceptInvalid,
}

/// Configuration for connecting to a single router.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Router URL (e.g., `https://192.168.88.1`).
    pub url: Url,
    /// User with `read,write,api,rest-api` policies.
    pub username: String,
    pub password: SecretString,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
}

impl RouterConfig {
    /// Build the transport settings for this router.
    pub fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig {
            tls,
            timeout: self.timeout,
        }
    }

    /// Build a REST client for this router. Does not contact it.
    pub fn client(&self) -> Result<RestClient, CoreError> {
        let credentials = Credentials::new(self.username.clone(), self.password.clone());
        Ok(RestClient::new(
            self.url.clone(),
            credentials,
            &self.transport(),
        )?)
    }
}
