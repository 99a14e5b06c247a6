use secrecy::SecretString;

/// Credentials for HTTP basic auth against the RouterOS `www`/`www-ssl` service.
///
/// RouterOS has no session or token flow for the REST API; every request
/// carries the user name and password.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }
}
