// RouterOS REST API client
//
// Wraps `reqwest::Client` with `/rest/...` URL construction, basic auth on
// every request, and error-body decoding. Menu paths are passed in the
// console form (`/radius`, `/radius/incoming`); list members are addressed
// by their `.id`.

use reqwest::{Method, StatusCode};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::auth::Credentials;
use crate::error::Error;
use crate::models::{ApiErrorBody, Record};
use crate::transport::TransportConfig;

/// Raw HTTP client for the RouterOS REST API (RouterOS 7.1+).
///
/// Verb mapping follows the router's conventions:
///
/// | operation          | request                       |
/// |--------------------|-------------------------------|
/// | list / read        | `GET /rest/{path}[/{id}]`     |
/// | add                | `PUT /rest/{path}`            |
/// | set (list member)  | `PATCH /rest/{path}/{id}`     |
/// | remove             | `DELETE /rest/{path}/{id}`    |
/// | set (menu setting) | `POST /rest/{path}/set`       |
pub struct RestClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Credentials,
}

impl RestClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the router root (e.g. `https://192.168.88.1`); the
    /// `/rest` prefix is added per request.
    pub fn new(
        base_url: Url,
        credentials: Credentials,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url, credentials))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url, credentials: Credentials) -> Self {
        Self {
            http,
            base_url,
            credentials,
        }
    }

    /// The router base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/rest/{path}/{tail...}`, percent-encoding each segment.
    pub(crate) fn rest_url(&self, path: &str, tail: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| Error::InvalidPath(self.base_url.to_string()))?;
            segments.pop_if_empty().push("rest");
            segments.extend(path.split('/').filter(|s| !s.is_empty()));
            segments.extend(tail);
        }
        Ok(url)
    }

    // ── Menu operations ──────────────────────────────────────────────

    /// Print every entry of a list menu.
    ///
    /// `GET /rest/{path}`
    pub async fn list(&self, path: &str) -> Result<Vec<Record>, Error> {
        let url = self.rest_url(path, &[])?;
        self.send(Method::GET, url, None).await
    }

    /// Fetch a single list member by id.
    ///
    /// `GET /rest/{path}/{id}`
    pub async fn get(&self, path: &str, id: &str) -> Result<Record, Error> {
        let url = self.rest_url(path, &[id])?;
        self.send(Method::GET, url, None).await
    }

    /// Add a list member; RouterOS echoes the created record including `.id`.
    ///
    /// `PUT /rest/{path}`
    pub async fn add(&self, path: &str, record: &Record) -> Result<Record, Error> {
        let url = self.rest_url(path, &[])?;
        self.send(Method::PUT, url, Some(record)).await
    }

    /// Change properties of a list member; returns the updated record.
    ///
    /// `PATCH /rest/{path}/{id}`
    pub async fn patch(&self, path: &str, id: &str, record: &Record) -> Result<Record, Error> {
        let url = self.rest_url(path, &[id])?;
        self.send(Method::PATCH, url, Some(record)).await
    }

    /// Remove a list member.
    ///
    /// `DELETE /rest/{path}/{id}`
    pub async fn remove(&self, path: &str, id: &str) -> Result<(), Error> {
        let url = self.rest_url(path, &[id])?;
        self.send_discard(Method::DELETE, url, None).await
    }

    /// Read a settings menu (a menu with exactly one, always-present entry).
    ///
    /// `GET /rest/{path}`
    pub async fn get_settings(&self, path: &str) -> Result<Record, Error> {
        let url = self.rest_url(path, &[])?;
        self.send(Method::GET, url, None).await
    }

    /// Change a settings menu.
    ///
    /// `POST /rest/{path}/set`
    pub async fn set_settings(&self, path: &str, record: &Record) -> Result<(), Error> {
        let url = self.rest_url(path, &["set"])?;
        self.send_discard(Method::POST, url, Some(record)).await
    }

    /// Fetch `/system/resource` (version, board, uptime).
    ///
    /// Cheap probe used to verify connectivity and credentials.
    pub async fn system_resource(&self) -> Result<Record, Error> {
        self.get_settings("/system/resource").await
    }

    // ── Request helpers ──────────────────────────────────────────────

    fn request(&self, method: Method, url: Url, body: Option<&Record>) -> reqwest::RequestBuilder {
        let builder = self.http.request(method, url).basic_auth(
            &self.credentials.username,
            Some(self.credentials.password.expose_secret()),
        );
        match body {
            Some(record) => builder.json(record),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<&Record>,
    ) -> Result<T, Error> {
        debug!("{method} {url}");
        let resp = self
            .request(method, url.clone(), body)
            .send()
            .await
            .map_err(Error::Transport)?;
        let text = Self::check_status(&url, resp).await?;

        serde_json::from_str(&text).map_err(|e| {
            let head = preview(&text);
            Error::Deserialization {
                message: format!("{e} (body preview: {head:?})"),
                body: text.clone(),
            }
        })
    }

    async fn send_discard(
        &self,
        method: Method,
        url: Url,
        body: Option<&Record>,
    ) -> Result<(), Error> {
        debug!("{method} {url}");
        let resp = self
            .request(method, url.clone(), body)
            .send()
            .await
            .map_err(Error::Transport)?;
        let text = Self::check_status(&url, resp).await?;
        trace!(len = text.len(), "discarding response body");
        Ok(())
    }

    /// Map non-success statuses to errors, returning the body text otherwise.
    async fn check_status(url: &Url, resp: reqwest::Response) -> Result<String, Error> {
        let status = resp.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(Error::Authentication {
                message: "router rejected the user name or password".into(),
            });
        }

        if status == StatusCode::NOT_FOUND {
            return Err(Error::NotFound {
                path: url.path().to_owned(),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;

        if status.is_success() {
            return Ok(body);
        }

        Err(match serde_json::from_str::<ApiErrorBody>(&body) {
            Ok(err) => Error::Api {
                status: err.error,
                message: err.message,
                detail: err.detail,
            },
            Err(_) => Error::Api {
                status: status.as_u16(),
                message: format!("HTTP {status}: {}", preview(&body)),
                detail: None,
            },
        })
    }
}

const PREVIEW_CHARS: usize = 200;

/// First 200 characters of a response body, cut on a char boundary.
fn preview(body: &str) -> &str {
    body.char_indices()
        .nth(PREVIEW_CHARS)
        .map_or(body, |(i, _)| &body[..i])
}
