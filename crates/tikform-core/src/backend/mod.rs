// ── Remote backend abstraction ──
//
// The lifecycle helpers talk to the router through this trait. The REST
// client implements it for real routers; `MemoryBackend` stands in for
// it in tests.

#[cfg(test)]
mod memory;

use std::future::Future;

use tikform_api::{Record, RestClient};

use crate::error::CoreError;

#[cfg(test)]
pub(crate) use memory::{BackendCall, MemoryBackend};

/// Menu-level operations on a RouterOS router.
///
/// `path` is the console menu path (`/radius`). List members are addressed
/// by `.id`.
pub trait Backend: Send + Sync {
    /// Every entry of a list menu.
    fn list(&self, path: &str) -> impl Future<Output = Result<Vec<Record>, CoreError>> + Send;

    /// One list member, `None` when the router no longer has it.
    fn get(
        &self,
        path: &str,
        id: &str,
    ) -> impl Future<Output = Result<Option<Record>, CoreError>> + Send;

    /// Add a list member, returning the created record with its `.id`.
    fn add(&self, path: &str, record: &Record)
    -> impl Future<Output = Result<Record, CoreError>> + Send;

    /// Change properties of a list member.
    fn set(
        &self,
        path: &str,
        id: &str,
        record: &Record,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn remove(&self, path: &str, id: &str) -> impl Future<Output = Result<(), CoreError>> + Send;

    /// Read a settings menu.
    fn get_settings(&self, path: &str) -> impl Future<Output = Result<Record, CoreError>> + Send;

    /// Change a settings menu.
    fn set_settings(
        &self,
        path: &str,
        record: &Record,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;
}

impl Backend for RestClient {
    async fn list(&self, path: &str) -> Result<Vec<Record>, CoreError> {
        Ok(RestClient::list(self, path).await?)
    }

    async fn get(&self, path: &str, id: &str) -> Result<Option<Record>, CoreError> {
        match RestClient::get(self, path, id).await {
            Ok(record) => Ok(Some(record)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn add(&self, path: &str, record: &Record) -> Result<Record, CoreError> {
        Ok(RestClient::add(self, path, record).await?)
    }

    async fn set(&self, path: &str, id: &str, record: &Record) -> Result<(), CoreError> {
        RestClient::patch(self, path, id, record).await?;
        Ok(())
    }

    async fn remove(&self, path: &str, id: &str) -> Result<(), CoreError> {
        Ok(RestClient::remove(self, path, id).await?)
    }

    async fn get_settings(&self, path: &str) -> Result<Record, CoreError> {
        Ok(RestClient::get_settings(self, path).await?)
    }

    async fn set_settings(&self, path: &str, record: &Record) -> Result<(), CoreError> {
        Ok(RestClient::set_settings(self, path, record).await?)
    }
}
