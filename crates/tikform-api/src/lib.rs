// tikform-api: Async Rust client for the RouterOS REST API

pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use auth::Credentials;
pub use client::RestClient;
pub use error::Error;
pub use models::Record;
pub use transport::{TlsMode, TransportConfig};
