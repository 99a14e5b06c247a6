//! Schema-driven lifecycle engine between `tikform-api` and the CLI.
//!
//! This crate owns the resource model and the generic machinery that drives
//! it:
//!
//! - **Schemas** ([`schema`]): static attribute tables holding each
//!   attribute's type, presence, default, validator, sensitivity and
//!   diff-suppression, plus the remote path, identity selector and
//!   [`ResourceKind`].
//!
//! - **Resources** ([`resources`]): the concrete tables for `/radius` and
//!   `/radius/incoming`, registered by type name.
//!
//! - **Lifecycle** ([`lifecycle`]): generic create/read/update/delete
//!   helpers for list menus and settings menus, over any [`Backend`].
//!   [`compat`] holds the VRF compatibility read for older firmware.
//!
//! - **Plans** ([`plan`]): configuration validation, planned values,
//!   diffing with suppression, and redacted rendering.
//!
//! - **[`Provider`]**: facade tying the above together for one router:
//!   validate, plan, apply, refresh, destroy, import.

pub mod backend;
pub mod compat;
pub mod config;
pub mod convert;
pub mod diag;
pub mod error;
pub mod lifecycle;
pub mod plan;
pub mod provider;
pub mod resources;
pub mod schema;
pub mod state;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use backend::Backend;
pub use config::{RouterConfig, TlsVerification};
pub use diag::{Diagnostic, Diagnostics, Severity};
pub use error::CoreError;
pub use plan::{AttributeChange, Plan, PlanAction};
pub use provider::Provider;
pub use schema::{Attribute, AttributeType, Identity, ResourceKind, ResourceSchema};
pub use state::{ResourceConfig, ResourceData};
pub use store::{StateFile, StoredResource};
