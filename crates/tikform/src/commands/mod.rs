//! Command dispatch: bridges CLI args -> provider calls -> output formatting.

pub mod apply;
pub mod config_cmd;
pub mod destroy;
pub mod import;
pub mod plan;
pub mod schema;
pub mod state;
pub mod util;
pub mod validate;

use tikform_api::RestClient;
use tikform_core::Provider;

use crate::cli::{Command, GlobalOpts};
use crate::config::Config;
use crate::error::CliError;

/// Dispatch a router-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    provider: &Provider<RestClient>,
    global: &GlobalOpts,
    cfg: &Config,
) -> Result<(), CliError> {
    match cmd {
        Command::Plan(args) => plan::handle(provider, args, global, cfg).await,
        Command::Apply(args) => apply::handle(provider, args, global, cfg).await,
        Command::Import(args) => import::handle(provider, args, global, cfg).await,
        Command::Destroy(args) => destroy::handle(provider, args, global, cfg).await,
        // Local commands are handled before a connection is made
        Command::Validate
        | Command::State(_)
        | Command::Schema(_)
        | Command::Config(_)
        | Command::Completions(_) => unreachable!(),
    }
}
