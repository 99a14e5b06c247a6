//! Import command handler.

use tikform_api::RestClient;
use tikform_core::{Provider, StateFile, resources, store};

use crate::cli::{GlobalOpts, ImportArgs};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output::{self, Palette};

use super::{plan, util};

pub async fn handle(
    provider: &Provider<RestClient>,
    args: ImportArgs,
    global: &GlobalOpts,
    cfg: &Config,
) -> Result<(), CliError> {
    let palette = Palette::new(&global.color);
    resources::lookup(&args.resource_type)?;

    let address = store::address(&args.resource_type, &args.name);
    let state_path = config::state_path(global, cfg);
    let mut state = StateFile::load(&state_path)?;
    if state.get(&args.resource_type, &args.name).is_some() {
        return Err(CliError::AlreadyTracked { address });
    }

    let (data, diags) = provider.import(&args.resource_type, &args.id).await;
    let errors = plan::report(&address, &diags, palette);
    if errors > 0 {
        return Err(CliError::Diagnostics { count: errors });
    }

    let shown = util::redact(&args.resource_type, &data);
    state.put(&args.resource_type, &args.name, data);
    state.save(&state_path)?;

    let out = output::render_single(
        &global.output,
        &shown,
        |d| {
            format!(
                "Imported {address} (id {})",
                d.id().unwrap_or_default()
            )
        },
        |d| d.id().unwrap_or_default().to_owned(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
