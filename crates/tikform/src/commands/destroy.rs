//! Destroy command handler.

use tikform_api::RestClient;
use tikform_core::{Provider, StateFile};

use crate::cli::{GlobalOpts, TargetArgs};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output::{self, Palette};

use super::plan;

pub async fn handle(
    provider: &Provider<RestClient>,
    args: TargetArgs,
    global: &GlobalOpts,
    cfg: &Config,
) -> Result<(), CliError> {
    let palette = Palette::new(&global.color);
    let state_path = config::state_path(global, cfg);
    let mut state = StateFile::load(&state_path)?;

    let mut targets = Vec::new();
    let mut errors = 0;
    for stored in state.iter().filter(|s| args.selects(&s.address())) {
        match provider.plan_destroy(&stored.type_name, &stored.name, &stored.data) {
            Ok(p) => targets.push((stored.type_name.clone(), stored.name.clone(), p)),
            Err(diags) => errors += plan::report(&stored.address(), &diags, palette),
        }
    }
    if errors > 0 {
        return Err(CliError::Diagnostics { count: errors });
    }
    if targets.is_empty() {
        if !global.quiet {
            eprintln!("Nothing to destroy.");
        }
        return Ok(());
    }

    let plans: Vec<_> = targets.iter().map(|(_, _, p)| p.clone()).collect();
    let out = output::render_plans(&global.output, &plans, palette)?;
    output::print_output(&out, global.quiet);

    let prompt = format!(
        "Destroy {} resource(s)? Router objects will be removed.",
        plans.len()
    );
    if !super::util::confirm(&prompt, "destroy", global.yes)? {
        eprintln!("Destroy cancelled.");
        return Ok(());
    }

    let mut destroyed = 0;
    for (type_name, name, p) in targets {
        let Some(stored) = state.get(&type_name, &name) else {
            continue;
        };
        let mut data = stored.data.clone();
        let diags = provider.destroy(&type_name, &mut data).await;
        let failed = plan::report(&p.address, &diags, palette);
        if failed == 0 {
            destroyed += 1;
        }
        errors += failed;
        state.put(&type_name, &name, data);
        state.save(&state_path)?;
    }

    if !global.quiet {
        eprintln!(
            "{}",
            palette.bold(&format!("Destroy complete! Resources: {destroyed} destroyed."))
        );
    }
    if errors > 0 {
        return Err(CliError::Diagnostics { count: errors });
    }
    Ok(())
}
