//! Apply command handler.

use std::time::{Duration, Instant};

use tracing::info;

use tikform_api::RestClient;
use tikform_core::{PlanAction, Provider, StateFile};

use crate::cli::{GlobalOpts, PlanArgs};
use crate::config::{self, Config, Manifest};
use crate::error::CliError;
use crate::output::Palette;

use super::{plan, util};

#[derive(Debug, Default)]
struct Tally {
    added: usize,
    changed: usize,
    destroyed: usize,
    errors: usize,
}

pub async fn handle(
    provider: &Provider<RestClient>,
    args: PlanArgs,
    global: &GlobalOpts,
    cfg: &Config,
) -> Result<(), CliError> {
    let palette = Palette::new(&global.color);
    let manifest = Manifest::load(&config::manifest_path(global, cfg))?;
    let state_path = config::state_path(global, cfg);
    let mut state = StateFile::load(&state_path)?;

    let planned = plan::build(
        provider,
        &manifest,
        &state,
        &args.targets,
        !args.no_refresh,
        palette,
    )
    .await?;
    plan::show(&planned, global, palette)?;

    for (type_name, name) in &planned.vanished {
        state.remove(type_name, name);
    }

    if !planned.has_changes() {
        // Keep what the refresh saw.
        for step in planned.steps {
            if let Some(prior) = step.prior {
                state.put(&step.type_name, &step.name, prior);
            }
        }
        state.save(&state_path)?;
        return Ok(());
    }

    if !util::confirm("Apply these changes?", "apply", global.yes)? {
        eprintln!("Apply cancelled.");
        return Ok(());
    }

    let started = Instant::now();
    let mut tally = Tally::default();

    for step in planned.steps {
        let action = step.plan.action;
        let address = step.plan.address.clone();
        let (data, diags) = provider.apply(&step.plan, step.prior).await;

        let errors = plan::report(&address, &diags, palette);
        tally.errors += errors;
        if errors == 0 {
            match action {
                PlanAction::Create => tally.added += 1,
                PlanAction::Update => tally.changed += 1,
                PlanAction::Delete => tally.destroyed += 1,
                PlanAction::NoOp => {}
            }
        }

        state.put(&step.type_name, &step.name, data);
        if action != PlanAction::NoOp {
            state.save(&state_path)?;
            info!(address = %address, action = %action, "state saved");
        }
    }
    state.save(&state_path)?;

    let elapsed = Duration::from_millis(u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX));
    if !global.quiet {
        eprintln!(
            "{}",
            palette.bold(&format!(
                "Apply complete! Resources: {} added, {} changed, {} destroyed. ({})",
                tally.added,
                tally.changed,
                tally.destroyed,
                humantime::format_duration(elapsed)
            ))
        );
    }

    if tally.errors > 0 {
        return Err(CliError::Diagnostics {
            count: tally.errors,
        });
    }
    Ok(())
}
