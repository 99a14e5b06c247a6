//! Plan command handler and the planning pass shared with `apply`.

use std::collections::HashSet;

use tracing::{debug, warn};

use tikform_api::RestClient;
use tikform_core::{Diagnostics, Plan, Provider, ResourceData, StateFile};

use crate::cli::{GlobalOpts, PlanArgs, TargetArgs};
use crate::config::{self, Config, Manifest};
use crate::error::CliError;
use crate::output::{self, Palette};

// ── Planning pass ───────────────────────────────────────────────────

/// One instance's planned transition plus the state it starts from.
pub struct Step {
    pub type_name: String,
    pub name: String,
    pub prior: Option<ResourceData>,
    pub plan: Plan,
}

#[derive(Default)]
pub struct Planned {
    pub steps: Vec<Step>,
    /// Tracked instances, absent from the manifest, that the refresh
    /// found already gone from the router.
    pub vanished: Vec<(String, String)>,
}

impl Planned {
    pub fn plans(&self) -> Vec<Plan> {
        self.steps.iter().map(|s| s.plan.clone()).collect()
    }

    pub fn has_changes(&self) -> bool {
        self.steps.iter().any(|s| !s.plan.is_noop())
    }
}

/// Plan every selected manifest resource, then the removal of every
/// selected tracked instance the manifest no longer declares.
///
/// Diagnostics are printed as they arrive; any error fails the pass.
pub async fn build(
    provider: &Provider<RestClient>,
    manifest: &Manifest,
    state: &StateFile,
    targets: &TargetArgs,
    refresh: bool,
    palette: Palette,
) -> Result<Planned, CliError> {
    let mut planned = Planned::default();
    let mut errors = 0;

    let declared: HashSet<String> = manifest.resources.iter().map(|r| r.address()).collect();

    for resource in &manifest.resources {
        let address = resource.address();
        if !targets.selects(&address) {
            continue;
        }
        let config = resource.config()?;
        let mut prior = state
            .get(&resource.resource_type, &resource.name)
            .map(|s| s.data.clone());

        if let Some(data) = prior.as_mut().filter(|_| refresh) {
            let diags = provider.refresh(&resource.resource_type, data).await;
            errors += report(&address, &diags, palette);
            if diags.has_errors() {
                continue;
            }
        }

        match provider.plan(&resource.resource_type, &resource.name, &config, prior.as_ref()) {
            Ok(plan) => {
                debug!(address = %address, action = %plan.action, "planned");
                planned.steps.push(Step {
                    type_name: resource.resource_type.clone(),
                    name: resource.name.clone(),
                    prior,
                    plan,
                });
            }
            Err(diags) => errors += report(&address, &diags, palette),
        }
    }

    for stored in state.iter() {
        let address = stored.address();
        if declared.contains(&address) || !targets.selects(&address) {
            continue;
        }
        let mut data = stored.data.clone();
        if refresh {
            let diags = provider.refresh(&stored.type_name, &mut data).await;
            errors += report(&address, &diags, palette);
            if diags.has_errors() {
                continue;
            }
            if !data.exists() {
                warn!(address = %address, "no longer on the router");
                planned
                    .vanished
                    .push((stored.type_name.clone(), stored.name.clone()));
                continue;
            }
        }
        match provider.plan_destroy(&stored.type_name, &stored.name, &data) {
            Ok(plan) => planned.steps.push(Step {
                type_name: stored.type_name.clone(),
                name: stored.name.clone(),
                prior: Some(data),
                plan,
            }),
            Err(diags) => errors += report(&address, &diags, palette),
        }
    }

    if errors > 0 {
        return Err(CliError::Diagnostics { count: errors });
    }
    Ok(planned)
}

/// Print diagnostics and return how many are errors.
pub fn report(address: &str, diags: &Diagnostics, palette: Palette) -> usize {
    output::print_diagnostics(address, diags, palette);
    diags.iter().filter(|d| d.is_error()).count()
}

/// Print the plan set and its summary line.
pub fn show(planned: &Planned, global: &GlobalOpts, palette: Palette) -> Result<(), CliError> {
    let plans = planned.plans();
    let out = output::render_plans(&global.output, &plans, palette)?;
    output::print_output(&out, global.quiet);
    if !global.quiet && matches!(global.output, crate::cli::OutputFormat::Table) {
        if planned.has_changes() {
            eprintln!("{}", palette.bold(&output::plan_summary(&plans)));
        } else {
            eprintln!("No changes. The router matches the manifest.");
        }
    }
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    provider: &Provider<RestClient>,
    args: PlanArgs,
    global: &GlobalOpts,
    cfg: &Config,
) -> Result<(), CliError> {
    let palette = Palette::new(&global.color);
    let manifest = Manifest::load(&config::manifest_path(global, cfg))?;
    let state = StateFile::load(&config::state_path(global, cfg))?;

    let planned = build(
        provider,
        &manifest,
        &state,
        &args.targets,
        !args.no_refresh,
        palette,
    )
    .await?;
    show(&planned, global, palette)
}
