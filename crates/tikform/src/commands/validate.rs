//! Validate command handler. Never contacts the router.

use tikform_core::{Diagnostic, Diagnostics, plan, resources};

use crate::cli::GlobalOpts;
use crate::config::{self, Config, Manifest};
use crate::error::CliError;
use crate::output::Palette;

use super::plan as planning;

pub fn handle(global: &GlobalOpts, cfg: &Config) -> Result<(), CliError> {
    let palette = Palette::new(&global.color);
    let manifest = Manifest::load(&config::manifest_path(global, cfg))?;

    let mut errors = 0;
    for resource in &manifest.resources {
        let diags = match resources::lookup(&resource.resource_type) {
            Ok(schema) => match resource.config() {
                Ok(config) => plan::validate(schema, &config),
                Err(e) => Diagnostics::from(Diagnostic::error(e.to_string())),
            },
            Err(e) => Diagnostics::from(Diagnostic::from(e)),
        };
        errors += planning::report(&resource.address(), &diags, palette);
    }

    if errors > 0 {
        return Err(CliError::Diagnostics { count: errors });
    }
    if !global.quiet {
        eprintln!(
            "Success! {} resource(s) in the manifest are valid.",
            manifest.resources.len()
        );
    }
    Ok(())
}
