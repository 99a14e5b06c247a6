//! State command handlers.

use std::fmt::Write as _;

use tabled::Tabled;

use tikform_core::{StateFile, StoredResource};

use crate::cli::{GlobalOpts, StateArgs, StateCommand};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct StateRow {
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Type")]
    type_name: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Attributes")]
    attributes: usize,
}

impl From<&StoredResource> for StateRow {
    fn from(s: &StoredResource) -> Self {
        Self {
            address: s.address(),
            type_name: s.type_name.clone(),
            id: s.data.id().unwrap_or_default().to_owned(),
            attributes: s.data.attributes.len(),
        }
    }
}

fn detail(s: &StoredResource) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", s.address());
    let _ = writeln!(out, "  id = {}", s.data.id().unwrap_or("(none)"));
    for (name, value) in &s.data.attributes {
        let _ = writeln!(out, "  {name} = {value}");
    }
    for (name, value) in &s.data.effective_defaults {
        let _ = writeln!(out, "  (default) {name} = {value}");
    }
    out
}

fn not_tracked(address: &str) -> CliError {
    CliError::NotFound {
        resource_type: "tracked resource".into(),
        identifier: address.into(),
        list_command: "state list".into(),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: StateArgs, global: &GlobalOpts, cfg: &Config) -> Result<(), CliError> {
    let path = config::state_path(global, cfg);
    let mut state = StateFile::load(&path)?;

    match args.command {
        StateCommand::List => {
            let shown: Vec<StoredResource> = state
                .iter()
                .map(|s| StoredResource {
                    data: util::redact(&s.type_name, &s.data),
                    ..s.clone()
                })
                .collect();
            let out = output::render_list(&global.output, &shown, |s| StateRow::from(s), |s| {
                s.address()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        StateCommand::Show { address } => {
            let (type_name, name) = util::split_address(&address)?;
            let stored = state
                .get(type_name, name)
                .ok_or_else(|| not_tracked(&address))?;
            let shown = StoredResource {
                data: util::redact(type_name, &stored.data),
                ..stored.clone()
            };
            let out = output::render_single(&global.output, &shown, detail, |s| {
                s.data.id().unwrap_or_default().to_owned()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        StateCommand::Rm { address } => {
            let (type_name, name) = util::split_address(&address)?;
            if state.remove(type_name, name).is_none() {
                return Err(not_tracked(&address));
            }
            state.save(&path)?;
            if !global.quiet {
                eprintln!("Removed {address} from state; the router was not changed.");
            }
            Ok(())
        }
    }
}
