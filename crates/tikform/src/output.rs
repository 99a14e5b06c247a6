//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use tikform_core::{Diagnostic, Diagnostics, Plan, PlanAction, Severity};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ───────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// Applies plan colors only when enabled.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(mode: &ColorMode) -> Self {
        Self {
            enabled: should_color(mode),
        }
    }

    /// Color `text` by the action it describes.
    pub fn action(self, action: PlanAction, text: &str) -> String {
        if !self.enabled {
            return text.to_owned();
        }
        match action {
            PlanAction::Create => text.green().to_string(),
            PlanAction::Update => text.yellow().to_string(),
            PlanAction::Delete => text.red().to_string(),
            PlanAction::NoOp => text.dimmed().to_string(),
        }
    }

    pub fn bold(self, text: &str) -> String {
        if self.enabled {
            text.bold().to_string()
        } else {
            text.to_owned()
        }
    }

    fn severity(self, severity: Severity, text: &str) -> String {
        if !self.enabled {
            return text.to_owned();
        }
        match severity {
            Severity::Error => text.red().bold().to_string(),
            Severity::Warning => text.yellow().bold().to_string(),
        }
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
///
/// - `table`: uses the `Tabled` derive to build a pretty table
/// - `json` / `json-compact`: serializes the original data via serde
/// - `yaml`: serializes via serde_yaml
/// - `plain`: calls `id_fn` on each item to emit one identifier per line
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Ok(render_table(&rows))
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(data.iter().map(&id_fn).collect::<Vec<_>>().join("\n")),
    }
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses a custom `detail_fn` that returns a pre-formatted
/// string, since single-item detail views don't use `Tabled` derive.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize + ?Sized,
{
    match format {
        OutputFormat::Table => Ok(detail_fn(data)),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(id_fn(data)),
    }
}

/// Render plans: colored text for `table`, serde for structured formats,
/// `action address` lines for `plain`.
pub fn render_plans(
    format: &OutputFormat,
    plans: &[Plan],
    palette: Palette,
) -> Result<String, CliError> {
    render_single(
        format,
        plans,
        |plans| {
            let mut out = String::new();
            for plan in plans.iter().filter(|p| !p.is_noop()) {
                if !out.is_empty() {
                    out.push('\n');
                }
                out.push_str(&plan_text(plan, palette));
            }
            out
        },
        |plans| {
            plans
                .iter()
                .map(|p| format!("{} {}", p.action, p.address))
                .collect::<Vec<_>>()
                .join("\n")
        },
    )
}

fn plan_text(plan: &Plan, palette: Palette) -> String {
    let text = plan.to_string();
    let mut lines = text.lines();
    let mut out = String::new();
    if let Some(header) = lines.next() {
        out.push_str(&palette.action(plan.action, header));
        out.push('\n');
    }
    for line in lines {
        let action = match line.trim_start().chars().next() {
            Some('+') => PlanAction::Create,
            Some('~') => PlanAction::Update,
            Some('-') => PlanAction::Delete,
            _ => PlanAction::NoOp,
        };
        out.push_str(&palette.action(action, line));
        out.push('\n');
    }
    out
}

/// `Plan: 1 to add, 0 to change, 0 to destroy.`
pub fn plan_summary(plans: &[Plan]) -> String {
    let count = |action| plans.iter().filter(|p| p.action == action).count();
    format!(
        "Plan: {} to add, {} to change, {} to destroy.",
        count(PlanAction::Create),
        count(PlanAction::Update),
        count(PlanAction::Delete)
    )
}

/// Print diagnostics to stderr, one per line, prefixed with the address.
pub fn print_diagnostics(address: &str, diags: &Diagnostics, palette: Palette) {
    let mut stderr = io::stderr().lock();
    for diag in diags {
        let _ = writeln!(stderr, "{}", diagnostic_line(address, diag, palette));
    }
}

fn diagnostic_line(address: &str, diag: &Diagnostic, palette: Palette) -> String {
    use std::fmt::Write as _;

    let mut line = format!(
        "{} {address}: {}",
        palette.severity(diag.severity, &format!("{}:", diag.severity)),
        diag.summary
    );
    if let Some(attr) = &diag.attribute {
        let _ = write!(line, " (attribute \"{attr}\")");
    }
    if let Some(detail) = &diag.detail {
        let _ = write!(line, "\n    {detail}");
    }
    line
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> Result<String, CliError> {
    let text = if compact {
        serde_json::to_string(data)?
    } else {
        serde_json::to_string_pretty(data)?
    };
    Ok(text)
}

/// YAML output.
pub(crate) fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    Ok(serde_yaml::to_string(data)?)
}
