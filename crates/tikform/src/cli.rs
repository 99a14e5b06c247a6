//! Clap derive structures for the `tikform` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// tikform -- declarative RADIUS configuration for RouterOS
#[derive(Debug, Parser)]
#[command(
    name = "tikform",
    version,
    about = "Declarative RouterOS RADIUS configuration",
    long_about = "Plan and apply RADIUS client and incoming-connection settings on\n\
        RouterOS routers through the REST API.\n\n\
        Desired resources live in a TOML manifest; what has been applied is\n\
        tracked in a local JSON state file.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Router profile to use
    #[arg(long, short = 'p', env = "TIKFORM_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Router URL (overrides profile)
    #[arg(long, short = 'r', env = "TIKFORM_ROUTER", global = true)]
    pub router: Option<String>,

    /// RouterOS user (overrides profile)
    #[arg(long, short = 'u', env = "TIKFORM_USERNAME", global = true)]
    pub username: Option<String>,

    /// RouterOS password
    #[arg(
        long,
        env = "TIKFORM_PASSWORD",
        global = true,
        hide = true,
        hide_env_values = true
    )]
    pub password: Option<String>,

    /// Resource manifest (default: tikform.toml)
    #[arg(long, short = 'm', env = "TIKFORM_MANIFEST", global = true)]
    pub manifest: Option<PathBuf>,

    /// State file (default: tikform.state.json)
    #[arg(long = "state", env = "TIKFORM_STATE", global = true)]
    pub state_file: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "TIKFORM_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept the router's self-signed TLS certificate
    #[arg(long, short = 'k', env = "TIKFORM_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "TIKFORM_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tables and plans (default)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check the manifest without contacting the router
    Validate,

    /// Show what apply would change
    Plan(PlanArgs),

    /// Bring the router in line with the manifest
    Apply(PlanArgs),

    /// Adopt an existing router object into state
    Import(ImportArgs),

    /// Remove tracked resources from the router
    Destroy(TargetArgs),

    /// Inspect and edit the local state file
    State(StateArgs),

    /// Describe the supported resource types
    Schema(SchemaArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Plan / Apply / Destroy ──────────────────────────────────────────

#[derive(Debug, Args)]
pub struct TargetArgs {
    /// Limit to these `type.name` addresses (repeatable)
    #[arg(long, short = 't')]
    pub target: Vec<String>,
}

impl TargetArgs {
    /// Whether `address` is selected.
    pub fn selects(&self, address: &str) -> bool {
        self.target.is_empty() || self.target.iter().any(|t| t == address)
    }
}

#[derive(Debug, Args)]
pub struct PlanArgs {
    #[command(flatten)]
    pub targets: TargetArgs,

    /// Use the state file as-is instead of re-reading the router first
    #[arg(long)]
    pub no_refresh: bool,
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Resource type (e.g. routeros_radius)
    pub resource_type: String,

    /// Name to track the object under
    pub name: String,

    /// Router id (`.id` such as `*1`, or any label for settings menus)
    pub id: String,
}

// ── State ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct StateArgs {
    #[command(subcommand)]
    pub command: StateCommand,
}

#[derive(Debug, Subcommand)]
pub enum StateCommand {
    /// List tracked resources
    #[command(alias = "ls")]
    List,

    /// Show one tracked resource
    Show {
        /// `type.name` address
        address: String,
    },

    /// Stop tracking a resource without touching the router
    #[command(alias = "remove")]
    Rm {
        /// `type.name` address
        address: String,
    },
}

// ── Schema ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SchemaArgs {
    /// Resource type to describe; lists all types when omitted
    pub resource_type: Option<String>,
}

// ── Config ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive setup wizard
    Init,

    /// Display current resolved configuration
    Show,

    /// Set a configuration value on the active profile
    Set {
        /// Config key (router, username, password_env, insecure, timeout, ca_cert)
        key: String,
        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name
        name: String,
    },

    /// Store the active profile's password in the system keyring
    SetPassword,
}

// ── Completions ─────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
