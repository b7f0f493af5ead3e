//! Clap derive structures for the `emfacts` CLI.
//!
//! Defines the command tree, global flags, and shared argument groups.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// emfacts -- network device inventory facts from an APIC-EM controller
#[derive(Debug, Parser)]
#[command(
    name = "emfacts",
    version,
    about = "Gather network device facts from an APIC-EM controller",
    long_about = "Logs in to an APIC-EM controller, reads the device inventory, keeps\n\
        the reachable devices, and publishes them as automation facts.\n\n\
        `emfacts gather` speaks the Ansible module protocol on stdout.",
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
    /// Controller profile to use
    #[arg(long, short = 'p', env = "EMFACTS_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Controller host or base URL (overrides profile)
    #[arg(long, short = 'H', env = "EMFACTS_HOST", global = true)]
    pub host: Option<String>,

    /// Login username (overrides profile)
    #[arg(long, short = 'u', env = "EMFACTS_USERNAME", global = true)]
    pub username: Option<String>,

    /// Login password
    #[arg(long, env = "EMFACTS_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// Controller generation
    #[arg(long, short = 'r', env = "EMFACTS_REVISION", global = true)]
    pub revision: Option<RevisionArg>,

    /// Skip TLS certificate verification (self-signed controllers)
    #[arg(long, short = 'k', env = "EMFACTS_INSECURE", global = true)]
    pub insecure: bool,

    /// Trust this PEM CA certificate
    #[arg(long, env = "EMFACTS_CA_CERT", global = true)]
    pub ca_cert: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, env = "EMFACTS_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "EMFACTS_OUTPUT",
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
}

// ── Value Enums ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RevisionArg {
    /// Reachability summary, "Discovered" devices, management IPs only
    Legacy,
    /// Full inventory with `scope: ALL`, "Reachable" devices
    Current,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
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
    /// Gather reachable devices as Ansible facts (module mode)
    Gather(GatherArgs),

    /// List inventory devices
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// Authenticated GET of an arbitrary API path
    Get(GetArgs),

    /// Group a class-query `imdata` payload by class
    Group(GroupArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared Shape Arguments ───────────────────────────────────────────

/// Inventory endpoint and filter overrides shared by gather and devices.
#[derive(Debug, Default, Args)]
pub struct ShapeArgs {
    /// Inventory endpoint path
    #[arg(long)]
    pub path: Option<String>,

    /// Value of the `scope` header
    #[arg(long, conflicts_with = "no_scope")]
    pub scope: Option<String>,

    /// Send no `scope` header
    #[arg(long)]
    pub no_scope: bool,

    /// Key the devices are published under
    #[arg(long)]
    pub fact_key: Option<String>,

    /// Status field inspected on every device
    #[arg(long)]
    pub status_field: Option<String>,

    /// Status value a device needs to be kept
    #[arg(long)]
    pub accept: Option<String>,

    /// Publish only this field of each kept device
    #[arg(long, conflicts_with = "whole")]
    pub extract: Option<String>,

    /// Publish whole device records
    #[arg(long)]
    pub whole: bool,
}

// ── Command Arguments ────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GatherArgs {
    /// Module arguments file (JSON or key=value pairs)
    #[arg(long, value_name = "PATH")]
    pub args_file: Option<PathBuf>,

    #[command(flatten)]
    pub shape: ShapeArgs,
}

#[derive(Debug, Args)]
pub struct DevicesArgs {
    /// Include devices that fail the status filter
    #[arg(long, short = 'a')]
    pub all: bool,

    #[command(flatten)]
    pub shape: ShapeArgs,
}

#[derive(Debug, Args)]
pub struct GetArgs {
    /// API path, e.g. /api/v1/network-device/count
    pub path: String,

    /// Value of the `scope` header
    #[arg(long)]
    pub scope: Option<String>,
}

#[derive(Debug, Args)]
pub struct GroupArgs {
    /// JSON file to read (stdin when omitted)
    pub file: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file location
    Path,

    /// Display the current configuration (passwords redacted)
    Show,

    /// Store the active profile's password in the system keyring
    SetPassword,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
