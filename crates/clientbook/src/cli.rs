//! Clap derive structures for the `clientbook` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! Only depends on clap so `build.rs` can include it for man pages.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// clientbook -- manage client records from the command line
#[derive(Debug, Parser)]
#[command(
    name = "clientbook",
    version,
    about = "Manage client records from the command line",
    long_about = "Create, list, edit and delete client records held by a clientbook API.\n\n\
        Log in once with `clientbook login`; the session is kept per profile\n\
        until `clientbook logout`.",
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
    /// Configuration profile to use
    #[arg(long, short = 'p', env = "CLIENTBOOK_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API root URL (overrides profile)
    #[arg(long, env = "CLIENTBOOK_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "CLIENTBOOK_OUTPUT",
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

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "CLIENTBOOK_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "CLIENTBOOK_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

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
    /// Log in and keep the session for this profile
    Login(LoginArgs),

    /// Create a new account
    Register(RegisterArgs),

    /// End the session for this profile
    Logout,

    /// Show who the current session belongs to
    Whoami,

    /// Manage client records
    #[command(alias = "cl")]
    Clients(ClientsArgs),

    /// Interest reference data
    Interests(InterestsArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Auth ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account name (prompted when omitted)
    #[arg(long, short = 'u', env = "CLIENTBOOK_USERNAME")]
    pub username: Option<String>,

    /// Read the password from this variable instead of prompting
    #[arg(long, value_name = "VAR")]
    pub password_env: Option<String>,
}

#[derive(Debug, Args)]
pub struct RegisterArgs {
    /// Account name (prompted when omitted)
    #[arg(long, short = 'u')]
    pub username: Option<String>,

    /// Contact email (prompted when omitted)
    #[arg(long, short = 'e')]
    pub email: Option<String>,
}

// ── Clients ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ClientsArgs {
    #[command(subcommand)]
    pub command: ClientsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ClientsCommand {
    /// List clients
    #[command(alias = "ls")]
    List(ClientListArgs),

    /// Show one client
    Get {
        /// Client ID
        id: String,
    },

    /// Create a client
    Create {
        #[command(flatten)]
        fields: ClientFieldArgs,

        /// Read the client from a JSON file instead of flags
        #[arg(long, short = 'F', conflicts_with_all = ClientFieldArgs::FIELD_IDS)]
        from_file: Option<PathBuf>,
    },

    /// Edit a client; flags patch the current record
    Update {
        /// Client ID
        id: String,

        #[command(flatten)]
        fields: ClientFieldArgs,

        /// Replace the client with the contents of a JSON file
        #[arg(long, short = 'F', conflicts_with_all = ClientFieldArgs::FIELD_IDS)]
        from_file: Option<PathBuf>,
    },

    /// Delete a client
    #[command(alias = "rm")]
    Delete {
        /// Client ID
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct ClientListArgs {
    /// Name fragment
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Identification fragment
    #[arg(long, short = 'i')]
    pub identification: Option<String>,

    /// Owning account (defaults to the logged-in user)
    #[arg(long)]
    pub owner: Option<String>,
}

/// Client fields settable from flags.
#[derive(Debug, Args, Default)]
pub struct ClientFieldArgs {
    /// Given name
    #[arg(long)]
    pub given_name: Option<String>,

    /// Family name
    #[arg(long)]
    pub family_name: Option<String>,

    /// Identification code (unique per account)
    #[arg(long)]
    pub identification: Option<String>,

    /// Mobile phone
    #[arg(long)]
    pub mobile_phone: Option<String>,

    /// Secondary phone (empty string clears it)
    #[arg(long)]
    pub other_phone: Option<String>,

    /// Postal address
    #[arg(long)]
    pub address: Option<String>,

    /// Birth date, YYYY-MM-DD
    #[arg(long, value_name = "DATE")]
    pub birth_date: Option<String>,

    /// Affiliation date, YYYY-MM-DD
    #[arg(long, value_name = "DATE")]
    pub affiliation_date: Option<String>,

    /// Gender
    #[arg(long, ignore_case = true)]
    pub gender: Option<GenderArg>,

    /// Free-text personal note
    #[arg(long)]
    pub note: Option<String>,

    /// Encoded image data (base64)
    #[arg(long, value_name = "BASE64")]
    pub image: Option<String>,

    /// Interest ID (empty string clears it)
    #[arg(long)]
    pub interest: Option<String>,
}

impl ClientFieldArgs {
    pub const FIELD_IDS: [&'static str; 12] = [
        "given_name",
        "family_name",
        "identification",
        "mobile_phone",
        "other_phone",
        "address",
        "birth_date",
        "affiliation_date",
        "gender",
        "note",
        "image",
        "interest",
    ];
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum GenderArg {
    #[value(alias = "male")]
    M,
    #[value(alias = "female")]
    F,
}

// ── Interests ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct InterestsArgs {
    #[command(subcommand)]
    pub command: InterestsCommand,
}

#[derive(Debug, Subcommand)]
pub enum InterestsCommand {
    /// List every interest
    #[command(alias = "ls")]
    List,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Print the config file path
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
