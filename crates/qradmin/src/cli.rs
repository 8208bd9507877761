//! Clap derive structures for the `qradmin` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! Depends only on clap and clap_complete so `build.rs` can include it.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// qradmin -- admin console for a QR-code generation service
#[derive(Debug, Parser)]
#[command(
    name = "qradmin",
    version,
    about = "Administer a QR-code service from the command line",
    long_about = "Browse registered users and the QR codes they generated, export \
        listings as CSV, and download the files behind them.\n\n\
        Sign in once with `qradmin login`; the session is kept for seven days.",
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
    /// Service profile to use
    #[arg(long, short = 'p', env = "QRADMIN_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Admin service base URL (overrides profile)
    #[arg(long, env = "QRADMIN_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Admin token to use instead of the stored session
    #[arg(long, env = "QRADMIN_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Output format [default: table, or `defaults.output` from config]
    #[arg(
        id = "output",
        long = "output",
        short = 'o',
        value_name = "OUTPUT",
        env = "QRADMIN_OUTPUT",
        global = true
    )]
    pub output_flag: Option<OutputFormat>,

    /// When to use color output [default: auto, or `defaults.color` from config]
    #[arg(id = "color", long = "color", value_name = "COLOR", global = true)]
    pub color_flag: Option<ColorMode>,

    /// Effective output format, filled from the flag or the config defaults.
    #[arg(skip)]
    pub output: OutputFormat,

    /// Effective color mode, filled from the flag or the config defaults.
    #[arg(skip)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "QRADMIN_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "QRADMIN_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Directory for downloads and CSV exports (overrides profile)
    #[arg(long, env = "QRADMIN_DOWNLOAD_DIR", global = true)]
    pub download_dir: Option<PathBuf>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Default, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one identifier per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Default, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    #[default]
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and store a seven-day session
    Login(CredentialsArgs),

    /// Create a new admin account
    Register(CredentialsArgs),

    /// Forget the stored session
    Logout,

    /// Show the signed-in admin account
    Whoami,

    /// Browse and export registered users
    #[command(alias = "u")]
    Users(UsersArgs),

    /// Browse and export a user's QR codes
    #[command(alias = "qr")]
    Codes(CodesArgs),

    /// Download a file by URL into the download directory
    Download {
        /// Asset URL
        url: String,
    },

    /// Act on a row value: download documents, open links
    Open(OpenArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared Arguments ─────────────────────────────────────────────────

/// Email/password input for sign-in and registration.
#[derive(Debug, Args)]
pub struct CredentialsArgs {
    /// Account email (prompted when omitted)
    #[arg(long, short = 'e')]
    pub email: Option<String>,

    /// Account password (prompted when omitted)
    #[arg(long, env = "QRADMIN_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

/// Fetch behaviour shared by list and export commands.
#[derive(Debug, Args)]
pub struct FetchArgs {
    /// Retry a fetch that hit an outage or server error up to N times
    #[arg(long, default_value = "0", value_name = "N")]
    pub retry: u32,
}

/// Paging and quick-filter arguments for list commands.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Page number (1-based)
    #[arg(long, default_value = "1")]
    pub page: usize,

    /// Rows per page
    #[arg(long, default_value = "10", value_parser = ["10", "25", "50"])]
    pub page_size: String,

    /// Show every row on one page
    #[arg(long, short = 'a', conflicts_with = "page")]
    pub all: bool,

    /// Case-insensitive quick filter over the visible columns
    #[arg(long, short = 's')]
    pub search: Option<String>,

    #[command(flatten)]
    pub fetch: FetchArgs,
}

/// CSV export arguments.
#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Write the CSV to stdout instead of the download directory
    #[arg(long)]
    pub stdout: bool,

    #[command(flatten)]
    pub fetch: FetchArgs,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  USERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommand,
}

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// List registered users
    #[command(alias = "ls")]
    List(ListArgs),

    /// Export all users to users.csv
    Export(ExportArgs),

    /// Show every QR code a user generated
    Show {
        /// User ID
        id: String,

        #[command(flatten)]
        fetch: FetchArgs,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CODES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CodesArgs {
    #[command(subcommand)]
    pub command: CodesCommand,
}

#[derive(Debug, Subcommand)]
pub enum CodesCommand {
    /// Text and link codes
    Text(TextCodesArgs),

    /// File-backed codes (PDF, image)
    Files(FileCodesArgs),
}

#[derive(Debug, Args)]
pub struct TextCodesArgs {
    #[command(subcommand)]
    pub command: TextCodesCommand,
}

#[derive(Debug, Subcommand)]
pub enum TextCodesCommand {
    /// List a user's text and link codes
    #[command(alias = "ls")]
    List {
        /// Owner user ID
        owner: String,

        /// Content type filter
        #[arg(long, short = 'f', default_value = "all", value_parser = ["all", "text", "link"])]
        filter: String,

        #[command(flatten)]
        list: ListArgs,
    },

    /// Export a user's text and link codes to qr_data.csv
    Export {
        /// Owner user ID
        owner: String,

        /// Content type filter
        #[arg(long, short = 'f', default_value = "all", value_parser = ["all", "text", "link"])]
        filter: String,

        #[command(flatten)]
        export: ExportArgs,
    },
}

#[derive(Debug, Args)]
pub struct FileCodesArgs {
    #[command(subcommand)]
    pub command: FileCodesCommand,
}

#[derive(Debug, Subcommand)]
pub enum FileCodesCommand {
    /// List a user's file codes
    #[command(alias = "ls")]
    List {
        /// Owner user ID
        owner: String,

        /// Content type filter
        #[arg(long, short = 'f', default_value = "all", value_parser = ["all", "pdf", "image"])]
        filter: String,

        #[command(flatten)]
        list: ListArgs,
    },

    /// Export a user's file codes to file_qr_data.csv
    Export {
        /// Owner user ID
        owner: String,

        /// Content type filter
        #[arg(long, short = 'f', default_value = "all", value_parser = ["all", "pdf", "image"])]
        filter: String,

        #[command(flatten)]
        export: ExportArgs,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ROW ACTIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct OpenArgs {
    /// The row value (document URL, link, or text)
    pub value: String,

    /// Declared content type of the row
    #[arg(long, short = 't', default_value = "text")]
    pub content_type: String,

    /// Program used to open links (default: platform opener)
    #[arg(long, env = "QRADMIN_OPENER")]
    pub opener: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

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

    /// Set a value on the active profile
    Set {
        /// Profile key (api_url, credential_store, ca_cert, insecure, timeout,
        /// download_dir, consistency)
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    #[command(alias = "use")]
    SetDefault {
        /// Profile name to set as default
        name: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
