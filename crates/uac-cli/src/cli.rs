//! CLI argument definitions for the User Admin Console.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use uac_users::{UserId, UserStatus};

#[derive(Parser)]
#[command(
    name = "uac",
    version,
    about = "User Admin Console - browse and edit the user directory",
    long_about = "Browse, search and edit the user directory.\n\n\
                  List views take the same query string as the web console \
                  (page, limit, search), and edits go through the same form \
                  validation."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format.
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Settings file (default: settings.toml in the config directory).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// User database file (overrides UAC_DB_PATH and the settings file).
    #[arg(long = "db", value_name = "PATH", global = true)]
    pub db: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List users for a location query.
    List(ListArgs),

    /// Replay keystrokes into the debounced search box.
    Search(SearchArgs),

    /// Show one user.
    Show {
        /// User id.
        id: UserId,
    },

    /// Create a user.
    Create(CreateArgs),

    /// Edit a user; omitted fields keep their value.
    Update(UpdateArgs),
}

#[derive(Args)]
pub struct ListArgs {
    /// Location query, e.g. "page=2&search=ann".
    #[arg(long = "query", value_name = "QUERY")]
    pub query: Option<String>,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Successive contents of the search box, e.g. a an ann.
    #[arg(value_name = "KEYSTROKE", required = true)]
    pub keystrokes: Vec<String>,

    /// Time between keystrokes in milliseconds.
    #[arg(long = "gap-ms", value_name = "MS", default_value_t = 100)]
    pub gap_ms: u64,

    /// Location query to start from.
    #[arg(long = "query", value_name = "QUERY")]
    pub query: Option<String>,
}

#[derive(Args)]
pub struct CreateArgs {
    #[arg(long = "full-name", value_name = "NAME")]
    pub full_name: String,

    #[arg(long = "email", value_name = "EMAIL")]
    pub email: String,

    #[arg(long = "status", value_enum, default_value = "active")]
    pub status: StatusArg,
}

#[derive(Args)]
pub struct UpdateArgs {
    /// User id.
    pub id: UserId,

    #[arg(long = "full-name", value_name = "NAME")]
    pub full_name: Option<String>,

    #[arg(long = "email", value_name = "EMAIL")]
    pub email: Option<String>,

    #[arg(long = "status", value_enum)]
    pub status: Option<StatusArg>,
}

/// CLI account status choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum StatusArg {
    Active,
    Blocked,
}

impl From<StatusArg> for UserStatus {
    fn from(status: StatusArg) -> Self {
        match status {
            StatusArg::Active => UserStatus::Active,
            StatusArg::Blocked => UserStatus::Blocked,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
