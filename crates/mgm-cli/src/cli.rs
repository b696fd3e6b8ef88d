//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use mgm_cli::config::SettingsOverrides;

#[derive(Parser)]
#[command(
    name = "mgm",
    version,
    about = "Sample metadata intake - validate, normalize and export sample sheets",
    long_about = "Validate and normalize sample metadata against a field schema.\n\n\
                  Imports CSV or XLSX sample sheets and grid form submissions,\n\
                  reports cell problems, and exports clean CSV for archiving."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub settings: SettingsArgs,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
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

    /// Allow cell values and user names in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Args)]
pub struct SettingsArgs {
    /// Field schema CSV [env: META_SCHEMA_PATH].
    #[arg(long = "schema", value_name = "PATH", global = true)]
    pub schema: Option<PathBuf>,

    /// User allow-list of salted digests [env: META_ALLOWLIST_PATH].
    #[arg(long = "allowlist", value_name = "PATH", global = true)]
    pub allowlist: Option<PathBuf>,

    /// Staging directory for archive transfers [env: META_UPLOAD_DIR].
    #[arg(long = "upload-dir", value_name = "DIR", global = true)]
    pub upload_dir: Option<PathBuf>,

    /// scp destination for saved exports [env: META_REMOTE_PATH].
    #[arg(long = "remote-path", value_name = "DEST", global = true)]
    pub remote_path: Option<String>,

    /// Identity file for scp [env: META_KEY_PATH].
    #[arg(long = "key-path", value_name = "PATH", global = true)]
    pub key_path: Option<PathBuf>,
}

impl SettingsArgs {
    pub fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            schema_path: self.schema.clone(),
            allowlist_path: self.allowlist.clone(),
            upload_dir: self.upload_dir.clone(),
            remote_path: self.remote_path.clone(),
            key_path: self.key_path.clone(),
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// List the schema fields with their types and allowed values.
    Fields,

    /// Import a CSV or XLSX sample sheet and report problems.
    Import(ImportArgs),

    /// Import a sample sheet and export it when nothing is fatal.
    Save(SaveArgs),

    /// Process a grid form submission stored as JSON.
    Submit(SubmitArgs),

    /// Print the allow-list digest for a user name.
    Digest(DigestArgs),
}

#[derive(Parser)]
pub struct ImportArgs {
    /// Sample sheet (.csv or .xlsx).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Name of the submitting user.
    #[arg(long = "user")]
    pub user: String,
}

#[derive(Parser)]
pub struct SaveArgs {
    /// Sample sheet (.csv or .xlsx).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Name of the submitting user.
    #[arg(long = "user")]
    pub user: String,

    /// Directory for the exported CSV.
    #[arg(long = "output-dir", value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,
}

#[derive(Parser)]
pub struct SubmitArgs {
    /// JSON document with `user_name`, `action` and `pairs`.
    #[arg(value_name = "FORM_JSON")]
    pub form: PathBuf,

    /// Directory for the exported CSV when the action is `save`.
    #[arg(long = "output-dir", value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,
}

#[derive(Parser)]
pub struct DigestArgs {
    /// User name to hash with META_USER_SALT.
    #[arg(value_name = "NAME")]
    pub name: String,
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
