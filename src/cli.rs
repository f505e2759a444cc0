use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "tournament registry upload tool")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Reconcile a decoded tournament against the registry and publish it
    Upload(UploadArgs),
    /// Print a summary of a decoded tournament file without uploading it
    Inspect {
        /// Path to the decoded tournament JSON file
        tournament: PathBuf,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct UploadArgs {
    /// Path to the decoded tournament JSON file
    pub tournament: PathBuf,
    /// Path to the vendor source file attached to the publish step
    pub source_file: PathBuf,
    /// Registry base URL (overrides REGISTRY_URL)
    #[arg(long)]
    pub server: Option<String>,
    /// Login email (falls back to REGISTRY_EMAIL)
    #[arg(long)]
    pub email: Option<String>,
    /// Login password (falls back to REGISTRY_PASSWORD)
    #[arg(long)]
    pub password: Option<String>,
    /// Publish on behalf of this user id instead of the login account
    #[arg(long)]
    pub login_as: Option<String>,
    /// Extension tag sent along with the source file
    #[arg(long, default_value = "fast")]
    pub extension: String,
    /// Abort publishing if the registry takes longer than this many seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}
