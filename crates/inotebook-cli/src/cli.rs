use clap::{Parser, Subcommand, ValueEnum};
use inotebook_core::IdStrategy;

#[derive(Parser)]
#[command(name = "inotebook")]
#[command(about = "Create, list, and delete notes in your iNoteBook")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// CLI profile name for API and session configuration
    #[arg(long, global = true, value_name = "NAME")]
    pub profile: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List your notes
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a new note
    #[command(alias = "new")]
    Add {
        /// Note title
        #[arg(short, long)]
        title: String,
        /// Note description
        #[arg(short, long)]
        description: String,
    },
    /// Delete a note by ID
    #[command(alias = "rm")]
    Delete {
        /// Note ID
        id: String,
    },
    /// Manage the stored session for a profile
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
    /// Configure CLI profiles
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum IdStrategyArg {
    /// 3-or-4 digit random number
    ShortNumeric,
    /// UUID v7
    TimeOrdered,
}

impl From<IdStrategyArg> for IdStrategy {
    fn from(value: IdStrategyArg) -> Self {
        match value {
            IdStrategyArg::ShortNumeric => Self::ShortNumeric,
            IdStrategyArg::TimeOrdered => Self::TimeOrdered,
        }
    }
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Store an access token for the profile in the OS keychain
    Login {
        /// Optional profile override
        #[arg(long, value_name = "NAME")]
        profile: Option<String>,
        /// Bearer access token issued by your identity provider
        #[arg(long, value_name = "TOKEN")]
        token: String,
        /// Email or username to show in status output
        #[arg(long, value_name = "LABEL")]
        user: Option<String>,
    },
    /// Show session status for profile
    Status {
        /// Optional profile override
        #[arg(long, value_name = "NAME")]
        profile: Option<String>,
    },
    /// Sign out profile and clear stored token
    Logout {
        /// Optional profile override
        #[arg(long, value_name = "NAME")]
        profile: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Initialize or update profile config
    Init {
        /// Profile name to initialize
        #[arg(long, value_name = "NAME")]
        profile: Option<String>,
        /// Notes API base URL (e.g. <https://api.example.com/dev>)
        #[arg(long, value_name = "URL")]
        api_url: Option<String>,
        /// Request timeout in seconds
        #[arg(long, value_name = "SECONDS")]
        timeout_secs: Option<u64>,
        /// Identifier scheme for new notes
        #[arg(long, value_enum)]
        id_strategy: Option<IdStrategyArg>,
        /// Keep current active profile instead of activating this one
        #[arg(long)]
        no_activate: bool,
    },
    /// Show resolved profile config
    Show {
        /// Optional profile override
        #[arg(long, value_name = "NAME")]
        profile: Option<String>,
    },
}
