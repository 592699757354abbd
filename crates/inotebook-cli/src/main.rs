//! iNoteBook CLI - keep short notes in a remote note store from the terminal

mod auth;
mod cli;
mod commands;
mod config_profiles;
mod error;


use clap::Parser;

use crate::cli::{Cli, Commands};
use crate::commands::add::run_add;
use crate::commands::auth_cmd::run_auth;
use crate::commands::config::run_config;
use crate::commands::delete::run_delete;
use crate::commands::list::run_list;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    let directive = "inotebook=info"
        .parse()
        .map_err(|error| CliError::Config(format!("Invalid log directive: {error}")))?;
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(directive))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let profile = cli.profile.as_deref();

    match cli.command {
        Commands::List { json } => run_list(json, profile).await,
        Commands::Add { title, description } => run_add(&title, &description, profile).await,
        Commands::Delete { id } => run_delete(&id, profile).await,
        Commands::Auth { command } => run_auth(command, profile),
        Commands::Config { command } => run_config(command, profile),
    }
}
