pub mod cache;
pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod http;
pub mod reconcile;
pub mod reference;
pub mod registry;
pub mod services;

use std::env;
use std::path::Path;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use log::info;

use crate::cli::{Cli, Command, UploadArgs};
use crate::config::settings::AppConfig;
use crate::domain::{SourceFile, TournamentDocument};
use crate::reference::HttpReferenceDatabase;
use crate::registry::RegistryClient;
use crate::services::UploadService;

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_upload(args: &UploadArgs) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run_upload(args))
}

pub fn handle_inspect(tournament: &Path) -> Result<()> {
    let document = load_document(tournament)?;
    print_summary(&document);
    Ok(())
}

pub fn handle_completions(shell: clap_complete::Shell) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
    Ok(())
}

async fn run_upload(args: &UploadArgs) -> Result<()> {
    let config = build_config(args);
    let document = load_document(&args.tournament)?;
    let source = load_source_file(&args.source_file, &args.extension).await?;

    let registry = RegistryClient::new(&config.registry, None)?;
    let (email, password) = resolve_credentials(args)?;
    info!("Logging in to the registry...");
    let user_id = registry.login(&email, &password).await?;
    if let Some(login_as) = &args.login_as {
        if *login_as != user_id {
            registry.login_as(login_as).await?;
        }
    }

    let reference = HttpReferenceDatabase::new(&config.reference)?;
    let service = UploadService::new(&registry, &reference, &config.polling);
    service.run(document, source).await?;
    Ok(())
}

fn build_config(args: &UploadArgs) -> AppConfig {
    let mut config = AppConfig::new();
    if let Some(server) = &args.server {
        config.registry.base_url = server.clone();
    }
    if let Some(secs) = args.timeout_secs {
        config.polling.timeout_secs = Some(secs);
    }
    config
}

fn load_document(path: &Path) -> Result<TournamentDocument> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read tournament file {}", path.display()))?;
    let mut document: TournamentDocument = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to decode tournament file {}", path.display()))?;
    document.normalize_birthdays();
    Ok(document)
}

async fn load_source_file(path: &Path, extension: &str) -> Result<SourceFile> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read source file {}", path.display()))?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "tournament".to_string());
    Ok(SourceFile {
        name,
        bytes,
        extension: extension.to_string(),
    })
}

fn resolve_credentials(args: &UploadArgs) -> Result<(String, String)> {
    let email = args
        .email
        .clone()
        .or_else(|| env::var("REGISTRY_EMAIL").ok())
        .context("No login email given (use --email or REGISTRY_EMAIL)")?;
    let password = args
        .password
        .clone()
        .or_else(|| env::var("REGISTRY_PASSWORD").ok())
        .context("No login password given (use --password or REGISTRY_PASSWORD)")?;
    Ok((email, password))
}

fn print_summary(document: &TournamentDocument) {
    let tournament = &document.tournament;
    info!("Tournament: {}", tournament.name);
    info!("User identifier: {}", tournament.user_identifier);
    info!(
        "Competitions: {} with {} teams, {} matches ({} games)",
        tournament.competitions.len(),
        tournament.team_count(),
        tournament.match_count(),
        tournament.game_count()
    );
    let players = document.sorted_player_infos();
    info!("Players: {}", players.len());
    for player in players {
        info!("  {} → {}", player.tmp_id, player.display());
    }
}
