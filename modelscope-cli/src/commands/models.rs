//! Model command handlers
//!
//! Searches the built-in model catalog and checks credentials against the
//! models endpoint.

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::*;
use modelscope_client::InferenceClient;
use modelscope_core::catalog::{ModelKind, search_models};
use modelscope_runner::OperationError;

use crate::config::Config;
use crate::output::print_json;

#[derive(Args)]
pub struct ModelsArgs {
    /// Case-insensitive filter on model name or id
    #[arg(long)]
    filter: Option<String>,

    /// List every catalog entry of one kind (llm, vision, image, embedding)
    #[arg(long, value_parser = parse_kind)]
    kind: Option<ModelKind>,

    #[command(subcommand)]
    command: Option<ModelsCommands>,
}

/// Model subcommands
#[derive(Subcommand)]
pub enum ModelsCommands {
    /// Check that the access token is accepted
    Verify,
}

fn parse_kind(s: &str) -> Result<ModelKind, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "llm" => Ok(ModelKind::Llm),
        "vision" => Ok(ModelKind::Vision),
        "image" => Ok(ModelKind::Image),
        "embedding" => Ok(ModelKind::Embedding),
        other => Err(format!("unknown model kind: {other}")),
    }
}

/// Handle model commands
pub async fn handle_models(args: ModelsArgs, config: &Config) -> Result<()> {
    match args.command {
        Some(ModelsCommands::Verify) => verify(config).await,
        None => match args.kind {
            Some(kind) => list_kind(kind, config),
            None => search(args.filter.as_deref(), config),
        },
    }
}

fn search(filter: Option<&str>, config: &Config) -> Result<()> {
    let models = search_models(filter);

    if config.json {
        return print_json(&models);
    }

    if models.is_empty() {
        println!("{}", "No models match the filter.".yellow());
        return Ok(());
    }

    println!("{}", format!("Found {} model(s):", models.len()).bold());
    println!();
    for model in models {
        println!("  {} {:<32} {}", "▸".cyan(), model.name.bold(), model.id.dimmed());
    }
    Ok(())
}

fn list_kind(kind: ModelKind, config: &Config) -> Result<()> {
    let models = kind.models();

    if config.json {
        return print_json(&models);
    }

    println!("{}", format!("{} models:", kind).bold());
    for (index, model) in models.iter().enumerate() {
        let marker = if index == 0 { " (default)" } else { "" };
        println!("  {} {}{}", "▸".cyan(), model, marker.dimmed());
    }
    Ok(())
}

async fn verify(config: &Config) -> Result<()> {
    let runner_config = config.runner_config()?;
    let client = InferenceClient::new(runner_config.client_config())?;

    let count = client
        .verify_credentials()
        .await
        .map_err(|e| config.user_error(OperationError::from(e)))?;

    if config.json {
        return print_json(&serde_json::json!({ "valid": true, "models": count }));
    }

    println!(
        "{} Credentials accepted ({} models available)",
        "✓".green(),
        count
    );
    Ok(())
}
