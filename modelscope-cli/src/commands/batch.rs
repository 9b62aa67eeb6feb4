//! Batch command handler
//!
//! Reads a JSON array of work items and runs them in order, e.g.
//!
//! ```json
//! [
//!   { "operation": "text_to_image", "prompt": "a red fox", "timeout_minutes": 3 },
//!   { "operation": "chat_completion", "messages": [{ "role": "user", "content": "Hi" }] }
//! ]
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::*;
use modelscope_runner::OperationRunner;
use modelscope_runner::service::{ItemOutput, Operation};
use tracing::info;

use crate::config::Config;
use crate::output::print_json;

#[derive(Args)]
pub struct BatchArgs {
    /// Path to the JSON file of work items
    #[arg(long, short = 'f')]
    file: PathBuf,

    /// Record failed items as {"error": ...} and keep going
    #[arg(long)]
    continue_on_fail: bool,
}

/// Handle the batch command
pub async fn handle_batch(args: BatchArgs, config: &Config) -> Result<()> {
    let content = tokio::fs::read_to_string(&args.file)
        .await
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let items: Vec<Operation> = serde_json::from_str(&content)
        .with_context(|| format!("Invalid work items in {}", args.file.display()))?;

    info!("Loaded {} work item(s) from {}", items.len(), args.file.display());

    let runner_config = config.runner_config()?;
    let continue_on_fail = args.continue_on_fail || runner_config.continue_on_fail;
    let runner = OperationRunner::from_config(&runner_config)?;

    if !config.json {
        eprintln!("{}", format!("Running {} item(s)...", items.len()).bold());
    }

    let outputs = runner
        .execute_items(items, continue_on_fail, runner_config.locale)
        .await?;

    if config.json {
        print_json(&outputs)
    } else {
        print_outputs(&outputs);
        Ok(())
    }
}

fn print_outputs(outputs: &[ItemOutput]) {
    for output in outputs {
        match output.json.get("error").and_then(|e| e.as_str()) {
            Some(message) => println!("  {} item {}: {}", "✗".red(), output.item, message.red()),
            None => {
                let status = output
                    .json
                    .get("status")
                    .and_then(|s| s.as_str())
                    .unwrap_or("completed");
                println!("  {} item {}: {}", "✓".green(), output.item, status.green());
            }
        }
    }
}
