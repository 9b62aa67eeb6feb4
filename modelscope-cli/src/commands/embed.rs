//! Embed command handler

use anyhow::{Result, bail};
use clap::Args;
use colored::*;
use modelscope_client::InferenceClient;
use modelscope_core::catalog::ModelKind;
use modelscope_core::domain::embedding::{EmbeddingInput, EncodingFormat};
use modelscope_core::dto::embedding::EmbeddingVector;
use modelscope_runner::service::{EmbeddingParams, EmbeddingService};

use crate::config::Config;
use crate::output::{check_model, print_json};

#[derive(Args)]
pub struct EmbedArgs {
    /// Text to embed; repeat together with --batch
    #[arg(long = "input", short = 'i', required = true)]
    inputs: Vec<String>,

    /// Send all inputs in one batch request
    #[arg(long)]
    batch: bool,

    /// float or base64
    #[arg(long, default_value = "float")]
    encoding_format: EncodingFormat,

    #[arg(long, default_value_t = ModelKind::Embedding.default_model().to_string())]
    model: String,
}

/// Handle the embed command
pub async fn handle_embed(args: EmbedArgs, config: &Config) -> Result<()> {
    check_model(ModelKind::Embedding, &args.model);

    let input = if args.batch {
        EmbeddingInput::Batch(args.inputs)
    } else {
        let mut inputs = args.inputs;
        if inputs.len() > 1 {
            bail!("multiple --input values require --batch");
        }
        EmbeddingInput::Single(inputs.pop().unwrap_or_default())
    };

    let runner_config = config.runner_config()?;
    let service = EmbeddingService::new(InferenceClient::new(runner_config.client_config())?);

    let result = service
        .embed(EmbeddingParams {
            model: args.model,
            input,
            encoding_format: args.encoding_format,
        })
        .await
        .map_err(|e| config.user_error(e))?;

    if config.json {
        return print_json(&result);
    }

    println!(
        "{}",
        format!("{} embedding(s) from {}", result.data.len(), result.model).bold()
    );
    for data in &result.data {
        let summary = match &data.embedding {
            EmbeddingVector::Float(values) => format!("{} dimensions", values.len()),
            EmbeddingVector::Base64(encoded) => format!("{} base64 chars", encoded.len()),
        };
        println!("  {} #{} {}", "▸".cyan(), data.index, summary.dimmed());
    }
    if let Some(usage) = result.usage {
        println!("{}", format!("tokens: {}", usage.total_tokens).dimmed());
    }
    Ok(())
}
