//! Vision command handler

use anyhow::Result;
use clap::Args;
use colored::*;
use modelscope_client::InferenceClient;
use modelscope_core::catalog::ModelKind;
use modelscope_runner::service::{
    ChatService, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, DEFAULT_VISION_PROMPT, VisionParams,
};

use crate::config::Config;
use crate::output::{check_model, print_json};

#[derive(Args)]
pub struct VisionArgs {
    /// Publicly reachable image URL
    #[arg(long)]
    image_url: String,

    #[arg(long, default_value = DEFAULT_VISION_PROMPT)]
    prompt: String,

    #[arg(long, default_value_t = ModelKind::Vision.default_model().to_string())]
    model: String,

    #[arg(long, default_value_t = DEFAULT_TEMPERATURE)]
    temperature: f32,

    #[arg(long, default_value_t = DEFAULT_MAX_TOKENS)]
    max_tokens: u32,
}

/// Handle the vision command
pub async fn handle_vision(args: VisionArgs, config: &Config) -> Result<()> {
    check_model(ModelKind::Vision, &args.model);

    let runner_config = config.runner_config()?;
    let service = ChatService::new(InferenceClient::new(runner_config.client_config())?);

    let completion = service
        .vision(VisionParams {
            model: args.model,
            image_url: args.image_url,
            prompt: args.prompt,
            temperature: args.temperature,
            max_tokens: args.max_tokens,
        })
        .await
        .map_err(|e| config.user_error(e))?;

    if config.json {
        return print_json(&completion);
    }

    match completion.first_content() {
        Some(content) => println!("{}", content),
        None => println!("{}", "No answer returned.".yellow()),
    }
    Ok(())
}
