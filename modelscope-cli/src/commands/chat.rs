//! Chat command handler

use anyhow::Result;
use clap::Args;
use colored::*;
use modelscope_client::InferenceClient;
use modelscope_core::catalog::{MessageTemplate, ModelKind};
use modelscope_core::domain::chat::ChatMessage;
use modelscope_runner::service::{
    ChatParams, ChatResult, ChatService, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE,
};

use crate::config::Config;
use crate::output::{check_model, print_json};

#[derive(Args)]
pub struct ChatArgs {
    /// Message as `role:content` (system, user, assistant); repeatable
    #[arg(long = "message", short = 'm', required = true)]
    messages: Vec<String>,

    /// Prefix for the first user message (custom, code, analysis, translation)
    #[arg(long, default_value = "custom")]
    template: MessageTemplate,

    #[arg(long, default_value_t = ModelKind::Llm.default_model().to_string())]
    model: String,

    #[arg(long, default_value_t = DEFAULT_TEMPERATURE)]
    temperature: f32,

    #[arg(long, default_value_t = DEFAULT_MAX_TOKENS)]
    max_tokens: u32,
}

/// Handle the chat command
pub async fn handle_chat(args: ChatArgs, config: &Config) -> Result<()> {
    check_model(ModelKind::Llm, &args.model);

    let messages = args
        .messages
        .iter()
        .map(|raw| ChatMessage::parse_shorthand(raw))
        .collect::<Result<Vec<_>, _>>()?;

    let runner_config = config.runner_config()?;
    let service = ChatService::new(InferenceClient::new(runner_config.client_config())?);

    let params = ChatParams {
        model: args.model,
        messages,
        template: args.template,
        temperature: args.temperature,
        max_tokens: args.max_tokens,
    };

    let result = service
        .complete(params)
        .await
        .map_err(|e| config.user_error(e))?;

    if config.json {
        print_json(&result)
    } else {
        print_chat(&result);
        Ok(())
    }
}

fn print_chat(result: &ChatResult) {
    match result.completion.choices.first() {
        Some(choice) => {
            if let Some(reasoning) = &choice.message.reasoning_content {
                println!("{}", reasoning.dimmed());
                println!();
            }
            println!("{}", choice.message.content.as_deref().unwrap_or_default());
        }
        None => println!("{}", "No choices returned.".yellow()),
    }
    println!();
    println!(
        "{}",
        format!(
            "{} · {}s · tokens in {} / out {} / total {}",
            result.completion.model,
            result.processing_time_secs,
            result.input_tokens,
            result.output_tokens,
            result.total_tokens
        )
        .dimmed()
    );
}
