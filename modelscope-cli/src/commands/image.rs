//! Image command handlers
//!
//! Submits text-to-image jobs and waits for them, printing progress while
//! the job is polled. Ctrl-C cancels the wait.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::*;
use modelscope_client::InferenceClient;
use modelscope_core::catalog::ModelKind;
use modelscope_core::domain::job::{
    DEFAULT_GUIDANCE_SCALE, DEFAULT_IMAGE_MODEL, DEFAULT_IMAGE_SIZE, DEFAULT_STEPS, ImageSize,
    JobRequest,
};
use modelscope_runner::repository::HttpTaskRepository;
use modelscope_runner::service::{ImageGeneration, ImageService};
use modelscope_runner::{JobPoller, OperationError};
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::output::{ProgressPrinter, check_model, print_json};

/// Image subcommands
#[derive(Subcommand)]
pub enum ImageCommands {
    /// Generate images from a text prompt
    Generate(GenerateArgs),
}

#[derive(Args)]
pub struct GenerateArgs {
    /// What the image should show
    #[arg(long)]
    prompt: String,

    /// What the image should avoid
    #[arg(long)]
    negative_prompt: Option<String>,

    #[arg(long, default_value = DEFAULT_IMAGE_MODEL)]
    model: String,

    /// Output size, e.g. 1024x1024
    #[arg(long, default_value = DEFAULT_IMAGE_SIZE)]
    size: ImageSize,

    /// Number of inference steps
    #[arg(long, default_value_t = DEFAULT_STEPS, value_parser = clap::value_parser!(u32).range(1..=100))]
    steps: u32,

    #[arg(long, default_value_t = DEFAULT_GUIDANCE_SCALE)]
    guidance: f32,

    /// Give up waiting after this many minutes
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..=10))]
    timeout_minutes: u64,
}

/// Handle image commands
pub async fn handle_image_command(command: ImageCommands, config: &Config) -> Result<()> {
    match command {
        ImageCommands::Generate(args) => generate(args, config).await,
    }
}

async fn generate(args: GenerateArgs, config: &Config) -> Result<()> {
    check_model(ModelKind::Image, &args.model);

    let runner_config = config.runner_config()?;
    let client = InferenceClient::new(runner_config.client_config())?;
    let repository = Arc::new(HttpTaskRepository::new(client));

    let timeout = Duration::from_secs(args.timeout_minutes * 60);
    let poller = JobPoller::new(repository.clone(), runner_config.poll)
        .with_observer(Arc::new(ProgressPrinter::new(timeout)));
    let service = ImageService::new(repository, poller);

    let mut request = JobRequest::new(args.prompt)
        .with_model(args.model)
        .with_size(args.size)
        .with_steps(args.steps)
        .with_guidance_scale(args.guidance)
        .with_timeout(timeout);
    if let Some(negative_prompt) = args.negative_prompt {
        request = request.with_negative_prompt(negative_prompt);
    }

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            trigger.cancel();
        }
    });

    if !config.json {
        eprintln!("{}", "Submitting image generation job...".bold());
    }

    let result = service
        .generate_with_cancel(request, &cancel)
        .await
        .map_err(|e: OperationError| config.user_error(e))?;

    if config.json {
        print_json(&result)
    } else {
        print_generation(&result);
        Ok(())
    }
}

fn print_generation(result: &ImageGeneration) {
    println!();
    println!(
        "{} Task {} {}",
        "✓".green(),
        result.task_id.bold(),
        result.status.green()
    );
    println!("    Model:        {}", result.model);
    println!("    Size:         {}", result.size);
    println!("    Steps:        {}", result.steps);
    println!(
        "    Time:         {}",
        format!(
            "{}s ({} polls)",
            result.processing_time_secs, result.attempts_used
        )
        .dimmed()
    );
    println!("    Images:");
    for image in &result.images {
        println!("      {}", image.cyan());
    }
}
