//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod batch;
mod chat;
mod embed;
mod image;
mod models;
mod vision;

pub use batch::BatchArgs;
pub use chat::ChatArgs;
pub use embed::EmbedArgs;
pub use image::ImageCommands;
pub use models::ModelsArgs;
pub use vision::VisionArgs;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Image generation
    Image {
        #[command(subcommand)]
        command: ImageCommands,
    },
    /// Chat completion with a language model
    Chat(ChatArgs),
    /// Ask a vision model about an image
    Vision(VisionArgs),
    /// Create text embeddings
    Embed(EmbedArgs),
    /// Search the model catalog or verify credentials
    Models(ModelsArgs),
    /// Run a JSON file of work items
    Batch(BatchArgs),
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Image { command } => image::handle_image_command(command, config).await,
        Commands::Chat(args) => chat::handle_chat(args, config).await,
        Commands::Vision(args) => vision::handle_vision(args, config).await,
        Commands::Embed(args) => embed::handle_embed(args, config).await,
        Commands::Models(args) => models::handle_models(args, config).await,
        Commands::Batch(args) => batch::handle_batch(args, config).await,
    }
}
