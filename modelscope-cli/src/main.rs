//! ModelScope CLI
//!
//! Command-line interface for the ModelScope inference API.

mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use modelscope_client::DEFAULT_BASE_URL;
use modelscope_runner::Locale;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "modelscope")]
#[command(about = "ModelScope inference CLI", long_about = None)]
struct Cli {
    /// ModelScope access token
    #[arg(long, env = "MODELSCOPE_ACCESS_TOKEN", hide_env_values = true, global = true)]
    access_token: Option<String>,

    /// API base URL
    #[arg(long, env = "MODELSCOPE_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    base_url: String,

    /// Language of error messages (en, zh)
    #[arg(long, env = "MODELSCOPE_LOCALE", default_value = "en", global = true)]
    locale: Locale,

    /// Print raw JSON results instead of summaries
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so that --json output stays machine readable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "modelscope=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config {
        access_token: cli.access_token,
        base_url: cli.base_url,
        locale: cli.locale,
        json: cli.json,
    };

    handle_command(cli.command, &config).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_chat_with_globals() {
        let cli = Cli::try_parse_from([
            "modelscope",
            "--locale",
            "zh",
            "--json",
            "chat",
            "-m",
            "system:Be brief",
            "-m",
            "user:Hello",
        ])
        .unwrap();

        assert_eq!(cli.locale, Locale::Zh);
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::Chat(_)));
    }

    #[test]
    fn test_image_timeout_is_bounded() {
        let parsed = Cli::try_parse_from([
            "modelscope",
            "image",
            "generate",
            "--prompt",
            "a fox",
            "--timeout-minutes",
            "11",
        ]);
        assert!(parsed.is_err());
    }
}
