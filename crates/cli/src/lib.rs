pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use threadpilot_client::{ActionClient, HttpTransport};
use threadpilot_core::config::{AppConfig, ConfigOverrides, LoadOptions, LoggingConfig};
use threadpilot_core::domain::FeedbackPolarity;

#[derive(Debug, Parser)]
#[command(
    name = "threadpilot",
    about = "Operator CLI for the assistant plugin's action endpoints",
    long_about = "Trigger assistant actions (summaries, reactions, tickets, transcriptions, feedback) against a running chat server, and inspect effective configuration.",
    after_help = "Examples:\n  threadpilot summarize abc123\n  threadpilot feedback abc123 --negative\n  threadpilot config"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to a threadpilot.toml config file")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "Chat server base URL override")]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(flatten)]
    Action(ActionCommand),
    #[command(about = "Inspect effective configuration values with secrets redacted")]
    Config,
}

/// Subcommands that issue one request against the server. Kept apart from
/// `Config` so everything reaching `dispatch` already has a client.
#[derive(Debug, Subcommand)]
enum ActionCommand {
    #[command(about = "Request an automated emoji reaction to a post")]
    React { post_id: String },
    #[command(about = "Request a summary of the thread rooted at a post")]
    Summarize { post_id: String },
    #[command(about = "Request ticket creation from the conversation rooted at a post")]
    Ticket { post_id: String },
    #[command(about = "Record feedback on a bot response (positive unless --negative)")]
    Feedback {
        post_id: String,
        #[arg(long, help = "Record negative instead of positive feedback")]
        negative: bool,
    },
    #[command(about = "Request audio transcription of a post's attachment")]
    Transcribe { post_id: String },
    #[command(about = "Stop an in-flight bot response on a post")]
    Stop { post_id: String },
    #[command(about = "Ask the bot to regenerate its response on a post")]
    Regenerate { post_id: String },
}

fn init_logging(config: &LoggingConfig) {
    use threadpilot_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

pub async fn run() -> ExitCode {
    let cli = Cli::parse();

    let options = LoadOptions {
        config_path: cli.config.clone(),
        require_file: cli.config.is_some(),
        overrides: ConfigOverrides { base_url: cli.base_url.clone(), ..ConfigOverrides::default() },
    };

    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => {
            let result = commands::CommandResult::startup_failed("config", error.to_string());
            println!("{}", result.output);
            return ExitCode::from(result.exit_code);
        }
    };
    init_logging(&config.logging);

    let result = match cli.command {
        Command::Config => commands::config::run(&config),
        Command::Action(action) => {
            let client = match build_client(&config) {
                Ok(client) => client,
                Err(result) => {
                    println!("{}", result.output);
                    return ExitCode::from(result.exit_code);
                }
            };
            dispatch(action, &client).await
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

fn build_client(config: &AppConfig) -> Result<ActionClient, commands::CommandResult> {
    let transport = HttpTransport::from_config(&config.server).map_err(|error| {
        commands::CommandResult::startup_failed("transport", error.to_string())
    })?;
    Ok(ActionClient::new(Arc::new(transport), config.plugin.id.clone()))
}

async fn dispatch(command: ActionCommand, client: &ActionClient) -> commands::CommandResult {
    match command {
        ActionCommand::React { post_id } => {
            commands::action::run(client, "react", &post_id, |client, post| {
                Box::pin(async move { client.react(&post).await })
            })
            .await
        }
        ActionCommand::Summarize { post_id } => {
            commands::action::run(client, "summarize", &post_id, |client, post| {
                Box::pin(async move { client.summarize(&post).await })
            })
            .await
        }
        ActionCommand::Ticket { post_id } => {
            commands::action::run(client, "ticket", &post_id, |client, post| {
                Box::pin(async move { client.file_ticket(&post).await })
            })
            .await
        }
        ActionCommand::Feedback { post_id, negative } => {
            let polarity =
                if negative { FeedbackPolarity::Negative } else { FeedbackPolarity::Positive };
            commands::action::run(client, "feedback", &post_id, move |client, post| {
                Box::pin(async move { client.feedback(&post, polarity).await })
            })
            .await
        }
        ActionCommand::Transcribe { post_id } => {
            commands::action::run(client, "transcribe", &post_id, |client, post| {
                Box::pin(async move { client.transcribe(&post).await })
            })
            .await
        }
        ActionCommand::Stop { post_id } => {
            commands::action::run(client, "stop", &post_id, |client, post| {
                Box::pin(async move { client.stop_generating(&post).await })
            })
            .await
        }
        ActionCommand::Regenerate { post_id } => {
            commands::action::run(client, "regenerate", &post_id, |client, post| {
                Box::pin(async move { client.regenerate(&post).await })
            })
            .await
        }
    }
}
