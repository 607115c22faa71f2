//! CLI module for MakeIt.
//!
//! This module provides command-line interface functionality including:
//! - Argument parsing
//! - Version display
//! - One-shot backend calls (health, ask, image analysis, origami models)
//! - The interactive chat loop
//!
//! # Usage
//!
//! ```ignore
//! use makeit::cli::{parse_args, run_cli_command};
//! use makeit::config::ClientConfig;
//!
//! let args = parse_args(std::env::args())?;
//! let config = args.apply(ClientConfig::from_env());
//! let code = run_cli_command(args.command, &config).await?;
//! std::process::exit(code);
//! ```

pub mod args;
pub mod ask;
pub mod chat;
pub mod fold;
pub mod health;
pub mod image;
pub mod version;

pub use args::{parse_args, ArgsError, CliArgs, CliCommand, USAGE};
pub use ask::handle_ask_command;
pub use chat::{run_chat, run_chat_with_interrupt, Conversation, TerminalRenderer};
pub use fold::handle_fold_command;
pub use health::handle_health_command;
pub use image::{handle_image_command, load_image_request};
pub use version::{handle_version_command, VERSION};

use color_eyre::Result;
use tokio::io::BufReader;

use crate::client::MakeItClient;
use crate::config::ClientConfig;
use crate::coordinator::FallbackCoordinator;

/// Run a CLI command against the configured backend.
///
/// Returns the process exit code.
pub async fn run_cli_command(command: CliCommand, config: &ClientConfig) -> Result<i32> {
    let mut stdout = std::io::stdout();

    match command {
        CliCommand::Version => {
            handle_version_command();
            Ok(0)
        }
        CliCommand::Health => {
            let client = MakeItClient::from_config(config);
            let healthy = handle_health_command(&client, &mut stdout).await?;
            Ok(if healthy { 0 } else { 1 })
        }
        CliCommand::Ask(question) => {
            let client = MakeItClient::from_config(config);
            handle_ask_command(&client, &question, &mut stdout).await?;
            Ok(0)
        }
        CliCommand::Image { path, message } => {
            let client = MakeItClient::from_config(config);
            handle_image_command(&client, &path, message.as_deref(), &mut stdout).await?;
            Ok(0)
        }
        CliCommand::Fold(model_id) => {
            let client = MakeItClient::from_config(config);
            let found = handle_fold_command(&client, model_id.as_deref(), &mut stdout).await?;
            Ok(if found { 0 } else { 1 })
        }
        CliCommand::Chat => {
            let coordinator = FallbackCoordinator::from_config(config);
            tracing::debug!(base_url = %config.base_url, "Starting interactive chat");
            run_chat(&coordinator, BufReader::new(tokio::io::stdin()), &mut stdout).await?;
            Ok(0)
        }
    }
}
