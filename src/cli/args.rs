//! Command-line argument parsing for the MakeIt CLI.
//!
//! This module handles parsing command-line arguments into global options
//! and the CLI command to execute.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::config::ClientConfig;

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Check backend health
    Health,
    /// Ask the knowledge base one question
    Ask(String),
    /// Analyze an image file, with an optional prompt
    Image {
        path: PathBuf,
        message: Option<String>,
    },
    /// List origami models, or show one by id
    Fold(Option<String>),
    /// Run the interactive chat (default)
    Chat,
}

/// Global options plus the command.
#[derive(Debug, Clone, PartialEq)]
pub struct CliArgs {
    /// Overrides `MAKEIT_API_URL`
    pub url: Option<String>,
    /// Overrides `MAKEIT_CHUNK_TIMEOUT_SECS`
    pub chunk_timeout: Option<Duration>,
    pub command: CliCommand,
}

impl CliArgs {
    /// Layer command-line overrides on top of a config.
    pub fn apply(&self, config: ClientConfig) -> ClientConfig {
        let mut config = config;
        if let Some(url) = &self.url {
            config = config.with_base_url(url.clone());
        }
        if self.chunk_timeout.is_some() {
            config = config.with_chunk_timeout(self.chunk_timeout);
        }
        config
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArgsError {
    #[error("{0} requires a value")]
    MissingValue(&'static str),

    #[error("Invalid --chunk-timeout value {0:?}: expected a positive number of seconds")]
    InvalidTimeout(String),

    #[error("Unexpected argument: {0}")]
    Unexpected(String),
}

pub const USAGE: &str = "Usage: makeit [--url URL] [--chunk-timeout SECS] [--version | --health | --ask QUESTION | --image PATH [MESSAGE] | --fold [ID]]";

/// Parse command-line arguments.
///
/// # Arguments
///
/// * `args` - Iterator of command-line arguments (typically `std::env::args()`)
///
/// # Examples
///
/// ```
/// use makeit::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["makeit".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()).unwrap().command, CliCommand::Version);
/// ```
pub fn parse_args<I>(args: I) -> Result<CliArgs, ArgsError>
where
    I: Iterator<Item = String>,
{
    let mut parsed = CliArgs {
        url: None,
        chunk_timeout: None,
        command: CliCommand::Chat,
    };

    // Skip the program name
    let mut args = args.skip(1).peekable();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--version" | "-V" => parsed.command = CliCommand::Version,
            "--health" => parsed.command = CliCommand::Health,
            "--url" => {
                parsed.url = Some(args.next().ok_or(ArgsError::MissingValue("--url"))?);
            }
            "--chunk-timeout" => {
                let value = args
                    .next()
                    .ok_or(ArgsError::MissingValue("--chunk-timeout"))?;
                parsed.chunk_timeout = Some(parse_timeout(&value)?);
            }
            "--ask" => {
                let question = args.next().ok_or(ArgsError::MissingValue("--ask"))?;
                parsed.command = CliCommand::Ask(question);
            }
            "--fold" => {
                let model_id = args.next_if(|next| !next.starts_with('-'));
                parsed.command = CliCommand::Fold(model_id);
            }
            "--image" => {
                let path = args.next().ok_or(ArgsError::MissingValue("--image"))?;
                let rest: Vec<String> = args.by_ref().collect();
                let message = if rest.is_empty() {
                    None
                } else {
                    Some(rest.join(" "))
                };
                parsed.command = CliCommand::Image {
                    path: PathBuf::from(path),
                    message,
                };
            }
            _ => return Err(ArgsError::Unexpected(arg)),
        }
    }

    Ok(parsed)
}

fn parse_timeout(value: &str) -> Result<Duration, ArgsError> {
    match value.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ArgsError::InvalidTimeout(value.to_string())),
    }
}
