//! # Chat Core
//!
//! Command-line front end for the chat server core: mint and decode
//! Snowflake IDs, compute message buckets, and run permission checks.
//!
//! The entry point initializes:
//! - Tracing/logging subsystem
//! - Configuration loading
//! - Snowflake generator, bucket window and permission resolver

use std::io::Read;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use chat_core::application::dto::{
    AccessCheckRequest, AccessCheckResponse, PermissionsResponse, SnowflakeResponse,
};
use chat_core::application::services::AccessError;
use chat_core::config::Settings;
use chat_core::domain::{Permissions, Snowflake};
use chat_core::infrastructure::metrics;
use chat_core::shared::error::AppError;
use chat_core::startup::{AppState, Application};

/// Snowflake IDs, message buckets and permission checks.
#[derive(Parser)]
#[command(name = "chat-core")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("unknown output format: {}", s)),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate new Snowflake IDs
    Generate {
        /// Number of IDs to generate
        #[arg(short, long, default_value_t = 1)]
        count: usize,
    },
    /// Decode a Snowflake ID
    Inspect {
        /// Snowflake ID
        id: Snowflake,
    },
    /// Print the message bucket of a Snowflake ID
    Bucket {
        /// Snowflake ID
        id: Snowflake,
    },
    /// List the buckets to scan when reading a channel's history
    History {
        /// Channel Snowflake ID
        channel_id: Snowflake,
        /// Only messages older than this ID (defaults to now)
        #[arg(short, long)]
        before: Option<Snowflake>,
    },
    /// List the permission names set in a mask
    Perms {
        /// Permission bitmask
        mask: i64,
    },
    /// Run a permission check described as JSON
    Check {
        /// Read the request from a file instead of stdin
        #[arg(short, long)]
        file: Option<String>,
    },
    /// Print Prometheus metrics in text format
    ///
    /// Counters live in this process only, so they cover just this
    /// invocation's startup; a fresh run reports zeros.
    Metrics,
}

fn main() -> Result<()> {
    // Initialize tracing subscriber for structured logging
    chat_core::telemetry::init_tracing();

    let cli = Cli::parse();

    // Load configuration from environment and config files
    let settings = Settings::load().context("failed to load configuration")?;
    info!(
        environment = %settings.environment,
        worker_id = settings.snowflake.worker_id,
        process_id = settings.snowflake.process_id,
        "Configuration loaded"
    );

    let application = Application::build(settings)?;

    let output = cli.output;
    if let Err(err) = run(cli, application.state()) {
        // Machine-readable callers get the error body on stdout
        if let (OutputFormat::Json, Some(app_err)) = (output, err.downcast_ref::<AppError>()) {
            print_json(&app_err.to_response())?;
            std::process::exit(1);
        }
        return Err(err);
    }
    Ok(())
}

fn run(cli: Cli, state: &AppState) -> Result<()> {
    let epoch = state.settings.snowflake.epoch;
    let window = state.messages.window();

    match cli.command {
        Commands::Generate { count } => {
            let decoded = state
                .snowflake
                .generate_many(count)
                .into_iter()
                .map(|id| SnowflakeResponse::new(id, epoch, &window))
                .collect::<Result<Vec<_>, _>>()
                .map_err(AppError::from)?;
            match cli.output {
                OutputFormat::Json => print_json(&decoded)?,
                OutputFormat::Text => decoded.iter().for_each(|d| println!("{}", d.id)),
            }
        }
        Commands::Inspect { id } => {
            let decoded = SnowflakeResponse::new(id, epoch, &window).map_err(AppError::from)?;
            match cli.output {
                OutputFormat::Json => print_json(&decoded)?,
                OutputFormat::Text => {
                    println!("id:         {}", decoded.id);
                    println!("timestamp:  {}", decoded.timestamp);
                    if let Some(created_at) = &decoded.created_at {
                        println!("created_at: {}", created_at);
                    }
                    println!("worker_id:  {}", decoded.worker_id);
                    println!("process_id: {}", decoded.process_id);
                    println!("sequence:   {}", decoded.sequence);
                    println!("bucket:     {}", decoded.bucket);
                }
            }
        }
        Commands::Bucket { id } => {
            let bucket = window.bucket_of(id).map_err(AppError::from)?;
            match cli.output {
                OutputFormat::Json => print_json(&bucket)?,
                OutputFormat::Text => println!("{}", bucket),
            }
        }
        Commands::History { channel_id, before } => {
            let buckets: Vec<_> = state
                .messages
                .history_buckets(channel_id, before)
                .map_err(AppError::from)?
                .collect();
            match cli.output {
                OutputFormat::Json => print_json(&buckets)?,
                OutputFormat::Text => buckets.iter().for_each(|b| println!("{}", b)),
            }
        }
        Commands::Perms { mask } => {
            let response = PermissionsResponse::from(Permissions::new(mask));
            match cli.output {
                OutputFormat::Json => print_json(&response)?,
                OutputFormat::Text => response.names.iter().for_each(|n| println!("{}", n)),
            }
        }
        Commands::Check { file } => {
            let body = match file {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read {}", path))?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            let request = AccessCheckRequest::from_json(&body)?;

            let member = request.member();
            let result = state.access.check_channel_access_by_name(
                &member,
                request.guild_permissions,
                &request.requested,
            );
            let response = match result {
                Ok(effective) => AccessCheckResponse {
                    allowed: true,
                    effective: effective.into(),
                },
                Err(AccessError::Forbidden) => AccessCheckResponse {
                    allowed: false,
                    effective: state
                        .access
                        .resolver()
                        .effective_permissions(&member, request.guild_permissions)
                        .into(),
                },
                Err(err) => return Err(AppError::from(err).into()),
            };
            match cli.output {
                OutputFormat::Json => print_json(&response)?,
                OutputFormat::Text => println!("{}", if response.allowed { "allowed" } else { "denied" }),
            }
        }
        Commands::Metrics => {
            let body = metrics::gather_metrics().map_err(|e| AppError::Internal(e.to_string()))?;
            print!("{}", body);
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
