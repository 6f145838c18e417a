//! skyproxy - command-line access to the SKY API constituent endpoints.
//!
//! Each subcommand performs one authenticated call and prints the JSON result.
//! Logging is controlled with `RUST_LOG` (e.g. `RUST_LOG=skyproxy_client=debug`).
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use log::debug;
use serde_json::Value;

use skyproxy_client::{ConstituentApi, SkyClient};
use skyproxy_common::Session;

mod config;

use crate::config::{FileConfig, Overrides};

/// Environment variable consulted when `--access-token` is not given.
const ACCESS_TOKEN_ENV: &str = "SKY_ACCESS_TOKEN";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Base URL for the SKY API
    #[arg(long)]
    base_url: Option<String>,

    /// Request timeout in milliseconds (default: 29000)
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Environment variable holding the subscription key (default: AUTH_SUBSCRIPTION_KEY)
    #[arg(long)]
    subscription_key_env: Option<String>,

    /// Bearer access token (or set SKY_ACCESS_TOKEN env var)
    #[arg(long, conflicts_with = "session_file")]
    access_token: Option<String>,

    /// JSON session file of the form {"ticket": {"access_token": "..."}}
    #[arg(long)]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Fetch a constituent by id
    Constituent {
        /// Constituent id
        id: String,
    },
    /// Search constituents by name
    Search {
        /// Search text, sent as-is
        name: String,
    },
    /// Fetch a constituent's profile picture
    ProfilePicture {
        /// Constituent id
        id: String,
    },
    /// Create a note from a JSON payload
    PostNote {
        /// Note payload as inline JSON
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        body: Option<String>,

        /// Path to a file containing the note payload
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let args = Args::parse();

    match run(args).await {
        Ok(value) => match serde_json::to_string_pretty(&value) {
            Ok(pretty) => println!("{pretty}"),
            Err(e) => {
                eprintln!("{} {e}", "error:".red().bold());
                std::process::exit(1);
            }
        },
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            std::process::exit(1);
        }
    }
}

async fn run(args: Args) -> Result<Value> {
    let file_config = match &args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };

    let config = file_config.resolve(Overrides {
        base_url: args.base_url,
        timeout_ms: args.timeout_ms,
        subscription_key_env: args.subscription_key_env,
    });
    debug!("Resolved configuration: {config:?}");

    let session = load_session(args.access_token, args.session_file.as_deref())?;
    let client = SkyClient::new(config)?;

    let value = match args.command {
        Command::Constituent { id } => client.get_constituent(&session, &id).await?,
        Command::Search { name } => client.get_constituent_search(&session, &name).await?,
        Command::ProfilePicture { id } => {
            client
                .get_constituent_profile_picture(&session, &id)
                .await?
        }
        Command::PostNote { body, file } => {
            let note = read_note(body, file.as_deref())?;
            client.post_notes(&session, &note).await?
        }
    };

    Ok(value)
}

/// Builds the session from a session file, a flag, or the environment.
fn load_session(
    access_token: Option<String>,
    session_file: Option<&std::path::Path>,
) -> Result<Session> {
    if let Some(path) = session_file {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read session file: {}", path.display()))?;
        return Session::from_json(&contents)
            .with_context(|| format!("Invalid session file: {}", path.display()));
    }

    let token = access_token
        .or_else(|| std::env::var(ACCESS_TOKEN_ENV).ok())
        .context("Access token must be provided via --access-token, --session-file or SKY_ACCESS_TOKEN env var")?;

    Ok(Session::from_token(token)?)
}

/// Reads the note payload from `--body` or `--file`.
fn read_note(body: Option<String>, file: Option<&std::path::Path>) -> Result<Value> {
    let raw = match (body, file) {
        (Some(body), _) => body,
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read note file: {}", path.display()))?,
        (None, None) => anyhow::bail!("A note payload is required (--body or --file)"),
    };

    serde_json::from_str(&raw).context("Note payload is not valid JSON")
}
