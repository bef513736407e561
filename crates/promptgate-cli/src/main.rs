//! promptgate - command-line access to the prompt-filtering chat API.
//!
//! Each subcommand maps one-to-one onto a library operation and prints the
//! API's JSON response to stdout. Configuration comes from `API_HOST` and
//! `API_KEY` in the environment or a `.env` file.

use std::io;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use promptgate_core::{ApiClient, JsonObject, PromptSubmission};

#[derive(Parser)]
#[command(name = "promptgate")]
#[command(about = "Command-line access to the prompt-filtering chat API")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Emit compact JSON instead of pretty-printed output.
    #[arg(long, global = true)]
    compact: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the filters applied to this account.
    Filters,
    /// List the models available to this account.
    Models,
    /// Show token usage for this account.
    Tokens,
    /// Manage chat sessions.
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
    /// Run the account's filters over a piece of text.
    FilterText {
        /// Text to run through the filters.
        text: String,
    },
    /// Submit a prompt to an existing chat session.
    Submit {
        /// Session to submit the prompt to.
        #[arg(long)]
        session_id: String,
        /// Model to route the prompt to.
        #[arg(long)]
        model: String,
        /// The prompt text.
        message: String,
    },
}

#[derive(Subcommand)]
enum SessionAction {
    /// Create a new chat session.
    Create {
        /// Name for the new session.
        name: String,
    },
    /// Delete a chat session.
    Delete {
        /// ID of the session to delete.
        session_id: String,
    },
    /// Rename a chat session.
    Rename {
        /// ID of the session to rename.
        session_id: String,
        /// New name for the session.
        new_name: String,
    },
}

/// Initialize the tracing subscriber for logging.
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let client = ApiClient::from_env()?;

    let response = run_command(&client, cli.command).await?;
    print_response(&response, cli.compact)?;
    Ok(())
}

async fn run_command(client: &ApiClient, command: Commands) -> Result<JsonObject> {
    let response = match command {
        Commands::Filters => client.fetch_filters().await?,
        Commands::Models => client.fetch_models().await?,
        Commands::Tokens => client.token_usage().await?,
        Commands::Session { action } => match action {
            SessionAction::Create { name } => client.create_session(&name).await?,
            SessionAction::Delete { session_id } => client.delete_session(&session_id).await?,
            SessionAction::Rename {
                session_id,
                new_name,
            } => client.rename_session(&session_id, &new_name).await?,
        },
        Commands::FilterText { text } => client.filter_text(&text).await?,
        Commands::Submit {
            session_id,
            model,
            message,
        } => {
            let prompt = PromptSubmission::for_session_id(&session_id, &message, &model);
            client.submit_prompt(&prompt).await?
        }
    };
    debug!(fields = response.len(), "command completed");
    Ok(response)
}

fn print_response(response: &JsonObject, compact: bool) -> Result<()> {
    let rendered = if compact {
        serde_json::to_string(response)?
    } else {
        serde_json::to_string_pretty(response)?
    };
    println!("{}", rendered);
    Ok(())
}
