//! Pantry Tracker CLI - Database migrations and data tools.
//!
//! # Usage
//!
//! ```bash
//! # Create the document and session tables
//! pantry-cli migrate
//!
//! # Give a user some sample pantry items
//! pantry-cli seed --user 9f1c...
//!
//! # Show a user's pantry items
//! pantry-cli items list --user 9f1c...
//! ```
//!
//! # Environment Variables
//!
//! - `TRACKER_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "pantry-cli")]
#[command(author, version, about = "Pantry Tracker CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations (documents and sessions)
    Migrate,
    /// Insert sample pantry items for a user
    Seed {
        /// Identity provider user ID
        #[arg(short, long)]
        user: String,
    },
    /// Inspect pantry items
    Items {
        #[command(subcommand)]
        action: ItemsAction,
    },
}

#[derive(Subcommand)]
enum ItemsAction {
    /// List a user's items in store order
    List {
        /// Identity provider user ID
        #[arg(short, long)]
        user: String,

        /// Only show items whose name contains this text
        #[arg(short, long)]
        search: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { user } => {
            commands::seed::sample_items(&user).await?;
        }
        Commands::Items { action } => match action {
            ItemsAction::List { user, search } => {
                commands::items::list(&user, search.as_deref()).await?;
            }
        },
    }
    Ok(())
}
