//! LUXE CLI - Operator tooling for the hosted backend.
//!
//! # Usage
//!
//! ```bash
//! # Insert the default categories that do not exist yet
//! luxe-cli seed categories
//!
//! # Give a user access to the admin console
//! luxe-cli admin grant 0b6f2c1e-8d4a-4c55-9f0e-3f1a2b7c9d10
//!
//! # Take it away again
//! luxe-cli admin revoke 0b6f2c1e-8d4a-4c55-9f0e-3f1a2b7c9d10
//!
//! # Check that the backend answers with the service-role key
//! luxe-cli ping
//! ```
//!
//! # Commands
//!
//! - `seed categories` - Insert the default catalog categories
//! - `admin grant|revoke` - Manage the admin role in `user_roles`
//! - `ping` - Backend reachability check
//!
//! Every command authenticates with `BACKEND_SERVICE_ROLE_KEY`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "luxe-cli")]
#[command(author, version, about = "LUXE operator tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed the backend with default data
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
    /// Manage the admin role
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Check that the backend is reachable
    Ping,
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Insert the six default categories, skipping existing slugs
    Categories,
}

#[derive(Subcommand)]
enum AdminAction {
    /// Give a user the admin role
    Grant {
        /// Backend user id (UUID)
        user_id: String,
    },
    /// Remove the admin role from a user
    Revoke {
        /// Backend user id (UUID)
        user_id: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "luxe_cli=info,luxe_backend=info".into()),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    let client = commands::service_client()?;

    match cli.command {
        Commands::Seed { target } => match target {
            SeedTarget::Categories => {
                commands::seed::categories(&client).await?;
            }
        },
        Commands::Admin { action } => match action {
            AdminAction::Grant { user_id } => commands::admin::grant(&client, &user_id).await?,
            AdminAction::Revoke { user_id } => commands::admin::revoke(&client, &user_id).await?,
        },
        Commands::Ping => commands::ping(&client).await?,
    }
    Ok(())
}
