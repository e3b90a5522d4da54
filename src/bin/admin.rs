//! CLI administration tool for rusty-shortener.
//!
//! Provides commands for generating API keys, inspecting mappings and
//! checking the database without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Generate a new API key
//! cargo run --bin admin -- keygen --name frontend
//!
//! # Look up a short code
//! cargo run --bin admin -- resolve aZ3-x_9Q
//!
//! # Count stored mappings
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same database settings as the server (`DATABASE_URL` or `DB_*`).
//! `keygen` needs none.

use rusty_shortener::application::services::MAX_KEY_ID_LENGTH;
use rusty_shortener::config::{Config, StoreBackend, mask_connection_string};
use rusty_shortener::server::{build_repository, connect_pool};

use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use clap::{Parser, Subcommand};
use colored::*;

/// Random bytes per generated key (256 bits).
const KEY_BYTES: usize = 32;

/// CLI tool for managing rusty-shortener.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// Generate a random API key and print the matching env entry
    Keygen {
        /// Key name recorded as owner of the mappings it creates
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Show the mapping stored for a short code
    Resolve {
        /// The short code
        code: String,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Keygen { name } => keygen(name)?,
        Commands::Resolve { code } => resolve(&load_config()?, &code).await?,
        Commands::Stats => stats(&load_config()?).await?,
        Commands::Db { action } => handle_db_action(action, &load_config()?).await?,
    }

    Ok(())
}

/// Loads store settings. API keys are not required for admin commands.
fn load_config() -> Result<Config> {
    let config = Config::from_env()?;

    if config.store_backend == StoreBackend::Memory {
        println!(
            "{}",
            "⚠️  STORE_BACKEND=memory: this process sees an empty store, not the server's"
                .yellow()
        );
    }

    Ok(config)
}

/// Generates a new API key.
///
/// # Format
///
/// 32 bytes from the OS random source, URL-safe base64 without padding
/// (43 characters, 256 bits of entropy).
fn keygen(name: Option<String>) -> Result<()> {
    let mut bytes = [0u8; KEY_BYTES];
    getrandom::fill(&mut bytes)
        .map_err(|e| anyhow::anyhow!("OS random source unavailable: {}", e))?;
    let key = URL_SAFE_NO_PAD.encode(bytes);

    let entry = match name.as_deref().map(str::trim) {
        Some(n) if !n.is_empty() => {
            anyhow::ensure!(
                !n.contains(':') && !n.contains(','),
                "Key name must not contain ':' or ','"
            );
            anyhow::ensure!(
                n.chars().count() <= MAX_KEY_ID_LENGTH,
                "Key name must be at most {} characters",
                MAX_KEY_ID_LENGTH
            );
            format!("{}:{}", n, key)
        }
        _ => key.clone(),
    };

    println!("{}", "🔑 New API key".bright_blue().bold());
    println!();
    println!("  Key: {}", key.bright_yellow().bold());
    println!();
    println!("{}", "Add it to the server environment:".bright_white());
    println!("  {}={}", "API_KEYS".bright_cyan(), entry);
    println!();
    println!("{}", "Example:".bright_white());
    println!(
        "  curl -X POST -H \"API-Key: {}\" -H \"Content-Type: application/json\" \\\n       -d '{{\"long_url\":\"https://example.com\"}}' http://localhost:8000/generate_url",
        key.bright_yellow()
    );
    println!();
    println!(
        "{}",
        "⚠️  The key is not stored anywhere else. Save it now.".red().bold()
    );

    Ok(())
}

/// Prints the record stored under `code`.
async fn resolve(config: &Config, code: &str) -> Result<()> {
    let repository = build_repository(config).await?;

    let record = repository
        .get(code)
        .await
        .map_err(|e| anyhow::anyhow!("Store error: {}", e))?;

    let Some(record) = record else {
        println!("{} {}", "❌ No mapping for".red(), code.bold());
        return Ok(());
    };

    println!("{}", "🔗 Mapping".bright_blue().bold());
    println!();
    println!("  Code:     {}", record.code.cyan());
    println!("  Long URL: {}", record.long_url.bright_white());
    println!("  Origin:   {}", record.origin.to_string().bright_black());
    println!("  Owner:    {}", record.owner_key_id.bright_black());
    println!(
        "  Created:  {}",
        record
            .created_at
            .format("%Y-%m-%d %H:%M:%S UTC")
            .to_string()
            .bright_black()
    );
    println!();

    Ok(())
}

/// Displays the number of stored mappings.
async fn stats(config: &Config) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let repository = build_repository(config).await?;
    let count = repository
        .count()
        .await
        .map_err(|e| anyhow::anyhow!("Store error: {}", e))?;

    println!(
        "  Mappings:      {}",
        count.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, config: &Config) -> Result<()> {
    let database_url = config
        .database_url
        .as_deref()
        .context("Database commands need STORE_BACKEND=postgres")?;
    let pool = connect_pool(config).await?;

    match action {
        DbAction::Check => {
            println!(
                "{} {}",
                "🔍 Checking database connection to".bright_blue(),
                mask_connection_string(database_url)
            );

            sqlx::query("SELECT 1").fetch_one(&pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(&pool)
                .await?;

            let migrations: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
                .fetch_one(&pool)
                .await
                .unwrap_or(0);

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Migrations: {}", migrations.to_string().bright_white());
            println!();
        }
    }

    Ok(())
}
