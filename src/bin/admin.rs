//! CLI administration tool for click-tracker.
//!
//! Signs tracking links, generates API tokens and manages placements
//! without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Print the signed tracking link for a placement
//! cargo run --bin admin -- link 3kTMd9dWQ0qJcHnZbV1xYw
//!
//! # Check a signature from a link someone reported
//! cargo run --bin admin -- verify 3kTMd9dWQ0qJcHnZbV1xYw 3f5c53f5...
//!
//! # Generate a value for API_TOKEN
//! cargo run --bin admin -- token generate
//!
//! # Placements (requires a database)
//! cargo run --bin admin -- placement list --advertiser adv-42
//! cargo run --bin admin -- placement show 3kTMd9dWQ0qJcHnZbV1xYw
//! cargo run --bin admin -- placement create
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `HMAC_SECRET`, `BASE_URL`: must match the server for links to verify
//! - `DATABASE_URL` or `DB_*`: required for `placement` and `db` commands

use click_tracker::application::services::{LinkSigner, PlacementService};
use click_tracker::config::{Config, mask_connection_string};
use click_tracker::domain::entities::{Placement, PlacementFilter};
use click_tracker::infrastructure::persistence::PgPlacementRepository;
use click_tracker::utils::freshness::is_fresh;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing click-tracker.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Print the signed tracking link for a placement id
    Link { placement_id: String },

    /// Check a signature against a placement id
    Verify {
        placement_id: String,
        signature: String,
    },

    /// API token utilities
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Manage placements
    Placement {
        #[command(subcommand)]
        action: PlacementAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Token subcommands.
#[derive(Subcommand)]
enum TokenAction {
    /// Generate a random value for API_TOKEN
    Generate,
}

/// Placement subcommands.
#[derive(Subcommand)]
enum PlacementAction {
    /// List live placements, newest first
    List {
        #[arg(long)]
        advertiser: Option<String>,

        #[arg(long)]
        publisher: Option<String>,

        #[arg(long)]
        send: Option<String>,

        /// Maximum rows to show
        #[arg(short, long, default_value_t = 25)]
        limit: i64,
    },

    /// Show a placement and its tracking link
    Show { id: String },

    /// Create a placement (prompts for missing values)
    Create {
        #[arg(long)]
        advertiser: Option<String>,

        #[arg(long)]
        publisher: Option<String>,

        #[arg(long)]
        send: Option<String>,

        /// Price per click in cents
        #[arg(long)]
        price: Option<i64>,

        #[arg(long)]
        landing_url: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
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
    let config = Config::from_env()?;
    let signer = Arc::new(LinkSigner::new(
        config.hmac_secret.as_bytes(),
        config.base_url.as_str(),
    ));

    if config.uses_default_secret() {
        eprintln!(
            "{}",
            "⚠️  HMAC_SECRET is not set; links are signed with the development key".yellow()
        );
    }

    match cli.command {
        Commands::Link { placement_id } => print_link(&signer, &placement_id),
        Commands::Verify {
            placement_id,
            signature,
        } => verify_signature(&signer, &placement_id, &signature),
        Commands::Token { action } => match action {
            TokenAction::Generate => generate_api_token(),
        },
        Commands::Placement { action } => {
            let pool = connect(&config).await?;
            let service = PlacementService::new(
                Arc::new(PgPlacementRepository::new(Arc::new(pool))),
                signer,
            );
            handle_placement_action(action, &service).await
        }
        Commands::Db { action } => {
            let pool = connect(&config).await?;
            handle_db_action(action, &pool).await
        }
    }
}

async fn connect(config: &Config) -> Result<PgPool> {
    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL (or DB_HOST/DB_USER/DB_PASSWORD/DB_NAME) must be set")?;

    PgPool::connect(database_url)
        .await
        .with_context(|| {
            format!(
                "Failed to connect to database at {}",
                mask_connection_string(database_url)
            )
        })
}

fn print_link(signer: &LinkSigner, placement_id: &str) -> Result<()> {
    println!("{}", signer.tracking_link(placement_id).bright_yellow());
    Ok(())
}

fn verify_signature(signer: &LinkSigner, placement_id: &str, signature: &str) -> Result<()> {
    if signer.verify(placement_id, signature) {
        println!("{}", "✅ Signature is valid".green().bold());
        Ok(())
    } else {
        println!("{}", "❌ Signature does not match".red().bold());
        println!("  Expected: {}", signer.sign(placement_id).bright_black());
        anyhow::bail!("invalid signature")
    }
}

/// Prints a fresh token for the `API_TOKEN` variable.
fn generate_api_token() -> Result<()> {
    let token = generate_token();

    println!("{}", "🔑 Generated API token".bright_blue().bold());
    println!();
    println!("  {}", token.bright_yellow().bold());
    println!();
    println!("{}", "Add this to the server environment:".bright_white());
    println!("  API_TOKEN={}", token);
    println!();
    println!("{}", "Then send it with every management request:".bright_white());
    println!(
        "  curl -H \"Authorization: Bearer {}\" http://localhost:3000/api/stats",
        token
    );

    Ok(())
}

/// Dispatches placement commands.
async fn handle_placement_action(action: PlacementAction, service: &PlacementService) -> Result<()> {
    match action {
        PlacementAction::List {
            advertiser,
            publisher,
            send,
            limit,
        } => {
            let filter = PlacementFilter {
                advertiser_id: advertiser,
                publisher_id: publisher,
                send_id: send,
            };
            list_placements(service, &filter, limit).await
        }
        PlacementAction::Show { id } => {
            let placement = service
                .get(&id)
                .await
                .map_err(|e| anyhow::anyhow!("{}", e))?;
            print_placement(service, &placement);
            Ok(())
        }
        PlacementAction::Create {
            advertiser,
            publisher,
            send,
            price,
            landing_url,
            yes,
        } => create_placement(service, advertiser, publisher, send, price, landing_url, yes).await,
    }
}

/// Lists placements as a table.
///
/// # Output Format
///
/// ```text
/// 📋 Placements
///
///   ID                      Advertiser       Publisher        CPC      Created           Fresh
///   ──────────────────────────────────────────────────────────────────────────────────────────
///   3kTMd9dWQ0qJcHnZbV1xYw  adv-42           pub-7            150      2025-06-02 09:00  yes
/// ```
async fn list_placements(
    service: &PlacementService,
    filter: &PlacementFilter,
    limit: i64,
) -> Result<()> {
    println!("{}", "📋 Placements".bright_blue().bold());
    println!();

    let (placements, total) = service
        .list(filter, 0, limit.max(1))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list placements: {}", e))?;

    if placements.is_empty() {
        println!("{}", "  No placements found".yellow());
        return Ok(());
    }

    println!(
        "  {:<23} {:<16} {:<16} {:<8} {:<17} {}",
        "ID".bright_white().bold(),
        "Advertiser".bright_white().bold(),
        "Publisher".bright_white().bold(),
        "CPC".bright_white().bold(),
        "Created".bright_white().bold(),
        "Fresh".bright_white().bold()
    );
    println!("  {}", "─".repeat(90).bright_black());

    for p in &placements {
        let fresh = if is_fresh(p.created_at) {
            "yes".green()
        } else {
            "no".red()
        };

        println!(
            "  {:<23} {:<16} {:<16} {:<8} {:<17} {}",
            p.id.cyan(),
            p.advertiser_id,
            p.publisher_id,
            p.price_cpc_cents,
            p.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            fresh
        );
    }

    println!();
    println!(
        "  Showing {} of {}",
        placements.len().to_string().bright_white().bold(),
        total.to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

fn print_placement(service: &PlacementService, p: &Placement) {
    println!("{}", "📌 Placement".bright_blue().bold());
    println!();
    println!("  ID:          {}", p.id.cyan());
    println!("  Advertiser:  {}", p.advertiser_id);
    println!("  Publisher:   {}", p.publisher_id);
    println!("  Send:        {}", p.send_id);
    println!("  CPC (cents): {}", p.price_cpc_cents);
    println!("  Landing URL: {}", p.landing_url);
    println!(
        "  Created:     {}",
        p.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!(
        "  Fresh:       {}",
        if is_fresh(p.created_at) {
            "yes".green()
        } else {
            "no (clicks are no longer billable)".red()
        }
    );
    println!();
    println!(
        "  Tracking link: {}",
        service.tracking_link(&p.id).bright_yellow()
    );
    println!();
}

/// Creates a placement, prompting for any value not given on the command line.
async fn create_placement(
    service: &PlacementService,
    advertiser: Option<String>,
    publisher: Option<String>,
    send: Option<String>,
    price: Option<i64>,
    landing_url: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "📌 Create Placement".bright_blue().bold());
    println!();

    let advertiser = prompt_if_missing(advertiser, "Advertiser id")?;
    let publisher = prompt_if_missing(publisher, "Publisher id")?;
    let send = prompt_if_missing(send, "Send id")?;
    let price = match price {
        Some(p) => p,
        None => Input::<i64>::new()
            .with_prompt("Price per click (cents)")
            .interact_text()?,
    };
    let landing_url = prompt_if_missing(landing_url, "Landing URL")?;

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this placement?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let placement = service
        .create(advertiser, publisher, send, price, landing_url)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create placement: {}", e))?;

    println!();
    println!("{}", "✅ Placement created".green().bold());
    println!();
    print_placement(service, &placement);

    Ok(())
}

fn prompt_if_missing(value: Option<String>, prompt: &str) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None => Ok(Input::new().with_prompt(prompt).interact_text()?),
    }
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let live: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM placements WHERE deleted_at IS NULL")
                    .fetch_one(pool)
                    .await
                    .unwrap_or(0);

            println!("  PostgreSQL:       {}", version.bright_white());
            println!(
                "  Live placements:  {}",
                live.to_string().bright_green().bold()
            );
            println!();
        }
    }

    Ok(())
}

/// Generates a cryptographically random token.
///
/// # Format
///
/// - Length: 48 characters
/// - Character set: A-Z, a-z, 0-9
/// - Entropy: ~286 bits
fn generate_token() -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    const TOKEN_LEN: usize = 48;

    let mut rng = rand::rng();

    (0..TOKEN_LEN)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}
