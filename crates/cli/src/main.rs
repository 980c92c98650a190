//! Cartwheel CLI - Inspect and change the saved cart.
//!
//! # Usage
//!
//! ```bash
//! # Show the saved cart
//! cart show
//!
//! # Add one unit of product 1
//! cart add 1
//!
//! # Set product 1 to 3 units
//! cart update 1 3
//!
//! # Remove product 1
//! cart remove 1
//! ```
//!
//! Configuration comes from the environment (see `cartwheel_cart::config`).
//! Rejected operations are reported on stderr and exit with status 1.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;

use cartwheel_cart::CartConfig;
use cartwheel_core::ProductId;
use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "cart")]
#[command(author, version, about = "Cartwheel cart tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the saved cart
    Show,
    /// Add one unit of a product
    Add {
        /// Product id
        product_id: ProductId,
    },
    /// Remove a product from the cart
    Remove {
        /// Product id
        product_id: ProductId,
    },
    /// Set the amount of a product already in the cart
    Update {
        /// Product id
        product_id: ProductId,

        /// New amount (must be at least 1)
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &CartConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

/// Initialize tracing with `EnvFilter` and Sentry integration.
///
/// Logs go to stderr so cart output on stdout stays clean.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cartwheel_cart=info,cartwheel_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Configuration is needed before tracing so Sentry can be initialized first
    let config = CartConfig::from_env();
    let _sentry_guard = config.as_ref().ok().and_then(init_sentry);
    init_tracing();

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    match run(cli, &config).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("Command failed: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: &CartConfig) -> Result<ExitCode, commands::CliError> {
    let store = commands::open_store(config)?;

    let outcome = match cli.command {
        Commands::Show => None,
        Commands::Add { product_id } => Some(store.add_product(product_id).await),
        Commands::Remove { product_id } => Some(store.remove_product(product_id).await),
        Commands::Update { product_id, amount } => {
            Some(store.update_product_amount(product_id, amount).await)
        }
    };

    commands::print_cart(&store.cart());

    Ok(match outcome {
        Some(outcome) if !outcome.is_applied() => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    })
}
