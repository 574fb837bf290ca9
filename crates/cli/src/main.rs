//! RocketShoes CLI - Drive the shopping cart from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Show the persisted cart
//! rs-cli cart show
//!
//! # Add one unit of product 42
//! rs-cli cart add 42
//!
//! # Set product 42 to three units
//! rs-cli cart update 42 3
//!
//! # Remove product 42
//! rs-cli cart remove 42
//!
//! # Look up a product and its stock
//! rs-cli product show 42
//! ```
//!
//! # Commands
//!
//! - `cart` - Show and change the cart
//! - `product` - Catalog lookups
//!
//! Configuration comes from the environment (see `rocketshoes_storefront::config`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use rocketshoes_core::ProductId;
use rocketshoes_storefront::StorefrontConfig;

use crate::commands::cart::CartCommandError;

mod commands;

#[derive(Parser)]
#[command(name = "rs-cli")]
#[command(author, version, about = "RocketShoes cart CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show and change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Look up catalog products
    Product {
        #[command(subcommand)]
        action: ProductAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Print the cart with subtotals and total
    Show,
    /// Add one unit of a product
    Add {
        /// Catalog product ID
        product_id: ProductId,
    },
    /// Remove a product from the cart
    Remove {
        /// Catalog product ID
        product_id: ProductId,
    },
    /// Set the quantity of a product already in the cart
    Update {
        /// Catalog product ID
        product_id: ProductId,

        /// New quantity (at least 1)
        amount: u32,
    },
}

#[derive(Subcommand)]
enum ProductAction {
    /// Print a product and its current stock
    Show {
        /// Catalog product ID
        product_id: ProductId,
    },
}

#[tokio::main]
async fn main() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "rocketshoes_storefront=info,rs_cli=info".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        let reported = e
            .downcast_ref::<CartCommandError>()
            .is_some_and(CartCommandError::is_reported);
        if !reported {
            tracing::error!("Command failed: {e}");
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = StorefrontConfig::from_env()?;

    match cli.command {
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&config)?,
            CartAction::Add { product_id } => commands::cart::add(&config, product_id).await?,
            CartAction::Remove { product_id } => commands::cart::remove(&config, product_id)?,
            CartAction::Update { product_id, amount } => {
                commands::cart::update(&config, product_id, amount).await?;
            }
        },
        Commands::Product { action } => match action {
            ProductAction::Show { product_id } => {
                commands::product::show(&config, product_id).await?;
            }
        },
    }
    Ok(())
}
