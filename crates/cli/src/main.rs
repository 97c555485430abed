//! Dendy Food CLI - catalog management tools.
//!
//! Works directly on the catalog JSON document through the same store the
//! storefront uses. Writes made while the server is running are not
//! coordinated with it; the last full-document write wins.
//!
//! # Usage
//!
//! ```bash
//! # List products
//! dendy-cli products list
//!
//! # Add a product
//! dendy-cli products add --name-uz "Chizburger" --name-ru "Чизбургер" \
//!     --price 30000 --category Burger --discount 10
//!
//! # Delete a product
//! dendy-cli products delete 1712345678901
//!
//! # Load products from a YAML file
//! dendy-cli seed data/menu.yaml
//! ```
//!
//! # Commands
//!
//! - `products` - List, add and delete products
//! - `seed` - Bulk-create products from YAML (all entries validated first)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use dendy_food_storefront::config::DEFAULT_CATALOG_PATH;
use dendy_food_storefront::db::{CatalogStore, JsonFileBackend};

mod commands;

#[derive(Parser)]
#[command(name = "dendy-cli")]
#[command(author, version, about = "Dendy Food CLI tools")]
struct Cli {
    /// Catalog JSON document
    #[arg(long, global = true, env = "CATALOG_PATH", default_value = DEFAULT_CATALOG_PATH)]
    catalog: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage catalog products
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Create products from a YAML list
    Seed {
        /// YAML file containing a list of products
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum ProductAction {
    /// List all products
    List,
    /// Add a product
    Add(commands::products::AddArgs),
    /// Delete a product by id
    Delete {
        /// Product id
        id: String,
    },
}

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing; command output is logged at info level
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let store = CatalogStore::new(JsonFileBackend::new(&cli.catalog));

    match cli.command {
        Commands::Products { action } => match action {
            ProductAction::List => commands::products::list(&store).await?,
            ProductAction::Add(args) => commands::products::add(&store, args).await?,
            ProductAction::Delete { id } => commands::products::delete(&store, &id).await?,
        },
        Commands::Seed { file } => commands::seed::from_file(&store, &file).await?,
    }
    Ok(())
}
