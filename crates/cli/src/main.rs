//! The Pickle Pot CLI - local cart management and backend sync.
//!
//! # Usage
//!
//! ```bash
//! # Add two jars to the cart file
//! pp-cli add --id 1-6oz --name "Mango Pickle" --price '$12.99' --quantity 2
//!
//! # Show the cart, then the checkout breakdown with a promo code
//! pp-cli show
//! pp-cli summary --promo WELCOME10
//!
//! # Replace the cart with the customer's backend cart
//! PP_AUTH_TOKEN=... pp-cli sync --backend-url https://api.example.com/
//! ```
//!
//! # Commands
//!
//! - `show` / `add` / `update` / `remove` / `clear` - Edit the cart file
//! - `summary` - Checkout breakdown
//! - `sync` - Pull the backend cart (keeps the local cart on failure)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use secrecy::SecretString;

mod commands;
mod store;

#[derive(Parser)]
#[command(name = "pp-cli")]
#[command(author, version, about = "The Pickle Pot CLI tools")]
struct Cli {
    /// Cart file to read and write
    #[arg(long, global = true, env = "PP_CART_FILE", default_value = "cart.json")]
    cart_file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the cart
    Show,
    /// Add an item (merges with an existing line of the same id)
    Add {
        /// Line item id, e.g. "1-6oz"
        #[arg(long, required_unless_present = "product_id", conflicts_with = "product_id")]
        id: Option<String>,

        /// Product id; the line id is derived from it, the size and the spice
        #[arg(long, requires = "size")]
        product_id: Option<String>,

        /// Spice level (with --product-id)
        #[arg(long, requires = "product_id")]
        spice: Option<String>,

        /// Display name
        #[arg(long)]
        name: String,

        /// Unit price, e.g. "$12.99"
        #[arg(long)]
        price: String,

        /// How many to add (clamped to 1-10)
        #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
        quantity: i64,

        /// Jar or pouch size, e.g. "6oz"
        #[arg(long)]
        size: Option<String>,

        /// Category name (anything mentioning "pickle" is a pickle)
        #[arg(long)]
        category: Option<String>,

        /// Pre-sale price shown struck through
        #[arg(long)]
        original_price: Option<String>,
    },
    /// Set an item's quantity (0 or less removes it)
    Update {
        id: String,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove an item
    Remove { id: String },
    /// Empty the cart
    Clear,
    /// Show the checkout breakdown
    Summary {
        /// Promo code (PICKLE50, WELCOME10, FREESHIP)
        #[arg(long)]
        promo: Option<String>,
    },
    /// Replace the cart with the customer's backend cart
    Sync {
        /// Commerce backend base URL
        #[arg(long, env = "STOREFRONT_BACKEND_URL")]
        backend_url: String,

        /// Customer bearer token
        #[arg(long, env = "PP_AUTH_TOKEN", hide_env_values = true)]
        token: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file if present (ignore errors if not found)
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let path = cli.cart_file;
    match cli.command {
        Commands::Show => commands::cart::show(&path)?,
        Commands::Add {
            id,
            product_id,
            spice,
            name,
            price,
            quantity,
            size,
            category,
            original_price,
        } => {
            let input = commands::cart::AddInput {
                id,
                product_id,
                spice,
                name,
                price,
                quantity,
                size,
                category,
                original_price,
            };
            commands::cart::add(&path, input)?;
        }
        Commands::Update { id, quantity } => commands::cart::update(&path, &id, quantity)?,
        Commands::Remove { id } => commands::cart::remove(&path, &id)?,
        Commands::Clear => commands::cart::clear(&path)?,
        Commands::Summary { promo } => commands::cart::summary(&path, promo.as_deref())?,
        Commands::Sync { backend_url, token } => {
            let token = token.filter(|t| !t.is_empty()).map(SecretString::from);
            commands::sync::run(&path, &backend_url, token.as_ref()).await?;
        }
    }
    Ok(())
}
