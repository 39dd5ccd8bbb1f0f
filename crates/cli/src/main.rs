//! Shopify Bridge CLI - every bridge operation from the command line.
//!
//! # Usage
//!
//! ```bash
//! # List the categories below a parent collection, in German
//! bridge-cli categories list --parent-id 42 --lang de
//!
//! # Fetch products by id
//! bridge-cli products by-ids 123 456
//!
//! # Create a content page from a JSON file
//! bridge-cli content create --body page.json
//!
//! # Resolve a storefront URL
//! bridge-cli lookup https://shop.example.com/de/products/red-shirt
//!
//! # Build the storefront URL of a product
//! bridge-cli storefront-url product 123 --lang de
//! ```
//!
//! Results are printed as JSON on stdout; logs go to stderr and honour
//! `RUST_LOG`. Configuration comes from the environment (see
//! [`shopify_bridge::BridgeConfig::from_env`]).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "bridge-cli")]
#[command(author, version, about = "Shopify content bridge CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Shopify custom collections as categories
    Categories {
        #[command(subcommand)]
        action: CategoriesAction,
    },
    /// Shopify pages as content
    Content {
        #[command(subcommand)]
        action: ContentAction,
    },
    /// Shopify products
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Resolve a storefront URL to `{id, type, lang}`
    Lookup {
        /// Absolute or relative storefront URL
        url: String,
    },
    /// Build the storefront URL of a resource
    StorefrontUrl {
        /// Resource type (`product`, `category`, `content`)
        #[arg(value_name = "TYPE")]
        kind: String,

        /// Resource id
        id: String,

        /// Language of the URL
        #[arg(short, long)]
        lang: Option<String>,
    },
}

#[derive(Subcommand)]
enum CategoriesAction {
    /// List one page of categories
    List {
        /// Only categories below this parent, flattened in pre-order
        #[arg(long)]
        parent_id: Option<String>,

        /// Title keyword
        #[arg(short, long)]
        keyword: Option<String>,

        #[arg(short, long)]
        lang: Option<String>,

        /// 1-based page number
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// Fetch categories by id
    ByIds {
        #[arg(required = true)]
        ids: Vec<String>,

        #[arg(short, long)]
        lang: Option<String>,
    },
    /// Print the full category tree
    Tree {
        /// Parent id, or `root`
        #[arg(long, default_value = "root")]
        parent: String,

        #[arg(short, long)]
        lang: Option<String>,
    },
}

#[derive(Subcommand)]
enum ContentAction {
    /// List one page of content pages
    List {
        #[arg(short, long)]
        keyword: Option<String>,

        #[arg(short, long)]
        lang: Option<String>,

        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// Fetch content pages by id
    ByIds {
        #[arg(required = true)]
        ids: Vec<String>,

        #[arg(short, long)]
        lang: Option<String>,
    },
    /// Create a content page
    Create {
        /// JSON page file (stdin when omitted)
        #[arg(short, long)]
        body: Option<PathBuf>,
    },
    /// Update a content page
    Update {
        id: String,

        /// JSON page file (stdin when omitted)
        #[arg(short, long)]
        body: Option<PathBuf>,
    },
    /// Delete a content page
    Delete { id: String },
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List one page of products
    List {
        /// Only products of this category
        #[arg(long)]
        category_id: Option<String>,

        #[arg(short, long)]
        keyword: Option<String>,

        #[arg(short, long)]
        lang: Option<String>,

        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// Fetch products by id
    ByIds {
        #[arg(required = true)]
        ids: Vec<String>,

        #[arg(short, long)]
        lang: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // Logs on stderr, JSON results on stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), commands::CommandError> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    let bridge = commands::connect()?;

    match cli.command {
        Commands::Categories { action } => match action {
            CategoriesAction::List {
                parent_id,
                keyword,
                lang,
                page,
            } => {
                commands::categories::list(
                    &bridge,
                    parent_id.as_deref(),
                    keyword.as_deref(),
                    lang.as_deref(),
                    page,
                )
                .await?;
            }
            CategoriesAction::ByIds { ids, lang } => {
                commands::categories::by_ids(&bridge, &ids, lang.as_deref()).await?;
            }
            CategoriesAction::Tree { parent, lang } => {
                commands::categories::tree(&bridge, &parent, lang.as_deref()).await?;
            }
        },
        Commands::Content { action } => match action {
            ContentAction::List {
                keyword,
                lang,
                page,
            } => {
                commands::content::list(&bridge, keyword.as_deref(), lang.as_deref(), page)
                    .await?;
            }
            ContentAction::ByIds { ids, lang } => {
                commands::content::by_ids(&bridge, &ids, lang.as_deref()).await?;
            }
            ContentAction::Create { body } => {
                commands::content::create(&bridge, body.as_deref()).await?;
            }
            ContentAction::Update { id, body } => {
                commands::content::update(&bridge, &id, body.as_deref()).await?;
            }
            ContentAction::Delete { id } => commands::content::delete(&bridge, &id).await?,
        },
        Commands::Products { action } => match action {
            ProductsAction::List {
                category_id,
                keyword,
                lang,
                page,
            } => {
                commands::products::list(
                    &bridge,
                    category_id.as_deref(),
                    keyword.as_deref(),
                    lang.as_deref(),
                    page,
                )
                .await?;
            }
            ProductsAction::ByIds { ids, lang } => {
                commands::products::by_ids(&bridge, &ids, lang.as_deref()).await?;
            }
        },
        Commands::Lookup { url } => commands::mapping::lookup(&bridge, &url).await?,
        Commands::StorefrontUrl { kind, id, lang } => {
            commands::mapping::storefront_url(&bridge, &kind, &id, lang.as_deref()).await?;
        }
    }
    Ok(())
}
