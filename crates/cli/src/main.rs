//! Shopfacet CLI - Filter encoding and catalog browsing tools.
//!
//! # Usage
//!
//! ```bash
//! # Print the shop endpoint query for a selection
//! facet-cli query --brand Acme --rating 4 --sort price-asc
//!
//! # Same selection in the category endpoint's dialect
//! facet-cli --endpoint category:12 query --brand Acme --sale
//!
//! # Decode a shared page URL into a selection
//! facet-cli url "https://shop.example.com/shop/?brands[]=Acme&prices=highest"
//!
//! # Fetch facet metadata for a selection
//! facet-cli metadata --color red
//!
//! # Load three pages of products, the way infinite scroll would
//! facet-cli products --brand Acme --pages 3
//!
//! # Show or clear the persisted selection
//! facet-cli state show
//! facet-cli state clear
//! ```
//!
//! # Commands
//!
//! - `query` - Encode a selection as endpoint query parameters
//! - `url` - Decode a page URL into a selection
//! - `metadata` - Fetch facet options, counts and price bounds
//! - `products` - Load product pages through the page controller
//! - `state` - Inspect the persisted selection
//!
//! # Environment Variables
//!
//! - `SENTRY_DSN` - Sentry project DSN (optional)
//! - `SHOPFACET_LOG_FORMAT` - `json` for structured logs on stderr
//! - `RUST_LOG` - Log filter (default: info for Shopfacet crates)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use shopfacet_client::EndpointFamily;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::{CommandError, FilterArgs};

#[derive(Parser)]
#[command(name = "facet-cli")]
#[command(author, version, about = "Shopfacet CLI tools")]
struct Cli {
    /// Endpoint family: `shop` or `category:<id>` (default: `SHOPFACET_ENDPOINT`)
    #[arg(long, global = true)]
    endpoint: Option<EndpointFamily>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a selection as endpoint query parameters
    Query {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Decode a page URL into a selection
    Url {
        /// Page URL carrying filter parameters
        url: String,
    },
    /// Fetch facet options, counts and price bounds
    Metadata {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Load product pages through the page controller
    Products {
        #[command(flatten)]
        filters: FilterArgs,

        /// Pages to load, continuing like infinite scroll
        #[arg(long, default_value_t = 1)]
        pages: u32,

        /// Jump straight to this page instead of starting at page 1
        #[arg(long)]
        page: Option<u32>,

        /// Products shown per page (shop endpoint only)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        display: Option<u32>,

        /// Save the selection to the storage file
        #[arg(long)]
        persist: bool,
    },
    /// Inspect the persisted selection
    State {
        #[command(subcommand)]
        action: StateAction,
    },
}

#[derive(Subcommand)]
enum StateAction {
    /// Print the saved selection
    Show,
    /// Forget the saved selection
    Clear,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry() -> Option<sentry::ClientInitGuard> {
    let dsn = std::env::var("SENTRY_DSN").ok().filter(|v| !v.is_empty())?;

    let guard = sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
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

#[tokio::main]
async fn main() {
    // Load .env before reading SENTRY_DSN (ignore errors if not found)
    let _ = dotenvy::dotenv();

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry();

    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shopfacet_client=info,shopfacet_cli=info".into());

    // JSON logs for log shippers, text for terminals; stdout stays for command output
    let is_json = std::env::var("SHOPFACET_LOG_FORMAT").is_ok_and(|v| v == "json");
    let json_layer = is_json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer =
        (!is_json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CommandError> {
    let endpoint = cli.endpoint;
    match cli.command {
        Commands::Query { filters } => commands::query::encode(&filters, endpoint)?,
        Commands::Url { url } => commands::url::decode(&url, endpoint)?,
        Commands::Metadata { filters } => commands::metadata::fetch(&filters, endpoint).await?,
        Commands::Products {
            filters,
            pages,
            page,
            display,
            persist,
        } => {
            let options = commands::products::BrowseOptions {
                pages,
                page,
                display,
                persist,
            };
            commands::products::browse(&filters, endpoint, options).await?;
        }
        Commands::State { action } => match action {
            StateAction::Show => commands::state::show()?,
            StateAction::Clear => commands::state::clear()?,
        },
    }
    Ok(())
}
