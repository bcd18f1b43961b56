//! Pizzeria CLI - storefront and admin console in the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Log in (the session is kept between runs)
//! pizza login -e ana@example.com -p secret
//!
//! # Browse the catalog and your own orders
//! pizza list products
//! pizza list orders --mine
//!
//! # Order two units of product 3 and one of product 5
//! pizza checkout --item 3:2 --item 5
//!
//! # Admin dashboard counts
//! pizza dashboard
//! ```
//!
//! # Commands
//!
//! - `login` / `logout` / `whoami` / `register` - Session management
//! - `list` / `get` / `delete` - Resource access
//! - `items` - Line items of one order
//! - `checkout` - Place an order from product ids
//! - `route` - Check who may open a screen
//! - `dashboard` - Admin record counts

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use pizzeria_client::config::ClientConfig;
use pizzeria_client::navigation::TracingNavigator;
use pizzeria_client::session::FileStorage;
use pizzeria_client::{ApiClient, SessionStore};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::checkout::CartItemArg;
use commands::resources::ResourceKind;

#[derive(Parser)]
#[command(name = "pizza")]
#[command(author, version, about = "Pizzeria storefront and admin console")]
struct Cli {
    /// Base URL of the REST API (overrides `PIZZERIA_API_URL`)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Session file (overrides `PIZZERIA_SESSION_FILE`)
    #[arg(long, global = true)]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and keep the session
    Login {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long, env = "PIZZERIA_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// End the session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Create an account
    Register {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long, env = "PIZZERIA_PASSWORD", hide_env_values = true)]
        password: String,

        /// Phone number
        #[arg(long)]
        phone: Option<String>,

        /// Delivery address
        #[arg(long)]
        address: Option<String>,
    },
    /// List a resource
    List {
        resource: ResourceKind,

        /// Only records of the logged-in user (orders, reservations, messages)
        #[arg(long)]
        mine: bool,

        /// Case-insensitive name/description filter (products only)
        #[arg(long)]
        filter: Option<String>,
    },
    /// Show one record
    Get {
        resource: ResourceKind,

        /// Record id (`<order>/<product>` for order items)
        id: String,
    },
    /// Delete one record
    Delete {
        resource: ResourceKind,

        /// Record id (`<order>/<product>` for order items)
        id: String,
    },
    /// List the line items of an order
    Items {
        /// Order id
        order_id: String,
    },
    /// Place an order
    Checkout {
        /// `<product_id>[:<quantity>]`, repeatable
        #[arg(short, long = "item", required = true)]
        items: Vec<CartItemArg>,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Check whether the current session may open a screen
    Route {
        /// Path such as `/admin/usuarios`
        path: String,
    },
    /// Admin dashboard counts
    Dashboard,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ClientConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
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
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN | tracing::Level::INFO => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = load_config(&cli);

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = config.as_ref().ok().and_then(init_sentry);

    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "pizzeria_client=info,pizzeria_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let result = match config {
        Ok(config) => run(cli.command, &config).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn load_config(cli: &Cli) -> Result<ClientConfig, pizzeria_client::config::ConfigError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(api_url) = &cli.api_url {
        config.api_url = ClientConfig::with_api_url(api_url, config.session_file.clone())?.api_url;
    }
    if let Some(session_file) = &cli.session_file {
        config.session_file.clone_from(session_file);
    }
    Ok(config)
}

async fn run(command: Commands, config: &ClientConfig) -> Result<(), commands::CliError> {
    let session = SessionStore::restore(Arc::new(FileStorage::new(&config.session_file)));
    let api = ApiClient::new(config, session, Arc::new(TracingNavigator));

    match command {
        Commands::Login { email, password } => {
            commands::session::login(&api, &email, password).await?;
        }
        Commands::Logout => commands::session::logout(&api),
        Commands::Whoami => commands::session::whoami(&api)?,
        Commands::Register {
            name,
            email,
            password,
            phone,
            address,
        } => {
            let form = commands::session::RegisterForm {
                name,
                email,
                password,
                phone,
                address,
            };
            commands::session::register(&api, form).await?;
        }
        Commands::List {
            resource,
            mine,
            filter,
        } => commands::resources::list(&api, resource, mine, filter.as_deref()).await?,
        Commands::Get { resource, id } => commands::resources::get(&api, resource, &id).await?,
        Commands::Delete { resource, id } => {
            commands::resources::delete(&api, resource, &id).await?;
        }
        Commands::Items { order_id } => commands::resources::items(&api, &order_id).await?,
        Commands::Checkout { items, yes } => commands::checkout::run(&api, &items, yes).await?,
        Commands::Route { path } => commands::navigation::route(&api, &path),
        Commands::Dashboard => commands::navigation::dashboard(&api).await?,
    }
    Ok(())
}
