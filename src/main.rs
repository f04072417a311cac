mod catalog;
mod commands;
mod config;
mod entities;
mod migrator;
mod model;
mod render;
mod route;
mod status;
mod util;
mod version;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use catalog::RefreshPolicy;
use route::Route;
use status::Status;

/// Browse the PolyTrack mod catalog from the terminal
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Args {
    /// Catalog index to read instead of the configured one
    #[arg(long, global = true)]
    modlist_url: Option<String>,

    /// Path to the config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Only use the local cache, never fetch
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Lists catalog mods
    List {
        /// Only show mods carrying one of the given tags
        #[arg(short, long, value_delimiter = ',')]
        tags: Option<Vec<String>>,

        /// Show detailed information
        #[arg(short, long)]
        details: bool,
    },
    /// Shows the page of one mod
    Show {
        /// Catalog id of the mod
        mod_id: String,

        /// Expand every version's changelog
        #[arg(short, long)]
        changelog: bool,
    },
    /// Opens a page route such as `#/` or `#/mod/<id>`
    Open {
        route: String,

        /// Expand every version's changelog
        #[arg(short, long)]
        changelog: bool,
    },
    /// Navigates the catalog interactively
    Browse,
    /// Fetches the catalog again and updates the cached mod list
    Refresh {
        /// Drop cached responses first so every file is fetched again
        #[arg(short, long)]
        force: bool,
    },
    /// Shows or clears the local caches
    Cache {
        #[arg(short, long)]
        clear: bool,
    },
}

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &Args) -> Result<config::Config> {
    let path = match &args.config {
        Some(path) => path.clone(),
        None => config::default_config_path()?,
    };
    let mut config = config::load_or_init(&path)?;
    if let Some(modlist_url) = &args.modlist_url {
        config.modlist_url = modlist_url.clone();
        config.validate()?;
    }
    Ok(config)
}

async fn run(args: Args) -> Result<()> {
    let config = load_config(&args)?;
    let policy = if args.offline {
        RefreshPolicy::CacheOnly
    } else {
        RefreshPolicy::Background
    };

    if let Command::Cache { clear } = args.command {
        let db = util::open_database().await?;
        return commands::cache(&db, clear).await;
    }

    let session = commands::Session::open(config, policy).await?;
    match args.command {
        Command::List { tags, details } => commands::list(&session, tags, details).await,
        Command::Show { mod_id, changelog } => commands::show(&session, mod_id, changelog).await,
        Command::Open { route, changelog } => {
            commands::open(&session, Route::parse(&route), changelog).await
        }
        Command::Browse => commands::browse(&session).await,
        Command::Refresh { force } => {
            if args.offline {
                eprintln!("Refresh cannot be combined with --offline.");
                std::process::exit(1);
            }
            commands::refresh(&session, force).await
        }
        Command::Cache { .. } => Ok(()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    info!("Starting polycatalog version {}", env!("CARGO_PKG_VERSION"));
    let args = Args::parse();
    let result = run(args).await;
    if let Err(e) = &result {
        error!("{}", e);
        eprintln!("{}", render::status_line(&Status::Unexpected));
    }
    result
}
