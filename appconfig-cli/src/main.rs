//! AppConfig CLI
//!
//! Command-line interface for the application configuration cache.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use appconfig_api::{ApiConfig, ApiServer, StoreFailurePolicy};
use appconfig_cache::{CacheSettings, ConfigCache};
use appconfig_core::constants::{ENV_REFRESH_DURATION, ENV_STORE_FAILURE_POLICY, ENV_STORE_PATH};
use appconfig_core::types::RequestContext;
use appconfig_store::FileStore;

/// AppConfig - TTL-refreshed application configuration cache
#[derive(Parser)]
#[command(name = "appconfig")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the API server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3001")]
        port: u16,
        /// Bind address
        #[arg(short, long, default_value = "0.0.0.0")]
        bind: String,
        /// JSON config store (empty in-memory store if omitted)
        #[arg(short, long, env = ENV_STORE_PATH)]
        store: Option<PathBuf>,
        /// Refresh interval, e.g. "30s" or "2m"
        #[arg(long, env = ENV_REFRESH_DURATION)]
        refresh: Option<String>,
        /// What to do when the store cannot be read: shutdown or serve-stale
        #[arg(long, env = ENV_STORE_FAILURE_POLICY, default_value = "shutdown")]
        on_store_failure: StoreFailurePolicy,
    },

    /// Look up the configuration for one app package
    Lookup {
        /// App package name, e.g. com.example.app
        package: String,
        /// JSON config store
        #[arg(short, long, env = ENV_STORE_PATH)]
        store: PathBuf,
    },

    /// List every configured app package
    List {
        /// JSON config store
        #[arg(short, long, env = ENV_STORE_PATH)]
        store: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "appconfig=debug,info"
    } else {
        "appconfig=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Serve {
            port,
            bind,
            store,
            refresh,
            on_store_failure,
        } => cmd_serve(port, &bind, store, refresh.as_deref(), on_store_failure).await,
        Commands::Lookup { package, store } => cmd_lookup(&package, &store).await,
        Commands::List { store } => cmd_list(&store).await,
    }
}

fn file_cache(path: &Path) -> ConfigCache {
    ConfigCache::with_settings(Arc::new(FileStore::new(path)), CacheSettings::default())
}

/// Run the API server
async fn cmd_serve(
    port: u16,
    bind: &str,
    store_path: Option<PathBuf>,
    refresh: Option<&str>,
    failure_policy: StoreFailurePolicy,
) -> Result<()> {
    println!("{}", "🚀 Starting AppConfig API server...".cyan().bold());
    println!("   {} http://{}:{}", "Listening on:".green(), bind, port);
    println!("   {} http://{}:{}/health", "Health check:".dimmed(), bind, port);
    match &store_path {
        Some(path) => println!("   {} {}", "Config store:".dimmed(), path.display()),
        None => println!("   {} {}", "Config store:".dimmed(), "in-memory (empty)".yellow()),
    }
    println!("   {} {}", "On store failure:".dimmed(), failure_policy);
    println!("\n   Press Ctrl+C to stop.\n");

    let config = ApiConfig {
        store_path,
        failure_policy,
        cache: CacheSettings::from_override(refresh),
    };
    let server = ApiServer::new(config);

    let addr: SocketAddr = format!("{}:{}", bind, port).parse()?;
    server.run(addr).await.context("API server stopped")?;

    Ok(())
}

/// Look up one app package
async fn cmd_lookup(package: &str, store_path: &Path) -> Result<()> {
    println!("{} {}", "🔍 Looking up:".cyan().bold(), package);

    let cache = file_cache(store_path);
    let config = cache
        .app_pkg_config(&RequestContext::new(), package)
        .await
        .with_context(|| format!("Failed to load configs from {}", store_path.display()))?;

    let Some(config) = config else {
        bail!("no configuration for app package '{}'", package);
    };

    println!("\n{}", "✅ Configuration:".green().bold());
    println!("{}", serde_json::to_string_pretty(config.as_ref())?);

    Ok(())
}

/// List configured app packages
async fn cmd_list(store_path: &Path) -> Result<()> {
    let cache = file_cache(store_path);
    cache
        .refresh(&RequestContext::new())
        .await
        .with_context(|| format!("Failed to load configs from {}", store_path.display()))?;

    let snapshot = cache.snapshot();
    println!(
        "{} {} app package(s)",
        "📦 Configured:".cyan().bold(),
        snapshot.len()
    );
    for name in snapshot.package_names() {
        println!("   {}", name);
    }

    Ok(())
}
