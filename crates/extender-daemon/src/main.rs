//! scheduler-extender daemon
//!
//! Serves the image locality priority to the cluster scheduler over HTTP.

use anyhow::Context;
use clap::Parser;
use extender_api::create_router;
use extender_core::ExtenderConfig;
use extender_scheduler::PriorityRegistry;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// scheduler-extender - image locality priority extender for the cluster scheduler
#[derive(Parser, Debug)]
#[command(name = "scheduler-extender")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// The ip:port address the extender binds to; without an ip it binds all interfaces
    #[arg(long)]
    http_addr: Option<String>,

    /// The api prefix path, e.g. /scheduler_extension
    #[arg(long)]
    api_prefix: Option<String>,

    /// The priorities prefix path, e.g. /a_new_priorities
    #[arg(long)]
    priorities_prefix: Option<String>,

    /// Upper bound on handling one request, in seconds
    #[arg(long)]
    request_timeout_secs: Option<u64>,

    /// Log level (overridden by RUST_LOG)
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    /// Defaults, then the config file, then command-line flags
    fn resolve_config(&self) -> anyhow::Result<ExtenderConfig> {
        let mut config = match &self.config {
            Some(path) => ExtenderConfig::from_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => ExtenderConfig::default(),
        };

        if let Some(addr) = &self.http_addr {
            config.http_addr = addr.clone();
        }
        if let Some(prefix) = &self.api_prefix {
            config.api_prefix = prefix.clone();
        }
        if let Some(prefix) = &self.priorities_prefix {
            config.priorities_prefix = prefix.clone();
        }
        if let Some(secs) = self.request_timeout_secs {
            config.request_timeout_secs = secs;
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        Ok(config)
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = args.resolve_config()?;

    init_logging(&config.logging.level);
    let config = config.normalized();

    info!("Starting scheduler-extender v{}", env!("CARGO_PKG_VERSION"));

    let registry = Arc::new(PriorityRegistry::with_defaults()?);
    let router = create_router(&config, registry);

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;

    info!(address = %addr, "scheduler extender http server started");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}
