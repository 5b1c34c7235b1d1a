//! weekboard-server: serves the task store over HTTP.
//!
//! Configuration is layered: built-in defaults, then `--config <file>`
//! (TOML), then `WEEKBOARD_*` / `PORT` environment variables, then the
//! flags below.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use weekboard::config::{normalize_base_path, ServerConfig};
use weekboard::server::TaskServer;
use weekboard_tasks::{InMemoryTaskStore, TaskStore};

/// Weekly task board server
#[derive(Parser, Debug)]
#[command(name = "weekboard-server")]
#[command(about = "Serve the weekboard task store over HTTP", long_about = None)]
#[command(version)]
struct Cli {
    /// TOML config file
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Address to listen on (overrides config and WEEKBOARD_BIND)
    #[arg(long)]
    bind: Option<std::net::SocketAddr>,

    /// Port to listen on, keeping the bind host
    #[arg(long, short)]
    port: Option<u16>,

    /// Path prefix for every route, e.g. /make-server-e1ba9efb
    #[arg(long)]
    base_path: Option<String>,

    /// Bearer token required on /tasks routes
    #[arg(long)]
    token: Option<String>,

    /// Redis URL; the in-memory store is used when unset
    #[arg(long)]
    redis_url: Option<String>,

    /// Maximum title length in characters
    #[arg(long)]
    max_title_length: Option<usize>,

    /// Attempts per update before reporting a conflict
    #[arg(long)]
    max_update_retries: Option<usize>,
}

impl Cli {
    fn into_config(self) -> Result<ServerConfig> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::load(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => ServerConfig::default(),
        };
        config.apply_env()?;

        if let Some(bind) = self.bind {
            config.bind = bind;
        }
        if let Some(port) = self.port {
            config.bind.set_port(port);
        }
        if let Some(base_path) = self.base_path {
            config.base_path = normalize_base_path(&base_path);
        }
        if let Some(token) = self.token {
            config.auth_token = Some(token).filter(|t| !t.is_empty());
        }
        if let Some(url) = self.redis_url {
            config.store.redis_url = Some(url);
        }
        if let Some(max) = self.max_title_length {
            config.store.limits.max_title_length = Some(max);
        }
        if let Some(retries) = self.max_update_retries {
            config.store.limits.max_update_retries = retries;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    weekboard::logging::init("info");

    let config = Cli::parse().into_config()?;
    let store = build_store(&config).await?;

    if config.auth_token.is_none() {
        info!("No auth token configured; /tasks routes are open");
    }

    TaskServer::new(config, store)
        .serve(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await
}

#[cfg(feature = "redis")]
async fn build_store(config: &ServerConfig) -> Result<Arc<dyn TaskStore>> {
    use weekboard_tasks::store::redis::RedisBackend;
    use weekboard_tasks::GenericTaskStore;

    let limits = config.store.limits.clone();
    match &config.store.redis_url {
        Some(url) => {
            let backend = RedisBackend::new(url)
                .await
                .with_context(|| format!("connecting to {url}"))?;
            info!("Using Redis task store");
            Ok(Arc::new(GenericTaskStore::new(backend).with_config(limits)))
        },
        None => {
            info!("Using in-memory task store");
            Ok(Arc::new(InMemoryTaskStore::new().with_config(limits)))
        },
    }
}

#[cfg(not(feature = "redis"))]
async fn build_store(config: &ServerConfig) -> Result<Arc<dyn TaskStore>> {
    if config.store.redis_url.is_some() {
        anyhow::bail!(
            "a Redis URL was given but weekboard-server was built without the `redis` feature"
        );
    }
    info!("Using in-memory task store");
    Ok(Arc::new(
        InMemoryTaskStore::new().with_config(config.store.limits.clone()),
    ))
}
