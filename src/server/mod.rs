//! HTTP task store server.
//!
//! Routes (under the configured base path):
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | GET | `/health` | [`handlers::health`] |
//! | GET | `/tasks` | [`handlers::list_tasks`] |
//! | POST | `/tasks` | [`handlers::create_task`] |
//! | PUT | `/tasks/{id}` | [`handlers::update_task`] |
//! | DELETE | `/tasks/{id}` | [`handlers::delete_task`] |
//!
//! `/tasks` routes sit behind [`auth::require_bearer`]; `/health` is open.

pub mod auth;
pub mod handlers;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::routing::{get, put};
use axum::{middleware, Router};
use http::header::{AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE};
use http::Method;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use weekboard_tasks::TaskStore;

use crate::config::{normalize_base_path, ServerConfig};

/// Shared application state
pub struct AppState {
    /// The task store every handler delegates to.
    pub store: Arc<dyn TaskStore>,
    /// Bearer token required on `/tasks` routes.
    pub auth_token: Option<String>,
}

/// Task store HTTP server
pub struct TaskServer {
    config: ServerConfig,
    store: Arc<dyn TaskStore>,
}

impl TaskServer {
    /// Creates a server over `store`.
    pub fn new(config: ServerConfig, store: Arc<dyn TaskStore>) -> Self {
        Self { config, store }
    }

    /// Builds the router with CORS, request tracing, and auth applied.
    pub fn router(&self) -> Router {
        let state = Arc::new(AppState {
            store: Arc::clone(&self.store),
            auth_token: self.config.auth_token.clone(),
        });

        let tasks = Router::new()
            .route(
                "/tasks",
                get(handlers::list_tasks).post(handlers::create_task),
            )
            .route(
                "/tasks/{id}",
                put(handlers::update_task).delete(handlers::delete_task),
            )
            .route_layer(middleware::from_fn_with_state(
                Arc::clone(&state),
                auth::require_bearer,
            ));

        let api = Router::new()
            .route("/health", get(handlers::health))
            .merge(tasks)
            .with_state(state);

        let base_path = normalize_base_path(&self.config.base_path);
        let app = if base_path.is_empty() {
            api
        } else {
            Router::new().nest(&base_path, api)
        };

        app.layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer()),
        )
    }

    /// Binds the configured address and serves on a background task.
    ///
    /// Returns the bound address (useful with port 0) and the task handle.
    pub async fn start(self) -> Result<(SocketAddr, tokio::task::JoinHandle<()>)> {
        let listener = TcpListener::bind(self.config.bind).await?;
        let addr = listener.local_addr()?;
        let app = self.router();

        info!("Task server listening on http://{}{}", addr, self.config.base_path);
        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "server terminated");
            }
        });
        Ok((addr, handle))
    }

    /// Binds the configured address and serves until `shutdown` resolves.
    pub async fn serve<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.config.bind).await?;
        let addr = listener.local_addr()?;
        let app = self.router();

        info!("Task server listening on http://{}{}", addr, self.config.base_path);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;
        info!("Task server stopped");
        Ok(())
    }
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .expose_headers([CONTENT_LENGTH])
        .max_age(Duration::from_secs(600))
}
