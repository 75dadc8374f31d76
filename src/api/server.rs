//! HTTP server for the todo REST API.
//!
//! This module provides the axum router, its shared state, and the server
//! lifecycle handle.

use axum::{
    Router,
    extract::State,
    http::HeaderValue,
    response::{IntoResponse, Json},
    routing::{get, patch},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::error::ApiResult;
use super::todos;
use crate::config::ServerConfig;
use crate::db::Database;

/// Server state shared across handlers.
#[derive(Clone)]
pub struct ApiServer {
    db: Arc<Database>,
}

impl ApiServer {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Get the database reference.
    pub fn db(&self) -> &Arc<Database> {
        &self.db
    }
}

/// Health check response.
#[derive(serde::Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// API root - name, version and todo counts.
async fn api_root(State(state): State<ApiServer>) -> ApiResult<Json<serde_json::Value>> {
    let (total, completed) = state.db().count_todos()?;
    Ok(Json(serde_json::json!({
        "name": "Todo API",
        "version": env!("CARGO_PKG_VERSION"),
        "todos": {
            "total": total,
            "completed": completed,
        },
    })))
}

/// CORS for the configured origins. A `*` entry allows any origin.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

/// Build the router with all routes.
pub fn build_router(state: ApiServer, config: &ServerConfig) -> Router {
    Router::new()
        .route("/", get(api_root))
        .route("/health", get(health))
        .route("/todos", get(todos::list_todos).post(todos::create_todo))
        .route(
            "/todos/{todo_id}",
            get(todos::get_todo)
                .put(todos::replace_todo)
                .patch(todos::merge_todo)
                .delete(todos::delete_todo),
        )
        .route("/todos/{todo_id}/complete", patch(todos::complete_todo))
        .route("/todos/{todo_id}/incomplete", patch(todos::reopen_todo))
        .layer(cors_layer(&config.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Handle for a running server.
pub struct ServerHandle {
    addr: SocketAddr,
    shutdown_tx: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl ServerHandle {
    /// The address the server is bound to.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Stop accepting connections and wait for in-flight requests.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
        if let Err(e) = self.task.await {
            warn!("Server task ended abnormally: {}", e);
        }
    }
}

/// Bind to the configured host and port and start serving in the background.
pub async fn start_server(db: Arc<Database>, config: &ServerConfig) -> anyhow::Result<ServerHandle> {
    let app = build_router(ApiServer::new(db), config);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    let addr = listener.local_addr()?;

    info!("Todo API listening on http://{}", addr);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                info!("Todo API shutting down");
            })
            .await
        {
            tracing::error!("Server error: {}", e);
        }
    });

    Ok(ServerHandle {
        addr,
        shutdown_tx,
        task,
    })
}
