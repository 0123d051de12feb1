//! HTTP surface over the core services.
//!
//! # Responsibility
//! - Route the task and audit log endpoints to core services.
//! - Gate every `/api` route except health behind credential verification.
//! - Translate service errors into status codes and JSON bodies.
//!
//! # Invariants
//! - One SQLite connection serves all requests; access is serialized by a
//!   mutex and runs on the blocking pool.

pub mod auth;
pub mod error;
pub mod logs;
pub mod tasks;

use crate::config::Config;
use axum::routing::get;
use axum::{middleware, Json, Router};
use error::ApiError;
use log::info;
use rusqlite::Connection;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use taskledger_core::db::open_db;
use taskledger_core::{core_version, CredentialVerifier, TaskServiceResult};

/// Shared request state.
#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Connection>>,
    verifier: Arc<dyn CredentialVerifier>,
}

impl AppState {
    pub fn new(conn: Connection, verifier: Arc<dyn CredentialVerifier>) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
            verifier,
        }
    }

    /// Runs a store operation on the blocking pool.
    ///
    /// `failure` is the client-facing message used if the operation fails
    /// for reasons the client cannot fix.
    pub(crate) async fn run<T, F>(&self, failure: &'static str, op: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> TaskServiceResult<T> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || match db.lock() {
            Ok(conn) => op(&*conn).map_err(|err| ApiError::from_service(err, failure)),
            Err(_) => Err(ApiError::internal(failure, "database mutex poisoned")),
        })
        .await
        .unwrap_or_else(|err| {
            Err(ApiError::internal(
                failure,
                &format!("blocking task failed: {err}"),
            ))
        })
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route(
            "/api/tasks",
            get(tasks::list_tasks).post(tasks::create_task),
        )
        .route(
            "/api/tasks/:id",
            get(tasks::get_task)
                .put(tasks::update_task)
                .delete(tasks::delete_task),
        )
        .route("/api/logs", get(logs::list_logs))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_basic_auth,
        ));

    Router::new()
        .route("/api/health", get(health))
        .merge(protected)
        .layer(tower_http::cors::CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "version": core_version() }))
}

/// Opens storage, binds the listener and serves until Ctrl-C.
pub async fn serve(config: &Config) -> anyhow::Result<()> {
    let conn = open_db(&config.db_path)?;
    let state = AppState::new(conn, Arc::new(config.credentials.clone()));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(
        "event=server_start module=api status=ok addr={} db_path={}",
        listener.local_addr()?,
        config.db_path.display()
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("event=server_stop module=api status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::error!("event=signal_listen module=api status=error error={err}");
    }
}
