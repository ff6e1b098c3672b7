//! Answerbook Server - append-only answer storage behind a single endpoint.
//!
//! Records live in one JSON document held by a [`DocumentStore`] (a GitHub
//! gist in production). Reads return the whole list; writes reconcile the
//! submitted batch with the answerbook-engine and append whatever is new.

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod store;

use crate::config::{Config, StoreBackend};
use crate::store::{DocumentStore, GistStore, MemoryStore, StoreError, StoreResult};
use axum::http::{
    header::{
        ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    },
    HeaderValue,
};
use axum::Router;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    /// Serializes submissions so two requests in this process never commit
    /// against the same revision.
    pub write_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }
}

/// Build the store selected by `config`.
pub fn build_store(config: &Config) -> StoreResult<Arc<dyn DocumentStore>> {
    match config.backend {
        StoreBackend::Gist => {
            let gist = config.gist.clone().ok_or_else(|| {
                StoreError::Malformed("gist backend selected without gist settings".into())
            })?;
            Ok(Arc::new(GistStore::new(gist, config.store_timeout)?))
        }
        StoreBackend::Memory => Ok(Arc::new(MemoryStore::new())),
    }
}

/// Build the router with tracing and permissive CORS headers on every response.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::create_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(SetResponseHeaderLayer::overriding(
                    ACCESS_CONTROL_ALLOW_ORIGIN,
                    HeaderValue::from_static("*"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    ACCESS_CONTROL_ALLOW_METHODS,
                    HeaderValue::from_static(routes::ALLOWED_METHODS),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    ACCESS_CONTROL_ALLOW_HEADERS,
                    HeaderValue::from_static("Content-Type"),
                )),
        )
        .with_state(state)
}
