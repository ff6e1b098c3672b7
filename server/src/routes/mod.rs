//! HTTP route definitions.

mod answers;
mod health;

pub use answers::{ALLOWED_METHODS, ANSWERS_PATH};

use crate::AppState;
use axum::Router;

/// Create all application routes.
pub fn create_routes() -> Router<AppState> {
    Router::new().merge(health::routes()).merge(answers::routes())
}
