//! Answer endpoint routes.

use axum::{
    body::Bytes,
    extract::State,
    http::{header::ALLOW, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;

use answerbook_engine::{Batch, Record};

use crate::error::{AppError, Result, NON_EMPTY_ARRAY};
use crate::handlers::{
    handle_list, handle_submit, AddedResponse, NoNewItemsResponse, SubmitOutcome, ITEMS_ADDED,
    NO_NEW_ITEMS,
};
use crate::AppState;

/// Path the answer endpoint is served on.
pub const ANSWERS_PATH: &str = "/api/main";

/// Methods the answer endpoint accepts.
pub const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";

/// Create answer routes.
pub fn routes() -> Router<AppState> {
    Router::new().route(
        ANSWERS_PATH,
        get(list_handler)
            .post(submit_handler)
            .options(preflight_handler)
            .fallback(unsupported_handler),
    )
}

/// GET - every stored answer.
async fn list_handler(State(state): State<AppState>) -> Result<Json<Vec<Record>>> {
    let records = handle_list(state.store.as_ref()).await?;
    Ok(Json(records))
}

/// POST - append the new answers from a JSON array body.
async fn submit_handler(State(state): State<AppState>, body: Bytes) -> Result<Response> {
    let value: serde_json::Value = serde_json::from_slice(&body)
        .map_err(|_| AppError::BadRequest(NON_EMPTY_ARRAY.to_string()))?;
    let batch = Batch::from_value(value)?;

    let _guard = state.write_lock.lock().await;
    let outcome = handle_submit(state.store.as_ref(), batch).await?;

    let response = match outcome {
        SubmitOutcome::NoNewItems { skipped } => (
            StatusCode::OK,
            Json(NoNewItemsResponse {
                message: NO_NEW_ITEMS,
                skipped,
            }),
        )
            .into_response(),
        SubmitOutcome::Added { added, skipped } => (
            StatusCode::CREATED,
            Json(AddedResponse {
                message: ITEMS_ADDED,
                added,
                skipped,
            }),
        )
            .into_response(),
    };

    Ok(response)
}

/// OPTIONS - CORS preflight; headers come from the router layers.
async fn preflight_handler() -> StatusCode {
    StatusCode::OK
}

/// Any other method.
async fn unsupported_handler() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(ALLOW, ALLOWED_METHODS)],
        Json(json!({ "error": "Method not supported" })),
    )
        .into_response()
}
