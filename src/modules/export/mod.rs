use axum::Router;
use axum::routing::post;

use crate::state::AppState;

pub mod dto;
pub mod error;
pub mod handler;
pub mod pipeline;
pub mod service;
pub mod transcoder;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/process/async", post(handler::process_async))
        .route("/process/sync", post(handler::process_sync))
}
