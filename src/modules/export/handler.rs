use crate::common::response::{ApiError, ApiResponse};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use tracing::info;

use super::dto::{AsyncExportParams, SyncExportParams, parse_frame_list};
use super::service::ExportService;

/// Export a timelapse into a destination bucket.
/// The request body lists one frame object id per line, in playback order.
#[utoipa::path(
    post,
    path = "/api/v1/process/async",
    params(AsyncExportParams),
    request_body(content = String, content_type = "text/plain", description = "One frame object id per line, in playback order"),
    responses(
        (status = 200, description = "Timelapse stored at output_bucket/timelapse_name"),
        (status = 400, description = "Missing or invalid parameters, or empty frame list"),
        (status = 404, description = "Bucket or frame object not found"),
        (status = 500, description = "Transcoding failed or timed out")
    ),
    tag = "Export"
)]
pub async fn process_async(
    State(state): State<AppState>,
    Query(params): Query<AsyncExportParams>,
    body: String,
) -> impl IntoResponse {
    info!("Got async processing request");

    let frames = parse_frame_list(&body);
    match ExportService::export_to_bucket(state, params, frames).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::success((), "Timelapse exported successfully")),
        )
            .into_response(),
        Err(err) => ApiError(err.to_string(), err.status()).into_response(),
    }
}

/// Export a timelapse and return it inline.
/// The framerate is derived from the frame count and the requested duration.
#[utoipa::path(
    post,
    path = "/api/v1/process/sync",
    params(SyncExportParams),
    request_body(content = String, content_type = "text/plain", description = "One frame object id per line, in playback order"),
    responses(
        (status = 200, description = "MP4 artifact bytes", body = Vec<u8>, content_type = "video/mp4"),
        (status = 400, description = "Missing or invalid parameters, or empty frame list"),
        (status = 404, description = "Bucket or frame object not found"),
        (status = 500, description = "Transcoding failed or timed out")
    ),
    tag = "Export"
)]
pub async fn process_sync(
    State(state): State<AppState>,
    Query(params): Query<SyncExportParams>,
    body: String,
) -> impl IntoResponse {
    info!("Got sync processing request");

    let frames = parse_frame_list(&body);
    match ExportService::export_inline(state, params, frames).await {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, "video/mp4"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=preview.mp4",
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(err) => ApiError(err.to_string(), err.status()).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use crate::config::settings::AppConfig;
    use crate::infrastructure::storage::testing::MockStore;
    use crate::state::AppState;
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_app(store: Arc<MockStore>) -> Router {
        let state = AppState::new(
            AppConfig {
                server_port: 0,
                minio_endpoint: String::new(),
                minio_access_key: String::new(),
                minio_secret_key: String::new(),
                ffmpeg_path: "/nonexistent/transcoder-binary".to_string(),
                export_timeout_secs: 10,
            },
            store,
        );
        Router::new()
            .nest("/api/v1", crate::modules::export::router())
            .with_state(state)
    }

    #[tokio::test]
    async fn missing_parameters_are_a_bad_request() {
        let app = test_app(Arc::new(MockStore::new()));
        let resp = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/process/sync")
                    .body(Body::from("frame.jpg\n"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn non_numeric_duration_is_a_bad_request() {
        let app = test_app(Arc::new(MockStore::with_bucket("frames")));
        let resp = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/process/sync?input_bucket=frames&duration=soon")
                    .body(Body::from("frame.jpg\n"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_bucket_is_not_found() {
        let app = test_app(Arc::new(MockStore::new()));
        let resp = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/process/async?input_bucket=a&output_bucket=b&timelapse_name=t.mp4")
                    .body(Body::from("frame.jpg\n"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "error");
    }

    #[tokio::test]
    async fn empty_frame_list_is_a_bad_request() {
        let store = Arc::new(MockStore::with_bucket("frames"));
        let app = test_app(store);
        let resp = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/process/sync?input_bucket=frames&duration=2000")
                    .body(Body::from("\n\n"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
