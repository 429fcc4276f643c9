use std::time::Duration;

use bytes::Bytes;
use tempfile::NamedTempFile;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::state::AppState;

use super::dto::{AsyncExportParams, DEFAULT_FRAMERATE, SyncExportParams, framerate_for};
use super::error::ExportError;
use super::pipeline;
use super::transcoder::Transcoder;

const VIDEO_MP4: &str = "video/mp4";

pub struct ExportService;

impl ExportService {
    /// Transcodes the frames at the default framerate and stores the
    /// artifact at `output_bucket/timelapse_name`.
    pub async fn export_to_bucket(
        state: AppState,
        params: AsyncExportParams,
        frames: Vec<String>,
    ) -> Result<(), ExportError> {
        params
            .validate()
            .map_err(|err| ExportError::Validation(err.to_string()))?;
        Self::ensure_bucket(&state, &params.input_bucket).await?;
        Self::ensure_bucket(&state, &params.output_bucket).await?;

        let artifact =
            Self::generate(&state, &params.input_bucket, frames, DEFAULT_FRAMERATE).await?;

        let data = tokio::fs::read(artifact.path()).await?;
        state
            .storage
            .put_object(
                &params.output_bucket,
                &params.timelapse_name,
                Bytes::from(data),
                VIDEO_MP4,
            )
            .await
            .map_err(|err| ExportError::Storage(err.to_string()))?;

        info!(
            "Timelapse stored as {}/{}",
            params.output_bucket, params.timelapse_name
        );
        Ok(())
    }

    /// Transcodes the frames spread over the requested duration and returns
    /// the artifact bytes for an inline response.
    pub async fn export_inline(
        state: AppState,
        params: SyncExportParams,
        frames: Vec<String>,
    ) -> Result<Bytes, ExportError> {
        params
            .validate()
            .map_err(|err| ExportError::Validation(err.to_string()))?;
        Self::ensure_bucket(&state, &params.input_bucket).await?;

        let framerate = framerate_for(frames.len(), params.duration);
        let artifact = Self::generate(&state, &params.input_bucket, frames, framerate).await?;

        let data = tokio::fs::read(artifact.path()).await?;
        Ok(Bytes::from(data))
    }

    /// Runs one transcode job: temp artifact, ffmpeg launch, streaming
    /// pipeline. Returns the artifact only on success, so publishing an
    /// unfinished job is unrepresentable. The temp file deletes itself
    /// when the returned handle is dropped.
    async fn generate(
        state: &AppState,
        input_bucket: &str,
        frames: Vec<String>,
        framerate: f64,
    ) -> Result<NamedTempFile, ExportError> {
        if frames.is_empty() {
            return Err(ExportError::Validation("no frames provided".to_string()));
        }

        let job_id = Uuid::new_v4();
        info!(
            %job_id,
            frame_count = frames.len(),
            framerate,
            "Starting timelapse generation"
        );

        let artifact = tempfile::Builder::new()
            .prefix("timelapse-")
            .suffix(".mp4")
            .tempfile()?;

        let mut transcoder =
            Transcoder::spawn(&state.config.ffmpeg_path, framerate, artifact.path())?;
        let deadline = Duration::from_secs(state.config.export_timeout_secs);
        pipeline::run(
            state.storage.clone(),
            input_bucket.to_string(),
            frames,
            &mut transcoder,
            deadline,
            artifact.path(),
        )
        .await?;

        info!(%job_id, "Timelapse generation finished");
        Ok(artifact)
    }

    async fn ensure_bucket(state: &AppState, bucket: &str) -> Result<(), ExportError> {
        match state.storage.bucket_exists(bucket).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(ExportError::BucketNotFound(bucket.to_string())),
            Err(err) => Err(ExportError::Storage(err.to_string())),
        }
    }
}
