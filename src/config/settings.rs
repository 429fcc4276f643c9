use serde::Deserialize;
use crate::config::env::{self, EnvKey};

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub server_port: u16,
    pub minio_endpoint: String,
    pub minio_access_key: String,
    pub minio_secret_key: String,
    pub ffmpeg_path: String,
    pub export_timeout_secs: u64,
}

impl AppConfig {
    // Every key carries a default, so construction cannot fail.
    pub fn new() -> Self {
        Self {
            server_port: env::get_parsed(EnvKey::ServerPort, 5000),
            minio_endpoint: env::get_or(EnvKey::MinioEndpoint, "http://minio:9000"),
            minio_access_key: env::get_or(EnvKey::MinioAccessKey, "minioadmin"),
            minio_secret_key: env::get_or(EnvKey::MinioSecretKey, "minioadmin"),
            ffmpeg_path: env::get_or(EnvKey::FfmpegPath, "ffmpeg"),
            export_timeout_secs: env::get_parsed(EnvKey::ExportTimeoutSecs, 300),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}
