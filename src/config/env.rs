use std::env;
use std::str::FromStr;

pub enum EnvKey {
    ServerPort,
    MinioEndpoint,
    MinioAccessKey,
    MinioSecretKey,
    FfmpegPath,
    ExportTimeoutSecs,
}

impl EnvKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvKey::ServerPort => "APP_PORT",
            EnvKey::MinioEndpoint => "MINIO_ENDPOINT",
            EnvKey::MinioAccessKey => "ACCESS_KEY",
            EnvKey::MinioSecretKey => "SECRET_KEY",
            EnvKey::FfmpegPath => "FFMPEG_PATH",
            EnvKey::ExportTimeoutSecs => "EXPORT_TIMEOUT_SECS",
        }
    }
}

pub fn get_or(key: EnvKey, default: &str) -> String {
    env::var(key.as_str()).unwrap_or_else(|_| default.to_string())
}

pub fn get_parsed<T: FromStr>(key: EnvKey, default: T) -> T {
    match env::var(key.as_str()) {
        Ok(val) => val.parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}
