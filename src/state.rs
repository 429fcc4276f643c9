use std::sync::Arc;

use crate::config::settings::AppConfig;
use crate::infrastructure::storage::ObjectStore;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub storage: Arc<dyn ObjectStore>,
}

impl AppState {
    pub fn new(config: AppConfig, storage: Arc<dyn ObjectStore>) -> Self {
        Self { config, storage }
    }
}
