use std::sync::Arc;

use tokio::sync::RwLock;

use crate::assistant::AssistantBackend;
use crate::config::AppConfig;
use crate::storage::Dataset;

/// Shared handler state. The dataset is the only mutable part; handlers hold
/// the read lock only while folding.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub dataset: Arc<RwLock<Dataset>>,
    pub assistant: Arc<dyn AssistantBackend>,
}

impl AppState {
    pub fn new(config: AppConfig, dataset: Dataset, assistant: Arc<dyn AssistantBackend>) -> Self {
        Self {
            config: Arc::new(config),
            dataset: Arc::new(RwLock::new(dataset)),
            assistant,
        }
    }
}
