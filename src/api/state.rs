use std::sync::Arc;

use crate::application::JobService;
use crate::domain::ports::JobStore;
use crate::infrastructure::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub job_service: Arc<JobService>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn JobStore>, config: AppConfig) -> Self {
        Self {
            job_service: Arc::new(JobService::new(store)),
            config: Arc::new(config),
        }
    }
}
