use std::sync::Arc;

use cattery_core::repositories::CatRepository;
use cattery_core::services::CatService;
use cattery_shared::config::AppConfig;

pub type SharedCatService = Arc<CatService<dyn CatRepository>>;

#[derive(Clone)]
pub struct AppState {
    pub cats: SharedCatService,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(repo: Arc<dyn CatRepository>, config: AppConfig) -> Self {
        let cats = CatService::new(repo, config.pagination);
        Self {
            cats: Arc::new(cats),
            config: Arc::new(config),
        }
    }
}
