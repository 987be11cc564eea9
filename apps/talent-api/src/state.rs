use std::sync::Arc;

use talent_service::TalentService;
use talent_storage::{cache::ResponseCache, qdrant::QdrantStore};

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<TalentService>,
}
impl AppState {
	pub async fn new(config: talent_config::Config) -> color_eyre::Result<Self> {
		let qdrant = QdrantStore::new(&config.storage.qdrant)?;

		qdrant.ensure_collection().await?;

		let cache = ResponseCache::new(config.storage.cache.dir.clone());
		let service = TalentService::new(config, Arc::new(qdrant), cache);

		Ok(Self { service: Arc::new(service) })
	}
}
