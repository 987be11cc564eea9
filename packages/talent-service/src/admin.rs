use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{ServiceResult, TalentService};

/// Advertised in stats responses; the pipeline never calls a language model.
pub const SYSTEM_STATUS: &str = "optimized - no LLM required";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheClearResponse {
	pub status: String,
	pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
	pub total_profiles: u64,
	pub cache_size: usize,
	pub system_status: String,
}

impl TalentService {
	pub async fn clear_cache(&self) -> ServiceResult<CacheClearResponse> {
		let removed = self.cache.clear()?;

		info!(removed, "Response cache cleared.");

		Ok(CacheClearResponse {
			status: "success".to_string(),
			message: format!("Cache cleared ({removed} entries removed)."),
		})
	}

	pub async fn stats(&self) -> ServiceResult<StatsResponse> {
		Ok(StatsResponse {
			total_profiles: self.index.count().await?,
			cache_size: self.cache.len()?,
			system_status: SYSTEM_STATUS.to_string(),
		})
	}
}
