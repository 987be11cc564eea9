use serde::{Deserialize, Serialize};
use talent_domain::{Profile, document, metadata};
use talent_storage::models::StoredDocument;
use tracing::info;

use crate::{ServiceError, ServiceResult, TalentService};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexResponse {
	pub status: String,
	pub message: String,
	pub profile_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexBatchResponse {
	pub status: String,
	pub message: String,
	pub profile_ids: Vec<i64>,
}

impl TalentService {
	pub async fn index_profile(&self, profile: Profile) -> ServiceResult<IndexResponse> {
		let profile_id = profile.id;
		let name = profile.name.clone();

		self.index_profiles(vec![profile]).await?;

		Ok(IndexResponse {
			status: "success".to_string(),
			message: format!("Profile for {name} indexed."),
			profile_id,
		})
	}

	/// One embedding call for the whole batch, then a single upsert. An empty
	/// batch is acknowledged without touching the providers.
	pub async fn index_batch(&self, profiles: Vec<Profile>) -> ServiceResult<IndexBatchResponse> {
		let profile_ids = profiles.iter().map(|profile| profile.id).collect::<Vec<_>>();

		self.index_profiles(profiles).await?;

		Ok(IndexBatchResponse {
			status: "success".to_string(),
			message: format!("{} profiles indexed.", profile_ids.len()),
			profile_ids,
		})
	}

	async fn index_profiles(&self, profiles: Vec<Profile>) -> ServiceResult<()> {
		if profiles.is_empty() {
			return Ok(());
		}
		if let Some(profile) = profiles.iter().find(|profile| profile.id < 0) {
			return Err(ServiceError::InvalidRequest {
				message: format!("Profile id {} must be non-negative.", profile.id),
			});
		}

		let texts = profiles.iter().map(document::render).collect::<Vec<_>>();
		let vectors = self.embed_texts(&texts).await?;
		let docs = profiles
			.into_iter()
			.zip(texts)
			.zip(vectors)
			.map(|((profile, text), vector)| StoredDocument {
				id: profile.id as u64,
				metadata: metadata::flatten(&profile),
				text,
				vector,
			})
			.collect::<Vec<_>>();
		let count = docs.len();

		self.index.upsert(docs).await?;

		info!(count, "Profiles indexed.");

		Ok(())
	}
}
