//! The retrieval pipeline: embed the query, pull nearest neighbors, apply the
//! structured post-filters, re-rank what survives, truncate, render, cache.

pub mod cache_key;
mod format;

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use talent_domain::{SearchFilters, metadata};
use talent_storage::models::RetrievedDocument;
use tracing::{debug, warn};

use crate::{ServiceError, ServiceResult, TalentService};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
	pub query: String,
	#[serde(default)]
	pub filters: SearchFilters,
	pub top_k: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
	/// Deterministic human-readable summary of the ranked results.
	pub response: String,
	/// Flattened metadata of each ranked profile, in rank order.
	pub professionals: Vec<Map<String, Value>>,
	pub query: String,
	pub cached: bool,
}

/// A retrieved document together with its parsed metadata view. Filters and
/// rendering read the parsed view; the wire payload keeps the flattened one.
struct Candidate {
	doc: RetrievedDocument,
	parsed: Map<String, Value>,
}

impl TalentService {
	pub async fn search(&self, request: SearchRequest) -> ServiceResult<SearchResponse> {
		if request.query.trim().is_empty() {
			return Err(ServiceError::InvalidRequest {
				message: "Query must not be empty.".to_string(),
			});
		}

		if request.top_k == Some(0) {
			return Err(ServiceError::InvalidRequest {
				message: "top_k must be greater than zero.".to_string(),
			});
		}

		let top_k = request.top_k.unwrap_or(self.cfg.search.default_top_k);
		let key = cache_key::build(&request.query, &request.filters)?;

		if self.cfg.storage.cache.enabled
			&& let Some(payload) = self.cache.get(&key)?
		{
			match serde_json::from_value::<SearchResponse>(payload) {
				Ok(mut hit) => {
					debug!(key = cache_key::prefix(&key), "Serving search response from cache.");

					hit.cached = true;

					return Ok(hit);
				},
				Err(err) =>
					warn!(error = %err, key = cache_key::prefix(&key), "Cached response no longer decodes; recomputing."),
			}
		}

		let vectors = self.embed_texts(std::slice::from_ref(&request.query)).await?;
		let vector = vectors.into_iter().next().ok_or_else(|| ServiceError::Provider {
			message: "Embedding provider returned no vectors.".to_string(),
		})?;
		let candidate_limit = u64::from(top_k) * u64::from(self.cfg.search.overfetch_factor);
		let retrieved = self.index.nearest(vector, candidate_limit).await?;

		debug!(retrieved = retrieved.len(), limit = candidate_limit, "Vector retrieval complete.");

		let mut candidates = retrieved
			.into_iter()
			.map(|doc| {
				let parsed = metadata::unflatten(&doc.metadata);

				Candidate { doc, parsed }
			})
			.filter(|candidate| request.filters.matches(&candidate.parsed))
			.collect::<Vec<_>>();

		self.rerank_candidates(&request.query, &mut candidates).await;

		candidates.truncate(top_k as usize);

		let sections = candidates.iter().map(|candidate| &candidate.parsed).collect::<Vec<_>>();
		let response = SearchResponse {
			response: format::render_summary(&request.query, &sections),
			professionals: candidates.into_iter().map(|candidate| candidate.doc.metadata).collect(),
			query: request.query,
			cached: false,
		};

		if self.cfg.storage.cache.enabled {
			let payload = serde_json::to_value(&response).map_err(|err| ServiceError::Storage {
				message: format!("Failed to encode cache payload: {err}"),
			})?;

			self.cache.put(&key, &payload)?;
		}

		Ok(response)
	}

	/// Reorders candidates by cross-encoder relevance. Any provider failure
	/// degrades to the retrieval order instead of failing the search.
	async fn rerank_candidates(&self, query: &str, candidates: &mut Vec<Candidate>) {
		if !self.cfg.providers.rerank.enabled || candidates.len() < 2 {
			return;
		}

		let docs = candidates.iter().map(|candidate| candidate.doc.text.clone()).collect::<Vec<_>>();
		let scores =
			match self.providers.rerank.rerank(&self.cfg.providers.rerank, query, &docs).await {
				Ok(scores) if scores.len() == candidates.len() => scores,
				Ok(scores) => {
					warn!(
						scores = scores.len(),
						candidates = candidates.len(),
						"Rerank score count mismatch; keeping retrieval order."
					);

					return;
				},
				Err(err) => {
					warn!(error = %err, "Rerank failed; keeping retrieval order.");

					return;
				},
			};
		let mut scored = candidates.drain(..).zip(scores).collect::<Vec<_>>();

		// Stable sort, so tied scores keep the retrieval order.
		scored.sort_by(|(_, a), (_, b)| b.partial_cmp(a).unwrap_or(Ordering::Equal));

		candidates.extend(scored.into_iter().map(|(candidate, _)| candidate));
	}
}
