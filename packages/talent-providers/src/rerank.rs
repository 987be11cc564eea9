use std::time::Duration;

use color_eyre::{Result, eyre};
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct RerankResponse {
	#[serde(alias = "data")]
	results: Vec<RerankItem>,
}

#[derive(Debug, Deserialize)]
struct RerankItem {
	index: usize,
	#[serde(alias = "score")]
	relevance_score: f32,
}

/// Scores each document against the query. Returned scores align with the
/// input document order; higher means more relevant.
pub async fn rerank(
	cfg: &talent_config::RerankProviderConfig,
	query: &str,
	docs: &[String],
) -> Result<Vec<f32>> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({ "model": cfg.model, "query": query, "documents": docs });
	let res = client
		.post(url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let parsed: RerankResponse = res.error_for_status()?.json().await?;

	scores_in_input_order(parsed, docs.len())
}

fn scores_in_input_order(response: RerankResponse, doc_count: usize) -> Result<Vec<f32>> {
	let mut scores = vec![0.0f32; doc_count];

	for item in response.results {
		let slot = scores
			.get_mut(item.index)
			.ok_or_else(|| eyre::eyre!("Rerank result index {} is out of range.", item.index))?;

		*slot = item.relevance_score;
	}

	Ok(scores)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn aligns_scores_by_index() {
		let response: RerankResponse = serde_json::from_value(serde_json::json!({
			"results": [
				{ "index": 1, "relevance_score": 0.2 },
				{ "index": 0, "relevance_score": 0.9 }
			]
		}))
		.expect("parse failed");
		let scores = scores_in_input_order(response, 2).expect("alignment failed");

		assert_eq!(scores, vec![0.9, 0.2]);
	}

	#[test]
	fn rejects_out_of_range_indices() {
		let response: RerankResponse = serde_json::from_value(serde_json::json!({
			"results": [{ "index": 5, "score": 0.5 }]
		}))
		.expect("parse failed");

		assert!(scores_in_input_order(response, 2).is_err());
	}
}
