//! Deterministic cache keys for search responses. The key digests the exact
//! query text plus the typed filter set, so byte-different queries never
//! collide and JSON key order in the incoming filters is irrelevant.

use serde_json::json;
use talent_domain::SearchFilters;

use crate::{ServiceError, ServiceResult};

/// Bump when the cached response shape changes, so stale entries from an
/// older deployment become misses instead of decode warnings.
const SEARCH_CACHE_SCHEMA_VERSION: u32 = 1;

pub fn build(query: &str, filters: &SearchFilters) -> ServiceResult<String> {
	let payload = json!({
		"kind": "search",
		"schema_version": SEARCH_CACHE_SCHEMA_VERSION,
		"query": query,
		"filters": filters,
	});
	let raw = serde_json::to_vec(&payload).map_err(|err| ServiceError::Storage {
		message: format!("Failed to encode cache key payload: {err}"),
	})?;

	Ok(blake3::hash(&raw).to_hex().to_string())
}

/// Short form for log lines; full digests drown the output.
pub fn prefix(key: &str) -> &str {
	&key[..key.len().min(12)]
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn filter_key_order_does_not_change_the_key() {
		let a: SearchFilters =
			serde_json::from_value(json!({ "skills": ["Python"], "maxDistance": 10 }))
				.expect("filters must deserialize");
		let b: SearchFilters =
			serde_json::from_value(json!({ "maxDistance": 10, "skills": ["Python"] }))
				.expect("filters must deserialize");

		assert_eq!(
			build("python developer", &a).expect("key must build"),
			build("python developer", &b).expect("key must build"),
		);
	}

	#[test]
	fn distinct_queries_get_distinct_keys() {
		let filters = SearchFilters::default();

		assert_ne!(
			build("python developer", &filters).expect("key must build"),
			build("Python developer", &filters).expect("key must build"),
		);
	}

	#[test]
	fn distinct_filters_get_distinct_keys() {
		let narrowed = SearchFilters { max_distance: Some(10.0), ..Default::default() };

		assert_ne!(
			build("python developer", &SearchFilters::default()).expect("key must build"),
			build("python developer", &narrowed).expect("key must build"),
		);
	}

	#[test]
	fn prefix_is_stable_and_short() {
		let key = build("python developer", &SearchFilters::default()).expect("key must build");

		assert_eq!(prefix(&key).len(), 12);
		assert!(key.starts_with(prefix(&key)));
	}
}
