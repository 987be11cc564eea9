//! End-to-end pipeline tests over the in-memory index and stub providers.
//! No network, no Qdrant; every assertion is deterministic.

use std::{collections::HashSet, fs, sync::Arc};

use talent_domain::SearchFilters;
use talent_service::{Providers, SearchRequest, ServiceError, TalentService};
use talent_storage::cache::ResponseCache;
use talent_testkit::{
	FailingReranker, InMemoryIndex, StubEmbedder, TEST_VECTOR_DIM, sample_profiles,
	stub_providers, temp_cache_dir, test_config,
};

fn service_with(providers: Providers) -> TalentService {
	let dir = temp_cache_dir();

	TalentService::with_providers(
		test_config(&dir),
		Arc::new(InMemoryIndex::default()),
		ResponseCache::new(dir),
		providers,
	)
}

async fn seeded_service() -> TalentService {
	let service = service_with(stub_providers());

	service.index_batch(sample_profiles()).await.expect("seeding must succeed");

	service
}

fn request(query: &str, filters: SearchFilters) -> SearchRequest {
	SearchRequest { query: query.to_string(), filters, top_k: None }
}

fn names(response: &talent_service::SearchResponse) -> HashSet<String> {
	response
		.professionals
		.iter()
		.filter_map(|profile| profile.get("name").and_then(|name| name.as_str()))
		.map(str::to_string)
		.collect()
}

fn cleanup(service: &TalentService) {
	let _ = fs::remove_dir_all(service.cache.dir());
}

#[tokio::test]
async fn skills_filter_narrows_to_matching_profiles() {
	let service = seeded_service().await;
	let filters = SearchFilters { skills: Some(vec!["Python".to_string()]), ..Default::default() };
	let response = service
		.search(request("python developer", filters))
		.await
		.expect("search must succeed");

	assert!(!response.cached);
	assert_eq!(
		names(&response),
		HashSet::from(["Ana Silva".to_string(), "Maria Lopez".to_string()]),
	);
	// Ana's document mentions the query tokens more often, so the reranker
	// must put her first.
	assert_eq!(response.professionals[0]["name"], "Ana Silva");
	assert_eq!(response.professionals[1]["name"], "Maria Lopez");
	assert!(response.response.starts_with("Found 2 professionals matching 'python developer'"));

	cleanup(&service);
}

#[tokio::test]
async fn reranker_orders_results_by_descending_relevance() {
	let service = seeded_service().await;
	let response = service
		.search(request("machine learning", SearchFilters::default()))
		.await
		.expect("search must succeed");

	// Only Maria's document contains the query tokens; the other two score
	// zero and must trail her regardless of retrieval order.
	assert_eq!(response.professionals.len(), 3);
	assert_eq!(response.professionals[0]["name"], "Maria Lopez");

	cleanup(&service);
}

#[tokio::test]
async fn empty_result_gets_the_fixed_message_and_still_caches() {
	let service = seeded_service().await;
	let filters = SearchFilters { max_distance: Some(1.0), ..Default::default() };
	let first = service
		.search(request("python developer", filters.clone()))
		.await
		.expect("search must succeed");

	assert!(!first.cached);
	assert!(first.professionals.is_empty());
	assert!(first.response.starts_with("No professionals matched your search."));

	let second = service
		.search(request("python developer", filters))
		.await
		.expect("search must succeed");

	assert!(second.cached);
	assert_eq!(second.response, first.response);

	cleanup(&service);
}

#[tokio::test]
async fn cache_hit_replays_the_first_response() {
	let service = seeded_service().await;
	let first = service
		.search(request("machine learning", SearchFilters::default()))
		.await
		.expect("search must succeed");
	let second = service
		.search(request("machine learning", SearchFilters::default()))
		.await
		.expect("search must succeed");

	assert!(!first.cached);
	assert!(second.cached);
	assert_eq!(second.response, first.response);
	assert_eq!(second.professionals, first.professionals);

	cleanup(&service);
}

#[tokio::test]
async fn rerank_failure_degrades_to_retrieval_order() {
	let degraded = service_with(Providers::new(
		Arc::new(StubEmbedder { dim: TEST_VECTOR_DIM as usize }),
		Arc::new(FailingReranker),
	));
	let baseline = service_with(stub_providers());

	degraded.index_batch(sample_profiles()).await.expect("seeding must succeed");
	baseline.index_batch(sample_profiles()).await.expect("seeding must succeed");

	let mut baseline_cfg_off = baseline;

	baseline_cfg_off.cfg.providers.rerank.enabled = false;

	let degraded_response = degraded
		.search(request("kubernetes platform", SearchFilters::default()))
		.await
		.expect("search must succeed");
	let passthrough_response = baseline_cfg_off
		.search(request("kubernetes platform", SearchFilters::default()))
		.await
		.expect("search must succeed");

	assert_eq!(degraded_response.professionals, passthrough_response.professionals);

	cleanup(&degraded);
	cleanup(&baseline_cfg_off);
}

#[tokio::test]
async fn top_k_bounds_the_result_set() {
	let service = seeded_service().await;
	let response = service
		.search(SearchRequest {
			query: "python developer".to_string(),
			filters: SearchFilters::default(),
			top_k: Some(1),
		})
		.await
		.expect("search must succeed");

	assert_eq!(response.professionals.len(), 1);

	cleanup(&service);
}

#[tokio::test]
async fn blank_query_is_rejected() {
	let service = seeded_service().await;
	let err = service
		.search(request("   ", SearchFilters::default()))
		.await
		.expect_err("blank query must be rejected");

	assert!(matches!(err, ServiceError::InvalidRequest { .. }));

	cleanup(&service);
}

#[tokio::test]
async fn zero_top_k_is_rejected() {
	let service = seeded_service().await;
	let err = service
		.search(SearchRequest {
			query: "python developer".to_string(),
			filters: SearchFilters::default(),
			top_k: Some(0),
		})
		.await
		.expect_err("zero top_k must be rejected");

	assert!(matches!(err, ServiceError::InvalidRequest { .. }));

	cleanup(&service);
}

#[tokio::test]
async fn reindexing_the_same_profile_does_not_duplicate_it() {
	let service = seeded_service().await;
	let mut profile = sample_profiles().remove(0);

	profile.title = "Staff Python Developer".to_string();

	service.index_profile(profile).await.expect("reindex must succeed");

	let stats = service.stats().await.expect("stats must succeed");

	assert_eq!(stats.total_profiles, 3);

	cleanup(&service);
}

#[tokio::test]
async fn stats_report_profiles_and_cache_entries() {
	let service = seeded_service().await;

	service
		.search(request("python developer", SearchFilters::default()))
		.await
		.expect("search must succeed");

	let stats = service.stats().await.expect("stats must succeed");

	assert_eq!(stats.total_profiles, 3);
	assert_eq!(stats.cache_size, 1);
	assert_eq!(stats.system_status, "optimized - no LLM required");

	cleanup(&service);
}

#[tokio::test]
async fn clearing_the_cache_forces_recomputation() {
	let service = seeded_service().await;

	service
		.search(request("python developer", SearchFilters::default()))
		.await
		.expect("search must succeed");

	let cleared = service.clear_cache().await.expect("clear must succeed");

	assert_eq!(cleared.status, "success");

	let response = service
		.search(request("python developer", SearchFilters::default()))
		.await
		.expect("search must succeed");

	assert!(!response.cached);

	cleanup(&service);
}

#[tokio::test]
async fn empty_batch_is_acknowledged_without_providers() {
	let service = service_with(Providers::new(
		Arc::new(StubEmbedder { dim: TEST_VECTOR_DIM as usize }),
		Arc::new(FailingReranker),
	));
	let ack = service.index_batch(Vec::new()).await.expect("empty batch must succeed");

	assert_eq!(ack.profile_ids.len(), 0);

	cleanup(&service);
}
