//! Hermetic doubles for the service seams. Everything here runs in-process
//! with no network, no Qdrant, and no provider credentials, so pipeline tests
//! stay deterministic and fast.

use std::{
	cmp::Ordering,
	collections::{HashSet, hash_map::DefaultHasher},
	env,
	hash::{Hash, Hasher},
	path::PathBuf,
	sync::{Arc, Mutex},
};

use talent_config::{
	Cache, Config, EmbeddingProviderConfig, Qdrant, RerankProviderConfig, Search, Service, Storage,
};
use talent_domain::{Location, Profile};
use talent_service::{BoxFuture, EmbeddingProvider, Providers, RerankProvider, VectorIndex};
use talent_storage::models::{RetrievedDocument, StoredDocument};
use uuid::Uuid;

pub const TEST_VECTOR_DIM: u32 = 32;

/// Bag-of-words hashing embedder: each token bumps one bucket, then the vector
/// is length-normalized. Shared tokens mean higher cosine similarity, which is
/// all the pipeline tests need from "semantic" retrieval.
pub struct StubEmbedder {
	pub dim: usize,
}

/// Scores each document by how many query tokens it shares.
pub struct StubReranker;

/// Always errors, for exercising the degrade-to-retrieval-order path.
pub struct FailingReranker;

/// Exact cosine nearest-neighbor search over an in-memory document list.
/// Upserts replace by id, matching the real store's semantics.
#[derive(Default)]
pub struct InMemoryIndex {
	docs: Mutex<Vec<StoredDocument>>,
}

impl StubEmbedder {
	fn vector(&self, text: &str) -> Vec<f32> {
		let mut vector = vec![0.0_f32; self.dim];

		for token in tokens(text) {
			let mut hasher = DefaultHasher::new();

			token.hash(&mut hasher);

			vector[(hasher.finish() % self.dim as u64) as usize] += 1.0;
		}

		let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();

		if norm > 0.0 {
			for x in &mut vector {
				*x /= norm;
			}
		}

		vector
	}
}

impl EmbeddingProvider for StubEmbedder {
	fn embed<'a>(
		&'a self,
		_cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>> {
		let vectors = texts.iter().map(|text| self.vector(text)).collect();

		Box::pin(async move { Ok(vectors) })
	}
}

impl RerankProvider for StubReranker {
	fn rerank<'a>(
		&'a self,
		_cfg: &'a RerankProviderConfig,
		query: &'a str,
		docs: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<f32>>> {
		let query_tokens = tokens(query).collect::<HashSet<_>>();
		let scores = docs
			.iter()
			.map(|doc| tokens(doc).filter(|token| query_tokens.contains(token)).count() as f32)
			.collect();

		Box::pin(async move { Ok(scores) })
	}
}

impl RerankProvider for FailingReranker {
	fn rerank<'a>(
		&'a self,
		_cfg: &'a RerankProviderConfig,
		_query: &'a str,
		_docs: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<f32>>> {
		Box::pin(async { Err(color_eyre::eyre::eyre!("rerank backend unavailable")) })
	}
}

impl VectorIndex for InMemoryIndex {
	fn upsert<'a>(&'a self, docs: Vec<StoredDocument>) -> BoxFuture<'a, talent_storage::Result<()>> {
		Box::pin(async move {
			let mut stored = self.docs.lock().expect("index lock poisoned");

			for doc in docs {
				match stored.iter_mut().find(|existing| existing.id == doc.id) {
					Some(existing) => *existing = doc,
					None => stored.push(doc),
				}
			}

			Ok(())
		})
	}

	fn nearest<'a>(
		&'a self,
		vector: Vec<f32>,
		limit: u64,
	) -> BoxFuture<'a, talent_storage::Result<Vec<RetrievedDocument>>> {
		Box::pin(async move {
			let stored = self.docs.lock().expect("index lock poisoned");
			let mut scored = stored
				.iter()
				.map(|doc| (cosine(&vector, &doc.vector), doc.clone()))
				.collect::<Vec<_>>();

			scored.sort_by(|(a, _), (b, _)| b.partial_cmp(a).unwrap_or(Ordering::Equal));
			scored.truncate(limit as usize);

			Ok(scored
				.into_iter()
				.map(|(score, doc)| RetrievedDocument {
					id: doc.id,
					text: doc.text,
					metadata: doc.metadata,
					score,
				})
				.collect())
		})
	}

	fn count<'a>(&'a self) -> BoxFuture<'a, talent_storage::Result<u64>> {
		Box::pin(async move { Ok(self.docs.lock().expect("index lock poisoned").len() as u64) })
	}
}

fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
	text.split(|c: char| !c.is_alphanumeric())
		.filter(|token| !token.is_empty())
		.map(str::to_lowercase)
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
	let dot = a.iter().zip(b).map(|(x, y)| x * y).sum::<f32>();
	let norm = |v: &[f32]| v.iter().map(|x| x * x).sum::<f32>().sqrt();
	let scale = norm(a) * norm(b);

	if scale > 0.0 { dot / scale } else { 0.0 }
}

/// Stub embedder plus the token-overlap reranker.
pub fn stub_providers() -> Providers {
	Providers::new(Arc::new(StubEmbedder { dim: TEST_VECTOR_DIM as usize }), Arc::new(StubReranker))
}

pub fn temp_cache_dir() -> PathBuf {
	env::temp_dir().join(format!("talent_cache_{}", Uuid::new_v4().simple()))
}

pub fn test_config(cache_dir: impl Into<PathBuf>) -> Config {
	Config {
		service: Service {
			http_bind: "127.0.0.1:0".to_string(),
			log_level: "debug".to_string(),
		},
		storage: Storage {
			qdrant: Qdrant {
				url: "http://127.0.0.1:6334".to_string(),
				collection: "professional_profiles".to_string(),
				vector_dim: TEST_VECTOR_DIM,
			},
			cache: Cache { dir: cache_dir.into(), enabled: true },
		},
		providers: talent_config::Providers {
			embedding: EmbeddingProviderConfig {
				provider_id: "stub".to_string(),
				api_base: "http://127.0.0.1:1".to_string(),
				api_key: "test-key".to_string(),
				path: "/v1/embeddings".to_string(),
				model: "stub-embed".to_string(),
				dimensions: TEST_VECTOR_DIM,
				timeout_ms: 1_000,
				default_headers: Default::default(),
			},
			rerank: RerankProviderConfig {
				enabled: true,
				provider_id: "stub".to_string(),
				api_base: "http://127.0.0.1:1".to_string(),
				api_key: "test-key".to_string(),
				path: "/v1/rerank".to_string(),
				model: "stub-rerank".to_string(),
				timeout_ms: 1_000,
				default_headers: Default::default(),
			},
		},
		search: Search { default_top_k: 5, overfetch_factor: 2 },
	}
}

/// Three profiles with distinct skills, work modes, and distances, enough to
/// exercise every filter key.
pub fn sample_profiles() -> Vec<Profile> {
	vec![
		Profile {
			id: 1,
			name: "Ana Silva".to_string(),
			title: "Senior Python Developer".to_string(),
			skills: vec!["Python".to_string(), "React".to_string()],
			location: Location { city: "Palermo".to_string(), distance: 5.0, lat: None, lng: None },
			work_mode: vec!["Remote".to_string()],
			experience: "8 years".to_string(),
			certifications: vec!["AWS Certified Developer".to_string()],
			description: "Backend developer focused on Python services and React tooling."
				.to_string(),
			salary: "5200".to_string(),
			rating: 4.8,
			availability: "Immediate".to_string(),
		},
		Profile {
			id: 2,
			name: "Carlos Mendez".to_string(),
			title: "Platform Engineer".to_string(),
			skills: vec!["Kubernetes".to_string(), "Go".to_string()],
			location: Location {
				city: "Mendoza".to_string(),
				distance: 700.0,
				lat: None,
				lng: None,
			},
			work_mode: vec!["Remote".to_string()],
			experience: "6 years".to_string(),
			certifications: vec!["CKA".to_string()],
			description: "Runs Kubernetes platforms and Go infrastructure tooling.".to_string(),
			salary: "4800".to_string(),
			rating: 4.5,
			availability: "Two weeks".to_string(),
		},
		Profile {
			id: 3,
			name: "Maria Lopez".to_string(),
			title: "Machine Learning Engineer".to_string(),
			skills: vec!["Python".to_string(), "Machine Learning".to_string()],
			location: Location { city: "Belgrano".to_string(), distance: 8.0, lat: None, lng: None },
			work_mode: vec!["Hybrid".to_string()],
			experience: "5 years".to_string(),
			certifications: vec![],
			description: "Builds Python machine learning pipelines and model serving.".to_string(),
			salary: "5600".to_string(),
			rating: 4.6,
			availability: "One month".to_string(),
		},
	]
}
