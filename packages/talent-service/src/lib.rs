pub mod admin;
pub mod index;
pub mod search;

use std::{future::Future, pin::Pin, sync::Arc};

pub use admin::{CacheClearResponse, StatsResponse};
pub use index::{IndexBatchResponse, IndexResponse};
pub use search::{SearchRequest, SearchResponse};

use talent_config::{Config, EmbeddingProviderConfig, RerankProviderConfig};
use talent_providers::{embedding, rerank};
use talent_storage::{
	cache::ResponseCache,
	models::{RetrievedDocument, StoredDocument},
	qdrant::QdrantStore,
};

pub type ServiceResult<T> = Result<T, ServiceError>;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>>;
}

pub trait RerankProvider
where
	Self: Send + Sync,
{
	fn rerank<'a>(
		&'a self,
		cfg: &'a RerankProviderConfig,
		query: &'a str,
		docs: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<f32>>>;
}

/// The vector collaborator: add documents, ask for nearest neighbors, count.
/// Approximate-nearest-neighbor semantics are assumed, not exactness.
pub trait VectorIndex
where
	Self: Send + Sync,
{
	fn upsert<'a>(
		&'a self,
		docs: Vec<StoredDocument>,
	) -> BoxFuture<'a, talent_storage::Result<()>>;

	fn nearest<'a>(
		&'a self,
		vector: Vec<f32>,
		limit: u64,
	) -> BoxFuture<'a, talent_storage::Result<Vec<RetrievedDocument>>>;

	fn count<'a>(&'a self) -> BoxFuture<'a, talent_storage::Result<u64>>;
}

#[derive(Debug)]
pub enum ServiceError {
	InvalidRequest { message: String },
	Provider { message: String },
	Storage { message: String },
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub rerank: Arc<dyn RerankProvider>,
}

pub struct TalentService {
	pub cfg: Config,
	pub index: Arc<dyn VectorIndex>,
	pub cache: ResponseCache,
	pub providers: Providers,
}

struct DefaultProviders;

impl std::fmt::Display for ServiceError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::InvalidRequest { message } => write!(f, "Invalid request: {message}"),
			Self::Provider { message } => write!(f, "Provider error: {message}"),
			Self::Storage { message } => write!(f, "Storage error: {message}"),
		}
	}
}

impl std::error::Error for ServiceError {}

impl From<talent_storage::Error> for ServiceError {
	fn from(err: talent_storage::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}

impl From<color_eyre::Report> for ServiceError {
	fn from(err: color_eyre::Report) -> Self {
		Self::Provider { message: err.to_string() }
	}
}

impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>> {
		Box::pin(embedding::embed(cfg, texts))
	}
}

impl RerankProvider for DefaultProviders {
	fn rerank<'a>(
		&'a self,
		cfg: &'a RerankProviderConfig,
		query: &'a str,
		docs: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<f32>>> {
		Box::pin(rerank::rerank(cfg, query, docs))
	}
}

impl VectorIndex for QdrantStore {
	fn upsert<'a>(
		&'a self,
		docs: Vec<StoredDocument>,
	) -> BoxFuture<'a, talent_storage::Result<()>> {
		Box::pin(Self::upsert(self, docs))
	}

	fn nearest<'a>(
		&'a self,
		vector: Vec<f32>,
		limit: u64,
	) -> BoxFuture<'a, talent_storage::Result<Vec<RetrievedDocument>>> {
		Box::pin(async move { Self::nearest(self, &vector, limit).await })
	}

	fn count<'a>(&'a self) -> BoxFuture<'a, talent_storage::Result<u64>> {
		Box::pin(Self::count(self))
	}
}

impl Providers {
	pub fn new(embedding: Arc<dyn EmbeddingProvider>, rerank: Arc<dyn RerankProvider>) -> Self {
		Self { embedding, rerank }
	}
}

impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);

		Self { embedding: provider.clone(), rerank: provider }
	}
}

impl TalentService {
	pub fn new(cfg: Config, index: Arc<dyn VectorIndex>, cache: ResponseCache) -> Self {
		Self { cfg, index, cache, providers: Providers::default() }
	}

	pub fn with_providers(
		cfg: Config,
		index: Arc<dyn VectorIndex>,
		cache: ResponseCache,
		providers: Providers,
	) -> Self {
		Self { cfg, index, cache, providers }
	}

	pub(crate) async fn embed_texts(&self, texts: &[String]) -> ServiceResult<Vec<Vec<f32>>> {
		let vectors = self.providers.embedding.embed(&self.cfg.providers.embedding, texts).await?;

		if vectors.len() != texts.len() {
			return Err(ServiceError::Provider {
				message: "Embedding provider returned a mismatched vector count.".to_string(),
			});
		}

		let expected = self.cfg.storage.qdrant.vector_dim as usize;

		if vectors.iter().any(|vector| vector.len() != expected) {
			return Err(ServiceError::Provider {
				message: "Embedding vector dimension mismatch.".to_string(),
			});
		}

		Ok(vectors)
	}
}
