use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Serialize;
use talent_domain::Profile;
use talent_service::{
	CacheClearResponse, IndexBatchResponse, IndexResponse, SearchRequest, SearchResponse,
	ServiceError, StatsResponse,
};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/", get(root))
		.route("/health", get(health))
		.route("/api/rag/search", post(search))
		.route("/api/profiles/index", post(index_profile))
		.route("/api/profiles/index-batch", post(index_batch))
		.route("/api/cache/clear", delete(clear_cache))
		.route("/api/stats", get(stats))
		.with_state(state)
}

#[derive(Debug, Serialize)]
struct ServiceBanner {
	service: &'static str,
	status: &'static str,
	version: &'static str,
	total_profiles: u64,
}

async fn root(State(state): State<AppState>) -> Result<Json<ServiceBanner>, ApiError> {
	let stats = state.service.stats().await?;

	Ok(Json(ServiceBanner {
		service: "TalentHub Search API",
		status: "online",
		version: env!("CARGO_PKG_VERSION"),
		total_profiles: stats.total_profiles,
	}))
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn search(
	State(state): State<AppState>,
	Json(payload): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
	let response = state.service.search(payload).await?;
	Ok(Json(response))
}

async fn index_profile(
	State(state): State<AppState>,
	Json(payload): Json<Profile>,
) -> Result<Json<IndexResponse>, ApiError> {
	let response = state.service.index_profile(payload).await?;
	Ok(Json(response))
}

async fn index_batch(
	State(state): State<AppState>,
	Json(payload): Json<Vec<Profile>>,
) -> Result<Json<IndexBatchResponse>, ApiError> {
	let response = state.service.index_batch(payload).await?;
	Ok(Json(response))
}

async fn clear_cache(State(state): State<AppState>) -> Result<Json<CacheClearResponse>, ApiError> {
	let response = state.service.clear_cache().await?;
	Ok(Json(response))
}

async fn stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, ApiError> {
	let response = state.service.stats().await?;
	Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}

impl ApiError {
	fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, error_code: error_code.into(), message: message.into() }
	}
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::InvalidRequest { message } =>
				Self::new(StatusCode::UNPROCESSABLE_ENTITY, "invalid_request", message),
			ServiceError::Provider { message } =>
				Self::new(StatusCode::BAD_GATEWAY, "provider_error", message),
			ServiceError::Storage { message } =>
				Self::new(StatusCode::INTERNAL_SERVER_ERROR, "storage_error", message),
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };
		(self.status, Json(body)).into_response()
	}
}
