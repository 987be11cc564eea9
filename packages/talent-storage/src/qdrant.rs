use std::collections::HashMap;

use qdrant_client::{
	Payload,
	qdrant::{
		CountPointsBuilder, CreateCollectionBuilder, Distance, PointStruct, Query,
		QueryPointsBuilder, ScoredPoint, UpsertPointsBuilder, Value, VectorParamsBuilder,
		point_id::PointIdOptions, value::Kind,
	},
};
use serde_json::{Map, Value as JsonValue};

use crate::{
	Result,
	models::{RetrievedDocument, StoredDocument},
};

/// Payload key holding the rendered document text alongside the profile fields.
pub const TEXT_PAYLOAD_KEY: &str = "document";

pub struct QdrantStore {
	pub client: qdrant_client::Qdrant,
	pub collection: String,
	pub vector_dim: u32,
}
impl QdrantStore {
	pub fn new(cfg: &talent_config::Qdrant) -> Result<Self> {
		let client = qdrant_client::Qdrant::from_url(&cfg.url).build()?;

		Ok(Self { client, collection: cfg.collection.clone(), vector_dim: cfg.vector_dim })
	}

	pub async fn ensure_collection(&self) -> Result<()> {
		if self.client.collection_exists(&self.collection).await? {
			return Ok(());
		}

		let builder = CreateCollectionBuilder::new(self.collection.clone())
			.vectors_config(VectorParamsBuilder::new(u64::from(self.vector_dim), Distance::Cosine));

		self.client.create_collection(builder).await?;

		Ok(())
	}

	/// Upserts keyed by profile id, so re-indexing the same profile replaces
	/// the stored point instead of duplicating it.
	pub async fn upsert(&self, docs: Vec<StoredDocument>) -> Result<()> {
		let mut points = Vec::with_capacity(docs.len());

		for doc in docs {
			let mut payload_map = HashMap::new();

			payload_map.insert(TEXT_PAYLOAD_KEY.to_string(), Value::from(doc.text));

			for (key, value) in doc.metadata {
				payload_map.insert(key, Value::from(value));
			}

			let payload = Payload::from(payload_map);

			points.push(PointStruct::new(doc.id, doc.vector, payload));
		}

		let upsert = UpsertPointsBuilder::new(self.collection.clone(), points).wait(true);

		self.client.upsert_points(upsert).await?;

		Ok(())
	}

	/// Nearest neighbors in the index's own similarity order. Returning fewer
	/// points than requested is not an error.
	pub async fn nearest(&self, vector: &[f32], limit: u64) -> Result<Vec<RetrievedDocument>> {
		let search = QueryPointsBuilder::new(self.collection.clone())
			.query(Query::new_nearest(vector.to_vec()))
			.with_payload(true)
			.limit(limit);
		let response = self.client.query(search).await?;

		Ok(response.result.into_iter().map(retrieved_from_point).collect())
	}

	pub async fn count(&self) -> Result<u64> {
		let request = CountPointsBuilder::new(self.collection.clone()).exact(true);
		let response = self.client.count(request).await?;

		Ok(response.result.map_or(0, |result| result.count))
	}
}

fn retrieved_from_point(point: ScoredPoint) -> RetrievedDocument {
	let id = match point.id.and_then(|id| id.point_id_options) {
		Some(PointIdOptions::Num(number)) => number,
		_ => 0,
	};
	let mut text = String::new();
	let mut metadata = Map::new();

	for (key, value) in point.payload {
		if key == TEXT_PAYLOAD_KEY {
			if let Some(Kind::StringValue(raw)) = value.kind {
				text = raw;
			}
		} else {
			metadata.insert(key, value_to_json(value));
		}
	}

	RetrievedDocument { id, text, metadata, score: point.score }
}

fn value_to_json(value: Value) -> JsonValue {
	match value.kind {
		None | Some(Kind::NullValue(_)) => JsonValue::Null,
		Some(Kind::BoolValue(flag)) => JsonValue::Bool(flag),
		Some(Kind::IntegerValue(number)) => JsonValue::from(number),
		Some(Kind::DoubleValue(number)) => serde_json::Number::from_f64(number)
			.map(JsonValue::Number)
			.unwrap_or(JsonValue::Null),
		Some(Kind::StringValue(text)) => JsonValue::String(text),
		Some(Kind::ListValue(list)) =>
			JsonValue::Array(list.values.into_iter().map(value_to_json).collect()),
		Some(Kind::StructValue(fields)) => JsonValue::Object(
			fields.fields.into_iter().map(|(key, value)| (key, value_to_json(value))).collect(),
		),
	}
}
