use serde_json::{Map, Value};

/// The unit handed to the vector index: the rendered document text (what gets
/// embedded) plus the flattened metadata payload.
#[derive(Debug, Clone)]
pub struct StoredDocument {
	pub id: u64,
	pub text: String,
	pub metadata: Map<String, Value>,
	pub vector: Vec<f32>,
}

/// A similarity-search match, ordered by the index's own score.
#[derive(Debug, Clone)]
pub struct RetrievedDocument {
	pub id: u64,
	pub text: String,
	pub metadata: Map<String, Value>,
	pub score: f32,
}
