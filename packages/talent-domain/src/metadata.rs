//! Flattening of structured profile attributes into the primitive key/value
//! pairs the vector store accepts, and the best-effort inverse parse.
//!
//! The round trip is lossy by contract: list elements containing commas do not
//! survive `unflatten(flatten(x))`. Callers accept that bound; do not "fix" it
//! here, persisted collections depend on the exact encoding.

use serde_json::{Map, Value, json};

use crate::Profile;

/// Fields stored as comma-joined strings and parsed back into lists.
pub const LIST_FIELDS: [&str; 3] = ["skills", "workMode", "certifications"];

const LIST_SEPARATOR: &str = ", ";

/// Coerces every profile field to a string, integer, real, or boolean.
/// Sequences join with `", "`; the location composite becomes a JSON string.
pub fn flatten(profile: &Profile) -> Map<String, Value> {
	let raw = match json!(profile) {
		Value::Object(map) => map,
		_ => Map::new(),
	};
	let mut flattened = Map::new();

	for (key, value) in raw {
		let primitive = match value {
			Value::Array(items) => {
				let joined = items
					.iter()
					.map(value_as_text)
					.collect::<Vec<_>>()
					.join(LIST_SEPARATOR);

				Value::String(joined)
			},
			Value::Object(_) => Value::String(value.to_string()),
			Value::String(_) | Value::Number(_) | Value::Bool(_) => value,
			other => Value::String(other.to_string()),
		};

		flattened.insert(key, primitive);
	}

	flattened
}

/// Restores the structured view of flattened metadata. Known list fields split
/// on commas; `location` is JSON-decoded, keeping the raw string when decoding
/// fails. Everything else passes through unchanged.
pub fn unflatten(metadata: &Map<String, Value>) -> Map<String, Value> {
	let mut parsed = Map::new();

	for (key, value) in metadata {
		let restored = if LIST_FIELDS.contains(&key.as_str()) {
			split_list(value)
		} else if key == "location" {
			decode_location(value)
		} else {
			value.clone()
		};

		parsed.insert(key.clone(), restored);
	}

	parsed
}

fn split_list(value: &Value) -> Value {
	let Some(text) = value.as_str() else {
		return value.clone();
	};
	let items = text
		.split(',')
		.map(str::trim)
		.filter(|item| !item.is_empty())
		.map(|item| Value::String(item.to_string()))
		.collect();

	Value::Array(items)
}

fn decode_location(value: &Value) -> Value {
	let Some(text) = value.as_str() else {
		return value.clone();
	};

	serde_json::from_str(text).unwrap_or_else(|_| value.clone())
}

fn value_as_text(value: &Value) -> String {
	match value {
		Value::String(text) => text.clone(),
		other => other.to_string(),
	}
}
