//! Structured post-filters applied after vector retrieval. Filters are
//! AND-composed across keys and OR-composed within a multi-valued key, and are
//! evaluated against the parsed (unflattened) metadata view.
//!
//! A candidate missing the field an active filter inspects is excluded. That is
//! one consistent conservative policy for all three keys.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchFilters {
	pub skills: Option<Vec<String>>,
	pub max_distance: Option<f64>,
	pub work_mode: Option<Vec<String>>,
}

impl SearchFilters {
	pub fn is_empty(&self) -> bool {
		self.skills.is_none() && self.max_distance.is_none() && self.work_mode.is_none()
	}

	/// True iff the candidate satisfies every present filter key.
	pub fn matches(&self, parsed: &Map<String, Value>) -> bool {
		if let Some(wanted) = self.skills.as_deref()
			&& !wanted.is_empty()
			&& !contains_any(parsed.get("skills"), wanted)
		{
			return false;
		}
		if let Some(ceiling) = self.max_distance {
			match candidate_distance(parsed) {
				Some(distance) if distance <= ceiling => {},
				_ => return false,
			}
		}
		if let Some(wanted) = self.work_mode.as_deref()
			&& !wanted.is_empty()
			&& !contains_any(parsed.get("workMode"), wanted)
		{
			return false;
		}

		true
	}
}

fn contains_any(value: Option<&Value>, wanted: &[String]) -> bool {
	let Some(Value::Array(items)) = value else {
		return false;
	};

	items
		.iter()
		.filter_map(Value::as_str)
		.any(|item| wanted.iter().any(|candidate| candidate == item))
}

fn candidate_distance(parsed: &Map<String, Value>) -> Option<f64> {
	parsed.get("location")?.get("distance")?.as_f64()
}
