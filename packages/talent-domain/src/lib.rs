pub mod document;
pub mod filter;
pub mod metadata;

pub use filter::SearchFilters;

use serde::{Deserialize, Serialize};

/// A professional profile as submitted by indexing callers. Field names pin the
/// public wire format; `salary` stays string-typed on purpose.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
	pub id: i64,
	pub name: String,
	pub title: String,
	pub skills: Vec<String>,
	pub location: Location,
	pub work_mode: Vec<String>,
	pub experience: String,
	pub certifications: Vec<String>,
	pub description: String,
	pub salary: String,
	pub rating: f64,
	pub availability: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
	pub city: String,
	pub distance: f64,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub lat: Option<f64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub lng: Option<f64>,
}
