//! Deterministic text rendering of a ranked result set. No language model is
//! involved; equal inputs always produce byte-equal summaries.

use serde_json::{Map, Value};

const NO_MATCHES: &str =
	"No professionals matched your search. Try broadening the query or relaxing the filters.";

const SECTION_RULE: &str =
	"============================================================";

const SKILLS_SHOWN: usize = 5;

pub fn render_summary(query: &str, profiles: &[&Map<String, Value>]) -> String {
	if profiles.is_empty() {
		return NO_MATCHES.to_string();
	}

	let mut out = format!("Found {} professionals matching '{}'\n\n", profiles.len(), query);

	for (position, profile) in profiles.iter().enumerate() {
		out.push_str(&render_section(position + 1, profile));
	}

	out
}

fn render_section(position: usize, profile: &Map<String, Value>) -> String {
	let name = text_field(profile, "name", "Unknown");
	let title = text_field(profile, "title", "unspecified");
	let (city, distance) = location_summary(profile);
	let experience = text_field(profile, "experience", "unspecified");
	let rating = profile.get("rating").and_then(Value::as_f64).unwrap_or(0.0);
	let skills = list_field(profile, "skills", SKILLS_SHOWN);
	let salary = text_field(profile, "salary", "0");
	let availability = text_field(profile, "availability", "unspecified");
	let work_modes = list_field(profile, "workMode", usize::MAX);

	format!(
		"{SECTION_RULE}\n\
		 {position}. {name} - {title}\n\
		 \x20  Location: {city} ({distance} km from center)\n\
		 \x20  Experience: {experience}\n\
		 \x20  Rating: {rating}/5.0\n\
		 \x20  Skills: {skills}\n\
		 \x20  Salary: ${salary}/month\n\
		 \x20  Availability: {availability}\n\
		 \x20  Work modes: {work_modes}\n\n"
	)
}

fn text_field<'a>(profile: &'a Map<String, Value>, key: &str, fallback: &'a str) -> &'a str {
	profile.get(key).and_then(Value::as_str).unwrap_or(fallback)
}

/// Caps long lists; the full set still travels in the structured payload.
fn list_field(profile: &Map<String, Value>, key: &str, cap: usize) -> String {
	match profile.get(key) {
		Some(Value::Array(items)) if !items.is_empty() => items
			.iter()
			.take(cap)
			.map(|item| item.as_str().map_or_else(|| item.to_string(), str::to_string))
			.collect::<Vec<_>>()
			.join(", "),
		Some(Value::String(text)) if !text.is_empty() => text.clone(),
		_ => "none".to_string(),
	}
}

fn location_summary(profile: &Map<String, Value>) -> (&str, f64) {
	match profile.get("location") {
		Some(Value::Object(location)) => (
			location.get("city").and_then(Value::as_str).unwrap_or("unspecified"),
			location.get("distance").and_then(Value::as_f64).unwrap_or(0.0),
		),
		_ => ("unspecified", 0.0),
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	fn parsed_profile() -> Map<String, Value> {
		let Value::Object(map) = json!({
			"name": "Ana Silva",
			"title": "Product Manager",
			"skills": ["Python", "React", "SQL", "Figma", "Jira", "Excel"],
			"workMode": ["Remote", "Hybrid"],
			"location": { "city": "Palermo", "distance": 5.0 },
			"experience": "9 years",
			"salary": "5500",
			"rating": 4.8,
			"availability": "Immediate",
		}) else {
			unreachable!()
		};

		map
	}

	#[test]
	fn empty_result_uses_the_fixed_message() {
		assert_eq!(render_summary("python developer", &[]), NO_MATCHES);
	}

	#[test]
	fn summary_is_deterministic() {
		let profile = parsed_profile();

		assert_eq!(
			render_summary("python developer", &[&profile]),
			render_summary("python developer", &[&profile]),
		);
	}

	#[test]
	fn sections_carry_the_profile_fields() {
		let profile = parsed_profile();
		let summary = render_summary("python developer", &[&profile]);

		assert!(summary.starts_with("Found 1 professionals matching 'python developer'"));
		assert!(summary.contains("1. Ana Silva - Product Manager"));
		assert!(summary.contains("Location: Palermo (5 km from center)"));
		assert!(summary.contains("Rating: 4.8/5.0"));
		assert!(summary.contains("Salary: $5500/month"));
		assert!(summary.contains("Work modes: Remote, Hybrid"));
	}

	#[test]
	fn skills_cap_at_five() {
		let profile = parsed_profile();
		let summary = render_summary("python developer", &[&profile]);

		assert!(summary.contains("Skills: Python, React, SQL, Figma, Jira\n"));
		assert!(!summary.contains("Excel"));
	}

	#[test]
	fn missing_fields_fall_back_to_placeholders() {
		let mut profile = parsed_profile();

		profile.remove("location");
		profile.remove("skills");

		let summary = render_summary("python developer", &[&profile]);

		assert!(summary.contains("Location: unspecified (0 km from center)"));
		assert!(summary.contains("Skills: none"));
	}
}
