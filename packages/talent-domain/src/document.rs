//! Renders a profile into the text blob that gets embedded. Pure and
//! deterministic; the exact field order is part of the retrieval contract.

use crate::Profile;

const EMPTY_LIST: &str = "none";

pub fn render(profile: &Profile) -> String {
	let skills = join_or_placeholder(&profile.skills);
	let certifications = join_or_placeholder(&profile.certifications);
	let work_modes = join_or_placeholder(&profile.work_mode);

	format!(
		"Professional: {name}\n\
		Role: {title}\n\
		Location: {city} ({distance} km from center)\n\
		\n\
		Technical skills: {skills}\n\
		Experience: {experience}\n\
		Certifications: {certifications}\n\
		\n\
		Work modes: {work_modes}\n\
		Availability: {availability}\n\
		Expected salary: {salary} USD/month\n\
		\n\
		Rating: {rating}/5.0\n\
		\n\
		Profile description:\n\
		{description}",
		name = profile.name,
		title = profile.title,
		city = profile.location.city,
		distance = profile.location.distance,
		experience = profile.experience,
		availability = profile.availability,
		salary = profile.salary,
		rating = profile.rating,
		description = profile.description,
	)
}

fn join_or_placeholder(items: &[String]) -> String {
	if items.is_empty() {
		EMPTY_LIST.to_string()
	} else {
		items.join(", ")
	}
}
