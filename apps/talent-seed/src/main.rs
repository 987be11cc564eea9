//! Seeds a running API instance with profiles from a JSON file.

use std::{fs, path::PathBuf};

use clap::Parser;
use color_eyre::eyre::eyre;
use serde_json::Value;
use talent_domain::Profile;

#[derive(Debug, Parser)]
#[command(
	version = talent_cli::VERSION,
	rename_all = "kebab",
	styles = talent_cli::styles(),
)]
struct Args {
	/// Base URL of a running talent-api instance.
	#[arg(long, default_value = "http://127.0.0.1:8000")]
	api_base: String,
	/// JSON file holding an array of profiles.
	#[arg(long, short = 'f', value_name = "FILE", default_value = "data/sample_profiles.json")]
	file: PathBuf,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = Args::parse();
	let raw = fs::read_to_string(&args.file)?;
	let profiles: Vec<Profile> = serde_json::from_str(&raw)?;

	println!("Indexing {} profiles against {}", profiles.len(), args.api_base);

	let response = reqwest::Client::new()
		.post(format!("{}/api/profiles/index-batch", args.api_base.trim_end_matches('/')))
		.json(&profiles)
		.send()
		.await?;

	if !response.status().is_success() {
		return Err(eyre!("Indexing failed with status {}: {}", response.status(), response.text().await?));
	}

	let ack: Value = response.json().await?;

	println!("{}", ack.get("message").and_then(Value::as_str).unwrap_or("Done."));

	for profile in &profiles {
		println!("  {}. {} - {}", profile.id, profile.name, profile.title);
	}

	Ok(())
}
