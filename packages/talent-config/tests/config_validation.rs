use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::Value;

const SAMPLE_CONFIG_TOML: &str = r#"
[service]
http_bind = "127.0.0.1:8000"

[storage.qdrant]
url        = "http://127.0.0.1:6334"
collection = "professional_profiles"
vector_dim = 1024

[storage.cache]
dir = "cache/search"

[providers.embedding]
provider_id = "test"
api_base    = "http://127.0.0.1:1/"
api_key     = "test-key"
path        = "/v1/embeddings"
model       = "test-embed"
dimensions  = 1024
timeout_ms  = 1000

[providers.rerank]
enabled     = true
provider_id = "test"
api_base    = "http://127.0.0.1:1"
api_key     = "test-key"
path        = "/v1/rerank"
model       = "test-rerank"
timeout_ms  = 1000

[search]
"#;

fn sample_value() -> Value {
	toml::from_str(SAMPLE_CONFIG_TOML).expect("Failed to parse sample config.")
}

fn write_temp_config(payload: String) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("talent_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn load_mutated(mutate: impl FnOnce(&mut Value)) -> talent_config::Result<talent_config::Config> {
	let mut value = sample_value();

	mutate(&mut value);

	let payload = toml::to_string(&value).expect("Failed to render test config.");
	let path = write_temp_config(payload);
	let result = talent_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	result
}

fn table_at<'a>(value: &'a mut Value, keys: &[&str]) -> &'a mut toml::Table {
	let mut current = value;

	for key in keys {
		current = current
			.as_table_mut()
			.and_then(|table| table.get_mut(*key))
			.expect("Sample config must include the mutated table.");
	}

	current.as_table_mut().expect("Mutated node must be a table.")
}

#[test]
fn loads_and_normalizes_a_valid_config() {
	let config = load_mutated(|_| {}).expect("Sample config must load.");

	assert_eq!(config.service.log_level, "info");
	assert!(config.storage.cache.enabled);
	assert_eq!(config.search.default_top_k, 5);
	assert_eq!(config.search.overfetch_factor, 2);
	// Trailing slash stripped during normalization.
	assert_eq!(config.providers.embedding.api_base, "http://127.0.0.1:1");
}

#[test]
fn embedding_dimensions_must_match_vector_dim() {
	let err = load_mutated(|value| {
		table_at(value, &["providers", "embedding"])
			.insert("dimensions".to_string(), Value::Integer(768));
	})
	.expect_err("Expected dimension mismatch error.");

	assert!(
		err.to_string()
			.contains("providers.embedding.dimensions must match storage.qdrant.vector_dim."),
		"Unexpected error message: {err}"
	);
}

#[test]
fn default_top_k_must_be_positive() {
	let err = load_mutated(|value| {
		table_at(value, &["search"]).insert("default_top_k".to_string(), Value::Integer(0));
	})
	.expect_err("Expected top_k validation error.");

	assert!(
		err.to_string().contains("search.default_top_k must be greater than zero."),
		"Unexpected error message: {err}"
	);
}

#[test]
fn embedding_api_key_must_be_non_empty() {
	let err = load_mutated(|value| {
		table_at(value, &["providers", "embedding"])
			.insert("api_key".to_string(), Value::String(" ".to_string()));
	})
	.expect_err("Expected api_key validation error.");

	assert!(
		err.to_string().contains("providers.embedding.api_key must be non-empty."),
		"Unexpected error message: {err}"
	);
}

#[test]
fn rerank_api_key_is_only_required_when_enabled() {
	let err = load_mutated(|value| {
		table_at(value, &["providers", "rerank"])
			.insert("api_key".to_string(), Value::String(String::new()));
	})
	.expect_err("Expected rerank api_key validation error.");

	assert!(
		err.to_string()
			.contains("providers.rerank.api_key must be non-empty when rerank is enabled."),
		"Unexpected error message: {err}"
	);

	load_mutated(|value| {
		let rerank = table_at(value, &["providers", "rerank"]);

		rerank.insert("enabled".to_string(), Value::Boolean(false));
		rerank.insert("api_key".to_string(), Value::String(String::new()));
	})
	.expect("Disabled rerank must not require a key.");
}
