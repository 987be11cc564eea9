//! File-backed response cache: one `<digest>.json` per query+filter
//! combination. Entries never expire; only the explicit clear removes them.
//! Writes replace whole entries atomically (temp file + rename), so two
//! concurrent writers of the same key end up last-writer-wins without
//! corruption.

use std::{
	fs,
	io::ErrorKind,
	path::{Path, PathBuf},
};

use serde_json::Value;
use tracing::warn;

use crate::Result;

pub struct ResponseCache {
	dir: PathBuf,
}
impl ResponseCache {
	pub fn new(dir: impl Into<PathBuf>) -> Self {
		Self { dir: dir.into() }
	}

	pub fn dir(&self) -> &Path {
		&self.dir
	}

	/// A malformed entry is a miss, not an error; it gets overwritten by the
	/// next `put` for the same key.
	pub fn get(&self, key: &str) -> Result<Option<Value>> {
		let raw = match fs::read_to_string(self.entry_path(key)) {
			Ok(raw) => raw,
			Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
			Err(err) => return Err(err.into()),
		};

		match serde_json::from_str(&raw) {
			Ok(value) => Ok(Some(value)),
			Err(err) => {
				warn!(error = %err, key, "Discarding malformed cache entry.");

				Ok(None)
			},
		}
	}

	pub fn put(&self, key: &str, payload: &Value) -> Result<()> {
		fs::create_dir_all(&self.dir)?;

		let path = self.entry_path(key);
		let staging = path.with_extension("json.tmp");

		fs::write(&staging, serde_json::to_vec(payload)?)?;
		fs::rename(&staging, &path)?;

		Ok(())
	}

	/// Removes every entry unconditionally. Returns how many were removed.
	pub fn clear(&self) -> Result<u64> {
		let entries = match fs::read_dir(&self.dir) {
			Ok(entries) => entries,
			Err(err) if err.kind() == ErrorKind::NotFound => return Ok(0),
			Err(err) => return Err(err.into()),
		};
		let mut removed = 0;

		for entry in entries {
			let entry = entry?;

			if entry.file_type()?.is_file() {
				fs::remove_file(entry.path())?;

				removed += 1;
			}
		}

		Ok(removed)
	}

	pub fn len(&self) -> Result<usize> {
		let entries = match fs::read_dir(&self.dir) {
			Ok(entries) => entries,
			Err(err) if err.kind() == ErrorKind::NotFound => return Ok(0),
			Err(err) => return Err(err.into()),
		};
		let mut count = 0;

		for entry in entries {
			let entry = entry?;

			if entry.path().extension().is_some_and(|ext| ext == "json") {
				count += 1;
			}
		}

		Ok(count)
	}

	pub fn is_empty(&self) -> Result<bool> {
		Ok(self.len()? == 0)
	}

	fn entry_path(&self, key: &str) -> PathBuf {
		self.dir.join(format!("{key}.json"))
	}
}

#[cfg(test)]
mod tests {
	use std::env;

	use serde_json::json;
	use uuid::Uuid;

	use super::*;

	fn temp_cache() -> ResponseCache {
		ResponseCache::new(env::temp_dir().join(format!("talent_cache_{}", Uuid::new_v4().simple())))
	}

	#[test]
	fn missing_entry_is_a_miss() {
		let cache = temp_cache();

		assert_eq!(cache.get("deadbeef").expect("get failed"), None);
		assert_eq!(cache.len().expect("len failed"), 0);
	}

	#[test]
	fn round_trips_payloads() {
		let cache = temp_cache();
		let payload = json!({ "response": "hello", "cached": false });

		cache.put("abc123", &payload).expect("put failed");

		assert_eq!(cache.get("abc123").expect("get failed"), Some(payload));
		assert_eq!(cache.len().expect("len failed"), 1);

		let _ = fs::remove_dir_all(cache.dir());
	}

	#[test]
	fn malformed_entry_is_a_miss() {
		let cache = temp_cache();

		fs::create_dir_all(cache.dir()).expect("create dir failed");
		fs::write(cache.dir().join("bad.json"), "{not json").expect("write failed");

		assert_eq!(cache.get("bad").expect("get failed"), None);

		let _ = fs::remove_dir_all(cache.dir());
	}

	#[test]
	fn clear_removes_every_entry() {
		let cache = temp_cache();

		cache.put("one", &json!(1)).expect("put failed");
		cache.put("two", &json!(2)).expect("put failed");

		assert_eq!(cache.clear().expect("clear failed"), 2);
		assert!(cache.is_empty().expect("is_empty failed"));

		let _ = fs::remove_dir_all(cache.dir());
	}
}
