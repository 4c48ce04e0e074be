//! Content-hash keyed embedding cache

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use xxhash_rust::xxh3::xxh3_64;

use crate::config::{CACHE_DIR, CACHE_FILE};
use crate::core::Embedding;
use crate::ui;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Normalized vectors keyed by a hash of the plain text they came
/// from. Editing a document changes its key, so stale vectors are
/// simply never looked up again.
#[derive(Debug, Serialize, Deserialize)]
pub struct EmbeddingCache {
	version: String,
	model: String,
	entries: HashMap<u64, Vec<f32>>,
}

impl EmbeddingCache {
	pub fn empty(model: &str) -> Self {
		Self {
			version: VERSION.to_string(),
			model: model.to_string(),
			entries: HashMap::new(),
		}
	}

	/// Load the cache under `root`, or start fresh when it is missing,
	/// unreadable, or was written by a different version or model. A
	/// bad cache costs recomputation, never a failed run.
	pub fn load_or_empty(root: &Path, model: &str) -> Self {
		let path = cache_path(root);
		let bytes = match fs::read(&path) {
			Ok(bytes) => bytes,
			Err(_) => return Self::empty(model),
		};

		let cache: Self = match rmp_serde::from_slice(&bytes) {
			Ok(cache) => cache,
			Err(e) => {
				ui::debug(&format!("Discarding unreadable cache {}: {}", path.display(), e));
				return Self::empty(model);
			}
		};

		if cache.version != VERSION || cache.model != model {
			ui::debug(&format!(
				"Discarding cache for {} v{} (current: {} v{})",
				cache.model, cache.version, model, VERSION
			));
			return Self::empty(model);
		}

		cache
	}

	pub fn get(&self, text: &str) -> Option<Embedding> {
		self.entries
			.get(&content_key(text))
			.map(|v| Embedding::raw(v.clone()))
	}

	pub fn insert(&mut self, text: &str, embedding: &Embedding) {
		self.entries.insert(content_key(text), embedding.as_slice().to_vec());
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn save(&self, root: &Path) -> Result<()> {
		let path = cache_path(root);
		if let Some(parent) = path.parent() {
			fs::create_dir_all(parent).context("Failed to create cache directory")?;
		}

		let bytes = rmp_serde::to_vec(self).context("Failed to serialize cache")?;
		fs::write(&path, bytes).context("Failed to write cache")?;

		Ok(())
	}
}

fn content_key(text: &str) -> u64 {
	xxh3_64(text.as_bytes())
}

pub fn cache_path(root: &Path) -> PathBuf {
	root.join(CACHE_DIR).join(CACHE_FILE)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn round_trips_through_disk() {
		let dir = tempfile::tempdir().unwrap();
		let mut cache = EmbeddingCache::empty("model.onnx");
		cache.insert("hello world", &Embedding::raw(vec![0.6, 0.8]));
		cache.save(dir.path()).unwrap();

		let loaded = EmbeddingCache::load_or_empty(dir.path(), "model.onnx");
		assert_eq!(loaded.len(), 1);
		let hit = loaded.get("hello world").unwrap();
		assert_eq!(hit.as_slice(), &[0.6, 0.8]);
	}

	#[test]
	fn missing_file_starts_empty() {
		let dir = tempfile::tempdir().unwrap();
		let cache = EmbeddingCache::load_or_empty(dir.path(), "model.onnx");
		assert!(cache.is_empty());
	}

	#[test]
	fn different_model_invalidates() {
		let dir = tempfile::tempdir().unwrap();
		let mut cache = EmbeddingCache::empty("old.onnx");
		cache.insert("text", &Embedding::raw(vec![1.0]));
		cache.save(dir.path()).unwrap();

		let loaded = EmbeddingCache::load_or_empty(dir.path(), "new.onnx");
		assert!(loaded.is_empty());
	}

	#[test]
	fn different_version_invalidates() {
		let dir = tempfile::tempdir().unwrap();
		let mut cache = EmbeddingCache::empty("model.onnx");
		cache.version = "0.0.1".to_string();
		cache.insert("text", &Embedding::raw(vec![1.0]));
		cache.save(dir.path()).unwrap();

		let loaded = EmbeddingCache::load_or_empty(dir.path(), "model.onnx");
		assert!(loaded.is_empty());
	}

	#[test]
	fn corrupt_file_starts_empty() {
		let dir = tempfile::tempdir().unwrap();
		let path = cache_path(dir.path());
		fs::create_dir_all(path.parent().unwrap()).unwrap();
		fs::write(&path, b"definitely not msgpack").unwrap();

		let cache = EmbeddingCache::load_or_empty(dir.path(), "model.onnx");
		assert!(cache.is_empty());
	}

	#[test]
	fn unknown_text_misses() {
		let cache = EmbeddingCache::empty("model.onnx");
		assert!(cache.get("never seen").is_none());
	}
}
