//! Corpus-wide related-content index

use std::collections::HashMap;

use rayon::prelude::*;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::core::document::Document;
use crate::core::embedding::Embedding;
use crate::core::rank::{top_similar, Neighbor};

#[derive(Debug, Error)]
#[error("duplicate slug '{0}' makes the result index ambiguous")]
pub struct DuplicateSlug(pub String);

/// Per-document neighbor lists keyed by slug, kept in corpus order so
/// serialization is deterministic run to run.
#[derive(Debug)]
pub struct RelatedIndex {
	entries: Vec<(String, Vec<Neighbor>)>,
	by_slug: HashMap<String, usize>,
}

impl RelatedIndex {
	/// Rank every document against the rest of the corpus. `vectors`
	/// must be positionally aligned with `documents`.
	pub fn build(
		documents: &[Document],
		vectors: &[Embedding],
		k: usize,
	) -> Result<Self, DuplicateSlug> {
		debug_assert_eq!(documents.len(), vectors.len());

		let mut by_slug = HashMap::with_capacity(documents.len());
		for (i, doc) in documents.iter().enumerate() {
			if by_slug.insert(doc.slug.clone(), i).is_some() {
				return Err(DuplicateSlug(doc.slug.clone()));
			}
		}

		// Each document's ranking is independent read-only work
		let ranked: Vec<Vec<Neighbor>> = (0..documents.len())
			.into_par_iter()
			.map(|i| top_similar(i, documents, vectors, k))
			.collect();

		let entries = documents
			.iter()
			.zip(ranked)
			.map(|(doc, neighbors)| (doc.slug.clone(), neighbors))
			.collect();

		Ok(Self { entries, by_slug })
	}

	pub fn get(&self, slug: &str) -> Option<&[Neighbor]> {
		self.by_slug.get(slug).map(|&i| self.entries[i].1.as_slice())
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &[Neighbor])> + '_ {
		self.entries
			.iter()
			.map(|(slug, neighbors)| (slug.as_str(), neighbors.as_slice()))
	}

	/// Drop neighbors failing the predicate from every list, keeping
	/// the surviving order intact.
	pub fn retain_neighbors<F>(&mut self, mut keep: F)
	where
		F: FnMut(&Neighbor) -> bool,
	{
		for (_, neighbors) in &mut self.entries {
			neighbors.retain(&mut keep);
		}
	}
}

/// One JSON object, keys in corpus order
impl Serialize for RelatedIndex {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let mut map = serializer.serialize_map(Some(self.entries.len()))?;
		for (slug, neighbors) in &self.entries {
			map.serialize_entry(slug, neighbors)?;
		}
		map.end()
	}
}
