//! Pairwise ranking of documents by embedding similarity

use std::cmp::Ordering;

use serde::Serialize;

use crate::core::document::{Document, Frontmatter};
use crate::core::embedding::Embedding;

/// One ranked neighbor of a source document. `path` and `similarity`
/// are guaranteed fields; everything else is the target's frontmatter
/// passed through untouched.
#[derive(Debug, Clone, Serialize)]
pub struct Neighbor {
	pub path: String,
	pub similarity: f32,
	#[serde(flatten)]
	pub extra: Frontmatter,
}

impl Neighbor {
	fn of(target: &Document, similarity: f32) -> Self {
		let mut extra = target.frontmatter.clone();
		// The guaranteed fields win over same-named frontmatter keys
		extra.remove("path");
		extra.remove("similarity");
		Self {
			path: target.path.to_string_lossy().into_owned(),
			similarity,
			extra,
		}
	}
}

/// Round half away from zero to two decimals. Scores are rounded before
/// sorting, so near-equal pairs become explicit ties broken by corpus
/// order.
pub fn round2(x: f32) -> f32 {
	(x * 100.0).round() / 100.0
}

/// Rank every other document against `source`, best first. Vectors must
/// be positionally aligned with `documents` and unit-normalized.
pub fn top_similar(
	source: usize,
	documents: &[Document],
	vectors: &[Embedding],
	k: usize,
) -> Vec<Neighbor> {
	let mut scored: Vec<(usize, f32)> = (0..documents.len())
		.filter(|&i| i != source)
		.map(|i| (i, round2(vectors[source].similarity(&vectors[i]))))
		.collect();
	// Stable sort keeps corpus order on equal rounded scores
	scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
	scored.truncate(k);
	scored
		.into_iter()
		.map(|(i, score)| Neighbor::of(&documents[i], score))
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::{json, Value};
	use std::path::PathBuf;

	fn doc(slug: &str, extra: &[(&str, Value)]) -> Document {
		let mut frontmatter: Frontmatter = extra
			.iter()
			.map(|(k, v)| (k.to_string(), v.clone()))
			.collect();
		frontmatter.insert("slug".into(), json!(slug));
		Document {
			slug: slug.to_string(),
			path: PathBuf::from(format!("posts/{slug}.md")),
			frontmatter,
			plain_text: String::new(),
		}
	}

	fn corpus(vectors: &[Vec<f32>]) -> (Vec<Document>, Vec<Embedding>) {
		let docs = (0..vectors.len())
			.map(|i| doc(&format!("doc-{i}"), &[]))
			.collect();
		let embeddings = vectors.iter().cloned().map(Embedding::raw).collect();
		(docs, embeddings)
	}

	#[test]
	fn rounds_half_away_from_zero() {
		assert_eq!(round2(0.805), 0.81);
		assert_eq!(round2(-0.805), -0.81);
		assert_eq!(round2(0.804), 0.8);
	}

	#[test]
	fn excludes_self_and_caps_at_k() {
		let (docs, vecs) = corpus(&[
			vec![1.0, 0.0],
			vec![0.8, 0.6],
			vec![0.6, 0.8],
			vec![0.0, 1.0],
		]);
		let ranked = top_similar(0, &docs, &vecs, 2);
		assert_eq!(ranked.len(), 2);
		assert!(ranked.iter().all(|n| n.path != "posts/doc-0.md"));
	}

	#[test]
	fn returns_fewer_than_k_for_small_corpus() {
		let (docs, vecs) = corpus(&[vec![1.0, 0.0], vec![0.0, 1.0]]);
		let ranked = top_similar(0, &docs, &vecs, 5);
		assert_eq!(ranked.len(), 1);
	}

	#[test]
	fn sorted_descending() {
		let (docs, vecs) = corpus(&[
			vec![1.0, 0.0],
			vec![0.0, 1.0],
			vec![0.8, 0.6],
			vec![-1.0, 0.0],
		]);
		let ranked = top_similar(0, &docs, &vecs, 10);
		let scores: Vec<f32> = ranked.iter().map(|n| n.similarity).collect();
		assert_eq!(scores, vec![0.8, 0.0, -1.0]);
	}

	#[test]
	fn rounded_ties_keep_corpus_order() {
		// 0.799 and 0.801 both round to 0.80; the earlier document wins
		let (docs, vecs) = corpus(&[
			vec![1.0, 0.0],
			vec![0.799, 0.601_333],
			vec![0.801, 0.598_664],
		]);
		let ranked = top_similar(0, &docs, &vecs, 2);
		assert_eq!(ranked[0].path, "posts/doc-1.md");
		assert_eq!(ranked[1].path, "posts/doc-2.md");
		assert_eq!(ranked[0].similarity, ranked[1].similarity);
	}

	#[test]
	fn neighbor_carries_frontmatter_with_path_overridden() {
		let mut target = doc("beta", &[("title", json!("Beta Post")), ("tags", json!(["a", "b"]))]);
		target
			.frontmatter
			.insert("path".into(), json!("stale/location.md"));
		let source = doc("alpha", &[]);
		let docs = vec![source, target];
		// 0.5 survives the f32 -> JSON float conversion exactly
		let vecs = vec![Embedding::raw(vec![1.0, 0.0]), Embedding::raw(vec![0.5, 0.866])];

		let ranked = top_similar(0, &docs, &vecs, 1);
		let value = serde_json::to_value(&ranked[0]).unwrap();
		assert_eq!(value["path"], json!("posts/beta.md"));
		assert_eq!(value["similarity"], json!(0.5));
		assert_eq!(value["title"], json!("Beta Post"));
		assert_eq!(value["tags"], json!(["a", "b"]));
		assert_eq!(value["slug"], json!("beta"));
	}
}
