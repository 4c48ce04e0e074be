//! Batched embedding gateway between the corpus and the model backend

use thiserror::Error;

use crate::core::Embedding;

/// Flattened model output: row-major values with their shape, first
/// dimension = batch size.
#[derive(Debug, Clone)]
pub struct RawEmbeddingBatch {
	pub dims: Vec<usize>,
	pub data: Vec<f32>,
}

/// A text embedding backend. One call embeds the whole batch and
/// returns mean-pooled rows.
pub trait EmbeddingModel {
	fn embed_batch(&mut self, texts: &[String]) -> anyhow::Result<RawEmbeddingBatch>;
}

#[derive(Debug, Error)]
pub enum EmbedError {
	#[error("embedding model failed: {0}")]
	Model(#[from] anyhow::Error),
	#[error("embedding output has malformed shape {dims:?} for {data_len} values")]
	Shape { dims: Vec<usize>, data_len: usize },
	#[error("embedding count mismatch: sent {expected} texts, model returned {returned} rows")]
	CountMismatch { expected: usize, returned: usize },
}

/// Turns raw model output into unit-normalized per-document vectors.
/// The model is an explicit constructor dependency so callers own its
/// lifecycle.
pub struct Embedder<M: EmbeddingModel> {
	model: M,
}

impl<M: EmbeddingModel> Embedder<M> {
	pub fn new(model: M) -> Self {
		Self { model }
	}

	/// Embed every text in one batched model call, positionally aligned
	/// with the input. An empty input never touches the model. Shape or
	/// count mismatches abort rather than risk misaligned scores.
	pub fn embed_all(&mut self, texts: &[String]) -> Result<Vec<Embedding>, EmbedError> {
		if texts.is_empty() {
			return Ok(Vec::new());
		}

		let RawEmbeddingBatch { dims, data } = self.model.embed_batch(texts)?;

		let malformed = dims.len() < 2
			|| dims[1..].iter().product::<usize>() == 0
			|| data.len() != dims.iter().product::<usize>();
		if malformed {
			let data_len = data.len();
			return Err(EmbedError::Shape { dims, data_len });
		}
		if dims[0] != texts.len() {
			return Err(EmbedError::CountMismatch {
				expected: texts.len(),
				returned: dims[0],
			});
		}

		let dim: usize = dims[1..].iter().product();
		Ok(data
			.chunks(dim)
			.map(|row| Embedding::new(row.to_vec()))
			.collect())
	}
}
