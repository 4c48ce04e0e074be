//! # Embedding Models
//!
//! The gateway that batches corpus texts plus the ONNX backend behind it.

pub mod embedder;
pub mod text;

pub use embedder::{EmbedError, Embedder, EmbeddingModel, RawEmbeddingBatch};
pub use text::TextModel;
