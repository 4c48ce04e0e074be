//! Corpus loading and embedding persistence

pub mod cache;
pub mod loader;

pub use cache::{cache_path, EmbeddingCache};
pub use loader::{load_corpus, parse_frontmatter, split_frontmatter, LoadedCorpus};
