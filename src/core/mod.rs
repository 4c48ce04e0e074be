//! Core domain types

pub mod document;
pub mod embedding;
pub mod normalize;
pub mod rank;
pub mod related;

pub use document::{Document, Exclusion, ExclusionReason, Frontmatter};
pub use embedding::Embedding;
pub use normalize::Normalizer;
pub use rank::{round2, top_similar, Neighbor};
pub use related::{DuplicateSlug, RelatedIndex};
