//! Screened corpus documents and the reasons files get left out

use std::path::PathBuf;

use serde_json::{Map, Value};

/// Frontmatter as parsed key/value pairs, kept verbatim for output
pub type Frontmatter = Map<String, Value>;

/// A document that passed screening and participates in ranking
#[derive(Debug, Clone)]
pub struct Document {
	pub slug: String,
	pub path: PathBuf,
	pub frontmatter: Frontmatter,
	pub plain_text: String,
}

impl Document {
	/// Screen a parsed file into a rankable document. Files without a
	/// non-empty `slug`, or marked `draft: true`, are excluded rather
	/// than failing the run.
	pub fn screen(path: PathBuf, frontmatter: Frontmatter, plain_text: String) -> Result<Self, Exclusion> {
		if frontmatter
			.get("draft")
			.and_then(Value::as_bool)
			.unwrap_or(false)
		{
			return Err(Exclusion { path, reason: ExclusionReason::Draft });
		}
		let slug = match frontmatter.get("slug").and_then(Value::as_str) {
			Some(s) if !s.is_empty() => s.to_string(),
			_ => return Err(Exclusion { path, reason: ExclusionReason::MissingSlug }),
		};
		Ok(Self { slug, path, frontmatter, plain_text })
	}
}

/// A file that was read but does not take part in ranking
#[derive(Debug, Clone)]
pub struct Exclusion {
	pub path: PathBuf,
	pub reason: ExclusionReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExclusionReason {
	MissingSlug,
	Draft,
	MalformedFrontmatter,
}

impl ExclusionReason {
	pub fn label(&self) -> &'static str {
		match self {
			Self::MissingSlug => "missing slug",
			Self::Draft => "draft",
			Self::MalformedFrontmatter => "malformed frontmatter",
		}
	}
}
