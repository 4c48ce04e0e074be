//! Corpus discovery, frontmatter parsing, and screening

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

use crate::config::{CACHE_DIR, MARKDOWN_EXTENSIONS};
use crate::core::{Document, Exclusion, ExclusionReason, Frontmatter, Normalizer};
use crate::ui;

/// Everything the walk produced: rankable documents in deterministic
/// path order, plus the files screened out and why.
pub struct LoadedCorpus {
	pub documents: Vec<Document>,
	pub exclusions: Vec<Exclusion>,
}

impl LoadedCorpus {
	pub fn count_of(&self, reason: ExclusionReason) -> usize {
		self.exclusions.iter().filter(|e| e.reason == reason).count()
	}
}

pub fn load_corpus(root: &Path, recursive: bool, normalizer: &Normalizer) -> Result<LoadedCorpus> {
	if !root.is_dir() {
		anyhow::bail!("Not a directory: {}", root.display());
	}

	let mut documents = Vec::new();
	let mut exclusions = Vec::new();

	for path in discover(root, recursive) {
		let raw = match fs::read_to_string(&path) {
			Ok(raw) => raw,
			Err(e) => {
				ui::warn(&format!("Skipping {}: {}", path.display(), e));
				continue;
			}
		};

		let (raw_frontmatter, body) = split_frontmatter(&raw);
		let frontmatter = match raw_frontmatter {
			Some(yaml) => match parse_frontmatter(yaml) {
				Ok(map) => map,
				Err(e) => {
					ui::debug(&format!("{}: {}", path.display(), e));
					exclusions.push(Exclusion {
						path,
						reason: ExclusionReason::MalformedFrontmatter,
					});
					continue;
				}
			},
			None => Frontmatter::new(),
		};

		let plain_text = normalizer.normalize(body);
		match Document::screen(path, frontmatter, plain_text) {
			Ok(doc) => documents.push(doc),
			Err(excl) => exclusions.push(excl),
		}
	}

	Ok(LoadedCorpus { documents, exclusions })
}

/// Markdown files under `root`, sorted by path so corpus order (and
/// with it tie-breaks and output order) is stable across runs.
fn discover(root: &Path, recursive: bool) -> Vec<PathBuf> {
	let walker = if recursive { WalkDir::new(root) } else { WalkDir::new(root).max_depth(1) };

	let mut paths: Vec<PathBuf> = walker
		.into_iter()
		.filter_map(|e| e.ok())
		.filter(|e| e.file_type().is_file())
		.map(|e| e.into_path())
		.filter(|p| is_markdown(p) && !is_cache_path(p))
		.collect();
	paths.sort();
	paths
}

fn is_markdown(path: &Path) -> bool {
	path.extension()
		.and_then(|e| e.to_str())
		.map(|ext| MARKDOWN_EXTENSIONS.iter().any(|m| m.eq_ignore_ascii_case(ext)))
		.unwrap_or(false)
}

fn is_cache_path(path: &Path) -> bool {
	path.components().any(|c| c.as_os_str() == CACHE_DIR)
}

/// Split a raw file into its YAML frontmatter block and the body.
/// Handles both `\n` and `\r\n` delimited fences.
pub fn split_frontmatter(content: &str) -> (Option<&str>, &str) {
	if let Some(rest) = content.strip_prefix("---\n") {
		if let Some(end) = rest.find("\n---\n") {
			return (Some(&rest[..end]), &rest[end + 5..]);
		}
	}
	if let Some(rest) = content.strip_prefix("---\r\n") {
		if let Some(end) = rest.find("\r\n---\r\n") {
			return (Some(&rest[..end]), &rest[end + 7..]);
		}
	}
	(None, content)
}

/// Parse frontmatter YAML into JSON-shaped key/value pairs. Anything
/// that is not a mapping counts as malformed.
pub fn parse_frontmatter(yaml: &str) -> Result<Frontmatter> {
	let value: serde_yaml::Value = serde_yaml::from_str(yaml).context("Invalid YAML")?;
	match serde_json::to_value(value).context("Unrepresentable YAML value")? {
		serde_json::Value::Object(map) => Ok(map),
		_ => anyhow::bail!("Frontmatter is not a mapping"),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::fs;

	fn write(dir: &Path, name: &str, content: &str) {
		fs::write(dir.join(name), content).unwrap();
	}

	fn post(slug: &str, body: &str) -> String {
		format!("---\nslug: {slug}\ntitle: A post\n---\n\n{body}\n")
	}

	#[test]
	fn split_plain_frontmatter() {
		let (fm, body) = split_frontmatter("---\nslug: a\n---\nBody here");
		assert_eq!(fm, Some("slug: a"));
		assert_eq!(body, "Body here");
	}

	#[test]
	fn split_windows_line_endings() {
		let (fm, body) = split_frontmatter("---\r\nslug: a\r\n---\r\nBody");
		assert_eq!(fm, Some("slug: a"));
		assert_eq!(body, "Body");
	}

	#[test]
	fn split_without_frontmatter() {
		let (fm, body) = split_frontmatter("Just body text");
		assert_eq!(fm, None);
		assert_eq!(body, "Just body text");
	}

	#[test]
	fn split_unterminated_fence_is_all_body() {
		let raw = "---\nslug: a\nno closing fence";
		let (fm, body) = split_frontmatter(raw);
		assert_eq!(fm, None);
		assert_eq!(body, raw);
	}

	#[test]
	fn parse_rejects_non_mapping() {
		assert!(parse_frontmatter("just a string").is_err());
		assert!(parse_frontmatter("- a\n- b").is_err());
	}

	#[test]
	fn parse_keeps_nested_values() {
		let fm = parse_frontmatter("slug: a\ntags:\n  - x\n  - y").unwrap();
		assert_eq!(fm["tags"], serde_json::json!(["x", "y"]));
	}

	#[test]
	fn loads_markdown_files_in_path_order() {
		let dir = tempfile::tempdir().unwrap();
		write(dir.path(), "b.md", &post("bravo", "Second"));
		write(dir.path(), "a.mdx", &post("alpha", "First"));
		write(dir.path(), "notes.txt", "not markdown");

		let corpus = load_corpus(dir.path(), false, &Normalizer::new()).unwrap();
		let slugs: Vec<&str> = corpus.documents.iter().map(|d| d.slug.as_str()).collect();
		assert_eq!(slugs, vec!["alpha", "bravo"]);
		assert!(corpus.exclusions.is_empty());
	}

	#[test]
	fn recursion_is_opt_in() {
		let dir = tempfile::tempdir().unwrap();
		write(dir.path(), "top.md", &post("top", "Top"));
		fs::create_dir(dir.path().join("nested")).unwrap();
		write(&dir.path().join("nested"), "deep.md", &post("deep", "Deep"));

		let flat = load_corpus(dir.path(), false, &Normalizer::new()).unwrap();
		assert_eq!(flat.documents.len(), 1);

		let deep = load_corpus(dir.path(), true, &Normalizer::new()).unwrap();
		assert_eq!(deep.documents.len(), 2);
	}

	#[test]
	fn screens_out_drafts_and_missing_slugs() {
		let dir = tempfile::tempdir().unwrap();
		write(dir.path(), "good.md", &post("good", "Body"));
		write(dir.path(), "draft.md", "---\nslug: wip\ndraft: true\n---\nBody");
		write(dir.path(), "unslugged.md", "---\ntitle: No slug\n---\nBody");
		write(dir.path(), "broken.md", "---\n[not yaml\n---\nBody");

		let corpus = load_corpus(dir.path(), false, &Normalizer::new()).unwrap();
		assert_eq!(corpus.documents.len(), 1);
		assert_eq!(corpus.documents[0].slug, "good");
		assert_eq!(corpus.count_of(ExclusionReason::Draft), 1);
		assert_eq!(corpus.count_of(ExclusionReason::MissingSlug), 1);
		assert_eq!(corpus.count_of(ExclusionReason::MalformedFrontmatter), 1);
	}

	#[test]
	fn cache_directory_is_never_scanned() {
		let dir = tempfile::tempdir().unwrap();
		write(dir.path(), "real.md", &post("real", "Body"));
		fs::create_dir(dir.path().join(CACHE_DIR)).unwrap();
		write(&dir.path().join(CACHE_DIR), "stray.md", &post("stray", "Body"));

		let corpus = load_corpus(dir.path(), true, &Normalizer::new()).unwrap();
		assert_eq!(corpus.documents.len(), 1);
		assert_eq!(corpus.documents[0].slug, "real");
	}

	#[test]
	fn normalizes_body_into_plain_text() {
		let dir = tempfile::tempdir().unwrap();
		write(
			dir.path(),
			"post.md",
			&post("styled", "## Introduction\n\nSome **bold** prose."),
		);

		let corpus = load_corpus(dir.path(), false, &Normalizer::new()).unwrap();
		assert_eq!(corpus.documents[0].plain_text, "Some bold prose.");
	}
}
