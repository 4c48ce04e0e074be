//! Preview command - show the text a file would be embedded as

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::core::Normalizer;
use crate::storage::split_frontmatter;
use crate::ui;

pub fn run(file: &Path) -> Result<()> {
	let raw = fs::read_to_string(file)
		.with_context(|| format!("Failed to read {}", file.display()))?;

	let (frontmatter, body) = split_frontmatter(&raw);
	if frontmatter.is_none() {
		ui::warn("No frontmatter found; treating the whole file as body");
	}

	let plain = Normalizer::new().normalize(body);
	if plain.is_empty() {
		ui::warn("Nothing left after cleanup; this file would embed as empty text");
		return Ok(());
	}

	ui::header(&format!("Embedding text for {}", file.display()));
	println!("{}", plain);
	println!();
	ui::info(&format!(
		"{} characters, {} words",
		plain.len(),
		plain.split_whitespace().count()
	));

	Ok(())
}
