//! Rank command - embed the corpus and write the related index

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use std::time::Instant;

use crate::config;
use crate::core::{Document, Embedding, ExclusionReason, Normalizer, RelatedIndex};
use crate::models::{Embedder, TextModel};
use crate::runtime::Provider;
use crate::storage::{load_corpus, EmbeddingCache, LoadedCorpus};
use crate::ui;

#[allow(clippy::too_many_arguments)]
pub fn run(
	dir: &Path,
	recursive: bool,
	top_k: usize,
	output: &Path,
	min_score: f32,
	force: bool,
	provider: Provider,
) -> Result<()> {
	let start = Instant::now();

	ui::print_logo();
	ui::info(&format!("Loading corpus: {}", dir.display()));

	let normalizer = Normalizer::new();
	let corpus = load_corpus(dir, recursive, &normalizer)?;
	report_exclusions(&corpus);

	if corpus.documents.is_empty() {
		ui::warn("No rankable documents found");
	} else {
		ui::success(&format!("{} documents in corpus", corpus.documents.len()));
	}

	let embeddings = embed_corpus(&corpus.documents, dir, force, provider)?;

	let mut index = RelatedIndex::build(&corpus.documents, &embeddings, top_k)?;
	if min_score > config::DEFAULT_MIN_SCORE {
		index.retain_neighbors(|n| n.similarity >= min_score);
	}

	write_index(&index, output)?;

	println!();
	ui::success(&format!(
		"Ranked {} documents in {:.1}s",
		index.len(),
		start.elapsed().as_secs_f32()
	));

	Ok(())
}

fn report_exclusions(corpus: &LoadedCorpus) {
	if corpus.exclusions.is_empty() {
		return;
	}

	let mut parts = Vec::new();
	for reason in [
		ExclusionReason::Draft,
		ExclusionReason::MissingSlug,
		ExclusionReason::MalformedFrontmatter,
	] {
		let count = corpus.count_of(reason);
		if count > 0 {
			parts.push(format!("{} {}", count, reason.label()));
		}
	}
	ui::info(&format!(
		"Excluded {} files ({})",
		corpus.exclusions.len(),
		parts.join(", ")
	));

	for excl in &corpus.exclusions {
		ui::debug(&format!("{}: {}", excl.path.display(), excl.reason.label()));
	}
}

/// Resolve an embedding for every document, positionally aligned.
/// Cached vectors are reused; the model is loaded and invoked once,
/// only when at least one document misses.
fn embed_corpus(
	documents: &[Document],
	root: &Path,
	force: bool,
	provider: Provider,
) -> Result<Vec<Embedding>> {
	let model_name = config::embed_model_name();
	let mut cache = if force {
		EmbeddingCache::empty(&model_name)
	} else {
		EmbeddingCache::load_or_empty(root, &model_name)
	};

	let mut embeddings: Vec<Option<Embedding>> = documents
		.iter()
		.map(|doc| cache.get(&doc.plain_text))
		.collect();
	let missing: Vec<usize> = embeddings
		.iter()
		.enumerate()
		.filter(|(_, e)| e.is_none())
		.map(|(i, _)| i)
		.collect();

	if missing.is_empty() {
		if !documents.is_empty() {
			ui::info(&format!("All {} embeddings cached", documents.len()));
		}
	} else {
		ui::info(&format!(
			"Embedding {} documents ({} cached)",
			missing.len(),
			documents.len() - missing.len()
		));

		let model_path = config::get_embed_model_path()
			.context("No models directory found. Use --models-dir or set KINDRED_MODELS_DIR")?;
		let tokenizer_path = config::get_tokenizer_path()
			.context("No models directory found. Use --models-dir or set KINDRED_MODELS_DIR")?;
		if !model_path.exists() {
			anyhow::bail!("Embedding model not found: {}", model_path.display());
		}
		if !tokenizer_path.exists() {
			anyhow::bail!("Tokenizer not found: {}", tokenizer_path.display());
		}

		let load_start = Instant::now();
		let model = TextModel::load(&model_path, &tokenizer_path, provider)?;
		ui::success(&format!(
			"Model ready in {:.2}s",
			load_start.elapsed().as_secs_f32()
		));

		let texts: Vec<String> = missing
			.iter()
			.map(|&i| documents[i].plain_text.clone())
			.collect();
		let fresh = Embedder::new(model).embed_all(&texts)?;

		for (&idx, embedding) in missing.iter().zip(fresh.iter()) {
			cache.insert(&documents[idx].plain_text, embedding);
			embeddings[idx] = Some(embedding.clone());
		}

		if let Err(e) = cache.save(root) {
			ui::warn(&format!("Could not save embedding cache: {}", e));
		}
	}

	Ok(embeddings.into_iter().flatten().collect())
}

fn write_index(index: &RelatedIndex, output: &Path) -> Result<()> {
	let json = serde_json::to_string_pretty(index).context("Failed to serialize index")?;

	if output == Path::new("-") {
		println!("{}", json);
	} else {
		fs::write(output, format!("{}\n", json))
			.with_context(|| format!("Failed to write {}", output.display()))?;
		ui::success(&format!("Wrote {}", ui::path_link(output, 50)));
	}

	Ok(())
}
