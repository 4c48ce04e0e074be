use clap::builder::styling::{AnsiColor, Color, Style};
use clap::{builder::Styles, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;

/// Execution provider for ONNX Runtime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Provider {
	/// Auto-detect best available (TensorRT → CUDA → CoreML → XNNPACK → CPU)
	#[default]
	Auto,
	/// CPU only
	Cpu,
	/// NVIDIA CUDA GPU
	Cuda,
	/// NVIDIA TensorRT (optimized inference)
	Tensorrt,
	/// Apple CoreML (macOS only)
	Coreml,
	/// XNNPACK accelerated CPU
	Xnnpack,
}

fn parse_min_score(s: &str) -> Result<f32, String> {
	let val: f32 = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
	if !(-1.0..=1.0).contains(&val) {
		Err(format!("score must be between -1.0 and 1.0, got {}", val))
	} else {
		Ok(val)
	}
}

fn styles() -> Styles {
	Styles::styled()
		.header(Style::new().bold().fg_color(Some(Color::Ansi(AnsiColor::Blue))))
		.usage(Style::new().bold().fg_color(Some(Color::Ansi(AnsiColor::Blue))))
		.literal(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Blue))))
		.placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow))))
		.valid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Blue))))
		.invalid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red))))
}

#[derive(Parser, Debug)]
#[command(
	name = "kindred",
	author,
	version,
	about = "Semantic related-content ranking for Markdown corpora",
	styles = styles(),
	disable_help_subcommand = true,
	after_help = format!(
		"{title}
  {kindred} {rank}     {rank_args}       {rank_desc}
  {kindred} {rank}     {rank_stdout_args}        {rank_stdout_desc}
  {kindred} {preview}  {preview_args}            {preview_desc}
  {kindred} {help}     {help_args}                    {help_desc}",
		title = "Examples:".bright_blue().bold(),
		kindred = "kindred".bright_blue(),
		rank = "rank".yellow(),
		rank_args = "-d ./content/ -r -k 5",
		rank_desc = "Rank posts, write related.json".dimmed(),
		rank_stdout_args = "-d ./blog/ -o -",
		rank_stdout_desc = "Print the index to stdout".dimmed(),
		preview = "preview".yellow(),
		preview_args = "posts/intro.md",
		preview_desc = "Show the text a post embeds as".dimmed(),
		help = "help".yellow(),
		help_args = "rank",
		help_desc = "Show help for rank".dimmed(),
	),
)]
pub struct Cli {
	/// Enable verbose debug output
	#[arg(short = 'v', long = "verbose", global = true)]
	pub verbose: bool,

	/// Execution provider: auto, cpu, cuda, tensorrt, coreml, xnnpack
	#[arg(short = 'p', long = "provider", global = true, default_value = "auto")]
	pub provider: Provider,

	/// Directory holding the embedding model and tokenizer
	#[arg(long = "models-dir", global = true, value_name = "DIR")]
	pub models_dir: Option<PathBuf>,

	/// Path to the embedding model, overriding the models directory
	#[arg(long = "model", global = true, value_name = "FILE")]
	pub model: Option<PathBuf>,

	/// Path to the tokenizer, overriding the models directory
	#[arg(long = "tokenizer", global = true, value_name = "FILE")]
	pub tokenizer: Option<PathBuf>,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
	/// Rank every document against the corpus and write the related index
	Rank {
		/// Directory holding the Markdown corpus
		#[arg(short = 'd', long = "dir", default_value = ".")]
		directory: PathBuf,

		/// Walk subdirectories too
		#[arg(short = 'r', long = "recursive")]
		recursive: bool,

		/// Neighbors to keep per document
		#[arg(short = 'k', long = "top-k", default_value_t = crate::config::DEFAULT_TOP_K)]
		top_k: usize,

		/// Output file, or '-' for stdout
		#[arg(short = 'o', long = "output", default_value = crate::config::DEFAULT_OUTPUT)]
		output: PathBuf,

		/// Drop neighbors scoring below this similarity (-1.0 to 1.0)
		#[arg(
			short = 's',
			long = "score",
			default_value_t = crate::config::DEFAULT_MIN_SCORE,
			value_parser = parse_min_score,
			allow_negative_numbers = true
		)]
		min_score: f32,

		/// Re-embed every document, ignoring the cache
		#[arg(short = 'f', long = "force")]
		force: bool,
	},

	/// Show the normalized plain text one file would be embedded as
	Preview {
		/// Markdown file to preview
		#[arg(value_name = "FILE")]
		file: PathBuf,
	},

	/// Show help for a subcommand
	Help {
		/// Subcommand name
		subcommand: Option<String>,
	},
}
