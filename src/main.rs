//! Kindred - semantic related-content ranking for Markdown
//!
//! Embeds a corpus of Markdown documents with an ONNX sentence encoder
//! and writes each document's nearest neighbors to a JSON index.

use anyhow::Result;
use clap::{CommandFactory, Parser};

use kindred::cli::{Cli, Command};
use kindred::commands;
use kindred::config;
use kindred::ui::Log;

fn main() -> Result<()> {
	let cli = Cli::parse();

	Log::set_verbose(cli.verbose);

	if let Some(dir) = cli.models_dir {
		config::set_models_dir(dir);
	}
	if let Some(model) = cli.model {
		config::set_embed_model(model);
	}
	if let Some(tokenizer) = cli.tokenizer {
		config::set_tokenizer(tokenizer);
	}

	match cli.command {
		Command::Rank {
			directory,
			recursive,
			top_k,
			output,
			min_score,
			force,
		} => commands::rank::run(
			&directory,
			recursive,
			top_k,
			&output,
			min_score,
			force,
			cli.provider,
		),
		Command::Preview { file } => commands::preview::run(&file),
		Command::Help { subcommand } => {
			let mut cmd = Cli::command();
			if let Some(sub) = subcommand {
				if let Some(sub_cmd) = cmd.find_subcommand_mut(&sub) {
					sub_cmd.print_help()?;
				} else {
					eprintln!("Unknown subcommand: {}", sub);
					cmd.print_help()?;
				}
			} else {
				cmd.print_help()?;
			}
			Ok(())
		}
	}
}
