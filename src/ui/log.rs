//! Unified logging system

use chrono::Local;
use colored::*;
use rand::RngExt;
use std::sync::atomic::{AtomicBool, Ordering};

static VERBOSE: AtomicBool = AtomicBool::new(false);

const LOGO: &str = r#"
    __   _           __              __
   / /__(_)___  ____/ /_______  ____/ /
  / //_/ / __ \/ __  / ___/ _ \/ __  /
 / ,< / / / / / /_/ / /  /  __/ /_/ /
/_/|_/_/_/ /_/\__,_/_/   \___/\__,_/  "#;

const SLOGANS: &[&str] = &[
	"Finding your posts' long-lost siblings",
	"Six degrees of cosine separation",
	"Because \"you might also like\" shouldn't be random",
	"Dot products doing the matchmaking",
	"Related posts, minus the vibes-based matching",
	"It actually read all of them",
];

pub fn random_slogan() -> &'static str {
	let idx = rand::rng().random_range(0..SLOGANS.len());
	SLOGANS[idx]
}

pub fn print_logo() {
	println!("{}", LOGO.bright_blue().bold());
	println!("{}", random_slogan().dimmed().italic());
	println!();
}

pub struct Log;

impl Log {
	pub fn set_verbose(enabled: bool) {
		VERBOSE.store(enabled, Ordering::Relaxed);
	}

	pub fn is_verbose() -> bool {
		VERBOSE.load(Ordering::Relaxed)
	}
}

fn stamp() -> ColoredString {
	Local::now().format("%H:%M:%S").to_string().dimmed()
}

pub fn info(msg: &str) {
	println!("[{}] {} {}", stamp(), "ℹ".bright_blue().bold(), msg);
}

pub fn success(msg: &str) {
	println!("[{}] {} {}", stamp(), "✓".bright_green().bold(), msg);
}

pub fn warn(msg: &str) {
	println!("[{}] {} {}", stamp(), "⚠".bright_yellow().bold(), msg);
}

pub fn error(msg: &str) {
	println!("[{}] {} {}", stamp(), "✗".bright_red().bold(), msg);
}

pub fn debug(msg: &str) {
	if Log::is_verbose() {
		println!("[{}] {} {}", stamp(), "⚙".bright_black().bold(), msg.dimmed());
	}
}

pub fn header(text: &str) {
	println!("\n{}", format!("─── {} ───", text).bright_blue().bold());
}

/// Clickable file path (OSC 8 terminal hyperlink)
pub fn path_link(path: &std::path::Path, max_len: usize) -> String {
	let absolute = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

	let uri = if cfg!(windows) {
		let path_str = absolute.to_string_lossy();
		let cleaned = path_str.strip_prefix(r"\\?\").unwrap_or(&path_str);
		format!("file:///{}", cleaned.replace('\\', "/"))
	} else {
		format!("file://{}", absolute.display())
	};

	let filename = path
		.file_name()
		.and_then(|n| n.to_str())
		.unwrap_or("unknown");

	let display_name = if filename.len() > max_len {
		format!(
			"{}...{}",
			&filename[..max_len / 2],
			&filename[filename.len() - (max_len / 2 - 3)..]
		)
	} else {
		filename.to_string()
	};

	format!("\x1b]8;;{}\x1b\\{}\x1b]8;;\x1b\\", uri, display_name)
}
