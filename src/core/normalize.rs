//! Plain-text extraction from Markdown bodies ahead of embedding

use pulldown_cmark::{Event, Options, Parser, TagEnd};
use regex::Regex;

/// Section labels that carry no semantic content worth embedding
const BOILERPLATE_HEADINGS: &[&str] = &[
	"tldr",
	"introduction",
	"conclusion",
	"summary",
	"quick setup guide",
	"rule",
	"rules",
];

/// Stateless Markdown cleanup service. Patterns are compiled once at
/// construction and reused across the whole corpus.
pub struct Normalizer {
	import_export: Regex,
	uppercase_label: Regex,
	rule_marker: Regex,
	excess_newlines: Regex,
	multi_space: Regex,
}

impl Normalizer {
	pub fn new() -> Self {
		Self {
			import_export: Regex::new(r#"^(?:import\s+(?:.+\s+from\s+)?['"].+['"];?|export\s.+)$"#)
				.expect("import/export pattern"),
			uppercase_label: Regex::new(r"^[A-Z\s]{4,}$").expect("uppercase label pattern"),
			rule_marker: Regex::new(r"\bRule\d+:").expect("rule marker pattern"),
			excess_newlines: Regex::new(r"\n{3,}").expect("newline run pattern"),
			multi_space: Regex::new(r" {2,}").expect("space run pattern"),
		}
	}

	/// Reduce a raw Markdown body to clean plain prose. Pure function of
	/// the input; returns an empty string when nothing but boilerplate
	/// remains.
	pub fn normalize(&self, raw_body: &str) -> String {
		let flat = flatten_markdown(raw_body);
		let filtered = self.filter_lines(&flat);
		let separated = self.separate_rule_markers(&filtered);
		self.collapse_whitespace(&separated)
	}

	fn filter_lines(&self, text: &str) -> String {
		let kept: Vec<&str> = text
			.lines()
			.filter(|line| {
				let trimmed = line.trim();
				if self.import_export.is_match(trimmed) {
					return false;
				}
				if BOILERPLATE_HEADINGS
					.iter()
					.any(|label| trimmed.eq_ignore_ascii_case(label))
				{
					return false;
				}
				if self.uppercase_label.is_match(line) {
					return false;
				}
				if trimmed.starts_with('|') && trimmed.ends_with('|') {
					return false;
				}
				true
			})
			.collect();
		kept.join("\n")
	}

	/// Repeated `RuleN:` markers crammed onto one line get split so each
	/// marker starts its own line.
	fn separate_rule_markers(&self, text: &str) -> String {
		let marks: Vec<usize> = self.rule_marker.find_iter(text).map(|m| m.start()).collect();
		if marks.len() < 2 {
			return text.to_string();
		}
		let mut out = String::with_capacity(text.len() + marks.len());
		let mut cursor = 0;
		for pair in marks.windows(2) {
			let (prev, next) = (pair[0], pair[1]);
			out.push_str(&text[cursor..next]);
			if !text[prev..next].contains('\n') {
				out.push('\n');
			}
			cursor = next;
		}
		out.push_str(&text[cursor..]);
		out
	}

	fn collapse_whitespace(&self, text: &str) -> String {
		let paragraphs = self.excess_newlines.replace_all(text, "\n\n");
		let spaced = paragraphs.replace('\n', " ");
		self.multi_space.replace_all(&spaced, " ").trim().to_string()
	}
}

impl Default for Normalizer {
	fn default() -> Self {
		Self::new()
	}
}

/// Walk Markdown events and keep only readable text. The tables
/// extension stays off so pipe rows survive as literal lines for the
/// line filters downstream.
fn flatten_markdown(raw: &str) -> String {
	let parser = Parser::new_ext(raw, Options::empty());
	let mut out = String::with_capacity(raw.len());
	for event in parser {
		match event {
			Event::Text(text) => out.push_str(&text),
			Event::Code(code) => out.push_str(&code),
			Event::SoftBreak | Event::HardBreak | Event::Rule => out.push('\n'),
			Event::End(
				TagEnd::Paragraph
				| TagEnd::Heading(_)
				| TagEnd::Item
				| TagEnd::CodeBlock
				| TagEnd::List(_),
			) => out.push('\n'),
			_ => {}
		}
	}
	out
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn strips_markdown_formatting() {
		let n = Normalizer::new();
		let out = n.normalize("# Getting Started\n\nSome **bold** and _italic_ text with `code`.");
		assert_eq!(out, "Getting Started Some bold and italic text with code.");
	}

	#[test]
	fn drops_import_and_export_lines() {
		let n = Normalizer::new();
		let raw = "import Chart from 'astro-chart'\nimport './styles.css'\nexport const layout = 'post'\n\nReal content here.";
		assert_eq!(n.normalize(raw), "Real content here.");
	}

	#[test]
	fn drops_boilerplate_headings_case_insensitive() {
		let n = Normalizer::new();
		let raw = "## TLDR\n\nShort version.\n\n## Conclusion\n\nBye.\n\n## introduction\n\nHi.";
		assert_eq!(n.normalize(raw), "Short version. Bye. Hi.");
	}

	#[test]
	fn drops_uppercase_label_lines() {
		let n = Normalizer::new();
		let raw = "SECTION ONE\nkeep this\nAPI\nalso keep";
		// Three-character labels stay, longer all-caps lines go
		assert_eq!(n.normalize(raw), "keep this API also keep");
	}

	#[test]
	fn drops_table_rows() {
		let n = Normalizer::new();
		let raw = "Before table.\n\n| Name | Value |\n| --- | --- |\n| a | 1 |\n\nAfter table.";
		assert_eq!(n.normalize(raw), "Before table. After table.");
	}

	#[test]
	fn splits_adjacent_rule_markers() {
		let n = Normalizer::new();
		let split = n.separate_rule_markers("Rule1: stay hydrated Rule2: sleep more");
		assert_eq!(split, "Rule1: stay hydrated \nRule2: sleep more");
	}

	#[test]
	fn keeps_rule_markers_already_on_own_lines() {
		let n = Normalizer::new();
		let text = "Rule1: one\nRule2: two";
		assert_eq!(n.separate_rule_markers(text), text);
	}

	#[test]
	fn collapses_whitespace() {
		let n = Normalizer::new();
		let out = n.normalize("first\n\n\n\n\nsecond   third  ");
		assert_eq!(out, "first second third");
	}

	#[test]
	fn idempotent_after_first_pass() {
		let n = Normalizer::new();
		let raw = "## Summary\n\nimport x from 'y'\n\n| a | b |\n\nKept **prose**   here.\n\n\n\nMore.";
		let once = n.normalize(raw);
		assert_eq!(n.normalize(&once), once);
	}

	#[test]
	fn all_boilerplate_yields_empty() {
		let n = Normalizer::new();
		let raw = "## TLDR\n\n| a |\n\nMETADATA BLOCK\n";
		assert_eq!(n.normalize(raw), "");
	}
}
