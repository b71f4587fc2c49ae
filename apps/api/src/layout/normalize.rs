//! Text Normalizer: reduces model output to the canonical plain-text form the
//! classifier understands.
//!
//! Removes markdown headings, bold/code delimiters and table rows, rewrites every
//! bullet glyph as `"- "`, and collapses runs of blank lines. Total and pure.

use once_cell::sync::Lazy;
use regex::Regex;

/// `#`..`######` at line start, optionally indented up to three columns.
static HEADING_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ \t]{0,3}#{1,6}[ \t]*").expect("heading regex"));

/// A markdown table row: starts and ends with a pipe.
static TABLE_ROW: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ \t]*\|.*\|[ \t]*$").expect("table row regex"));

/// Any bullet glyph at line start, including the UTF-8 bullet mis-decoded as cp1252.
static BULLET_GLYPH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[ \t]*(?:â€¢|[•●▪◦‣∙*\-])[ \t]+").expect("bullet glyph regex")
});

/// Normalizes rewritten resume text.
///
/// Passes repeat until the text stops changing, so `normalize(normalize(x)) == normalize(x)`.
/// Every pass either shortens the text or canonicalises a bullet prefix, so this converges.
pub fn normalize(text: &str) -> String {
    let mut current = normalize_pass(text);
    loop {
        let next = normalize_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn normalize_pass(text: &str) -> String {
    let unified = text.replace("\r\n", "\n").replace('\r', "\n");

    let mut lines: Vec<String> = Vec::new();
    for raw in unified.trim().split('\n') {
        let cleaned = clean_line(raw);
        if cleaned.is_empty() {
            // One blank line between blocks, never a run of them.
            if lines.last().map_or(true, |prev| prev.is_empty()) {
                continue;
            }
            lines.push(String::new());
        } else {
            lines.push(cleaned);
        }
    }

    lines.join("\n").trim().to_string()
}

fn clean_line(line: &str) -> String {
    let mut s = strip_delimiters(line);

    while let Some(marker) = HEADING_MARKER.find(&s) {
        s = s[marker.end()..].to_string();
    }

    if TABLE_ROW.is_match(&s) {
        return String::new();
    }

    let s = BULLET_GLYPH.replace(&s, "- ");
    s.trim_end().to_string()
}

/// Drops code backticks and `**` / `__` emphasis pairs.
fn strip_delimiters(line: &str) -> String {
    let mut s: String = line.chars().filter(|&c| c != '`').collect();
    while s.contains("**") || s.contains("__") {
        s = s.replace("**", "").replace("__", "");
    }
    s
}
