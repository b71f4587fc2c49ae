use once_cell::sync::Lazy;
use regex::Regex;

const MAX_SLUG_CHARS: usize = 40;
const FALLBACK_SLUG: &str = "guest";

static UNSAFE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9_-]+").expect("slug regex"));

/// Filesystem-safe slug: lowercase, runs outside `[a-z0-9_-]` become `_`, at most
/// 40 characters, `"guest"` when nothing is left.
pub fn safe_filename(base: &str) -> String {
    let lowered = base.trim().to_lowercase();
    let replaced = UNSAFE_RUN.replace_all(&lowered, "_");
    let slug: String = replaced.chars().take(MAX_SLUG_CHARS).collect();
    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

/// Slug for an optional display name. Absent or blank names give `"guest"`.
pub fn name_slug(display_name: Option<&str>) -> String {
    match display_name.map(str::trim) {
        Some(name) if !name.is_empty() => safe_filename(name),
        _ => FALLBACK_SLUG.to_string(),
    }
}
