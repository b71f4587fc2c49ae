//! Greedy word wrap against measured glyph widths.

/// Wraps `text` so every visual line fits `max_width` as reported by `measure`.
///
/// Words are never split. A word wider than `max_width` sits alone on its own line,
/// so a zero width degrades to one word per line instead of failing.
pub fn wrap_line<F>(text: &str, max_width: f32, measure: F) -> Vec<String>
where
    F: Fn(&str) -> f32,
{
    wrap_with_first_width(text, max_width, max_width, measure)
}

/// Like [`wrap_line`], but the first visual line gets `first_width` and every
/// following line gets `rest_width`. Used when text continues on a line that
/// already carries a label.
pub fn wrap_with_first_width<F>(
    text: &str,
    first_width: f32,
    rest_width: f32,
    measure: F,
) -> Vec<String>
where
    F: Fn(&str) -> f32,
{
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let limit = if lines.is_empty() { first_width } else { rest_width };
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };

        if measure(&candidate) <= limit {
            current = candidate;
        } else {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            current = word.to_string();
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
