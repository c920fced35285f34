use std::sync::LazyLock;

use regex::Regex;

static PAGE_FOOTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bPage\s+\d+\s+of\s+\d+\b").expect("invalid regex: page footer"));

/// Drops `Page N of M` footers, collapses whitespace runs and trims.
pub fn clean_text(text: &str) -> String {
    let stripped = PAGE_FOOTER_RE.replace_all(text, " ");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cuts `text` to at most `max` characters without splitting a char.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
