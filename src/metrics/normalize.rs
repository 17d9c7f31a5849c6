//! Text Normalization
//!
//! Whitespace collapsing and optional tag stripping applied before counting.

use std::sync::LazyLock;

use regex::Regex;

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

// Innermost `<...>` only; an unclosed `<` is left alone.
static TAG_LIKE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^<>]*>").expect("tag pattern is valid"));

/// Options that change how text is normalized before counting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountOptions {
    /// Replace `<...>` sequences with a space before collapsing whitespace
    pub strip_tags: bool,
}

/// Normalize text for counting.
///
/// Collapses every whitespace run into one space and trims both ends. With
/// `strip_tags`, tag-like sequences are replaced by a space first so the words
/// on either side of an inline tag stay separate.
pub fn normalize(text: &str, options: CountOptions) -> String {
    let stripped = if options.strip_tags {
        TAG_LIKE.replace_all(text, " ")
    } else {
        text.into()
    };

    WHITESPACE_RUN
        .replace_all(&stripped, " ")
        .trim()
        .to_string()
}
