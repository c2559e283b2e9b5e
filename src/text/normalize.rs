//! Whitespace and character-set normalization for extracted text.

use std::sync::LazyLock;

use regex::Regex;

/// Characters outside {word chars, whitespace, `.` `,` `!` `?` `-`}.
static DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s.,!?-]").expect("disallowed-char pattern is valid"));

/// Runs of whitespace, newlines included.
static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Cleans raw extracted text into the form the rest of the pipeline works on.
///
/// Strips every character outside the safe punctuation set, collapses each
/// whitespace run to a single space, and trims the ends. Stripping happens
/// before collapsing: removing a character can leave two spaces adjacent, and
/// the collapse must see them together for the function to be idempotent.
pub fn normalize(text: &str) -> String {
    let stripped = DISALLOWED.replace_all(text, "");
    let collapsed = WHITESPACE_RUN.replace_all(&stripped, " ");
    collapsed.trim().to_string()
}
