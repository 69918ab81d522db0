//! Word-boundary title truncation.
//!
//! Navigation entries on Kindle devices have very little room, so section and
//! article titles are cut down before they reach the templates:
//!
//! - `"A fairly short headline"` with `max = 40` → unchanged
//! - `"The quick brown fox jumps over the lazy dog"` with `max = 22`
//!   → `"The quick brown fox..."`
//!
//! Lengths are counted in `char`s so multi-byte titles are never split inside
//! a code point.

/// Marker appended to every truncated title.
pub const ELLIPSIS: &str = "...";

/// Truncate `text` to at most `max` characters at a word boundary.
///
/// The first `max` characters are split on whitespace and the last token is
/// dropped (it may have been cut mid-word), then the rest is rejoined with
/// single spaces and [`ELLIPSIS`] is appended. A prefix holding a single
/// unbroken token therefore shortens to just `"..."`.
pub fn shorten(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }

    let prefix: String = text.chars().take(max).collect();
    let mut words: Vec<&str> = prefix.split_whitespace().collect();
    words.pop();

    format!("{}{}", words.join(" "), ELLIPSIS)
}
