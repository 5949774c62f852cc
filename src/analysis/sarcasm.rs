//! Trailing `/s` handling.
//!
//! A comment ending in the marker is reported as sarcastic. The text without
//! the marker is classified on its own and the result is flipped through a
//! fixed table in which Neutral also becomes Negative: sarcasm always reads
//! as net-negative.

use super::sentiment::Sentiment;

pub const MARKER: &str = "/s";

/// Returns the text without its sarcasm marker, or `None` when the comment
/// is not marked. Matching ignores case and surrounding whitespace.
pub fn strip_marker(text: &str) -> Option<&str> {
    let text = text.trim();
    let bytes = text.as_bytes();

    // ASCII bytes never occur inside a multi-byte char, so the slice below
    // always lands on a char boundary.
    if bytes.len() >= MARKER.len() && bytes[bytes.len() - MARKER.len()..].eq_ignore_ascii_case(MARKER.as_bytes()) {
        Some(text[..text.len() - MARKER.len()].trim())
    } else {
        None
    }
}

pub fn reverse(sentiment: Sentiment) -> Sentiment {
    match sentiment {
        Sentiment::Positive => Sentiment::Negative,
        Sentiment::Negative => Sentiment::Positive,
        Sentiment::Neutral => Sentiment::Negative,
    }
}

pub fn display_label(underlying: Sentiment) -> String {
    format!("Sarcastic (Reversed to {})", reverse(underlying))
}
