//! Text normalization and splitting helpers shared by the pipeline stages.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

const LIGATURES: [(char, &str); 7] = [
    ('\u{FB00}', "ff"),
    ('\u{FB01}', "fi"),
    ('\u{FB02}', "fl"),
    ('\u{FB03}', "ffi"),
    ('\u{FB04}', "ffl"),
    ('\u{FB05}', "st"),
    ('\u{FB06}', "st"),
];

static HYPHENATED_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Za-z])-(?:[ \t]*\n[ \t]*|[ \t]+)([a-z])").expect("valid regex"));

static SPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t\u{00A0}]+").expect("valid regex"));

/// Normalize the text of a single span.
///
/// Applies NFC, expands ligatures, drops replacement and private-use
/// characters, and collapses all whitespace to single spaces.
pub fn normalize_span_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.nfc() {
        if let Some((_, expanded)) = LIGATURES.iter().find(|(lig, _)| *lig == c) {
            out.push_str(expanded);
        } else if c == '\u{FFFD}' || is_private_use(c) {
            continue;
        } else if c.is_whitespace() {
            out.push(' ');
        } else {
            out.push(c);
        }
    }
    SPACE_RUN.replace_all(out.trim(), " ").into_owned()
}

/// Tidy an accumulated section body: rejoin words hyphenated across span
/// boundaries and trim each paragraph.
pub fn tidy_body(body: &str) -> String {
    let joined = HYPHENATED_BREAK.replace_all(body, "$1$2");
    joined
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn is_private_use(c: char) -> bool {
    let code = c as u32;
    (0xE000..=0xF8FF).contains(&code)
        || (0xF0000..=0xFFFFD).contains(&code)
        || (0x100000..=0x10FFFD).contains(&code)
}

/// Return at most `max_chars` characters of `text`, cut on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Split text into sentences ending in `.`, `!` or `?` followed by whitespace.
///
/// Terminal punctuation stays with its sentence; trailing text without
/// punctuation forms the last sentence.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        let at_boundary = match chars.peek() {
            Some((_, next)) => next.is_whitespace(),
            None => true,
        };
        if at_boundary {
            let end = idx + c.len_utf8();
            let sentence = text[start..end].trim();
            if !sentence.is_empty() {
                sentences.push(sentence);
            }
            start = end;
        }
    }

    let rest = text[start..].trim();
    if !rest.is_empty() {
        sentences.push(rest);
    }
    sentences
}

/// Split text into consecutive windows of `window` characters.
pub fn char_windows(text: &str, window: usize) -> Vec<&str> {
    let window = window.max(1);
    let boundaries: Vec<usize> = text
        .char_indices()
        .map(|(idx, _)| idx)
        .step_by(window)
        .chain(std::iter::once(text.len()))
        .collect();

    boundaries
        .windows(2)
        .map(|pair| &text[pair[0]..pair[1]])
        .filter(|chunk| !chunk.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_span_text() {
        assert_eq!(normalize_span_text("  ﬁne   dining\t\n"), "fine dining");
        assert_eq!(normalize_span_text("caf\u{0065}\u{0301}"), "café");
        assert_eq!(normalize_span_text("a\u{FFFD}b\u{E000}c"), "abc");
        assert_eq!(normalize_span_text("   "), "");
    }

    #[test]
    fn test_tidy_body() {
        let body = "  The infor- mation desk\n\n\n\n opens early.  \n\n";
        assert_eq!(tidy_body(body), "The information desk\n\nopens early.");
        assert_eq!(tidy_body("a well-known spot"), "a well-known spot");
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 2), "he");
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("", 3), "");
    }

    #[test]
    fn test_split_sentences() {
        let text = "Nice is sunny. Is it? Yes! Version 1.5 ships trailing text";
        assert_eq!(
            split_sentences(text),
            vec![
                "Nice is sunny.",
                "Is it?",
                "Yes!",
                "Version 1.5 ships trailing text"
            ]
        );
    }

    #[test]
    fn test_char_windows() {
        assert_eq!(char_windows("abcdefg", 3), vec!["abc", "def", "g"]);
        assert_eq!(char_windows("ééé", 2), vec!["éé", "é"]);
        assert!(char_windows("", 3).is_empty());
    }
}
