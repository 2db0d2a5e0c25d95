//! Route-specific cleanup pass.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use unicode_normalization::UnicodeNormalization;

use super::normalize;

/// Question tails that carry no route information, compared after
/// [`normalize`] so accents and case don't matter.
const QUESTION_TAILS: &[&str] = &[
    "ποσο", "ποσα", "κοστιζει", "κανει", "τιμη", "κοστοσ", "poso", "posa", "kostizei",
    "kostizi", "kanei", "kani", "timi", "kostos",
];

/// Punctuation that may trail a question.
const TRAILING_PUNCT: &[char] = &['?', ';', '!', '.', ',', '·', '…', '¿'];

/// Greeklish / English route connectives and their Greek replacements.
static CONNECTIVE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(apo|from|mexri|mehri|mechri|until|pros|towards|gia|yia|eos|ews|to)\b")
        .expect("connective pattern is valid")
});

fn greek_connective(word: &str) -> &'static str {
    match word.to_ascii_lowercase().as_str() {
        "apo" | "from" => "από",
        "pros" | "towards" => "προς",
        "gia" | "yia" => "για",
        "eos" | "ews" => "έως",
        _ => "μέχρι",
    }
}

/// Prepare a message for route extraction.
///
/// Applies compatibility composition and whitespace collapsing, strips any
/// trailing run of question words and question punctuation, and rewrites
/// Greeklish connectives (`apo`, `mexri`, `pros`, `gia`, `eos`, `from`,
/// `to`, ...) to their Greek forms. Place names keep their original casing
/// and accents.
///
/// The pass is total and idempotent.
///
/// # Examples
///
/// ```
/// use fare_server::text::preclean_route_text;
///
/// assert_eq!(
///     preclean_route_text("apo Patra mexri Rio poso kanei?"),
///     "από Patra μέχρι Rio"
/// );
/// assert_eq!(preclean_route_text(""), "");
/// ```
pub fn preclean_route_text(text: &str) -> String {
    let composed: String = text.nfkc().collect();
    let collapsed = composed.split_whitespace().collect::<Vec<_>>().join(" ");

    let rewritten = CONNECTIVE_RE.replace_all(&collapsed, |caps: &Captures<'_>| {
        greek_connective(&caps[1]).to_string()
    });

    strip_question_tail(&rewritten).to_string()
}

/// Repeatedly remove trailing question punctuation and question words.
fn strip_question_tail(text: &str) -> &str {
    let mut rest = text.trim();
    loop {
        let before = rest.len();
        rest = rest.trim_end_matches(|c: char| TRAILING_PUNCT.contains(&c) || c.is_whitespace());

        if let Some((head, last)) = split_last_word(rest)
            && QUESTION_TAILS.contains(&normalize(last).as_str())
        {
            rest = head.trim_end();
        }

        if rest.len() == before {
            return rest;
        }
    }
}

/// Split off the last whitespace-separated word. A single-word string
/// yields an empty head.
fn split_last_word(text: &str) -> Option<(&str, &str)> {
    if text.is_empty() {
        return None;
    }
    match text.rfind(char::is_whitespace) {
        Some(idx) => {
            let (head, tail) = text.split_at(idx);
            Some((head, tail.trim_start()))
        }
        None => Some(("", text)),
    }
}
