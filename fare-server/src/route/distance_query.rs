//! Rewrite "how many kilometres to X" questions into a route sentence.

use once_cell::sync::Lazy;
use regex::Regex;

/// Longest destination we are willing to carry over.
const MAX_DESTINATION_CHARS: usize = 80;

static KM_QUESTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)π[οό]σα\s+χιλι[οό]μετρα").expect("km question pattern is valid"));

static KM_TRAILING_DEST_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)π[οό]σα\s+χιλι[οό]μετρα(?:\s+[εέ][ιί]ναι)?\s+(?:να\s*π[αά]ω\s+)?(?:στην|στον|στο|για|προς|μ[εέ]χρι|[εέ]ως)?\s*(?P<dest>.+)$",
    )
    .expect("trailing destination pattern is valid")
});

static KM_LEADING_DEST_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:(?:η|ο|το|οι|τα|στην|στον|στο)\s+)?(?P<dest>[\p{L}.\- ]+?)\s+π[οό]σα\s+χιλι[οό]μετρα",
    )
    .expect("leading destination pattern is valid")
});

static LEADING_ARTICLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:η|ο|οι|το|τα|την|τη|τον|του|της)\s+").expect("article pattern is valid")
});

static ORIGIN_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bαπ[οό]\b").expect("origin marker pattern is valid"));

/// Turn a distance question into `"από <origin> μέχρι <destination>"`.
///
/// Handles both "πόσα χιλιόμετρα είναι μέχρι Καλαμάτα;" and
/// "Καλαμάτα πόσα χιλιόμετρα;". Returns `None` when the message is not a
/// distance question, names no destination, or already states an origin.
///
/// # Examples
///
/// ```
/// use fare_server::route::rewrite_distance_query;
///
/// assert_eq!(
///     rewrite_distance_query("πόσα χιλιόμετρα είναι μέχρι την Καλαμάτα;", "Πάτρα").as_deref(),
///     Some("από Πάτρα μέχρι Καλαμάτα")
/// );
/// assert_eq!(rewrite_distance_query("από Πάτρα μέχρι Ρίο", "Πάτρα"), None);
/// ```
pub fn rewrite_distance_query(text: &str, default_origin: &str) -> Option<String> {
    if !KM_QUESTION_RE.is_match(text) {
        return None;
    }

    let trimmed = text
        .trim()
        .trim_end_matches(|c: char| matches!(c, ';' | '\u{037E}' | '?' | '!' | '…'));

    let dest = KM_TRAILING_DEST_RE
        .captures(trimmed)
        .map(|caps| caps["dest"].trim().to_string())
        .filter(|d| !d.is_empty())
        .or_else(|| {
            KM_LEADING_DEST_RE
                .captures(trimmed)
                .map(|caps| caps["dest"].trim().to_string())
        })?;

    let dest = dest.trim_matches(|c: char| matches!(c, ' ' | '.' | ',' | '\u{00A0}'));
    let dest = LEADING_ARTICLE_RE.replace(dest, "");
    if dest.is_empty() || ORIGIN_MARKER_RE.is_match(&dest) {
        return None;
    }

    let dest: String = dest.chars().take(MAX_DESTINATION_CHARS).collect();
    Some(format!("από {default_origin} μέχρι {dest}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_destination() {
        assert_eq!(
            rewrite_distance_query("πόσα χιλιόμετρα είναι για Αθήνα;", "Πάτρα").as_deref(),
            Some("από Πάτρα μέχρι Αθήνα")
        );
        assert_eq!(
            rewrite_distance_query("Πόσα χιλιόμετρα να πάω στο Λουτράκι?", "Πάτρα").as_deref(),
            Some("από Πάτρα μέχρι Λουτράκι")
        );
    }

    #[test]
    fn leading_destination() {
        assert_eq!(
            rewrite_distance_query("η Καλαμάτα πόσα χιλιόμετρα;", "Πάτρα").as_deref(),
            Some("από Πάτρα μέχρι Καλαμάτα")
        );
    }

    #[test]
    fn article_removed() {
        assert_eq!(
            rewrite_distance_query("πόσα χιλιόμετρα είναι μέχρι την Πρέβεζα", "Πάτρα").as_deref(),
            Some("από Πάτρα μέχρι Πρέβεζα")
        );
    }

    #[test]
    fn uses_given_default_origin() {
        assert_eq!(
            rewrite_distance_query("πόσα χιλιόμετρα για Αίγιο", "Ρίο").as_deref(),
            Some("από Ρίο μέχρι Αίγιο")
        );
    }

    #[test]
    fn explicit_origin_not_rewritten() {
        assert_eq!(
            rewrite_distance_query("πόσα χιλιόμετρα από Ρίο μέχρι Αίγιο", "Πάτρα"),
            None
        );
    }

    #[test]
    fn not_a_distance_question() {
        assert_eq!(rewrite_distance_query("από Πάτρα μέχρι Ρίο", "Πάτρα"), None);
        assert_eq!(rewrite_distance_query("", "Πάτρα"), None);
    }

    #[test]
    fn no_destination() {
        assert_eq!(rewrite_distance_query("πόσα χιλιόμετρα;", "Πάτρα"), None);
    }

    #[test]
    fn long_destination_truncated() {
        let long = "Α".repeat(200);
        let out = rewrite_distance_query(&format!("πόσα χιλιόμετρα για {long}"), "Πάτρα").unwrap();
        assert_eq!(out.chars().count(), "από Πάτρα μέχρι ".chars().count() + 80);
    }
}
