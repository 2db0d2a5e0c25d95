//! Route shorthands with no connective words, such as "Πάτρα Πρέβεζα" or
//! "πάτρα-λουτράκι", rewritten into a full route sentence.

use once_cell::sync::Lazy;
use regex::Regex;

use super::grammar::is_route_stopword;
use crate::text::{normalize, preclean_route_text};

/// Stems that mark a pharmacy or hospital question, never a trip.
const OFF_TOPIC_STEMS: &[&str] = &["φαρμακ", "εφημερ", "νοσοκομ"];

/// Route connectives and prepositions, normalized. A shorthand place never
/// contains one of these.
const CONNECTIVES: &[&str] = &[
    "απο", "μεχρι", "εωσ", "ωσ", "προσ", "για", "σε", "στο", "στη", "στην", "στον", "στα",
];

/// Shortest word accepted as a place in the two-word form.
const MIN_WORD_CHARS: usize = 3;

static SEPARATED_ROUTE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<origin>\p{L}[\p{L}. ]*?)\s*(?:->|→|[-–>|])\s*(?P<dest>\p{L}[\p{L}. ]*)$")
        .expect("separated route pattern is valid")
});

fn mentions_off_topic(cleaned: &str) -> bool {
    let normalized = normalize(cleaned);
    OFF_TOPIC_STEMS.iter().any(|stem| normalized.as_str().contains(stem))
}

/// A place candidate: no connective words, not a question word, more than
/// one character.
fn place(candidate: &str) -> Option<&str> {
    let trimmed = candidate.trim_matches(|c: char| c == '.' || c.is_whitespace());
    let has_connective = normalize(trimmed)
        .as_str()
        .split(' ')
        .any(|word| CONNECTIVES.contains(&word));
    if trimmed.chars().count() <= 1 || has_connective || is_route_stopword(trimmed) {
        return None;
    }
    Some(trimmed)
}

fn as_route(origin: &str, destination: &str) -> String {
    format!("από {origin} μέχρι {destination}")
}

/// Rewrite `"<origin> - <destination>"` into `"από <origin> μέχρι <destination>"`.
///
/// The separator may be `-`, `–`, `>`, `->`, `→` or `|`, with or without
/// spaces. Both sides must be letters only.
///
/// # Examples
///
/// ```
/// use fare_server::route::rewrite_separated_route;
///
/// assert_eq!(
///     rewrite_separated_route("πάτρα-λουτράκι;").as_deref(),
///     Some("από πάτρα μέχρι λουτράκι")
/// );
/// assert_eq!(rewrite_separated_route("Πάτρα Λουτράκι"), None);
/// ```
pub fn rewrite_separated_route(text: &str) -> Option<String> {
    let cleaned = preclean_route_text(text);
    if mentions_off_topic(&cleaned) {
        return None;
    }

    let caps = SEPARATED_ROUTE_RE.captures(&cleaned)?;
    let origin = place(&caps["origin"])?;
    let destination = place(&caps["dest"])?;
    Some(as_route(origin, destination))
}

/// Rewrite a bare pair of place names, `"Πάτρα Πρέβεζα"`, into a route.
///
/// Only exactly two words of at least three letters each qualify, and
/// pharmacy or hospital questions are left alone.
pub fn rewrite_two_place_names(text: &str) -> Option<String> {
    let cleaned = preclean_route_text(text);
    if mentions_off_topic(&cleaned) {
        return None;
    }

    let words: Vec<&str> = cleaned.split(' ').collect();
    let [origin, destination] = *words.as_slice() else {
        return None;
    };
    let qualifies = |word: &str| {
        word.chars().count() >= MIN_WORD_CHARS && word.chars().all(char::is_alphabetic)
    };
    if !qualifies(origin) || !qualifies(destination) {
        return None;
    }

    Some(as_route(place(origin)?, place(destination)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_place_names() {
        assert_eq!(
            rewrite_two_place_names("Πάτρα Πρέβεζα").as_deref(),
            Some("από Πάτρα μέχρι Πρέβεζα")
        );
        assert_eq!(
            rewrite_two_place_names("  Πάτρα   Ιωάννινα;").as_deref(),
            Some("από Πάτρα μέχρι Ιωάννινα")
        );
        assert_eq!(
            rewrite_two_place_names("Πάτρα Αθήνα πόσο κάνει;").as_deref(),
            Some("από Πάτρα μέχρι Αθήνα")
        );
    }

    #[test]
    fn two_words_that_are_not_places() {
        assert_eq!(rewrite_two_place_names("Πάτρα"), None);
        assert_eq!(rewrite_two_place_names("Πάτρα Ρίο Αίγιο"), None);
        assert_eq!(rewrite_two_place_names("Πάτρα 25"), None);
        assert_eq!(rewrite_two_place_names("στο Ρίο"), None);
        assert_eq!(rewrite_two_place_names("από Πάτρα"), None);
        assert_eq!(rewrite_two_place_names("πόσο κάνει;"), None);
        assert_eq!(rewrite_two_place_names(""), None);
    }

    #[test]
    fn pharmacy_and_hospital_questions_are_left_alone() {
        assert_eq!(rewrite_two_place_names("φαρμακείο Ρίο"), None);
        assert_eq!(rewrite_two_place_names("εφημερεύον Ρίο"), None);
        assert_eq!(rewrite_two_place_names("Νοσοκομείο Ρίου"), None);
        assert_eq!(rewrite_separated_route("Πάτρα - νοσοκομείο"), None);
    }

    #[test]
    fn separated_route() {
        assert_eq!(
            rewrite_separated_route("πάτρα-λουτράκι").as_deref(),
            Some("από πάτρα μέχρι λουτράκι")
        );
        assert_eq!(
            rewrite_separated_route("Πάτρα -> Άγιος Νικόλαος").as_deref(),
            Some("από Πάτρα μέχρι Άγιος Νικόλαος")
        );
        assert_eq!(
            rewrite_separated_route("Πάτρα → Ρίο?").as_deref(),
            Some("από Πάτρα μέχρι Ρίο")
        );
        assert_eq!(
            rewrite_separated_route("Patra | Rio").as_deref(),
            Some("από Patra μέχρι Rio")
        );
    }

    #[test]
    fn separated_route_rejects_partial_or_marked_sides() {
        assert_eq!(rewrite_separated_route("Πάτρα-"), None);
        assert_eq!(rewrite_separated_route("Πάτρα - 25"), None);
        assert_eq!(rewrite_separated_route("από Πάτρα - Ρίο"), None);
        assert_eq!(rewrite_separated_route("Πάτρα - πού"), None);
        assert_eq!(rewrite_separated_route("από Πάτρα μέχρι Ρίο"), None);
    }
}
