//! Route grammars and the extraction cascade.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::text::{normalize, preclean_route_text};

/// Question words that must never be taken as a place name.
/// Stored in normalized form.
const ROUTE_STOPWORDS: &[&str] = &[
    "ποσο", "ποσα", "ποση", "ποιο", "τι", "που", "πωσ", "ποτε", "κανει", "κοστιζει", "τιμη",
    "κοστοσ", "poso", "posa", "ti", "pou", "pos", "pote", "kanei", "kostizei", "timi",
];

/// Characters trimmed from both ends of a captured place.
const SPAN_TRIM: &[char] = &[',', '.', ';', '·', '?', '!'];

/// Whether a (trimmed) place candidate is a question word.
pub fn is_route_stopword(candidate: &str) -> bool {
    ROUTE_STOPWORDS.contains(&normalize(candidate).as_str())
}

/// An origin/destination pair recovered from text.
///
/// Either side may be missing. A query with only one side is as useless as
/// an empty one to callers that need both, see [`RouteQuery::both`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteQuery {
    pub origin: Option<String>,
    pub destination: Option<String>,
}

impl RouteQuery {
    /// A query with neither side recovered.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a query, discarding sides that are not meaningful place names.
    pub fn from_spans(origin: &str, destination: &str) -> Self {
        Self {
            origin: clean_place(origin),
            destination: clean_place(destination),
        }
    }

    /// Both sides, if both were recovered.
    pub fn both(&self) -> Option<(&str, &str)> {
        match (&self.origin, &self.destination) {
            (Some(o), Some(d)) => Some((o.as_str(), d.as_str())),
            _ => None,
        }
    }

    /// Returns true if neither side was recovered.
    pub fn is_empty(&self) -> bool {
        self.origin.is_none() && self.destination.is_none()
    }
}

/// Trim punctuation and reject question words and single characters.
fn clean_place(span: &str) -> Option<String> {
    let trimmed = span.trim_matches(|c: char| SPAN_TRIM.contains(&c) || c.is_whitespace());
    if trimmed.chars().count() <= 1 || is_route_stopword(trimmed) {
        return None;
    }
    Some(trimmed.to_string())
}

static EXPLICIT_ORIGIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\bαπ[οό]\s+(?P<origin>.+?)\s+(?:μ[εέ]χρι|[εέ]ως|ως|προς|για)\s+(?P<dest>.+)$",
    )
    .expect("explicit-origin grammar is valid")
});

static DESTINATION_MARKER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?P<origin>.+?)\s+(?:προς|για)\s+(?P<dest>.+)$")
        .expect("destination-marker grammar is valid")
});

static DESTINATION_FIRST_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?P<dest>.+?)\s+απ[οό]\s+(?P<origin>.+)$")
        .expect("destination-first grammar is valid")
});

/// The route grammars, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteGrammar {
    /// `από <origin> (μέχρι|έως|προς|για) <destination>`
    ExplicitOrigin,
    /// `<origin> (προς|για) <destination>`
    DestinationMarker,
    /// `<destination> από <origin>`
    DestinationFirst,
}

impl RouteGrammar {
    /// All grammars in priority order.
    pub const CASCADE: [RouteGrammar; 3] = [
        RouteGrammar::ExplicitOrigin,
        RouteGrammar::DestinationMarker,
        RouteGrammar::DestinationFirst,
    ];

    fn pattern(self) -> &'static Regex {
        match self {
            RouteGrammar::ExplicitOrigin => &EXPLICIT_ORIGIN_RE,
            RouteGrammar::DestinationMarker => &DESTINATION_MARKER_RE,
            RouteGrammar::DestinationFirst => &DESTINATION_FIRST_RE,
        }
    }

    /// Apply this grammar alone to already precleaned text.
    ///
    /// Returns `None` if the grammar does not match at all. A match whose
    /// captured sides are rejected still counts as a match and yields a
    /// partial (or empty) query.
    pub fn apply(self, cleaned: &str) -> Option<RouteQuery> {
        let caps = self.pattern().captures(cleaned)?;
        Some(RouteQuery::from_spans(&caps["origin"], &caps["dest"]))
    }
}

/// Extract an origin/destination pair from a raw message.
///
/// The message goes through [`preclean_route_text`] first; the first grammar
/// of [`RouteGrammar::CASCADE`] that matches decides the result.
///
/// # Examples
///
/// ```
/// use fare_server::route::extract_route;
///
/// let route = extract_route("από Πάτρα μέχρι Διακοπτό;");
/// assert_eq!(route.both(), Some(("Πάτρα", "Διακοπτό")));
///
/// assert!(extract_route("τι ώρα είναι").is_empty());
/// ```
pub fn extract_route(text: &str) -> RouteQuery {
    let cleaned = preclean_route_text(text);
    if cleaned.is_empty() {
        return RouteQuery::empty();
    }

    RouteGrammar::CASCADE
        .iter()
        .find_map(|grammar| grammar.apply(&cleaned))
        .unwrap_or_default()
}
