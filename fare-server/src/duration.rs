//! Duration reconciliation.
//!
//! Durations reach the composer in whatever shape the pricing service felt
//! like sending: bare minutes, bare seconds, `"1234s"`, `"01:30"`,
//! `"PT1H30M"`, `"2 ώρες και 15 λεπτά"`, or nothing at all. Each textual
//! shape has its own recognizer; they are tried left to right and the first
//! one that produces a value wins.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::tariff::minutes_for_distance;
use crate::text::normalize;

/// Above this many "minutes" a bare number is taken to be seconds.
pub const SECONDS_THRESHOLD: f64 = 1800.0;

/// A raw duration as received.
#[derive(Debug, Clone, PartialEq)]
pub enum DurationValue {
    /// A number of unknown unit; minutes unless implausibly large.
    Number(f64),
    /// A number known to be seconds.
    Seconds(f64),
    /// Free text in any of the recognized formats.
    Text(String),
}

impl DurationValue {
    /// Interpret a JSON value. Numbers and strings are accepted; anything
    /// else is treated as absent.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_f64().map(DurationValue::Number),
            Value::String(s) => Some(DurationValue::Text(s.clone())),
            _ => None,
        }
    }

    /// Like [`DurationValue::from_json`], but a number is taken as seconds.
    pub fn seconds_from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_f64().map(DurationValue::Seconds),
            other => Self::from_json(other),
        }
    }
}

impl From<f64> for DurationValue {
    fn from(value: f64) -> Self {
        DurationValue::Number(value)
    }
}

impl From<&str> for DurationValue {
    fn from(value: &str) -> Self {
        DurationValue::Text(value.to_string())
    }
}

static SECONDS_SUFFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)\s*s$").expect("seconds pattern is valid"));

static CLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,3})[:.](\d{2})\b").expect("clock pattern is valid"));

static ISO_HOURS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)h").expect("valid"));
static ISO_MINUTES_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)m").expect("valid"));
static ISO_SECONDS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)s").expect("valid"));

static GREEK_HOURS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s*ωρ").expect("greek hours pattern is valid"));
static GREEK_MINUTES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s*λεπ").expect("greek minutes pattern is valid"));

/// Recognizers for textual durations, in priority order. Each receives the
/// trimmed, lower-cased text.
const TEXT_PARSERS: [fn(&str) -> Option<u32>; 5] = [
    parse_seconds_suffix,
    parse_clock,
    parse_iso,
    parse_greek_phrase,
    parse_plain_digits,
];

fn capture_u32(re: &Regex, text: &str) -> Option<u32> {
    re.captures(text).and_then(|caps| caps[1].parse().ok())
}

/// `"5400s"`
fn parse_seconds_suffix(text: &str) -> Option<u32> {
    capture_u32(&SECONDS_SUFFIX_RE, text).map(|secs| secs / 60)
}

/// `"1:30"`, `"01.30"`, `"100:05"`
fn parse_clock(text: &str) -> Option<u32> {
    let caps = CLOCK_RE.captures(text)?;
    let hours: u32 = caps[1].parse().ok()?;
    let minutes: u32 = caps[2].parse().ok()?;
    Some(hours * 60 + minutes)
}

/// `"pt1h30m"`, `"pt2h30m45s"`. Falls through when no component is present
/// or the total doesn't fit in `u32`.
fn parse_iso(text: &str) -> Option<u32> {
    if !text.starts_with("pt") {
        return None;
    }

    let hours = capture_u32(&ISO_HOURS_RE, text);
    let minutes = capture_u32(&ISO_MINUTES_RE, text);
    let seconds = capture_u32(&ISO_SECONDS_RE, text);
    if hours.is_none() && minutes.is_none() && seconds.is_none() {
        return None;
    }

    hours
        .unwrap_or(0)
        .checked_mul(60)?
        .checked_add(minutes.unwrap_or(0))?
        .checked_add(seconds.unwrap_or(0) / 60)
}

/// `"2 ώρες και 15 λεπτά"`, `"45 λεπτα"`, `"2 ωρες"`. Totals past `u32` fall through.
fn parse_greek_phrase(text: &str) -> Option<u32> {
    let text = normalize(text);
    let hours = capture_u32(&GREEK_HOURS_RE, &text);
    let minutes = capture_u32(&GREEK_MINUTES_RE, &text);

    match (hours, minutes) {
        (Some(h), Some(m)) => h.checked_mul(60)?.checked_add(m),
        (None, Some(m)) => Some(m),
        (Some(h), None) => h.checked_mul(60),
        (None, None) => None,
    }
}

/// `"95"`
fn parse_plain_digits(text: &str) -> Option<u32> {
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

fn whole_minutes(value: f64) -> u32 {
    value.round_ties_even().clamp(0.0, u32::MAX as f64) as u32
}

fn minutes_from_number(value: f64) -> Option<u32> {
    if !value.is_finite() {
        return None;
    }
    let rounded = value.round_ties_even();
    if rounded > SECONDS_THRESHOLD {
        Some(whole_minutes(value / 60.0))
    } else {
        Some(whole_minutes(rounded))
    }
}

fn minutes_from_seconds(value: f64) -> Option<u32> {
    value.is_finite().then(|| whole_minutes(value / 60.0))
}

/// Reduce a raw duration to whole minutes.
///
/// Numbers are minutes unless they round to more than
/// [`SECONDS_THRESHOLD`], in which case they are seconds. Text is run through
/// the recognizers in order: `"<N>s"`, clock notation, ISO-style `PT...`,
/// Greek phrases, plain digits. If nothing applies and a positive distance is
/// known, the duration is estimated from the distance.
///
/// # Examples
///
/// ```
/// use fare_server::duration::{DurationValue, normalize_minutes};
///
/// assert_eq!(normalize_minutes(Some(&DurationValue::Number(5400.0)), None), Some(90));
/// assert_eq!(normalize_minutes(Some(&"01:30".into()), None), Some(90));
/// assert_eq!(normalize_minutes(Some(&"PT1H30M".into()), None), Some(90));
/// assert_eq!(normalize_minutes(Some(&"2 ώρες και 15 λεπτά".into()), None), Some(135));
/// assert_eq!(normalize_minutes(None, Some(85.0)), Some(60));
/// assert_eq!(normalize_minutes(None, None), None);
/// ```
pub fn normalize_minutes(value: Option<&DurationValue>, distance_km: Option<f64>) -> Option<u32> {
    let parsed = match value {
        Some(DurationValue::Number(n)) => minutes_from_number(*n),
        Some(DurationValue::Seconds(s)) => minutes_from_seconds(*s),
        Some(DurationValue::Text(raw)) => {
            let text = raw.trim().to_lowercase();
            TEXT_PARSERS.iter().find_map(|parse| parse(&text))
        }
        None => None,
    };

    parsed.or_else(|| {
        let approx = minutes_for_distance(distance_km?);
        (approx > 0).then_some(approx)
    })
}

/// Render minutes as Greek text.
///
/// # Examples
///
/// ```
/// use fare_server::duration::format_minutes;
///
/// assert_eq!(format_minutes(Some(135)).as_deref(), Some("2 ώρες και 15 λεπτά"));
/// assert_eq!(format_minutes(Some(120)).as_deref(), Some("2 ώρες"));
/// assert_eq!(format_minutes(Some(45)).as_deref(), Some("45 λεπτά"));
/// assert_eq!(format_minutes(None), None);
/// ```
pub fn format_minutes(minutes: Option<u32>) -> Option<String> {
    let minutes = minutes?;
    let (hours, rest) = (minutes / 60, minutes % 60);
    let text = match (hours, rest) {
        (0, r) => format!("{r} λεπτά"),
        (h, 0) => format!("{h} ώρες"),
        (h, r) => format!("{h} ώρες και {r} λεπτά"),
    };
    Some(text)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Formatted durations parse back to the same minutes
        #[test]
        fn format_parses_back(m in 0u32..100_000) {
            let rendered = format_minutes(Some(m)).unwrap();
            prop_assert_eq!(normalize_minutes(Some(&DurationValue::Text(rendered)), None), Some(m));
        }

        /// Plausible minute counts pass through unchanged
        #[test]
        fn small_numbers_are_minutes(m in 0u32..=1800) {
            prop_assert_eq!(normalize_minutes(Some(&DurationValue::Number(m as f64)), None), Some(m));
        }

        /// Arbitrary text never panics
        #[test]
        fn any_text_is_total(s in any::<String>(), d in proptest::option::of(-1.0e9f64..1.0e9)) {
            let _ = normalize_minutes(Some(&DurationValue::Text(s)), d);
        }

        /// Huge component counts never panic
        #[test]
        fn digit_heavy_text_is_total(
            s in prop_oneof![
                "pt[0-9]{1,12}h[0-9]{1,12}m[0-9]{1,12}s",
                "[0-9]{1,12} ωρες και [0-9]{1,12} λεπτα",
                "[0-9]{1,12}:[0-9]{2}",
                "[0-9]{1,25}s?",
            ]
        ) {
            let _ = normalize_minutes(Some(&DurationValue::Text(s)), None);
        }

        /// Any number, finite or not, never panics
        #[test]
        fn any_number_is_total(n in any::<f64>()) {
            let _ = normalize_minutes(Some(&DurationValue::Number(n)), None);
            let _ = normalize_minutes(Some(&DurationValue::Seconds(n)), Some(n));
        }

        /// Clock and ISO notation agree
        #[test]
        fn clock_and_iso_agree(h in 0u32..100, m in 0u32..60) {
            let clock = normalize_minutes(Some(&DurationValue::Text(format!("{h}:{m:02}"))), None);
            let iso = normalize_minutes(Some(&DurationValue::Text(format!("PT{h}H{m}M"))), None);
            prop_assert_eq!(clock, iso);
        }
    }
}
