//! Night / double-tariff detection.

use chrono::{NaiveTime, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::text::normalize;

/// Hour (exclusive) at which the night tariff stops applying.
const NIGHT_END_HOUR: u32 = 5;

/// Phrases asking for the night or double tariff, in normalized form.
const NIGHT_KEYWORDS: &[&str] = &[
    "νυχτ",
    "διπλη ταριφα",
    "διπλησ ταριφασ",
    "night",
    "double tariff",
    "double fare",
    "nyxt",
    "nixt",
];

static CLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2})[:.](\d{2})\b").expect("clock pattern is valid"));

/// Whether the night (double) tariff applies.
///
/// True if the message mentions a night/double-tariff keyword, or if `when`
/// contains an `HH:MM` / `HH.MM` time between 00:00 and 04:59. A bare
/// `"now"` with no keywords is a day trip.
///
/// # Examples
///
/// ```
/// use fare_server::tariff::is_night_tariff;
///
/// assert!(is_night_tariff("από Πάτρα μέχρι Ρίο με νυχτερινή ταρίφα", "now"));
/// assert!(is_night_tariff("από Πάτρα μέχρι Ρίο", "03:30"));
/// assert!(!is_night_tariff("από Πάτρα μέχρι Ρίο", "now"));
/// ```
pub fn is_night_tariff(message: &str, when: &str) -> bool {
    let text = normalize(message);
    if NIGHT_KEYWORDS.iter().any(|kw| text.contains(kw)) {
        return true;
    }

    CLOCK_RE.captures_iter(when).any(|caps| {
        let hour = caps[1].parse::<u32>().ok();
        let minute = caps[2].parse::<u32>().ok();
        match (hour, minute) {
            (Some(h), Some(m)) => NaiveTime::from_hms_opt(h, m, 0)
                .is_some_and(|t| t.hour() < NIGHT_END_HOUR),
            _ => false,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_trigger_night() {
        assert!(is_night_tariff("Νυχτερινή διαδρομή για Αθήνα", "now"));
        assert!(is_night_tariff("με διπλή ταρίφα πόσο;", "now"));
        assert!(is_night_tariff("ΔΙΠΛΗΣ ΤΑΡΙΦΑΣ", "now"));
        assert!(is_night_tariff("night ride to Athens", "now"));
        assert!(is_night_tariff("tin nyxta apo patra", "now"));
    }

    #[test]
    fn early_morning_clock_triggers_night() {
        assert!(is_night_tariff("", "00:00"));
        assert!(is_night_tariff("", "4:59"));
        assert!(is_night_tariff("", "02.15"));
        assert!(is_night_tariff("", "αύριο στις 01:30"));
    }

    #[test]
    fn day_clock_is_day() {
        assert!(!is_night_tariff("", "05:00"));
        assert!(!is_night_tariff("", "12:30"));
        assert!(!is_night_tariff("", "23:59"));
    }

    #[test]
    fn now_without_keywords_is_day() {
        assert!(!is_night_tariff("από Πάτρα μέχρι Αθήνα", "now"));
        assert!(!is_night_tariff("", ""));
    }

    #[test]
    fn invalid_clock_ignored() {
        assert!(!is_night_tariff("", "3:75"));
        assert!(!is_night_tariff("", "99:00"));
    }

    #[test]
    fn any_night_token_counts() {
        assert!(is_night_tariff("", "12:00 ή 03:00"));
    }
}
