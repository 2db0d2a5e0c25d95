//! Full canonicalization pass.

use std::fmt;
use std::ops::Deref;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Text that is lower-case, accent-stripped, compatibility-folded,
/// NFC-composed and whitespace-collapsed.
///
/// The only way to obtain one is through [`normalize`], so holders can rely
/// on those properties without re-checking them.
///
/// # Examples
///
/// ```
/// use fare_server::text::normalize;
///
/// let text = normalize("  Από   ΠΆΤΡΑ\tμέχρι Ρίο ");
/// assert_eq!(text.as_str(), "απο πατρα μεχρι ριο");
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct NormalizedText(String);

impl NormalizedText {
    /// Returns the text as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper, returning the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl Deref for NormalizedText {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for NormalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NormalizedText({:?})", self.0)
    }
}

impl fmt::Display for NormalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonicalize free text for matching.
///
/// Lower-casing runs first, with final sigma folded to `σ`, because some
/// upper-case letters lower-case into a base letter plus a combining mark
/// (e.g. `İ`). Compatibility decomposition
/// then splits accented and full-width forms, combining marks are dropped and
/// the remainder is recomposed. Whitespace runs of any kind collapse to a
/// single ASCII space and the ends are trimmed.
pub fn normalize(text: &str) -> NormalizedText {
    let lowered: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c == 'ς' { 'σ' } else { c })
        .collect();
    let stripped: String = lowered
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .nfc()
        .collect();

    let mut out = String::with_capacity(stripped.len());
    for word in stripped.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }

    NormalizedText(out)
}
