//! Coarse fallback distances for when live pricing is unavailable.

use std::collections::HashMap;

use crate::text::{NormalizedText, normalize};

/// Distance assumed for any pair not in the table.
pub const DEFAULT_FALLBACK_KM: f64 = 200.0;

/// Known directed origin/destination distances, in km.
const BUILTIN_DISTANCES: &[(&str, &str, f64)] = &[
    ("πάτρα", "αθήνα", 275.0),
    ("patra", "athens", 275.0),
    ("πάτρα", "πρέβεζα", 220.0),
    ("πάτρα", "καλαμάτα", 210.0),
    ("πάτρα", "λουτράκι", 184.0),
];

type PairKey = (NormalizedText, NormalizedText);

/// Static distance lookup.
///
/// Keys are [`normalize`]d, so case, accents and spacing don't matter.
/// Entries are directed: `(a, b)` says nothing about `(b, a)`.
#[derive(Debug, Clone)]
pub struct FallbackDistances {
    known: HashMap<PairKey, f64>,
    default_km: f64,
}

impl FallbackDistances {
    /// An empty table answering every query with `default_km`.
    pub fn empty(default_km: f64) -> Self {
        Self {
            known: HashMap::new(),
            default_km,
        }
    }

    /// The built-in table.
    pub fn builtin() -> Self {
        BUILTIN_DISTANCES
            .iter()
            .fold(Self::empty(DEFAULT_FALLBACK_KM), |table, &(o, d, km)| {
                table.with_entry(o, d, km)
            })
    }

    /// Add or replace one directed entry.
    pub fn with_entry(mut self, origin: &str, destination: &str, km: f64) -> Self {
        self.known.insert((normalize(origin), normalize(destination)), km);
        self
    }

    /// Replace the distance returned for unknown pairs.
    pub fn with_default(mut self, default_km: f64) -> Self {
        self.default_km = default_km;
        self
    }

    pub fn default_km(&self) -> f64 {
        self.default_km
    }

    pub fn len(&self) -> usize {
        self.known.len()
    }

    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }

    /// Look up a pair, falling back to the default distance.
    ///
    /// # Examples
    ///
    /// ```
    /// use fare_server::distance::FallbackDistances;
    ///
    /// let table = FallbackDistances::builtin();
    /// assert_eq!(table.rough_distance_km("  ΠΑΤΡΑ ", "Αθήνα"), 275.0);
    /// assert_eq!(table.rough_distance_km("Αθήνα", "Πάτρα"), 200.0);
    /// ```
    pub fn rough_distance_km(&self, origin: &str, destination: &str) -> f64 {
        self.lookup(origin, destination).unwrap_or(self.default_km)
    }

    /// Look up a pair without applying the default.
    pub fn lookup(&self, origin: &str, destination: &str) -> Option<f64> {
        self.known
            .get(&(normalize(origin), normalize(destination)))
            .copied()
    }
}

impl Default for FallbackDistances {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_pairs() {
        let t = FallbackDistances::builtin();
        assert_eq!(t.rough_distance_km("Πάτρα", "Αθήνα"), 275.0);
        assert_eq!(t.rough_distance_km("Patra", "Athens"), 275.0);
        assert_eq!(t.rough_distance_km("πάτρα", "Πρέβεζα"), 220.0);
        assert_eq!(t.rough_distance_km("πάτρα", "Καλαμάτα"), 210.0);
        assert_eq!(t.rough_distance_km("πάτρα", "Λουτράκι"), 184.0);
        assert_eq!(t.len(), 5);
    }

    #[test]
    fn keys_ignore_case_accents_and_spacing() {
        let t = FallbackDistances::builtin();
        assert_eq!(t.rough_distance_km("  PATRA ", "athens"), 275.0);
        assert_eq!(t.rough_distance_km("ΠΑΤΡΑ", "αθηνα"), 275.0);
    }

    #[test]
    fn not_symmetric() {
        let t = FallbackDistances::builtin();
        assert_eq!(t.lookup("Αθήνα", "Πάτρα"), None);
        assert_eq!(t.rough_distance_km("Αθήνα", "Πάτρα"), DEFAULT_FALLBACK_KM);
    }

    #[test]
    fn unknown_pair_uses_default() {
        let t = FallbackDistances::builtin().with_default(150.0);
        assert_eq!(t.rough_distance_km("Ρίο", "Ναύπακτος"), 150.0);
        assert_eq!(t.rough_distance_km("", ""), 150.0);
    }

    #[test]
    fn entries_can_be_added_and_replaced() {
        let t = FallbackDistances::empty(200.0)
            .with_entry("Πάτρα", "Πύργος", 97.0)
            .with_entry("ΠΑΤΡΑ", "πυργος", 98.0);
        assert_eq!(t.len(), 1);
        assert_eq!(t.rough_distance_km("Πάτρα", "Πύργος"), 98.0);
    }
}
