//! Human-readable quote text.

use url::form_urlencoded::byte_serialize;

use super::{FareQuote, FareReply, QuotedPrice};
use crate::duration::format_minutes;

const MAPS_DIRECTIONS_URL: &str = "https://www.google.com/maps/dir/?api=1";

/// Google Maps driving directions between two places.
///
/// # Examples
///
/// ```
/// use fare_server::quote::map_url;
///
/// assert_eq!(
///     map_url("Παραλία Πατρών", "Rio"),
///     "https://www.google.com/maps/dir/?api=1\
///      &origin=%CE%A0%CE%B1%CF%81%CE%B1%CE%BB%CE%AF%CE%B1+%CE%A0%CE%B1%CF%84%CF%81%CF%8E%CE%BD\
///      &destination=Rio&travelmode=driving"
/// );
/// ```
pub fn map_url(origin: &str, destination: &str) -> String {
    let origin: String = byte_serialize(origin.as_bytes()).collect();
    let destination: String = byte_serialize(destination.as_bytes()).collect();
    format!("{MAPS_DIRECTIONS_URL}&origin={origin}&destination={destination}&travelmode=driving")
}

impl FareQuote {
    /// Multi-line reply: price, distance, duration, map link, disclaimer.
    pub fn render(&self, disclaimer: &str) -> String {
        let night = if self.night { " (νυχτερινή ταρίφα)" } else { "" };
        let price = match &self.price {
            QuotedPrice::Estimate {
                rounded_eur,
                low_eur,
                high_eur,
                ..
            } => format!("💶 Εκτίμηση: ~{rounded_eur}€ ({low_eur}–{high_eur}€){night}"),
            QuotedPrice::Raw { value } => format!("💶 Εκτίμηση: ~{value}€{night}"),
        };
        let duration = match format_minutes(self.duration_min) {
            Some(text) => format!("⏱️ Χρόνος: ~{text}"),
            None => "⏱️ Χρόνος: —".to_string(),
        };

        [
            price,
            format!("🛣️ Απόσταση: ~{:.1} km", self.distance_km),
            duration,
            format!("📌 Δες τη διαδρομή στον χάρτη: {}", self.map_url),
            disclaimer.to_string(),
        ]
        .join("\n")
    }
}

impl FareReply {
    /// The text to send back to the user.
    pub fn render(&self, disclaimer: &str) -> String {
        match self {
            FareReply::Clarify { prompt } => prompt.clone(),
            FareReply::Quote(quote) => quote.render(disclaimer),
        }
    }
}
