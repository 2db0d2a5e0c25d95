//! Fare response composition.
//!
//! Ties route extraction, night detection, live pricing and the offline
//! estimator together into one answer per message.

mod compose;
mod render;

use serde::Serialize;

pub use compose::{quote_route, quote_trip};
pub use render::map_url;

use crate::tariff::{price_band, round_to_5};

/// Where the numbers in a quote came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteSource {
    /// The live pricing service answered; gaps were filled offline
    Live,
    /// Fallback distance table and tariff only
    Fallback,
}

/// The price part of a quote.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuotedPrice {
    /// A numeric price with its rounded display value and band
    Estimate {
        eur: f64,
        rounded_eur: i64,
        low_eur: i64,
        high_eur: i64,
    },
    /// A price the service sent that isn't a number, echoed as-is
    Raw { value: String },
}

impl QuotedPrice {
    /// Round a numeric price for display.
    pub fn estimate(eur: f64) -> Self {
        let (low_eur, high_eur) = price_band(eur);
        QuotedPrice::Estimate {
            eur,
            rounded_eur: round_to_5(eur),
            low_eur,
            high_eur,
        }
    }
}

/// A composed fare quote.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FareQuote {
    pub origin: String,
    pub destination: String,
    pub night: bool,
    pub source: QuoteSource,
    pub price: QuotedPrice,
    pub distance_km: f64,
    pub duration_min: Option<u32>,
    pub map_url: String,
}

/// The answer to a fare request.
#[derive(Debug, Clone, PartialEq)]
pub enum FareReply {
    /// No route could be recovered; ask the user for one
    Clarify { prompt: String },
    /// A priced trip
    Quote(FareQuote),
}

impl FareReply {
    /// The quote, unless this is a clarification.
    pub fn quote(&self) -> Option<&FareQuote> {
        match self {
            FareReply::Quote(q) => Some(q),
            FareReply::Clarify { .. } => None,
        }
    }
}
