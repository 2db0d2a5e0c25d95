//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::quote::{FareQuote, FareReply};

/// `when` used when a request doesn't give one.
pub const DEFAULT_WHEN: &str = "now";

fn default_when() -> String {
    DEFAULT_WHEN.to_string()
}

/// Request to quote a free-text message.
#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    /// The user's message, e.g. "από Πάτρα μέχρι Ρίο πόσο κάνει;"
    pub message: String,

    /// "now" or a clock time such as "23:40"
    #[serde(default = "default_when")]
    pub when: String,
}

/// Request to quote a known route.
#[derive(Debug, Deserialize)]
pub struct RouteQuoteRequest {
    pub origin: String,
    pub destination: String,
    #[serde(default = "default_when")]
    pub when: String,
}

/// Response for both quote endpoints.
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    /// Text to show the user (a quote or a clarification prompt)
    pub reply: String,

    /// Structured quote; absent when the reply is a clarification
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote: Option<FareQuote>,
}

impl QuoteResponse {
    /// Render a reply, closing quotes with `disclaimer`.
    pub fn from_reply(reply: FareReply, disclaimer: &str) -> Self {
        let text = reply.render(disclaimer);
        let quote = match reply {
            FareReply::Quote(q) => Some(q),
            FareReply::Clarify { .. } => None,
        };
        Self { reply: text, quote }
    }
}

/// Query for area resolution.
#[derive(Debug, Deserialize)]
pub struct AreaResolveRequest {
    /// Free text mentioning an area
    #[serde(default)]
    pub q: String,
}

/// Result of area resolution.
#[derive(Debug, Serialize)]
pub struct AreaResolveResponse {
    /// Canonical area name, or null if none matched
    pub area: Option<String>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}
