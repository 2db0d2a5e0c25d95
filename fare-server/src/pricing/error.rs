//! Pricing service error types.

/// Errors from the live pricing service.
///
/// None of these reach users: the composer logs them and falls back to the
/// offline estimate.
#[derive(Debug, thiserror::Error)]
pub enum PricingError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Authentication failed
    #[error("unauthorized: check PRICING_API_KEY")]
    Unauthorized,

    /// Service returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Response was not a JSON object
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// Service answered with an `error` field
    #[error("pricing service reported: {message}")]
    Remote { message: String },

    /// No pricing service is configured
    #[error("no pricing service configured")]
    NotConfigured,
}
