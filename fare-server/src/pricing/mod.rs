//! Live pricing service.
//!
//! The service is optional. When it is missing or failing the composer
//! prices trips offline, so everything here reports errors instead of
//! retrying.

mod cache;
mod client;
mod error;
mod live;

use std::future::Future;
use std::time::Duration;

pub use cache::{CachedPricingClient, QuoteCacheConfig};
pub use client::{PricingClient, PricingClientConfig};
pub use error::PricingError;
pub use live::{DISTANCE_KEYS, DURATION_KEYS, LiveQuote, MAP_KEYS, PRICE_KEYS, coerce_number};

use crate::config::PricingConfig;

/// Something that can price a trip.
///
/// This abstraction allows the composer to be tested with mock services.
pub trait PricingService: Send + Sync {
    /// Quote a trip from `origin` to `destination` at `when`.
    fn quote(
        &self,
        origin: &str,
        destination: &str,
        when: &str,
    ) -> impl Future<Output = Result<LiveQuote, PricingError>> + Send;
}

/// The pricing backend chosen at startup.
pub enum Pricing {
    /// Cached HTTP client
    Live(CachedPricingClient<PricingClient>),
    /// No service configured; every quote fails with
    /// [`PricingError::NotConfigured`]
    Offline,
}

impl Pricing {
    /// Build from configuration. A missing or blank `base_url` is offline.
    pub fn from_config(config: &PricingConfig) -> Result<Self, PricingError> {
        let Some(base_url) = config.base_url.as_deref().filter(|u| !u.trim().is_empty()) else {
            return Ok(Pricing::Offline);
        };

        let mut client_config = PricingClientConfig::new(base_url)
            .with_path(config.path.clone())
            .with_timeout_secs(config.timeout_secs);
        if let Some(key) = &config.api_key {
            client_config = client_config.with_api_key(key.clone());
        }

        let cache_config = QuoteCacheConfig {
            ttl: Duration::from_secs(config.cache_ttl_secs),
            ..QuoteCacheConfig::default()
        };

        let client = PricingClient::new(client_config)?;
        Ok(Pricing::Live(CachedPricingClient::new(client, &cache_config)))
    }

    pub fn is_live(&self) -> bool {
        matches!(self, Pricing::Live(_))
    }
}

impl PricingService for Pricing {
    async fn quote(
        &self,
        origin: &str,
        destination: &str,
        when: &str,
    ) -> Result<LiveQuote, PricingError> {
        match self {
            Pricing::Live(client) => client.quote(origin, destination, when).await,
            Pricing::Offline => Err(PricingError::NotConfigured),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_base_url_is_offline() {
        let pricing = Pricing::from_config(&PricingConfig::default()).unwrap();
        assert!(!pricing.is_live());

        let blank = PricingConfig {
            base_url: Some("  ".into()),
            ..PricingConfig::default()
        };
        assert!(!Pricing::from_config(&blank).unwrap().is_live());
    }

    #[test]
    fn base_url_is_live() {
        let config = PricingConfig {
            base_url: Some("http://pricing.local".into()),
            path: "/quote".into(),
            api_key: Some("k".into()),
            ..PricingConfig::default()
        };
        match Pricing::from_config(&config).unwrap() {
            Pricing::Live(client) => {
                assert_eq!(client.inner().endpoint(), "http://pricing.local/quote");
            }
            Pricing::Offline => panic!("expected a live client"),
        }
    }

    #[tokio::test]
    async fn offline_quotes_fail() {
        let err = Pricing::Offline.quote("Πάτρα", "Ρίο", "now").await.unwrap_err();
        assert!(matches!(err, PricingError::NotConfigured));
    }
}
