//! Caching layer for live quotes.
//!
//! Prices for the same route and time change slowly, so successful quotes
//! are kept for a configurable TTL. Failures are never cached.

use std::time::Duration;

use moka::future::Cache as MokaCache;

use super::PricingService;
use super::error::PricingError;
use super::live::LiveQuote;
use crate::text::normalize;

/// Cache key: normalized (origin, destination, when).
type QuoteKey = (String, String, String);

/// Configuration for the quote cache.
#[derive(Debug, Clone)]
pub struct QuoteCacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for QuoteCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(600),
            max_capacity: 1000,
        }
    }
}

/// A pricing service with a quote cache in front.
pub struct CachedPricingClient<S> {
    inner: S,
    quotes: MokaCache<QuoteKey, LiveQuote>,
}

impl<S> CachedPricingClient<S> {
    /// Wrap a service.
    pub fn new(inner: S, config: &QuoteCacheConfig) -> Self {
        let quotes = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { inner, quotes }
    }

    fn key(origin: &str, destination: &str, when: &str) -> QuoteKey {
        (
            normalize(origin).into_string(),
            normalize(destination).into_string(),
            normalize(when).into_string(),
        )
    }

    /// Access the wrapped service.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Number of cached quotes. Pending inserts may not be counted yet.
    pub fn cache_entry_count(&self) -> u64 {
        self.quotes.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_cache(&self) {
        self.quotes.invalidate_all();
    }
}

impl<S: PricingService> PricingService for CachedPricingClient<S> {
    async fn quote(
        &self,
        origin: &str,
        destination: &str,
        when: &str,
    ) -> Result<LiveQuote, PricingError> {
        let key = Self::key(origin, destination, when);

        if let Some(cached) = self.quotes.get(&key).await {
            tracing::debug!(origin, destination, when, "pricing cache hit");
            return Ok(cached);
        }

        let quote = self.inner.quote(origin, destination, when).await?;
        self.quotes.insert(key, quote.clone()).await;
        Ok(quote)
    }
}
