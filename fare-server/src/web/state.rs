//! Application state for the web layer.

use std::sync::Arc;

use crate::config::FareContext;
use crate::pricing::Pricing;

/// Shared application state.
///
/// Everything in here is built once at startup and only read afterwards.
#[derive(Clone)]
pub struct AppState {
    /// Tariff, areas, fallback distances and reply texts
    pub ctx: Arc<FareContext>,

    /// Live pricing backend (possibly offline)
    pub pricing: Arc<Pricing>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(ctx: FareContext, pricing: Pricing) -> Self {
        Self {
            ctx: Arc::new(ctx),
            pricing: Arc::new(pricing),
        }
    }
}
