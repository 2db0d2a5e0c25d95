//! Web layer for the fare engine.
//!
//! Exposes fare quotes and area resolution over HTTP.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
