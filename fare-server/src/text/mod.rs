//! Text canonicalization for mixed Greek / Greeklish input.
//!
//! Two passes are provided:
//! - [`normalize`] folds case, accents, compatibility forms and whitespace so
//!   that pattern matching is script- and spelling-insensitive.
//! - [`preclean_route_text`] is the lighter pass used before route extraction.
//!   It keeps the user's own spelling of place names and only removes
//!   question tails and rewrites Greeklish route connectives.

mod normalize;
mod route_clean;

pub use normalize::{NormalizedText, normalize};
pub use route_clean::preclean_route_text;
