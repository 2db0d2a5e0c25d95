//! Route extraction from free text.
//!
//! Recovers an origin/destination pair from sentences such as
//! "από Πάτρα μέχρι Διακοπτό πόσο κάνει;" using a short cascade of route
//! grammars tried in strict priority order.

mod distance_query;
mod grammar;
mod shorthand;

pub use distance_query::rewrite_distance_query;
pub use grammar::{RouteGrammar, RouteQuery, extract_route, is_route_stopword};
pub use shorthand::{rewrite_separated_route, rewrite_two_place_names};
