//! Taxi fare server.
//!
//! Understands free-text Greek and Greeklish fare questions such as
//! "από Πάτρα μέχρι Διακοπτό πόσο κάνει;", recovers the route, and answers
//! with a price, distance and duration, using a live pricing service when
//! one is configured and an offline tariff estimate otherwise.

pub mod area;
pub mod config;
pub mod distance;
pub mod duration;
pub mod pricing;
pub mod quote;
pub mod route;
pub mod tariff;
pub mod text;
pub mod web;
