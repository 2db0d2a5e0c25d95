//! Tariff arithmetic: per-kilometre pricing, price rounding and the
//! night/double-tariff rule.

mod night;
mod table;

pub use night::is_night_tariff;
pub use table::{
    AVERAGE_SPEED_KMH, FareEstimate, InvalidTariff, TariffTable, fits_rounding,
    minutes_for_distance, price_band, round_to_5,
};
