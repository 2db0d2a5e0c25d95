//! Tariff table and fare estimation.

use serde::Serialize;

/// Average road speed assumed for intercity trips.
pub const AVERAGE_SPEED_KMH: f64 = 85.0;

/// Default width of the price band shown around an estimate.
const DEFAULT_BAND_PCT: f64 = 0.08;

/// Error returned when tariff rates are inconsistent.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid tariff: {reason}")]
pub struct InvalidTariff {
    reason: &'static str,
}

/// Validated tariff rates.
///
/// Rates are finite and non-negative, and the night rate is never below
/// the day rate. Built once at startup from configuration.
///
/// # Examples
///
/// ```
/// use fare_server::tariff::TariffTable;
///
/// let tariff = TariffTable::new(4.0, 0.9, 1.25).unwrap();
/// assert_eq!(tariff.estimate(275.0, false).price_eur, 251.5);
///
/// // Night cheaper than day is rejected
/// assert!(TariffTable::new(4.0, 1.25, 0.9).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TariffTable {
    minimum_fare: f64,
    day_km_rate: f64,
    night_km_rate: f64,
}

impl TariffTable {
    /// Create a tariff table, validating the rates.
    pub fn new(
        minimum_fare: f64,
        day_km_rate: f64,
        night_km_rate: f64,
    ) -> Result<Self, InvalidTariff> {
        for rate in [minimum_fare, day_km_rate, night_km_rate] {
            if !rate.is_finite() {
                return Err(InvalidTariff {
                    reason: "rates must be finite numbers",
                });
            }
            if rate < 0.0 {
                return Err(InvalidTariff {
                    reason: "rates must not be negative",
                });
            }
        }
        if night_km_rate < day_km_rate {
            return Err(InvalidTariff {
                reason: "night rate must not be below day rate",
            });
        }

        Ok(Self {
            minimum_fare,
            day_km_rate,
            night_km_rate,
        })
    }

    pub fn minimum_fare(&self) -> f64 {
        self.minimum_fare
    }

    pub fn day_km_rate(&self) -> f64 {
        self.day_km_rate
    }

    pub fn night_km_rate(&self) -> f64 {
        self.night_km_rate
    }

    /// The per-kilometre rate that applies.
    pub fn km_rate(&self, night: bool) -> f64 {
        if night {
            self.night_km_rate
        } else {
            self.day_km_rate
        }
    }

    /// Estimate price and duration for a distance.
    ///
    /// Negative or non-finite distances count as zero. The price is rounded
    /// to cents and is never below the minimum fare.
    pub fn estimate(&self, distance_km: f64, night: bool) -> FareEstimate {
        let distance_km = clamp_distance(distance_km);
        let raw = self.minimum_fare + self.km_rate(night) * distance_km;

        FareEstimate {
            distance_km,
            duration_min: minutes_for_distance(distance_km),
            price_eur: round_cents(raw).max(self.minimum_fare),
        }
    }
}

impl Default for TariffTable {
    fn default() -> Self {
        Self {
            minimum_fare: 4.0,
            day_km_rate: 0.90,
            night_km_rate: 1.25,
        }
    }
}

/// A priced trip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FareEstimate {
    pub distance_km: f64,
    pub duration_min: u32,
    pub price_eur: f64,
}

fn clamp_distance(distance_km: f64) -> f64 {
    if distance_km.is_finite() && distance_km > 0.0 {
        distance_km
    } else {
        0.0
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Driving minutes for a distance at [`AVERAGE_SPEED_KMH`].
pub fn minutes_for_distance(distance_km: f64) -> u32 {
    let minutes = (clamp_distance(distance_km) / AVERAGE_SPEED_KMH * 60.0).round();
    minutes.min(u32::MAX as f64) as u32
}

/// Round a price to a multiple of 5 euros.
///
/// `price / 5` is rounded half-to-even before scaling back, so 252.5 goes
/// to 250 and 257.5 to 260. NaN yields 0 and prices beyond the `i64` range
/// saturate.
///
/// # Examples
///
/// ```
/// use fare_server::tariff::round_to_5;
///
/// assert_eq!(round_to_5(251.5), 250);
/// assert_eq!(round_to_5(253.0), 255);
/// assert_eq!(round_to_5(round_to_5(251.5) as f64), 250);
/// ```
pub fn round_to_5(price: f64) -> i64 {
    if price.is_nan() {
        return 0;
    }
    ((price / 5.0).round_ties_even() as i64).saturating_mul(5)
}

/// Whether a price and its band round to 5 euros without saturating.
pub fn fits_rounding(price: f64) -> bool {
    price.is_finite() && price.abs() * (1.0 + DEFAULT_BAND_PCT) < i64::MAX as f64
}

/// A low/high range around a price, both ends rounded to 5 euros.
///
/// The band is ±8% and the low end never goes below zero.
pub fn price_band(price: f64) -> (i64, i64) {
    price_band_pct(price, DEFAULT_BAND_PCT)
}

fn price_band_pct(price: f64, pct: f64) -> (i64, i64) {
    let low = round_to_5(price * (1.0 - pct)).max(0);
    let high = round_to_5(price * (1.0 + pct));
    (low, high)
}
