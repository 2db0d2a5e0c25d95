//! Live quote payloads.

use serde_json::{Map, Value};

use super::error::PricingError;
use crate::duration::DurationValue;

/// Keys that may carry the price, in preference order.
pub const PRICE_KEYS: &[&str] = &["price_eur", "price", "total_eur", "fare"];
/// Keys that may carry the distance in km.
pub const DISTANCE_KEYS: &[&str] = &["distance_km", "km", "distance"];
/// Keys that may carry the duration.
pub const DURATION_KEYS: &[&str] = &["duration_min", "minutes", "duration", "duration_seconds"];
/// Keys that may carry a map link.
pub const MAP_KEYS: &[&str] = &["map_url", "mapLink", "route_url", "map"];

/// The key whose numeric value is always seconds.
const SECONDS_KEY: &str = "duration_seconds";

/// A successful answer from the pricing service.
///
/// The service is not consistent about key names, so every field is read
/// through a list of aliases and any of them may be missing.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveQuote {
    fields: Map<String, Value>,
}

impl LiveQuote {
    /// Accept a decoded response body.
    ///
    /// Anything but a JSON object is a [`PricingError::Json`]; an object
    /// with an `error` key is a [`PricingError::Remote`].
    pub fn from_value(value: Value) -> Result<Self, PricingError> {
        let Value::Object(fields) = value else {
            return Err(PricingError::Json {
                message: format!("expected a JSON object, got {}", kind(&value)),
            });
        };

        if let Some(error) = fields.get("error") {
            let message = match error {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            return Err(PricingError::Remote { message });
        }

        Ok(Self { fields })
    }

    /// The first alias with a usable value, and that alias.
    ///
    /// `null` and blank strings count as absent.
    pub fn field<'a>(&'a self, aliases: &[&'a str]) -> Option<(&'a str, &'a Value)> {
        aliases.iter().find_map(|&key| {
            let value = self.fields.get(key)?;
            match value {
                Value::Null => None,
                Value::String(s) if s.trim().is_empty() => None,
                _ => Some((key, value)),
            }
        })
    }

    /// Raw price value.
    pub fn price(&self) -> Option<&Value> {
        self.field(PRICE_KEYS).map(|(_, v)| v)
    }

    /// Distance in km, if present and numeric.
    pub fn distance_km(&self) -> Option<f64> {
        self.field(DISTANCE_KEYS)
            .and_then(|(_, v)| coerce_number(v))
    }

    /// Duration, if present. A number under `duration_seconds` is seconds.
    pub fn duration(&self) -> Option<DurationValue> {
        let (key, value) = self.field(DURATION_KEYS)?;
        if key == SECONDS_KEY {
            DurationValue::seconds_from_json(value)
        } else {
            DurationValue::from_json(value)
        }
    }

    /// Map link supplied by the service.
    pub fn map_url(&self) -> Option<&str> {
        self.field(MAP_KEYS).and_then(|(_, v)| v.as_str())
    }
}

/// Read a number from JSON, accepting strings with a decimal comma.
///
/// # Examples
///
/// ```
/// use fare_server::pricing::coerce_number;
/// use serde_json::json;
///
/// assert_eq!(coerce_number(&json!(12.5)), Some(12.5));
/// assert_eq!(coerce_number(&json!("12,5")), Some(12.5));
/// assert_eq!(coerce_number(&json!("περίπου 12")), None);
/// ```
pub fn coerce_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().replace(',', ".").parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
