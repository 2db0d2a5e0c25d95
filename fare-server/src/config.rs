//! Configuration loading and the process-wide fare context.
//!
//! Everything here is read once at startup. A malformed file, inconsistent
//! tariff or unusable alias list is reported before the server binds.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::area::{AliasPatternError, AreaAliases, AreaResolver, default_areas};
use crate::distance::{DEFAULT_FALLBACK_KM, FallbackDistances};
use crate::tariff::{InvalidTariff, TariffTable};

/// Environment variable naming the TOML config file.
pub const CONFIG_PATH_VAR: &str = "FARE_CONFIG";

const DEFAULT_ASK_TRIP_ROUTE: &str =
    "❓ Πες μου από πού ξεκινάς και πού πας (π.χ. 'από Πάτρα μέχρι Λουτράκι').";
const DEFAULT_FARE_DISCLAIMER: &str = "⚠️ Η τιμή δεν περιλαμβάνει διόδια.";

/// Errors raised while building configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`FareConfig`]
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error(transparent)]
    Tariff(#[from] InvalidTariff),

    #[error(transparent)]
    Areas(#[from] AliasPatternError),

    /// A value is out of range
    #[error("invalid value for {field}: {message}")]
    Invalid { field: String, message: String },
}

/// Tariff rates. The zone names used by older configs are accepted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TariffConfig {
    pub minimum_fare: f64,
    #[serde(alias = "km_rate_zone1")]
    pub day_km_rate: f64,
    #[serde(alias = "km_rate_zone2_or_night")]
    pub night_km_rate: f64,
}

impl Default for TariffConfig {
    fn default() -> Self {
        let table = TariffTable::default();
        Self {
            minimum_fare: table.minimum_fare(),
            day_km_rate: table.day_km_rate(),
            night_km_rate: table.night_km_rate(),
        }
    }
}

/// An extra directed entry for the fallback distance table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DistanceEntry {
    pub origin: String,
    pub destination: String,
    pub km: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Origin assumed by distance questions that name only a destination
    pub default_area: String,
    /// Distance used for pairs missing from the fallback table
    pub fallback_distance_km: f64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            default_area: "Πάτρα".to_string(),
            fallback_distance_km: DEFAULT_FALLBACK_KM,
        }
    }
}

/// User-facing strings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Sent when no route can be recovered from a message
    pub ask_trip_route: String,
    /// Last line of every quote
    pub fare_disclaimer: String,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            ask_trip_route: DEFAULT_ASK_TRIP_ROUTE.to_string(),
            fare_disclaimer: DEFAULT_FARE_DISCLAIMER.to_string(),
        }
    }
}

/// Live pricing service settings. No `base_url` means offline.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    pub base_url: Option<String>,
    pub path: String,
    pub timeout_secs: u64,
    pub cache_ttl_secs: u64,
    pub api_key: Option<String>,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            path: "/webhook".to_string(),
            timeout_secs: 25,
            cache_ttl_secs: 600,
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
        }
    }
}

/// The whole configuration file. Every section is optional.
///
/// ```toml
/// [tariff]
/// minimum_fare = 4.0
/// km_rate_zone1 = 0.90
/// km_rate_zone2_or_night = 1.25
///
/// [[areas]]
/// name = "Ρίο"
/// aliases = ["ριο", "αντιριο"]
///
/// [[distances]]
/// origin = "Πάτρα"
/// destination = "Πύργος"
/// km = 97
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FareConfig {
    pub tariff: TariffConfig,
    /// Replaces the built-in areas when present. Order is match order.
    pub areas: Vec<AreaAliases>,
    /// Added on top of the built-in distances.
    pub distances: Vec<DistanceEntry>,
    pub defaults: DefaultsConfig,
    pub text: TextConfig,
    pub pricing: PricingConfig,
    pub server: ServerConfig,
}

impl Default for FareConfig {
    fn default() -> Self {
        Self {
            tariff: TariffConfig::default(),
            areas: default_areas(),
            distances: Vec::new(),
            defaults: DefaultsConfig::default(),
            text: TextConfig::default(),
            pricing: PricingConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl FareConfig {
    /// Parse a TOML document.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Read and parse a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from the file named by `FARE_CONFIG` (defaults if unset), then
    /// apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// [`FareConfig::load`] with an explicit variable lookup.
    pub fn load_with(env: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let config = match non_empty(env(CONFIG_PATH_VAR)) {
            Some(path) => {
                tracing::info!(%path, "loading configuration");
                Self::from_file(path)?
            }
            None => Self::default(),
        };
        Ok(config.with_env_overrides(env))
    }

    /// Apply `PRICING_API_URL`, `PRICING_API_KEY` and `BIND_ADDR`.
    /// Empty values are ignored.
    pub fn with_env_overrides(mut self, env: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = non_empty(env("PRICING_API_URL")) {
            self.pricing.base_url = Some(url);
        }
        if let Some(key) = non_empty(env("PRICING_API_KEY")) {
            self.pricing.api_key = Some(key);
        }
        if let Some(bind) = non_empty(env("BIND_ADDR")) {
            self.server.bind = bind;
        }
        self
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn check_distance(field: &str, km: f64) -> Result<f64, ConfigError> {
    if km.is_finite() && km >= 0.0 {
        Ok(km)
    } else {
        Err(ConfigError::Invalid {
            field: field.to_string(),
            message: format!("{km} is not a non-negative distance"),
        })
    }
}

/// Immutable tables shared by every request.
#[derive(Debug, Clone)]
pub struct FareContext {
    tariff: TariffTable,
    areas: AreaResolver,
    distances: FallbackDistances,
    default_area: String,
    text: TextConfig,
}

impl FareContext {
    /// Validate configuration and build the tables.
    pub fn from_config(config: &FareConfig) -> Result<Self, ConfigError> {
        let tariff = TariffTable::new(
            config.tariff.minimum_fare,
            config.tariff.day_km_rate,
            config.tariff.night_km_rate,
        )?;

        let areas = AreaResolver::new(&config.areas)?;

        let default_km = check_distance(
            "defaults.fallback_distance_km",
            config.defaults.fallback_distance_km,
        )?;
        let mut distances = FallbackDistances::builtin().with_default(default_km);
        for entry in &config.distances {
            let km = check_distance(
                &format!("distances[{} -> {}].km", entry.origin, entry.destination),
                entry.km,
            )?;
            distances = distances.with_entry(&entry.origin, &entry.destination, km);
        }

        let default_area = config.defaults.default_area.trim();
        if default_area.is_empty() {
            return Err(ConfigError::Invalid {
                field: "defaults.default_area".to_string(),
                message: "must not be empty".to_string(),
            });
        }

        tracing::debug!(
            areas = areas.rules().len(),
            distances = distances.len(),
            "fare context built"
        );

        Ok(Self {
            tariff,
            areas,
            distances,
            default_area: default_area.to_string(),
            text: config.text.clone(),
        })
    }

    /// Context from built-in defaults only.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_config(&FareConfig::default())
    }

    pub fn tariff(&self) -> &TariffTable {
        &self.tariff
    }

    pub fn areas(&self) -> &AreaResolver {
        &self.areas
    }

    pub fn distances(&self) -> &FallbackDistances {
        &self.distances
    }

    pub fn default_area(&self) -> &str {
        &self.default_area
    }

    pub fn text(&self) -> &TextConfig {
        &self.text
    }
}
