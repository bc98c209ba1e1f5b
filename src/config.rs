use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;
use std::time::Duration;
use validator::Validate;

use crate::core::discovery::{NearbySearch, ResponseOrdering, DEFAULT_CATEGORY, DEFAULT_RADIUS_M};
use crate::models::Coordinate;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Settings {
    #[serde(default)]
    pub places: PlacesSettings,
    #[serde(default)]
    #[validate(nested)]
    pub discovery: DiscoverySettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlacesSettings {
    #[serde(default = "default_places_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: String,
    pub timeout_secs: Option<u64>,
}

impl Default for PlacesSettings {
    fn default() -> Self {
        Self {
            endpoint: default_places_endpoint(),
            api_key: String::new(),
            timeout_secs: None,
        }
    }
}

impl PlacesSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(10))
    }
}

fn default_places_endpoint() -> String { "https://maps.googleapis.com".to_string() }

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DiscoverySettings {
    #[serde(default = "default_anchor_latitude")]
    #[validate(range(min = -90.0, max = 90.0))]
    pub anchor_latitude: f64,
    #[serde(default = "default_anchor_longitude")]
    #[validate(range(min = -180.0, max = 180.0))]
    pub anchor_longitude: f64,
    #[serde(default = "default_radius_m")]
    #[validate(range(min = 1, max = 50000))]
    pub radius_m: u32,
    #[serde(default = "default_categories")]
    #[validate(length(min = 1))]
    pub categories: Vec<String>,
    #[serde(default)]
    pub ordering: ResponseOrdering,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            anchor_latitude: default_anchor_latitude(),
            anchor_longitude: default_anchor_longitude(),
            radius_m: default_radius_m(),
            categories: default_categories(),
            ordering: ResponseOrdering::default(),
        }
    }
}

impl DiscoverySettings {
    pub fn nearby_search(&self) -> NearbySearch {
        NearbySearch {
            anchor: Coordinate::new(self.anchor_latitude, self.anchor_longitude),
            radius_m: self.radius_m,
            categories: self.categories.iter().cloned().collect::<BTreeSet<_>>(),
        }
    }
}

fn default_anchor_latitude() -> f64 { -21.6034 }
fn default_anchor_longitude() -> f64 { -48.3665 }
fn default_radius_m() -> u32 { DEFAULT_RADIUS_M }
fn default_categories() -> Vec<String> { vec![DEFAULT_CATEGORY.to_string()] }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with PEXINXA_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., PEXINXA__DISCOVERY__RADIUS_M -> discovery.radius_m
            .add_source(
                Environment::with_prefix("PEXINXA")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = apply_api_key_override(settings)?;

        settings.try_deserialize::<Settings>()?.validated()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("PEXINXA")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize::<Settings>()?.validated()
    }

    fn validated(self) -> Result<Self, ConfigError> {
        self.validate()
            .map_err(|e| ConfigError::Message(format!("Invalid settings: {}", e)))?;
        Ok(self)
    }
}

/// The API key may also come from the conventional unprefixed variables
fn apply_api_key_override(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let api_key = env::var("PEXINXA_PLACES_API_KEY")
        .or_else(|_| env::var("GOOGLE_MAPS_API_KEY"))
        .ok();

    match api_key {
        Some(key) => Config::builder()
            .add_source(settings)
            .set_override("places.api_key", key)?
            .build(),
        None => Ok(settings),
    }
}
