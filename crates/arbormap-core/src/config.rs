use crate::error::{ArborError, Result};
use crate::models::{Distance, DistanceUnit, GeoPosition};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

pub const DEFAULT_DATA_PATH: &str = "data/trees.csv";
pub const DEFAULT_SCALE: f64 = 225_000.0;
pub const DEFAULT_MAP_SIZE: u32 = 750;
pub const DEFAULT_MAX_DISTANCE: f64 = 2.1;

/// Roughly the middle of San Francisco
pub fn default_center() -> GeoPosition {
    GeoPosition::new(37.767683, -122.433701)
}

/// Layered configuration for Arbormap
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub data_path: ConfigValue<PathBuf>,
    pub center: ConfigValue<GeoPosition>,
    pub scale: ConfigValue<f64>,
    pub map_width: ConfigValue<u32>,
    pub map_height: ConfigValue<u32>,
    pub max_distance: ConfigValue<f64>,
    pub distance_unit: ConfigValue<DistanceUnit>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            data_path: ConfigValue::new(PathBuf::from(DEFAULT_DATA_PATH), ConfigSource::Default),
            center: ConfigValue::new(default_center(), ConfigSource::Default),
            scale: ConfigValue::new(DEFAULT_SCALE, ConfigSource::Default),
            map_width: ConfigValue::new(DEFAULT_MAP_SIZE, ConfigSource::Default),
            map_height: ConfigValue::new(DEFAULT_MAP_SIZE, ConfigSource::Default),
            max_distance: ConfigValue::new(DEFAULT_MAX_DISTANCE, ConfigSource::Default),
            distance_unit: ConfigValue::new(DistanceUnit::Miles, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| ArborError::ConfigInvalid {
            key: "file".to_string(),
            reason: format!("Failed to read config file: {}", e),
        })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| ArborError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(data_path) = file_config.data_path {
            self.data_path.update(data_path, ConfigSource::File);
        }

        if let Some(center) = file_config.center {
            self.center.update(center, ConfigSource::File);
        }

        if let Some(scale) = file_config.scale {
            self.scale.update(validate_scale(scale)?, ConfigSource::File);
        }

        if let Some(width) = file_config.map_width {
            self.map_width.update(width, ConfigSource::File);
        }

        if let Some(height) = file_config.map_height {
            self.map_height.update(height, ConfigSource::File);
        }

        if let Some(max_distance) = file_config.max_distance {
            self.max_distance.update(validate_max_distance(max_distance)?, ConfigSource::File);
        }

        if let Some(distance_unit) = file_config.distance_unit {
            self.distance_unit.update(distance_unit, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // ARBORMAP_DATA_PATH
        if let Ok(path) = env::var("ARBORMAP_DATA_PATH") {
            self.data_path.update(PathBuf::from(path), ConfigSource::Environment);
        }

        // ARBORMAP_CENTER
        if let Ok(center_str) = env::var("ARBORMAP_CENTER") {
            match parse_center(&center_str) {
                Ok(center) => self.center.update(center, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid ARBORMAP_CENTER value '{}': expected 'longitude,latitude'",
                    center_str
                ),
            }
        }

        // ARBORMAP_SCALE
        if let Ok(scale_str) = env::var("ARBORMAP_SCALE") {
            match parse_number(&scale_str, "scale").and_then(validate_scale) {
                Ok(scale) => self.scale.update(scale, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid ARBORMAP_SCALE value '{}': expected a positive number",
                    scale_str
                ),
            }
        }

        // ARBORMAP_MAP_SIZE
        if let Ok(size_str) = env::var("ARBORMAP_MAP_SIZE") {
            match parse_map_size(&size_str) {
                Ok((width, height)) => {
                    self.map_width.update(width, ConfigSource::Environment);
                    self.map_height.update(height, ConfigSource::Environment);
                }
                Err(_) => tracing::warn!(
                    "Invalid ARBORMAP_MAP_SIZE value '{}': expected WIDTHxHEIGHT",
                    size_str
                ),
            }
        }

        // ARBORMAP_MAX_DISTANCE
        if let Ok(distance_str) = env::var("ARBORMAP_MAX_DISTANCE") {
            match parse_number(&distance_str, "max_distance").and_then(validate_max_distance) {
                Ok(distance) => self.max_distance.update(distance, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid ARBORMAP_MAX_DISTANCE value '{}': expected a non-negative number",
                    distance_str
                ),
            }
        }

        // ARBORMAP_DISTANCE_UNIT
        if let Ok(unit_str) = env::var("ARBORMAP_DISTANCE_UNIT") {
            match parse_distance_unit(&unit_str) {
                Ok(unit) => self.distance_unit.update(unit, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid ARBORMAP_DISTANCE_UNIT value '{}': expected meters, kilometers, miles, or feet",
                    unit_str
                ),
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(data_path) = overrides.data_path {
            self.data_path.update(data_path, ConfigSource::Cli);
        }

        if let Some(max_distance) = overrides.max_distance {
            match validate_max_distance(max_distance) {
                Ok(distance) => self.max_distance.update(distance, ConfigSource::Cli),
                Err(_) => tracing::warn!(
                    "Ignoring --max-distance {}: expected a non-negative number",
                    max_distance
                ),
            }
        }

        if let Some(distance_unit) = overrides.distance_unit {
            self.distance_unit.update(distance_unit, ConfigSource::Cli);
        }
    }

    /// Resolve the layered values into plain settings
    pub fn settings(&self) -> MapSettings {
        MapSettings {
            data_path: self.data_path.value.clone(),
            center: self.center.value,
            scale: self.scale.value,
            map_width: self.map_width.value,
            map_height: self.map_height.value,
            poi_max_distance: Distance::new(self.max_distance.value, self.distance_unit.value),
        }
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "data_path".to_string(),
            (self.data_path.value.display().to_string(), self.data_path.source),
        );

        map.insert(
            "center".to_string(),
            (
                format!("{}, {}", self.center.value.longitude, self.center.value.latitude),
                self.center.source,
            ),
        );

        map.insert("scale".to_string(), (self.scale.value.to_string(), self.scale.source));

        // Reported source is the strongest layer that set either dimension
        let map_size_source =
            if self.map_height.source.precedence() > self.map_width.source.precedence() {
                self.map_height.source
            } else {
                self.map_width.source
            };
        map.insert(
            "map_size".to_string(),
            (format!("{}x{}", self.map_width.value, self.map_height.value), map_size_source),
        );

        map.insert(
            "max_distance".to_string(),
            (self.max_distance.value.to_string(), self.max_distance.source),
        );

        map.insert(
            "distance_unit".to_string(),
            (format!("{:?}", self.distance_unit.value), self.distance_unit.source),
        );

        map
    }
}

/// Resolved map configuration
#[derive(Debug, Clone, PartialEq)]
pub struct MapSettings {
    pub data_path: PathBuf,
    pub center: GeoPosition,
    pub scale: f64,
    pub map_width: u32,
    pub map_height: u32,
    pub poi_max_distance: Distance,
}

impl MapSettings {
    /// Pixel offset of the map center: half the image footprint
    pub fn translate(&self) -> (f64, f64) {
        (self.map_width as f64 / 2.0, self.map_height as f64 / 2.0)
    }
}

impl Default for MapSettings {
    fn default() -> Self {
        LayeredConfig::with_defaults().settings()
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    data_path: Option<PathBuf>,
    center: Option<GeoPosition>,
    scale: Option<f64>,
    map_width: Option<u32>,
    map_height: Option<u32>,
    max_distance: Option<f64>,
    distance_unit: Option<DistanceUnit>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub data_path: Option<PathBuf>,
    pub max_distance: Option<f64>,
    pub distance_unit: Option<DistanceUnit>,
}

fn parse_number(s: &str, key: &str) -> Result<f64> {
    s.trim().parse::<f64>().map_err(|_| ArborError::ConfigInvalid {
        key: key.to_string(),
        reason: format!("Not a number: {}", s),
    })
}

fn validate_scale(scale: f64) -> Result<f64> {
    if scale.is_finite() && scale > 0.0 {
        Ok(scale)
    } else {
        Err(ArborError::ConfigInvalid {
            key: "scale".to_string(),
            reason: format!("Scale must be a positive number, got {}", scale),
        })
    }
}

fn validate_max_distance(distance: f64) -> Result<f64> {
    if distance.is_finite() && distance >= 0.0 {
        Ok(distance)
    } else {
        Err(ArborError::ConfigInvalid {
            key: "max_distance".to_string(),
            reason: format!("Max distance must be a non-negative number, got {}", distance),
        })
    }
}

/// Parse distance unit from string
pub fn parse_distance_unit(s: &str) -> Result<DistanceUnit> {
    match s.to_lowercase().as_str() {
        "meters" | "m" => Ok(DistanceUnit::Meters),
        "kilometers" | "km" => Ok(DistanceUnit::Kilometers),
        "miles" | "mi" => Ok(DistanceUnit::Miles),
        "feet" | "ft" => Ok(DistanceUnit::Feet),
        _ => Err(ArborError::ConfigInvalid {
            key: "distance_unit".to_string(),
            reason: format!("Invalid distance unit: {}. Use meters, kilometers, miles, or feet", s),
        }),
    }
}

/// Parse a map center written as `longitude,latitude`
pub fn parse_center(s: &str) -> Result<GeoPosition> {
    let invalid = || ArborError::ConfigInvalid {
        key: "center".to_string(),
        reason: format!("Invalid center: {}. Use 'longitude,latitude'", s),
    };

    let (lon, lat) = s.split_once(',').ok_or_else(invalid)?;
    let longitude: f64 = lon.trim().parse().map_err(|_| invalid())?;
    let latitude: f64 = lat.trim().parse().map_err(|_| invalid())?;

    let center = GeoPosition::new(latitude, longitude);
    if center.is_finite() {
        Ok(center)
    } else {
        Err(invalid())
    }
}

/// Parse a map footprint written as `WIDTHxHEIGHT`
pub fn parse_map_size(s: &str) -> Result<(u32, u32)> {
    let invalid = || ArborError::ConfigInvalid {
        key: "map_size".to_string(),
        reason: format!("Invalid map size: {}. Use WIDTHxHEIGHT", s),
    };

    let lowered = s.to_lowercase();
    let (w, h) = lowered.split_once('x').ok_or_else(invalid)?;
    let width: u32 = w.trim().parse().map_err(|_| invalid())?;
    let height: u32 = h.trim().parse().map_err(|_| invalid())?;
    Ok((width, height))
}
