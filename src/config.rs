//! Configuration management for regenradar.
//!
//! This module handles the layered configuration system with the following precedence:
//! 1. Command-line arguments (highest priority)
//! 2. Environment variables
//! 3. JSON config file
//! 4. Default values (lowest priority)
//!
//! The card section mirrors the record a dashboard host hands to the widget,
//! so a host's JSON (`{"lat": .., "lon": .., "zoom": .., "autoplayDelay": ..}`)
//! can be dropped in unchanged.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::colormaps::get_colormap;
use crate::error::{RadarError, Result};

/// Default forecast window in minutes (three hours ahead)
pub const DEFAULT_FORECAST_MINUTES: u32 = 180;

/// Upper bound accepted for the forecast window
pub const MAX_FORECAST_MINUTES: u32 = 300;

/// Default autoplay period in milliseconds
pub const DEFAULT_AUTOPLAY_DELAY_MS: u64 = 500;

/// Smallest autoplay period accepted
pub const MIN_AUTOPLAY_DELAY_MS: u64 = 100;

/// Command-line arguments for regenradar
#[derive(Parser, Debug)]
#[command(name = "regenradar")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Latitude of the home location
    #[arg(long, env = "REGENRADAR_LAT", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Longitude of the home location
    #[arg(long, env = "REGENRADAR_LON", allow_hyphen_values = true)]
    pub lon: Option<f64>,

    /// Initial map zoom level
    #[arg(short, long, env = "REGENRADAR_ZOOM")]
    pub zoom: Option<u8>,

    /// Forecast window in minutes (0-300)
    #[arg(short, long, env = "REGENRADAR_FORECAST")]
    pub forecast: Option<u32>,

    /// Autoplay delay in milliseconds (>= 100)
    #[arg(long, env = "REGENRADAR_AUTOPLAY_DELAY")]
    pub autoplay_delay: Option<u64>,

    /// Path to JSON configuration file
    #[arg(short, long, env = "REGENRADAR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Base URL of the radar service
    #[arg(long, env = "REGENRADAR_BASE_URL")]
    pub base_url: Option<String>,

    /// Seconds between data refreshes
    #[arg(long, env = "REGENRADAR_REFRESH_INTERVAL")]
    pub refresh_interval: Option<u64>,

    /// Colormap used for precipitation intensity
    #[arg(long, env = "REGENRADAR_COLORMAP")]
    pub colormap: Option<String>,

    /// Directory to write displayed frames to
    #[arg(short, long, env = "REGENRADAR_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "REGENRADAR_LOG_LEVEL")]
    pub log_level: Option<String>,
}

/// The widget's inbound configuration record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardConfig {
    /// Latitude of the home location
    #[serde(default)]
    pub lat: f64,

    /// Longitude of the home location
    #[serde(default)]
    pub lon: f64,

    /// Initial map zoom level
    #[serde(default = "default_zoom")]
    pub zoom: u8,

    /// Forecast window in minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forecast: Option<u32>,

    /// Autoplay period in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autoplay_delay: Option<u64>,
}

impl CardConfig {
    /// Forecast window, falling back to the default when unset
    pub fn forecast_minutes(&self) -> u32 {
        self.forecast.unwrap_or(DEFAULT_FORECAST_MINUTES)
    }

    /// Autoplay period, falling back to the default when unset
    pub fn autoplay_period(&self) -> Duration {
        Duration::from_millis(self.autoplay_delay.unwrap_or(DEFAULT_AUTOPLAY_DELAY_MS))
    }
}

/// Radar service connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Base URL of the radar service
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Timezone the service should report timestamps in
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Search distance around the home location in meters
    #[serde(default = "default_distance")]
    pub distance_m: u32,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// Complete configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Card configuration
    #[serde(default)]
    pub card: CardConfig,

    /// Radar service configuration
    #[serde(default)]
    pub source: SourceConfig,

    /// Seconds between data refreshes
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,

    /// Colormap name
    #[serde(default = "default_colormap")]
    pub colormap: String,

    /// Directory the headless surface writes frames to
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// Drop refresh results that arrive after a newer one was applied
    #[serde(default)]
    pub discard_stale_refreshes: bool,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Config {
    /// Load configuration from all sources with proper precedence
    pub fn load() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    /// Build configuration from already parsed arguments
    pub fn from_args(args: Args) -> Result<Self> {
        // Start with defaults
        let mut config = Config::default();

        // Load from JSON file if provided
        if let Some(config_path) = &args.config {
            let json_config = Self::load_from_file(config_path)?;
            config.merge(json_config);
        }

        // Override with command-line arguments and environment
        if let Some(lat) = args.lat {
            config.card.lat = lat;
        }
        if let Some(lon) = args.lon {
            config.card.lon = lon;
        }
        if let Some(zoom) = args.zoom {
            config.card.zoom = zoom;
        }
        if args.forecast.is_some() {
            config.card.forecast = args.forecast;
        }
        if args.autoplay_delay.is_some() {
            config.card.autoplay_delay = args.autoplay_delay;
        }
        if let Some(base_url) = args.base_url {
            config.source.base_url = base_url;
        }
        if let Some(secs) = args.refresh_interval {
            config.refresh_interval_secs = secs;
        }
        if let Some(colormap) = args.colormap {
            config.colormap = colormap;
        }
        if args.output_dir.is_some() {
            config.output_dir = args.output_dir;
        }
        if let Some(level) = args.log_level {
            config.log_level = level;
        }

        Ok(config)
    }

    /// Load configuration from a JSON file
    fn load_from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        self.card = other.card;
        self.source = other.source;
        self.refresh_interval_secs = other.refresh_interval_secs;
        self.colormap = other.colormap;
        if other.output_dir.is_some() {
            self.output_dir = other.output_dir;
        }
        self.discard_stale_refreshes = other.discard_stale_refreshes;
        self.log_level = other.log_level;
    }

    /// Period between data refreshes
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let card = &self.card;

        if !(-90.0..=90.0).contains(&card.lat) {
            return Err(RadarError::Config {
                message: format!("Latitude {} is outside [-90, 90]", card.lat),
            });
        }

        if !(-180.0..=180.0).contains(&card.lon) {
            return Err(RadarError::Config {
                message: format!("Longitude {} is outside [-180, 180]", card.lon),
            });
        }

        if card.zoom > 28 {
            return Err(RadarError::Config {
                message: format!("Zoom level {} is outside [0, 28]", card.zoom),
            });
        }

        if card.forecast_minutes() > MAX_FORECAST_MINUTES {
            return Err(RadarError::Config {
                message: format!(
                    "Forecast of {} minutes exceeds the maximum of {}",
                    card.forecast_minutes(),
                    MAX_FORECAST_MINUTES
                ),
            });
        }

        if let Some(delay) = card.autoplay_delay {
            if delay < MIN_AUTOPLAY_DELAY_MS {
                return Err(RadarError::Config {
                    message: format!(
                        "Autoplay delay of {}ms is below the minimum of {}ms",
                        delay, MIN_AUTOPLAY_DELAY_MS
                    ),
                });
            }
        }

        if self.refresh_interval_secs == 0 {
            return Err(RadarError::Config {
                message: "Refresh interval cannot be 0".to_string(),
            });
        }

        if self.source.base_url.is_empty() {
            return Err(RadarError::Config {
                message: "Radar service base URL cannot be empty".to_string(),
            });
        }

        if self.source.distance_m == 0 {
            return Err(RadarError::Config {
                message: "Search distance cannot be 0".to_string(),
            });
        }

        get_colormap(&self.colormap).map_err(|_| RadarError::Config {
            message: format!("Unknown colormap: {}", self.colormap),
        })?;

        // Validate log level
        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(RadarError::Config {
                    message: format!(
                        "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                        self.log_level
                    ),
                });
            }
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            card: CardConfig::default(),
            source: SourceConfig::default(),
            refresh_interval_secs: default_refresh_interval(),
            colormap: default_colormap(),
            output_dir: None,
            discard_stale_refreshes: false,
            log_level: default_log_level(),
        }
    }
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            lat: 0.0,
            lon: 0.0,
            zoom: default_zoom(),
            forecast: None,
            autoplay_delay: None,
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timezone: default_timezone(),
            distance_m: default_distance(),
            timeout_secs: default_timeout(),
        }
    }
}

// Default value functions for serde
fn default_zoom() -> u8 {
    9
}

fn default_base_url() -> String {
    "https://api.brightsky.dev".to_string()
}

fn default_timezone() -> String {
    "Europe/Berlin".to_string()
}

fn default_distance() -> u32 {
    100_000
}

fn default_timeout() -> u64 {
    30
}

fn default_refresh_interval() -> u64 {
    15 * 60
}

fn default_colormap() -> String {
    "turbo".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}
