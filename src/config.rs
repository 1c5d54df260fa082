use serde::Deserialize;
use std::path::Path;

use crate::services::bounds::LatLngBounds;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Warsaw open-data API access
    #[serde(default)]
    pub api: ApiConfig,
    /// Refresh cadence and zoom thresholds
    #[serde(default)]
    pub sync: SyncConfig,
    /// Startup viewport for the headless monitor
    #[serde(default)]
    pub viewport: ViewportConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "ApiConfig::default_base_url")]
    pub base_url: String,
    /// Resource id of the buses/trams dataset
    #[serde(default = "ApiConfig::default_resource_id")]
    pub resource_id: String,
    #[serde(default)]
    pub api_key: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            resource_id: Self::default_resource_id(),
            api_key: String::new(),
        }
    }
}

impl ApiConfig {
    fn default_base_url() -> String {
        "https://api.um.warszawa.pl/".to_string()
    }
    fn default_resource_id() -> String {
        "f2e5503e-927d-4ad3-9500-4ab9e55deb59".to_string()
    }
}

/// Timer and throttle settings of the sync controller.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SyncConfig {
    /// Refresh interval while zoomed in (ms)
    #[serde(default = "SyncConfig::default_high_zoom_interval_ms")]
    pub high_zoom_interval_ms: u64,
    /// Refresh interval while zoomed out (ms)
    #[serde(default = "SyncConfig::default_low_zoom_interval_ms")]
    pub low_zoom_interval_ms: u64,
    /// Debounce after a viewport settle before re-rendering (ms)
    #[serde(default = "SyncConfig::default_map_update_delay_ms")]
    pub map_update_delay_ms: u64,
    /// Minimum spacing between API calls (ms)
    #[serde(default = "SyncConfig::default_min_api_call_interval_ms")]
    pub min_api_call_interval_ms: u64,
    /// Zoom level below which individual vehicles are not shown
    #[serde(default = "SyncConfig::default_min_zoom_level")]
    pub min_zoom_level: f32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            high_zoom_interval_ms: Self::default_high_zoom_interval_ms(),
            low_zoom_interval_ms: Self::default_low_zoom_interval_ms(),
            map_update_delay_ms: Self::default_map_update_delay_ms(),
            min_api_call_interval_ms: Self::default_min_api_call_interval_ms(),
            min_zoom_level: Self::default_min_zoom_level(),
        }
    }
}

impl SyncConfig {
    fn default_high_zoom_interval_ms() -> u64 {
        5000
    }
    fn default_low_zoom_interval_ms() -> u64 {
        15000
    }
    fn default_map_update_delay_ms() -> u64 {
        1000
    }
    fn default_min_api_call_interval_ms() -> u64 {
        5000
    }
    fn default_min_zoom_level() -> f32 {
        14.0
    }
}

/// Where the monitor looks when it starts. Defaults to central Warsaw.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ViewportConfig {
    #[serde(default = "ViewportConfig::default_center_lat")]
    pub center_lat: f64,
    #[serde(default = "ViewportConfig::default_center_lon")]
    pub center_lon: f64,
    #[serde(default = "ViewportConfig::default_zoom")]
    pub zoom: f32,
    /// Half-height of the viewport in degrees latitude
    #[serde(default = "ViewportConfig::default_lat_span")]
    pub lat_span: f64,
    /// Half-width of the viewport in degrees longitude
    #[serde(default = "ViewportConfig::default_lon_span")]
    pub lon_span: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            center_lat: Self::default_center_lat(),
            center_lon: Self::default_center_lon(),
            zoom: Self::default_zoom(),
            lat_span: Self::default_lat_span(),
            lon_span: Self::default_lon_span(),
        }
    }
}

impl ViewportConfig {
    fn default_center_lat() -> f64 {
        52.2881717
    }
    fn default_center_lon() -> f64 {
        21.0061544
    }
    fn default_zoom() -> f32 {
        15.0
    }
    fn default_lat_span() -> f64 {
        0.02
    }
    fn default_lon_span() -> f64 {
        0.03
    }

    pub fn bounds(&self) -> LatLngBounds {
        LatLngBounds::new(
            self.center_lat - self.lat_span,
            self.center_lat + self.lat_span,
            self.center_lon - self.lon_span,
            self.center_lon + self.lon_span,
        )
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::ReadError(e.to_string()))?;

        serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),
    #[error("Failed to parse config: {0}")]
    ParseError(String),
}
