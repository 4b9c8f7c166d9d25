use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;

use crate::style::DEFAULT_PROTOCOL_COLORS;

/// Styling knobs for the rendered view.
#[derive(Debug, Deserialize, Clone)]
pub struct StyleSettings {
    /// Canonical `protocol → color` table. Loaded once; unmapped protocols
    /// degrade to `fallback_color`.
    #[serde(default = "default_protocol_colors")]
    pub protocol_colors: HashMap<String, String>,
    #[serde(default = "default_fallback_color")]
    pub fallback_color: String,
    #[serde(default = "default_muted_color")]
    pub muted_color: String,
    #[serde(default = "default_muted_opacity")]
    pub muted_opacity: f64,
    #[serde(default = "default_muted_width_factor")]
    pub muted_width_factor: f64,
    #[serde(default = "default_highlight_width_factor")]
    pub highlight_width_factor: f64,
}

fn default_protocol_colors() -> HashMap<String, String> {
    DEFAULT_PROTOCOL_COLORS
        .iter()
        .map(|(protocol, color)| (protocol.to_string(), color.to_string()))
        .collect()
}

fn default_fallback_color() -> String {
    "#848484".to_string()
}

fn default_muted_color() -> String {
    "#c8c8c8".to_string()
}

fn default_muted_opacity() -> f64 {
    0.3
}

fn default_muted_width_factor() -> f64 {
    0.7
}

fn default_highlight_width_factor() -> f64 {
    10.0
}

impl Default for StyleSettings {
    fn default() -> Self {
        Self {
            protocol_colors: default_protocol_colors(),
            fallback_color: default_fallback_color(),
            muted_color: default_muted_color(),
            muted_opacity: default_muted_opacity(),
            muted_width_factor: default_muted_width_factor(),
            highlight_width_factor: default_highlight_width_factor(),
        }
    }
}

/// Knobs for the streaming ingestion adapter.
#[derive(Debug, Deserialize, Clone)]
pub struct IngestionSettings {
    /// Token address sentinel that denotes the chain's native asset.
    #[serde(default = "default_zero_address")]
    pub zero_address: String,
    /// Symbol substituted for the zero-address sentinel.
    #[serde(default = "default_native_asset_symbol")]
    pub native_asset_symbol: String,
    /// Spot price assumed when the batch's price map has no entry for a pool.
    #[serde(default = "default_spot_price")]
    pub default_spot_price: f64,
}

fn default_zero_address() -> String {
    "0x0000000000000000000000000000000000000000".to_string()
}

fn default_native_asset_symbol() -> String {
    "ETH".to_string()
}

fn default_spot_price() -> f64 {
    1.0
}

impl Default for IngestionSettings {
    fn default() -> Self {
        Self {
            zero_address: default_zero_address(),
            native_asset_symbol: default_native_asset_symbol(),
            default_spot_price: default_spot_price(),
        }
    }
}

/// Endpoint for the external route-simulation service.
#[derive(Debug, Deserialize, Clone)]
pub struct SimulationSettings {
    #[serde(default = "default_simulation_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_simulation_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_simulation_endpoint() -> String {
    "http://0.0.0.0:3000/api/simulate".to_string()
}

fn default_simulation_timeout_seconds() -> u64 {
    10
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            endpoint: default_simulation_endpoint(),
            timeout_seconds: default_simulation_timeout_seconds(),
        }
    }
}

/// Route solver options.
#[derive(Debug, Deserialize, Clone)]
pub struct SolverSettings {
    /// When true, routes are restricted to pools currently visible under the
    /// session's selection filter.
    #[serde(default = "default_false")]
    pub restrict_to_visible: bool,
}

fn default_false() -> bool {
    false
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            restrict_to_visible: default_false(),
        }
    }
}

/// Top-level configuration.
///
/// Loaded once at startup from an optional `config/default.toml` plus
/// `POOL_GRAPH_`-prefixed environment overrides; every field falls back to a
/// built-in default so a bare environment works out of the box.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Settings {
    #[serde(default)]
    pub style: StyleSettings,
    #[serde(default)]
    pub ingestion: IngestionSettings,
    #[serde(default)]
    pub simulation: SimulationSettings,
    #[serde(default)]
    pub solver: SolverSettings,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_file("config/default")
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("POOL_GRAPH").separator("__"))
            .build()?;
        config.try_deserialize()
    }
}
