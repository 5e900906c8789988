//! Configuration management
//!
//! Settings live in `settings.json` in the data directory:
//! ```json
//! {
//!   "app": { "demoMode": false },
//!   "gateway": { "declineRate": 0.1, "minDelayMs": 400, "maxDelayMs": 1200 }
//! }
//! ```
//! Fields the crate does not manage are preserved on save.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::adapters::GatewayConfig;

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
    #[serde(default)]
    gateway: GatewaySettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default)]
    demo_mode: bool,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GatewaySettings {
    #[serde(default = "default_decline_rate")]
    decline_rate: f64,
    #[serde(default = "default_min_delay_ms")]
    min_delay_ms: u64,
    #[serde(default = "default_max_delay_ms")]
    max_delay_ms: u64,
}

fn default_decline_rate() -> f64 {
    0.1
}
fn default_min_delay_ms() -> u64 {
    400
}
fn default_max_delay_ms() -> u64 {
    1200
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            decline_rate: default_decline_rate(),
            min_delay_ms: default_min_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

/// Bodega configuration (simplified view of settings)
#[derive(Debug, Clone)]
pub struct Config {
    pub demo_mode: bool,
    pub gateway: GatewayConfig,
    // Keep the raw settings for preservation when saving
    _raw_settings: SettingsFile,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            demo_mode: false,
            gateway: GatewayConfig::default(),
            _raw_settings: SettingsFile::default(),
        }
    }
}

impl Config {
    /// Load config from the data directory
    ///
    /// The gateway decline rate can be overridden via the
    /// `BODEGA_GATEWAY_DECLINE_RATE` environment variable (for CI/testing,
    /// e.g. `0` for deterministic approvals).
    pub fn load(data_dir: &Path) -> Result<Self> {
        let settings_path = data_dir.join("settings.json");

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        let decline_rate = std::env::var("BODEGA_GATEWAY_DECLINE_RATE")
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
            .map(|r| r.clamp(0.0, 1.0))
            .unwrap_or(raw.gateway.decline_rate);

        Ok(Self {
            demo_mode: raw.app.demo_mode,
            gateway: GatewayConfig {
                decline_rate,
                min_delay_ms: raw.gateway.min_delay_ms,
                max_delay_ms: raw.gateway.max_delay_ms,
            },
            _raw_settings: raw,
        })
    }

    /// Save config to the data directory
    /// Preserves settings this crate doesn't manage
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        let settings_path = data_dir.join("settings.json");

        let mut settings = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str::<SettingsFile>(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        settings.app.demo_mode = self.demo_mode;
        settings.gateway = GatewaySettings {
            decline_rate: self.gateway.decline_rate,
            min_delay_ms: self.gateway.min_delay_ms,
            max_delay_ms: self.gateway.max_delay_ms,
        };

        std::fs::create_dir_all(data_dir)?;
        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)?;
        Ok(())
    }
}
