//! Configuration management
//!
//! The built-in defaults match the shipped hardware; a config file is only
//! needed to target the "pro" revision's product id or to tune the
//! discovery budget.

use crate::usb::discovery::{DISCOVERY_TIMEOUT, POLL_INTERVAL};
use anyhow::{Context, Result, anyhow};
use protocol::{BOOTLOADER_IDENTITY, DeviceIdentity, OPERATIONAL_IDENTITY};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PanelConfig {
    #[serde(default)]
    pub panel: PanelSettings,
    #[serde(default)]
    pub device: DeviceSettings,
    #[serde(default)]
    pub discovery: DiscoverySettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelSettings {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Vendor/product identifiers for both device personas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceSettings {
    #[serde(default = "default_bootloader_vendor_id")]
    pub bootloader_vendor_id: u16,
    #[serde(default = "default_bootloader_product_id")]
    pub bootloader_product_id: u16,
    #[serde(default = "default_vendor_id")]
    pub vendor_id: u16,
    #[serde(default = "default_product_id")]
    pub product_id: u16,
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            bootloader_vendor_id: default_bootloader_vendor_id(),
            bootloader_product_id: default_bootloader_product_id(),
            vendor_id: default_vendor_id(),
            product_id: default_product_id(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoverySettings {
    /// Wall-clock budget for the device to re-enumerate after a flash.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Sleep between bus scans while waiting.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_bootloader_vendor_id() -> u16 {
    BOOTLOADER_IDENTITY.vendor_id
}

fn default_bootloader_product_id() -> u16 {
    BOOTLOADER_IDENTITY.product_id
}

fn default_vendor_id() -> u16 {
    OPERATIONAL_IDENTITY.vendor_id
}

fn default_product_id() -> u16 {
    OPERATIONAL_IDENTITY.product_id
}

fn default_timeout_ms() -> u64 {
    DISCOVERY_TIMEOUT.as_millis() as u64
}

fn default_poll_interval_ms() -> u64 {
    POLL_INTERVAL.as_millis() as u64
}

impl PanelConfig {
    pub fn bootloader_identity(&self) -> DeviceIdentity {
        DeviceIdentity::new(
            self.device.bootloader_vendor_id,
            self.device.bootloader_product_id,
        )
    }

    pub fn operational_identity(&self) -> DeviceIdentity {
        DeviceIdentity::new(self.device.vendor_id, self.device.product_id)
    }

    pub fn discovery_timeout(&self) -> Duration {
        Duration::from_millis(self.discovery.timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.discovery.poll_interval_ms)
    }

    /// Load configuration from the specified path
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = if let Some(p) = path {
            p
        } else {
            let candidate = Self::default_path();
            if !candidate.exists() {
                return Err(anyhow!("No configuration file found, using defaults"));
            }
            candidate
        };

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: PanelConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        config.validate()?;

        tracing::info!("Loaded configuration from: {}", config_path.display());
        Ok(config)
    }

    /// Load configuration or return defaults if not found
    pub fn load_or_default() -> Self {
        match Self::load(None) {
            Ok(config) => config,
            Err(e) => {
                // stderr, since logging is not initialized yet
                eprintln!("Config: {}", e);
                Self::default()
            }
        }
    }

    /// Save configuration to the specified path
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Get the default configuration file path
    pub fn default_path() -> PathBuf {
        if let Some(config_dir) = dirs::config_dir() {
            config_dir.join("panelkit").join("panelctl.toml")
        } else {
            PathBuf::from(".config/panelkit/panelctl.toml")
        }
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.panel.log_level.as_str()) {
            return Err(anyhow!(
                "Invalid log level '{}', must be one of: {}",
                self.panel.log_level,
                valid_levels.join(", ")
            ));
        }

        if self.discovery.poll_interval_ms == 0 {
            return Err(anyhow!("Discovery poll interval must be nonzero"));
        }

        if self.discovery.timeout_ms < self.discovery.poll_interval_ms {
            return Err(anyhow!(
                "Discovery timeout ({} ms) is shorter than the poll interval ({} ms)",
                self.discovery.timeout_ms,
                self.discovery.poll_interval_ms
            ));
        }

        Ok(())
    }
}
