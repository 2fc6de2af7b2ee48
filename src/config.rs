// Catalog configuration

use crate::logging::LogConfig;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_ICON_SIZE: u32 = 256;
pub const DEFAULT_PACKAGED_LOGO_SIZE: u32 = 48;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CatalogConfig {
    pub include_registry: bool,
    pub include_start_menu: bool,
    pub include_settings: bool,
    pub include_packaged_apps: bool,
    /// Edge length requested from the fixed-size icon step.
    pub icon_size: u32,
    pub packaged_logo_size: u32,
    pub extract_icons: bool,
    pub log: LogConfig,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        CatalogConfig {
            include_registry: true,
            include_start_menu: true,
            include_settings: true,
            include_packaged_apps: false,
            icon_size: DEFAULT_ICON_SIZE,
            packaged_logo_size: DEFAULT_PACKAGED_LOGO_SIZE,
            extract_icons: true,
            log: LogConfig::default(),
        }
    }
}

impl CatalogConfig {
    pub fn from_json_str(text: &str) -> anyhow::Result<Self> {
        let config: CatalogConfig =
            serde_json::from_str(text).context("invalid catalog configuration")?;
        Ok(config.clamped())
    }

    /// Missing file means defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(CatalogConfig::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        Self::from_json_str(&text)
    }

    fn clamped(mut self) -> Self {
        self.icon_size = self.icon_size.clamp(16, 256);
        self.packaged_logo_size = self.packaged_logo_size.clamp(16, 256);
        self
    }
}
