use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::charts::{default_catalogue, ChartSpec};
use crate::viewport::{
    ACTIVE_SECTION_LOOKAHEAD, MOBILE_BREAKPOINT, NAV_HEADER_OFFSET, REVEAL_RATIO,
    SCROLLED_THRESHOLD,
};

/// Element id of the optional inline JSON override block.
pub const CONFIG_ELEMENT_ID: &str = "report-config";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid page configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("page configuration lists no charts")]
    NoCharts,
}

/// Tunables for the page controller. Every field is optional in JSON.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct PageConfig {
    pub scroll_throttle_ms: u64,
    pub resize_debounce_ms: u64,
    pub section_lookahead: f64,
    pub nav_header_offset: f64,
    pub scrolled_threshold: f64,
    pub reveal_ratio: f64,
    pub mobile_breakpoint: f64,
    pub charts: Vec<ChartSpec>,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            scroll_throttle_ms: 100,
            resize_debounce_ms: 250,
            section_lookahead: ACTIVE_SECTION_LOOKAHEAD,
            nav_header_offset: NAV_HEADER_OFFSET,
            scrolled_threshold: SCROLLED_THRESHOLD,
            reveal_ratio: REVEAL_RATIO,
            mobile_breakpoint: MOBILE_BREAKPOINT,
            charts: default_catalogue(),
        }
    }
}

impl PageConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_json::from_str(text)?;
        if config.charts.is_empty() {
            return Err(ConfigError::NoCharts);
        }
        Ok(config)
    }

    pub const fn scroll_throttle(&self) -> Duration {
        Duration::from_millis(self.scroll_throttle_ms)
    }

    pub const fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }
}
