use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use egui::Color32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ad_markers::MARKER_WIDTH;
use crate::chapter::CHAPTER_GAP_PERCENT;
use crate::visibility::MIN_SEEK_WINDOW_SECS;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config TOML from {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub backoff_factor: f64,
    pub timeout_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            base_delay_ms: 1000,
            backoff_factor: 2.0,
            timeout_ms: 30_000,
        }
    }
}

impl RetryPolicy {
    /// Delay before retry round `attempt` (1-based).
    pub fn delay_before(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1) as i32;
        let ms = self.base_delay_ms as f64 * self.backoff_factor.max(1.0).powi(exponent);
        Duration::from_millis(ms.min(u64::MAX as f64) as u64)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThumbnailConfig {
    pub mime_preference: Vec<String>,
    pub max_bandwidth_fraction: f64,
    pub multiplexed_mime: String,
    pub multiplexed_codec: String,
    pub retry: RetryPolicy,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            mime_preference: [
                "image/avif",
                "image/webp",
                "image/jpeg",
                "image/png",
                "image/svg+xml",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            max_bandwidth_fraction: 0.01,
            multiplexed_mime: "application/mp4".to_owned(),
            multiplexed_codec: "mjpg".to_owned(),
            retry: RetryPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrubConfig {
    pub seek_debounce_secs: f64,
    pub hide_preview_delay_secs: f64,
    pub ad_poll_interval_secs: f64,
    pub min_seek_window_secs: f64,
    pub end_epsilon_secs: f64,
    pub marker_width: f64,
    pub chapter_gap_percent: f64,
    pub chapter_language: String,
    pub ad_break_color: [u8; 4],
    pub preview_width: f32,
    pub preview_offset_top: f32,
    pub thumbnails: ThumbnailConfig,
}

impl Default for ScrubConfig {
    fn default() -> Self {
        Self {
            seek_debounce_secs: 0.125,
            hide_preview_delay_secs: 0.25,
            ad_poll_interval_secs: 0.25,
            min_seek_window_secs: MIN_SEEK_WINDOW_SECS,
            end_epsilon_secs: 0.001,
            marker_width: MARKER_WIDTH,
            chapter_gap_percent: CHAPTER_GAP_PERCENT,
            chapter_language: "en".to_owned(),
            ad_break_color: [255, 204, 0, 255],
            preview_width: 160.0,
            preview_offset_top: -10.0,
            thumbnails: ThumbnailConfig::default(),
        }
    }
}

impl ScrubConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn ad_break_color(&self) -> Color32 {
        let [r, g, b, a] = self.ad_break_color;
        Color32::from_rgba_unmultiplied(r, g, b, a)
    }
}
