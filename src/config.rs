//! Editor configuration
//!
//! Every field has a default, so a page can pass a partial object (or none).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::DEFAULT_SCORE;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid editor config: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Options forwarded to `abcjs.renderAbc`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderOptions {
    pub responsive: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            responsive: "resize".to_string(),
        }
    }
}

/// Options forwarded to `SynthController.load`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ControlOptions {
    pub display_restart: bool,
    pub display_play: bool,
    pub display_progress: bool,
    pub display_clock: bool,
}

impl Default for ControlOptions {
    fn default() -> Self {
        Self {
            display_restart: true,
            display_play: true,
            display_progress: true,
            display_clock: true,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Query parameter holding the encoded score
    pub score_param: String,
    pub default_score: String,
    /// Selector of the element wrapping the rendered `<svg>`
    pub cursor_root_selector: String,
    /// Playback widget re-enabled once a tune is loaded
    pub audio_selector: String,
    pub highlight_class: String,
    pub cursor_class: String,
    /// Horizontal gap between the cursor line and the note's left edge
    pub cursor_offset: f64,
    /// Quiet period before an edit triggers a re-render
    pub debounce_ms: u32,
    pub render_options: RenderOptions,
    pub control_options: ControlOptions,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            score_param: "s".to_string(),
            default_score: DEFAULT_SCORE.to_string(),
            cursor_root_selector: "#paper".to_string(),
            audio_selector: ".abcjs-inline-audio".to_string(),
            highlight_class: "abcjs-highlight".to_string(),
            cursor_class: "abcjs-cursor".to_string(),
            cursor_offset: 2.0,
            debounce_ms: 300,
            render_options: RenderOptions::default(),
            control_options: ControlOptions::default(),
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// `selector` if the caller gave one, else `cursor_root_selector`
    pub fn cursor_root<'a>(&'a self, selector: Option<&'a str>) -> &'a str {
        selector.unwrap_or(&self.cursor_root_selector)
    }

    /// `delay_ms` if the caller gave one, else `debounce_ms`
    pub fn debounce_delay(&self, delay_ms: Option<u32>) -> u32 {
        delay_ms.unwrap_or(self.debounce_ms)
    }
}
