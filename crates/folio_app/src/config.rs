//! Page configuration (`folio.toml`)
//!
//! Every section is optional; missing values fall back to defaults that
//! reproduce the stock portfolio page.
//!
//! ```toml
//! frame_rate = 60
//!
//! [viewport]
//! width = 1280.0
//! height = 800.0
//!
//! [motion]
//! hover_policy = "ignore_while_active"
//! cancel_policy = "jump_to_end"
//!
//! [triggers]
//! footer_start = "top 90%"
//! reveal_actions = "play none none reverse"
//! ```

use crate::error::{FolioError, Result};
use folio_motion::{MotionSettings, TriggerSettings};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// File looked up by [`PageConfig::load_from_dir`]
pub const CONFIG_FILE: &str = "folio.toml";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Simulated frames per second
    pub frame_rate: u32,
    pub viewport: ViewportConfig,
    pub loading: LoadingConfig,
    pub layout: LayoutConfig,
    pub motion: MotionSettings,
    pub triggers: TriggerSettings,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            frame_rate: default_frame_rate(),
            viewport: ViewportConfig::default(),
            loading: LoadingConfig::default(),
            layout: LayoutConfig::default(),
            motion: MotionSettings::default(),
            triggers: TriggerSettings::default(),
        }
    }
}

fn default_frame_rate() -> u32 {
    60
}

/// Browser window size
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadingConfig {
    /// Show the loading screen before mounting the page content
    pub enabled: bool,
}

impl Default for LoadingConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Section heights in page pixels, top to bottom
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub hero: f32,
    pub about: f32,
    pub projects: f32,
    pub contact: f32,
    pub footer: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            hero: 800.0,
            about: 900.0,
            projects: 1200.0,
            contact: 900.0,
            footer: 300.0,
        }
    }
}

impl LayoutConfig {
    pub fn total_height(&self) -> f32 {
        self.hero + self.about + self.projects + self.contact + self.footer
    }
}

impl PageConfig {
    /// Load from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| FolioError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: PageConfig =
            toml::from_str(&content).map_err(|source| FolioError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load `folio.toml` from `dir`, or defaults if there is none
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        if !path.exists() {
            tracing::debug!("no {} in {}; using defaults", CONFIG_FILE, dir.display());
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Seconds per simulated frame
    pub fn frame_dt(&self) -> f32 {
        1.0 / self.frame_rate as f32
    }

    pub fn validate(&self) -> Result<()> {
        if self.frame_rate == 0 {
            return Err(FolioError::InvalidConfig("frame_rate must be positive".into()));
        }
        if !(self.viewport.width > 0.0 && self.viewport.height > 0.0) {
            return Err(FolioError::InvalidConfig(format!(
                "viewport must have a positive size, got {}x{}",
                self.viewport.width, self.viewport.height
            )));
        }
        let layout = self.layout;
        let heights = [layout.hero, layout.about, layout.projects, layout.contact, layout.footer];
        if heights.iter().any(|h| !h.is_finite() || *h < 0.0) {
            return Err(FolioError::InvalidConfig(
                "section heights must be finite and non-negative".into(),
            ));
        }
        Ok(())
    }
}
