//! Game configuration
//!
//! Stored as RON next to the working directory (`mayhem.ron`). A missing
//! file means defaults; a file that does not parse is an error.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::video::{BankId, Color, VideoConfig, SYSTEM_BANK};

pub const CONFIG_FILE: &str = "mayhem.ron";

/// A font to load at start-up. An empty `path` selects the presenter's
/// built-in font.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub id: BankId,
    pub path: PathBuf,
    pub size: u16,
    #[serde(default)]
    pub style: i32,
    #[serde(default = "default_font_color")]
    pub color: Color,
}

fn default_font_color() -> Color {
    Color::WHITE
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSpec {
    pub id: BankId,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// -1 centres the window on that axis
    pub window_x: i32,
    pub window_y: i32,
    pub show_fps: bool,
    pub target_frame_rate: u32,
    pub video: VideoConfig,
    pub fonts: Vec<FontSpec>,
    pub images: Vec<ImageSpec>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window_x: -1,
            window_y: -1,
            show_fps: true,
            target_frame_rate: 60,
            video: VideoConfig::default(),
            fonts: vec![FontSpec {
                id: BankId::new(SYSTEM_BANK, 0),
                path: PathBuf::new(),
                size: 16,
                style: 0,
                color: Color::WHITE,
            }],
            images: vec![
                ImageSpec {
                    id: BankId::new(SYSTEM_BANK, 1),
                    path: PathBuf::from("assets/system/badge.png"),
                },
                ImageSpec {
                    id: BankId::new(SYSTEM_BANK, 2),
                    path: PathBuf::from("assets/system/logo.png"),
                },
            ],
        }
    }
}

impl GameConfig {
    /// Milliseconds one frame may take at the target rate.
    pub fn frame_budget_ms(&self) -> u32 {
        1000 / self.target_frame_rate.max(1)
    }

    pub fn from_ron(contents: &str) -> Result<Self, CoreError> {
        Ok(ron::from_str(contents)?)
    }

    pub fn to_ron(&self) -> Result<String, CoreError> {
        let config = ron::ser::PrettyConfig::new()
            .depth_limit(4)
            .indentor("  ".to_string());
        Ok(ron::ser::to_string_pretty(self, config)?)
    }

    /// Load `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        if !path.exists() {
            info!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path).map_err(|e| CoreError::load_failure(path, e))?;
        let config = Self::from_ron(&contents)?;
        info!("config loaded from {}", path.display());
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), CoreError> {
        let contents = self.to_ron()?;
        fs::write(path, contents).map_err(|e| CoreError::Config(format!("{}: {}", path.display(), e)))
    }
}
