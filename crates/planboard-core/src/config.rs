use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::{PlanboardError, PlanboardResult};

const DEFAULT_UNDO_WINDOW_SECS: u64 = 30;
const DEFAULT_UNDO_SWEEP_INTERVAL_SECS: u64 = 5;
const DEFAULT_DRAG_ACTIVATION_DISTANCE: f32 = 8.0;
const DEFAULT_BOARD_NAME: &str = "My Board";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// How long a deleted card stays restorable from the client undo buffer.
    pub undo_window_secs: u64,
    /// How often the undo buffer is swept for expired entries.
    pub undo_sweep_interval_secs: u64,
    /// Pointer travel, in pixels, before a press turns into a drag.
    pub drag_activation_distance: f32,
    /// Name of the board created when a session finds none.
    pub default_board_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            undo_window_secs: DEFAULT_UNDO_WINDOW_SECS,
            undo_sweep_interval_secs: DEFAULT_UNDO_SWEEP_INTERVAL_SECS,
            drag_activation_distance: DEFAULT_DRAG_ACTIVATION_DISTANCE,
            default_board_name: DEFAULT_BOARD_NAME.to_string(),
            data_file: None,
        }
    }
}

impl AppConfig {
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            dirs::home_dir().map(|home| home.join(".config/planboard/config.toml"))
        }
        #[cfg(target_os = "linux")]
        {
            dirs::config_dir().map(|config| config.join("planboard/config.toml"))
        }
        #[cfg(target_os = "windows")]
        {
            dirs::config_dir().map(|config| config.join("planboard\\config.toml"))
        }
        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            None
        }
    }

    /// Load from the platform config path, falling back to defaults when the
    /// file is missing or unreadable.
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path).unwrap_or_else(|e| {
                tracing::warn!("Ignoring config at {}: {}", path.display(), e);
                Self::default()
            }),
            _ => Self::default(),
        }
    }

    pub fn load_from(path: &Path) -> PlanboardResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&content).map_err(|e| PlanboardError::Config(e.to_string()))?;
        config.validate()?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> PlanboardResult<()> {
        if self.undo_sweep_interval_secs == 0 {
            return Err(PlanboardError::Config(
                "undo_sweep_interval_secs must be greater than zero".to_string(),
            ));
        }
        if !self.drag_activation_distance.is_finite() || self.drag_activation_distance < 0.0 {
            return Err(PlanboardError::Config(
                "drag_activation_distance must be a non-negative number".to_string(),
            ));
        }
        if self.default_board_name.trim().is_empty() {
            return Err(PlanboardError::Config(
                "default_board_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn undo_window(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.undo_window_secs as i64)
    }

    pub fn undo_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.undo_sweep_interval_secs)
    }
}
