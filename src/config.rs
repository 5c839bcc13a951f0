//! Configuration file support.
//!
//! Editor tunables, keybindings and the default category list serialize to a
//! single JSON document that can be exported and imported.

use serde::{Deserialize, Serialize};

use crate::constants::{
    HANDLE_SIZE, NUDGE_STEP, PASTE_OFFSET, SELECTION_BRIGHTEN, UNDO_HISTORY_SIZE, zoom,
};
use crate::keybindings::KeyBindings;
use crate::model::{Category, default_categories};

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Editor tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorPreferences {
    /// Snapshots kept on the undo stack
    #[serde(default = "default_undo_history_size")]
    pub undo_history_size: usize,

    /// Resize handle side length at 1x zoom, in display pixels
    #[serde(default = "default_handle_size")]
    pub handle_size: f32,

    /// Offset applied to pasted boxes, in image pixels
    #[serde(default = "default_paste_offset")]
    pub paste_offset: f32,

    /// Distance an arrow key moves the selection, in image pixels
    #[serde(default = "default_nudge_step")]
    pub nudge_step: f32,

    #[serde(default = "default_zoom_min")]
    pub zoom_min: f32,

    #[serde(default = "default_zoom_max")]
    pub zoom_max: f32,

    /// Multiplicative zoom change per wheel step
    #[serde(default = "default_zoom_wheel_factor")]
    pub zoom_wheel_factor: f32,

    /// Per-channel boost for selected annotation colors
    #[serde(default = "default_selection_brighten")]
    pub selection_brighten: u8,

    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,
}

fn default_undo_history_size() -> usize {
    UNDO_HISTORY_SIZE
}

fn default_handle_size() -> f32 {
    HANDLE_SIZE
}

fn default_paste_offset() -> f32 {
    PASTE_OFFSET
}

fn default_nudge_step() -> f32 {
    NUDGE_STEP
}

fn default_zoom_min() -> f32 {
    zoom::MIN
}

fn default_zoom_max() -> f32 {
    zoom::MAX
}

fn default_zoom_wheel_factor() -> f32 {
    zoom::WHEEL_FACTOR
}

fn default_selection_brighten() -> u8 {
    SELECTION_BRIGHTEN
}

impl Default for EditorPreferences {
    fn default() -> Self {
        Self {
            undo_history_size: default_undo_history_size(),
            handle_size: default_handle_size(),
            paste_offset: default_paste_offset(),
            nudge_step: default_nudge_step(),
            zoom_min: default_zoom_min(),
            zoom_max: default_zoom_max(),
            zoom_wheel_factor: default_zoom_wheel_factor(),
            selection_brighten: default_selection_brighten(),
            log_level: LogLevel::default(),
        }
    }
}

/// Application configuration that can be exported and imported.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// Editor tunables
    #[serde(default)]
    pub preferences: EditorPreferences,

    /// Keybinding configuration
    #[serde(default)]
    pub keybindings: KeyBindings,

    /// Category definitions
    #[serde(default = "default_categories")]
    pub categories: Vec<Category>,
}

impl EditorConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            preferences: EditorPreferences::default(),
            keybindings: KeyBindings::default(),
            categories: default_categories(),
        }
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        // Validate version compatibility
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        let prefs = &config.preferences;
        if prefs.zoom_min <= 0.0 || prefs.zoom_max < prefs.zoom_min {
            return Err(ConfigError::Invalid(format!(
                "zoom range [{}, {}] is not valid",
                prefs.zoom_min, prefs.zoom_max
            )));
        }
        if prefs.undo_history_size == 0 {
            return Err(ConfigError::Invalid(
                "undo_history_size must be at least 1".to_string(),
            ));
        }

        Ok(config)
    }

    /// Get the default filename for config export.
    pub fn default_filename() -> &'static str {
        "boxmark-config.json"
    }

    /// Get the default config file path for auto-load/save.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<std::path::PathBuf> {
        // Try to use XDG config directory, fall back to home directory
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("boxmark").join(Self::default_filename()))
        } else {
            dirs::home_dir().map(|home_dir| {
                home_dir
                    .join(".config")
                    .join("boxmark")
                    .join(Self::default_filename())
            })
        }
    }

    /// Load configuration from a file.
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Try to load configuration from the default path.
    /// Returns None if the file doesn't exist or can't be read.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            log::debug!("No config file found at {:?}", path);
            return None;
        }

        match Self::load(&path) {
            Ok(config) => Some(config),
            Err(e) => {
                log::warn!("Failed to load config file {:?}: {}", path, e);
                None
            }
        }
    }

    /// Save configuration to a file, creating parent directories if needed.
    pub fn save(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = self.to_json()?;
        std::fs::write(path, json)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// A value is outside its allowed range
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
