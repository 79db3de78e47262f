//! JSON-based application configuration.
//!
//! Stores user preferences including:
//! - Focus and rest period lengths
//! - Notification sound settings
//! - Notes file location
//! - Window appearance
//!
//! Configuration lives at `<data dir>/config.json` unless a path is given
//! explicitly. Every field has a default, so partial files load.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::timer::PhaseDurations;

/// Upper bound for a single focus or rest period (one day).
pub const MAX_PERIOD_MINUTES: u32 = 24 * 60;

/// Countdown configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_focus_period")]
    pub focus_period_minutes: u32,
    #[serde(default = "default_rest_period")]
    pub rest_period_minutes: u32,
    /// Start the next phase automatically when one finishes.
    #[serde(default = "default_true")]
    pub auto_start_next: bool,
}

/// Notification sound configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// 0..=100
    #[serde(default = "default_volume")]
    pub volume: u32,
    /// File in the sounds directory played when a focus period ends.
    #[serde(default = "default_focus_end_sound")]
    pub focus_end: String,
    /// File in the sounds directory played when a rest period ends.
    #[serde(default = "default_rest_end_sound")]
    pub rest_end: String,
}

/// Notes storage configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotesConfig {
    /// Relative paths are resolved against the data directory.
    #[serde(default = "default_notes_file")]
    pub file: PathBuf,
    #[serde(default = "default_true")]
    pub autosave: bool,
}

/// Window configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_true")]
    pub dark_mode: bool,
    #[serde(default)]
    pub always_on_top: bool,
    #[serde(default = "default_window_width")]
    pub window_width: f32,
    #[serde(default = "default_window_height")]
    pub window_height: f32,
}

/// Session history configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub sound: SoundConfig,
    #[serde(default)]
    pub notes: NotesConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    /// Where this config was loaded from. Not serialized.
    #[serde(skip)]
    path: Option<PathBuf>,
}

fn default_focus_period() -> u32 {
    25
}
fn default_rest_period() -> u32 {
    5
}
fn default_true() -> bool {
    true
}
fn default_volume() -> u32 {
    70
}
fn default_focus_end_sound() -> String {
    "focus_end.wav".into()
}
fn default_rest_end_sound() -> String {
    "rest_end.wav".into()
}
fn default_notes_file() -> PathBuf {
    PathBuf::from("notes.txt")
}
fn default_window_width() -> f32 {
    360.0
}
fn default_window_height() -> f32 {
    540.0
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            focus_period_minutes: default_focus_period(),
            rest_period_minutes: default_rest_period(),
            auto_start_next: true,
        }
    }
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            volume: default_volume(),
            focus_end: default_focus_end_sound(),
            rest_end: default_rest_end_sound(),
        }
    }
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            file: default_notes_file(),
            autosave: true,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            dark_mode: true,
            always_on_top: false,
            window_width: default_window_width(),
            window_height: default_window_height(),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timer: TimerConfig::default(),
            sound: SoundConfig::default(),
            notes: NotesConfig::default(),
            ui: UiConfig::default(),
            history: HistoryConfig::default(),
            path: None,
        }
    }
}

impl SoundConfig {
    /// Volume as a rodio gain factor.
    pub fn gain(&self) -> f32 {
        self.volume.min(100) as f32 / 100.0
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        if key.is_empty() {
            return Err(unknown());
        }

        let mut parts = key.split('.').peekable();
        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => value
                        .parse::<bool>()
                        .map(serde_json::Value::Bool)
                        .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")));
                        }
                    }
                    serde_json::Value::Object(_) => {
                        return Err(invalid("key names a section, not a value".into()));
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Load from `path`, or write and return defaults when the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed,
    /// if it holds out-of-range values, or if defaults cannot be written.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut cfg = match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = serde_json::from_str(&content)
                    .map_err(|e| ConfigError::ParseFailed(format!("{}: {e}", path.display())))?;
                tracing::debug!(path = %path.display(), "loaded configuration");
                cfg
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "no configuration found, writing defaults");
                let cfg = Self::default();
                cfg.save_to(path)?;
                cfg
            }
            Err(e) => {
                return Err(ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })
            }
        };
        cfg.validate()?;
        cfg.path = Some(path.to_path_buf());
        Ok(cfg)
    }

    /// Load from `path`, falling back to defaults on any error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "using default configuration");
            Self {
                path: Some(path.to_path_buf()),
                ..Self::default()
            }
        })
    }

    /// File this config was loaded from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Persist to the file it was loaded from.
    ///
    /// # Errors
    ///
    /// Returns an error if the config has no backing file or cannot be written.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = self.path.as_deref().ok_or_else(|| ConfigError::SaveFailed {
            path: PathBuf::new(),
            message: "configuration has no backing file".into(),
        })?;
        self.save_to(path)
    }

    /// Persist to `path` as pretty JSON, creating parent directories.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
            }
        }
        let content = serde_json::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content + "\n").map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_period("timer.focus_period_minutes", self.timer.focus_period_minutes)?;
        check_period("timer.rest_period_minutes", self.timer.rest_period_minutes)?;
        if self.sound.volume > 100 {
            return Err(ConfigError::InvalidValue {
                key: "sound.volume".into(),
                message: format!("{} is outside 0..=100", self.sound.volume),
            });
        }
        if !(self.ui.window_width > 0.0 && self.ui.window_height > 0.0) {
            return Err(ConfigError::InvalidValue {
                key: "ui.window_width".into(),
                message: "window dimensions must be positive".into(),
            });
        }
        Ok(())
    }

    /// Apply command-line period overrides. They are never written to disk.
    pub fn apply_overrides(
        &mut self,
        focus: Option<u32>,
        rest: Option<u32>,
    ) -> Result<(), ConfigError> {
        if let Some(focus) = focus {
            check_period("timer.focus_period_minutes", focus)?;
            self.timer.focus_period_minutes = focus;
        }
        if let Some(rest) = rest {
            check_period("timer.rest_period_minutes", rest)?;
            self.timer.rest_period_minutes = rest;
        }
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key and persist it.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed or
    /// is out of range, or the config cannot be saved. On error the config
    /// is left unchanged.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let mut updated: Config = serde_json::from_value(json).map_err(|e| {
            ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            }
        })?;
        updated.validate()?;
        updated.path = self.path.clone();
        updated.save()?;
        *self = updated;
        Ok(())
    }

    /// Focus and rest lengths for the timer engine.
    pub fn durations(&self) -> PhaseDurations {
        PhaseDurations::new(
            self.timer.focus_period_minutes as u64,
            self.timer.rest_period_minutes as u64,
        )
    }
}

fn check_period(key: &str, minutes: u32) -> Result<(), ConfigError> {
    if minutes == 0 || minutes > MAX_PERIOD_MINUTES {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("{minutes} is outside 1..={MAX_PERIOD_MINUTES} minutes"),
        });
    }
    Ok(())
}
