mod config;
pub mod database;

pub use config::{
    Config, HistoryConfig, NotesConfig, SoundConfig, TimerConfig, UiConfig, MAX_PERIOD_MINUTES,
};
pub use database::{Database, SessionRecord, Stats};

use std::path::{Path, PathBuf};

/// Returns the application data directory.
///
/// `POMODORO_DATA_DIR` wins when set. Otherwise `~/.config/pomodoro[-dev]/`
/// based on POMODORO_ENV (set POMODORO_ENV=dev for a development directory).
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = match std::env::var_os("POMODORO_DATA_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("POMODORO_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("pomodoro-dev")
            } else {
                base_dir.join("pomodoro")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Every file and directory the application touches, rooted at one place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub root: PathBuf,
    pub config_file: PathBuf,
    pub log_file: PathBuf,
    pub database: PathBuf,
    pub sounds_dir: PathBuf,
    pub icons_dir: PathBuf,
}

impl AppPaths {
    /// Layout under the default data directory.
    pub fn discover() -> std::io::Result<Self> {
        Ok(Self::under(data_dir()?))
    }

    pub fn under(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            config_file: root.join("config.json"),
            log_file: root.join("pomodoro.log"),
            database: root.join("history.db"),
            sounds_dir: root.join("sounds"),
            icons_dir: root.join("icons"),
            root,
        }
    }

    /// Use a config file outside the data directory.
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = path.into();
        self
    }

    /// Create the asset directories if they are missing.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        for dir in [&self.root, &self.sounds_dir, &self.icons_dir] {
            if !dir.exists() {
                std::fs::create_dir_all(dir)?;
                tracing::debug!(dir = %dir.display(), "created directory");
            }
        }
        Ok(())
    }

    /// Resolve a path taken from the config file. Relative paths live under `root`.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}
