//! Free-text notes kept in a single UTF-8 file.

use chrono::{DateTime, Local};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::NotesError;
use crate::storage::{AppPaths, NotesConfig};

#[derive(Debug, Clone)]
pub struct NotesManager {
    path: PathBuf,
}

impl NotesManager {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Notes file named by the config, resolved against the data directory.
    pub fn from_config(config: &NotesConfig, paths: &AppPaths) -> Self {
        Self::new(paths.resolve(&config.file))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current notes. A missing file reads as empty.
    pub fn load(&self) -> Result<String, NotesError> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
            Err(source) => Err(NotesError::ReadFailed {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Replace the notes. Written to a sibling temp file and renamed over the
    /// original, so a crash leaves either the old or the new text.
    pub fn save(&self, text: &str) -> Result<(), NotesError> {
        let write_failed = |source: std::io::Error| NotesError::WriteFailed {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(write_failed)?;
            }
        }

        let tmp = self.path.with_extension("tmp");
        {
            let mut file = std::fs::File::create(&tmp).map_err(write_failed)?;
            file.write_all(text.as_bytes()).map_err(write_failed)?;
            file.sync_all().map_err(write_failed)?;
        }
        std::fs::rename(&tmp, &self.path).map_err(write_failed)?;
        tracing::debug!(path = %self.path.display(), bytes = text.len(), "notes saved");
        Ok(())
    }

    /// Add a timestamped line to the end of the notes.
    pub fn append(&self, entry: &str) -> Result<(), NotesError> {
        self.append_at(entry, Local::now())
    }

    pub fn append_at(&self, entry: &str, at: DateTime<Local>) -> Result<(), NotesError> {
        let entry = entry.trim();
        if entry.is_empty() {
            return Err(NotesError::EmptyEntry);
        }
        let mut text = self.load()?;
        if !text.is_empty() && !text.ends_with('\n') {
            text.push('\n');
        }
        text.push_str(&format!("[{}] {entry}\n", at.format("%Y-%m-%d %H:%M")));
        self.save(&text)
    }

    pub fn clear(&self) -> Result<(), NotesError> {
        self.save("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        let notes = NotesManager::new(tmp.path().join("notes.txt"));
        assert_eq!(notes.load().unwrap(), "");
    }

    #[test]
    fn save_then_load() {
        let tmp = TempDir::new().unwrap();
        let notes = NotesManager::new(tmp.path().join("sub").join("notes.txt"));
        notes.save("write the report\nreply to Sam").unwrap();
        assert_eq!(notes.load().unwrap(), "write the report\nreply to Sam");
        assert!(!notes.path().with_extension("tmp").exists());
    }

    #[test]
    fn append_adds_timestamped_lines() {
        let tmp = TempDir::new().unwrap();
        let notes = NotesManager::new(tmp.path().join("notes.txt"));
        notes.save("existing text").unwrap();
        let at = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap();
        notes.append_at("  finished chapter two ", at).unwrap();
        assert_eq!(
            notes.load().unwrap(),
            "existing text\n[2024-03-09 14:05] finished chapter two\n"
        );
    }

    #[test]
    fn append_rejects_blank_entries() {
        let tmp = TempDir::new().unwrap();
        let notes = NotesManager::new(tmp.path().join("notes.txt"));
        assert!(matches!(notes.append("   "), Err(NotesError::EmptyEntry)));
        assert!(!notes.path().exists());
    }

    #[test]
    fn clear_empties_file() {
        let tmp = TempDir::new().unwrap();
        let notes = NotesManager::new(tmp.path().join("notes.txt"));
        notes.append("something").unwrap();
        notes.clear().unwrap();
        assert_eq!(notes.load().unwrap(), "");
    }

    #[test]
    fn from_config_resolves_relative_file() {
        let paths = AppPaths::under("/data/pomodoro");
        let notes = NotesManager::from_config(&NotesConfig::default(), &paths);
        assert_eq!(notes.path(), Path::new("/data/pomodoro/notes.txt"));
    }
}
