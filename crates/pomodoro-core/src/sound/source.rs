use std::fs;
use std::path::{Path, PathBuf};

use crate::timer::Phase;

/// File extensions rodio can decode with its default features.
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["wav", "ogg", "mp3", "flac"];

/// Where a cue's audio comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum SoundSource {
    /// Audio file on disk.
    File(PathBuf),
    /// Generated sine tone, used when no file is available.
    Tone { frequency_hz: f32, duration_ms: u64 },
}

impl SoundSource {
    /// Built-in tone for the end of `phase`. Focus ends high, rest ends lower.
    pub fn builtin(phase: Phase) -> Self {
        match phase {
            Phase::Focus => SoundSource::Tone {
                frequency_hz: 880.0,
                duration_ms: 600,
            },
            Phase::Rest => SoundSource::Tone {
                frequency_hz: 660.0,
                duration_ms: 600,
            },
        }
    }

    pub fn describe(&self) -> String {
        match self {
            SoundSource::File(path) => path.display().to_string(),
            SoundSource::Tone { frequency_hz, duration_ms } => {
                format!("built-in {frequency_hz} Hz tone ({duration_ms} ms)")
            }
        }
    }
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| SUPPORTED_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Audio files in `dir`, sorted by name. A missing directory yields nothing.
pub fn discover_sounds(dir: &Path) -> Vec<PathBuf> {
    let mut sounds: Vec<PathBuf> = match fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && is_supported(path))
            .collect(),
        Err(_) => Vec::new(),
    };
    sounds.sort();
    sounds
}
