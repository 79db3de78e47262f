//! Notification sounds for phase changes.
//!
//! [`SoundManager`] decides *what* to play (a configured file from the
//! sounds directory, or a built-in tone) and hands it to a [`SoundPlayer`].

mod player;
mod source;

#[cfg(feature = "audio")]
pub use player::RodioPlayer;
pub use player::{create_sound_player, SilentPlayer, SoundPlayer};
pub use source::{discover_sounds, SoundSource, SUPPORTED_EXTENSIONS};

use std::path::{Path, PathBuf};

use crate::error::SoundError;
use crate::storage::SoundConfig;
use crate::timer::Phase;

pub struct SoundManager {
    player: Box<dyn SoundPlayer>,
    settings: SoundConfig,
    sounds_dir: PathBuf,
}

impl SoundManager {
    /// Open the audio device according to `settings`.
    pub fn new(settings: &SoundConfig, sounds_dir: impl Into<PathBuf>) -> Self {
        let player = create_sound_player(settings.enabled);
        Self::with_player(player, settings, sounds_dir)
    }

    /// Open the audio device even when sound is disabled, for auditioning cues.
    /// Phase-end cues stay muted per `settings.enabled`; only
    /// [`preview`](Self::preview) is heard.
    pub fn for_preview(settings: &SoundConfig, sounds_dir: impl Into<PathBuf>) -> Self {
        Self::with_player(create_sound_player(true), settings, sounds_dir)
    }

    pub fn with_player(
        player: Box<dyn SoundPlayer>,
        settings: &SoundConfig,
        sounds_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            player,
            settings: settings.clone(),
            sounds_dir: sounds_dir.into(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.settings.enabled && self.player.is_available()
    }

    /// Whether [`preview`](Self::preview) reaches an output device.
    pub fn can_preview(&self) -> bool {
        self.player.is_available()
    }

    pub fn sounds_dir(&self) -> &Path {
        &self.sounds_dir
    }

    pub fn settings(&self) -> &SoundConfig {
        &self.settings
    }

    /// The configured file for the end of `phase` if it exists, else a built-in tone.
    pub fn source_for(&self, phase: Phase) -> SoundSource {
        let name = match phase {
            Phase::Focus => &self.settings.focus_end,
            Phase::Rest => &self.settings.rest_end,
        };
        if !name.trim().is_empty() {
            let path = self.sounds_dir.join(name);
            if path.is_file() {
                return SoundSource::File(path);
            }
            tracing::debug!(path = %path.display(), "sound file missing, using built-in tone");
        }
        SoundSource::builtin(phase)
    }

    /// Cue for the end of `phase`. Does nothing when sound is disabled.
    pub fn play_phase_end(&self, phase: Phase) -> Result<(), SoundError> {
        if !self.settings.enabled {
            return Ok(());
        }
        self.preview(phase)
    }

    /// Play the cue for `phase` regardless of the enabled flag.
    pub fn preview(&self, phase: Phase) -> Result<(), SoundError> {
        let source = self.source_for(phase);
        tracing::debug!(%phase, source = %source.describe(), "playing notification sound");
        match self.player.play(&source, self.settings.gain()) {
            Err(SoundError::DecodeError(e)) if matches!(source, SoundSource::File(_)) => {
                tracing::warn!(error = %e, "cannot decode sound file, falling back to built-in tone");
                self.player.play(&SoundSource::builtin(phase), self.settings.gain())
            }
            other => other,
        }
    }

    /// Audio files available in the sounds directory.
    pub fn discover_sounds(&self) -> Vec<PathBuf> {
        discover_sounds(&self.sounds_dir)
    }
}
