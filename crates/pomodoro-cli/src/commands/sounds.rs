use std::time::Duration;

use clap::Subcommand;
use pomodoro_core::{AppPaths, Config, Phase, SoundManager};

/// Long enough for the built-in tone and typical short cue files.
const PREVIEW_WAIT: Duration = Duration::from_secs(2);

#[derive(Subcommand)]
pub enum SoundsAction {
    /// List audio files in the sounds directory and the current cue for each phase
    List,
    /// Play the cue for the end of a phase
    Test {
        /// focus or rest
        phase: Phase,
    },
}

pub fn run(paths: &AppPaths, action: SoundsAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load(&paths.config_file)?;

    match action {
        SoundsAction::List => {
            let sound = SoundManager::with_player(
                Box::new(pomodoro_core::sound::SilentPlayer),
                &config.sound,
                &paths.sounds_dir,
            );
            println!("sounds directory: {}", sound.sounds_dir().display());
            let files = sound.discover_sounds();
            if files.is_empty() {
                println!("  (no audio files)");
            }
            for file in files {
                if let Some(name) = file.file_name() {
                    println!("  {}", name.to_string_lossy());
                }
            }
            for phase in [Phase::Focus, Phase::Rest] {
                println!("{} end: {}", phase, sound.source_for(phase).describe());
            }
        }
        SoundsAction::Test { phase } => {
            let sound = SoundManager::for_preview(&config.sound, &paths.sounds_dir);
            if !sound.can_preview() {
                eprintln!("no audio output available");
            }
            println!("playing {}", sound.source_for(phase).describe());
            sound.preview(phase)?;
            // Playback stops when the output stream is dropped.
            std::thread::sleep(PREVIEW_WAIT);
        }
    }
    Ok(())
}
