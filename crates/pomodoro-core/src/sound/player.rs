use super::SoundSource;
use crate::error::SoundError;

/// Something that can turn a [`SoundSource`] into audible output.
pub trait SoundPlayer {
    /// Start playback and return without waiting for it to finish.
    fn play(&self, source: &SoundSource, volume: f32) -> Result<(), SoundError>;
    fn is_available(&self) -> bool;
}

/// Player used when sound is disabled or no device could be opened.
#[derive(Debug, Default)]
pub struct SilentPlayer;

impl SoundPlayer for SilentPlayer {
    fn play(&self, _source: &SoundSource, _volume: f32) -> Result<(), SoundError> {
        Ok(())
    }

    fn is_available(&self) -> bool {
        false
    }
}

#[cfg(feature = "audio")]
pub use rodio_player::RodioPlayer;

#[cfg(feature = "audio")]
mod rodio_player {
    use std::fs::File;
    use std::io::BufReader;
    use std::time::Duration;

    use rodio::source::SineWave;
    use rodio::stream::{OutputStream, OutputStreamBuilder};
    use rodio::{Decoder, Sink, Source};

    use super::{SoundPlayer, SoundSource};
    use crate::error::SoundError;

    /// Plays through the default output device.
    pub struct RodioPlayer {
        stream: OutputStream,
    }

    impl RodioPlayer {
        pub fn new() -> Result<Self, SoundError> {
            let mut stream = OutputStreamBuilder::open_default_stream()
                .map_err(|e| SoundError::DeviceNotAvailable(e.to_string()))?;
            stream.log_on_drop(false);
            Ok(Self { stream })
        }
    }

    impl SoundPlayer for RodioPlayer {
        fn play(&self, source: &SoundSource, volume: f32) -> Result<(), SoundError> {
            let sink = Sink::connect_new(self.stream.mixer());
            sink.set_volume(volume);
            match source {
                SoundSource::File(path) => {
                    let file = File::open(path)
                        .map_err(|_| SoundError::FileNotFound(path.clone()))?;
                    let decoder = Decoder::new(BufReader::new(file))
                        .map_err(|e| SoundError::DecodeError(e.to_string()))?;
                    sink.append(decoder);
                }
                SoundSource::Tone { frequency_hz, duration_ms } => {
                    let tone = SineWave::new(*frequency_hz)
                        .take_duration(Duration::from_millis(*duration_ms))
                        .amplify(0.4);
                    sink.append(tone);
                }
            }
            // The stream outlives the sink, so detached playback runs to the end.
            sink.detach();
            Ok(())
        }

        fn is_available(&self) -> bool {
            true
        }
    }
}

/// Open the default device, or fall back to a silent player.
pub fn create_sound_player(enabled: bool) -> Box<dyn SoundPlayer> {
    if !enabled {
        tracing::debug!("sound disabled in configuration");
        return Box::new(SilentPlayer);
    }
    open_device()
}

#[cfg(feature = "audio")]
fn open_device() -> Box<dyn SoundPlayer> {
    match RodioPlayer::new() {
        Ok(player) => Box::new(player),
        Err(e) => {
            tracing::warn!(error = %e, "audio device unavailable, notification sounds are muted");
            Box::new(SilentPlayer)
        }
    }
}

#[cfg(not(feature = "audio"))]
fn open_device() -> Box<dyn SoundPlayer> {
    tracing::warn!("built without the `audio` feature, notification sounds are muted");
    Box::new(SilentPlayer)
}
