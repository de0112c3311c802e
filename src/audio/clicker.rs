//! The one audio capability the trainer needs: play a single metronome tick.

use crossbeam_channel::TrySendError;
use thiserror::Error;

use crate::audio_api::AudioCommand;

use super::AudioHandle;

#[derive(Debug, Error)]
pub enum ClickerError {
    /// The click sound could not be loaded or can no longer be played.
    #[error("click sound unavailable: {0}")]
    AssetUnavailable(String),
}

/// Plays one tick. Implementations must return without waiting for playback
/// to finish.
pub trait Clicker {
    fn play(&mut self) -> Result<(), ClickerError>;
}

impl Clicker for AudioHandle {
    fn play(&mut self) -> Result<(), ClickerError> {
        match self.tx.try_send(AudioCommand::Click) {
            // a backed up engine just drops the tick
            Ok(()) | Err(TrySendError::Full(_)) => Ok(()),
            Err(TrySendError::Disconnected(_)) => Err(ClickerError::AssetUnavailable(
                "audio engine stopped".to_string(),
            )),
        }
    }
}
