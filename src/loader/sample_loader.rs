use std::path::Path;

use crate::audio::{AudioHandle, ClickerError, SampleBuffer};
use crate::audio_api::AudioCommand;

// Decode the click sound off the audio thread, then hand it to the engine
pub fn load_click(audio: &AudioHandle, path: &Path) -> Result<(), ClickerError> {
    let buffer = SampleBuffer::load_wav(path, audio.sample_rate())
        .map_err(|e| ClickerError::AssetUnavailable(format!("{e:#}")))?;
    audio.send(AudioCommand::SetClick(buffer));
    Ok(())
}
