pub use crate::audio::SampleBuffer;

#[derive(Clone, Debug)]
pub enum AudioCommand {
    // The engine can't load files (it runs on the audio callback), so the
    // click is decoded up front (see sample_loader.rs) and handed over here
    SetClick(SampleBuffer),

    // Start the click from the top; overlapping clicks each get a voice
    Click,
}
