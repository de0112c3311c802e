use crate::audio_api::AudioCommand;

use super::frame::StereoFrame;
use super::sample_buffer::SampleBuffer;
use super::voice::Voice;

const MAX_VOICES: usize = 8; // hard cap so we wont malloc in audio callback
const CLICK_GAIN: f32 = 0.8;

pub struct Engine {
    click: Option<SampleBuffer>,
    voices: [Voice; MAX_VOICES], // fixed pool of voices
}

impl Engine {
    pub fn new() -> Self {
        Self {
            click: None,
            voices: [Voice::idle(); MAX_VOICES],
        }
    }

    pub fn handle_cmd(&mut self, cmd: AudioCommand) {
        match cmd {
            AudioCommand::SetClick(buffer) => {
                self.click = Some(buffer);
                self.voices = [Voice::idle(); MAX_VOICES];
            }
            AudioCommand::Click => self.trigger_click(),
        }
    }

    fn trigger_click(&mut self) {
        if self.click.is_none() {
            return;
        }
        // reuse a free slot, otherwise steal the oldest (furthest along) click
        let slot = self
            .voices
            .iter()
            .position(|v| !v.active)
            .or_else(|| {
                self.voices
                    .iter()
                    .enumerate()
                    .max_by_key(|(_, v)| v.pos)
                    .map(|(i, _)| i)
            })
            .unwrap_or(0);
        self.voices[slot] = Voice::new(CLICK_GAIN);
    }

    #[cfg(test)]
    pub fn active_voices(&self) -> usize {
        self.voices.iter().filter(|v| v.active).count()
    }

    pub fn render_block(&mut self, out: &mut [StereoFrame]) {
        out.fill(StereoFrame::zero());
        let Some(click) = &self.click else {
            return;
        };
        for voice in &mut self.voices {
            voice.render_into(click, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn click(len: usize) -> SampleBuffer {
        SampleBuffer {
            data: vec![StereoFrame { left: 1.0, right: 1.0 }; len],
        }
    }

    #[test]
    fn test_click_without_sample_is_silent() {
        let mut engine = Engine::new();
        engine.handle_cmd(AudioCommand::Click);
        let mut out = [StereoFrame { left: 0.3, right: 0.3 }; 4];
        engine.render_block(&mut out);
        assert!(out.iter().all(|f| f.left == 0.0 && f.right == 0.0));
        assert_eq!(engine.active_voices(), 0);
    }

    #[test]
    fn test_click_plays_to_end() {
        let mut engine = Engine::new();
        engine.handle_cmd(AudioCommand::SetClick(click(6)));
        engine.handle_cmd(AudioCommand::Click);

        let mut out = [StereoFrame::zero(); 4];
        engine.render_block(&mut out);
        assert!(out.iter().all(|f| f.left == CLICK_GAIN));
        assert_eq!(engine.active_voices(), 1);

        engine.render_block(&mut out);
        assert_eq!(out[1].left, CLICK_GAIN);
        assert_eq!(out[2].left, 0.0);
        assert_eq!(engine.active_voices(), 0);
    }

    #[test]
    fn test_voice_pool_is_capped() {
        let mut engine = Engine::new();
        engine.handle_cmd(AudioCommand::SetClick(click(100)));
        for _ in 0..MAX_VOICES + 3 {
            engine.handle_cmd(AudioCommand::Click);
        }
        assert_eq!(engine.active_voices(), MAX_VOICES);
    }
}
