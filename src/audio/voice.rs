use super::frame::StereoFrame;
use super::sample_buffer::SampleBuffer;

/// Playback cursor into the click sample.
#[derive(Clone, Copy, Debug)]
pub struct Voice {
    pub pos: usize,
    pub gain: f32,
    pub active: bool,
}

impl Voice {
    pub fn new(gain: f32) -> Self {
        Self { pos: 0, gain, active: true }
    }

    pub fn idle() -> Self {
        Self { pos: 0, gain: 0.0, active: false }
    }

    pub fn render_into(&mut self, buffer: &SampleBuffer, out: &mut [StereoFrame]) {
        if !self.active {
            return;
        }
        let remaining = buffer.data.get(self.pos..).unwrap_or(&[]);
        for (frame, sample) in out.iter_mut().zip(remaining) {
            frame.left += sample.left * self.gain;
            frame.right += sample.right * self.gain;
        }
        self.pos += remaining.len().min(out.len());
        if self.pos >= buffer.data.len() {
            self.active = false;
        }
    }
}
