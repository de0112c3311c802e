// One stereo frame of the click sample
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StereoFrame {
    pub left: f32,
    pub right: f32,
}

impl StereoFrame {
    pub fn zero() -> Self {
        Self::default()
    }

    // downmix for single channel devices
    pub fn mono(&self) -> f32 {
        0.5 * (self.left + self.right)
    }
}
