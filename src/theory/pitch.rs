use std::fmt;

const SEMITONES: u8 = 12;

// sharps are always preferred over flats when naming a pitch
const NOTE_NAMES: [&str; SEMITONES as usize] = [
    "C", "C♯", "D", "D♯", "E", "F", "F♯", "G", "G♯", "A", "A♯", "B",
];

/// A note name modulo the octave, 0 = C.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PitchClass(u8);

impl PitchClass {
    pub fn new(value: u8) -> Self {
        Self(value % SEMITONES)
    }

    #[cfg(test)]
    pub fn value(self) -> u8 {
        self.0
    }

    /// Move up by `semitones`, wrapping around the octave.
    pub fn transpose(self, semitones: u8) -> Self {
        Self::new(self.0 + semitones % SEMITONES)
    }

    pub fn name(self) -> &'static str {
        NOTE_NAMES[self.0 as usize]
    }

    pub fn all() -> impl Iterator<Item = PitchClass> {
        (0..SEMITONES).map(PitchClass)
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
