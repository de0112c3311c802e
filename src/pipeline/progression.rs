// a generated round: the scale, its chords in order and the tempo to play them at

use crate::theory::{Chord, Scale, TheoryError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Progression {
    scale: Scale,
    chords: Vec<Chord>,
    bpm: u32,
}

impl Progression {
    /// Resolve each degree against `scale`. Callers guarantee at least two
    /// degrees and no immediate repeats.
    pub fn from_degrees(scale: Scale, degrees: &[u8], bpm: u32) -> Result<Self, TheoryError> {
        debug_assert!(degrees.len() >= 2, "progression needs at least two chords");
        debug_assert!(
            degrees.windows(2).all(|w| w[0] != w[1]),
            "adjacent chords must differ"
        );
        let chords = degrees
            .iter()
            .map(|&degree| Chord::diatonic(scale, degree))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { scale, chords, bpm })
    }

    #[cfg(test)]
    pub fn scale(&self) -> Scale {
        self.scale
    }

    #[cfg(test)]
    pub fn chords(&self) -> &[Chord] {
        &self.chords
    }

    #[cfg(test)]
    pub fn degrees(&self) -> Vec<u8> {
        self.chords.iter().map(Chord::degree).collect()
    }

    pub fn bpm(&self) -> u32 {
        self.bpm
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.chords.len()
    }

    pub fn chord(&self, index: usize) -> &Chord {
        &self.chords[index % self.chords.len()]
    }

    /// Index after `index`, wrapping back to the first chord.
    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.chords.len()
    }

    /// The three header lines shown before a round starts.
    pub fn announcement(&self) -> [String; 3] {
        let chords: Vec<String> = self.chords.iter().map(Chord::label).collect();
        [
            format!("Scale: {}", self.scale),
            format!("Progression: {}", chords.join(", ")),
            format!("BPM: {} (press enter to generate a new progression)", self.bpm),
        ]
    }
}
