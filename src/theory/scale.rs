use std::fmt;

use super::chord::Quality;
use super::pitch::PitchClass;
use super::{degree_index, TheoryError, DEGREES};

const N: usize = DEGREES as usize;

/// Whole/half step pattern from each degree to the next
const MAJOR_STEPS: [u8; N] = [2, 2, 1, 2, 2, 2, 1];
const MINOR_STEPS: [u8; N] = [2, 1, 2, 2, 1, 2, 2];

/// Triad quality on each degree, I through VII
const MAJOR_QUALITIES: [Quality; N] = [
    Quality::Major,
    Quality::Minor,
    Quality::Minor,
    Quality::Major,
    Quality::Major,
    Quality::Minor,
    Quality::Diminished,
];
const MINOR_QUALITIES: [Quality; N] = [
    Quality::Minor,
    Quality::Diminished,
    Quality::Major,
    Quality::Minor,
    Quality::Minor,
    Quality::Major,
    Quality::Major,
];

/// Major or natural minor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mode {
    Major,
    Minor,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Major, Mode::Minor];

    fn steps(self) -> &'static [u8; N] {
        match self {
            Mode::Major => &MAJOR_STEPS,
            Mode::Minor => &MINOR_STEPS,
        }
    }

    /// Quality of the diatonic triad built on `degree`.
    pub fn quality(self, degree: u8) -> Result<Quality, TheoryError> {
        let idx = degree_index(degree)?;
        let table = match self {
            Mode::Major => &MAJOR_QUALITIES,
            Mode::Minor => &MINOR_QUALITIES,
        };
        Ok(table[idx])
    }

    /// Semitones from the tonic up to `degree`.
    pub fn offset(self, degree: u8) -> Result<u8, TheoryError> {
        let idx = degree_index(degree)?;
        Ok(self.steps()[..idx].iter().sum())
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Major => f.write_str("Major"),
            Mode::Minor => f.write_str("Minor"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Scale {
    pub root: PitchClass,
    pub mode: Mode,
}

impl Scale {
    pub fn new(root: PitchClass, mode: Mode) -> Self {
        Self { root, mode }
    }

    /// Root note of the chord on `degree`.
    pub fn note(&self, degree: u8) -> Result<PitchClass, TheoryError> {
        Ok(self.root.transpose(self.mode.offset(degree)?))
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.root, self.mode)
    }
}
