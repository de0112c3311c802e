//! Random diatonic progression generation.
//!
//! Two strategies share the same scale and tempo selection:
//! - random walks over the scale degrees that never repeat a chord back to back
//! - picks from a fixed table of well known progressions, used verbatim
//!
//! Roots, modes, tempos and common progressions are dealt from shuffled decks
//! rather than drawn independently, so a practice session cycles through every
//! key before any of them comes up twice.

use std::ops::RangeInclusive;

use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use crate::theory::{Mode, PitchClass, Scale, TheoryError, DEGREES};

use super::progression::Progression;

/// Number of chords in a randomly generated progression.
pub const PROGRESSION_LENGTH: RangeInclusive<usize> = 3..=5;

const COMMON_MAJOR: &[&[u8]] = &[
    &[1, 4, 5],
    &[2, 5, 1],
    &[1, 2, 4],
    &[1, 4, 1, 5],
    &[1, 4, 5, 4],
    &[1, 5, 6, 4],
    &[1, 2, 4, 5],
    &[1, 6, 2, 5],
];

const COMMON_MINOR: &[&[u8]] = &[
    &[1, 4, 5],
    &[1, 6, 7],
    &[2, 5, 1],
    &[1, 4, 7],
    &[1, 4, 1, 5],
    &[1, 4, 5, 4],
    &[1, 6, 3, 7],
];

/// Degree sequences drawn from when only common progressions are allowed.
pub fn common_progressions(mode: Mode) -> &'static [&'static [u8]] {
    match mode {
        Mode::Major => COMMON_MAJOR,
        Mode::Minor => COMMON_MINOR,
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorError {
    /// Common progressions always start where the table says, so they can't
    /// be combined with a random starting chord.
    #[error("can't specify start on non root when using common progressions")]
    InvalidConfig,

    #[error(transparent)]
    Theory(#[from] TheoryError),
}

/// How the BPM of each progression is chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tempo {
    Fixed(u32),
    /// `min`, `min + step`, ... up to but excluding `max`
    Stepped { min: u32, max: u32, step: u32 },
}

impl Default for Tempo {
    fn default() -> Self {
        Tempo::Stepped { min: 80, max: 160, step: 10 }
    }
}

impl Tempo {
    /// Every BPM this tempo can produce. Never empty: a stepped range too
    /// narrow for one step still yields `min`.
    pub fn choices(&self) -> Vec<u32> {
        match *self {
            Tempo::Fixed(bpm) => vec![bpm],
            Tempo::Stepped { min, max, step } => {
                let step = step.max(1);
                let count = (max.saturating_sub(min) / step).max(1);
                (0..count).map(|i| min + step * i).collect()
            }
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub only_common_progressions: bool,
    pub start_on_non_root: bool,
    pub tempo: Tempo,
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<(), GeneratorError> {
        if self.only_common_progressions && self.start_on_non_root {
            return Err(GeneratorError::InvalidConfig);
        }
        Ok(())
    }
}

/// Hands out items in a random order without repeats, reshuffling once all of
/// them have been dealt.
#[derive(Clone, Debug)]
struct Deck<T> {
    full: Vec<T>,
    remaining: Vec<T>,
}

impl<T: Clone> Deck<T> {
    fn new(full: Vec<T>) -> Self {
        Self { full, remaining: Vec::new() }
    }

    fn deal<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<T> {
        if self.remaining.is_empty() {
            self.remaining = self.full.clone();
            self.remaining.shuffle(rng);
        }
        self.remaining.pop()
    }
}

/// Builds progressions for one session. Holds the decks between rounds.
#[derive(Clone, Debug)]
pub struct ProgressionGenerator {
    config: GeneratorConfig,
    roots: Deck<PitchClass>,
    modes: Deck<Mode>,
    bpms: Deck<u32>,
    common_major: Deck<&'static [u8]>,
    common_minor: Deck<&'static [u8]>,
}

impl ProgressionGenerator {
    /// Rejects an invalid config before any randomness can be drawn.
    pub fn new(config: GeneratorConfig) -> Result<Self, GeneratorError> {
        config.validate()?;
        Ok(Self {
            config,
            roots: Deck::new(PitchClass::all().collect()),
            modes: Deck::new(Mode::ALL.to_vec()),
            bpms: Deck::new(config.tempo.choices()),
            common_major: Deck::new(COMMON_MAJOR.to_vec()),
            common_minor: Deck::new(COMMON_MINOR.to_vec()),
        })
    }

    pub fn generate<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<Progression, GeneratorError> {
        let root = self.roots.deal(rng).unwrap_or(PitchClass::new(0));
        let mode = self.modes.deal(rng).unwrap_or(Mode::Major);
        let scale = Scale::new(root, mode);

        let degrees = if self.config.only_common_progressions {
            let deck = match mode {
                Mode::Major => &mut self.common_major,
                Mode::Minor => &mut self.common_minor,
            };
            deck.deal(rng).unwrap_or(&[1, 4, 5]).to_vec()
        } else {
            random_degrees(self.config.start_on_non_root, rng)
        };

        let Some(bpm) = self.bpms.deal(rng) else {
            return Err(GeneratorError::InvalidConfig);
        };
        Ok(Progression::from_degrees(scale, &degrees, bpm)?)
    }
}

fn random_degrees<R: Rng + ?Sized>(start_on_non_root: bool, rng: &mut R) -> Vec<u8> {
    let length = rng.gen_range(PROGRESSION_LENGTH);
    let mut degrees = Vec::with_capacity(length);
    degrees.push(if start_on_non_root { rng.gen_range(1..=DEGREES) } else { 1 });

    while degrees.len() < length {
        let candidate = rng.gen_range(1..=DEGREES);
        // resample instead of allowing I IV IV
        if degrees.last() != Some(&candidate) {
            degrees.push(candidate);
        }
    }
    degrees
}
