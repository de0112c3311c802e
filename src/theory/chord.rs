use std::fmt;

use super::pitch::PitchClass;
use super::scale::Scale;
use super::TheoryError;

const NUMERALS: [&str; 7] = ["I", "II", "III", "IV", "V", "VI", "VII"];

/// Triad quality
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Quality {
    Major,
    Minor,
    Diminished,
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Quality::Major => "Major",
            Quality::Minor => "Minor",
            Quality::Diminished => "Diminished",
        };
        f.write_str(name)
    }
}

/// A diatonic triad. Quality and root always agree with the scale the chord
/// was built from, so there is no way to construct one field by field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Chord {
    degree: u8,
    quality: Quality,
    root: PitchClass,
}

impl Chord {
    pub fn diatonic(scale: Scale, degree: u8) -> Result<Self, TheoryError> {
        Ok(Self {
            degree,
            quality: scale.mode.quality(degree)?,
            root: scale.note(degree)?,
        })
    }

    #[cfg(test)]
    pub fn degree(&self) -> u8 {
        self.degree
    }

    #[cfg(test)]
    pub fn quality(&self) -> Quality {
        self.quality
    }

    #[cfg(test)]
    pub fn root(&self) -> PitchClass {
        self.root
    }

    /// Roman numeral where the casing follows the chord quality, e.g. `IV`,
    /// `vi`, `ii°`.
    pub fn numeral(&self) -> String {
        // degree was validated on construction
        let base = NUMERALS[(self.degree - 1) as usize];
        match self.quality {
            Quality::Major => base.to_string(),
            Quality::Minor => base.to_lowercase(),
            Quality::Diminished => format!("{}°", base.to_lowercase()),
        }
    }

    /// `<numeral> (<name>)`, the form used everywhere a chord is shown.
    pub fn label(&self) -> String {
        format!("{} ({})", self.numeral(), self)
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.root, self.quality)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theory::Mode;

    fn chord(root: u8, mode: Mode, degree: u8) -> Chord {
        Chord::diatonic(Scale::new(PitchClass::new(root), mode), degree).unwrap()
    }

    #[test]
    fn test_numeral_casing() {
        assert_eq!(chord(0, Mode::Major, 1).numeral(), "I");
        assert_eq!(chord(9, Mode::Minor, 1).numeral(), "i");
        assert_eq!(chord(9, Mode::Minor, 2).numeral(), "ii°");
        assert_eq!(chord(0, Mode::Major, 7).numeral(), "vii°");
        assert_eq!(chord(0, Mode::Major, 6).numeral(), "vi");
        // casing follows quality, not the scale's mode
        assert_eq!(chord(9, Mode::Minor, 7).numeral(), "VII");
    }

    #[test]
    fn test_chord_names() {
        assert_eq!(chord(0, Mode::Major, 5).to_string(), "G Major");
        assert_eq!(chord(0, Mode::Major, 7).to_string(), "B Diminished");
        assert_eq!(chord(9, Mode::Minor, 4).label(), "iv (D Minor)");
    }

    #[test]
    fn test_g_sharp_minor_submediant() {
        let vi = chord(8, Mode::Minor, 6);
        assert_eq!(vi.quality(), Quality::Major);
        assert_eq!(vi.root().name(), "E");
        assert_eq!(vi.label(), "VI (E Major)");
    }

    #[test]
    fn test_invalid_degree() {
        let scale = Scale::new(PitchClass::new(0), Mode::Major);
        assert_eq!(Chord::diatonic(scale, 0), Err(TheoryError::InvalidDegree(0)));
        assert_eq!(Chord::diatonic(scale, 8), Err(TheoryError::InvalidDegree(8)));
    }
}
