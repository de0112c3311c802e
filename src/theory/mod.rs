//! Diatonic music theory: pitch classes, scales and the triads built on
//! each scale degree. Everything here is pure and deterministic.

use thiserror::Error;

mod chord;
mod pitch;
mod scale;

pub use chord::{Chord, Quality};
pub use pitch::PitchClass;
pub use scale::{Mode, Scale};

/// Number of degrees in a diatonic scale.
pub const DEGREES: u8 = 7;

/// Errors raised by scale and chord lookups.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TheoryError {
    /// A scale degree outside `1..=7` was requested.
    #[error("invalid scale degree {0}, expected 1-7")]
    InvalidDegree(u8),
}

// zero-based table index for a 1-based degree
fn degree_index(degree: u8) -> Result<usize, TheoryError> {
    if (1..=DEGREES).contains(&degree) {
        Ok((degree - 1) as usize)
    } else {
        Err(TheoryError::InvalidDegree(degree))
    }
}
