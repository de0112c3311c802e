// the input watcher thread only ever touches InputSignals; everything else in
// the session state belongs to the trainer loop and is rebuilt every round.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use super::progression::Progression;

/// Requests raised by the input watcher. Both only move forward: the
/// regenerate counter only increments and terminate only goes false -> true.
#[derive(Debug, Default)]
pub struct InputSignals {
    regenerations: AtomicU64,
    terminate: AtomicBool,
}

impl InputSignals {
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn request_regenerate(&self) {
        self.regenerations.fetch_add(1, Ordering::AcqRel);
    }

    pub fn request_terminate(&self) {
        self.terminate.store(true, Ordering::Release);
    }

    pub fn regenerations(&self) -> u64 {
        self.regenerations.load(Ordering::Acquire)
    }

    pub fn terminate_requested(&self) -> bool {
        self.terminate.load(Ordering::Acquire)
    }
}

pub struct SessionState {
    pub progression: Progression,
    pub current_chord: usize,
    pub bpm: u32,
    signals: Arc<InputSignals>,
    // regenerate count when this round began
    round_start: u64,
}

impl SessionState {
    pub fn new(progression: Progression, signals: Arc<InputSignals>) -> Self {
        let round_start = signals.regenerations();
        Self {
            bpm: progression.bpm(),
            progression,
            current_chord: 0,
            signals,
            round_start,
        }
    }

    /// Replacement state for the next round, sharing the same signals.
    pub fn next_round(&self, progression: Progression) -> Self {
        Self::new(progression, Arc::clone(&self.signals))
    }

    pub fn signals(&self) -> Arc<InputSignals> {
        Arc::clone(&self.signals)
    }

    pub fn regenerate_requested(&self) -> bool {
        self.signals.regenerations() > self.round_start
    }

    pub fn terminate_requested(&self) -> bool {
        self.signals.terminate_requested()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theory::{Mode, PitchClass, Scale};

    fn progression(bpm: u32) -> Progression {
        let scale = Scale::new(PitchClass::new(0), Mode::Major);
        Progression::from_degrees(scale, &[1, 5, 6, 4], bpm).unwrap()
    }

    #[test]
    fn test_regenerate_is_per_round() {
        let signals = InputSignals::new_shared();
        let state = SessionState::new(progression(100), Arc::clone(&signals));
        assert!(!state.regenerate_requested());

        signals.request_regenerate();
        assert!(state.regenerate_requested());

        let next = state.next_round(progression(120));
        assert!(!next.regenerate_requested());
        assert_eq!(next.bpm, 120);
        assert_eq!(next.current_chord, 0);
    }

    #[test]
    fn test_terminate_is_sticky() {
        let signals = InputSignals::new_shared();
        let state = SessionState::new(progression(100), Arc::clone(&signals));
        signals.request_terminate();
        assert!(state.terminate_requested());
        assert!(state.next_round(progression(90)).terminate_requested());
    }
}
