//! The practice loop.
//!
//! ```text
//! Announcing -> Prerolling -> Playing -> Regenerating -> Announcing ...
//!      \             \            \
//!       `-------------`------------`--> Terminated
//! ```
//!
//! Input arrives through [`InputSignals`], which are only checked between
//! beats; nothing here ever blocks on the keyboard.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;

use crate::audio::Clicker;
use crate::pipeline::generator::{GeneratorConfig, GeneratorError, ProgressionGenerator};
use crate::pipeline::session_state::{InputSignals, SessionState};
use crate::pipeline::settings::TrainerSettings;
use crate::report::{self, warn};

use super::clock::{MetronomeClock, TimeSource};
use super::input::InputWatcher;

pub const REGENERATE_PROMPT: &str = "(press enter to generate a new progression)";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Announcing,
    Prerolling,
    Playing,
    Regenerating,
    Terminated,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionTiming {
    pub beats_per_chord: u32,
    pub preroll_beats: u32,
    pub read_delay: Duration,
}

impl Default for SessionTiming {
    fn default() -> Self {
        Self::from(&TrainerSettings::default())
    }
}

impl From<&TrainerSettings> for SessionTiming {
    fn from(settings: &TrainerSettings) -> Self {
        Self {
            beats_per_chord: settings.beats_per_chord.max(1),
            preroll_beats: settings.preroll_beats,
            read_delay: Duration::from_millis(settings.read_delay_ms),
        }
    }
}

pub struct TrainerSession<C, T, R, W> {
    generator: ProgressionGenerator,
    timing: SessionTiming,
    rng: R,
    clock: MetronomeClock<C, T>,
    out: W,
    state: SessionState,
    watcher: Option<InputWatcher>,
    phase: Phase,
}

impl<C, T, R, W> TrainerSession<C, T, R, W>
where
    C: Clicker,
    T: TimeSource,
    R: Rng,
    W: Write,
{
    /// Generates the first progression; an invalid config never gets as far
    /// as a session.
    pub fn new(
        config: GeneratorConfig,
        timing: SessionTiming,
        mut rng: R,
        clock: MetronomeClock<C, T>,
        out: W,
        signals: Arc<InputSignals>,
    ) -> Result<Self, GeneratorError> {
        let mut generator = ProgressionGenerator::new(config)?;
        let progression = generator.generate(&mut rng)?;
        Ok(Self {
            generator,
            timing,
            rng,
            clock,
            out,
            state: SessionState::new(progression, signals),
            watcher: None,
            phase: Phase::Announcing,
        })
    }

    /// Hand over the input watcher so it's stopped when the session ends.
    pub fn with_watcher(mut self, watcher: InputWatcher) -> Self {
        self.watcher = Some(watcher);
        self
    }

    #[cfg(test)]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[cfg(test)]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Run until the user quits.
    pub fn run(mut self) -> anyhow::Result<()> {
        while self.phase != Phase::Terminated {
            self.step()?;
        }
        Ok(())
    }

    /// Run the current phase to completion and move to the next one.
    pub fn step(&mut self) -> anyhow::Result<Phase> {
        let next = match self.phase {
            Phase::Announcing => self.announce()?,
            Phase::Prerolling => self.preroll()?,
            Phase::Playing => self.play()?,
            Phase::Regenerating => self.regenerate()?,
            Phase::Terminated => Phase::Terminated,
        };
        if next == Phase::Terminated {
            self.release();
        }
        self.phase = next;
        Ok(next)
    }

    fn announce(&mut self) -> anyhow::Result<Phase> {
        for line in self.state.progression.announcement() {
            self.line(&line)?;
        }
        self.line("(Waiting for the initial delay)")?;

        let signals = self.state.signals();
        if self.clock.pause(self.timing.read_delay, || signals.terminate_requested()) {
            return Ok(Phase::Terminated);
        }
        Ok(Phase::Prerolling)
    }

    fn preroll(&mut self) -> anyhow::Result<Phase> {
        self.clock.start(self.state.bpm);
        let preroll = self.timing.preroll_beats;
        for _ in 0..preroll {
            let remaining = preroll - self.clock.tick()?;
            self.line(&format!("Preroll counting down from: {remaining}"))?;
            if let Some(next) = self.interrupted() {
                return Ok(next);
            }
        }
        Ok(Phase::Playing)
    }

    fn play(&mut self) -> anyhow::Result<Phase> {
        let per_chord = self.timing.beats_per_chord.max(1);
        loop {
            // the clock keeps counting from the start of the preroll
            let beat = self.clock.tick()?.saturating_sub(self.timing.preroll_beats);
            let beat_in_chord = beat % per_chord;

            let index = self.state.current_chord;
            let progression = &self.state.progression;
            let next = progression.next_index(index);
            if beat_in_chord == 0 {
                let text = format!(
                    "{} next is {}",
                    progression.chord(index).label(),
                    progression.chord(next).label()
                );
                self.line(&text)?;
            }
            if beat_in_chord == per_chord - 1 {
                if next == 0 {
                    self.line(REGENERATE_PROMPT)?;
                }
                self.state.current_chord = next;
            }

            if let Some(phase) = self.interrupted() {
                return Ok(phase);
            }
        }
    }

    fn regenerate(&mut self) -> anyhow::Result<Phase> {
        let progression = match self.generator.generate(&mut self.rng) {
            Ok(progression) => progression,
            Err(e) => {
                warn!("keeping the current progression: {e}");
                self.state.progression.clone()
            }
        };
        // a fresh state also starts a fresh round of input signals
        self.state = self.state.next_round(progression);
        self.line("")?;
        Ok(Phase::Announcing)
    }

    // termination wins over regeneration if both are pending
    fn interrupted(&self) -> Option<Phase> {
        if self.state.terminate_requested() {
            Some(Phase::Terminated)
        } else if self.state.regenerate_requested() {
            Some(Phase::Regenerating)
        } else {
            None
        }
    }

    fn release(&mut self) {
        if let Some(mut watcher) = self.watcher.take() {
            watcher.stop();
        }
    }

    fn line(&mut self, text: &str) -> std::io::Result<()> {
        write!(self.out, "{text}{}", report::line_ending())?;
        self.out.flush()
    }
}
