//! Drift-corrected metronome.
//!
//! Every beat has an absolute deadline `start + n * interval`, so time lost
//! to printing, clicking or oversleeping on one beat is absorbed by the next
//! wait instead of piling up.

use std::thread;
use std::time::{Duration, Instant};

use crate::audio::{Clicker, ClickerError};

/// Granularity of interruptible pauses.
const PAUSE_SLICE: Duration = Duration::from_millis(100);

pub trait TimeSource {
    fn now(&self) -> Instant;
    fn sleep_until(&mut self, deadline: Instant);
}

/// Wall clock time through `Instant` and `thread::sleep`.
#[derive(Clone, Copy, Debug, Default)]
pub struct RealTime;

impl TimeSource for RealTime {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep_until(&mut self, deadline: Instant) {
        let now = Instant::now();
        if deadline > now {
            thread::sleep(deadline - now);
        }
    }
}

pub fn beat_interval(bpm: u32) -> Duration {
    Duration::from_secs(60) / bpm.max(1)
}

pub struct MetronomeClock<C, T = RealTime> {
    clicker: C,
    time: T,
    interval: Duration,
    start: Option<Instant>,
    beats: u32,
}

impl<C: Clicker> MetronomeClock<C, RealTime> {
    pub fn new(clicker: C) -> Self {
        Self::with_time_source(clicker, RealTime)
    }
}

impl<C: Clicker, T: TimeSource> MetronomeClock<C, T> {
    pub fn with_time_source(clicker: C, time: T) -> Self {
        Self {
            clicker,
            time,
            interval: beat_interval(120),
            start: None,
            beats: 0,
        }
    }

    /// Reset the beat counter for a new tempo. The first tick after this
    /// fires immediately and sets the reference time for the rest.
    pub fn start(&mut self, bpm: u32) {
        self.interval = beat_interval(bpm);
        self.start = None;
        self.beats = 0;
    }

    /// Wait for the next beat, click, and return its index counted from the
    /// last `start`.
    pub fn tick(&mut self) -> Result<u32, ClickerError> {
        let start = match self.start {
            Some(start) => start,
            None => {
                let now = self.time.now();
                self.start = Some(now);
                now
            }
        };
        let deadline = start + self.interval * self.beats;
        self.time.sleep_until(deadline);
        self.clicker.play()?;

        let beat = self.beats;
        self.beats += 1;
        Ok(beat)
    }

    /// Sleep for `duration` in short slices, bailing out early once
    /// `interrupted` returns true. Returns whether it was interrupted.
    pub fn pause(&mut self, duration: Duration, interrupted: impl Fn() -> bool) -> bool {
        let end = self.time.now() + duration;
        loop {
            if interrupted() {
                return true;
            }
            let now = self.time.now();
            if now >= end {
                return false;
            }
            self.time.sleep_until((now + PAUSE_SLICE).min(end));
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    /// Simulated time: sleeping jumps straight to the deadline plus a fixed
    /// oversleep. Every sleep is handed to `on_sleep` with its sequence number.
    pub struct SimTime {
        pub now: Rc<Cell<Instant>>,
        pub oversleep: Duration,
        pub sleeps: usize,
        pub on_sleep: Box<dyn FnMut(usize)>,
    }

    impl SimTime {
        pub fn new(oversleep: Duration) -> Self {
            Self {
                now: Rc::new(Cell::new(Instant::now())),
                oversleep,
                sleeps: 0,
                on_sleep: Box::new(|_| {}),
            }
        }
    }

    impl TimeSource for SimTime {
        fn now(&self) -> Instant {
            self.now.get()
        }

        fn sleep_until(&mut self, deadline: Instant) {
            let now = self.now.get();
            self.now.set(now.max(deadline) + self.oversleep);
            self.sleeps += 1;
            (self.on_sleep)(self.sleeps);
        }
    }

    /// Records when it was asked to click and costs `cost` of simulated time.
    pub struct RecordingClicker {
        pub now: Rc<Cell<Instant>>,
        pub cost: Duration,
        pub clicks: Rc<RefCell<Vec<Instant>>>,
    }

    impl Clicker for RecordingClicker {
        fn play(&mut self) -> Result<(), ClickerError> {
            let at = self.now.get();
            self.clicks.borrow_mut().push(at);
            self.now.set(at + self.cost);
            Ok(())
        }
    }

    fn sim_clock(
        oversleep: Duration,
        cost: Duration,
    ) -> (MetronomeClock<RecordingClicker, SimTime>, Rc<RefCell<Vec<Instant>>>) {
        let time = SimTime::new(oversleep);
        let clicks = Rc::new(RefCell::new(Vec::new()));
        let clicker = RecordingClicker {
            now: Rc::clone(&time.now),
            cost,
            clicks: Rc::clone(&clicks),
        };
        (MetronomeClock::with_time_source(clicker, time), clicks)
    }

    #[test]
    fn test_interval_from_bpm() {
        assert_eq!(beat_interval(120), Duration::from_millis(500));
        assert_eq!(beat_interval(60), Duration::from_secs(1));
        assert_eq!(beat_interval(0), Duration::from_secs(60));
    }

    #[test]
    fn test_no_drift_at_120_bpm() {
        let (mut clock, clicks) = sim_clock(Duration::from_millis(3), Duration::from_millis(4));
        clock.start(120);
        for expected in 0..100 {
            assert_eq!(clock.tick().unwrap(), expected);
        }

        let clicks = clicks.borrow();
        let total = clicks[99] - clicks[0];
        let average = total / 99;
        assert!(average >= Duration::from_millis(499), "{average:?}");
        assert!(average <= Duration::from_millis(501), "{average:?}");
        // per-beat overhead must not accumulate
        let ideal = Duration::from_millis(500) * 99;
        assert!(total - ideal < Duration::from_millis(10), "{total:?}");
    }

    #[test]
    fn test_every_tick_clicks_once() {
        let (mut clock, clicks) = sim_clock(Duration::ZERO, Duration::ZERO);
        clock.start(90);
        for _ in 0..7 {
            clock.tick().unwrap();
        }
        assert_eq!(clicks.borrow().len(), 7);
    }

    #[test]
    fn test_start_resets_reference() {
        let (mut clock, clicks) = sim_clock(Duration::ZERO, Duration::ZERO);
        clock.start(60);
        clock.tick().unwrap();
        clock.tick().unwrap();
        clock.start(120);
        assert_eq!(clock.tick().unwrap(), 0);
        clock.tick().unwrap();
        let clicks = clicks.borrow();
        assert_eq!(clicks[1] - clicks[0], Duration::from_secs(1));
        // first tick after a restart is immediate
        assert_eq!(clicks[2], clicks[1]);
        assert_eq!(clicks[3] - clicks[2], Duration::from_millis(500));
    }

    #[test]
    fn test_pause_runs_full_duration() {
        let (mut clock, _) = sim_clock(Duration::ZERO, Duration::ZERO);
        let before = clock.time.now();
        assert!(!clock.pause(Duration::from_millis(350), || false));
        assert_eq!(clock.time.now() - before, Duration::from_millis(350));
        assert_eq!(clock.time.sleeps, 4);
    }

    #[test]
    fn test_pause_stops_when_interrupted() {
        let (mut clock, _) = sim_clock(Duration::ZERO, Duration::ZERO);
        let slices = Rc::new(Cell::new(0));
        let seen = Rc::clone(&slices);
        let interrupted = clock.pause(Duration::from_secs(3), move || {
            seen.set(seen.get() + 1);
            seen.get() > 2
        });
        assert!(interrupted);
        assert_eq!(clock.time.sleeps, 2);
        assert_eq!(slices.get(), 3);
    }

    #[test]
    fn test_real_time_cadence() {
        let clicks = Rc::new(RefCell::new(Vec::new()));
        struct WallClicker(Rc<RefCell<Vec<Instant>>>);
        impl Clicker for WallClicker {
            fn play(&mut self) -> Result<(), ClickerError> {
                self.0.borrow_mut().push(Instant::now());
                Ok(())
            }
        }
        let mut clock = MetronomeClock::new(WallClicker(Rc::clone(&clicks)));
        clock.start(600);
        for _ in 0..11 {
            clock.tick().unwrap();
        }
        let clicks = clicks.borrow();
        let average = (clicks[10] - clicks[0]) / 10;
        assert!(average >= Duration::from_millis(99), "{average:?}");
        assert!(average < Duration::from_millis(130), "{average:?}");
    }
}
