// Watches for "new progression" and "quit" requests on a separate thread and
// reports them through InputSignals, so the metronome never waits on input.

use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::Context;
use crossbeam_channel::Receiver;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::pipeline::session_state::InputSignals;
use crate::report::warn;

/// How long a cancellable source may block before rechecking for shutdown.
const POLL_INTERVAL: Duration = Duration::from_millis(50);
/// How long `stop` waits for a watcher stuck in a blocking read.
const STOP_GRACE: Duration = Duration::from_millis(250);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Regenerate,
    Terminate,
    // the source has nothing more to say
    Closed,
}

pub trait InputSource: Send + 'static {
    /// Wait up to `timeout` for input. Sources that can't time out may block
    /// longer.
    fn poll_input(&mut self, timeout: Duration) -> anyhow::Result<Vec<InputEvent>>;
}

/// Key presses from a terminal in raw mode.
pub struct TerminalInput;

impl InputSource for TerminalInput {
    fn poll_input(&mut self, timeout: Duration) -> anyhow::Result<Vec<InputEvent>> {
        if !event::poll(timeout)? {
            return Ok(vec![]);
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                return Ok(vec![]);
            }
            return Ok(handle_key(key).into_iter().collect());
        }
        Ok(vec![])
    }
}

fn handle_key(key: KeyEvent) -> Option<InputEvent> {
    match key.code {
        KeyCode::Enter => Some(InputEvent::Regenerate),
        // raw mode swallows SIGINT, so ctrl-c arrives as a key
        KeyCode::Char('c' | 'd') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(InputEvent::Terminate)
        }
        KeyCode::Esc | KeyCode::Char('q') => Some(InputEvent::Terminate),
        _ => None,
    }
}

/// Line based input, e.g. piped stdin. An empty line asks for a new
/// progression; end of input closes the source.
pub struct LineInput<R> {
    reader: R,
    line: String,
}

impl<R: BufRead> LineInput<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, line: String::new() }
    }
}

impl<R: BufRead + Send + 'static> InputSource for LineInput<R> {
    fn poll_input(&mut self, _timeout: Duration) -> anyhow::Result<Vec<InputEvent>> {
        self.line.clear();
        if self.reader.read_line(&mut self.line)? == 0 {
            return Ok(vec![InputEvent::Closed]);
        }
        if self.line.trim_end_matches(['\r', '\n']).is_empty() {
            Ok(vec![InputEvent::Regenerate])
        } else {
            Ok(vec![])
        }
    }
}

/// What SIGINT does: the same as a quit key, so the session winds down
/// through its normal exit path.
pub fn interrupt_handler(signals: Arc<InputSignals>) -> impl Fn() + Send + 'static {
    move || signals.request_terminate()
}

/// Route SIGINT into `signals`. Raw mode turns Ctrl-C into a key press, but
/// piped runs and `kill -INT` still deliver the signal.
pub fn install_interrupt_handler(signals: Arc<InputSignals>) -> anyhow::Result<()> {
    ctrlc::set_handler(interrupt_handler(signals)).context("failed to install SIGINT handler")
}

/// Owns the input thread.
///
/// `TerminalInput` polls with a timeout and always notices shutdown.
/// `LineInput` blocks in `read_line` and there is no portable way to cancel
/// that, so a watcher still waiting on stdin when `stop` gives up is left
/// detached and ends with the process.
pub struct InputWatcher {
    shutdown: Arc<AtomicBool>,
    done_rx: Receiver<()>,
    handle: Option<JoinHandle<()>>,
}

impl InputWatcher {
    pub fn spawn<S: InputSource>(mut source: S, signals: Arc<InputSignals>) -> Self {
        let shutdown = Arc::new(AtomicBool::new(false));
        let (done_tx, done_rx) = crossbeam_channel::bounded::<()>(1);
        let flag = Arc::clone(&shutdown);
        let handle = thread::spawn(move || {
            watch(&mut source, &signals, &flag);
            let _ = done_tx.send(());
        });
        Self {
            shutdown,
            done_rx,
            handle: Some(handle),
        }
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Ask the watcher to finish and join it, waiting at most `STOP_GRACE`.
    /// Returns false if already stopped.
    pub fn stop(&mut self) -> bool {
        let Some(handle) = self.handle.take() else {
            return false;
        };
        self.shutdown.store(true, Ordering::Release);
        if self.done_rx.recv_timeout(STOP_GRACE).is_ok() {
            let _ = handle.join();
        }
        true
    }
}

impl Drop for InputWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

fn watch<S: InputSource>(source: &mut S, signals: &InputSignals, shutdown: &AtomicBool) {
    while !shutdown.load(Ordering::Acquire) {
        let events = match source.poll_input(POLL_INTERVAL) {
            Ok(events) => events,
            Err(e) => {
                // without input there is no way to stop the session later
                warn!("input error, stopping: {e}");
                signals.request_terminate();
                return;
            }
        };
        for event in events {
            match event {
                InputEvent::Regenerate => signals.request_regenerate(),
                InputEvent::Terminate => {
                    signals.request_terminate();
                    return;
                }
                InputEvent::Closed => return,
            }
        }
    }
}
