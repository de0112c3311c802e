mod audio;
mod audio_api;
mod cli;
mod loader;
mod pipeline;
mod report;
mod theory;
mod trainer;

use std::io::{BufReader, IsTerminal};
use std::path::Path;

use crossterm::terminal;
use rand::rngs::StdRng;
use rand::SeedableRng;

use cli::Command;
use pipeline::session_state::InputSignals;
use pipeline::settings;
use trainer::clock::MetronomeClock;
use trainer::input::{self, InputWatcher, LineInput, TerminalInput};
use trainer::session::{SessionTiming, TrainerSession};

fn main() {
    let options = match cli::parse_args(std::env::args().skip(1)) {
        Ok(Command::Help) => {
            println!("{}", cli::USAGE);
            return;
        }
        Ok(Command::Train(options)) => options,
        Err(e) => {
            eprintln!("{e}");
            eprintln!("Run `progress --help` for usage.");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(options) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(options: cli::Options) -> anyhow::Result<()> {
    let work_dir = std::env::current_dir().unwrap_or_default();
    let mut settings = settings::load_settings(&work_dir);
    if let Some(path) = &options.click_path {
        settings.click_path = path.clone();
    }
    let config = options.generator_config(&settings);
    config.validate()?;

    // a missing or broken click sound is fatal before anything is shown
    let audio = audio::start_audio()?;
    loader::sample_loader::load_click(&audio, Path::new(&settings.click_path))?;

    let signals = InputSignals::new_shared();
    input::install_interrupt_handler(signals.clone())?;
    let interactive = std::io::stdin().is_terminal();
    let _guard = if interactive { Some(RawModeGuard::enable()?) } else { None }; // auto drops when out of scope
    let watcher = if interactive {
        InputWatcher::spawn(TerminalInput, signals.clone())
    } else {
        InputWatcher::spawn(LineInput::new(BufReader::new(std::io::stdin())), signals.clone())
    };

    let session = TrainerSession::new(
        config,
        SessionTiming::from(&settings),
        StdRng::from_entropy(),
        MetronomeClock::new(audio),
        std::io::stdout(),
        signals,
    )?
    .with_watcher(watcher);

    // returns once the user quits; the watcher and audio stream go with it
    session.run()
}

struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> anyhow::Result<Self> {
        terminal::enable_raw_mode()?;
        report::set_raw_mode(true);
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
        report::set_raw_mode(false);
    }
}
