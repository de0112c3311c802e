use thiserror::Error;

use crate::pipeline::generator::{GeneratorConfig, Tempo};
use crate::pipeline::settings::TrainerSettings;

pub const ONLY_COMMON: &str = "--only-use-common-progressions";
pub const START_ON_NON_ROOT: &str = "--start-on-non-root";
pub const BPM: &str = "--bpm";
pub const CLICK: &str = "--click";

pub const MAX_BPM: u32 = 400;

pub const USAGE: &str = "progress - A chord progression training tool

Play along with the current chord in a progression.

Usage: progress [OPTIONS]

Options:
    --start-on-non-root             Start progressions on any degree
    --only-use-common-progressions  Only use fixed common progressions
    --bpm <n>                       Play every progression at this tempo
    --click <path>                  Metronome sound (default: metronome.wav)

Press enter for a new progression, q, Esc or Ctrl-C to quit.
";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CliError {
    #[error("Can't specify start on non root when using common progressions")]
    ExclusiveFlags,

    #[error("--bpm expects a whole number between 1 and 400")]
    InvalidBpm,

    #[error("{0} expects a value")]
    MissingValue(&'static str),

    #[error("Unexpected arguments: {0}")]
    Unexpected(String),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Options {
    pub only_common_progressions: bool,
    pub start_on_non_root: bool,
    pub bpm: Option<u32>,
    pub click_path: Option<String>,
}

impl Options {
    pub fn generator_config(&self, settings: &TrainerSettings) -> GeneratorConfig {
        GeneratorConfig {
            only_common_progressions: self.only_common_progressions,
            start_on_non_root: self.start_on_non_root,
            tempo: self.bpm.map(Tempo::Fixed).unwrap_or_else(|| settings.tempo()),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Help,
    Train(Options),
}

/// Parse everything after the program name.
pub fn parse_args<I>(args: I) -> Result<Command, CliError>
where
    I: IntoIterator<Item = String>,
{
    let args: Vec<String> = args.into_iter().collect();
    if args.iter().any(|a| matches!(a.as_str(), "help" | "--help" | "-h")) {
        return Ok(Command::Help);
    }

    let mut options = Options::default();
    let mut unexpected = Vec::new();
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            ONLY_COMMON => options.only_common_progressions = true,
            START_ON_NON_ROOT => options.start_on_non_root = true,
            BPM => {
                let value = iter.next().ok_or(CliError::MissingValue(BPM))?;
                let bpm = value.parse::<u32>().map_err(|_| CliError::InvalidBpm)?;
                if !(1..=MAX_BPM).contains(&bpm) {
                    return Err(CliError::InvalidBpm);
                }
                options.bpm = Some(bpm);
            }
            CLICK => options.click_path = Some(iter.next().ok_or(CliError::MissingValue(CLICK))?),
            _ => unexpected.push(arg),
        }
    }

    if options.only_common_progressions && options.start_on_non_root {
        return Err(CliError::ExclusiveFlags);
    }
    if !unexpected.is_empty() {
        return Err(CliError::Unexpected(unexpected.join(" ")));
    }
    Ok(Command::Train(options))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Command, CliError> {
        parse_args(args.iter().map(|a| a.to_string()))
    }

    #[test]
    fn test_no_args_uses_defaults() {
        assert_eq!(parse(&[]), Ok(Command::Train(Options::default())));
    }

    #[test]
    fn test_mode_flags() {
        let Ok(Command::Train(options)) = parse(&[START_ON_NON_ROOT]) else {
            panic!("expected options");
        };
        assert!(options.start_on_non_root);
        assert!(!options.only_common_progressions);

        let Ok(Command::Train(options)) = parse(&[ONLY_COMMON]) else {
            panic!("expected options");
        };
        assert!(options.only_common_progressions);
    }

    #[test]
    fn test_exclusive_flags_rejected() {
        assert_eq!(parse(&[ONLY_COMMON, START_ON_NON_ROOT]), Err(CliError::ExclusiveFlags));
        assert_eq!(
            CliError::ExclusiveFlags.to_string(),
            "Can't specify start on non root when using common progressions"
        );
    }

    #[test]
    fn test_help_wins() {
        assert_eq!(parse(&["--nope", "-h"]), Ok(Command::Help));
        assert_eq!(parse(&["help"]), Ok(Command::Help));
    }

    #[test]
    fn test_unexpected_arguments() {
        assert_eq!(
            parse(&["--fast", START_ON_NON_ROOT, "loud"]),
            Err(CliError::Unexpected("--fast loud".to_string()))
        );
    }

    #[test]
    fn test_bpm_and_click() {
        let Ok(Command::Train(options)) = parse(&[BPM, "96", CLICK, "tick.wav"]) else {
            panic!("expected options");
        };
        assert_eq!(options.bpm, Some(96));
        assert_eq!(options.click_path.as_deref(), Some("tick.wav"));
        let config = options.generator_config(&TrainerSettings::default());
        assert_eq!(config.tempo, Tempo::Fixed(96));

        assert_eq!(parse(&[BPM, "0"]), Err(CliError::InvalidBpm));
        assert_eq!(parse(&[BPM, "fast"]), Err(CliError::InvalidBpm));
        assert_eq!(parse(&[BPM]), Err(CliError::MissingValue(BPM)));
    }

    #[test]
    fn test_tempo_defaults_to_settings() {
        let settings = TrainerSettings { bpm_min: 60, ..Default::default() };
        let config = Options::default().generator_config(&settings);
        assert_eq!(config.tempo, Tempo::Stepped { min: 60, max: 160, step: 10 });
    }
}
