// trainer timing knobs, optionally read from <dir>/.progress/settings.json on startup
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::generator::Tempo;
use crate::report::warn;

const PROGRESS_DIR: &str = ".progress";
const SETTINGS_FILE: &str = "settings.json";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerSettings {
    pub beats_per_chord: u32,
    pub preroll_beats: u32,
    pub read_delay_ms: u64, // pause after announcing a progression
    pub bpm_min: u32,
    pub bpm_max: u32, // exclusive
    pub bpm_step: u32,
    pub click_path: String,
}

impl Default for TrainerSettings {
    fn default() -> Self {
        Self {
            beats_per_chord: 4,
            preroll_beats: 4,
            read_delay_ms: 3000,
            bpm_min: 80,
            bpm_max: 160,
            bpm_step: 10,
            click_path: String::from("metronome.wav"),
        }
    }
}

impl TrainerSettings {
    pub fn tempo(&self) -> Tempo {
        Tempo::Stepped {
            min: self.bpm_min,
            max: self.bpm_max,
            step: self.bpm_step,
        }
    }
}

// <dir>/.progress/settings.json
fn settings_file_path(dir: &Path) -> PathBuf {
    dir.join(PROGRESS_DIR).join(SETTINGS_FILE)
}

/// Missing file means defaults; a broken one is reported and ignored.
pub fn load_settings(dir: &Path) -> TrainerSettings {
    let path = settings_file_path(dir);
    let Ok(data) = std::fs::read_to_string(&path) else {
        return TrainerSettings::default();
    };
    match serde_json::from_str(&data) {
        Ok(settings) => settings,
        Err(e) => {
            warn!("ignoring {}: {e}", path.display());
            TrainerSettings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("progress-{name}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(dir.join(PROGRESS_DIR)).unwrap();
        dir
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = std::env::temp_dir().join("progress-settings-does-not-exist");
        assert_eq!(load_settings(&dir), TrainerSettings::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = scratch_dir("partial");
        std::fs::write(settings_file_path(&dir), r#"{ "beats_per_chord": 8 }"#).unwrap();
        let settings = load_settings(&dir);
        assert_eq!(settings.beats_per_chord, 8);
        assert_eq!(settings.preroll_beats, 4);
        assert_eq!(settings.click_path, "metronome.wav");
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_broken_file_falls_back() {
        let dir = scratch_dir("broken");
        std::fs::write(settings_file_path(&dir), "{ not json").unwrap();
        assert_eq!(load_settings(&dir), TrainerSettings::default());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_tempo_from_settings() {
        let settings = TrainerSettings { bpm_min: 60, bpm_max: 70, bpm_step: 5, ..Default::default() };
        assert_eq!(settings.tempo(), Tempo::Stepped { min: 60, max: 70, step: 5 });
    }
}
