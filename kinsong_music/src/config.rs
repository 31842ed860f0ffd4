// Tunable sonification parameters.
//
// All numeric knobs of the pipeline live in `SonifyConfig`, loaded from
// JSON or built from defaults. Every field is optional in the JSON; missing
// fields take the defaults below, which reproduce the classic rendering:
// present year 2025, pitches 36..=90, velocity 64, Celesta (program 8) on
// channel 0, 480 ticks per quarter, 120 BPM, 100 ticks per year.
//
// `validate()` checks ranges once, up front, so later stages can convert
// to MIDI data types without re-checking.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::SonifyError;
use crate::lifespan::DEFAULT_PRESENT_YEAR;
use crate::midi::{DEFAULT_PROGRAM, DEFAULT_TICKS_PER_QUARTER, SmfWriter};
use crate::timeline::{
    DEFAULT_PITCH_CEILING, DEFAULT_PITCH_FLOOR, DEFAULT_VELOCITY, PitchMapping, TimelineParams,
};
use crate::year::Year;

pub const DEFAULT_TEMPO_BPM: u32 = 120;
pub const DEFAULT_TICKS_PER_YEAR: u32 = 100;

/// Everything the pipeline can be tuned with.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SonifyConfig {
    /// End year for people without a recorded death.
    pub present_year: Year,
    /// Pitch for the earliest birth year.
    pub pitch_floor: u8,
    /// Pitch for the latest year in the range.
    pub pitch_ceiling: u8,
    /// Note-on velocity (1..=127).
    pub note_velocity: u8,
    /// General MIDI program (0-based).
    pub program: u8,
    /// MIDI channel (0..=15).
    pub channel: u8,
    pub ticks_per_quarter: u16,
    pub tempo_bpm: u32,
    /// Ticks per calendar year; larger values slow history down.
    pub ticks_per_year: u32,
}

impl Default for SonifyConfig {
    fn default() -> Self {
        SonifyConfig {
            present_year: DEFAULT_PRESENT_YEAR,
            pitch_floor: DEFAULT_PITCH_FLOOR,
            pitch_ceiling: DEFAULT_PITCH_CEILING,
            note_velocity: DEFAULT_VELOCITY,
            program: DEFAULT_PROGRAM,
            channel: 0,
            ticks_per_quarter: DEFAULT_TICKS_PER_QUARTER,
            tempo_bpm: DEFAULT_TEMPO_BPM,
            ticks_per_year: DEFAULT_TICKS_PER_YEAR,
        }
    }
}

impl SonifyConfig {
    /// Parse a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Read and parse a JSON config file.
    pub fn load(path: &Path) -> Result<Self, SonifyError> {
        let config_error = |source: Box<dyn std::error::Error + Send + Sync>| SonifyError::Config {
            path: path.to_path_buf(),
            source,
        };
        let data = std::fs::read_to_string(path).map_err(|e| config_error(e.into()))?;
        Self::from_json(&data).map_err(|e| config_error(e.into()))
    }

    /// Check every field is within the range the pipeline supports.
    pub fn validate(&self) -> Result<(), SonifyError> {
        fn invalid(name: &'static str, reason: String) -> Result<(), SonifyError> {
            Err(SonifyError::InvalidParameter { name, reason })
        }

        if self.tempo_bpm == 0 {
            return invalid("tempo_bpm", "must be positive".into());
        }
        if self.ticks_per_year == 0 {
            return invalid("ticks_per_year", "must be positive".into());
        }
        for (name, value) in [
            ("pitch_floor", self.pitch_floor),
            ("pitch_ceiling", self.pitch_ceiling),
            ("note_velocity", self.note_velocity),
            ("program", self.program),
        ] {
            if value > 127 {
                return invalid(name, format!("{value} is above 127"));
            }
        }
        if self.note_velocity == 0 {
            return invalid("note_velocity", "must be at least 1".into());
        }
        if self.channel > 15 {
            return invalid("channel", format!("{} is above 15", self.channel));
        }
        if self.ticks_per_quarter == 0 || self.ticks_per_quarter > 0x7FFF {
            return invalid(
                "ticks_per_quarter",
                format!("{} is outside 1..=32767", self.ticks_per_quarter),
            );
        }
        Ok(())
    }

    /// Timeline-builder parameters drawn from this config.
    pub fn timeline_params(&self) -> TimelineParams {
        TimelineParams {
            ticks_per_year: self.ticks_per_year,
            pitch: PitchMapping {
                floor: self.pitch_floor,
                ceiling: self.pitch_ceiling,
            },
            velocity: self.note_velocity,
        }
    }

    /// The MIDI writer configured by this config.
    pub fn writer(&self) -> SmfWriter {
        SmfWriter {
            ticks_per_quarter: self.ticks_per_quarter,
            channel: self.channel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_rendering() {
        let config = SonifyConfig::default();
        assert_eq!(config.present_year, 2025);
        assert_eq!(config.pitch_floor, 36);
        assert_eq!(config.pitch_ceiling, 90);
        assert_eq!(config.note_velocity, 64);
        assert_eq!(config.program, 8);
        assert_eq!(config.tempo_bpm, 120);
        assert_eq!(config.ticks_per_year, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config = SonifyConfig::from_json(r#"{ "pitch_floor": 48, "present_year": 2030 }"#).unwrap();
        assert_eq!(config.pitch_floor, 48);
        assert_eq!(config.present_year, 2030);
        assert_eq!(config.pitch_ceiling, 90);
        assert_eq!(config.tempo_bpm, 120);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(SonifyConfig::from_json(r#"{ "pitch_flor": 48 }"#).is_err());
    }

    #[test]
    fn json_roundtrip() {
        let config = SonifyConfig {
            program: 40,
            channel: 2,
            ..SonifyConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(SonifyConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn validation_rejects_out_of_range_fields() {
        let cases = [
            ("tempo_bpm", SonifyConfig { tempo_bpm: 0, ..SonifyConfig::default() }),
            ("ticks_per_year", SonifyConfig { ticks_per_year: 0, ..SonifyConfig::default() }),
            ("pitch_ceiling", SonifyConfig { pitch_ceiling: 128, ..SonifyConfig::default() }),
            ("note_velocity", SonifyConfig { note_velocity: 0, ..SonifyConfig::default() }),
            ("program", SonifyConfig { program: 200, ..SonifyConfig::default() }),
            ("channel", SonifyConfig { channel: 16, ..SonifyConfig::default() }),
            ("ticks_per_quarter", SonifyConfig { ticks_per_quarter: 0x8000, ..SonifyConfig::default() }),
        ];
        for (expected, config) in cases {
            match config.validate() {
                Err(SonifyError::InvalidParameter { name, .. }) => assert_eq!(name, expected),
                other => panic!("expected {expected} to be invalid, got {other:?}"),
            }
        }
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        let err = SonifyConfig::load(&path).unwrap_err();
        assert!(matches!(err, SonifyError::Config { .. }));

        let cause = std::error::Error::source(&err).unwrap();
        let io = cause.downcast_ref::<std::io::Error>().unwrap();
        assert_eq!(io.kind(), std::io::ErrorKind::NotFound);
    }

    #[test]
    fn load_keeps_parse_error_as_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, r#"{ "ticks_per_year": "many" }"#).unwrap();

        let err = SonifyConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("broken.json"));
        let cause = std::error::Error::source(&err).unwrap();
        let json = cause.downcast_ref::<serde_json::Error>().unwrap();
        assert!(json.is_data());
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kinsong.json");
        std::fs::write(&path, r#"{ "ticks_per_year": 250 }"#).unwrap();
        assert_eq!(SonifyConfig::load(&path).unwrap().ticks_per_year, 250);
    }
}
