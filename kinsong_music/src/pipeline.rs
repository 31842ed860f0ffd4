// End-to-end entry point: record source → MIDI bytes plus a summary line.
//
// Stages run strictly in sequence on fresh local data:
// records → `collect_lifespans` → `build_timeline` → `TimelineWriter`.
// Failures from the source or writer propagate unchanged; nothing is
// retried and no partial output is produced.

use std::path::Path;

use tracing::info;

use crate::config::SonifyConfig;
use crate::error::SonifyError;
use crate::lifespan::{Lifespan, SkipCounts, YearRange, collect_lifespans};
use crate::midi::TimelineWriter;
use crate::source::RecordSource;
use crate::timeline::{TimedEvent, build_timeline};

/// The result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendering {
    /// The serialized timeline (a Standard MIDI File for `SmfWriter`).
    pub bytes: Vec<u8>,
    /// "Processed N individuals from years MIN-MAX."
    pub summary: String,
    pub lifespans: Vec<Lifespan>,
    pub range: YearRange,
    pub skipped: SkipCounts,
    pub events: Vec<TimedEvent>,
}

impl Rendering {
    /// Write the byte stream to `path`.
    pub fn save(&self, path: &Path) -> Result<(), SonifyError> {
        std::fs::write(path, &self.bytes).map_err(|source| SonifyError::Output {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write the timed events as pretty JSON to `path`.
    pub fn save_events_json(&self, path: &Path) -> Result<(), SonifyError> {
        let json = serde_json::to_vec_pretty(&self.events)?;
        std::fs::write(path, json).map_err(|source| SonifyError::Output {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Render a record source with the default config, overriding tempo and
/// year scale. This is the caller-facing entry point.
pub fn generate_timeline<S>(
    source: &S,
    tempo_bpm: u32,
    ticks_per_year: u32,
) -> Result<Rendering, SonifyError>
where
    S: RecordSource + ?Sized,
{
    let config = SonifyConfig {
        tempo_bpm,
        ticks_per_year,
        ..SonifyConfig::default()
    };
    generate_timeline_with(source, &config, &config.writer())
}

/// Render a record source with an explicit config and writer.
pub fn generate_timeline_with<S, W>(
    source: &S,
    config: &SonifyConfig,
    writer: &W,
) -> Result<Rendering, SonifyError>
where
    S: RecordSource + ?Sized,
    W: TimelineWriter + ?Sized,
{
    config.validate()?;

    let records = source
        .records()
        .map_err(|e| SonifyError::Source(Box::new(e)))?;
    info!(records = records.len(), "loaded records");

    let set = collect_lifespans(&records, config.present_year)?;
    let events = build_timeline(&set.lifespans, set.range, &config.timeline_params())?;
    let bytes = writer.write_timeline(&events, config.tempo_bpm, config.program)?;
    info!(events = events.len(), bytes = bytes.len(), "wrote timeline");

    let summary = format!(
        "Processed {} individuals from years {}-{}.",
        set.lifespans.len(),
        set.range.min,
        set.range.max
    );

    Ok(Rendering {
        bytes,
        summary,
        lifespans: set.lifespans,
        range: set.range,
        skipped: set.skipped,
        events,
    })
}
