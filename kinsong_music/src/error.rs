// Error types for the sonification pipeline.
//
// Per-record problems (unparseable dates, missing birth years, deaths before
// births) never reach these types: they are filtered out in lifespan.rs.
// Only the aggregate "nothing survived" condition, bad parameters, and
// failures from the record source or writer surface here.

use std::path::PathBuf;
use thiserror::Error;

use crate::year::Year;

/// Errors returned by the pipeline and its stages.
#[derive(Debug, Error)]
pub enum SonifyError {
    /// Every record was filtered out.
    #[error("no individuals with a usable birth year")]
    NoValidIndividuals,

    /// A tunable is outside the range the pipeline can work with.
    #[error("invalid {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// A year gap times the ticks-per-year scale does not fit in 32 bits.
    #[error("tick delta overflows for a {year_gap}-year gap at {ticks_per_year} ticks per year")]
    TickOverflow { year_gap: Year, ticks_per_year: u32 },

    /// The record source failed to produce records.
    #[error("failed to read records: {0}")]
    Source(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The timeline writer failed.
    #[error(transparent)]
    Write(#[from] WriteError),

    /// A configuration file could not be read or parsed.
    #[error("failed to load config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An output file could not be written.
    #[error("failed to write {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Event export failed to serialize.
    #[error("failed to serialize events: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors from turning timed events into a MIDI byte stream.
#[derive(Debug, Error)]
pub enum WriteError {
    /// The tempo cannot be expressed as a 24-bit microseconds-per-quarter value.
    #[error("tempo {bpm} BPM is outside the representable range")]
    TempoOutOfRange { bpm: u32 },

    /// A tick delta exceeds the 28-bit variable-length limit.
    #[error("event {index} has tick delta {tick_delta}, above the MIDI limit of {max}")]
    DeltaOutOfRange {
        index: usize,
        tick_delta: u32,
        max: u32,
    },

    /// The channel does not fit in four bits.
    #[error("MIDI channel {0} is outside 0..=15")]
    ChannelOutOfRange(u8),

    /// A program, key, or velocity does not fit in seven bits.
    #[error("{what} {value} is outside 0..=127")]
    DataOutOfRange { what: &'static str, value: u8 },

    /// Ticks per quarter note must be in 1..=0x7FFF.
    #[error("ticks per quarter {0} is outside 1..=32767")]
    TicksPerQuarter(u16),

    /// Byte-level serialization failed.
    #[error("failed to serialize MIDI: {0}")]
    Io(#[from] std::io::Error),
}
