// Kinsong: family-tree sonification.
//
// Turns a genealogical record set into a single-track MIDI timeline. Each
// person with a usable birth year becomes one note: it sounds at the birth
// year, stops at the death year (or the configured present year), and its
// pitch rises with how late in the family history the person was born.
//
// Architecture:
// - year.rs: Year extraction from free-text GEDCOM dates
// - lifespan.rs: Record → lifespan resolution, skip rules, and the year range fold
// - timeline.rs: Pitch mapping, note-on/off events, stable chronological sort,
//   and year-gap → tick-delta quantization
// - midi.rs: `TimelineWriter` trait and the `midly`-backed Standard MIDI File writer
// - source.rs: `RecordSource`/`PersonRecord` seams and their GEDCOM implementations
// - config.rs: `SonifyConfig` (JSON-loadable tunables with documented defaults)
// - pipeline.rs: `generate_timeline` entry point tying the stages together
// - error.rs: `SonifyError` and `WriteError`
// - logging.rs: tracing-subscriber setup for the `kinsong` binary
//
// Every stage is a pure function of its inputs: the same records and config
// always produce byte-identical output. The only time-dependent input is the
// configurable present year used for people without a death date.

pub mod config;
pub mod error;
pub mod lifespan;
pub mod logging;
pub mod midi;
pub mod pipeline;
pub mod source;
pub mod timeline;
pub mod year;

pub use config::SonifyConfig;
pub use error::{SonifyError, WriteError};
pub use lifespan::{Lifespan, LifespanSet, SkipCounts, YearRange, collect_lifespans};
pub use midi::{SmfWriter, TimelineWriter};
pub use pipeline::{Rendering, generate_timeline, generate_timeline_with};
pub use source::{GedcomFile, PersonEntry, PersonRecord, RecordSource};
pub use timeline::{NoteEvent, NoteKind, PitchMapping, TimedEvent, TimelineParams, build_timeline};
pub use year::{Year, extract_year};
