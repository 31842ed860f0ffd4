// GEDCOM record reader for the kinsong family-tree sonifier.
//
// Reads the subset of GEDCOM 5.5 that the music side needs: one record per
// individual with a display name and the raw text of its birth and death
// dates. Dates are passed through verbatim; extracting a year from them is
// the consumer's job (see `kinsong_music::year`).
//
// Architecture:
// - `line.rs`: Single-line grammar (`level [@XREF@] TAG [value]`) and line splitting
// - `individual.rs`: `Individual` record plus the INDI/NAME/BIRT/DEAT walker
// - `error.rs`: `GedcomError`
//
// No musical knowledge lives here. The reader is deterministic: the same
// input text always yields the same individuals in file order.

pub mod error;
pub mod individual;
pub mod line;

pub use error::GedcomError;
pub use individual::{Individual, parse_individuals, read_individuals};
pub use line::{GedcomLine, parse_line};
