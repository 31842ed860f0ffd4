// Error type for GEDCOM reading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading a GEDCOM file.
#[derive(Debug, Error)]
pub enum GedcomError {
    /// The file could not be read.
    #[error("failed to read GEDCOM file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line does not follow `level [@XREF@] TAG [value]`, or its level
    /// skips more than one step deeper than the previous line.
    #[error("malformed GEDCOM line {line_number}: {content:?}")]
    MalformedLine { line_number: usize, content: String },
}
