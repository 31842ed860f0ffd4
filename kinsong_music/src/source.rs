// Record-source seams.
//
// The pipeline only needs three things from a person: the raw birth date
// text, the raw death date text, and a display name. `PersonRecord` captures
// that shape and `RecordSource` hands over a whole record set (or the
// source's own error). GEDCOM files are the shipped source; in-memory
// `PersonEntry` lists cover embedders and tests.

use std::convert::Infallible;
use std::path::PathBuf;

use kinsong_gedcom::{GedcomError, Individual, read_individuals};

/// The per-person shape the lifespan collector consumes.
pub trait PersonRecord {
    fn birth_date(&self) -> Option<&str>;
    fn death_date(&self) -> Option<&str>;
    fn display_name(&self) -> String;
}

/// Something that can yield a complete record set.
pub trait RecordSource {
    type Record: PersonRecord;
    type Error: std::error::Error + Send + Sync + 'static;

    /// All records, in source order.
    fn records(&self) -> Result<Vec<Self::Record>, Self::Error>;
}

impl PersonRecord for Individual {
    fn birth_date(&self) -> Option<&str> {
        self.birth_date.as_deref()
    }

    fn death_date(&self) -> Option<&str> {
        self.death_date.as_deref()
    }

    fn display_name(&self) -> String {
        Individual::display_name(self)
    }
}

/// A GEDCOM file on disk, read lazily when records are requested.
#[derive(Debug, Clone)]
pub struct GedcomFile {
    pub path: PathBuf,
}

impl GedcomFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        GedcomFile { path: path.into() }
    }
}

impl RecordSource for GedcomFile {
    type Record = Individual;
    type Error = GedcomError;

    fn records(&self) -> Result<Vec<Individual>, GedcomError> {
        read_individuals(&self.path)
    }
}

/// A plain in-memory person record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonEntry {
    pub name: String,
    pub birth: Option<String>,
    pub death: Option<String>,
}

impl PersonEntry {
    pub fn new(name: &str, birth: Option<&str>, death: Option<&str>) -> Self {
        PersonEntry {
            name: name.to_string(),
            birth: birth.map(str::to_string),
            death: death.map(str::to_string),
        }
    }
}

impl PersonRecord for PersonEntry {
    fn birth_date(&self) -> Option<&str> {
        self.birth.as_deref()
    }

    fn death_date(&self) -> Option<&str> {
        self.death.as_deref()
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }
}

impl<R: PersonRecord + Clone> RecordSource for Vec<R> {
    type Record = R;
    type Error = Infallible;

    fn records(&self) -> Result<Vec<R>, Infallible> {
        Ok(self.clone())
    }
}
