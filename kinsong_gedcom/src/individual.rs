// Individual records extracted from a GEDCOM line stream.
//
// Walks the parsed lines once, opening a new `Individual` at each level-0
// `INDI` record and closing it at the next level-0 line. Inside a record:
// - the first level-1 `NAME` supplies the name; `/Surname/` slashes split
//   it, and level-2 `GIVN`/`SURN` override the split parts
// - the first `DATE` under a level-1 `BIRT` or `DEAT` supplies that date
// - `CONC`/`CONT` lines one level below a captured value extend it
//
// Everything else (families, sources, notes, places) is skipped. Dates are
// stored as raw text.

use std::path::Path;

use tracing::debug;

use crate::error::GedcomError;
use crate::line::{parse_line, split_lines};

/// One person from a GEDCOM file, reduced to what the sonifier needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Individual {
    /// Cross-reference id (e.g. `I1`), if the record had one.
    pub xref: Option<String>,
    pub given: String,
    pub surname: String,
    /// Raw `DATE` text of the birth event.
    pub birth_date: Option<String>,
    /// Raw `DATE` text of the death event.
    pub death_date: Option<String>,
}

impl Individual {
    /// Given name and surname joined by a single space.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.given, self.surname).trim().to_string()
    }
}

/// Which captured value a `CONC`/`CONT` line extends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Name,
    Given,
    Surname,
    BirthDate,
    DeathDate,
}

/// The level-1 structure currently open inside an INDI record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Name,
    Birth,
    Death,
    Other,
}

/// Accumulates one INDI record until the next level-0 line.
#[derive(Debug, Default)]
struct IndividualBuilder {
    xref: Option<String>,
    name: Option<String>,
    given: Option<String>,
    surname: Option<String>,
    birth_date: Option<String>,
    death_date: Option<String>,
}

impl IndividualBuilder {
    fn slot_mut(&mut self, slot: Slot) -> &mut Option<String> {
        match slot {
            Slot::Name => &mut self.name,
            Slot::Given => &mut self.given,
            Slot::Surname => &mut self.surname,
            Slot::BirthDate => &mut self.birth_date,
            Slot::DeathDate => &mut self.death_date,
        }
    }

    fn continue_value(&mut self, slot: Slot, newline: bool, text: &str) {
        let value = self.slot_mut(slot).get_or_insert_with(String::new);
        if newline {
            value.push('\n');
        }
        value.push_str(text);
    }

    fn finish(self) -> Individual {
        let name = self.name.unwrap_or_default();
        let mut parts = name.split('/');
        let split_given = parts.next().unwrap_or("").trim().to_string();
        let split_surname = parts.next().unwrap_or("").trim().to_string();

        Individual {
            xref: self.xref,
            given: self.given.map_or(split_given, |g| g.trim().to_string()),
            surname: self.surname.map_or(split_surname, |s| s.trim().to_string()),
            birth_date: self.birth_date,
            death_date: self.death_date,
        }
    }
}

/// Parse GEDCOM text into individuals, in file order.
pub fn parse_individuals(text: &str) -> Result<Vec<Individual>, GedcomError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut individuals = Vec::new();
    let mut current: Option<IndividualBuilder> = None;
    let mut section = Section::Other;
    let mut open_slot: Option<(u8, Slot)> = None;
    let mut previous_level: Option<u8> = None;

    for (index, raw) in split_lines(text).into_iter().enumerate() {
        if raw.trim().is_empty() {
            continue;
        }
        let line_number = index + 1;
        let line = parse_line(raw, line_number)?;

        let deepest_allowed = previous_level.map_or(0, |level| level.saturating_add(1));
        if line.level > deepest_allowed {
            return Err(GedcomError::MalformedLine {
                line_number,
                content: raw.to_string(),
            });
        }
        previous_level = Some(line.level);

        if (line.tag == "CONC" || line.tag == "CONT")
            && let (Some(builder), Some((level, slot))) = (current.as_mut(), open_slot)
            && line.level.checked_sub(1) == Some(level)
        {
            let text = line.value.as_deref().unwrap_or("");
            builder.continue_value(slot, line.tag == "CONT", text);
            continue;
        }
        open_slot = None;

        if line.level == 0 {
            if let Some(done) = current.take() {
                individuals.push(done.finish());
            }
            section = Section::Other;
            if line.tag == "INDI" {
                current = Some(IndividualBuilder {
                    xref: line.xref,
                    ..IndividualBuilder::default()
                });
            }
            continue;
        }

        let Some(builder) = current.as_mut() else {
            continue;
        };

        match (line.level, line.tag.as_str()) {
            (1, "NAME") if builder.name.is_none() => {
                section = Section::Name;
                builder.name = Some(line.value.unwrap_or_default());
                open_slot = Some((1, Slot::Name));
            }
            (1, "BIRT") => section = Section::Birth,
            (1, "DEAT") => section = Section::Death,
            (1, _) => section = Section::Other,
            (2, "GIVN") if section == Section::Name => {
                builder.given = Some(line.value.unwrap_or_default());
                open_slot = Some((2, Slot::Given));
            }
            (2, "SURN") if section == Section::Name => {
                builder.surname = Some(line.value.unwrap_or_default());
                open_slot = Some((2, Slot::Surname));
            }
            (2, "DATE") if section == Section::Birth && builder.birth_date.is_none() => {
                builder.birth_date = line.value;
                open_slot = Some((2, Slot::BirthDate));
            }
            (2, "DATE") if section == Section::Death && builder.death_date.is_none() => {
                builder.death_date = line.value;
                open_slot = Some((2, Slot::DeathDate));
            }
            _ => {}
        }
    }

    if let Some(done) = current.take() {
        individuals.push(done.finish());
    }

    debug!(individuals = individuals.len(), "parsed GEDCOM individuals");
    Ok(individuals)
}

/// Read a GEDCOM file and parse its individuals. Invalid UTF-8 is replaced
/// rather than rejected, since older exports often use ANSEL or Latin-1.
pub fn read_individuals(path: &Path) -> Result<Vec<Individual>, GedcomError> {
    let bytes = std::fs::read(path).map_err(|source| GedcomError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_individuals(&String::from_utf8_lossy(&bytes))
}
