// Lifespan collection: records in, validated lifespans and their year range out.
//
// Each record resolves to one of three outcomes:
// - no extractable birth year → skipped (it cannot be placed in time)
// - death year before birth year → skipped (bad data is dropped, not repaired)
// - otherwise a `Lifespan`, with a missing death year replaced by the
//   configured present year (the person is assumed to be living)
//
// Skipping is silent as far as the caller is concerned: it shows up only in
// `SkipCounts` and debug logs. The one surfaced failure is an empty result.
//
// Survivors keep source order. The `YearRange` is a fold over the survivors
// (min start, max end), so it always describes exactly the retained set.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::SonifyError;
use crate::source::PersonRecord;
use crate::year::{Year, extract_year};

/// Year assumed for people with no recorded death.
pub const DEFAULT_PRESENT_YEAR: Year = 2025;

/// A resolved birth/death span for one person. `end >= start` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lifespan {
    pub name: String,
    pub start: Year,
    pub end: Year,
}

/// Earliest start and latest end across a set of lifespans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearRange {
    pub min: Year,
    pub max: Year,
}

impl YearRange {
    /// The range covering a single lifespan.
    pub fn of(lifespan: &Lifespan) -> Self {
        YearRange {
            min: lifespan.start,
            max: lifespan.end,
        }
    }

    /// Widen the range to cover `lifespan`.
    pub fn including(self, lifespan: &Lifespan) -> Self {
        YearRange {
            min: self.min.min(lifespan.start),
            max: self.max.max(lifespan.end),
        }
    }

    /// Span in years used as the pitch-normalization denominator. A range
    /// that collapses to one year counts as width 1.
    pub fn width(&self) -> Year {
        (self.max - self.min).max(1)
    }
}

/// How many records were dropped, by reason.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SkipCounts {
    pub missing_birth: usize,
    pub inverted: usize,
}

impl SkipCounts {
    pub fn total(&self) -> usize {
        self.missing_birth + self.inverted
    }
}

/// Outcome of resolving one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Retained(Lifespan),
    MissingBirth,
    Inverted { start: Year, end: Year },
}

/// Resolve one record into a lifespan or a skip reason.
pub fn resolve_lifespan<R: PersonRecord + ?Sized>(record: &R, present_year: Year) -> Resolution {
    let Some(start) = extract_year(record.birth_date()) else {
        return Resolution::MissingBirth;
    };
    let end = extract_year(record.death_date()).unwrap_or(present_year);
    if end < start {
        return Resolution::Inverted { start, end };
    }
    Resolution::Retained(Lifespan {
        name: record.display_name(),
        start,
        end,
    })
}

/// The retained lifespans of a record set plus their year range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifespanSet {
    /// Retained lifespans in source order.
    pub lifespans: Vec<Lifespan>,
    pub range: YearRange,
    pub skipped: SkipCounts,
}

/// Resolve every record, keep the valid lifespans, and compute their range.
///
/// Fails with `NoValidIndividuals` when nothing survives.
pub fn collect_lifespans<R: PersonRecord>(
    records: &[R],
    present_year: Year,
) -> Result<LifespanSet, SonifyError> {
    let mut lifespans = Vec::with_capacity(records.len());
    let mut skipped = SkipCounts::default();

    for (index, record) in records.iter().enumerate() {
        match resolve_lifespan(record, present_year) {
            Resolution::Retained(lifespan) => lifespans.push(lifespan),
            Resolution::MissingBirth => {
                debug!(index, name = %record.display_name(), "skipping record without birth year");
                skipped.missing_birth += 1;
            }
            Resolution::Inverted { start, end } => {
                debug!(index, name = %record.display_name(), start, end, "skipping record that dies before birth");
                skipped.inverted += 1;
            }
        }
    }

    let Some(range) = lifespans
        .split_first()
        .map(|(first, rest)| rest.iter().fold(YearRange::of(first), YearRange::including))
    else {
        warn!(records = records.len(), "no record has a usable birth year");
        return Err(SonifyError::NoValidIndividuals);
    };

    info!(
        retained = lifespans.len(),
        skipped = skipped.total(),
        min = range.min,
        max = range.max,
        "collected lifespans"
    );

    Ok(LifespanSet {
        lifespans,
        range,
        skipped,
    })
}
