// Timeline building: lifespans → chronologically ordered, tick-timed note events.
//
// Steps:
// 1. Pitch. Each lifespan's start year is normalized against the year range
//    and linearly mapped onto [floor, ceiling], rounded, then clamped to the
//    MIDI range 0..=127. Only the birth year matters; the note-off reuses the
//    note-on's pitch.
// 2. Events. One note-on at the birth year and one note-off at the end year
//    per lifespan, emitted in lifespan order (on before off).
// 3. Order. A stable sort by year. Events in the same year keep emission
//    order; there is no secondary key. This means that when one person dies
//    and another is born in the same year, whichever lifespan came first in
//    the source sounds first, so a note-off can precede or follow a note-on
//    depending on source order. A lifespan that starts and ends in the same
//    year still has its on before its off.
// 4. Quantize. Walking the sorted events from the range minimum, each year
//    gap is multiplied by the ticks-per-year scale to get the event's delta.

use serde::Serialize;
use tracing::debug;

use crate::error::SonifyError;
use crate::lifespan::{Lifespan, YearRange};
use crate::year::Year;

/// Lowest pitch by default (C2).
pub const DEFAULT_PITCH_FLOOR: u8 = 36;
/// Highest pitch by default, kept below the shrill register.
pub const DEFAULT_PITCH_CEILING: u8 = 90;
/// Note-on velocity by default.
pub const DEFAULT_VELOCITY: u8 = 64;

const MIDI_MAX: f64 = 127.0;

/// Whether an event starts or stops a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NoteKind {
    On,
    Off,
}

/// One note boundary in calendar time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NoteEvent {
    pub kind: NoteKind,
    pub year: Year,
    pub pitch: u8,
    /// Attack velocity for `On`, 0 for `Off`.
    pub velocity: u8,
    /// Index of the lifespan this event belongs to.
    pub lifespan: usize,
}

/// A note event with its tick distance from the previous event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimedEvent {
    pub event: NoteEvent,
    pub tick_delta: u32,
}

/// Linear year → pitch mapping bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PitchMapping {
    pub floor: u8,
    pub ceiling: u8,
}

impl Default for PitchMapping {
    fn default() -> Self {
        PitchMapping {
            floor: DEFAULT_PITCH_FLOOR,
            ceiling: DEFAULT_PITCH_CEILING,
        }
    }
}

impl PitchMapping {
    /// Pitch for a lifespan starting in `start`, given the set's year range.
    pub fn pitch_for(&self, start: Year, range: YearRange) -> u8 {
        let normalized = f64::from(start.saturating_sub(range.min)) / f64::from(range.width());
        let span = f64::from(self.ceiling) - f64::from(self.floor);
        let pitch = (f64::from(self.floor) + normalized * span).round();
        pitch.clamp(0.0, MIDI_MAX) as u8
    }
}

/// Scale and voicing parameters for building a timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineParams {
    /// Ticks per calendar year. Must be positive.
    pub ticks_per_year: u32,
    pub pitch: PitchMapping,
    /// Note-on velocity.
    pub velocity: u8,
}

impl TimelineParams {
    pub fn new(ticks_per_year: u32) -> Self {
        TimelineParams {
            ticks_per_year,
            pitch: PitchMapping::default(),
            velocity: DEFAULT_VELOCITY,
        }
    }
}

/// Note-on/off pairs for each lifespan, in lifespan order (unsorted).
pub fn note_events(lifespans: &[Lifespan], range: YearRange, params: &TimelineParams) -> Vec<NoteEvent> {
    lifespans
        .iter()
        .enumerate()
        .flat_map(|(index, lifespan)| {
            let pitch = params.pitch.pitch_for(lifespan.start, range);
            [
                NoteEvent {
                    kind: NoteKind::On,
                    year: lifespan.start,
                    pitch,
                    velocity: params.velocity,
                    lifespan: index,
                },
                NoteEvent {
                    kind: NoteKind::Off,
                    year: lifespan.end,
                    pitch,
                    velocity: 0,
                    lifespan: index,
                },
            ]
        })
        .collect()
}

/// Build the ordered, tick-timed event sequence for a lifespan set.
///
/// The first event's delta is measured from `range.min`, so a set whose
/// earliest birth is the range minimum starts at tick 0.
pub fn build_timeline(
    lifespans: &[Lifespan],
    range: YearRange,
    params: &TimelineParams,
) -> Result<Vec<TimedEvent>, SonifyError> {
    if params.ticks_per_year == 0 {
        return Err(SonifyError::InvalidParameter {
            name: "ticks_per_year",
            reason: "must be positive".to_string(),
        });
    }

    let mut events = note_events(lifespans, range, params);
    // `sort_by_key` is stable; same-year events keep emission order.
    events.sort_by_key(|event| event.year);

    let mut previous_year = range.min;
    let timed = events
        .into_iter()
        .map(|event| {
            let year_gap = event.year.saturating_sub(previous_year);
            let tick_delta = u32::from(year_gap)
                .checked_mul(params.ticks_per_year)
                .ok_or(SonifyError::TickOverflow {
                    year_gap,
                    ticks_per_year: params.ticks_per_year,
                })?;
            previous_year = event.year;
            Ok(TimedEvent { event, tick_delta })
        })
        .collect::<Result<Vec<_>, SonifyError>>()?;

    debug!(
        events = timed.len(),
        total_ticks = timed.iter().map(|t| u64::from(t.tick_delta)).sum::<u64>(),
        "built timeline"
    );
    Ok(timed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(name: &str, start: Year, end: Year) -> Lifespan {
        Lifespan {
            name: name.to_string(),
            start,
            end,
        }
    }

    #[test]
    fn range_minimum_maps_to_floor() {
        let range = YearRange { min: 1900, max: 2025 };
        assert_eq!(PitchMapping::default().pitch_for(1900, range), 36);
    }

    #[test]
    fn range_maximum_maps_to_ceiling() {
        let range = YearRange { min: 1900, max: 2000 };
        assert_eq!(PitchMapping::default().pitch_for(2000, range), 90);
    }

    #[test]
    fn pitch_is_rounded() {
        // 36 + 0.16 * 54 = 44.64
        let range = YearRange { min: 1900, max: 2025 };
        assert_eq!(PitchMapping::default().pitch_for(1920, range), 45);
    }

    #[test]
    fn degenerate_range_maps_to_floor() {
        let range = YearRange { min: 1950, max: 1950 };
        assert_eq!(PitchMapping::default().pitch_for(1950, range), 36);
    }

    #[test]
    fn pitch_is_clamped_to_midi_range() {
        let mapping = PitchMapping {
            floor: 100,
            ceiling: 255,
        };
        let range = YearRange { min: 1000, max: 2000 };
        assert_eq!(mapping.pitch_for(2000, range), 127);
        assert_eq!(mapping.pitch_for(1000, range), 100);
    }

    #[test]
    fn inverted_mapping_descends() {
        let mapping = PitchMapping {
            floor: 90,
            ceiling: 36,
        };
        let range = YearRange { min: 1900, max: 2000 };
        assert_eq!(mapping.pitch_for(1900, range), 90);
        assert_eq!(mapping.pitch_for(2000, range), 36);
    }

    #[test]
    fn family_scenario_orders_and_times_events() {
        let lifespans = [span("A", 1900, 1950), span("B", 1920, 2025)];
        let range = YearRange { min: 1900, max: 2025 };
        let timed = build_timeline(&lifespans, range, &TimelineParams::new(100)).unwrap();

        let summary: Vec<_> = timed
            .iter()
            .map(|t| (t.event.kind, t.event.year, t.event.lifespan, t.tick_delta))
            .collect();
        assert_eq!(
            summary,
            vec![
                (NoteKind::On, 1900, 0, 0),
                (NoteKind::On, 1920, 1, 2000),
                (NoteKind::Off, 1950, 0, 3000),
                (NoteKind::Off, 2025, 1, 7500),
            ]
        );
        assert_eq!(timed[0].event.pitch, 36);
        assert_eq!(timed[2].event.pitch, 36);
        assert_eq!(timed[1].event.pitch, 45);
        assert_eq!(timed[3].event.pitch, 45);
        assert_eq!(timed[0].event.velocity, 64);
        assert_eq!(timed[2].event.velocity, 0);
    }

    #[test]
    fn same_year_events_keep_source_order() {
        // A dies in 1950, B is born in 1950: A came first, so A's off sounds
        // before B's on. Reversing the source reverses the pair.
        let range = YearRange { min: 1900, max: 2000 };
        let params = TimelineParams::new(10);

        let forward = build_timeline(&[span("A", 1900, 1950), span("B", 1950, 2000)], range, &params).unwrap();
        let kinds: Vec<_> = forward.iter().map(|t| (t.event.kind, t.event.lifespan)).collect();
        assert_eq!(
            kinds,
            vec![
                (NoteKind::On, 0),
                (NoteKind::Off, 0),
                (NoteKind::On, 1),
                (NoteKind::Off, 1)
            ]
        );

        let reversed = build_timeline(&[span("B", 1950, 2000), span("A", 1900, 1950)], range, &params).unwrap();
        let kinds: Vec<_> = reversed.iter().map(|t| (t.event.kind, t.event.lifespan)).collect();
        assert_eq!(
            kinds,
            vec![
                (NoteKind::On, 1),
                (NoteKind::On, 0),
                (NoteKind::Off, 1),
                (NoteKind::Off, 0)
            ]
        );
        // Zero-gap events carry zero deltas.
        assert_eq!(reversed[2].tick_delta, 0);
    }

    #[test]
    fn same_year_lifespan_keeps_on_before_off() {
        let range = YearRange { min: 1888, max: 1888 };
        let timed = build_timeline(&[span("Infant", 1888, 1888)], range, &TimelineParams::new(100)).unwrap();
        assert_eq!(timed[0].event.kind, NoteKind::On);
        assert_eq!(timed[1].event.kind, NoteKind::Off);
        assert!(timed.iter().all(|t| t.tick_delta == 0));
    }

    #[test]
    fn first_delta_is_measured_from_range_minimum() {
        // The range minimum may precede every event when the caller passes a
        // wider range than the lifespans span.
        let range = YearRange { min: 1800, max: 1900 };
        let timed = build_timeline(&[span("A", 1850, 1860)], range, &TimelineParams::new(2)).unwrap();
        assert_eq!(timed[0].tick_delta, 100);
        assert_eq!(timed[1].tick_delta, 20);
    }

    #[test]
    fn zero_ticks_per_year_is_rejected() {
        let range = YearRange { min: 1900, max: 1950 };
        let err = build_timeline(&[span("A", 1900, 1950)], range, &TimelineParams::new(0)).unwrap_err();
        assert!(matches!(err, SonifyError::InvalidParameter { name: "ticks_per_year", .. }));
    }

    #[test]
    fn overflowing_delta_is_reported() {
        let range = YearRange { min: 0, max: 9999 };
        let err = build_timeline(&[span("A", 0, 9999)], range, &TimelineParams::new(u32::MAX)).unwrap_err();
        assert!(matches!(err, SonifyError::TickOverflow { year_gap: 9999, .. }));
    }
}
