// MIDI output from timed note events.
//
// Serializes an already ordered, already delta-timed event list into a
// Standard MIDI File. The writer never reorders or re-times events: each
// `TimedEvent` becomes exactly one channel message with the same delta.
//
// Uses the `midly` crate for MIDI writing. Output is SMF Format 0 (one
// track): tempo meta, program change, the note events, end of track.

use midly::{
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
    num::{u4, u7, u15, u24, u28},
};

use crate::error::WriteError;
use crate::timeline::{NoteKind, TimedEvent};

/// Ticks per quarter note in MIDI output.
pub const DEFAULT_TICKS_PER_QUARTER: u16 = 480;

/// General MIDI program 9 (zero-based 8): Celesta.
pub const DEFAULT_PROGRAM: u8 = 8;

/// Largest delta a variable-length quantity can hold.
const MAX_DELTA: u32 = (1 << 28) - 1;

/// Largest microseconds-per-quarter value a tempo meta event can hold.
const MAX_TEMPO_MICROS: u32 = (1 << 24) - 1;

const MAX_TICKS_PER_QUARTER: u16 = 0x7FFF;

const MAX_CHANNEL: u8 = 15;
const MAX_DATA: u8 = 127;

/// Wrap a 7-bit data byte, rejecting values `u7::new` would mask.
fn data_byte(what: &'static str, value: u8) -> Result<u7, WriteError> {
    if value > MAX_DATA {
        return Err(WriteError::DataOutOfRange { what, value });
    }
    Ok(u7::new(value))
}

/// Convert beats per minute to microseconds per quarter note, rounded to
/// the nearest microsecond.
pub fn bpm_to_microseconds(bpm: u32) -> Result<u32, WriteError> {
    if bpm == 0 {
        return Err(WriteError::TempoOutOfRange { bpm });
    }
    let micros = (60_000_000 + bpm / 2) / bpm;
    if micros > MAX_TEMPO_MICROS {
        return Err(WriteError::TempoOutOfRange { bpm });
    }
    Ok(micros)
}

/// Something that turns timed note events into a byte stream.
pub trait TimelineWriter {
    /// Serialize `events` in the given order with the given deltas.
    /// `program` is the instrument selector for the single voice.
    fn write_timeline(
        &self,
        events: &[TimedEvent],
        tempo_bpm: u32,
        program: u8,
    ) -> Result<Vec<u8>, WriteError>;
}

/// Standard MIDI File writer backed by `midly`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmfWriter {
    pub ticks_per_quarter: u16,
    /// MIDI channel (0..=15) for every message.
    pub channel: u8,
}

impl Default for SmfWriter {
    fn default() -> Self {
        SmfWriter {
            ticks_per_quarter: DEFAULT_TICKS_PER_QUARTER,
            channel: 0,
        }
    }
}

impl SmfWriter {
    /// Build the in-memory SMF for a timeline.
    fn build_smf(&self, events: &[TimedEvent], tempo_bpm: u32, program: u8) -> Result<Smf<'static>, WriteError> {
        if self.ticks_per_quarter == 0 || self.ticks_per_quarter > MAX_TICKS_PER_QUARTER {
            return Err(WriteError::TicksPerQuarter(self.ticks_per_quarter));
        }
        if self.channel > MAX_CHANNEL {
            return Err(WriteError::ChannelOutOfRange(self.channel));
        }
        let tempo_microseconds = bpm_to_microseconds(tempo_bpm)?;
        let channel = u4::new(self.channel);
        let program = data_byte("program", program)?;

        let mut smf = Smf::new(Header::new(
            Format::SingleTrack,
            Timing::Metrical(u15::new(self.ticks_per_quarter)),
        ));

        let mut track: Track<'static> = Vec::with_capacity(events.len() + 3);
        track.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::new(tempo_microseconds))),
        });
        track.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Midi {
                channel,
                message: MidiMessage::ProgramChange { program },
            },
        });

        for (index, timed) in events.iter().enumerate() {
            if timed.tick_delta > MAX_DELTA {
                return Err(WriteError::DeltaOutOfRange {
                    index,
                    tick_delta: timed.tick_delta,
                    max: MAX_DELTA,
                });
            }
            let key = data_byte("key", timed.event.pitch)?;
            let vel = data_byte("velocity", timed.event.velocity)?;
            let message = match timed.event.kind {
                NoteKind::On => MidiMessage::NoteOn { key, vel },
                NoteKind::Off => MidiMessage::NoteOff { key, vel },
            };
            track.push(TrackEvent {
                delta: u28::new(timed.tick_delta),
                kind: TrackEventKind::Midi { channel, message },
            });
        }

        track.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
        });
        smf.tracks.push(track);

        Ok(smf)
    }
}

impl TimelineWriter for SmfWriter {
    fn write_timeline(
        &self,
        events: &[TimedEvent],
        tempo_bpm: u32,
        program: u8,
    ) -> Result<Vec<u8>, WriteError> {
        let smf = self.build_smf(events, tempo_bpm, program)?;
        let mut buf = Vec::new();
        smf.write_std(&mut buf)?;
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::NoteEvent;

    fn timed(kind: NoteKind, year: u16, pitch: u8, tick_delta: u32) -> TimedEvent {
        TimedEvent {
            event: NoteEvent {
                kind,
                year,
                pitch,
                velocity: if kind == NoteKind::On { 64 } else { 0 },
                lifespan: 0,
            },
            tick_delta,
        }
    }

    #[test]
    fn tempo_conversion_rounds() {
        assert_eq!(bpm_to_microseconds(120).unwrap(), 500_000);
        assert_eq!(bpm_to_microseconds(60).unwrap(), 1_000_000);
        // 60_000_000 / 70 = 857_142.857...
        assert_eq!(bpm_to_microseconds(70).unwrap(), 857_143);
    }

    #[test]
    fn tempo_out_of_range_is_rejected() {
        assert!(matches!(bpm_to_microseconds(0), Err(WriteError::TempoOutOfRange { bpm: 0 })));
        assert!(matches!(bpm_to_microseconds(3), Err(WriteError::TempoOutOfRange { bpm: 3 })));
        assert!(bpm_to_microseconds(4).is_ok());
    }

    #[test]
    fn writes_single_track_with_tempo_program_and_notes() {
        let events = [
            timed(NoteKind::On, 1900, 36, 0),
            timed(NoteKind::Off, 1950, 36, 5000),
        ];
        let bytes = SmfWriter::default().write_timeline(&events, 120, 8).unwrap();
        let smf = Smf::parse(&bytes).unwrap();

        assert_eq!(smf.header.format, Format::SingleTrack);
        assert_eq!(smf.header.timing, Timing::Metrical(u15::new(480)));
        assert_eq!(smf.tracks.len(), 1);

        let track = &smf.tracks[0];
        assert_eq!(track.len(), 5);
        assert_eq!(
            track[0].kind,
            TrackEventKind::Meta(MetaMessage::Tempo(u24::new(500_000)))
        );
        assert_eq!(
            track[1].kind,
            TrackEventKind::Midi {
                channel: u4::new(0),
                message: MidiMessage::ProgramChange { program: u7::new(8) },
            }
        );
        assert_eq!(track[3].delta, u28::new(5000));
        assert!(matches!(
            track[3].kind,
            TrackEventKind::Midi {
                message: MidiMessage::NoteOff { .. },
                ..
            }
        ));
        assert_eq!(track[4].kind, TrackEventKind::Meta(MetaMessage::EndOfTrack));
    }

    #[test]
    fn respects_channel_and_resolution() {
        let writer = SmfWriter {
            ticks_per_quarter: 96,
            channel: 3,
        };
        let bytes = writer
            .write_timeline(&[timed(NoteKind::On, 1900, 60, 0)], 90, 0)
            .unwrap();
        let smf = Smf::parse(&bytes).unwrap();
        assert_eq!(smf.header.timing, Timing::Metrical(u15::new(96)));
        assert!(matches!(
            smf.tracks[0][2].kind,
            TrackEventKind::Midi { channel, message: MidiMessage::NoteOn { .. } } if channel == u4::new(3)
        ));
    }

    #[test]
    fn oversized_delta_is_rejected() {
        let events = [timed(NoteKind::On, 1900, 36, MAX_DELTA + 1)];
        let err = SmfWriter::default().write_timeline(&events, 120, 8).unwrap_err();
        assert!(matches!(err, WriteError::DeltaOutOfRange { index: 0, .. }));
    }

    #[test]
    fn out_of_range_channel_is_rejected() {
        let writer = SmfWriter {
            ticks_per_quarter: 480,
            channel: 16,
        };
        let err = writer
            .write_timeline(&[timed(NoteKind::On, 1900, 60, 0)], 120, 8)
            .unwrap_err();
        assert!(matches!(err, WriteError::ChannelOutOfRange(16)));
    }

    #[test]
    fn out_of_range_program_is_rejected() {
        let err = SmfWriter::default()
            .write_timeline(&[timed(NoteKind::On, 1900, 60, 0)], 120, 200)
            .unwrap_err();
        assert!(matches!(
            err,
            WriteError::DataOutOfRange { what: "program", value: 200 }
        ));
    }

    #[test]
    fn out_of_range_velocity_is_rejected() {
        let mut loud = timed(NoteKind::On, 1900, 60, 0);
        loud.event.velocity = 200;
        let err = SmfWriter::default().write_timeline(&[loud], 120, 8).unwrap_err();
        assert!(matches!(
            err,
            WriteError::DataOutOfRange { what: "velocity", value: 200 }
        ));
    }

    #[test]
    fn out_of_range_key_is_rejected() {
        let err = SmfWriter::default()
            .write_timeline(&[timed(NoteKind::On, 1900, 128, 0)], 120, 8)
            .unwrap_err();
        assert!(matches!(err, WriteError::DataOutOfRange { what: "key", value: 128 }));
    }

    #[test]
    fn invalid_resolution_is_rejected() {
        let writer = SmfWriter {
            ticks_per_quarter: 0,
            channel: 0,
        };
        assert!(matches!(
            writer.write_timeline(&[], 120, 8),
            Err(WriteError::TicksPerQuarter(0))
        ));
    }
}
