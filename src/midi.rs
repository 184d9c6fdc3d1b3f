// MIDI output for converted superpermutations.
//
// Pairs every symbol's pitch with its duration and writes a single-track
// Standard MIDI File: one program change, then a note-on/note-off pair per
// symbol, the note-off delayed by the note's tick length.
//
// Uses the `midly` crate for MIDI writing.

use crate::error::ConvertError;
use midly::{
    num::{u4, u7, u15, u28},
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
};
use std::path::{Path, PathBuf};

/// Ticks per quarter note in MIDI output.
pub const TICKS_PER_QUARTER: u16 = 480;

/// Velocity used for every note-on and note-off.
const NOTE_VELOCITY: u8 = 64;

const CHANNEL: u8 = 0;

/// File extension of generated output.
pub const OUTPUT_EXTENSION: &str = "mid";

/// One symbol of the superpermutation, ready to be emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteEvent {
    pub pitch: u8,
    pub duration_class: u8,
    pub ticks: u32,
}

/// Build an in-memory SMF from a note sequence.
pub fn build_smf(notes: &[NoteEvent], instrument: u8) -> Smf<'static> {
    let mut smf = Smf::new(Header::new(
        Format::SingleTrack,
        Timing::Metrical(u15::new(TICKS_PER_QUARTER)),
    ));

    let channel = u4::new(CHANNEL);
    let mut track: Track<'static> = Vec::with_capacity(notes.len() * 2 + 2);

    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Midi {
            channel,
            message: MidiMessage::ProgramChange {
                program: u7::new(instrument),
            },
        },
    });

    for note in notes {
        track.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Midi {
                channel,
                message: MidiMessage::NoteOn {
                    key: u7::new(note.pitch),
                    vel: u7::new(NOTE_VELOCITY),
                },
            },
        });
        track.push(TrackEvent {
            delta: u28::new(note.ticks),
            kind: TrackEventKind::Midi {
                channel,
                message: MidiMessage::NoteOff {
                    key: u7::new(note.pitch),
                    vel: u7::new(NOTE_VELOCITY),
                },
            },
        });
    }

    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });

    smf.tracks.push(track);
    smf
}

/// Serialize an SMF to bytes.
pub fn encode_smf(smf: &Smf) -> Result<Vec<u8>, ConvertError> {
    let mut buf = Vec::new();
    smf.write(&mut buf)
        .map_err(|e| ConvertError::Midi(e.to_string()))?;
    Ok(buf)
}

/// Serialize an SMF and write it to `path`.
pub fn write_smf(smf: &Smf, path: &Path) -> Result<(), ConvertError> {
    let buf = encode_smf(smf)?;
    std::fs::write(path, &buf).map_err(|e| ConvertError::io(path, e))?;
    log::info!("Wrote {} bytes of MIDI to {}", buf.len(), path.display());
    Ok(())
}

/// Output path used when none is given: the input's file name up to its first
/// `.`, with the MIDI extension, next to the input.
pub fn default_output_path(input: &Path) -> PathBuf {
    let file_name = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = file_name.split('.').next().unwrap_or_default();
    let stem = if stem.is_empty() { "output" } else { stem };
    input.with_file_name(format!("{stem}.{OUTPUT_EXTENSION}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notes() -> Vec<NoteEvent> {
        vec![
            NoteEvent {
                pitch: 64,
                duration_class: 2,
                ticks: 512,
            },
            NoteEvent {
                pitch: 66,
                duration_class: 0,
                ticks: 128,
            },
        ]
    }

    #[test]
    fn test_track_layout() {
        let smf = build_smf(&notes(), 46);
        assert_eq!(smf.tracks.len(), 1);

        let track = &smf.tracks[0];
        // program change + 2 pairs + end of track
        assert_eq!(track.len(), 6);

        match track[0].kind {
            TrackEventKind::Midi {
                message: MidiMessage::ProgramChange { program },
                ..
            } => assert_eq!(program.as_int(), 46),
            other => panic!("expected program change, got {:?}", other),
        }

        match (track[1].kind, track[2].kind) {
            (
                TrackEventKind::Midi {
                    message: MidiMessage::NoteOn { key: on, .. },
                    ..
                },
                TrackEventKind::Midi {
                    message: MidiMessage::NoteOff { key: off, .. },
                    ..
                },
            ) => {
                assert_eq!(on.as_int(), 64);
                assert_eq!(off.as_int(), 64);
            }
            other => panic!("expected note pair, got {:?}", other),
        }
        assert_eq!(track[1].delta.as_int(), 0);
        assert_eq!(track[2].delta.as_int(), 512);
        assert_eq!(track[4].delta.as_int(), 128);
        assert_eq!(track[5].kind, TrackEventKind::Meta(MetaMessage::EndOfTrack));
    }

    #[test]
    fn test_encode_parses_back() {
        let smf = build_smf(&notes(), 0);
        let bytes = encode_smf(&smf).unwrap();
        assert_eq!(&bytes[..4], b"MThd");

        let parsed = Smf::parse(&bytes).unwrap();
        assert_eq!(parsed.header.format, Format::SingleTrack);
        assert_eq!(
            parsed.header.timing,
            Timing::Metrical(u15::new(TICKS_PER_QUARTER))
        );
        assert_eq!(parsed.tracks[0].len(), 6);
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("perms/seven.txt")),
            PathBuf::from("perms/seven.mid")
        );
        assert_eq!(
            default_output_path(Path::new("n5.superperm.txt")),
            PathBuf::from("n5.mid")
        );
        assert_eq!(
            default_output_path(Path::new("plain")),
            PathBuf::from("plain.mid")
        );
    }
}
