//! # Playback
//!
//! Streams a generated track to a live MIDI output in real time, pacing each
//! event by its delta-time. Meta events are timed but not sent.
//!
//! The output device sits behind [`PlaybackSink`], so the pacing logic can be
//! driven against a recording sink and a fake clock.

use crate::error::ConvertError;
use crate::midi::TICKS_PER_QUARTER;
use midir::{MidiOutput, MidiOutputConnection};
use midly::{live::LiveEvent, num::u4, num::u7, MidiMessage, Track};
use std::time::Duration;

/// Client name announced to the MIDI system.
const CLIENT_NAME: &str = "superperm2midi";

/// Default tempo: 500 000 microseconds per quarter note (120 BPM).
pub const DEFAULT_TEMPO_MICROS: u32 = 500_000;

/// Controller number of "all notes off".
const ALL_NOTES_OFF: u8 = 123;

/// Anything that accepts raw MIDI messages.
pub trait PlaybackSink {
    fn send(&mut self, bytes: &[u8]) -> Result<(), ConvertError>;
}

/// A connection to a system MIDI output port.
pub struct MidiPortSink {
    connection: MidiOutputConnection,
}

impl MidiPortSink {
    /// Connect to the output port at `index`, or the first port when `None`.
    pub fn open(index: Option<usize>) -> Result<Self, ConvertError> {
        let midi_out = MidiOutput::new(CLIENT_NAME)
            .map_err(|e| ConvertError::Playback(format!("Failed to create MIDI output: {}", e)))?;

        let ports = midi_out.ports();
        if ports.is_empty() {
            return Err(ConvertError::Playback(
                "No MIDI output ports available".to_string(),
            ));
        }

        let index = index.unwrap_or(0);
        let port = ports.get(index).ok_or_else(|| {
            ConvertError::Playback(format!(
                "Invalid port index {} (have {})",
                index,
                ports.len()
            ))
        })?;

        let port_name = midi_out
            .port_name(port)
            .unwrap_or_else(|_| format!("MIDI Out {}", index));
        log::info!("Connecting to MIDI output: {}", port_name);

        let connection = midi_out
            .connect(port, "superperm2midi-playback")
            .map_err(|e| ConvertError::Playback(format!("Failed to connect: {}", e)))?;

        Ok(Self { connection })
    }

    pub fn close(self) {
        self.connection.close();
    }
}

impl PlaybackSink for MidiPortSink {
    fn send(&mut self, bytes: &[u8]) -> Result<(), ConvertError> {
        self.connection
            .send(bytes)
            .map_err(|e| ConvertError::Playback(e.to_string()))
    }
}

/// Converts ticks to wall time and drives a sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Player {
    pub ticks_per_quarter: u16,
    pub tempo_micros: u32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            ticks_per_quarter: TICKS_PER_QUARTER,
            tempo_micros: DEFAULT_TEMPO_MICROS,
        }
    }
}

impl Player {
    /// Wall time spanned by `ticks`.
    pub fn tick_duration(&self, ticks: u32) -> Duration {
        let micros = ticks as u64 * self.tempo_micros as u64 / self.ticks_per_quarter as u64;
        Duration::from_micros(micros)
    }

    /// Play a track in real time. Blocks until the last event has been sent.
    pub fn play<S: PlaybackSink>(&self, track: &Track, sink: &mut S) -> Result<(), ConvertError> {
        self.play_with_clock(track, sink, std::thread::sleep)
    }

    /// Play a track, calling `wait` for each delta instead of sleeping.
    pub fn play_with_clock<S, W>(
        &self,
        track: &Track,
        sink: &mut S,
        mut wait: W,
    ) -> Result<(), ConvertError>
    where
        S: PlaybackSink,
        W: FnMut(Duration),
    {
        let mut buf = Vec::with_capacity(3);
        let mut sent = 0usize;

        for event in track {
            let delta = event.delta.as_int();
            if delta > 0 {
                wait(self.tick_duration(delta));
            }

            if let Some(live) = event.kind.as_live_event() {
                buf.clear();
                live.write_std(&mut buf)
                    .map_err(|e| ConvertError::Playback(e.to_string()))?;
                sink.send(&buf)?;
                sent += 1;
            }
        }

        silence(sink)?;
        log::debug!("Played {} MIDI events", sent);
        Ok(())
    }
}

fn silence<S: PlaybackSink>(sink: &mut S) -> Result<(), ConvertError> {
    let event = LiveEvent::Midi {
        channel: u4::new(0),
        message: MidiMessage::Controller {
            controller: u7::new(ALL_NOTES_OFF),
            value: u7::new(0),
        },
    };
    let mut buf = Vec::with_capacity(3);
    event
        .write_std(&mut buf)
        .map_err(|e| ConvertError::Playback(e.to_string()))?;
    sink.send(&buf)
}
