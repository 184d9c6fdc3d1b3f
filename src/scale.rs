//! Scale tables and digit-to-pitch mapping.
//!
//! A digit is split into an octave and a scale degree by the size of the scale;
//! the degree's semitone offset plus twelve semitones per octave is added to a
//! base pitch (E4 by default).

use crate::error::ConvertError;

/// MIDI key the digit 0 maps to unless configured otherwise (E4).
pub const DEFAULT_BASE_PITCH: u8 = 64;

const MAX_MIDI_KEY: u32 = 127;

/// The closed set of scales a superpermutation can be played in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    Major,
    NaturalMinor,
    HarmonicMinor,
    WholeNote,
    MajorPentatonic,
    MiyakoBushi,
}

impl Scale {
    pub const ALL: [Scale; 6] = [
        Scale::Major,
        Scale::NaturalMinor,
        Scale::HarmonicMinor,
        Scale::WholeNote,
        Scale::MajorPentatonic,
        Scale::MiyakoBushi,
    ];

    /// Semitone offset of each degree above the scale root.
    pub fn degrees(self) -> &'static [u8] {
        match self {
            Scale::Major => &[0, 2, 4, 5, 7, 9, 11],
            Scale::NaturalMinor => &[0, 2, 3, 5, 7, 8, 10],
            Scale::HarmonicMinor => &[0, 2, 3, 5, 7, 8, 11],
            Scale::WholeNote => &[0, 2, 4, 6, 8, 10, 12],
            Scale::MajorPentatonic => &[0, 2, 4, 7, 9],
            Scale::MiyakoBushi => &[0, 1, 5, 7, 8],
        }
    }

    pub fn size(self) -> usize {
        self.degrees().len()
    }

    pub fn name(self) -> &'static str {
        match self {
            Scale::Major => "major",
            Scale::NaturalMinor => "natural-minor",
            Scale::HarmonicMinor => "harmonic-minor",
            Scale::WholeNote => "whole-note",
            Scale::MajorPentatonic => "major-pentatonic",
            Scale::MiyakoBushi => "miyako-bushi",
        }
    }

    pub fn from_name(name: &str) -> Option<Scale> {
        Scale::ALL.into_iter().find(|scale| scale.name() == name)
    }
}

/// Scale choice as given by the user, before the alphabet size is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScaleSelection {
    /// Pick a scale that fits the alphabet size.
    #[default]
    Default,
    Named(Scale),
}

impl ScaleSelection {
    /// Parse a scale name. Unknown names fall back to the major scale.
    ///
    /// ```
    /// use superperm2midi::{Scale, ScaleSelection};
    ///
    /// assert_eq!(ScaleSelection::from_name("default"), ScaleSelection::Default);
    /// assert_eq!(
    ///     ScaleSelection::from_name("unknownscale"),
    ///     ScaleSelection::Named(Scale::Major)
    /// );
    /// ```
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        if name == "default" {
            return ScaleSelection::Default;
        }
        match Scale::from_name(name) {
            Some(scale) => ScaleSelection::Named(scale),
            None => {
                log::warn!("Unknown scale '{}', using major", name);
                ScaleSelection::Named(Scale::Major)
            }
        }
    }

    /// Resolve to a concrete scale for an alphabet of `alphabet_size` symbols.
    pub fn resolve(self, alphabet_size: usize) -> Scale {
        match self {
            ScaleSelection::Named(scale) => scale,
            ScaleSelection::Default => match alphabet_size {
                7 => Scale::Major,
                6 => Scale::WholeNote,
                5 => Scale::MajorPentatonic,
                _ => Scale::Major,
            },
        }
    }
}

/// Maps zero-based digits to MIDI keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PitchMapper {
    scale: Scale,
    base_pitch: u8,
}

impl PitchMapper {
    pub fn new(scale: Scale, base_pitch: u8) -> Self {
        Self { scale, base_pitch }
    }

    pub fn scale(&self) -> Scale {
        self.scale
    }

    /// Split a digit into `(octave, degree)` within the scale.
    pub fn degree_of(&self, digit: u8) -> (u32, usize) {
        let size = self.scale.size();
        (digit as u32 / size as u32, digit as usize % size)
    }

    /// MIDI key for a digit.
    ///
    /// ```
    /// use superperm2midi::{PitchMapper, Scale};
    ///
    /// let mapper = PitchMapper::new(Scale::MajorPentatonic, 64);
    /// assert_eq!(mapper.pitch(0).unwrap(), 64);
    /// assert_eq!(mapper.pitch(6).unwrap(), 64 + 12 + 2);
    /// ```
    pub fn pitch(&self, digit: u8) -> Result<u8, ConvertError> {
        let (octave, degree) = self.degree_of(digit);
        let pitch =
            self.base_pitch as u32 + octave * 12 + self.scale.degrees()[degree] as u32;
        if pitch > MAX_MIDI_KEY {
            return Err(ConvertError::PitchOutOfRange { digit, pitch });
        }
        Ok(pitch as u8)
    }
}

impl Default for PitchMapper {
    fn default() -> Self {
        Self::new(Scale::Major, DEFAULT_BASE_PITCH)
    }
}
