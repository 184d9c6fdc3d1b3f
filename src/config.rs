//! Conversion options.
//!
//! Options come from three layers: built-in defaults, an optional YAML file, and
//! command line flags. Later layers override earlier ones field by field.
//!
//! ```yaml
//! scale: miyako-bushi
//! note-length: free-space
//! instrument: 0
//! base-note: 60
//! play: false
//! ```

use crate::duration::DurationPolicy;
use crate::error::ConvertError;
use crate::scale::{ScaleSelection, DEFAULT_BASE_PITCH};
use serde::Deserialize;
use std::path::Path;

/// General MIDI program used when none is given (orchestral harp).
pub const DEFAULT_INSTRUMENT: u8 = 46;

const MAX_MIDI_VALUE: u8 = 127;

/// Everything the pipeline needs besides the input itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionOptions {
    pub scale: ScaleSelection,
    pub policy: DurationPolicy,
    /// General MIDI program number, 0-127.
    pub instrument: u8,
    /// MIDI key of digit 0.
    pub base_pitch: u8,
    /// Stream the result to a MIDI output once written.
    pub play: bool,
    /// Output port index for playback; the first port when unset.
    pub port: Option<usize>,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            scale: ScaleSelection::Default,
            policy: DurationPolicy::EdgeWeight,
            instrument: DEFAULT_INSTRUMENT,
            base_pitch: DEFAULT_BASE_PITCH,
            play: false,
            port: None,
        }
    }
}

/// Raw options for YAML deserialization. Every field is optional so a file or
/// a set of flags can override any subset.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RawConfig {
    pub scale: Option<String>,
    pub note_length: Option<String>,
    pub instrument: Option<u8>,
    pub base_note: Option<u8>,
    pub play: Option<bool>,
    pub port: Option<usize>,
}

impl RawConfig {
    pub fn from_yaml(content: &str) -> Result<Self, ConvertError> {
        // An empty document deserializes to unit, not a map
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| ConvertError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, ConvertError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConvertError::io(path, e))?;
        log::debug!("Loaded configuration from {}", path.display());
        Self::from_yaml(&content)
    }

    /// Fields set in `other` replace fields set in `self`.
    pub fn merge(self, other: RawConfig) -> RawConfig {
        RawConfig {
            scale: other.scale.or(self.scale),
            note_length: other.note_length.or(self.note_length),
            instrument: other.instrument.or(self.instrument),
            base_note: other.base_note.or(self.base_note),
            play: other.play.or(self.play),
            port: other.port.or(self.port),
        }
    }

    /// Apply these values on top of `base`.
    pub fn apply(&self, base: ConversionOptions) -> Result<ConversionOptions, ConvertError> {
        let instrument = match self.instrument {
            Some(program) if program > MAX_MIDI_VALUE => {
                return Err(ConvertError::Config(format!(
                    "instrument must be between 0 and 127, got {}",
                    program
                )));
            }
            Some(program) => program,
            None => base.instrument,
        };

        let base_pitch = match self.base_note {
            Some(note) if note > MAX_MIDI_VALUE => {
                return Err(ConvertError::Config(format!(
                    "base-note must be between 0 and 127, got {}",
                    note
                )));
            }
            Some(note) => note,
            None => base.base_pitch,
        };

        Ok(ConversionOptions {
            scale: self
                .scale
                .as_deref()
                .map(ScaleSelection::from_name)
                .unwrap_or(base.scale),
            policy: self
                .note_length
                .as_deref()
                .map(DurationPolicy::from_name)
                .unwrap_or(base.policy),
            instrument,
            base_pitch,
            play: self.play.unwrap_or(base.play),
            port: self.port.or(base.port),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::Scale;

    #[test]
    fn test_defaults() {
        let options = ConversionOptions::default();
        assert_eq!(options.scale, ScaleSelection::Default);
        assert_eq!(options.policy, DurationPolicy::EdgeWeight);
        assert_eq!(options.instrument, 46);
        assert_eq!(options.base_pitch, 64);
        assert!(!options.play);
    }

    #[test]
    fn test_yaml_config() {
        let raw = RawConfig::from_yaml(
            "scale: harmonic-minor\nnote-length: free-space\ninstrument: 0\nplay: true\n",
        )
        .unwrap();
        let options = raw.apply(ConversionOptions::default()).unwrap();
        assert_eq!(options.scale, ScaleSelection::Named(Scale::HarmonicMinor));
        assert_eq!(options.policy, DurationPolicy::FreeSpace);
        assert_eq!(options.instrument, 0);
        assert!(options.play);
        assert_eq!(options.base_pitch, 64);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let raw = RawConfig::from_yaml("  \n").unwrap();
        assert_eq!(raw, RawConfig::default());
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(matches!(
            RawConfig::from_yaml("instrument: [1, 2]"),
            Err(ConvertError::Config(_))
        ));
        assert!(matches!(
            RawConfig::from_yaml("tempo: 120"),
            Err(ConvertError::Config(_))
        ));
    }

    #[test]
    fn test_instrument_out_of_range() {
        let raw = RawConfig {
            instrument: Some(128),
            ..Default::default()
        };
        assert!(matches!(
            raw.apply(ConversionOptions::default()),
            Err(ConvertError::Config(_))
        ));
    }

    #[test]
    fn test_merge_prefers_later_layer() {
        let file = RawConfig {
            scale: Some("major".to_string()),
            instrument: Some(10),
            ..Default::default()
        };
        let flags = RawConfig {
            instrument: Some(20),
            ..Default::default()
        };
        let merged = file.merge(flags);
        assert_eq!(merged.scale.as_deref(), Some("major"));
        assert_eq!(merged.instrument, Some(20));
    }

    #[test]
    fn test_unknown_names_fall_back() {
        let raw = RawConfig {
            scale: Some("unknownscale".to_string()),
            note_length: Some("legato".to_string()),
            ..Default::default()
        };
        let options = raw.apply(ConversionOptions::default()).unwrap();
        assert_eq!(options.scale, ScaleSelection::Named(Scale::Major));
        assert_eq!(options.policy, DurationPolicy::Even);
    }
}
