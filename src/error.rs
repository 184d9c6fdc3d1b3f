//! # Error Types
//!
//! All fallible operations in the converter return [`ConvertError`]. The tool is a
//! one-shot batch transform, so every error aborts the run; there is no recovery.
//!
//! ## Usage
//! ```rust
//! use superperm2midi::{convert, ConversionOptions, ConvertError};
//!
//! match convert("01a2", &ConversionOptions::default()) {
//!     Ok(_) => println!("Success!"),
//!     Err(ConvertError::InvalidSymbol { position, character }) => {
//!         eprintln!("Bad symbol {:?} at {}", character, position);
//!     }
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    /// The input or output file could not be read or written.
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input held nothing but whitespace.
    #[error("Input contains no symbols")]
    EmptyInput,

    /// A character in the input is not a decimal digit.
    ///
    /// # Example
    /// ```
    /// # use superperm2midi::ConvertError;
    /// let err = ConvertError::InvalidSymbol { position: 3, character: 'x' };
    /// assert_eq!(err.to_string(), "Invalid symbol 'x' at position 3");
    /// ```
    #[error("Invalid symbol '{character}' at position {position}")]
    InvalidSymbol { position: usize, character: char },

    /// The pitch mapper produced a key outside the MIDI range.
    #[error("Digit {digit} maps to pitch {pitch}, outside the MIDI range 0-127")]
    PitchOutOfRange { digit: u8, pitch: u32 },

    /// Invalid configuration file or option value.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The MIDI file could not be encoded.
    #[error("MIDI encoding error: {0}")]
    Midi(String),

    /// The playback device could not be opened or written to.
    #[error("Playback error: {0}")]
    Playback(String),
}

impl ConvertError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConvertError::Io {
            path: path.into(),
            source,
        }
    }
}
