pub mod config;
pub mod duration;
pub mod error;
pub mod midi;
pub mod playback;
pub mod scale;
pub mod sequence;

pub use config::{ConversionOptions, RawConfig};
pub use duration::{assign_durations, ticks_for_class, DurationAssignment, DurationPolicy};
pub use error::ConvertError;
pub use midi::{build_smf, default_output_path, NoteEvent};
pub use scale::{PitchMapper, Scale, ScaleSelection};
pub use sequence::SymbolSequence;

use midly::Smf;
use playback::{MidiPortSink, Player};
use std::path::{Path, PathBuf};

/// Result of converting one superpermutation.
#[derive(Debug)]
pub struct Conversion {
    pub sequence: SymbolSequence,
    pub scale: Scale,
    pub durations: DurationAssignment,
    pub notes: Vec<NoteEvent>,
    pub smf: Smf<'static>,
}

/// Convert a superpermutation to an in-memory MIDI file.
/// This is the main entry point for the library.
pub fn convert(source: &str, options: &ConversionOptions) -> Result<Conversion, ConvertError> {
    let sequence = SymbolSequence::parse(source)?;
    let n = sequence.alphabet_size();

    let durations = assign_durations(&sequence, options.policy);
    let scale = options.scale.resolve(n);
    let mapper = PitchMapper::new(scale, options.base_pitch);

    log::info!(
        "Converting {} symbols (N={}) with {} note lengths in {}",
        sequence.len(),
        n,
        options.policy.name(),
        scale.name()
    );

    let notes = sequence
        .symbols()
        .iter()
        .zip(durations.classes())
        .map(|(&digit, &duration_class)| -> Result<NoteEvent, ConvertError> {
            Ok(NoteEvent {
                pitch: mapper.pitch(digit)?,
                duration_class,
                ticks: ticks_for_class(duration_class, n),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let smf = build_smf(&notes, options.instrument);

    Ok(Conversion {
        sequence,
        scale,
        durations,
        notes,
        smf,
    })
}

/// Convert a superpermutation file and write the MIDI result.
///
/// Writes to `output`, or next to the input when `None`, and plays the result
/// if `options.play` is set. Returns the path written.
pub fn convert_file(
    input: &Path,
    output: Option<&Path>,
    options: &ConversionOptions,
) -> Result<PathBuf, ConvertError> {
    let source = std::fs::read_to_string(input).map_err(|e| ConvertError::io(input, e))?;
    let conversion = convert(&source, options)?;

    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output_path(input));
    midi::write_smf(&conversion.smf, &output)?;

    if options.play {
        let mut sink = MidiPortSink::open(options.port)?;
        Player::default().play(&conversion.smf.tracks[0], &mut sink)?;
        sink.close();
    }

    Ok(output)
}
