use clap::Parser;
use std::path::PathBuf;
use std::process;
use superperm2midi::{convert_file, ConversionOptions, ConvertError, RawConfig};

/// Superpermutation to MIDI converter
#[derive(Parser, Debug)]
#[command(name = "superperm2midi")]
#[command(version)]
struct Cli {
    /// The file containing the superpermutation to convert
    input: PathBuf,

    /// The file to store the MIDI output in (default: input name with .mid)
    output: Option<PathBuf>,

    /// Scale to translate the numbers into: default, major, natural-minor,
    /// harmonic-minor, whole-note, major-pentatonic, miyako-bushi
    #[arg(short, long)]
    scale: Option<String>,

    /// Method to decide note lengths: edge-weight, free-space, even
    #[arg(short = 'l', long)]
    note_length: Option<String>,

    /// General MIDI instrument number (default: 46, harp)
    #[arg(short = 'I', long, value_parser = clap::value_parser!(u8).range(0..=127))]
    instrument: Option<u8>,

    /// MIDI note number of the lowest symbol (default: 64, E4)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=127))]
    base_note: Option<u8>,

    /// Play back the MIDI output after writing it
    #[arg(short, long)]
    play: bool,

    /// MIDI output port index used for playback
    #[arg(long)]
    port: Option<usize>,

    /// YAML file with default options
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl Cli {
    fn raw_config(&self) -> RawConfig {
        RawConfig {
            scale: self.scale.clone(),
            note_length: self.note_length.clone(),
            instrument: self.instrument,
            base_note: self.base_note,
            play: self.play.then_some(true),
            port: self.port,
        }
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(path) => eprintln!("Wrote MIDI to {}", path.display()),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<PathBuf, ConvertError> {
    let file = match &cli.config {
        Some(path) => RawConfig::load(path)?,
        None => RawConfig::default(),
    };
    let options = file
        .merge(cli.raw_config())
        .apply(ConversionOptions::default())?;
    log::debug!("Options: {:?}", options);

    convert_file(&cli.input, cli.output.as_deref(), &options)
}
