// Kinsong CLI entry point.
//
// Reads a GEDCOM family tree and writes it as a MIDI file where every
// person is one note, from birth to death. The pipeline: GEDCOM → lifespans
// → ordered note events → MIDI bytes.
//
// Usage:
//   kinsong <INPUT.ged> [-o OUTPUT.mid] [--tempo BPM] [--ticks-per-year N]
//     [--present-year YEAR] [--config FILE] [--events-json FILE] [-v|-q]
//
// Command-line values override values from the config file, which override
// the built-in defaults. The events JSON, when requested, is written before
// the MIDI file, so a failed export leaves no MIDI output behind.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use kinsong_music::logging::{LogConfig, LogFormat, init_logging};
use kinsong_music::{GedcomFile, Rendering, SonifyConfig, SonifyError, generate_timeline_with};

#[derive(Parser, Debug)]
#[command(
    name = "kinsong",
    version,
    about = "Turn a GEDCOM family tree into a MIDI timeline",
    long_about = "Turn a GEDCOM family tree into a MIDI timeline.\n\n\
                  Each birth starts a note and each death ends it. Pitch rises \
                  the later in the family history a person was born."
)]
struct Cli {
    /// GEDCOM file to read.
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Where to write the MIDI file.
    #[arg(short, long, value_name = "PATH", default_value = "family_tree.mid")]
    output: PathBuf,

    /// Tempo in beats per minute.
    #[arg(long, value_name = "BPM", value_parser = clap::value_parser!(u32).range(60..=240))]
    tempo: Option<u32>,

    /// Length of one calendar year in ticks. Small values rush through
    /// history; large values linger.
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(10..=500))]
    ticks_per_year: Option<u32>,

    /// Year assumed for people without a recorded death.
    #[arg(long, value_name = "YEAR")]
    present_year: Option<u16>,

    /// JSON config file with pitch, instrument, and timing settings.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Also write the timed note events as JSON.
    #[arg(long, value_name = "FILE")]
    events_json: Option<PathBuf>,

    /// More log output (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Less log output.
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "verbose")]
    quiet: u8,

    /// Log output format.
    #[arg(long, value_enum, default_value = "compact")]
    log_format: LogFormat,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_config = LogConfig {
        format: cli.log_format,
        with_ansi: std::io::stderr().is_terminal(),
        ..LogConfig::from_verbosity(cli.verbose, cli.quiet)
    };
    if let Err(e) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run(&cli) {
        Ok(rendering) => {
            println!("Done! {}", rendering.summary);
            if rendering.skipped.total() > 0 {
                println!(
                    "Skipped {} without a birth year and {} dying before birth.",
                    rendering.skipped.missing_birth, rendering.skipped.inverted
                );
            }
            println!("Wrote {} bytes to {}", rendering.bytes.len(), cli.output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<Rendering, SonifyError> {
    let mut config = match &cli.config {
        Some(path) => SonifyConfig::load(path)?,
        None => SonifyConfig::default(),
    };
    if let Some(tempo) = cli.tempo {
        config.tempo_bpm = tempo;
    }
    if let Some(ticks) = cli.ticks_per_year {
        config.ticks_per_year = ticks;
    }
    if let Some(year) = cli.present_year {
        config.present_year = year;
    }

    let source = GedcomFile::new(&cli.input);
    let rendering = generate_timeline_with(&source, &config, &config.writer())?;

    if let Some(path) = &cli.events_json {
        rendering.save_events_json(path)?;
    }
    rendering.save(&cli.output)?;
    Ok(rendering)
}
