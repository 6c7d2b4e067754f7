//! The p8pretty Command-Line Interface.
//!
//! Parses arguments, installs the stderr logger, runs the pipeline, and turns
//! its outcome into output and an exit status.

use std::{
    io::{self, Write},
    path::PathBuf,
    process,
};

use clap::Parser;
use difference::{Changeset, Difference};
use log::{Level, LevelFilter, Log, Metadata, Record};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::{
    bridge::ExternalConverter,
    cart::OutputMode,
    errors::{print_error, P8Error},
    pipeline::{Options, Pipeline, RunOutcome},
};

// ============================================================================
// CLI ARGUMENTS - Command-line argument definitions
// ============================================================================

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "p8pretty",
    version,
    about = "A canonical pretty-printer for PICO-8 cartridge Lua code."
)]
pub struct P8PrettyArgs {
    /// The cart (.p8, .p8.png) or Lua file to format.
    pub input: PathBuf,

    /// Where to write the result. Derived from INPUT when omitted.
    pub output: Option<PathBuf>,

    /// Write only the formatted code, not a whole cart.
    #[arg(long)]
    pub lua_only: bool,

    /// Print the result to standard output instead of writing a file.
    #[arg(long, conflicts_with = "output")]
    pub stdout: bool,

    /// Show a diff against the input and exit 1 if formatting would change it.
    #[arg(long, conflicts_with_all = ["output", "stdout"])]
    pub check: bool,

    /// Print the syntax tree as JSON instead of formatting.
    #[arg(long, conflicts_with_all = ["output", "stdout", "check"])]
    pub ast: bool,

    /// Path to the png_to_p8 converter used for .p8.png carts.
    #[arg(long = "png-to-p8", value_name = "PATH", env = "P8PRETTY_PNG_TO_P8")]
    pub png_to_p8: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl P8PrettyArgs {
    pub fn options(&self) -> Options {
        Options {
            input: self.input.clone(),
            output: self.output.clone(),
            lua_only: self.lua_only,
            to_stdout: self.stdout,
            check: self.check,
            ast: self.ast,
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        }
    }
}

// ============================================================================
// MAIN ENTRY POINT
// ============================================================================

/// The main entry point for the CLI.
pub fn run() {
    let args = P8PrettyArgs::parse();
    init_logging(args.log_level());

    let pipeline = Pipeline::new(ExternalConverter::locate(args.png_to_p8.as_deref()));
    let clean = pipeline
        .run(&args.options())
        .and_then(|outcome| report(&outcome))
        .unwrap_or_else(|e| {
            print_error(e);
            process::exit(1);
        });

    if !clean {
        process::exit(1);
    }
}

/// Print the outcome. Returns false when `--check` found differences.
fn report(outcome: &RunOutcome) -> Result<bool, P8Error> {
    match outcome {
        RunOutcome::Written { path, mode } => {
            let what = match mode {
                OutputMode::FullCart => ".p8 cart",
                OutputMode::CodeOnly => "Lua code",
            };
            println!("Pretty printed {what} written to: {}", path.display());
            Ok(true)
        }
        RunOutcome::Printed(text) => {
            write_printed(&mut io::stdout().lock(), text)?;
            Ok(true)
        }
        RunOutcome::Checked {
            path,
            original,
            formatted,
        } => {
            if outcome.is_clean() {
                println!("{} is already formatted", path.display());
                return Ok(true);
            }
            let mut stdout = StandardStream::stdout(ColorChoice::Auto);
            let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true));
            println!("--- {} ---", path.display());
            let _ = stdout.reset();
            let changeset = Changeset::new(original, formatted, "\n");
            print_diff(&mut stdout, &changeset.diffs);
            let _ = stdout.reset();
            Ok(false)
        }
    }
}

/// Write `--stdout`/`--ast` text. A failed write is an Output error.
fn write_printed(out: &mut impl Write, text: &str) -> Result<(), P8Error> {
    out.write_all(text.as_bytes())
        .and_then(|()| out.flush())
        .map_err(|source| P8Error::Output {
            path: PathBuf::from("<stdout>"),
            source,
        })
}

fn print_diff(stdout: &mut StandardStream, diffs: &[Difference]) {
    for diff in diffs {
        let (sign, color, text) = match diff {
            Difference::Same(x) => (' ', None, x),
            Difference::Add(x) => ('+', Some(Color::Green), x),
            Difference::Rem(x) => ('-', Some(Color::Red), x),
        };
        for line in text.split('\n') {
            let _ = stdout.set_color(ColorSpec::new().set_fg(color));
            println!("{sign}{line}");
        }
    }
}

// ============================================================================
// LOGGING - colored stderr logger behind the `log` facade
// ============================================================================

struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let color = match record.level() {
            Level::Error => Color::Red,
            Level::Warn => Color::Yellow,
            Level::Info => Color::Green,
            Level::Debug | Level::Trace => Color::Blue,
        };
        let mut stderr = StandardStream::stderr(ColorChoice::Auto);
        let _ = stderr.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
        let _ = write!(stderr, "{:>5}", record.level());
        let _ = stderr.reset();
        let _ = writeln!(stderr, " {}", record.args());
    }

    fn flush(&self) {}
}

fn init_logging(level: LevelFilter) {
    // Only fails if a logger is already installed, in which case keep it.
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn args_are_well_formed() {
        P8PrettyArgs::command().debug_assert();
    }

    #[test]
    fn verbosity_maps_to_levels() {
        let args = P8PrettyArgs::parse_from(["p8pretty", "cart.p8"]);
        assert_eq!(args.log_level(), LevelFilter::Warn);
        let args = P8PrettyArgs::parse_from(["p8pretty", "-vv", "cart.p8"]);
        assert_eq!(args.log_level(), LevelFilter::Debug);
    }

    #[test]
    fn flags_reach_options() {
        let args = P8PrettyArgs::parse_from(["p8pretty", "--lua-only", "cart.p8", "out.lua"]);
        let options = args.options();
        assert!(options.lua_only);
        assert_eq!(options.output, Some(PathBuf::from("out.lua")));
        assert_eq!(options.mode(), OutputMode::CodeOnly);
    }

    struct FullWriter;

    impl Write for FullWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "no space left on device"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn failed_stdout_write_is_an_output_error() {
        let err = write_printed(&mut FullWriter, "x = 1\n").unwrap_err();
        assert_eq!(err.category(), crate::ErrorCategory::Output);
        assert!(err.to_string().contains("<stdout>"));

        let mut buffer = Vec::new();
        write_printed(&mut buffer, "x = 1\n").unwrap();
        assert_eq!(buffer, b"x = 1\n");
    }

    #[test]
    fn check_conflicts_with_output() {
        assert!(P8PrettyArgs::try_parse_from(["p8pretty", "--check", "a.p8", "b.p8"]).is_err());
    }
}
