use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use utf8ify::{Converter, EncodingPolicy, LogReporter, Reporter, Sink, Source};

/// Exit status of a failed run.
const FAILURE_STATUS: u8 = 255;

#[derive(Parser, Debug)]
#[command(name = "utf8ify")]
#[command(version, about = "utf8ify - Convert plaintext file encodings to UTF-8")]
struct Args {
    /// Input filename (read from stdin if `-` is specified)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output filename (write to stdout if not specified)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Encoding of the input
    #[arg(short, long, value_name = "ENCODING")]
    encoding: Option<String>,

    /// Do not use chardetng for guessing the input encoding
    #[arg(long)]
    nochardet: bool,

    /// Also log the resolved encoding and byte counts
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let filter = if verbose { "info" } else { "error" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

/// Replaces a leading `~` component with the home directory.
fn expand_tilde(path: PathBuf) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path;
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path,
    }
}

fn source_for(input: PathBuf) -> utf8ify::Result<Source> {
    if input.as_os_str() == "-" {
        Ok(Source::Stdin)
    } else {
        Source::file(expand_tilde(input))
    }
}

fn sink_for(output: Option<PathBuf>) -> utf8ify::Result<Sink> {
    match output {
        Some(path) => Sink::file(expand_tilde(path)),
        None => Ok(Sink::Stdout),
    }
}

fn build_converter(args: Args) -> utf8ify::Result<Converter> {
    let policy = EncodingPolicy::new(!args.nochardet, args.encoding)?;
    Ok(Converter::new(
        source_for(args.input)?,
        sink_for(args.output)?,
        policy,
    ))
}

fn run(args: Args, reporter: &dyn Reporter) -> utf8ify::Result<()> {
    let converter = build_converter(args).inspect_err(|err| reporter.report(err))?;
    converter.convert(reporter)
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(args, &LogReporter) {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::from(FAILURE_STATUS),
    }
}
