//! CLI tool for extracting text from PDF, PowerPoint, and plain-text files.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use textract::{Error, ErrorClass, ExtractOptions, ExtractionResult, DEFAULT_MAX_UPLOAD_BYTES};

/// Extract readable text from document uploads.
#[derive(Parser, Debug)]
#[command(name = "textract")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input file(s) (.pdf, .pptx, .ppt, or .txt)
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Reject inputs larger than this many bytes
    #[arg(long, default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    max_size: usize,

    /// Output directory (default: print to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// The full extraction result as JSON
    Json,
    /// Extracted text only; warnings go to stderr
    Text,
    /// Extracted text with any warning prepended as a banner
    Legacy,
}

impl OutputFormat {
    fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Text | OutputFormat::Legacy => "txt",
        }
    }
}

/// How a single input ended, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Outcome {
    Ok,
    BadInput,
    Unexpected,
}

impl Outcome {
    fn exit_code(self) -> ExitCode {
        match self {
            Outcome::Ok => ExitCode::SUCCESS,
            Outcome::BadInput => ExitCode::from(2),
            Outcome::Unexpected => ExitCode::FAILURE,
        }
    }
}

impl From<ErrorClass> for Outcome {
    fn from(class: ErrorClass) -> Self {
        match class {
            ErrorClass::BadInput => Outcome::BadInput,
            ErrorClass::Unexpected => Outcome::Unexpected,
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let options = ExtractOptions::default().with_max_bytes(args.max_size);
    let mut worst = Outcome::Ok;

    for input_path in &args.input {
        if args.verbose {
            eprintln!("Processing: {}", input_path.display());
        }

        let outcome = match process_file(input_path, &args, &options) {
            Ok(Ok(output)) => match emit(input_path, &args, &output) {
                Ok(()) => Outcome::Ok,
                Err(e) => {
                    eprintln!("Error writing output for {}: {:#}", input_path.display(), e);
                    Outcome::Unexpected
                }
            },
            Ok(Err(e)) => {
                eprintln!("{}", failure_message(input_path, &e));
                Outcome::from(e.class())
            }
            Err(e) => {
                eprintln!("Error processing {}: {:#}", input_path.display(), e);
                Outcome::Unexpected
            }
        };
        worst = worst.max(outcome);
    }

    worst.exit_code()
}

/// Process a single input file.
///
/// The outer result carries I/O failures; the inner one carries extraction
/// failures so their class can decide the exit status.
fn process_file(
    input_path: &Path,
    args: &Args,
    options: &ExtractOptions,
) -> Result<textract::Result<String>> {
    let bytes = std::fs::read(input_path)
        .with_context(|| format!("Failed to read {}", input_path.display()))?;

    let filename = input_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown");

    let result = match textract::extract_with_options(&bytes, filename, options) {
        Ok(result) => result,
        Err(e) => return Ok(Err(e)),
    };

    if args.verbose {
        eprintln!("  Found {} units ({})", result.page_count, result.file_type);
    }
    if args.format == OutputFormat::Text && result.has_warning() {
        eprintln!("Warning for {}: {}", input_path.display(), result.warning);
    }

    render(result, args.format).map(Ok)
}

/// The line shown for a failed extraction.
///
/// Unexpected failures are logged in full and reported with the generic message.
fn failure_message(input_path: &Path, error: &Error) -> String {
    if error.class() == ErrorClass::Unexpected {
        log::error!("Extraction of {} failed: {}", input_path.display(), error);
    }
    format!("Error processing {}: {}", input_path.display(), error.user_message())
}

/// Render a result in the requested format.
fn render(result: ExtractionResult, format: OutputFormat) -> Result<String> {
    let output = match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(&result).context("Failed to serialize result")?
        }
        OutputFormat::Text => result.text,
        OutputFormat::Legacy => result.into_legacy_pair().0,
    };
    Ok(output)
}

/// Print the output or write it next to the other outputs.
fn emit(input_path: &Path, args: &Args, output: &str) -> Result<()> {
    match &args.output {
        Some(dir) => {
            let output_path = get_output_path(input_path, dir, args.format)?;
            write_output(&output_path, output)?;
            if args.verbose {
                eprintln!("Written to: {}", output_path.display());
            }
        }
        None => println!("{}", output),
    }
    Ok(())
}

/// Determine the output path for a processed file.
fn get_output_path(input_path: &Path, output_dir: &Path, format: OutputFormat) -> Result<PathBuf> {
    let stem = input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");

    std::fs::create_dir_all(output_dir).with_context(|| {
        format!("Failed to create output directory: {}", output_dir.display())
    })?;

    Ok(output_dir.join(format!("{}.{}", stem, format.extension())))
}

/// Write output to a file.
fn write_output(path: &Path, content: &str) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;

    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write to {}", path.display()))?;

    Ok(())
}
