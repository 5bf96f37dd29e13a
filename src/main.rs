//! CLI for bibcite - Print normalized metadata for a BibTeX citation key.

use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use bibcite::{
    extract_fields, lookup_with, read_lenient, render_json, render_lines, render_pairs,
    BoundaryStrategy, LookupError, LookupOptions,
};

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

/// Print normalized metadata for a BibTeX citation key
#[derive(Parser)]
#[command(name = "bibcite")]
#[command(version)]
#[command(after_help = "\
Examples:
  bibcite lookup refs.bib doe2021
  bibcite lookup refs.bib doe2021 --format json
  bibcite fields refs.bib doe2021")]
struct Cli {
    /// Increase log verbosity on stderr (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print title, author, year, journal and doi as field=value lines
    #[command(after_help = "\
Output: one 'field=value' line per non-empty field, in the order
title, author, year, journal, doi. Nothing is printed on failure.")]
    Lookup {
        #[command(flatten)]
        entry: EntryArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Lines)]
        format: Format,
    },

    /// Print every normalized field of the entry
    Fields {
        #[command(flatten)]
        entry: EntryArgs,
    },
}

#[derive(Args)]
struct EntryArgs {
    /// BibTeX file
    bib: PathBuf,

    /// Citation key (matched case-insensitively)
    key: String,

    /// End the entry at the next line starting with '@type{' instead of
    /// balancing braces (faster, less accurate)
    #[arg(long)]
    next_marker: bool,
}

impl EntryArgs {
    fn options(&self) -> LookupOptions {
        LookupOptions {
            strategy: if self.next_marker {
                BoundaryStrategy::NextMarker
            } else {
                BoundaryStrategy::Balanced
            },
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// field=value lines
    Lines,
    /// A JSON object
    Json,
}

// ---------------------------------------------------------------------------
// AppError - semantic exit codes
// ---------------------------------------------------------------------------

enum AppError {
    /// Exit 10 - bibliography file not found / unreadable
    BibFile(String),
    /// Exit 13 - citation key not found in bibliography
    CitationNotFound(String),
    /// Exit 14 - entry found but has no usable title
    MissingTitle(String),
    /// Exit 15 - cannot write output
    Output(String),
}

impl AppError {
    fn exit_code(&self) -> i32 {
        match self {
            AppError::BibFile(_) => 10,
            AppError::CitationNotFound(_) => 13,
            AppError::MissingTitle(_) => 14,
            AppError::Output(_) => 15,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::BibFile(msg) => {
                write!(f, "{}\n  hint: verify the file path is correct", msg)
            }
            AppError::CitationNotFound(msg) => {
                write!(
                    f,
                    "{}\n  hint: check that this citation key exists in your bibliography file",
                    msg
                )
            }
            AppError::MissingTitle(msg) => {
                write!(
                    f,
                    "{}\n  hint: run 'bibcite fields' to see what the entry contains",
                    msg
                )
            }
            AppError::Output(msg) => write!(f, "{}", msg),
        }
    }
}

impl From<LookupError> for AppError {
    fn from(e: LookupError) -> Self {
        match e {
            LookupError::Io { .. } => AppError::BibFile(e.to_string()),
            LookupError::NotFound(_) => AppError::CitationNotFound(e.to_string()),
            LookupError::MissingTitle(_) => AppError::MissingTitle(e.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(e.exit_code());
    }
}

/// Logs go to stderr; stdout carries only the field=value output.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "bibcite=debug",
        _ => "bibcite=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<(), AppError> {
    match cli.command {
        Commands::Lookup { entry, format } => lookup_command(&entry, format),
        Commands::Fields { entry } => fields_command(&entry),
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// Look up one citation and print the five downstream fields.
fn lookup_command(entry: &EntryArgs, format: Format) -> Result<(), AppError> {
    let citation = lookup_with(&entry.bib, &entry.key, &entry.options())?;

    let output = match format {
        Format::Lines => render_lines(&citation),
        Format::Json => {
            let mut json =
                render_json(&citation).map_err(|e| AppError::Output(format!("json: {}", e)))?;
            json.push('\n');
            json
        }
    };

    write_stdout(&output)
}

/// Print every normalized field of one entry.
fn fields_command(entry: &EntryArgs) -> Result<(), AppError> {
    let content = read_bib(&entry.bib)?;
    let fields = extract_fields(&content, &entry.key, &entry.options())
        .ok_or_else(|| AppError::from(LookupError::NotFound(entry.key.clone())))?;

    write_stdout(&render_pairs(&fields))
}

fn read_bib(path: &Path) -> Result<String, AppError> {
    read_lenient(path).map_err(|source| {
        AppError::from(LookupError::Io {
            path: path.to_path_buf(),
            source,
        })
    })
}

fn write_stdout(output: &str) -> Result<(), AppError> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(output.as_bytes())
        .and_then(|_| handle.flush())
        .map_err(|e| AppError::Output(format!("stdout: {}", e)))
}
