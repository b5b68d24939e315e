//! CLI module for the sanity harness
//!
//! `sanity <ROOT_DIR> [CONFIG_FILE]` scans `ROOT_DIR` for JSON test files, runs them, and prints the report.
//!
//! ## Exit codes
//!
//! - `0`: every test passed, or no test files were found
//! - `1`: at least one test failed
//! - `2`: the run could not start (bad root directory, bad configuration file, unreadable directory)
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use crate::config::Configuration;
use crate::driver::Driver;
use crate::error::SanityError;
use crate::loader::JsonLoader;
use crate::reporter::ConsoleReporter;
use crate::version::SANITY_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
    pub const FATAL: ExitCode = ExitCode(2);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Tests failed; the report already said so.
    pub fn tests_failed() -> Self {
        Self::new("", ExitCode::FAILURE)
    }

    /// The run could not start. Rendered through miette.
    pub fn fatal(err: SanityError) -> Self {
        let report = miette::Report::new(err);
        Self::new(format!("{report:?}\n  ...Exiting"), ExitCode::FATAL)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const TEST_FILE_HELP: &str = "\
Test files are JSON documents exposing a `tests` list:

  {\"tests\": [
    {\"desc\": \"Test Name\", \"expects\": [true, 1, \"text\"]}
  ]}

An expect fails on null, false and 0; anything else passes.

The optional CONFIG_FILE is a JSON object:

  {\"testFileExtension\": \".test.json\", \"beforeAll\": \"<shell command>\"}

Hooks: beforeAll, afterAll, beforeFile, afterFile, beforeTest, afterTest.

Set RUST_LOG=debug for a trace of the run on stderr.";

// ============================================================================
// Clap CLI definition
// ============================================================================

/// A minimal sequential test harness
#[derive(Parser, Debug)]
#[command(name = "sanity")]
#[command(version = SANITY_VERSION)]
#[command(about = "Find, run and report JSON test suites", long_about = None)]
#[command(after_help = TEST_FILE_HELP)]
pub struct Cli {
    /// Directory searched recursively for test files
    #[arg(value_name = "ROOT_DIR")]
    pub root: PathBuf,

    /// JSON configuration file
    #[arg(value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Disable ANSI colors in the report (also honored: NO_COLOR)
    #[arg(long)]
    pub no_color: bool,
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute a parsed command line and return its exit code.
pub fn execute(cli: Cli) -> CliResult<ExitCode> {
    let color = !cli.no_color && env::var_os("NO_COLOR").is_none();
    let mut driver = Driver::new(JsonLoader, ConsoleReporter::stdout(color));

    let summary = driver
        .execute(&cli.root, Configuration::default(), cli.config.as_deref())
        .map_err(CliError::fatal)?;

    if summary.all_passed() {
        Ok(ExitCode::SUCCESS)
    } else {
        Err(CliError::tests_failed())
    }
}

// ============================================================================
// Tests
// ============================================================================
