#![forbid(unsafe_code)]
//! sanity: a minimal, sequential test-execution harness
//!
//! sanity finds test files under a directory tree, loads the test cases each file declares, runs them one after
//! another, and prints a plain-text report. Tests signal results through [`TestEnv::expect`], which never panics: a
//! test accumulates any number of passes and failures and is reported as a single PASS/FAIL line.
//!
//! ## Layout
//!
//! - [`scanner`]: breadth-first discovery of test files by case-insensitive name match
//! - [`env`]: the execution context ([`TestEnv`]) and the `expect` assertion model
//! - [`config`]: extension and lifecycle hooks, plus JSON configuration files
//! - [`loader`]: the pluggable load-module capability ([`JsonLoader`], [`SuiteRegistry`])
//! - [`runner`]: the per-file, per-test lifecycle
//! - [`reporter`]: report formatting
//! - [`driver`]: top-level sequencing of a run
//!
//! ## Embedding
//!
//! ```no_run
//! use std::path::Path;
//!
//! use sanity::{Configuration, ConsoleReporter, Driver, SuiteRegistry, TestCase};
//!
//! let registry = SuiteRegistry::new().with_suite(
//!     "math.test.rs",
//!     vec![TestCase::new("addition", |env| env.expect(1 + 1 == 2))],
//! );
//! let config = Configuration::builder().test_file_extension(".test.rs").build();
//!
//! let mut driver = Driver::new(registry, ConsoleReporter::stdout(true));
//! let summary = driver.run(Path::new("tests"), config).unwrap();
//! assert!(summary.all_passed());
//! ```
//!
//! ## Panic Policy
//!
//! - **Production code**: `Result`/`Option` with `?`; the `cli` module enforces `#![deny(clippy::unwrap_used)]`.
//! - **Test procedures**: may panic. The runner catches the panic and records it as one failure for that test.
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod cli;
pub mod config;
pub mod driver;
pub mod env;
pub mod error;
pub mod loader;
pub mod reporter;
pub mod runner;
pub mod scanner;
pub mod suite;
pub mod version;

pub use config::{ConfigFile, Configuration, ConfigurationBuilder, DEFAULT_TEST_FILE_EXTENSION};
pub use driver::{Driver, RunSummary};
pub use env::{PerTest, TestEnv};
pub use error::{LoadError, SanityError};
pub use loader::{JsonLoader, Loader, SuiteRegistry};
pub use reporter::{ConsoleReporter, TestReporter};
pub use scanner::{ScanError, scan};
pub use suite::{InvalidFile, TestCase, TestFile};

pub use sanity_core::{FalsyKind, Null, Testable};
