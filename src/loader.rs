//! Turning discovered files into test collections
//!
//! The driver never interprets file contents itself; it asks a [`Loader`]. Two loaders ship with the crate:
//!
//! - [`JsonLoader`] reads data-driven suites, used by the `sanity` binary;
//! - [`SuiteRegistry`] maps paths to Rust closures, for hosts that embed the harness.
//!
//! A loader distinguishes a file that exposes no test collection (`Ok(None)`, an invalid file) from one that could
//! not be loaded at all (`Err`). The driver records both as invalid files and carries on.
//!
//! ## JSON suites
//!
//! ```json
//! {
//!   "tests": [
//!     { "desc": "addition", "expects": [true, 1, "non-empty"] },
//!     { "desc": "broken", "expects": [0], "panic": "unreachable state" }
//!   ]
//! }
//! ```
//!
//! Each value in `expects` goes through [`TestEnv::expect_at`] in order, with the location token
//! `<file>#tests[<i>].expects[<j>]`. A `panic` message makes the procedure panic once its expects are done.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

use crate::config::ConfigFile;
use crate::env::TestEnv;
use crate::error::LoadError;
use crate::suite::TestCase;

/// The pluggable load-module capability.
pub trait Loader {
    /// Load the test collection a file exposes, or `None` when it exposes none.
    fn load_tests(&self, path: &Path) -> Result<Option<Vec<TestCase>>, LoadError>;

    /// Load a configuration file. The default reads a JSON [`ConfigFile`].
    fn load_config(&self, path: &Path) -> Result<ConfigFile, LoadError> {
        read_config_file(path)
    }
}

impl<L: Loader + ?Sized> Loader for &L {
    fn load_tests(&self, path: &Path) -> Result<Option<Vec<TestCase>>, LoadError> {
        (**self).load_tests(path)
    }

    fn load_config(&self, path: &Path) -> Result<ConfigFile, LoadError> {
        (**self).load_config(path)
    }
}

pub fn read_config_file(path: &Path) -> Result<ConfigFile, LoadError> {
    let source = read(path)?;
    serde_json::from_str(&source).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn read(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })
}

// ============================================================================
// JSON suites
// ============================================================================

/// Loads JSON test files.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonLoader;

#[derive(Debug, Deserialize)]
struct JsonTest {
    desc: String,
    #[serde(default)]
    expects: Vec<Value>,
    #[serde(default)]
    panic: Option<String>,
}

impl JsonLoader {
    /// Parse suite source that was read from `path`.
    pub fn parse(&self, path: &Path, source: &str) -> Result<Option<Vec<TestCase>>, LoadError> {
        let document: Value = serde_json::from_str(source).map_err(|source| LoadError::Json {
            path: path.to_path_buf(),
            source,
        })?;

        let tests = match document.get("tests") {
            None | Some(Value::Null) => return Ok(None),
            Some(tests) => tests.clone(),
        };
        let tests: Vec<JsonTest> = serde_json::from_value(tests)
            .map_err(|e| LoadError::malformed(path, format!("`tests` is not a list of test cases: {e}")))?;

        let cases = tests
            .into_iter()
            .enumerate()
            .map(|(index, test)| json_case(path, index, test))
            .collect();
        Ok(Some(cases))
    }
}

impl Loader for JsonLoader {
    fn load_tests(&self, path: &Path) -> Result<Option<Vec<TestCase>>, LoadError> {
        let source = read(path)?;
        self.parse(path, &source)
    }
}

fn json_case(path: &Path, index: usize, test: JsonTest) -> TestCase {
    let JsonTest { desc, expects, panic } = test;
    let prefix = format!("{}#tests[{index}]", path.display());

    TestCase::new(desc, move |env: &mut TestEnv| {
        for (j, value) in expects.iter().enumerate() {
            env.expect_at(value, format!("{prefix}.expects[{j}]"));
        }
        if let Some(message) = &panic {
            panic!("{message}");
        }
    })
}

// ============================================================================
// In-process suites
// ============================================================================

/// Test collections registered from Rust code.
///
/// A discovered file resolves to the first registration whose key is a trailing path of the file (compared by
/// components, so `math.test.rs` matches `/repo/tests/math.test.rs` but not `/repo/tests/applied_math.test.rs`).
/// The file itself still has to exist on disk to be discovered. Discovered files with no registration expose no
/// collection.
#[derive(Debug, Default, Clone)]
pub struct SuiteRegistry {
    suites: Vec<(PathBuf, Vec<TestCase>)>,
}

impl SuiteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, path: impl Into<PathBuf>, tests: Vec<TestCase>) -> &mut Self {
        self.suites.push((path.into(), tests));
        self
    }

    pub fn with_suite(mut self, path: impl Into<PathBuf>, tests: Vec<TestCase>) -> Self {
        self.register(path, tests);
        self
    }
}

impl Loader for SuiteRegistry {
    fn load_tests(&self, path: &Path) -> Result<Option<Vec<TestCase>>, LoadError> {
        Ok(self
            .suites
            .iter()
            .find(|(key, _)| path.ends_with(key))
            .map(|(_, tests)| tests.clone()))
    }
}
