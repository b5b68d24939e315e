//! Test cases and per-file test collections

use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;

use crate::env::TestEnv;

/// The body of a test. It observes and mutates only the env it is handed.
pub type Procedure = Rc<dyn Fn(&mut TestEnv)>;

/// A named procedure that signals its results through [`TestEnv::expect`].
#[derive(Clone)]
pub struct TestCase {
    pub description: String,
    pub procedure: Procedure,
}

impl TestCase {
    pub fn new(description: impl Into<String>, procedure: impl Fn(&mut TestEnv) + 'static) -> Self {
        Self {
            description: description.into(),
            procedure: Rc::new(procedure),
        }
    }
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// The tests loaded from one discovered file, consumed as soon as it is run.
#[derive(Debug, Clone)]
pub struct TestFile {
    pub path: PathBuf,
    pub tests: Vec<TestCase>,
}

/// A discovered file that did not yield a usable test collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidFile {
    pub path: PathBuf,
    /// Load error text, when the file failed to load rather than simply exposing no tests.
    pub reason: Option<String>,
}
