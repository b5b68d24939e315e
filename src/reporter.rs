//! Report formatting
//!
//! The runner and driver only decide *what* happened; a [`TestReporter`] decides how it reads. The console
//! reporter prints the classic layout:
//!
//! ```text
//! ======= /suite/math.test.json =========
//! Test: adds numbers--------------------------------------------------------------[PASS]
//! Test: divides by zero-----------------------------------------------------------[FAIL]
//!     Expect Failed: /suite/math.test.json#tests[1].expects[0]
//! Total Passed/Failed: (3/1)
//! TESTS FAILED
//! ```

use std::io::{self, Write};
use std::path::Path;

use crate::env::PerTest;
use crate::suite::{InvalidFile, TestCase};

/// Visible width a test line is padded to, before its `[PASS]`/`[FAIL]` tag.
pub const LINE_WIDTH: usize = 80;

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

/// Receives everything a run has to say, in order.
pub trait TestReporter {
    /// Called before any test of `path` runs.
    fn file_header(&mut self, path: &Path) -> io::Result<()>;

    /// Called once per test, after its after-test hook and before its counters are folded into the totals.
    fn test_result(&mut self, test: &TestCase, result: &PerTest) -> io::Result<()>;

    /// Called when discovery found nothing to run.
    fn no_files(&mut self, extension: &str) -> io::Result<()>;

    /// Called once at the end of a run that found files.
    fn summary(&mut self, passed: usize, failed: usize) -> io::Result<()>;

    /// Called after the summary when some files yielded no tests.
    fn invalid_files(&mut self, files: &[InvalidFile]) -> io::Result<()>;
}

impl<R: TestReporter + ?Sized> TestReporter for &mut R {
    fn file_header(&mut self, path: &Path) -> io::Result<()> {
        (**self).file_header(path)
    }

    fn test_result(&mut self, test: &TestCase, result: &PerTest) -> io::Result<()> {
        (**self).test_result(test, result)
    }

    fn no_files(&mut self, extension: &str) -> io::Result<()> {
        (**self).no_files(extension)
    }

    fn summary(&mut self, passed: usize, failed: usize) -> io::Result<()> {
        (**self).summary(passed, failed)
    }

    fn invalid_files(&mut self, files: &[InvalidFile]) -> io::Result<()> {
        (**self).invalid_files(files)
    }
}

/// Plain-text reporter with optional ANSI colors.
#[derive(Debug)]
pub struct ConsoleReporter<W: Write> {
    out: W,
    color: bool,
}

impl ConsoleReporter<io::Stdout> {
    pub fn stdout(color: bool) -> Self {
        Self::new(io::stdout(), color)
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.color {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }
}

/// `Test: <description>` followed by dashes up to [`LINE_WIDTH`]; no dashes once the description is too long.
pub fn test_line(description: &str) -> String {
    let mut line = format!("Test: {description}");
    let dashes = LINE_WIDTH.saturating_sub(line.chars().count());
    line.push_str(&"-".repeat(dashes));
    line
}

impl<W: Write> TestReporter for ConsoleReporter<W> {
    fn file_header(&mut self, path: &Path) -> io::Result<()> {
        let path = self.paint(GREEN, &path.display().to_string());
        writeln!(self.out, "======= {path} =========")
    }

    fn test_result(&mut self, test: &TestCase, result: &PerTest) -> io::Result<()> {
        let tag = if result.succeeded() {
            self.paint(GREEN, "PASS")
        } else {
            self.paint(RED, "FAIL")
        };

        // One write per test so its lines stay together.
        let mut block = format!("{}[{tag}]\n", test_line(&test.description));
        for location in &result.expects_failed {
            block.push_str(&format!("    Expect Failed: {location}\n"));
        }
        self.out.write_all(block.as_bytes())?;
        self.out.flush()
    }

    fn no_files(&mut self, extension: &str) -> io::Result<()> {
        writeln!(self.out, "No files ending with '{extension}' were found in the provided directory")?;
        writeln!(self.out, "  ...Exiting")
    }

    fn summary(&mut self, passed: usize, failed: usize) -> io::Result<()> {
        let verdict = if failed == 0 {
            self.paint(GREEN, "ALL TESTS PASSED")
        } else {
            self.paint(RED, "TESTS FAILED")
        };
        writeln!(self.out, "Total Passed/Failed: ({passed}/{failed})")?;
        writeln!(self.out, "{verdict}")
    }

    fn invalid_files(&mut self, files: &[InvalidFile]) -> io::Result<()> {
        if files.is_empty() {
            return Ok(());
        }
        writeln!(self.out)?;
        writeln!(self.out, "Invalid Test Files were found.")?;
        writeln!(self.out, "  This does not prevent correct execution of other tests.")?;
        writeln!(self.out)?;
        writeln!(self.out, "Invalid Test Files:")?;
        for file in files {
            let path = self.paint(RED, &file.path.display().to_string());
            match &file.reason {
                Some(reason) => writeln!(self.out, "  {path}: {reason}")?,
                None => writeln!(self.out, "  {path}")?,
            }
        }
        self.out.flush()
    }
}
