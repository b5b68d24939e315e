//! The execution context handed to every test
//!
//! A single [`TestEnv`] lives for the whole run. It is created by the driver and passed by `&mut` through the runner
//! into hooks and test procedures. It holds two layers of counters:
//!
//! - **per-test counters** ([`PerTest`]): reset by [`TestEnv::test_prepare`], filled by one test's `expect` calls,
//!   read by the reporter;
//! - **cumulative totals**: grown only by [`TestEnv::test_cleanup`], by exactly the per-test counts.
//!
//! `expect` never panics and never returns an error. A test can record any number of independent results; its
//! verdict is computed from the aggregate afterwards.

use std::panic::Location;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use sanity_core::{FalsyKind, Testable};
use tracing::debug;

use crate::config::Configuration;

/// Pass/fail tally and failure locations for the test currently running.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PerTest {
    /// File the test came from (diagnostics only).
    pub file: PathBuf,
    pub passed: usize,
    pub failed: usize,
    pub expects_failed: Vec<String>,
}

impl PerTest {
    /// A test passes when none of its expects failed, including when it made none.
    pub fn succeeded(&self) -> bool {
        self.failed == 0
    }
}

#[derive(Debug)]
pub struct TestEnv {
    passed: usize,
    failed: usize,
    per_test: PerTest,
    config: Rc<Configuration>,
}

impl TestEnv {
    pub fn new(config: Configuration) -> Self {
        Self::with_shared_config(Rc::new(config))
    }

    pub fn with_shared_config(config: Rc<Configuration>) -> Self {
        Self {
            passed: 0,
            failed: 0,
            per_test: PerTest::default(),
            config,
        }
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// A handle on the configuration that outlives a borrow of `self`, for calling hooks that take `&mut self`.
    pub fn shared_config(&self) -> Rc<Configuration> {
        Rc::clone(&self.config)
    }

    /// Cumulative passed expects.
    pub fn passed(&self) -> usize {
        self.passed
    }

    /// Cumulative failed expects.
    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn per_test(&self) -> &PerTest {
        &self.per_test
    }

    pub fn test_prepare(&mut self, file: &Path) {
        self.per_test = PerTest {
            file: file.to_path_buf(),
            ..PerTest::default()
        };
    }

    pub fn test_cleanup(&mut self) {
        self.passed += self.per_test.passed;
        self.failed += self.per_test.failed;
    }

    /// Record one result for `value`, using the caller's source position as the failure location.
    #[track_caller]
    pub fn expect<T: Testable>(&mut self, value: T) {
        let caller = Location::caller();
        self.tally(value.falsy_kind(), || caller.to_string());
    }

    /// Like [`expect`](Self::expect) with an explicit failure location, for tests that are not Rust code.
    pub fn expect_at<T: Testable>(&mut self, value: T, location: impl Into<String>) {
        self.tally(value.falsy_kind(), || location.into());
    }

    /// Record a failure that did not come from an expect (a panicking procedure).
    pub fn record_failure(&mut self, location: impl Into<String>) {
        let location = location.into();
        debug!(%location, "recorded failure");
        self.per_test.failed += 1;
        self.per_test.expects_failed.push(location);
    }

    fn tally(&mut self, falsy: Option<FalsyKind>, location: impl FnOnce() -> String) {
        match falsy {
            None => self.per_test.passed += 1,
            Some(kind) => {
                let location = location();
                debug!(%location, %kind, "expect failed");
                self.per_test.failed += 1;
                self.per_test.expects_failed.push(location);
            }
        }
    }
}
