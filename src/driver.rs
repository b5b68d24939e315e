//! Top-level run sequencing
//!
//! The [`Driver`] owns the loader and reporter for one run:
//!
//! 1. validate the root directory (fatal if missing or not a directory)
//! 2. load the configuration file, if one was given (fatal if missing or unreadable)
//! 3. scan for test files
//! 4. `before_all`, then each file through the loader and the runner, then `after_all`
//! 5. summary, then the invalid-file listing
//!
//! Files that expose no tests, or that fail to load, are recorded as invalid and do not stop the run.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::Configuration;
use crate::env::TestEnv;
use crate::error::SanityError;
use crate::loader::Loader;
use crate::reporter::TestReporter;
use crate::runner;
use crate::scanner;
use crate::suite::{InvalidFile, TestFile};

/// What a completed run amounted to.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Files matching the extension.
    pub files_found: usize,
    /// Files that yielded a test collection and were run.
    pub files_run: usize,
    pub passed: usize,
    pub failed: usize,
    pub invalid: Vec<InvalidFile>,
}

impl RunSummary {
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

pub struct Driver<L, R> {
    loader: L,
    reporter: R,
}

impl<L: Loader, R: TestReporter> Driver<L, R> {
    pub fn new(loader: L, reporter: R) -> Self {
        Self { loader, reporter }
    }

    pub fn into_reporter(self) -> R {
        self.reporter
    }

    /// Validate `root`, merge the configuration file at `config_path` (if any) over `base`, and run.
    pub fn execute(
        &mut self,
        root: &Path,
        base: Configuration,
        config_path: Option<&Path>,
    ) -> Result<RunSummary, SanityError> {
        validate_root(root)?;
        let config = match config_path {
            Some(path) => self.load_configuration(base, path)?,
            None => base,
        };
        self.run_validated(root, config)
    }

    /// Validate `root` and run with an already-built configuration.
    pub fn run(&mut self, root: &Path, config: Configuration) -> Result<RunSummary, SanityError> {
        validate_root(root)?;
        self.run_validated(root, config)
    }

    pub fn load_configuration(&self, base: Configuration, path: &Path) -> Result<Configuration, SanityError> {
        if !path.exists() {
            return Err(SanityError::ConfigNotFound(path.to_path_buf()));
        }
        let file = self.loader.load_config(path).map_err(|source| SanityError::ConfigLoad {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(config = %path.display(), "loaded configuration file");
        Ok(base.merge(file))
    }

    fn run_validated(&mut self, root: &Path, config: Configuration) -> Result<RunSummary, SanityError> {
        let files = scanner::scan(root, &config.test_file_extension)?;
        info!(root = %root.display(), count = files.len(), "discovered test files");

        let mut env = TestEnv::new(config);
        let config = env.shared_config();
        let mut summary = RunSummary {
            files_found: files.len(),
            ..RunSummary::default()
        };

        (config.before_all)(&mut env);
        let ran = self.run_files(files, &mut env, &mut summary);
        // after_all runs even when the report could not be written.
        (config.after_all)(&mut env);
        ran?;

        if summary.files_found == 0 {
            return Ok(summary);
        }

        summary.passed = env.passed();
        summary.failed = env.failed();
        self.reporter.summary(summary.passed, summary.failed)?;
        self.reporter.invalid_files(&summary.invalid)?;
        Ok(summary)
    }

    fn run_files(&mut self, files: Vec<PathBuf>, env: &mut TestEnv, summary: &mut RunSummary) -> io::Result<()> {
        if files.is_empty() {
            return self.reporter.no_files(&env.config().test_file_extension);
        }

        for path in files {
            match self.load(path) {
                Ok(file) => {
                    runner::run_file(&file.path, &file.tests, env, &mut self.reporter)?;
                    summary.files_run += 1;
                }
                Err(invalid) => summary.invalid.push(invalid),
            }
        }
        Ok(())
    }
}

impl<L: Loader, R> Driver<L, R> {
    fn load(&self, path: PathBuf) -> Result<TestFile, InvalidFile> {
        match self.loader.load_tests(&path) {
            Ok(Some(tests)) => Ok(TestFile { path, tests }),
            Ok(None) => {
                debug!(file = %path.display(), "file exposes no tests");
                Err(InvalidFile { path, reason: None })
            }
            Err(e) => {
                warn!(file = %path.display(), error = %e, "failed to load test file");
                Err(InvalidFile {
                    path,
                    reason: Some(e.reason()),
                })
            }
        }
    }
}

/// The root must exist and be a directory.
pub fn validate_root(root: &Path) -> Result<(), SanityError> {
    match fs::metadata(root) {
        Err(_) => Err(SanityError::RootNotFound(root.to_path_buf())),
        Ok(meta) if !meta.is_dir() => Err(SanityError::RootNotDirectory(root.to_path_buf())),
        Ok(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::JsonLoader;
    use crate::reporter::ConsoleReporter;

    fn driver() -> Driver<JsonLoader, ConsoleReporter<Vec<u8>>> {
        Driver::new(JsonLoader, ConsoleReporter::new(Vec::new(), false))
    }

    #[test]
    fn test_validate_root() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.txt");
        fs::write(&file, "").unwrap();

        assert!(validate_root(dir.path()).is_ok());
        assert!(matches!(validate_root(&file), Err(SanityError::RootNotDirectory(_))));
        assert!(matches!(
            validate_root(&dir.path().join("missing")),
            Err(SanityError::RootNotFound(_))
        ));
    }

    #[test]
    fn test_missing_config_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = driver()
            .execute(dir.path(), Configuration::default(), Some(dir.path().join("nope.json").as_path()))
            .unwrap_err();
        assert!(matches!(err, SanityError::ConfigNotFound(_)));
    }

    #[test]
    fn test_unparsable_config_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("sanity.json");
        fs::write(&config, "not json").unwrap();

        let err = driver()
            .execute(dir.path(), Configuration::default(), Some(config.as_path()))
            .unwrap_err();
        assert!(matches!(err, SanityError::ConfigLoad { .. }));
    }

    #[test]
    fn test_root_checked_before_config() {
        let dir = tempfile::tempdir().unwrap();
        let err = driver()
            .execute(&dir.path().join("missing"), Configuration::default(), Some(dir.path().join("nope.json").as_path()))
            .unwrap_err();
        assert!(matches!(err, SanityError::RootNotFound(_)));
    }

    #[test]
    fn test_summary_counts() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("a.test.json"),
            r#"{"tests": [{"desc": "t1", "expects": [true, 0]}]}"#,
        )
        .unwrap();
        fs::write(dir.path().join("b.test.json"), r#"{"other": 1}"#).unwrap();

        let summary = driver().run(dir.path(), Configuration::default()).unwrap();
        assert_eq!(summary.files_found, 2);
        assert_eq!(summary.files_run, 1);
        assert_eq!((summary.passed, summary.failed), (1, 1));
        assert_eq!(summary.invalid.len(), 1);
        assert!(!summary.all_passed());
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_fault_is_fatal_and_reports_nothing() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.test.json"), r#"{"tests": [{"desc": "t1", "expects": [1]}]}"#).unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("sub/dangling")).unwrap();

        let mut driver = driver();
        let err = driver.run(dir.path(), Configuration::default()).unwrap_err();
        assert!(matches!(err, SanityError::Scan(_)), "{err}");
        assert!(driver.into_reporter().into_inner().is_empty());
    }

    /// Fails every write, like a closed stdout.
    struct BrokenReporter;

    impl TestReporter for BrokenReporter {
        fn file_header(&mut self, _: &Path) -> io::Result<()> {
            Err(io::ErrorKind::BrokenPipe.into())
        }

        fn test_result(&mut self, _: &crate::suite::TestCase, _: &crate::env::PerTest) -> io::Result<()> {
            Err(io::ErrorKind::BrokenPipe.into())
        }

        fn no_files(&mut self, _: &str) -> io::Result<()> {
            Err(io::ErrorKind::BrokenPipe.into())
        }

        fn summary(&mut self, _: usize, _: usize) -> io::Result<()> {
            Err(io::ErrorKind::BrokenPipe.into())
        }

        fn invalid_files(&mut self, _: &[InvalidFile]) -> io::Result<()> {
            Err(io::ErrorKind::BrokenPipe.into())
        }
    }

    #[test]
    fn test_after_all_runs_when_report_fails() {
        use std::cell::Cell;
        use std::rc::Rc;

        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.test.json"), r#"{"tests": [{"desc": "t1", "expects": [1]}]}"#).unwrap();
        let empty = tempfile::tempdir().unwrap();

        for root in [dir.path(), empty.path()] {
            let calls = Rc::new(Cell::new(0));
            let seen = Rc::clone(&calls);
            let config = Configuration::builder()
                .after_all(move |_| seen.set(seen.get() + 1))
                .build();

            let err = Driver::new(JsonLoader, BrokenReporter).run(root, config).unwrap_err();
            assert!(matches!(err, SanityError::Report(_)), "{err}");
            assert_eq!(calls.get(), 1);
        }
    }
}
