//! Harness configuration
//!
//! A [`Configuration`] carries the test file extension and six lifecycle hooks. Every field has a default (the
//! `.test.json` extension and no-op hooks), and a configuration file only overrides the fields it names.
//!
//! ## Configuration files
//!
//! Configuration files are JSON objects:
//!
//! ```json
//! {
//!   "testFileExtension": ".spec.json",
//!   "beforeAll": "make fixtures",
//!   "afterTest": "echo \"$SANITY_TEST done\""
//! }
//! ```
//!
//! Hook entries are shell commands. They see `SANITY_FILE` and `SANITY_TEST` where a file or test is in scope, plus
//! the running totals as `SANITY_PASSED` / `SANITY_FAILED`. A hook command that fails is logged and otherwise
//! ignored; it never changes a test verdict.
//!
//! Library callers usually skip the file and build hooks as closures with [`Configuration::builder`].

use std::fmt;
use std::path::Path;
use std::process::Command;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::env::TestEnv;
use crate::suite::TestCase;

/// Extension used when neither the caller nor a configuration file provides one.
pub const DEFAULT_TEST_FILE_EXTENSION: &str = ".test.json";

pub type EnvHook = Box<dyn Fn(&mut TestEnv)>;
pub type FileHook = Box<dyn Fn(&Path, &[TestCase], &mut TestEnv)>;
pub type TestHook = Box<dyn Fn(&Path, &TestCase, &mut TestEnv)>;

/// The active configuration of a run. Immutable once the run starts.
pub struct Configuration {
    pub test_file_extension: String,
    pub before_all: EnvHook,
    pub after_all: EnvHook,
    pub before_file: FileHook,
    pub after_file: FileHook,
    pub before_test: TestHook,
    pub after_test: TestHook,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            test_file_extension: DEFAULT_TEST_FILE_EXTENSION.to_string(),
            before_all: Box::new(|_: &mut TestEnv| {}),
            after_all: Box::new(|_: &mut TestEnv| {}),
            before_file: Box::new(|_: &Path, _: &[TestCase], _: &mut TestEnv| {}),
            after_file: Box::new(|_: &Path, _: &[TestCase], _: &mut TestEnv| {}),
            before_test: Box::new(|_: &Path, _: &TestCase, _: &mut TestEnv| {}),
            after_test: Box::new(|_: &Path, _: &TestCase, _: &mut TestEnv| {}),
        }
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("test_file_extension", &self.test_file_extension)
            .finish_non_exhaustive()
    }
}

impl Configuration {
    pub fn builder() -> ConfigurationBuilder {
        ConfigurationBuilder::default()
    }

    /// Overlay the fields a configuration file sets onto `self`.
    ///
    /// An empty `testFileExtension` counts as unset.
    pub fn merge(mut self, file: ConfigFile) -> Self {
        if let Some(ext) = file.test_file_extension.filter(|ext| !ext.is_empty()) {
            self.test_file_extension = ext;
        }
        if let Some(cmd) = file.before_all {
            self.before_all = env_command_hook(HookCommand::new("beforeAll", cmd));
        }
        if let Some(cmd) = file.after_all {
            self.after_all = env_command_hook(HookCommand::new("afterAll", cmd));
        }
        if let Some(cmd) = file.before_file {
            self.before_file = file_command_hook(HookCommand::new("beforeFile", cmd));
        }
        if let Some(cmd) = file.after_file {
            self.after_file = file_command_hook(HookCommand::new("afterFile", cmd));
        }
        if let Some(cmd) = file.before_test {
            self.before_test = test_command_hook(HookCommand::new("beforeTest", cmd));
        }
        if let Some(cmd) = file.after_test {
            self.after_test = test_command_hook(HookCommand::new("afterTest", cmd));
        }
        self
    }
}

/// Builds a [`Configuration`] with closure hooks; unset fields keep their defaults.
#[derive(Default)]
pub struct ConfigurationBuilder {
    config: Configuration,
}

impl ConfigurationBuilder {
    pub fn test_file_extension(mut self, ext: impl Into<String>) -> Self {
        self.config.test_file_extension = ext.into();
        self
    }

    pub fn before_all(mut self, hook: impl Fn(&mut TestEnv) + 'static) -> Self {
        self.config.before_all = Box::new(hook);
        self
    }

    pub fn after_all(mut self, hook: impl Fn(&mut TestEnv) + 'static) -> Self {
        self.config.after_all = Box::new(hook);
        self
    }

    pub fn before_file(mut self, hook: impl Fn(&Path, &[TestCase], &mut TestEnv) + 'static) -> Self {
        self.config.before_file = Box::new(hook);
        self
    }

    pub fn after_file(mut self, hook: impl Fn(&Path, &[TestCase], &mut TestEnv) + 'static) -> Self {
        self.config.after_file = Box::new(hook);
        self
    }

    pub fn before_test(mut self, hook: impl Fn(&Path, &TestCase, &mut TestEnv) + 'static) -> Self {
        self.config.before_test = Box::new(hook);
        self
    }

    pub fn after_test(mut self, hook: impl Fn(&Path, &TestCase, &mut TestEnv) + 'static) -> Self {
        self.config.after_test = Box::new(hook);
        self
    }

    pub fn build(self) -> Configuration {
        self.config
    }
}

// ============================================================================
// Configuration files
// ============================================================================

/// The recognized options of a configuration file. Every field is optional.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    pub test_file_extension: Option<String>,
    pub before_all: Option<String>,
    pub after_all: Option<String>,
    pub before_file: Option<String>,
    pub after_file: Option<String>,
    pub before_test: Option<String>,
    pub after_test: Option<String>,
}

/// A shell command bound to one lifecycle point.
#[derive(Debug, Clone)]
struct HookCommand {
    stage: &'static str,
    command: String,
}

impl HookCommand {
    fn new(stage: &'static str, command: String) -> Self {
        Self { stage, command }
    }

    fn run(&self, env: &TestEnv, file: Option<&Path>, test: Option<&TestCase>) {
        let mut cmd = shell(&self.command);
        cmd.env("SANITY_PASSED", env.passed().to_string())
            .env("SANITY_FAILED", env.failed().to_string());
        if let Some(file) = file {
            cmd.env("SANITY_FILE", file);
        }
        if let Some(test) = test {
            cmd.env("SANITY_TEST", &test.description);
        }

        debug!(stage = self.stage, command = %self.command, "running hook command");
        match cmd.status() {
            Ok(status) if status.success() => {}
            Ok(status) => warn!(stage = self.stage, command = %self.command, %status, "hook command failed"),
            Err(e) => warn!(stage = self.stage, command = %self.command, error = %e, "hook command could not be spawned"),
        }
    }
}

#[cfg(windows)]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}

#[cfg(not(windows))]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}

fn env_command_hook(hook: HookCommand) -> EnvHook {
    Box::new(move |env: &mut TestEnv| hook.run(env, None, None))
}

fn file_command_hook(hook: HookCommand) -> FileHook {
    Box::new(move |file: &Path, _: &[TestCase], env: &mut TestEnv| hook.run(env, Some(file), None))
}

fn test_command_hook(hook: HookCommand) -> TestHook {
    Box::new(move |file: &Path, test: &TestCase, env: &mut TestEnv| hook.run(env, Some(file), Some(test)))
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn test_default_extension() {
        assert_eq!(Configuration::default().test_file_extension, ".test.json");
    }

    #[test]
    fn test_config_file_fields_are_camel_case() {
        let file: ConfigFile =
            serde_json::from_str(r#"{"testFileExtension": ".spec.json", "beforeAll": "true"}"#).unwrap();
        assert_eq!(file.test_file_extension.as_deref(), Some(".spec.json"));
        assert_eq!(file.before_all.as_deref(), Some("true"));
        assert_eq!(file.after_all, None);
    }

    #[test]
    fn test_config_file_ignores_unknown_fields() {
        let file: ConfigFile = serde_json::from_str(r#"{"reporter": "tap"}"#).unwrap();
        assert_eq!(file, ConfigFile::default());
    }

    #[test]
    fn test_merge_is_per_field() {
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);
        let config = Configuration::builder()
            .before_all(move |_| seen.set(seen.get() + 1))
            .build()
            .merge(ConfigFile {
                test_file_extension: Some(".spec.json".into()),
                ..ConfigFile::default()
            });

        assert_eq!(config.test_file_extension, ".spec.json");
        let mut env = TestEnv::new(Configuration::default());
        (config.before_all)(&mut env);
        assert_eq!(calls.get(), 1, "hooks the file does not name are kept");
    }

    #[test]
    fn test_merge_empty_extension_falls_back() {
        let config = Configuration::default().merge(ConfigFile {
            test_file_extension: Some(String::new()),
            ..ConfigFile::default()
        });
        assert_eq!(config.test_file_extension, DEFAULT_TEST_FILE_EXTENSION);
    }

    #[cfg(unix)]
    #[test]
    fn test_command_hook_sees_file_and_test() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("hook.out");
        let config = Configuration::default().merge(ConfigFile {
            before_test: Some(format!("printf '%s|%s' \"$SANITY_FILE\" \"$SANITY_TEST\" > '{}'", out.display())),
            ..ConfigFile::default()
        });

        let test = TestCase::new("adds numbers", |_| {});
        let mut env = TestEnv::new(Configuration::default());
        (config.before_test)(Path::new("/suite/math.test.json"), &test, &mut env);

        assert_eq!(std::fs::read_to_string(out).unwrap(), "/suite/math.test.json|adds numbers");
    }

    #[test]
    fn test_failing_command_hook_does_not_panic() {
        let config = Configuration::default().merge(ConfigFile {
            after_all: Some("exit 3".into()),
            ..ConfigFile::default()
        });
        let mut env = TestEnv::new(Configuration::default());
        (config.after_all)(&mut env);
        assert_eq!(env.failed(), 0);
    }
}
