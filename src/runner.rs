//! Per-file test lifecycle
//!
//! For one file, in order:
//!
//! 1. the reporter prints the file header
//! 2. `before_file`
//! 3. for every test, in declaration order: `test_prepare`, `before_test`, the procedure, `after_test`, the
//!    reporter's result line, `test_cleanup`
//! 4. `after_file`
//!
//! A procedure that panics is caught here. The panic counts as exactly one failure for that test (location token
//! `panicked: <message>`) and the lifecycle continues with `after_test`, so one bad test never takes down its
//! file or the run.
//!
//! The process panic hook is left alone: it still prints its `panicked at` message to stderr. The report on stdout
//! carries the panic as the test's `Expect Failed: panicked: <message>` line.

use std::any::Any;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use tracing::{debug, warn};

use crate::env::TestEnv;
use crate::reporter::TestReporter;
use crate::suite::TestCase;

/// Run every test of one file against `env`.
///
/// Only reporter write failures are returned; test outcomes land in `env`.
#[tracing::instrument(skip_all, fields(file = %file.display(), tests = tests.len()))]
pub fn run_file<R: TestReporter + ?Sized>(
    file: &Path,
    tests: &[TestCase],
    env: &mut TestEnv,
    reporter: &mut R,
) -> io::Result<()> {
    let config = env.shared_config();

    reporter.file_header(file)?;
    (config.before_file)(file, tests, env);

    for test in tests {
        env.test_prepare(file);
        (config.before_test)(file, test, env);
        run_procedure(test, env);
        (config.after_test)(file, test, env);

        debug!(
            test = %test.description,
            passed = env.per_test().passed,
            failed = env.per_test().failed,
            "test finished"
        );
        reporter.test_result(test, env.per_test())?;
        env.test_cleanup();
    }

    (config.after_file)(file, tests, env);
    Ok(())
}

fn run_procedure(test: &TestCase, env: &mut TestEnv) {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| (test.procedure)(env)));
    if let Err(payload) = outcome {
        let message = panic_message(payload.as_ref());
        warn!(test = %test.description, %message, "test procedure panicked");
        env.record_failure(format!("panicked: {message}"));
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "<non-string panic payload>".to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::config::Configuration;
    use crate::reporter::ConsoleReporter;

    fn run(tests: &[TestCase], config: Configuration) -> (TestEnv, String) {
        let mut env = TestEnv::new(config);
        let mut reporter = ConsoleReporter::new(Vec::new(), false);
        run_file(Path::new("/suite/a.test.json"), tests, &mut env, &mut reporter).unwrap();
        (env, String::from_utf8(reporter.into_inner()).unwrap())
    }

    #[test]
    fn test_verdicts_and_totals() {
        let tests = [
            TestCase::new("passes", |env| env.expect(true)),
            TestCase::new("fails", |env| {
                env.expect(false);
                env.expect(1);
            }),
            TestCase::new("vacuous", |_| {}),
        ];
        let (env, out) = run(&tests, Configuration::default());

        assert_eq!((env.passed(), env.failed()), (2, 1));
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 5, "{out}");
        assert!(lines[1].starts_with("Test: passes") && lines[1].ends_with("[PASS]"));
        assert!(lines[2].starts_with("Test: fails") && lines[2].ends_with("[FAIL]"));
        assert!(lines[3].starts_with("    Expect Failed: src/runner.rs:"), "{}", lines[3]);
        assert!(lines[4].starts_with("Test: vacuous") && lines[4].ends_with("[PASS]"));
    }

    #[test]
    fn test_hook_order() {
        let log = Rc::new(RefCell::new(Vec::<String>::new()));
        let push = |log: &Rc<RefCell<Vec<String>>>, entry: &'static str| {
            let log = Rc::clone(log);
            move || log.borrow_mut().push(entry.to_string())
        };

        let (bf, af, bt, at) = (
            push(&log, "before_file"),
            push(&log, "after_file"),
            push(&log, "before_test"),
            push(&log, "after_test"),
        );
        let config = Configuration::builder()
            .before_file(move |_, _, _| bf())
            .after_file(move |_, _, _| af())
            .before_test(move |_, _, _| bt())
            .after_test(move |_, _, _| at())
            .build();

        let body_log = Rc::clone(&log);
        let tests = [
            TestCase::new("one", move |_| body_log.borrow_mut().push("one".into())),
            TestCase::new("two", |_| {}),
        ];
        run(&tests, config);

        assert_eq!(
            *log.borrow(),
            ["before_file", "before_test", "one", "after_test", "before_test", "after_test", "after_file"]
        );
    }

    #[test]
    fn test_panicking_procedure_is_one_failure() {
        let tests = [
            TestCase::new("explodes", |env| {
                env.expect(true);
                panic!("kaboom");
            }),
            TestCase::new("still runs", |env| env.expect(true)),
        ];
        let (env, out) = run(&tests, Configuration::default());

        assert_eq!((env.passed(), env.failed()), (2, 1));
        assert!(out.contains("    Expect Failed: panicked: kaboom"), "{out}");
        assert!(out.lines().last().unwrap().ends_with("[PASS]"));
    }

    #[test]
    fn test_after_test_sees_panicked_test_counters() {
        let seen = Rc::new(RefCell::new(None));
        let record = Rc::clone(&seen);
        let config = Configuration::builder()
            .after_test(move |_, _, env| *record.borrow_mut() = Some(env.per_test().failed))
            .build();

        let tests = [TestCase::new("explodes", |_| panic!("{}", String::from("owned message")))];
        let (_, out) = run(&tests, config);

        assert_eq!(*seen.borrow(), Some(1));
        assert!(out.contains("panicked: owned message"), "{out}");
    }

    #[test]
    fn test_hooks_can_assert() {
        let config = Configuration::builder()
            .after_test(|_, _, env| env.expect(0))
            .build();
        let tests = [TestCase::new("clean", |env| env.expect(true))];
        let (env, out) = run(&tests, config);

        assert_eq!((env.passed(), env.failed()), (1, 1));
        assert!(out.contains("[FAIL]"));
    }

    #[test]
    fn test_panic_message_payloads() {
        assert_eq!(panic_message(&"static"), "static");
        assert_eq!(panic_message(&String::from("owned")), "owned");
        assert_eq!(panic_message(&42u32), "<non-string panic payload>");
    }
}
