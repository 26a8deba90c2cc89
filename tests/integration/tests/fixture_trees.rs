//! End-to-end tests over fixture source trees.
//!
//! Runs the jshinter binary against trees under `tests/fixtures` and checks
//! printed reports, generated test files and exit codes.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn jshinter_cmd() -> Command {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let workspace_root = manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("Failed to find workspace root");
    let bin_path = workspace_root.join("target/debug/jshinter");
    Command::new(bin_path)
}

fn lint(fixture: &str, dest: &TempDir) -> Command {
    let mut cmd = jshinter_cmd();
    cmd.arg(fixtures_dir().join(fixture)).arg(dest.path());
    cmd
}

mod configuration {
    use super::*;

    #[test]
    fn uses_jshintrc_in_tree_root() {
        let dest = TempDir::new().unwrap();

        lint("some-files-ignoring-missing-semi-colons", &dest)
            .arg("--per-file")
            .assert()
            .success()
            .stdout(predicate::str::contains("Missing semicolon.").not());
    }

    #[test]
    fn finds_jshintrc_in_config_root() {
        let dest = TempDir::new().unwrap();

        lint("some-files-ignoring-missing-semi-colons-non-default-jshintrc-path", &dest)
            .args(["--per-file", "--config-root", "some-dir"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Missing semicolon.").not());
    }

    #[test]
    fn config_root_without_jshintrc_uses_defaults() {
        let dest = TempDir::new().unwrap();

        lint("some-files-without-semi-colons", &dest)
            .args(["--per-file", "--config-root", "missing-dir"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Missing semicolon."));
    }

    #[test]
    fn tolerates_comments_in_jshintrc() {
        let dest = TempDir::new().unwrap();

        lint("comments-in-jshintrc", &dest)
            .arg("--per-file")
            .assert()
            .success()
            .stdout(predicate::str::contains("JSHint Error").not());
    }
}

mod reporting {
    use super::*;

    #[test]
    fn reports_each_failing_file() {
        let dest = TempDir::new().unwrap();

        lint("some-files-without-semi-colons", &dest)
            .args(["--dest-file", "jshint-tests.js"])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "core.js: line 1, col 20, Missing semicolon.",
            ))
            .stdout(predicate::str::contains(
                "main.js: line 1, col 19, Missing semicolon.",
            ))
            .stdout(predicate::str::contains("===== 2 JSHint Errors"));
    }

    #[test]
    fn handles_too_many_errors() {
        let dest = TempDir::new().unwrap();

        lint("some-files-with-too-many-errors", &dest)
            .arg("--per-file")
            .assert()
            .success()
            .stdout(predicate::str::contains("Too many errors."))
            .stdout(predicate::str::contains("51 errors"));
    }

    #[test]
    fn no_log_prints_no_reports() {
        let dest = TempDir::new().unwrap();

        lint("some-files-without-semi-colons", &dest)
            .args(["--per-file", "--no-log"])
            .assert()
            .success()
            .stdout(predicate::str::is_empty());
    }
}

mod generated_tests {
    use super::*;

    #[test]
    fn per_file_tests_carry_errors() {
        let dest = TempDir::new().unwrap();

        lint("some-files-without-semi-colons", &dest)
            .arg("--per-file")
            .assert()
            .success();

        let core = fs::read_to_string(dest.path().join("core.jshint.js")).unwrap();
        assert!(core.contains("Missing semicolon."));
        let clean = fs::read_to_string(dest.path().join("look-no-errors.jshint.js")).unwrap();
        assert!(clean.contains("ok(true, 'look-no-errors.js should pass jshint.');"));
    }

    #[test]
    fn aggregated_file_contains_every_module() {
        let dest = TempDir::new().unwrap();

        lint("some-files-without-semi-colons", &dest)
            .args(["--dest-file", "jshint-tests.js"])
            .assert()
            .success();

        let output = fs::read_to_string(dest.path().join("jshint-tests.js")).unwrap();
        assert_eq!(output.matches("module('JSHint - .');").count(), 3);
        assert!(output.contains("\\n\\n1 error'); \n});\n\n\nmodule("));
    }

    #[test]
    fn disable_test_generator_omits_errors() {
        let dest = TempDir::new().unwrap();

        lint("some-files-without-semi-colons", &dest)
            .args(["--dest-file", "jshint-tests.js", "--disable-test-generator"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Missing semicolon."));

        let output = fs::read_to_string(dest.path().join("jshint-tests.js")).unwrap();
        assert!(!output.contains("Missing semicolon."));
    }
}

mod failing {
    use super::*;

    #[test]
    fn fail_on_any_error() {
        let dest = TempDir::new().unwrap();

        lint("some-files-doomed-to-be-failed", &dest)
            .args(["--per-file", "--fail-on-any-error"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("JSHint failed"));

        assert!(dest.path().join("lib/doomed.jshint.js").exists());
    }
}
