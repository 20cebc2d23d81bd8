//! Test helpers for behavioral specifications.
//!
//! Provides a small DSL for driving the gauntlet binary against throwaway
//! projects whose suites are shell scripts printing canned jest output.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

pub use assert_cmd::prelude::*;
pub use predicates;
pub use predicates::prelude::{Predicate, PredicateBooleanExt};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Trait for converting into a string predicate.
/// Allows passing `&str` (as contains) or any `Predicate<str>`.
pub trait IntoStrPredicate<P: Predicate<str>> {
    fn into_predicate(self) -> P;
}

impl IntoStrPredicate<predicates::str::ContainsPredicate> for &str {
    fn into_predicate(self) -> predicates::str::ContainsPredicate {
        predicates::str::contains(self)
    }
}

impl<P: Predicate<str>> IntoStrPredicate<P> for P {
    fn into_predicate(self) -> P {
        self
    }
}

/// Returns a Command configured to run the gauntlet binary
pub fn gauntlet_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("gauntlet"));
    cmd.env_remove("GAUNTLET_CONFIG")
        .env_remove("GAUNTLET_LOG")
        .env("NO_COLOR", "1");
    cmd
}

/// Jest `--json` document with the given counts.
pub fn jest_json(passed: u64, failed: u64) -> String {
    let status = if failed == 0 { "passed" } else { "failed" };
    format!(
        r#"{{"success":{},"numPassedTests":{},"numFailedTests":{},"numPendingTests":0,"numPassedTestSuites":{},"numFailedTestSuites":{},"numTotalTestSuites":1,"testResults":[{{"name":"suite.test.js","status":"{}","message":"{}"}}]}}"#,
        failed == 0,
        passed,
        failed,
        u64::from(failed == 0),
        u64::from(failed != 0),
        status,
        if failed == 0 { "" } else { "expected 1 to be 2" },
    )
}

/// Jest document carrying a coverage map where `covered` of 10 statements ran.
pub fn jest_json_with_coverage(passed: u64, covered: u64) -> String {
    let hits: Vec<String> = (0..10)
        .map(|i| format!(r#""{i}":{}"#, u64::from(i < covered)))
        .collect();
    let locations: Vec<String> = (0..10)
        .map(|i| format!(r#""{i}":{{"start":{{"line":{}}}}}"#, i + 1))
        .collect();
    format!(
        r#"{{"success":true,"numPassedTests":{passed},"numFailedTests":0,"numPendingTests":0,"coverageMap":{{"/src/app.js":{{"s":{{{}}},"b":{{"0":[1,1]}},"f":{{"0":1}},"statementMap":{{{}}}}}}}}}"#,
        hits.join(","),
        locations.join(","),
    )
}

/// Temporary project directory with helper methods.
pub struct Project {
    dir: tempfile::TempDir,
    suites: Vec<String>,
}

#[allow(dead_code)]
impl Project {
    /// Create an empty project with no files
    pub fn empty() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
            suites: Vec::new(),
        }
    }

    /// Get the project path
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path relative to the project root.
    pub fn join(&self, path: impl AsRef<Path>) -> PathBuf {
        self.dir.path().join(path)
    }

    /// Write a file at the given path (parent directories created automatically)
    pub fn file(&self, path: impl AsRef<Path>, content: &str) {
        let full_path = self.join(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(full_path, content).unwrap();
    }

    /// Add a jest suite that prints `output` and exits with `exit_code`.
    pub fn suite(mut self, key: &str, output: &str, exit_code: i32) -> Self {
        let results = format!("results/{key}.json");
        self.file(&results, output);
        let order = self.suites.len() + 1;
        self.suites.push(format!(
            "[[suite]]\nkey = \"{key}\"\norder = {order}\ncommand = [\"sh\", \"-c\", \"cat {results}; exit {exit_code}\"]\n"
        ));
        self
    }

    /// Write gauntlet.toml with the registered suites and `extra` settings.
    ///
    /// Retries are disabled unless `extra` configures them.
    pub fn config(self, extra: &str) -> Self {
        let mut content = String::from("version = 1\n");
        content.push_str(extra);
        if !extra.contains("[retry]") {
            content.push_str("\n[retry]\nmax_retries = 0\n");
        }
        for suite in &self.suites {
            content.push('\n');
            content.push_str(suite);
        }
        self.file("gauntlet.toml", &content);
        self
    }

    /// Files in the output directory whose names start with `prefix`.
    pub fn reports(&self, prefix: &str) -> Vec<PathBuf> {
        let Ok(entries) = std::fs::read_dir(self.join("test-reports")) else {
            return Vec::new();
        };
        let mut paths: Vec<PathBuf> = entries
            .map(|e| e.unwrap().path())
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with(prefix))
            })
            .collect();
        paths.sort();
        paths
    }

    /// Run gauntlet in the project with the given arguments.
    pub fn gauntlet(&self, args: &[&str]) -> RunAssert {
        let output = gauntlet_cmd()
            .args(args)
            .current_dir(self.path())
            .output()
            .unwrap();
        RunAssert { output }
    }
}

/// Result of a gauntlet invocation for chaining assertions
pub struct RunAssert {
    output: std::process::Output,
}

#[allow(dead_code)]
impl RunAssert {
    /// Get stdout as string
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    /// Get stderr as string
    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    /// Assert the process exit code.
    pub fn exits(self, code: i32) -> Self {
        assert_eq!(
            self.output.status.code(),
            Some(code),
            "unexpected exit code\nstdout:\n{}\nstderr:\n{}",
            self.stdout(),
            self.stderr()
        );
        self
    }

    /// Assert stdout equals expected (with diff on failure)
    pub fn stdout_eq(self, expected: &str) -> Self {
        similar_asserts::assert_eq!(self.stdout(), expected);
        self
    }

    /// Assert stdout matches predicate.
    pub fn stdout_has<I, P>(self, predicate: I) -> Self
    where
        I: IntoStrPredicate<P>,
        P: Predicate<str>,
    {
        let stdout = self.stdout();
        assert!(
            predicate.into_predicate().eval(&stdout),
            "stdout predicate failed:\n{}",
            stdout
        );
        self
    }

    /// Assert stdout does not match predicate.
    pub fn stdout_lacks<I, P>(self, predicate: I) -> Self
    where
        I: IntoStrPredicate<P>,
        P: Predicate<str>,
    {
        let stdout = self.stdout();
        assert!(
            !predicate.into_predicate().eval(&stdout),
            "stdout should NOT match predicate:\n{}",
            stdout
        );
        self
    }

    /// Assert stderr matches predicate.
    pub fn stderr_has<I, P>(self, predicate: I) -> Self
    where
        I: IntoStrPredicate<P>,
        P: Predicate<str>,
    {
        let stderr = self.stderr();
        assert!(
            predicate.into_predicate().eval(&stderr),
            "stderr predicate failed:\n{}",
            stderr
        );
        self
    }
}
