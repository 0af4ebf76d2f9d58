//! Shared helpers for CLI specs

#![allow(dead_code)]

pub use serde_json::{json, Value};

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Output;
use tempfile::TempDir;

/// A temporary home for one spec: data directory plus scratch files
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn data_dir(&self) -> PathBuf {
        self.path().join("data")
    }

    /// Write a scratch file relative to the project root
    pub fn file(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, contents).unwrap();
        path
    }

    /// Write a raw storage entry as the browser would have left it
    pub fn stored_raw(&self, key: &str, contents: &str) {
        self.file(&format!("data/{}.json", key), contents);
    }

    /// Write a slice inside its storage envelope
    pub fn stored_slice(&self, key: &str, data: Value) {
        let envelope = json!({"data": data, "version": 1, "timestamp": 0});
        self.stored_raw(key, &envelope.to_string());
    }

    /// The `data` of a stored slice, if present
    pub fn slice(&self, key: &str) -> Option<Value> {
        let path = self.data_dir().join(format!("{}.json", key));
        let text = std::fs::read_to_string(path).ok()?;
        let envelope: Value = serde_json::from_str(&text).unwrap();
        Some(envelope["data"].clone())
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.data_dir().join(format!("{}.json", key)).exists()
    }

    /// Invoke `novel` against this project's data directory
    pub fn novel(&self) -> Cli {
        let mut cmd = Command::cargo_bin("novel").unwrap();
        cmd.current_dir(self.path())
            .env_remove("NOVEL_LOG")
            .env_remove("NOVEL_CONTENT_DIR")
            .arg("--data-dir")
            .arg(self.data_dir());
        Cli { cmd }
    }
}

/// A pending CLI invocation
pub struct Cli {
    cmd: Command,
}

impl Cli {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn content(mut self, dir: &Path) -> Self {
        self.cmd.arg("--content").arg(dir);
        self
    }

    pub fn stdin(mut self, input: &str) -> Self {
        self.cmd.write_stdin(input.to_string());
        self
    }

    /// Run and require success
    pub fn passes(mut self) -> Run {
        let output = self.cmd.output().unwrap();
        let run = Run { output };
        assert!(
            run.output.status.success(),
            "expected success\nstdout:\n{}\nstderr:\n{}",
            run.stdout(),
            run.stderr()
        );
        run
    }

    /// Run and require failure
    pub fn fails(mut self) -> Run {
        let output = self.cmd.output().unwrap();
        let run = Run { output };
        assert!(
            !run.output.status.success(),
            "expected failure\nstdout:\n{}",
            run.stdout()
        );
        run
    }
}

/// A finished CLI invocation
pub struct Run {
    output: Output,
}

impl Run {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    pub fn stdout_has(self, expected: &str) -> Self {
        let stdout = self.stdout();
        assert!(
            predicate::str::contains(expected).eval(stdout.as_str()),
            "stdout does not contain {:?}\nstdout:\n{}",
            expected,
            stdout
        );
        self
    }

    pub fn stdout_lacks(self, unexpected: &str) -> Self {
        let stdout = self.stdout();
        assert!(
            predicate::str::contains(unexpected).not().eval(stdout.as_str()),
            "stdout unexpectedly contains {:?}\nstdout:\n{}",
            unexpected,
            stdout
        );
        self
    }

    pub fn stderr_has(self, expected: &str) -> Self {
        let stderr = self.stderr();
        assert!(
            predicate::str::contains(expected).eval(stderr.as_str()),
            "stderr does not contain {:?}\nstderr:\n{}",
            expected,
            stderr
        );
        self
    }

    /// Compare whole stdout, showing a diff on mismatch
    pub fn stdout_eq(self, expected: &str) -> Self {
        similar_asserts::assert_eq!(self.stdout(), expected);
        self
    }

    pub fn json(&self) -> Value {
        serde_json::from_str(&self.stdout()).unwrap()
    }
}

pub const PREFERENCES_KEY: &str = "novel-preferences";
pub const READING_STATE_KEY: &str = "novel-reading-state";
pub const UI_STATE_KEY: &str = "novel-ui-state";
pub const SESSION_DATA_KEY: &str = "novel-session-data";
pub const DATA_VERSION_KEY: &str = "novel-data-version";

pub const CHAPTERS_JSON: &str = r#"[
  {"title": "Opening", "contentPath": "ch1.html"},
  {"title": "Middle", "subtitle": "In which things happen", "contentPath": "ch2.html"}
]"#;
