#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Mutex;

use assert_cmd::Command;
use chrono::{DateTime, TimeZone, Utc};
use fintrack::cli::shell::{handle_line, SCRIPT_ENV};
use fintrack::cli::shell_context::{CliMode, ShellContext};
use fintrack::cli::system_clock::NOW_ENV;
use fintrack::config::{self, HOME_ENV};
use fintrack_core::time::FixedClock;
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub const NOW_RFC3339: &str = "2024-06-15T12:00:00Z";

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
}

/// A fresh base directory that outlives the calling test.
pub fn temp_home() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Script-mode context rooted at `base` with the clock pinned to `now`.
pub fn context_at(base: PathBuf, now: DateTime<Utc>) -> ShellContext {
    let manager = config::manager_with_base(base).expect("create config manager");
    ShellContext::with_manager(CliMode::Script, manager, Box::new(FixedClock(now)))
        .expect("build shell context")
}

pub fn setup_context() -> ShellContext {
    context_at(temp_home(), fixed_now())
}

/// Runs each line and fails the test on the first command error.
pub fn run_lines(context: &mut ShellContext, lines: &[&str]) {
    for line in lines {
        if let Err(err) = handle_line(context, line) {
            panic!("`{line}` failed: {err}");
        }
    }
}

/// The CLI binary in script mode, isolated under `home`.
pub fn cli(home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("fintrack_cli").expect("binary builds");
    cmd.env(SCRIPT_ENV, "1")
        .env(HOME_ENV, home)
        .env(NOW_ENV, NOW_RFC3339)
        .env("RUST_LOG", "off");
    cmd
}
