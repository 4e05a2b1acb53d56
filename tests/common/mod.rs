#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::{TempDir, tempdir};

/// Absolute path to a fixture under `tests/data`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

pub fn fixture_arg(name: &str) -> String {
    fixture_path(name).to_string_lossy().into_owned()
}

/// The binary under test with logging silenced so stderr only carries errors.
pub fn chart_insights() -> Command {
    let mut cmd = Command::cargo_bin("chart-insights").expect("binary exists");
    cmd.env("RUST_LOG", "off");
    cmd
}

/// Scratch directory for inputs generated by a test; removed on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, contents).expect("write temp file");
        path
    }

    /// `id,value` CSV with `rows` data rows, value = id * 10.
    pub fn write_numbered_csv(&self, name: &str, rows: usize) -> PathBuf {
        let mut contents = String::from("id,value\n");
        for id in 1..=rows {
            contents.push_str(&format!("row{id},{}\n", id * 10));
        }
        self.write(name, &contents)
    }
}
