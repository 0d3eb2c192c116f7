//! Test environment builder for isolated complysync testing.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// Fixture workspace holding the simplified NIST catalog, profile and `test_comp`
pub const FIXTURE_WORKSPACE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/workspace");

/// Result of running the CLI
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Temporary workspace directory
pub struct TestEnv {
    pub root: TempDir,
}

impl TestEnv {
    /// An empty workspace
    pub fn empty() -> Self {
        Self {
            root: tempfile::tempdir().expect("create temp workspace"),
        }
    }

    /// A workspace seeded with the fixture models
    pub fn with_fixtures() -> Self {
        let env = Self::empty();
        copy_dir(Path::new(FIXTURE_WORKSPACE), env.root.path());
        env
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.path().join(relative)
    }

    pub fn write(&self, relative: &str, content: &str) {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dir");
        }
        fs::write(path, content).expect("write file");
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.path(relative)).expect("read file")
    }

    /// Write an index file mapping `name` to `profile` and `components`
    pub fn write_index(&self, relative: &str, name: &str, profile: &str, components: &[&str]) {
        let mut index = serde_json::Map::new();
        index.insert(
            name.to_string(),
            serde_json::json!({ "profile": profile, "components": components }),
        );
        self.write(relative, &serde_json::to_string_pretty(&index).expect("index json"));
    }

    /// Run the binary in the workspace without CI provider variables
    pub fn run(&self, args: &[&str]) -> TestResult {
        self.run_with_env(args, &[])
    }

    pub fn run_with_env(&self, args: &[&str], env_vars: &[(&str, &str)]) -> TestResult {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_complysync"));
        cmd.current_dir(self.root.path())
            .args(args)
            .env_remove("GITHUB_ACTIONS")
            .env_remove("GITLAB_CI")
            .env_remove("GITHUB_OUTPUT")
            .env_remove("COMPLYSYNC_LOG");
        for (key, value) in env_vars {
            cmd.env(key, value);
        }

        let output = cmd.output().expect("failed to execute complysync");
        TestResult {
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }

    /// Files below `relative`, as sorted workspace-relative paths
    pub fn files_under(&self, relative: &str) -> Vec<String> {
        let mut out = Vec::new();
        let base = self.path(relative);
        if base.exists() {
            collect_files(&base, self.root.path(), &mut out);
        }
        out.sort();
        out
    }
}

/// Whether a usable `git` is on PATH
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Run git in `dir`, panicking on failure
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(args)
        .env("GIT_CONFIG_NOSYSTEM", "1")
        .env("GIT_AUTHOR_NAME", "fixture")
        .env("GIT_AUTHOR_EMAIL", "fixture@example.com")
        .env("GIT_COMMITTER_NAME", "fixture")
        .env("GIT_COMMITTER_EMAIL", "fixture@example.com")
        .output()
        .expect("run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn copy_dir(from: &Path, to: &Path) {
    fs::create_dir_all(to).expect("create dir");
    for entry in fs::read_dir(from).expect("read fixture dir") {
        let entry = entry.expect("fixture entry");
        let target = to.join(entry.file_name());
        if entry.path().is_dir() {
            copy_dir(&entry.path(), &target);
        } else {
            fs::copy(entry.path(), target).expect("copy fixture");
        }
    }
}

fn collect_files(dir: &Path, root: &Path, out: &mut Vec<String>) {
    for entry in fs::read_dir(dir).expect("read dir") {
        let path = entry.expect("dir entry").path();
        if path.is_dir() {
            collect_files(&path, root, out);
        } else if let Ok(rel) = path.strip_prefix(root) {
            out.push(rel.to_string_lossy().replace('\\', "/"));
        }
    }
}
