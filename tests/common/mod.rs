//! Test environment builder for isolated Weft testing.
//!
//! Provides `TestEnv` - an isolated project directory plus helpers to run
//! the Weft CLI and to stand in for the external template compiler.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// Result of running a Weft CLI command
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }
}

/// Isolated test environment with a temp project directory.
pub struct TestEnv {
    pub project_root: TempDir,
    weft_bin: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            project_root: TempDir::new().expect("create temp project"),
            weft_bin: PathBuf::from(env!("CARGO_BIN_EXE_weft")),
        }
    }

    /// Get path relative to project root
    pub fn path(&self, relative: &str) -> PathBuf {
        self.project_root.path().join(relative)
    }

    /// Write a file under the project root, creating parents
    pub fn write_file(&self, relative: &str, content: &str) {
        let path = self.path(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    /// Write a template source under `app/views/`
    pub fn write_template(&self, file_name: &str, content: &str) {
        self.write_file(&format!("app/views/{file_name}"), content);
    }

    pub fn remove_file(&self, relative: &str) {
        std::fs::remove_file(self.path(relative)).unwrap();
    }

    pub fn exists(&self, relative: &str) -> bool {
        self.path(relative).exists()
    }

    pub fn read_file(&self, relative: &str) -> String {
        std::fs::read_to_string(self.path(relative)).unwrap()
    }

    /// Run weft with the stub compiler registered
    pub fn run(&self, args: &[&str]) -> TestResult {
        self.run_with_env(args, &[("WEFT_COMPILER", &self.stub_compiler_path())])
    }

    /// Run weft with extra environment variables
    pub fn run_with_env(&self, args: &[&str], env_vars: &[(&str, &str)]) -> TestResult {
        let mut cmd = Command::new(&self.weft_bin);
        cmd.current_dir(self.project_root.path()).args(args);
        for (key, value) in env_vars {
            cmd.env(key, value);
        }

        let output = cmd.output().expect("Failed to execute weft");
        output_to_result(output)
    }

    fn stub_compiler_path(&self) -> String {
        self.path("stub-compiler.sh").display().to_string()
    }

    /// Install a stub compiler that appends its arguments to
    /// `compiler-invocations.log` and exits 0.
    #[cfg(unix)]
    pub fn install_stub_compiler(&self) {
        self.install_stub_compiler_script(
            "#!/bin/sh\nprintf '%s ' \"$@\" >> compiler-invocations.log\nprintf '\\n' >> compiler-invocations.log\nexit 0\n",
        );
    }

    /// Install a stub compiler that fails with a message on stderr.
    #[cfg(unix)]
    pub fn install_failing_stub_compiler(&self, message: &str) {
        self.install_stub_compiler_script(&format!(
            "#!/bin/sh\necho '{message}' >&2\nexit 1\n"
        ));
    }

    #[cfg(unix)]
    fn install_stub_compiler_script(&self, script: &str) {
        use std::os::unix::fs::PermissionsExt;

        let path = self.path("stub-compiler.sh");
        std::fs::write(&path, script).unwrap();
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();
    }

    /// One log line per compiler invocation, arguments space-joined
    pub fn compiler_invocations(&self) -> Vec<String> {
        let log = self.path("compiler-invocations.log");
        if !log.exists() {
            return Vec::new();
        }
        std::fs::read_to_string(log)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

fn output_to_result(output: Output) -> TestResult {
    TestResult {
        success: output.status.success(),
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    }
}
