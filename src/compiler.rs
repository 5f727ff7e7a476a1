//! Compiler service port
//!
//! The driver never runs the template compiler itself; it hands a
//! [`CompileSpec`] to a [`CompilerService`] and blocks until the call
//! returns. From the driver's viewpoint that call is opaque and atomic -
//! whether the implementation spawns a JVM, talks to a persistent worker, or
//! runs in-process is not its concern.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::error::{WeftError, WeftResult};
use crate::variant::CompilerVariant;

/// Environment variable overriding the compiler launcher binary.
///
/// Defaults to `java`; tests point it at a stub.
pub const COMPILER_ENV: &str = "WEFT_COMPILER";

/// Everything the external compiler needs for one invocation.
///
/// Constructed fresh per build and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileSpec {
    /// Sources to translate, restricted to the out-of-date subset
    pub sources: Vec<PathBuf>,
    /// Root directory templates are resolved against
    pub source_root: PathBuf,
    /// Full toolchain classpath, not restricted to changed entries
    pub classpath: Vec<PathBuf>,
    /// Directory generated sources are written under
    pub output_root: PathBuf,
    /// Resolved compiler profile
    pub variant: CompilerVariant,
    /// Caller requested an isolated compiler process
    pub fork: bool,
}

/// Synchronous port to the external template compiler
pub trait CompilerService {
    /// Compile every source in the spec, writing under `spec.output_root`.
    ///
    /// Blocks until the compiler finishes; a non-zero outcome surfaces as
    /// [`WeftError::Compile`] with the compiler's message attached.
    fn compile(&self, spec: &CompileSpec) -> WeftResult<()>;
}

/// Production implementation spawning the JVM compiler entry point.
///
/// Always runs the compiler in its own process; `spec.fork` is carried for
/// build scripts that request isolation explicitly.
#[derive(Debug, Clone)]
pub struct JavaCompiler {
    launcher: PathBuf,
}

impl JavaCompiler {
    pub fn new(launcher: impl Into<PathBuf>) -> Self {
        Self {
            launcher: launcher.into(),
        }
    }

    /// Use `java` from PATH unless `WEFT_COMPILER` overrides it
    pub fn from_env() -> Self {
        let launcher = std::env::var_os(COMPILER_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("java"));
        Self::new(launcher)
    }

    fn classpath_arg(classpath: &[PathBuf]) -> String {
        let sep = if cfg!(windows) { ";" } else { ":" };
        classpath
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(sep)
    }
}

impl CompilerService for JavaCompiler {
    fn compile(&self, spec: &CompileSpec) -> WeftResult<()> {
        let mut cmd = Command::new(&self.launcher);
        cmd.arg("-cp")
            .arg(Self::classpath_arg(&spec.classpath))
            .arg(spec.variant.entry_point())
            .arg("--source-root")
            .arg(&spec.source_root)
            .arg("--output")
            .arg(&spec.output_root)
            .arg("--formatter")
            .arg(spec.variant.formatter_type())
            .arg("--imports")
            .arg(spec.variant.default_imports())
            .args(&spec.sources)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let output = cmd.output().map_err(|e| WeftError::Compile {
            message: format!("failed to launch '{}': {}", self.launcher.display(), e),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = stderr.trim();
            return Err(WeftError::Compile {
                message: if detail.is_empty() {
                    format!("compiler exited with {}", output.status)
                } else {
                    format!("compiler exited with {}: {}", output.status, detail)
                },
            });
        }

        Ok(())
    }
}

/// Recording mock for tests: remembers every spec and optionally fails
#[cfg(test)]
#[derive(Clone, Default)]
pub struct MockCompiler {
    pub invocations: std::sync::Arc<std::sync::Mutex<Vec<CompileSpec>>>,
    pub fail_with: std::sync::Arc<std::sync::Mutex<Option<String>>>,
}

#[cfg(test)]
impl MockCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(message: &str) -> Self {
        let mock = Self::default();
        *mock.fail_with.lock().unwrap() = Some(message.to_string());
        mock
    }

    pub fn invocation_count(&self) -> usize {
        self.invocations.lock().unwrap().len()
    }

    pub fn last_sources(&self) -> Vec<PathBuf> {
        self.invocations
            .lock()
            .unwrap()
            .last()
            .map(|spec| spec.sources.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
impl CompilerService for MockCompiler {
    fn compile(&self, spec: &CompileSpec) -> WeftResult<()> {
        self.invocations.lock().unwrap().push(spec.clone());
        if let Some(message) = self.fail_with.lock().unwrap().clone() {
            return Err(WeftError::Compile { message });
        }
        Ok(())
    }
}
