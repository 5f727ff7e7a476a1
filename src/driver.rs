//! Compilation driver
//!
//! Orchestrates one build: resolve the compiler variant, classify changes,
//! reconcile stale outputs, then invoke the external compiler with exactly
//! the out-of-date subset. Holds no state across invocations - continuity
//! lives in the caller-supplied prior build and the filesystem. Callers must
//! serialize invocations per output root; the driver takes no locks of its
//! own.

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::Serialize;

use crate::changes::{classify, PriorBuild};
use crate::compiler::{CompileSpec, CompilerService};
use crate::error::WeftResult;
use crate::fs::FileSystem;
use crate::mapper::OutputMapper;
use crate::reconcile::{ReconcileWarning, StaleOutputReconciler};
use crate::template::TemplateName;
use crate::variant::{resolve_variant, CompilerVariant};

/// Per-invocation inputs that are not source state
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Root directory templates are resolved against
    pub source_root: PathBuf,
    /// Toolchain classpath, also used for variant detection
    pub classpath: Vec<PathBuf>,
    /// Request an isolated compiler process
    pub fork: bool,
}

/// Terminal outcome of a driver run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum BuildOutcome {
    /// Nothing was out of date; the compiler was not invoked
    UpToDate,
    /// The compiler ran over the out-of-date subset
    Compiled { sources: usize },
}

/// What a run did, for callers and `--json` output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    #[serde(flatten)]
    pub outcome: BuildOutcome,
    /// Resolved compiler profile
    pub variant: CompilerVariant,
    /// Stale outputs confirmed absent
    pub removed_outputs: usize,
    /// Sources left untouched
    pub unchanged: usize,
    /// Non-fatal reconciliation failures
    pub warnings: Vec<ReconcileWarning>,
}

impl BuildReport {
    pub fn is_up_to_date(&self) -> bool {
        matches!(self.outcome, BuildOutcome::UpToDate)
    }
}

/// Drives the full reconcile-then-compile cycle
pub struct CompileDriver<'a, C: CompilerService, F: FileSystem> {
    compiler: &'a C,
    fs: &'a F,
    mapper: OutputMapper,
}

impl<'a, C: CompilerService, F: FileSystem> CompileDriver<'a, C, F> {
    pub fn new(compiler: &'a C, fs: &'a F, mapper: OutputMapper) -> Self {
        Self {
            compiler,
            fs,
            mapper,
        }
    }

    /// Run one build invocation.
    ///
    /// `prior` carries the incremental state from the input tracker; `None`
    /// forces a full rebuild with no deletions. The call blocks until the
    /// compiler service returns. On compiler failure nothing is rolled back:
    /// outputs already written and stale outputs already deleted stay as
    /// they are, and the error propagates.
    pub fn run(
        &self,
        current: &BTreeSet<PathBuf>,
        prior: Option<&PriorBuild>,
        options: &BuildOptions,
    ) -> WeftResult<BuildReport> {
        let variant = resolve_variant(&options.classpath);
        let changes = classify(current, prior);

        // Validate every identity up front. A source we cannot map would
        // leave an output we cannot delete later, so the build aborts before
        // touching anything.
        for source in current.iter().chain(changes.removed.iter()) {
            TemplateName::parse(source)?;
        }

        let mut removed_outputs = 0;
        let mut warnings = Vec::new();
        if !changes.removed.is_empty() {
            let reconciler = StaleOutputReconciler::new(&self.mapper, self.fs);
            let report = reconciler.reconcile(&changes.removed)?;
            removed_outputs = report.reconciled;
            warnings = report.warnings;
        }

        if changes.out_of_date.is_empty() {
            // Nothing to translate; reconciliation alone leaves the build in
            // sync, so the compiler is never invoked with an empty set.
            return Ok(BuildReport {
                outcome: BuildOutcome::UpToDate,
                variant,
                removed_outputs,
                unchanged: changes.unchanged.len(),
                warnings,
            });
        }

        let spec = CompileSpec {
            sources: changes.out_of_date.iter().cloned().collect(),
            source_root: options.source_root.clone(),
            classpath: options.classpath.clone(),
            output_root: self.mapper.output_root().to_path_buf(),
            variant,
            fork: options.fork,
        };

        self.compiler.compile(&spec)?;

        Ok(BuildReport {
            outcome: BuildOutcome::Compiled {
                sources: spec.sources.len(),
            },
            variant,
            removed_outputs,
            unchanged: changes.unchanged.len(),
            warnings,
        })
    }

    pub fn mapper(&self) -> &OutputMapper {
        &self.mapper
    }
}
