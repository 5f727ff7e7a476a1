//! Stale output reconciliation
//!
//! Deletes generated files whose source template no longer exists. Deletion
//! is best-effort and idempotent: a target that is already gone counts as
//! reconciled, and IO failures are collected as warnings rather than
//! aborting the remaining entries. Only a mapping failure is fatal, since it
//! means we cannot tell where a removed source's output lives.

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::Serialize;

use crate::error::WeftResult;
use crate::fs::FileSystem;
use crate::mapper::OutputMapper;

/// A non-fatal deletion failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconcileWarning {
    pub output: PathBuf,
    pub message: String,
}

/// Outcome of a reconciliation pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    /// Outputs confirmed absent after the pass (deleted now or already gone)
    pub reconciled: usize,
    /// Deletions that failed for reasons other than the file being gone
    pub warnings: Vec<ReconcileWarning>,
}

/// Removes outputs owned by removed sources
pub struct StaleOutputReconciler<'a, F: FileSystem> {
    mapper: &'a OutputMapper,
    fs: &'a F,
}

impl<'a, F: FileSystem> StaleOutputReconciler<'a, F> {
    pub fn new(mapper: &'a OutputMapper, fs: &'a F) -> Self {
        Self { mapper, fs }
    }

    /// Delete the output of every removed source.
    ///
    /// Errors only when a removed source's name cannot be mapped to an
    /// output path; everything else is reported in the returned
    /// [`ReconcileReport`].
    pub fn reconcile(&self, removed: &BTreeSet<PathBuf>) -> WeftResult<ReconcileReport> {
        let mut report = ReconcileReport::default();

        for source in removed {
            let output = self.mapper.map(source)?;

            match self.fs.remove_file(&output) {
                Ok(()) => report.reconciled += 1,
                Err(e) if e.is_not_found() => {
                    // Already gone, e.g. a previous partial run got here first
                    report.reconciled += 1;
                }
                Err(e) => report.warnings.push(ReconcileWarning {
                    output,
                    message: e.to_string(),
                }),
            }
        }

        Ok(report)
    }
}
