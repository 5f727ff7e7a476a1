//! Change-set classification
//!
//! Partitions the current source snapshot plus prior build state into three
//! disjoint sets: out-of-date (new or modified), removed, unchanged. The
//! partition is exhaustive over the union of the prior and current source
//! sets, so every file the build has ever seen lands in exactly one bucket.

use std::collections::BTreeSet;
use std::path::PathBuf;

/// Prior build state supplied by the input tracker
///
/// `sources` is the full set seen by the previous successful build;
/// `out_of_date` is the subset of current sources the tracker found newly
/// added or content-modified since then.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriorBuild {
    pub sources: BTreeSet<PathBuf>,
    pub out_of_date: BTreeSet<PathBuf>,
}

/// Result of classifying the current snapshot against the prior build
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    /// Sources requiring recompilation
    pub out_of_date: BTreeSet<PathBuf>,
    /// Sources present in the prior build but gone from the current snapshot
    pub removed: BTreeSet<PathBuf>,
    /// Sources whose outputs must not be touched
    pub unchanged: BTreeSet<PathBuf>,
}

impl ChangeSet {
    /// Nothing to compile and nothing to clean up
    pub fn is_up_to_date(&self) -> bool {
        self.out_of_date.is_empty() && self.removed.is_empty()
    }
}

/// Classify current sources against the prior build state.
///
/// With no prior build (first build, or an invalidated snapshot) the safe
/// fallback applies: everything is out-of-date and nothing is removed, since
/// we cannot positively confirm any source as gone and must not delete
/// outputs on guesswork.
pub fn classify(current: &BTreeSet<PathBuf>, prior: Option<&PriorBuild>) -> ChangeSet {
    let Some(prior) = prior else {
        return ChangeSet {
            out_of_date: current.clone(),
            removed: BTreeSet::new(),
            unchanged: BTreeSet::new(),
        };
    };

    // A path the tracker reported modified but which is absent from the
    // current snapshot counts as removed, keeping the sets disjoint.
    let out_of_date: BTreeSet<PathBuf> = prior
        .out_of_date
        .intersection(current)
        .cloned()
        .collect();
    let removed: BTreeSet<PathBuf> = prior.sources.difference(current).cloned().collect();
    let unchanged: BTreeSet<PathBuf> = current.difference(&out_of_date).cloned().collect();

    ChangeSet {
        out_of_date,
        removed,
        unchanged,
    }
}
