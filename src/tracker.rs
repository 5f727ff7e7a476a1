//! Input tracking
//!
//! The driver consumes change information; this module produces it. A build
//! snapshot records a content hash per template source, persisted as TOML
//! next to the project. Comparing the current source tree against the
//! snapshot yields the prior-build state the classifier needs.
//!
//! Anything wrong with a snapshot - missing file, parse failure, version
//! mismatch - degrades to "no snapshot", which the classifier turns into a
//! full rebuild with no deletions. Incremental state is an optimization and
//! must never be able to fail a build.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::changes::PriorBuild;
use crate::error::{WeftError, WeftResult};
use crate::fs::FileSystem;
use crate::template::TemplateName;

/// Snapshot format version; bump on incompatible layout changes
const SNAPSHOT_VERSION: u32 = 1;

/// Default snapshot location relative to the working directory
pub const DEFAULT_STATE_PATH: &str = ".weft/state.toml";

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotFile {
    version: u32,
    /// Source path (forward slashes) -> `sha256:<hex>` content hash
    #[serde(default)]
    files: BTreeMap<String, String>,
}

/// Persisted record of the sources seen by the last successful build
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildSnapshot {
    entries: BTreeMap<PathBuf, String>,
}

impl BuildSnapshot {
    /// Load a snapshot, treating anything unreadable as absent.
    pub fn load<F: FileSystem>(fs: &F, path: &Path) -> Option<BuildSnapshot> {
        let raw = fs.read_to_string(path).ok()?;
        let parsed: SnapshotFile = toml::from_str(&raw).ok()?;
        if parsed.version != SNAPSHOT_VERSION {
            return None;
        }
        let entries = parsed
            .files
            .into_iter()
            .map(|(path, hash)| (PathBuf::from(path), hash))
            .collect();
        Some(BuildSnapshot { entries })
    }

    /// Persist the snapshot atomically.
    pub fn save<F: FileSystem>(&self, fs: &F, path: &Path) -> WeftResult<()> {
        let file = SnapshotFile {
            version: SNAPSHOT_VERSION,
            files: self
                .entries
                .iter()
                .map(|(p, h)| (normalize_key(p), h.clone()))
                .collect(),
        };
        let raw = toml::to_string_pretty(&file).map_err(|e| WeftError::Snapshot {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        fs.write_atomic(path, &raw)
    }

    pub fn sources(&self) -> BTreeSet<PathBuf> {
        self.entries.keys().cloned().collect()
    }

    pub fn hash_of(&self, path: &Path) -> Option<&str> {
        self.entries.get(path).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

fn normalize_key(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Derives prior-build state by hashing current sources against a snapshot
pub struct ChangeTracker<'a, F: FileSystem> {
    fs: &'a F,
}

impl<'a, F: FileSystem> ChangeTracker<'a, F> {
    pub fn new(fs: &'a F) -> Self {
        Self { fs }
    }

    /// Build the prior-build view the classifier consumes: the snapshot's
    /// source set plus the subset of current sources that are new or whose
    /// content hash changed.
    pub fn prior_build(
        &self,
        snapshot: &BuildSnapshot,
        current: &BTreeSet<PathBuf>,
    ) -> WeftResult<PriorBuild> {
        let mut out_of_date = BTreeSet::new();
        for path in current {
            match snapshot.hash_of(path) {
                Some(recorded) => {
                    let actual = self.fs.hash_file(path)?;
                    if actual != recorded {
                        out_of_date.insert(path.clone());
                    }
                }
                None => {
                    out_of_date.insert(path.clone());
                }
            }
        }

        Ok(PriorBuild {
            sources: snapshot.sources(),
            out_of_date,
        })
    }

    /// Hash every current source into a fresh snapshot for persisting after
    /// a successful build.
    pub fn snapshot(&self, current: &BTreeSet<PathBuf>) -> WeftResult<BuildSnapshot> {
        let mut entries = BTreeMap::new();
        for path in current {
            entries.insert(path.clone(), self.fs.hash_file(path)?);
        }
        Ok(BuildSnapshot { entries })
    }
}

/// Discover template sources under a source root.
///
/// Walks the tree honoring ignore files and keeps every file whose name has
/// at least three dot-separated segments. Results are sorted for
/// deterministic classification and specs.
pub fn discover_sources(source_root: &Path) -> WeftResult<BTreeSet<PathBuf>> {
    if !source_root.is_dir() {
        return Err(WeftError::SourceDirNotFound {
            path: source_root.to_path_buf(),
        });
    }

    let mut sources = BTreeSet::new();
    for entry in ignore::WalkBuilder::new(source_root).build() {
        let entry = entry.map_err(|e| WeftError::Io(std::io::Error::other(e.to_string())))?;
        let path = entry.path();
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        if TemplateName::matches(&file_name) {
            sources.insert(path.to_path_buf());
        }
    }
    Ok(sources)
}
