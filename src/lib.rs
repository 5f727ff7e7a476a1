//! Weft - incremental compilation driver for Twirl-style templates
//!
//! Weft keeps a tree of generated template sources in sync with the
//! templates they derive from. Each build it classifies the source snapshot
//! into out-of-date, removed, and unchanged sets, deletes outputs whose
//! source is gone, and hands the external template compiler exactly the
//! subset that needs translating.

pub mod changes;
pub mod compiler;
pub mod driver;
pub mod error;
pub mod fs;
pub mod mapper;
pub mod reconcile;
pub mod template;
pub mod tracker;
pub mod variant;

// Re-exports for convenience
pub use changes::{classify, ChangeSet, PriorBuild};
pub use compiler::{CompileSpec, CompilerService, JavaCompiler};
pub use driver::{BuildOptions, BuildOutcome, BuildReport, CompileDriver};
pub use error::{WeftError, WeftResult};
pub use fs::{FileSystem, LocalFs};
pub use mapper::OutputMapper;
pub use reconcile::{ReconcileReport, ReconcileWarning, StaleOutputReconciler};
pub use template::TemplateName;
pub use tracker::{discover_sources, BuildSnapshot, ChangeTracker};
pub use variant::{resolve_variant, CompilerVariant};
