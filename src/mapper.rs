//! Output path mapping
//!
//! Maps a template source to the generated file the compiler will produce
//! for it: `<output_root>/views/<media>/<stem>.template.<target_extension>`.
//!
//! The mapping is a pure function of the source identity. That matters for
//! removal handling: when a source is deleted we can no longer ask the
//! compiler where its output went, so the path must be recomputable from the
//! file name alone.

use std::path::{Path, PathBuf};

use crate::error::WeftResult;
use crate::template::TemplateName;

/// Deterministic source-to-output path mapper
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputMapper {
    output_root: PathBuf,
    target_extension: String,
}

impl OutputMapper {
    /// Create a mapper for the given output root and target extension
    pub fn new(output_root: impl Into<PathBuf>, target_extension: impl Into<String>) -> Self {
        Self {
            output_root: output_root.into(),
            target_extension: target_extension.into(),
        }
    }

    /// Create a mapper producing Scala sources, the standard target
    pub fn scala(output_root: impl Into<PathBuf>) -> Self {
        Self::new(output_root, "scala")
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Compute the output path for a template source.
    ///
    /// Fails with [`crate::error::WeftError::Mapping`] when the source name
    /// has fewer than three dot-separated segments.
    pub fn map(&self, source: &Path) -> WeftResult<PathBuf> {
        let name = TemplateName::parse(source)?;
        Ok(self
            .output_root
            .join("views")
            .join(&name.media)
            .join(format!("{}.template.{}", name.stem, self.target_extension)))
    }
}
