//! Template identity
//!
//! A template source is identified by its file name, read as dot-separated
//! segments: `<name>.<format>.<media>`, e.g. `Index.scala.html`. The segments
//! determine where the generated source lands, so identity must be derivable
//! without asking the compiler.

use std::path::Path;

use crate::error::{WeftError, WeftResult};

/// Parsed identity of a template source file
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct TemplateName {
    /// First segment, the bare template name (`Index`)
    pub stem: String,
    /// Second segment, the generated-source format (`scala`)
    pub format: String,
    /// Third segment, the media type grouping outputs (`html`)
    pub media: String,
}

impl TemplateName {
    /// Parse a template identity from a source path's file name.
    ///
    /// Fails with [`WeftError::Mapping`] when the name has fewer than three
    /// dot-separated segments. Names with more than three segments keep the
    /// first and third, matching the established output convention.
    pub fn parse(path: &Path) -> WeftResult<TemplateName> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let segments: Vec<&str> = file_name.split('.').collect();
        if segments.len() < 3 || segments.iter().take(3).any(|s| s.is_empty()) {
            return Err(WeftError::Mapping { file: file_name });
        }

        Ok(TemplateName {
            stem: segments[0].to_string(),
            format: segments[1].to_string(),
            media: segments[2].to_string(),
        })
    }

    /// Check whether a file name looks like a template without constructing
    /// the identity. Used by source discovery.
    pub fn matches(file_name: &str) -> bool {
        let segments: Vec<&str> = file_name.split('.').collect();
        segments.len() >= 3 && segments.iter().take(3).all(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn parse_standard_template_name() {
        let name = TemplateName::parse(&PathBuf::from("app/views/Index.scala.html")).unwrap();
        assert_eq!(name.stem, "Index");
        assert_eq!(name.format, "scala");
        assert_eq!(name.media, "html");
    }

    #[test]
    fn parse_extra_segments_keeps_first_and_third() {
        let name = TemplateName::parse(&PathBuf::from("Main.scala.txt.bak")).unwrap();
        assert_eq!(name.stem, "Main");
        assert_eq!(name.media, "txt");
    }

    #[test]
    fn parse_single_segment_is_mapping_error() {
        let err = TemplateName::parse(&PathBuf::from("bad")).unwrap_err();
        assert!(matches!(err, WeftError::Mapping { file } if file == "bad"));
    }

    #[test]
    fn parse_two_segments_is_mapping_error() {
        let err = TemplateName::parse(&PathBuf::from("bad.html")).unwrap_err();
        assert!(matches!(err, WeftError::Mapping { .. }));
    }

    #[test]
    fn parse_empty_segment_is_mapping_error() {
        // "a..html" splits into ["a", "", "html"]
        let err = TemplateName::parse(&PathBuf::from("a..html")).unwrap_err();
        assert!(matches!(err, WeftError::Mapping { .. }));
    }

    #[test]
    fn matches_filters_non_templates() {
        assert!(TemplateName::matches("Index.scala.html"));
        assert!(TemplateName::matches("About.scala.txt"));
        assert!(!TemplateName::matches("README.md"));
        assert!(!TemplateName::matches("build.sbt"));
        assert!(!TemplateName::matches(".hidden.swp"));
    }
}
