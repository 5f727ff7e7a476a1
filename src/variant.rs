//! Compiler variant resolution
//!
//! The template compiler dialect shifted between toolchain generations: the
//! entry point, the formatter type, and the implicit import list all differ.
//! Rather than looking classes up reflectively at run time, the known
//! profiles form a closed enum and the toolchain classpath is sniffed for a
//! version-carrying artifact name to pick one.

use std::path::Path;

use serde::Serialize;

/// A version-specific compiler profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CompilerVariant {
    /// Play 2.2.x built-in template compiler
    V22x,
    /// Standalone Twirl 1.0.2 compiler
    V102,
}

impl CompilerVariant {
    /// Fallback used when the classpath carries no recognizable artifact
    pub const DEFAULT: CompilerVariant = CompilerVariant::V102;

    /// Fully qualified entry point of the compiler
    pub fn entry_point(self) -> &'static str {
        match self {
            CompilerVariant::V22x => "play.templates.ScalaTemplateCompiler",
            CompilerVariant::V102 => "play.twirl.compiler.TwirlCompiler",
        }
    }

    /// Formatter type applied to generated templates by default
    pub fn formatter_type(self) -> &'static str {
        match self {
            CompilerVariant::V22x => "play.api.templates.HtmlFormat",
            CompilerVariant::V102 => "play.twirl.api.HtmlFormat",
        }
    }

    /// Imports implicitly prepended to every generated template
    pub fn default_imports(self) -> &'static str {
        match self {
            CompilerVariant::V22x => {
                "import play.api.templates._\n\
                 import play.api.templates.PlayMagic._\n\
                 import models._\n\
                 import controllers._\n\
                 import play.api.i18n._\n\
                 import play.api.mvc._\n\
                 import play.api.data._\n\
                 import views.html._"
            }
            CompilerVariant::V102 => "import controllers._",
        }
    }

    /// Select the variant for a detected compiler version string.
    ///
    /// Unknown versions fall back to [`CompilerVariant::DEFAULT`]; a
    /// toolchain without variant metadata must still compile.
    pub fn from_version(version: &str) -> CompilerVariant {
        if version.starts_with("2.2.") {
            CompilerVariant::V22x
        } else {
            CompilerVariant::V102
        }
    }
}

/// Resolve the compiler variant from toolchain classpath entries.
///
/// Scans entry file names for
/// `(templates-compiler|twirl-compiler)_<major.minor>-<x.y.z>.jar` and picks
/// the variant for the first embedded semantic version found. No match
/// resolves to the default variant, never an error.
pub fn resolve_variant(classpath: &[impl AsRef<Path>]) -> CompilerVariant {
    classpath
        .iter()
        .filter_map(|entry| {
            entry
                .as_ref()
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(detect_version)
        })
        .next()
        .map(|version| CompilerVariant::from_version(&version))
        .unwrap_or(CompilerVariant::DEFAULT)
}

/// Extract the semantic version from a compiler artifact file name
fn detect_version(file_name: &str) -> Option<String> {
    let rest = file_name.strip_suffix(".jar")?;
    let rest = rest
        .strip_prefix("templates-compiler_")
        .or_else(|| rest.strip_prefix("twirl-compiler_"))?;

    // `<binary>-<semver>`, e.g. `2.10-1.0.2`
    let (binary, semver) = rest.split_once('-')?;
    if !is_dotted_number(binary, 2) || !is_dotted_number(semver, 3) {
        return None;
    }
    Some(semver.to_string())
}

fn is_dotted_number(s: &str, parts: usize) -> bool {
    let segments: Vec<&str> = s.split('.').collect();
    segments.len() == parts
        && segments
            .iter()
            .all(|seg| !seg.is_empty() && seg.bytes().all(|b| b.is_ascii_digit()))
}
