//! Error types for classification, allocation and font generation.

use std::path::PathBuf;

use crate::style::StyleVariant;

/// Why an entry of the icon archive could not be put into a style bucket.
///
/// These are warnings: the entry is skipped and the build continues.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClassifyError {
    /// A directory whose name is not a style token.
    #[error("'{0}' is not a style directory")]
    UnknownStyleDirectory(String),

    /// An SVG filename without a recognised `-<style>` suffix.
    #[error("'{0}' has no style suffix")]
    MissingStyleSuffix(String),

    /// Anything that is not an `.svg` file.
    #[error("'{0}' is not an SVG file")]
    NotSvg(String),

    /// Stripping the suffix left nothing behind, e.g. `-bold.svg`.
    #[error("'{0}' has an empty icon name")]
    EmptyName(String),
}

/// A classification failure tied to the file that caused it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unclassified {
    pub path: PathBuf,
    pub reason: ClassifyError,
}

/// Hard failures of the build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Input archive or directory is missing.
    #[error(
        "Input '{0}' not found; run `saxi-fonts setup` and place svg.zip in the input directory"
    )]
    MissingInput(PathBuf),

    /// The extracted tree has no `all` icon directory.
    #[error("No \"all\" directory found under '{0}' (looked for all/ and svg/all/)")]
    MissingAllDirectory(PathBuf),

    /// An icon ended up with two codepoints inside one family.
    #[error("Icon '{name}' got U+{expected:04X} in {family} but U+{found:04X} for {variant}")]
    AllocationInconsistency {
        family: &'static str,
        variant: StyleVariant,
        name: String,
        expected: u32,
        found: u32,
    },

    /// A variant carries an icon the family map never assigned.
    #[error("Icon '{name}' has no codepoint in {family}")]
    UnallocatedIcon { family: &'static str, name: String },

    /// The font worker did not finish before its deadline.
    #[error("Timed out after {seconds}s generating the {variant} font")]
    FontTimeout { variant: StyleVariant, seconds: u64 },

    /// The font worker thread died without reporting a result.
    #[error("Font worker for {0} exited without a result")]
    FontWorkerLost(StyleVariant),

    /// The written font does not contain what was requested.
    #[error("Font '{path}' failed verification: {message}")]
    Verification { path: PathBuf, message: String },
}
