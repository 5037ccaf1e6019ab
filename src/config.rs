//! Default locations and limits for a build.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Where `setup` expects the archive to be dropped.
pub const INPUT_DIR: &str = "input";

/// Default input archive.
pub const DEFAULT_INPUT: &str = "input/svg.zip";

/// Default output directory for fonts, stylesheets and docs.
pub const DEFAULT_OUTPUT_DIR: &str = "Fonts";

/// Default extraction directory.
pub const DEFAULT_TEMP_DIR: &str = "temp_svgs";

/// Default deadline for compiling one font, in seconds.
pub const DEFAULT_FONT_TIMEOUT_SECS: u64 = 60;

/// Combined stylesheet name.
pub const COMBINED_CSS: &str = "saxi-icons-all.css";

/// Build metadata file name.
pub const BUILD_INFO_FILE: &str = "build-info.json";

/// Generated glyph reference.
pub const README_FILE: &str = "Icon-Font-README.md";

/// Generated demo page.
pub const DEMO_FILE: &str = "demo.html";

/// Inputs and outputs of one build run.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Zip archive or already extracted directory.
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub temp_dir: PathBuf,
    pub font_timeout: Duration,
}

impl Default for BuildConfig {
    fn default() -> Self {
        BuildConfig {
            input: PathBuf::from(DEFAULT_INPUT),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            temp_dir: PathBuf::from(DEFAULT_TEMP_DIR),
            font_timeout: Duration::from_secs(DEFAULT_FONT_TIMEOUT_SECS),
        }
    }
}

impl BuildConfig {
    pub fn output(&self, file: &str) -> PathBuf {
        self.output_dir.join(file)
    }

    pub fn input_dir(&self) -> &Path {
        self.input
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new(INPUT_DIR))
    }
}
