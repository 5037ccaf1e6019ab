//! `setup` and `clean`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;

use crate::config::BuildConfig;
use crate::style::StyleVariant;

/// Create the input, output and temp directories and describe the expected
/// archive in `input/README.md`. Returns the directories in creation order.
pub fn setup(config: &BuildConfig) -> Result<Vec<PathBuf>> {
    let dirs = [
        config.output_dir.clone(),
        config.temp_dir.clone(),
        config.input_dir().to_path_buf(),
    ];
    for dir in &dirs {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
        debug!("Ensured {}", dir.display());
    }

    let readme = config.input_dir().join("README.md");
    fs::write(&readme, input_readme())
        .with_context(|| format!("Failed to write {}", readme.display()))?;

    Ok(dirs.into())
}

fn input_readme() -> String {
    let mut text = String::from(
        "# Icon Font Generator Input\n\n\
         Place your svg.zip file here.\n\n\
         The build expects SVG files in an \"all\" folder within the zip (or in\n\
         \"svg/all\"). Either put them in one folder per style, or give each\n\
         filename the style as a suffix:\n",
    );
    for variant in StyleVariant::PRIORITY {
        text.push_str(&format!("- filename-{}.svg\n", variant.token()));
    }
    text.push_str("\nFiles are sorted into style folders automatically.\n");
    text
}

/// What `clean` removed.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Cleaned {
    pub removed: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

/// Remove the temp directory; with `all`, also empty the output directory.
pub fn clean(config: &BuildConfig, all: bool) -> Result<Cleaned> {
    let mut cleaned = Cleaned::default();

    if config.temp_dir.exists() {
        fs::remove_dir_all(&config.temp_dir)
            .with_context(|| format!("Failed to remove {}", config.temp_dir.display()))?;
        cleaned.removed.push(config.temp_dir.clone());
    } else {
        cleaned.skipped.push(config.temp_dir.clone());
    }

    if all {
        if config.output_dir.exists() {
            empty_dir(&config.output_dir, &mut cleaned.removed)?;
        } else {
            cleaned.skipped.push(config.output_dir.clone());
        }
    }

    Ok(cleaned)
}

fn empty_dir(dir: &Path, removed: &mut Vec<PathBuf>) -> Result<()> {
    let entries = fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))?;
    let mut paths = entries
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()
        .with_context(|| format!("Failed to read {}", dir.display()))?;
    paths.sort();

    for path in paths {
        if path.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        }
        .with_context(|| format!("Failed to remove {}", path.display()))?;
        removed.push(path);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn config(root: &Path) -> BuildConfig {
        BuildConfig {
            input: root.join("input").join("svg.zip"),
            output_dir: root.join("Fonts"),
            temp_dir: root.join("temp_svgs"),
            font_timeout: Duration::from_secs(1),
        }
    }

    #[test]
    fn test_setup_creates_layout() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let created = setup(&config).unwrap();

        assert_eq!(created.len(), 3);
        assert!(dir.path().join("Fonts").is_dir());
        assert!(dir.path().join("temp_svgs").is_dir());
        let readme = fs::read_to_string(dir.path().join("input").join("README.md")).unwrap();
        assert!(readme.contains("svg.zip"));
        assert!(readme.contains("- filename-twotone.svg"));

        // Running again is harmless.
        setup(&config).unwrap();
    }

    #[test]
    fn test_clean_temp_only() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        fs::create_dir_all(config.temp_dir.join("all")).unwrap();
        fs::create_dir_all(&config.output_dir).unwrap();
        fs::write(config.output_dir.join("a.ttf"), "x").unwrap();

        let cleaned = clean(&config, false).unwrap();
        assert_eq!(cleaned.removed, vec![config.temp_dir.clone()]);
        assert!(!config.temp_dir.exists());
        assert!(config.output_dir.join("a.ttf").exists());
    }

    #[test]
    fn test_clean_all_empties_output() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        fs::create_dir_all(config.output_dir.join("nested")).unwrap();
        fs::write(config.output_dir.join("a.ttf"), "x").unwrap();

        let cleaned = clean(&config, true).unwrap();
        assert_eq!(cleaned.skipped, vec![config.temp_dir.clone()]);
        assert_eq!(cleaned.removed.len(), 2);
        assert!(config.output_dir.is_dir());
        assert_eq!(fs::read_dir(&config.output_dir).unwrap().count(), 0);
    }
}
