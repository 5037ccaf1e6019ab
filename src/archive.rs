//! Unpack the icon archive and sort its SVGs into style buckets.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info, warn};
use walkdir::WalkDir;

use crate::classify::{classify_directory, classify_filename, classify_in_style_dir, ClassifiedIcon};
use crate::error::{BuildError, ClassifyError, Unclassified};
use crate::style::StyleVariant;

/// Per-variant icon sources, keyed (and therefore sorted) by icon name.
#[derive(Debug, Default)]
pub struct StyleBuckets {
    icons: BTreeMap<StyleVariant, BTreeMap<String, PathBuf>>,
    /// Entries that matched no style.
    pub unclassified: Vec<Unclassified>,
    /// Files whose icon name was already taken in the same variant.
    pub duplicates: Vec<PathBuf>,
}

impl StyleBuckets {
    /// Add an icon; the first path for a name wins.
    pub fn insert(&mut self, icon: ClassifiedIcon, path: PathBuf) -> bool {
        let bucket = self.icons.entry(icon.variant).or_default();
        if bucket.contains_key(&icon.name) {
            warn!(
                "Duplicate {} icon '{}' from {}, keeping the first one",
                icon.variant,
                icon.name,
                path.display()
            );
            self.duplicates.push(path);
            return false;
        }
        bucket.insert(icon.name, path);
        true
    }

    pub fn reject(&mut self, path: PathBuf, reason: ClassifyError) {
        warn!("Could not determine style for {}: {reason}", path.display());
        self.unclassified.push(Unclassified { path, reason });
    }

    /// Icons of one variant in ascending name order.
    pub fn icons(&self, variant: StyleVariant) -> impl Iterator<Item = (&str, &Path)> + '_ {
        self.icons
            .get(&variant)
            .into_iter()
            .flatten()
            .map(|(name, path)| (name.as_str(), path.as_path()))
    }

    pub fn count(&self, variant: StyleVariant) -> usize {
        self.icons.get(&variant).map_or(0, BTreeMap::len)
    }
}

/// Resolve the input into the `all/` directory holding the icons.
///
/// A directory is used in place; a zip archive is extracted into `temp_dir`
/// first, replacing whatever was there.
pub fn prepare_icon_root(input: &Path, temp_dir: &Path) -> Result<PathBuf> {
    if !input.exists() {
        return Err(BuildError::MissingInput(input.to_path_buf()).into());
    }

    let root = if input.is_dir() {
        info!("Using extracted icons in {}", input.display());
        input.to_path_buf()
    } else {
        let count = extract_zip(input, temp_dir)?;
        info!("Extracted {count} entries from {}", input.display());
        temp_dir.to_path_buf()
    };

    Ok(find_all_dir(&root)?)
}

/// Extract `zip_path` into a freshly emptied `dest`.
pub fn extract_zip(zip_path: &Path, dest: &Path) -> Result<usize> {
    if dest.exists() {
        fs::remove_dir_all(dest)
            .with_context(|| format!("Failed to clear {}", dest.display()))?;
    }
    fs::create_dir_all(dest).with_context(|| format!("Failed to create {}", dest.display()))?;

    let file =
        File::open(zip_path).with_context(|| format!("Failed to open {}", zip_path.display()))?;
    let mut archive = zip::ZipArchive::new(file)
        .with_context(|| format!("Failed to read zip archive {}", zip_path.display()))?;
    let count = archive.len();
    archive
        .extract(dest)
        .with_context(|| format!("Failed to extract into {}", dest.display()))?;

    Ok(count)
}

/// Locate `all/` directly under `root` or under `root/svg`.
pub fn find_all_dir(root: &Path) -> Result<PathBuf, BuildError> {
    [root.join("all"), root.join("svg").join("all")]
        .into_iter()
        .find(|candidate| candidate.is_dir())
        .ok_or_else(|| BuildError::MissingAllDirectory(root.to_path_buf()))
}

/// Classify every entry of `all_dir` into style buckets.
///
/// Style directories contribute their SVGs; loose SVGs are classified by
/// suffix. Everything else is recorded in [`StyleBuckets::unclassified`].
pub fn sort_by_style(all_dir: &Path) -> Result<StyleBuckets> {
    let mut buckets = StyleBuckets::default();

    for entry in sorted_children(all_dir) {
        let entry = entry.with_context(|| format!("Failed to read {}", all_dir.display()))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_hidden(&name) {
            continue;
        }
        let path = entry.into_path();

        if path.is_dir() {
            match classify_directory(&name) {
                Ok(variant) => collect_style_dir(&path, variant, &mut buckets)?,
                Err(reason) => reject_tree(&path, reason, &mut buckets)?,
            }
        } else {
            match classify_filename(&name) {
                Ok(icon) => {
                    buckets.insert(icon, path);
                }
                Err(reason) => buckets.reject(path, reason),
            }
        }
    }

    for variant in StyleVariant::PRIORITY {
        debug!("{variant}: {} icons", buckets.count(variant));
    }
    if !buckets.unclassified.is_empty() {
        warn!("{} entries matched no style", buckets.unclassified.len());
    }

    Ok(buckets)
}

fn collect_style_dir(dir: &Path, variant: StyleVariant, buckets: &mut StyleBuckets) -> Result<()> {
    let mut copied = 0;
    for entry in sorted_children(dir) {
        let entry = entry.with_context(|| format!("Failed to read {}", dir.display()))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_hidden(&name) {
            continue;
        }
        let path = entry.into_path();
        if path.is_dir() {
            buckets.reject(path, ClassifyError::NotSvg(name));
            continue;
        }
        match classify_in_style_dir(&name, variant) {
            Ok(icon) => {
                if buckets.insert(icon, path) {
                    copied += 1;
                }
            }
            Err(reason) => buckets.reject(path, reason),
        }
    }
    debug!("Collected {copied} SVG files from {}", dir.display());
    Ok(())
}

/// Report every file below an unrecognised directory.
fn reject_tree(dir: &Path, reason: ClassifyError, buckets: &mut StyleBuckets) -> Result<()> {
    let mut any = false;
    for entry in WalkDir::new(dir).min_depth(1).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to read {}", dir.display()))?;
        if entry.file_type().is_file() && !is_hidden(&entry.file_name().to_string_lossy()) {
            buckets.reject(entry.into_path(), reason.clone());
            any = true;
        }
    }
    if !any {
        buckets.reject(dir.to_path_buf(), reason);
    }
    Ok(())
}

fn sorted_children(dir: &Path) -> walkdir::IntoIter {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}
