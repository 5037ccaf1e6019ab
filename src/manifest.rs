use crate::codepoints::{parse_hex, CodepointMap};
use crate::config::BUILD_INFO_FILE;
use crate::style::{FontFamily, StyleVariant, FAMILIES};
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use log::debug;
use read_fonts::{FontRef, TableProvider};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// A family's codepoints as read back from its JSON mapping
#[derive(Debug, Clone)]
pub struct FamilyMapping {
    pub family: &'static FontFamily,
    pub codepoints: CodepointMap,
}

/// Which codepoints each compiled variant font actually carries
#[derive(Debug, Default)]
pub struct FontCoverage {
    fonts: BTreeMap<StyleVariant, BTreeSet<u32>>,
}

impl FontCoverage {
    pub fn insert(&mut self, variant: StyleVariant, codepoints: impl IntoIterator<Item = u32>) {
        self.fonts.entry(variant).or_default().extend(codepoints);
    }

    /// Variants of `family` whose font carries `codepoint`, in declared order.
    ///
    /// A family with no font on disk offers every variant, so the docs can
    /// still be written from the mappings alone.
    pub fn styles(&self, family: &FontFamily, codepoint: u32) -> Vec<StyleVariant> {
        if !family.variants.iter().any(|v| self.fonts.contains_key(v)) {
            return family.variants.to_vec();
        }
        family
            .variants
            .iter()
            .copied()
            .filter(|v| self.fonts.get(v).is_some_and(|cps| cps.contains(&codepoint)))
            .collect()
    }
}

/// Check every mapped codepoint against the cmap of each variant's font
pub fn read_coverage(output_dir: &Path, mappings: &[FamilyMapping]) -> Result<FontCoverage> {
    let mut coverage = FontCoverage::default();

    for mapping in mappings {
        for &variant in mapping.family.variants {
            let path = output_dir.join(format!("{}.ttf", variant.out_prefix()));
            if !path.is_file() {
                continue;
            }
            let data = std::fs::read(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let font = FontRef::new(&data)
                .map_err(|e| anyhow!("Failed to parse {}: {e}", path.display()))?;
            let cmap = font
                .cmap()
                .map_err(|e| anyhow!("No cmap in {}: {e}", path.display()))?;

            let carried = mapping
                .codepoints
                .iter()
                .map(|(_, cp)| cp)
                .filter(|cp| cmap.map_codepoint(*cp).is_some());
            coverage.insert(variant, carried);
        }
    }

    Ok(coverage)
}

/// Metadata written next to the fonts after every build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildInfo {
    pub version: String,
    pub timestamp: String,
    pub build_date: String,
    pub total_icons: usize,
}

impl BuildInfo {
    pub fn new(total_icons: usize, now: DateTime<Utc>) -> Self {
        BuildInfo {
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: now.to_rfc3339(),
            build_date: now.format("%Y-%m-%d").to_string(),
            total_icons,
        }
    }
}

/// Write `<family>.json`: icon name to hex codepoint, in codepoint order
pub fn write_mapping(
    family: &FontFamily,
    codepoints: &CodepointMap,
    output_dir: &Path,
) -> Result<PathBuf> {
    let path = output_dir.join(family.mapping_file());
    write_json(&path, &codepoints.to_hex())?;
    Ok(path)
}

/// Read every family mapping present in `output_dir`
pub fn read_mappings(output_dir: &Path) -> Result<Vec<FamilyMapping>> {
    let mut mappings = Vec::new();

    for family in &FAMILIES {
        let path = output_dir.join(family.mapping_file());
        if !path.is_file() {
            debug!("No mapping for {} at {}", family.name, path.display());
            continue;
        }
        let codepoints = read_mapping(&path)?;
        mappings.push(FamilyMapping { family, codepoints });
    }

    Ok(mappings)
}

fn read_mapping(path: &Path) -> Result<CodepointMap> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let raw: IndexMap<String, String> = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    raw.into_iter()
        .map(|(name, code)| {
            parse_hex(&code)
                .map(|cp| (name.clone(), cp))
                .ok_or_else(|| {
                    anyhow!("Invalid codepoint '{code}' for '{name}' in {}", path.display())
                })
        })
        .collect()
}

/// Write `build-info.json`
pub fn write_build_info(output_dir: &Path, info: &BuildInfo) -> Result<PathBuf> {
    let path = output_dir.join(BUILD_INFO_FILE);
    write_json(&path, info)?;
    Ok(path)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}
