//! The full build: archive to fonts, mappings, stylesheets and docs.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::{info, warn};
use walkdir::WalkDir;

use crate::archive::{prepare_icon_root, sort_by_style, StyleBuckets};
use crate::codepoints::plan_family;
use crate::compile::{compile_variant, CompiledFont};
use crate::config::{BuildConfig, COMBINED_CSS, DEMO_FILE, README_FILE};
use crate::manifest::{
    read_coverage, read_mappings, write_build_info, write_mapping, BuildInfo,
};
use crate::preview::render_demo;
use crate::readme::render_readme;
use crate::style::{StyleVariant, FAMILIES};
use crate::stylesheet::{combined_css, family_css};

/// What one family contributed to a build.
#[derive(Debug)]
pub struct FamilyReport {
    pub family: &'static str,
    pub icons: usize,
    pub fonts: Vec<CompiledFont>,
}

#[derive(Debug)]
pub struct BuildReport {
    pub families: Vec<FamilyReport>,
    pub total_icons: usize,
    pub unclassified: usize,
    pub duplicates: usize,
}

/// Run a complete build.
///
/// Font failures abort the build. The Markdown reference and the demo page
/// are best effort and only logged when they fail.
pub fn build(config: &BuildConfig) -> Result<BuildReport> {
    let all_dir = prepare_icon_root(&config.input, &config.temp_dir)?;
    info!("Sorting icons from {}", all_dir.display());
    let buckets = sort_by_style(&all_dir)?;
    log_counts(&buckets);

    fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("Failed to create {}", config.output_dir.display()))?;

    let mut families = Vec::with_capacity(FAMILIES.len());
    let mut sheets = Vec::with_capacity(FAMILIES.len());

    for family in &FAMILIES {
        let plan = plan_family(family, &buckets)?;
        if plan.codepoints.is_empty() {
            warn!("No icons found for {}", family.name);
        } else {
            info!("{}: {} unique icons", family.name, plan.icon_count());
        }

        let mut fonts = Vec::new();
        for subset in &plan.variants {
            match compile_variant(subset, &config.output_dir, config.font_timeout)
                .with_context(|| format!("Failed to generate {} font", subset.variant))?
            {
                Some(font) => {
                    info!(
                        "Generated {} ({} glyphs)",
                        font.path.display(),
                        font.glyph_count
                    );
                    fonts.push(font);
                }
                None => remove_stale_font(subset.variant, &config.output_dir)?,
            }
        }

        write_mapping(family, &plan.codepoints, &config.output_dir)?;

        let compiled: Vec<StyleVariant> = fonts.iter().map(|f| f.variant).collect();
        let css = family_css(&plan, &compiled);
        let css_file = family.stylesheet_file();
        let css_path = config.output(&css_file);
        fs::write(&css_path, &css)
            .with_context(|| format!("Failed to write {}", css_path.display()))?;
        sheets.push((css_file, css));

        families.push(FamilyReport {
            family: family.name,
            icons: plan.icon_count(),
            fonts,
        });
    }

    let combined = combined_css(sheets.iter().map(|(file, css)| (file.as_str(), css.as_str())));
    let combined_path = config.output(COMBINED_CSS);
    fs::write(&combined_path, combined)
        .with_context(|| format!("Failed to write {}", combined_path.display()))?;

    let total_icons = families.iter().map(|f| f.icons).sum();
    let now = Utc::now();
    write_build_info(&config.output_dir, &BuildInfo::new(total_icons, now))?;

    if let Err(err) = generate_docs(&config.output_dir, now) {
        warn!("Failed to generate icon documentation: {err:#}");
    }
    if let Err(err) = generate_demo(&config.output_dir) {
        warn!("Failed to generate demo page: {err:#}");
    }

    Ok(BuildReport {
        families,
        total_icons,
        unclassified: buckets.unclassified.len(),
        duplicates: buckets.duplicates.len(),
    })
}

/// A variant that is empty now must not leave an earlier build's font behind.
fn remove_stale_font(variant: StyleVariant, output_dir: &Path) -> Result<()> {
    let path = output_dir.join(format!("{}.ttf", variant.out_prefix()));
    if path.is_file() {
        fs::remove_file(&path)
            .with_context(|| format!("Failed to remove {}", path.display()))?;
        info!("Removed stale {}", path.display());
    }
    Ok(())
}

fn log_counts(buckets: &StyleBuckets) {
    for variant in StyleVariant::PRIORITY {
        info!("{variant}: {} icons", buckets.count(variant));
    }
    if !buckets.duplicates.is_empty() {
        info!("Skipped {} duplicate icons", buckets.duplicates.len());
    }
}

/// Write `Icon-Font-README.md` from the mappings in `output_dir`.
pub fn generate_docs(output_dir: &Path, now: DateTime<Utc>) -> Result<PathBuf> {
    let mappings = read_mappings(output_dir)?;
    let coverage = read_coverage(output_dir, &mappings)?;
    let path = output_dir.join(README_FILE);
    let date = now.format("%Y-%m-%d").to_string();
    fs::write(&path, render_readme(&mappings, &coverage, &date))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Wrote {}", path.display());
    Ok(path)
}

/// Write `demo.html` from the mappings in `output_dir`.
pub fn generate_demo(output_dir: &Path) -> Result<PathBuf> {
    let mappings = read_mappings(output_dir)?;
    let coverage = read_coverage(output_dir, &mappings)?;
    let path = output_dir.join(DEMO_FILE);
    fs::write(&path, render_demo(&mappings, &coverage))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Wrote {}", path.display());
    Ok(path)
}

/// Files directly inside `output_dir` with their sizes, sorted by name.
pub fn list_outputs(output_dir: &Path) -> Result<Vec<(PathBuf, u64)>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(output_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.with_context(|| format!("Failed to read {}", output_dir.display()))?;
        if entry.file_type().is_file() {
            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
            files.push((entry.into_path(), size));
        }
    }
    Ok(files)
}

/// `512 B`, `1.5 KB`, `2.3 MB`.
pub fn human_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    let value = bytes as f64;
    if value < KB {
        format!("{bytes} B")
    } else if value < KB * KB {
        format!("{:.1} KB", value / KB)
    } else {
        format!("{:.1} MB", value / (KB * KB))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><path d="M2 2h20v20H2z"/></svg>"#;

    fn write_svg(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, SVG).unwrap();
    }

    fn config(root: &Path) -> BuildConfig {
        BuildConfig {
            input: root.join("src"),
            output_dir: root.join("Fonts"),
            temp_dir: root.join("temp"),
            font_timeout: Duration::from_secs(60),
        }
    }

    #[test]
    fn test_build_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        let all = dir.path().join("src").join("all");
        write_svg(&all.join("bold").join("home.svg"));
        write_svg(&all.join("bold").join("archive.svg"));
        write_svg(&all.join("home-linear.svg"));
        write_svg(&all.join("bell-twotone.svg"));
        write_svg(&all.join("stray.svg"));
        fs::write(all.join("notes.txt"), "x").unwrap();

        let config = config(dir.path());
        let report = build(&config).unwrap();

        assert_eq!(report.families[0].icons, 2);
        assert_eq!(report.families[0].fonts.len(), 2);
        assert_eq!(report.families[1].icons, 1);
        assert_eq!(report.total_icons, 3);
        assert_eq!(report.unclassified, 2);

        let out = &config.output_dir;
        assert!(out.join("saxi-icons-pro-bold.ttf").is_file());
        assert!(out.join("saxi-icons-pro-linear.ttf").is_file());
        assert!(!out.join("saxi-icons-pro-outline.ttf").exists());
        assert!(out.join("saxi-icons-pro-twotone.ttf").is_file());
        for file in [
            "saxi-icons-pro.json",
            "saxi-icons-pro-twotone.json",
            "saxi-icons-pro.css",
            "saxi-icons-pro-twotone.css",
            COMBINED_CSS,
            "build-info.json",
            README_FILE,
            DEMO_FILE,
        ] {
            assert!(out.join(file).is_file(), "missing {file}");
        }

        // Bold lists archive then home, linear adds nothing new.
        let mapping = fs::read_to_string(out.join("saxi-icons-pro.json")).unwrap();
        assert_eq!(mapping, "{\n  \"archive\": \"E900\",\n  \"home\": \"E901\"\n}");

        let info: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out.join("build-info.json")).unwrap())
                .unwrap();
        assert_eq!(info["totalIcons"], 3);

        // The two-tone bell is shown in a style that has it.
        let demo = fs::read_to_string(out.join(DEMO_FILE)).unwrap();
        assert!(demo.contains(r#"data-name="bell" data-styles="saxi-twotone""#));
        assert!(demo.contains(r#"<i class="saxi-twotone saxi-bell"></i>"#));
        assert!(demo.contains(r#"data-name="archive" data-styles="saxi-solid""#));
        let docs = fs::read_to_string(out.join(README_FILE)).unwrap();
        assert!(docs.contains(
            "| `saxi-solid`, `saxi-regular` | `<i class=\"saxi-solid saxi-home\"></i>` |"
        ));
    }

    #[test]
    fn test_rebuild_removes_fonts_of_empty_variants() {
        let dir = tempfile::tempdir().unwrap();
        let all = dir.path().join("src").join("all");
        write_svg(&all.join("bold").join("home.svg"));

        let config = config(dir.path());
        let stale = config.output_dir.join("saxi-icons-pro-outline.ttf");
        fs::create_dir_all(&config.output_dir).unwrap();
        fs::write(&stale, "old font").unwrap();

        build(&config).unwrap();
        assert!(!stale.exists());
        assert!(config.output_dir.join("saxi-icons-pro-bold.ttf").is_file());

        let css = fs::read_to_string(config.output_dir.join("saxi-icons-pro.css")).unwrap();
        assert!(!css.contains("saxi-icons-pro-outline.ttf"));
    }

    #[test]
    fn test_missing_input_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = build(&config(dir.path())).unwrap_err();
        assert!(err.to_string().contains("setup"));
    }

    #[test]
    fn test_docs_and_demo_from_existing_mappings() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("saxi-icons-pro.json"),
            "{\n  \"home\": \"E900\"\n}",
        )
        .unwrap();

        let docs = generate_docs(dir.path(), Utc::now()).unwrap();
        assert!(fs::read_to_string(docs).unwrap().contains("`home`"));
        let demo = generate_demo(dir.path()).unwrap();
        assert!(fs::read_to_string(demo).unwrap().contains(r#"data-name="home""#));
    }

    #[test]
    fn test_list_outputs_sorted() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.css"), "bb").unwrap();
        fs::write(dir.path().join("a.ttf"), "a").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();

        let files = list_outputs(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|(p, size)| (p.file_name().unwrap().to_string_lossy().into_owned(), *size))
            .collect();
        assert_eq!(names, vec![("a.ttf".to_string(), 1), ("b.css".to_string(), 2)]);
    }

    #[test]
    fn test_human_size() {
        assert_eq!(human_size(512), "512 B");
        assert_eq!(human_size(1536), "1.5 KB");
        assert_eq!(human_size(3 * 1024 * 1024), "3.0 MB");
    }
}
