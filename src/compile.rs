//! Per-variant font compilation under a deadline.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use log::{debug, info, warn};

use crate::codepoints::VariantGlyphs;
use crate::error::BuildError;
use crate::font_builder::{build_font, verify_font, FontGlyph, FontStyle};
use crate::style::StyleVariant;
use crate::svg_parser::load_outline;

/// A font written to disk and verified.
#[derive(Debug, Clone)]
pub struct CompiledFont {
    pub variant: StyleVariant,
    pub path: PathBuf,
    pub size: usize,
    pub glyph_count: usize,
}

/// Compile one variant into `<out_prefix>.ttf`, named after its family.
///
/// Returns `Ok(None)` without starting a worker when the variant has no
/// icons. The worker gets `deadline` to finish; on timeout it is told to stop
/// and nothing is written.
pub fn compile_variant(
    subset: &VariantGlyphs,
    output_dir: &Path,
    deadline: Duration,
) -> Result<Option<CompiledFont>> {
    let variant = subset.variant;
    let family_name = variant.family().name;
    if subset.glyphs.is_empty() {
        warn!("No SVG files found for {variant} style, skipping");
        return Ok(None);
    }

    info!(
        "Generating {family_name} {variant} (weight {}) with {} icons",
        variant.weight(),
        subset.glyphs.len()
    );
    let started = Instant::now();
    let data = run_with_deadline(family_name, subset.clone(), deadline)?;
    debug!("Built {variant} in {:.2}s", started.elapsed().as_secs_f64());

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;
    let path = output_dir.join(format!("{}.ttf", variant.out_prefix()));
    std::fs::write(&path, &data).with_context(|| format!("Failed to write {}", path.display()))?;

    let codepoints: Vec<u32> = subset.glyphs.iter().map(|g| g.codepoint).collect();
    verify_font(&data, &codepoints, variant.weight()).map_err(|message| {
        BuildError::Verification {
            path: path.clone(),
            message,
        }
    })?;

    Ok(Some(CompiledFont {
        variant,
        path,
        size: data.len(),
        glyph_count: codepoints.len(),
    }))
}

fn run_with_deadline(
    family_name: &'static str,
    subset: VariantGlyphs,
    deadline: Duration,
) -> Result<Vec<u8>> {
    let variant = subset.variant;
    let cancelled = Arc::new(AtomicBool::new(false));
    let (tx, rx) = mpsc::channel();

    let flag = Arc::clone(&cancelled);
    thread::Builder::new()
        .name(format!("font-{}", variant.token()))
        .spawn(move || {
            // The receiver is gone after a timeout; the result is dropped.
            let _ = tx.send(render(family_name, &subset, &flag));
        })
        .context("Failed to spawn font worker")?;

    match rx.recv_timeout(deadline) {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout) => {
            cancelled.store(true, Ordering::Relaxed);
            Err(BuildError::FontTimeout {
                variant,
                seconds: deadline.as_secs(),
            }
            .into())
        }
        Err(RecvTimeoutError::Disconnected) => Err(BuildError::FontWorkerLost(variant).into()),
    }
}

fn render(family_name: &str, subset: &VariantGlyphs, cancelled: &AtomicBool) -> Result<Vec<u8>> {
    let mut glyphs = Vec::with_capacity(subset.glyphs.len());
    for source in &subset.glyphs {
        if cancelled.load(Ordering::Relaxed) {
            bail!("{} font generation cancelled", subset.variant);
        }
        glyphs.push(FontGlyph {
            name: source.name.clone(),
            codepoint: source.codepoint,
            outline: load_outline(&source.path)?,
        });
    }

    build_font(
        &glyphs,
        FontStyle {
            family: family_name,
            subfamily: subset.variant.label(),
            weight: subset.variant.weight(),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codepoints::GlyphSource;

    const SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><path d="M4 4h16v16H4z"/></svg>"#;

    fn subset(dir: &Path, variant: StyleVariant, names: &[&str]) -> VariantGlyphs {
        let glyphs = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let path = dir.join(format!("{name}.svg"));
                std::fs::write(&path, SVG).unwrap();
                GlyphSource {
                    name: name.to_string(),
                    path,
                    codepoint: 0xE900 + i as u32,
                }
            })
            .collect();
        VariantGlyphs { variant, glyphs }
    }

    #[test]
    fn test_compiles_and_verifies() {
        let dir = tempfile::tempdir().unwrap();
        let subset = subset(dir.path(), StyleVariant::Outline, &["a", "b", "c"]);
        let out = dir.path().join("Fonts");

        let font = compile_variant(&subset, &out, Duration::from_secs(60))
            .unwrap()
            .unwrap();
        assert_eq!(font.path, out.join("saxi-icons-pro-outline.ttf"));
        assert_eq!(font.glyph_count, 3);
        assert!(font.path.is_file());
    }

    #[test]
    fn test_empty_variant_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let subset = VariantGlyphs {
            variant: StyleVariant::Bulk,
            glyphs: Vec::new(),
        };
        let result = compile_variant(&subset, dir.path(), Duration::ZERO);
        assert!(result.unwrap().is_none());
        assert!(!dir.path().join("saxi-icons-pro-bulk.ttf").exists());
    }

    #[test]
    fn test_broken_svg_fails_the_variant() {
        let dir = tempfile::tempdir().unwrap();
        let mut subset = subset(dir.path(), StyleVariant::Bold, &["ok"]);
        let bad = dir.path().join("bad.svg");
        std::fs::write(&bad, "<svg").unwrap();
        subset.glyphs.push(GlyphSource {
            name: "bad".into(),
            path: bad,
            codepoint: 0xE901,
        });

        let err = compile_variant(&subset, dir.path(), Duration::from_secs(60)).unwrap_err();
        assert!(format!("{err:#}").contains("bad.svg"));
    }

    #[test]
    fn test_deadline_exceeded() {
        let dir = tempfile::tempdir().unwrap();
        let names: Vec<String> = (0..200).map(|i| format!("icon{i}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let subset = subset(dir.path(), StyleVariant::Linear, &refs);

        let err = compile_variant(&subset, dir.path(), Duration::ZERO).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BuildError>(),
            Some(BuildError::FontTimeout { .. })
        ));
        assert!(!dir.path().join("saxi-icons-pro-linear.ttf").exists());
    }
}
