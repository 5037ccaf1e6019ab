//! Shared codepoint allocation for the variants of one font family.

use std::collections::BTreeSet;
use std::path::PathBuf;

use indexmap::IndexMap;

use crate::archive::StyleBuckets;
use crate::error::BuildError;
use crate::style::{FontFamily, StyleVariant, BASE_CODEPOINT};

/// Icon name to codepoint, in assignment order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodepointMap {
    entries: IndexMap<String, u32>,
}

impl CodepointMap {
    pub fn get(&self, name: &str) -> Option<u32> {
        self.entries.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries.iter().map(|(name, cp)| (name.as_str(), *cp))
    }

    /// Names mapped to 4-digit uppercase hex strings, for JSON output.
    pub fn to_hex(&self) -> IndexMap<String, String> {
        self.iter()
            .map(|(name, cp)| (name.to_string(), hex(cp)))
            .collect()
    }
}

impl FromIterator<(String, u32)> for CodepointMap {
    fn from_iter<T: IntoIterator<Item = (String, u32)>>(iter: T) -> Self {
        CodepointMap {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Format a codepoint the way CSS and the JSON mappings expect it (`E900`).
pub fn hex(codepoint: u32) -> String {
    format!("{codepoint:04X}")
}

/// Parse a hex codepoint as written by [`hex`].
pub fn parse_hex(text: &str) -> Option<u32> {
    u32::from_str_radix(text.trim_start_matches("U+"), 16).ok()
}

/// Assign codepoints to the union of all groups.
///
/// Groups are visited in the given order and names inside a group in
/// ascending order; a name keeps the codepoint of its first appearance.
pub fn allocate<'a, G, N>(groups: G) -> CodepointMap
where
    G: IntoIterator<Item = N>,
    N: IntoIterator<Item = &'a str>,
{
    let entries = groups
        .into_iter()
        .flat_map(|group| group.into_iter().collect::<BTreeSet<_>>())
        .fold(IndexMap::new(), |mut entries, name| {
            let next = BASE_CODEPOINT + entries.len() as u32;
            entries.entry(name.to_string()).or_insert(next);
            entries
        });
    CodepointMap { entries }
}

/// One icon handed to the font compiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphSource {
    pub name: String,
    pub path: PathBuf,
    pub codepoint: u32,
}

/// The icons of one variant, ordered by codepoint.
#[derive(Debug, Clone)]
pub struct VariantGlyphs {
    pub variant: StyleVariant,
    pub glyphs: Vec<GlyphSource>,
}

/// Everything needed to generate a family: the shared map plus the per
/// variant subsets drawn from it.
#[derive(Debug)]
pub struct FamilyPlan {
    pub family: &'static FontFamily,
    pub codepoints: CodepointMap,
    pub variants: Vec<VariantGlyphs>,
}

impl FamilyPlan {
    pub fn icon_count(&self) -> usize {
        self.codepoints.len()
    }

    /// Variants that carry `name`, in the family's declared order.
    pub fn variants_carrying(&self, name: &str) -> Vec<StyleVariant> {
        self.variants
            .iter()
            .filter(|subset| subset.glyphs.iter().any(|g| g.name == name))
            .map(|subset| subset.variant)
            .collect()
    }
}

/// Allocate the family's codepoints and split them per variant.
///
/// Nothing is compiled here; the whole family has to be known before any
/// codepoint is handed out.
pub fn plan_family(
    family: &'static FontFamily,
    buckets: &StyleBuckets,
) -> Result<FamilyPlan, BuildError> {
    let codepoints = allocate(
        family
            .variants
            .iter()
            .map(|variant| buckets.icons(*variant).map(|(name, _)| name)),
    );

    let mut variants = Vec::with_capacity(family.variants.len());
    for &variant in family.variants {
        let mut glyphs = Vec::new();
        for (name, path) in buckets.icons(variant) {
            let codepoint = codepoints
                .get(name)
                .ok_or_else(|| BuildError::UnallocatedIcon {
                    family: family.name,
                    name: name.to_string(),
                })?;
            glyphs.push(GlyphSource {
                name: name.to_string(),
                path: path.to_path_buf(),
                codepoint,
            });
        }
        glyphs.sort_by_key(|glyph| glyph.codepoint);
        variants.push(VariantGlyphs { variant, glyphs });
    }

    verify_shared(family, &codepoints, &variants)?;

    Ok(FamilyPlan {
        family,
        codepoints,
        variants,
    })
}

/// Every variant must use the family's codepoint for every icon it carries.
pub fn verify_shared(
    family: &'static FontFamily,
    codepoints: &CodepointMap,
    variants: &[VariantGlyphs],
) -> Result<(), BuildError> {
    for subset in variants {
        for glyph in &subset.glyphs {
            match codepoints.get(&glyph.name) {
                Some(expected) if expected == glyph.codepoint => {}
                Some(expected) => {
                    return Err(BuildError::AllocationInconsistency {
                        family: family.name,
                        variant: subset.variant,
                        name: glyph.name.clone(),
                        expected,
                        found: glyph.codepoint,
                    })
                }
                None => {
                    return Err(BuildError::UnallocatedIcon {
                        family: family.name,
                        name: glyph.name.clone(),
                    })
                }
            }
        }
    }
    Ok(())
}
