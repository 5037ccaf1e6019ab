use crate::svg_parser::IconOutline;
use anyhow::{Context, Result};
use kurbo::{Affine, BezPath, CubicBez, PathEl, Point, Shape};
use read_fonts::{FontRef, TableProvider};
use std::collections::BTreeMap;
use write_fonts::{
    tables::{
        cmap::Cmap,
        glyf::{GlyfLocaBuilder, SimpleGlyph},
        gsub::{Gsub, Ligature, LigatureSet, LigatureSubstFormat1, SubstitutionLookup},
        head::{Head, MacStyle},
        hhea::Hhea,
        hmtx::Hmtx,
        layout::{
            CoverageTable, Feature, FeatureList, FeatureRecord, LangSys, Lookup, LookupFlag,
            LookupList, Script, ScriptList, ScriptRecord,
        },
        maxp::Maxp,
        name::{Name, NameRecord},
        os2::Os2,
        post::Post,
        vmtx::LongMetric,
    },
    types::{FWord, Fixed, GlyphId, GlyphId16, NameId, Tag, UfWord},
    FontBuilder,
};

/// Units per em for the generated font
const UNITS_PER_EM: u16 = 1000;

/// Distance from the baseline to the bottom of the em box
const DESCENT: i16 = 200;

/// Allowed error when replacing cubic curves, in font units
const QUAD_ACCURACY: f64 = 1.0;

/// One icon glyph ready to be placed in a font
#[derive(Debug, Clone)]
pub struct FontGlyph {
    pub name: String,
    pub codepoint: u32,
    pub outline: IconOutline,
}

/// Naming and weight of the font being built
#[derive(Debug, Clone, Copy)]
pub struct FontStyle<'a> {
    /// Family name shared by every weight, e.g. `saxi-icons-pro`
    pub family: &'a str,
    /// Subfamily name, e.g. `Bold`
    pub subfamily: &'a str,
    /// OS/2 weight class
    pub weight: u16,
}

/// Build a TTF font from icon glyphs, returning the font bytes
///
/// Glyph order is `.notdef`, the icons in the given order, then one empty
/// glyph per character used in an icon name. Those characters feed the
/// `liga` feature, so typing an icon's name renders the icon.
pub fn build_font(glyphs: &[FontGlyph], style: FontStyle<'_>) -> Result<Vec<u8>> {
    let mut glyf_builder = GlyfLocaBuilder::new();

    // .notdef is glyph 0 and stays empty
    glyf_builder.add_glyph(&SimpleGlyph::default())?;

    let mut metrics: Vec<LongMetric> = vec![LongMetric {
        advance: UNITS_PER_EM,
        side_bearing: 0,
    }];

    for glyph in glyphs {
        let simple = outline_to_glyph(&glyph.outline)
            .with_context(|| format!("Failed to build glyph '{}'", glyph.name))?;
        let side_bearing = simple.bbox.x_min;
        glyf_builder.add_glyph(&simple)?;

        metrics.push(LongMetric {
            advance: UNITS_PER_EM,
            side_bearing,
        });
    }

    let components = component_chars(glyphs);
    for _ in &components {
        glyf_builder.add_glyph(&SimpleGlyph::default())?;
        metrics.push(LongMetric {
            advance: 0,
            side_bearing: 0,
        });
    }

    let (glyf, loca, loca_format) = glyf_builder.build();
    let num_glyphs = u16::try_from(glyphs.len() + components.len() + 1)
        .context("Too many glyphs for one font")?;

    let cmap = build_cmap(glyphs, &components)?;

    let mut head = build_head(style.weight);
    head.index_to_loc_format = loca_format as i16;

    let hhea = build_hhea(num_glyphs);
    let hmtx = Hmtx::new(metrics, vec![]);
    let maxp = Maxp {
        num_glyphs,
        ..Default::default()
    };
    let name = build_name(style);
    let os2 = build_os2(glyphs, &components, style.weight);
    let post = build_post(glyphs, &components);

    let mut builder = FontBuilder::new();
    builder
        .add_table(&head)?
        .add_table(&hhea)?
        .add_table(&maxp)?
        .add_table(&os2)?
        .add_table(&hmtx)?
        .add_table(&cmap)?
        .add_table(&name)?
        .add_table(&post)?
        .add_table(&loca)?
        .add_table(&glyf)?;
    if let Some(gsub) = build_gsub(glyphs, &components) {
        builder.add_table(&gsub)?;
    }

    Ok(builder.build())
}

/// Characters typed to form icon-name ligatures, mapped to their glyph ids.
///
/// Characters that collide with an icon codepoint are left out; icons whose
/// names need them simply get no ligature.
fn component_chars(glyphs: &[FontGlyph]) -> BTreeMap<char, u16> {
    let mut chars: Vec<char> = glyphs
        .iter()
        .flat_map(|g| g.name.chars())
        .filter(|c| glyphs.iter().all(|g| g.codepoint != *c as u32))
        .collect();
    chars.sort_unstable();
    chars.dedup();

    let first = glyphs.len() + 1;
    chars
        .into_iter()
        .enumerate()
        .map_while(|(i, c)| u16::try_from(first + i).ok().map(|gid| (c, gid)))
        .collect()
}

/// GSUB with one `liga` lookup turning each icon name into its glyph
fn build_gsub(glyphs: &[FontGlyph], components: &BTreeMap<char, u16>) -> Option<Gsub> {
    // first character -> (ligature glyph, remaining characters)
    let mut sets: BTreeMap<u16, Vec<Ligature>> = BTreeMap::new();
    for (i, glyph) in glyphs.iter().enumerate() {
        let ids: Option<Vec<u16>> = glyph
            .name
            .chars()
            .map(|c| components.get(&c).copied())
            .collect();
        let (Some(ids), Ok(lig_glyph)) = (ids, u16::try_from(i + 1)) else {
            continue;
        };
        let Some((first, rest)) = ids.split_first() else {
            continue;
        };
        if rest.is_empty() {
            continue;
        }
        sets.entry(*first).or_default().push(Ligature::new(
            GlyphId16::new(lig_glyph),
            rest.iter().copied().map(GlyphId16::new).collect(),
        ));
    }
    if sets.is_empty() {
        return None;
    }

    let coverage: CoverageTable = sets.keys().copied().map(GlyphId16::new).collect();
    let ligature_sets = sets
        .into_values()
        .map(|mut ligatures| {
            // Longest match first, so `home-2` wins over `home`
            ligatures.sort_by_key(|lig| std::cmp::Reverse(lig.component_glyph_ids.len()));
            LigatureSet::new(ligatures)
        })
        .collect();

    let lookup = Lookup::new(
        LookupFlag::empty(),
        vec![LigatureSubstFormat1::new(coverage, ligature_sets)],
    );
    let lang_sys = || Some(LangSys::new(vec![0]));
    let scripts = ScriptList::new(vec![
        ScriptRecord::new(Tag::new(b"DFLT"), Script::new(lang_sys(), vec![])),
        ScriptRecord::new(Tag::new(b"latn"), Script::new(lang_sys(), vec![])),
    ]);
    let features = FeatureList::new(vec![FeatureRecord::new(
        Tag::new(b"liga"),
        Feature::new(None, vec![0]),
    )]);

    Some(Gsub::new(
        scripts,
        features,
        LookupList::new(vec![SubstitutionLookup::from(lookup)]),
    ))
}

/// Place an SVG outline in the em box and convert it to a TrueType glyph
fn outline_to_glyph(outline: &IconOutline) -> Result<SimpleGlyph> {
    if outline.path.elements().is_empty() {
        return Ok(SimpleGlyph::default());
    }

    let quadratic = cubic_to_quadratic(&fit_to_em(outline));
    SimpleGlyph::from_bezpath(&quadratic)
        .map_err(|e| anyhow::anyhow!("Failed to create glyph: {:?}", e))
}

/// Scale into the em, flip to Y-up, drop by the descent and center horizontally
fn fit_to_em(outline: &IconOutline) -> BezPath {
    let scale = UNITS_PER_EM as f64 / outline.width.max(outline.height);

    let flip = Affine::new([
        scale,
        0.0,
        0.0,
        -scale,
        0.0,
        outline.height * scale - DESCENT as f64,
    ]);
    let placed = flip * outline.path.clone();

    let bbox = placed.bounding_box();
    let dx = (UNITS_PER_EM as f64 - bbox.width()) / 2.0 - bbox.x0;
    Affine::translate((dx, 0.0)) * placed
}

/// TrueType glyphs only support quadratic curves
fn cubic_to_quadratic(path: &BezPath) -> BezPath {
    let mut result = BezPath::new();
    let mut current_point = Point::ZERO;

    for el in path.elements() {
        match el {
            PathEl::CurveTo(p1, p2, p3) => {
                let cubic = CubicBez::new(current_point, *p1, *p2, *p3);
                for (_, _, quad) in cubic.to_quads(QUAD_ACCURACY) {
                    result.quad_to(quad.p1, quad.p2);
                }
                current_point = *p3;
            }
            PathEl::MoveTo(p) | PathEl::LineTo(p) | PathEl::QuadTo(_, p) => {
                result.push(*el);
                current_point = *p;
            }
            PathEl::ClosePath => result.close_path(),
        }
    }

    result
}

/// Build the cmap table (character to glyph mapping)
fn build_cmap(glyphs: &[FontGlyph], components: &BTreeMap<char, u16>) -> Result<Cmap> {
    let icons = glyphs.iter().enumerate().filter_map(|(i, glyph)| {
        char::from_u32(glyph.codepoint).map(|c| (c, GlyphId::new((i + 1) as u32)))
    });
    let letters = components
        .iter()
        .map(|(c, gid)| (*c, GlyphId::new(u32::from(*gid))));

    Cmap::from_mappings(icons.chain(letters))
        .map_err(|e| anyhow::anyhow!("Failed to create cmap: {:?}", e))
}

fn build_head(weight: u16) -> Head {
    let mac_style = if weight >= 700 {
        MacStyle::BOLD
    } else {
        MacStyle::empty()
    };

    Head {
        font_revision: Fixed::from_f64(1.0),
        units_per_em: UNITS_PER_EM,
        created: Default::default(),
        modified: Default::default(),
        mac_style,
        lowest_rec_ppem: 8,
        index_to_loc_format: 1, // Long offsets (will be updated)
        ..Default::default()
    }
}

fn build_hhea(num_glyphs: u16) -> Hhea {
    Hhea {
        ascender: FWord::new(UNITS_PER_EM as i16 - DESCENT),
        descender: FWord::new(-DESCENT),
        line_gap: FWord::new(0),
        advance_width_max: UfWord::new(UNITS_PER_EM),
        min_left_side_bearing: FWord::new(0),
        min_right_side_bearing: FWord::new(0),
        x_max_extent: FWord::new(UNITS_PER_EM as i16),
        caret_slope_rise: 1,
        caret_slope_run: 0,
        caret_offset: 0,
        number_of_h_metrics: num_glyphs,
        ..Default::default()
    }
}

fn build_name(style: FontStyle<'_>) -> Name {
    let full_name = format!("{} {}", style.family, style.subfamily);
    let postscript = format!("{}-{}", style.family, style.subfamily).replace(' ', "");
    let unique_id = format!("saxi-fonts: {full_name}");

    let mut name = Name::default();
    for (name_id, value) in [
        (NameId::COPYRIGHT_NOTICE, "Generated by saxi-fonts"),
        (NameId::FAMILY_NAME, style.family),
        (NameId::SUBFAMILY_NAME, style.subfamily),
        (NameId::UNIQUE_ID, unique_id.as_str()),
        (NameId::FULL_NAME, full_name.as_str()),
        (NameId::VERSION_STRING, "Version 1.0"),
        (NameId::POSTSCRIPT_NAME, postscript.as_str()),
        (NameId::TYPOGRAPHIC_FAMILY_NAME, style.family),
        (NameId::TYPOGRAPHIC_SUBFAMILY_NAME, style.subfamily),
    ] {
        name.name_record.push(create_name_record(name_id, value));
    }
    name
}

fn create_name_record(name_id: NameId, value: &str) -> NameRecord {
    NameRecord {
        platform_id: 3,     // Windows
        encoding_id: 1,     // Unicode BMP
        language_id: 0x409, // English US
        name_id,
        string: value.to_string().into(),
    }
}

fn build_os2(glyphs: &[FontGlyph], components: &BTreeMap<char, u16>, weight: u16) -> Os2 {
    let mapped = || {
        glyphs
            .iter()
            .map(|g| g.codepoint)
            .chain(components.keys().map(|c| *c as u32))
    };
    let first = mapped().min().unwrap_or(0);
    let last = mapped().max().unwrap_or(0);

    Os2 {
        x_avg_char_width: UNITS_PER_EM as i16,
        us_weight_class: weight,
        us_width_class: 5, // Medium
        fs_type: 0,        // Installable
        y_subscript_x_size: 650,
        y_subscript_y_size: 600,
        y_subscript_x_offset: 0,
        y_subscript_y_offset: 75,
        y_superscript_x_size: 650,
        y_superscript_y_size: 600,
        y_superscript_x_offset: 0,
        y_superscript_y_offset: 350,
        y_strikeout_size: 50,
        y_strikeout_position: 300,
        s_typo_ascender: UNITS_PER_EM as i16 - DESCENT,
        s_typo_descender: -DESCENT,
        s_typo_line_gap: 0,
        us_win_ascent: UNITS_PER_EM - DESCENT as u16,
        us_win_descent: DESCENT as u16,
        us_first_char_index: first.min(0xFFFF) as u16,
        us_last_char_index: last.min(0xFFFF) as u16,
        ul_unicode_range_4: 1 << 28, // Private Use Area
        ul_code_page_range_1: Some(1),
        ul_code_page_range_2: Some(0),
        sx_height: Some(500),
        s_cap_height: Some(700),
        us_default_char: Some(0),
        us_break_char: Some(32),
        us_max_context: Some(0),
        ..Default::default()
    }
}

/// post v2 with the icon names as glyph names
fn build_post(glyphs: &[FontGlyph], components: &BTreeMap<char, u16>) -> Post {
    let names: Vec<String> = glyphs
        .iter()
        .map(|g| glyph_name(&g.name))
        .chain(components.keys().map(|c| char_glyph_name(*c)))
        .collect();
    Post::new_v2(std::iter::once(".notdef").chain(names.iter().map(String::as_str)))
}

/// AGL-style name of a ligature component glyph
fn char_glyph_name(c: char) -> String {
    let cp = c as u32;
    if cp <= 0xFFFF {
        format!("uni{cp:04X}")
    } else {
        format!("u{cp:05X}")
    }
}

/// PostScript-safe glyph name for an icon
fn glyph_name(icon: &str) -> String {
    let mut name: String = icon
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' { c } else { '_' })
        .collect();

    if name
        .chars()
        .next()
        .map(|c| c.is_ascii_digit() || c == '.')
        .unwrap_or(true)
    {
        name = format!("icon_{name}");
    }
    name.truncate(63);
    name
}

/// Re-read a font and check it carries what was asked for
pub fn verify_font(data: &[u8], codepoints: &[u32], weight: u16) -> Result<(), String> {
    let font = FontRef::new(data).map_err(|e| format!("unreadable font: {e}"))?;

    let cmap = font.cmap().map_err(|e| format!("missing cmap: {e}"))?;
    if let Some(cp) = codepoints.iter().find(|cp| cmap.map_codepoint(**cp).is_none()) {
        return Err(format!("U+{cp:04X} is not mapped"));
    }

    // .notdef, the icons, then ligature components
    let num_glyphs = font.maxp().map_err(|e| format!("missing maxp: {e}"))?.num_glyphs();
    if (num_glyphs as usize) < codepoints.len() + 1 {
        return Err(format!(
            "expected at least {} glyphs, found {num_glyphs}",
            codepoints.len() + 1
        ));
    }

    let found = font
        .os2()
        .map_err(|e| format!("missing OS/2: {e}"))?
        .us_weight_class();
    if found != weight {
        return Err(format!("weight class {found}, expected {weight}"));
    }

    Ok(())
}
