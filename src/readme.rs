//! Markdown glyph reference for the generated fonts.

use std::collections::BTreeMap;

use crate::codepoints::hex;
use crate::config::COMBINED_CSS;
use crate::manifest::{FamilyMapping, FontCoverage};
use crate::style::{FontFamily, StyleVariant, BASE_CLASS, BASE_CODEPOINT, FAMILIES};

struct IconRow<'a> {
    name: &'a str,
    unicode: String,
    family: &'static FontFamily,
    /// Variants whose font carries the glyph.
    styles: Vec<StyleVariant>,
}

impl IconRow<'_> {
    fn classes(&self) -> String {
        self.styles
            .iter()
            .map(|v| format!("`{}`", v.css_prefix()))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn primary_class(&self) -> &'static str {
        self.styles
            .first()
            .unwrap_or(&self.family.variants[0])
            .css_prefix()
    }
}

/// Render `Icon-Font-README.md`.
pub fn render_readme(mappings: &[FamilyMapping], coverage: &FontCoverage, date: &str) -> String {
    let mut rows: Vec<IconRow<'_>> = mappings
        .iter()
        .flat_map(|m| {
            m.codepoints.iter().map(move |(name, cp)| IconRow {
                name,
                unicode: hex(cp),
                family: m.family,
                styles: coverage.styles(m.family, cp),
            })
        })
        .collect();
    rows.sort_by(|a, b| a.name.cmp(b.name).then(a.family.name.cmp(b.family.name)));

    let families: Vec<&str> = mappings.iter().map(|m| m.family.name).collect();

    let mut out = String::from("# SAXI Icon Font Documentation\n\n");
    out.push_str(&format!("Generated on: {date}\n"));
    out.push_str(&format!("Total Icons: {}\n", rows.len()));
    out.push_str(&format!("Families: {}\n\n", families.join(", ")));

    overview(&mut out);
    installation(&mut out);
    icon_table(&mut out, &rows);
    categorized_tables(&mut out, &rows);
    usage_examples(&mut out, rows.first());

    out
}

fn overview(out: &mut String) {
    out.push_str("## Overview\n\n");
    out.push_str("This icon font includes the following font files:\n\n");
    for family in &FAMILIES {
        out.push_str(&format!(
            "- **{}** with {} weights:\n",
            family.name,
            family.variants.len()
        ));
        for variant in family.variants {
            out.push_str(&format!(
                "  - {} ({}) - `{}.ttf`, use with class `{}`\n",
                variant.label(),
                variant.weight(),
                variant.out_prefix(),
                variant.css_prefix()
            ));
        }
    }
    out.push_str("\n## Features\n\n");
    out.push_str(
        "- **Multiple styles** available for each icon through font weights and families\n",
    );
    out.push_str(
        "- **Shared codepoints** - An icon has the same codepoint in every weight of its family\n",
    );
    out.push_str("- **Unicode support** - Each icon has a dedicated Private Use Area codepoint\n");
    out.push_str("- **Ligatures** - Typing an icon's name renders the icon\n");
    out.push_str(&format!(
        "- **FontAwesome-style classes** - Following the familiar pattern like \
         `saxi-solid {BASE_CLASS}-archive-add`\n\n"
    ));
}

fn installation(out: &mut String) {
    out.push_str("## Installation\n\n");
    out.push_str("### 1. Include CSS\n\n");
    out.push_str("```html\n");
    out.push_str(&format!("<link rel=\"stylesheet\" href=\"Fonts/{COMBINED_CSS}\">\n"));
    out.push_str("<!-- Or include only what you need: -->\n");
    for family in &FAMILIES {
        out.push_str(&format!(
            "<link rel=\"stylesheet\" href=\"Fonts/{}\">\n",
            family.stylesheet_file()
        ));
    }
    out.push_str("```\n\n");
    out.push_str("### 2. Use icons in HTML\n\n");
    out.push_str("```html\n");
    out.push_str(&format!("<i class=\"saxi-solid {BASE_CLASS}-archive-add\"></i>\n"));
    out.push_str("```\n\n");
}

fn icon_table(out: &mut String, rows: &[IconRow<'_>]) {
    out.push_str("## Icon Table\n\n");
    out.push_str("| Icon | Name | Unicode | CSS Class | Usage Example |\n");
    out.push_str("|------|------|---------|-----------|---------------|\n");
    for row in rows {
        out.push_str(&format!(
            "| &#x{unicode}; | `{name}` | `\\{unicode}` | {classes} | \
             `<i class=\"{primary} {BASE_CLASS}-{name}\"></i>` |\n",
            unicode = row.unicode,
            name = row.name,
            classes = row.classes(),
            primary = row.primary_class(),
        ));
    }
    out.push('\n');
}

/// Category of an icon: the text before its first `-`.
fn category(name: &str) -> &str {
    match name.split_once('-') {
        Some((prefix, _)) if !prefix.is_empty() => prefix,
        _ => "Misc",
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn categorized_tables(out: &mut String, rows: &[IconRow<'_>]) {
    let mut categories: BTreeMap<&str, Vec<&IconRow<'_>>> = BTreeMap::new();
    for row in rows {
        categories.entry(category(row.name)).or_default().push(row);
    }

    out.push_str("## Icon Categories\n");
    for (category, icons) in categories {
        out.push_str(&format!("\n### {} Icons\n\n", capitalize(category)));
        out.push_str("| Icon | Name | Unicode | Style Options |\n");
        out.push_str("|------|------|---------|---------------|\n");
        for row in icons {
            out.push_str(&format!(
                "| &#x{unicode}; | `{name}` | `\\{unicode}` | {classes} |\n",
                unicode = row.unicode,
                name = row.name,
                classes = row.classes(),
            ));
        }
    }
    out.push('\n');
}

/// Examples for one icon, limited to the styles that can show it.
fn usage_examples(out: &mut String, sample: Option<&IconRow<'_>>) {
    let name = sample.map_or("archive-add", |row| row.name);
    let unicode = sample.map_or_else(|| hex(BASE_CODEPOINT), |row| row.unicode.clone());
    let family = sample.map_or(&FAMILIES[0], |row| row.family);
    let styles = sample.map_or(family.variants, |row| row.styles.as_slice());

    out.push_str("## Usage Examples\n\n");
    out.push_str("### HTML with CSS Classes\n\n");
    out.push_str("```html\n");
    for variant in styles {
        out.push_str(&format!(
            "<i class=\"{} {BASE_CLASS}-{name}\"></i>  <!-- {} style -->\n",
            variant.css_prefix(),
            variant.label()
        ));
    }
    out.push_str("```\n\n");
    out.push_str("### CSS\n\n");
    out.push_str("```css\n");
    out.push_str(&format!(
        ".download-button:before {{\n  content: \"\\{unicode}\";\n  font-family: '{}';\n  \
         margin-right: 8px;\n}}\n",
        family.name
    ));
    out.push_str("```\n\n");
    out.push_str("### Using in Design Tools (Figma, Canva, etc.)\n\n");
    out.push_str("1. Install the font files (.ttf) on your system.\n");
    out.push_str(
        "2. Select text and change the font to the family of the icon, \
         with the weight of the style you want.\n",
    );
    out.push_str(&format!(
        "3. Type `{name}` or paste the icon's Unicode character (U+{unicode}).\n"
    ));
}
