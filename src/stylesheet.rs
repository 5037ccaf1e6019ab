//! Per-family and combined CSS.

use crate::codepoints::{hex, FamilyPlan};
use crate::style::{StyleVariant, BASE_CLASS, FAMILIES};

/// Stylesheet for one family.
///
/// `compiled` lists the variants that actually produced a font; only those
/// get an `@font-face`. Icon rules are scoped to the variant classes whose
/// font carries the icon, so names shared with another family never collide
/// and a variant never points at a glyph it does not have.
pub fn family_css(plan: &FamilyPlan, compiled: &[StyleVariant]) -> String {
    let family = plan.family;
    let mut css = String::new();

    for variant in family.variants.iter().filter(|v| compiled.contains(v)) {
        css.push_str(&format!(
            r#"@font-face {{
  font-family: '{family}';
  src: url("{prefix}.ttf") format("truetype");
  font-weight: {weight};
  font-style: normal;
  font-display: block;
}}

"#,
            family = family.name,
            prefix = variant.out_prefix(),
            weight = variant.weight(),
        ));
    }

    css.push_str(&format!(
        r#".{BASE_CLASS} {{
  font-family: '{}' !important;
  speak: never;
  font-style: normal !important;
  font-weight: normal;
  font-variant: normal;
  text-transform: none;
  line-height: 1;
  -webkit-font-smoothing: antialiased;
  -moz-osx-font-smoothing: grayscale;
  -webkit-font-feature-settings: "liga";
  -moz-font-feature-settings: "liga=1";
  -moz-font-feature-settings: "liga";
  -ms-font-feature-settings: "liga" 1;
  font-feature-settings: "liga";
  text-rendering: optimizeLegibility;
}}

"#,
        family.name
    ));

    for variant in family.variants {
        css.push_str(&format!(
            ".{} {{\n  font-family: '{}';\n  font-weight: {};\n}}\n\n",
            variant.css_prefix(),
            family.name,
            variant.weight()
        ));
    }

    for (name, codepoint) in plan.codepoints.iter() {
        let selectors: Vec<String> = plan
            .variants_carrying(name)
            .into_iter()
            .map(|v| format!(".{}.{BASE_CLASS}-{name}:before", v.css_prefix()))
            .collect();
        if selectors.is_empty() {
            continue;
        }
        css.push_str(&format!(
            "{} {{\n  content: \"\\{}\";\n}}\n\n",
            selectors.join(",\n"),
            hex(codepoint)
        ));
    }

    css
}

/// `saxi-icons-all.css`: every family sheet followed by utility classes.
pub fn combined_css<'a>(sheets: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    let mut css = String::from("/* Combined SAXI Icons CSS */\n\n");

    for (file, content) in sheets {
        css.push_str(&format!("/* {file} */\n{content}\n\n"));
    }

    css.push_str("/* Utility Classes */\n");
    for family in &FAMILIES {
        for variant in family.variants {
            let alias = format!("{BASE_CLASS}-{}", variant.token());
            let selectors = if alias == variant.css_prefix() {
                format!(".{alias}")
            } else {
                format!(".{}, .{alias}", variant.css_prefix())
            };
            css.push_str(&format!(
                "{selectors} {{\n  font-family: '{}' !important;\n  \
                 font-weight: {} !important;\n}}\n\n",
                family.name,
                variant.weight()
            ));
        }
    }
    css.push_str(&format!(
        "[class^=\"{BASE_CLASS}-\"], [class*=\" {BASE_CLASS}-\"] {{\n  \
         font-style: normal !important;\n  line-height: 1;\n}}\n"
    ));

    css
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::StyleBuckets;
    use crate::classify::ClassifiedIcon;
    use crate::codepoints::plan_family;
    use crate::style::FontFamily;
    use std::path::PathBuf;

    fn plan(family: &'static FontFamily, icons: &[(StyleVariant, &str)]) -> FamilyPlan {
        let mut buckets = StyleBuckets::default();
        for (variant, name) in icons {
            let icon = ClassifiedIcon {
                variant: *variant,
                name: name.to_string(),
            };
            buckets.insert(icon, PathBuf::from(format!("{name}.svg")));
        }
        plan_family(family, &buckets).unwrap()
    }

    #[test]
    fn test_font_face_only_for_compiled_variants() {
        let plan = plan(&FAMILIES[0], &[(StyleVariant::Bold, "home")]);
        let css = family_css(&plan, &[StyleVariant::Bold, StyleVariant::Outline]);
        assert_eq!(css.matches("@font-face").count(), 2);
        assert!(css.contains("url(\"saxi-icons-pro-bold.ttf\")"));
        assert!(css.contains("url(\"saxi-icons-pro-outline.ttf\")"));
        assert!(!css.contains("saxi-icons-pro-linear.ttf"));
        assert!(css.contains("font-weight: 300;"));
        // Variant classes exist even without a compiled font.
        assert!(css.contains(".saxi-regular {"));
    }

    #[test]
    fn test_icon_rules_are_scoped_per_family() {
        let plan = plan(
            &FAMILIES[1],
            &[
                (StyleVariant::TwoTone, "home"),
                (StyleVariant::TwoTone, "archive-add"),
                (StyleVariant::Bulk, "home"),
                (StyleVariant::Bulk, "archive-add"),
            ],
        );
        let css = family_css(&plan, &[StyleVariant::TwoTone, StyleVariant::Bulk]);
        assert!(css.contains(
            ".saxi-twotone.saxi-archive-add:before,\n.saxi-bulk.saxi-archive-add:before {\n  content: \"\\E900\";"
        ));
        assert!(css.contains(".saxi-bulk.saxi-home:before {\n  content: \"\\E901\";"));
        assert!(!css.contains(".saxi-solid.saxi-home"));
    }

    #[test]
    fn test_icon_rules_only_for_variants_carrying_the_icon() {
        let plan = plan(
            &FAMILIES[0],
            &[(StyleVariant::Bold, "home"), (StyleVariant::Linear, "x")],
        );
        let css = family_css(&plan, &[StyleVariant::Bold, StyleVariant::Linear]);
        assert!(css.contains(".saxi-regular.saxi-x:before {\n  content: \"\\E901\";"));
        assert!(!css.contains(".saxi-solid.saxi-x"));
        assert!(!css.contains(".saxi-light.saxi-x"));
        assert!(css.contains(".saxi-solid.saxi-home:before {\n  content: \"\\E900\";"));
        assert!(!css.contains(".saxi-regular.saxi-home"));
    }

    #[test]
    fn test_ligatures_enabled_on_base_class() {
        let plan = plan(&FAMILIES[0], &[(StyleVariant::Bold, "home")]);
        let css = family_css(&plan, &[StyleVariant::Bold]);
        assert!(css.contains("font-feature-settings: \"liga\";"));
    }

    #[test]
    fn test_combined_sheet() {
        let css = combined_css([("a.css", ".a {}"), ("b.css", ".b {}")]);
        assert!(css.starts_with("/* Combined SAXI Icons CSS */"));
        let a = css.find("/* a.css */\n.a {}").unwrap();
        let b = css.find("/* b.css */\n.b {}").unwrap();
        assert!(a < b);
        assert!(css.contains(
            ".saxi-solid, .saxi-bold {\n  font-family: 'saxi-icons-pro' !important;\n  font-weight: 700 !important;"
        ));
        assert!(css.contains(".saxi-bulk {\n  font-family: 'saxi-icons-pro-twotone' !important;"));
        assert!(css.ends_with("font-style: normal !important;\n  line-height: 1;\n}\n"));
    }
}
