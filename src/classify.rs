//! Map archive entries onto style variants and canonical icon names.

use crate::error::ClassifyError;
use crate::style::StyleVariant;

/// An SVG file that landed in a style bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedIcon {
    pub variant: StyleVariant,
    pub name: String,
}

/// Classify a directory below `all/` by its name.
pub fn classify_directory(dir_name: &str) -> Result<StyleVariant, ClassifyError> {
    StyleVariant::from_token(dir_name)
        .ok_or_else(|| ClassifyError::UnknownStyleDirectory(dir_name.to_string()))
}

/// Classify a loose `<name>-<style>.svg` file by its suffix.
///
/// Suffixes are tried in [`StyleVariant::PRIORITY`] order and must sit at the
/// very end of the stem, so `unbolded-linear.svg` is Linear, not Bold.
pub fn classify_filename(filename: &str) -> Result<ClassifiedIcon, ClassifyError> {
    let stem = svg_stem(filename).ok_or_else(|| ClassifyError::NotSvg(filename.to_string()))?;

    let variant = StyleVariant::PRIORITY
        .into_iter()
        .find(|variant| strip_style_suffix(stem, *variant).is_some())
        .ok_or_else(|| ClassifyError::MissingStyleSuffix(filename.to_string()))?;

    named(filename, stem, variant)
}

/// Classify a file found inside a style directory.
///
/// The style comes from the directory; the name still goes through
/// [`icon_name`] so a redundant suffix (`bold/x-bold.svg`) is removed.
pub fn classify_in_style_dir(
    filename: &str,
    variant: StyleVariant,
) -> Result<ClassifiedIcon, ClassifyError> {
    let stem = svg_stem(filename).ok_or_else(|| ClassifyError::NotSvg(filename.to_string()))?;
    named(filename, stem, variant)
}

/// Canonical icon name: the stem with one trailing `-<style>` removed.
pub fn icon_name(stem: &str, variant: StyleVariant) -> &str {
    strip_style_suffix(stem, variant).unwrap_or(stem)
}

fn named(
    filename: &str,
    stem: &str,
    variant: StyleVariant,
) -> Result<ClassifiedIcon, ClassifyError> {
    let name = icon_name(stem, variant);
    if name.is_empty() {
        return Err(ClassifyError::EmptyName(filename.to_string()));
    }
    Ok(ClassifiedIcon {
        variant,
        name: name.to_string(),
    })
}

fn strip_style_suffix(stem: &str, variant: StyleVariant) -> Option<&str> {
    let token = variant.token();
    let split = stem.len().checked_sub(token.len() + 1)?;
    let (head, tail) = (stem.get(..split)?, stem.get(split..)?);
    let tail = tail.strip_prefix('-')?;
    tail.eq_ignore_ascii_case(token).then_some(head)
}

/// File stem of an `.svg` file (extension matched case-insensitively).
pub fn svg_stem(filename: &str) -> Option<&str> {
    let split = filename.len().checked_sub(4)?;
    let ext = filename.get(split..)?;
    ext.eq_ignore_ascii_case(".svg").then(|| &filename[..split])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn icon(variant: StyleVariant, name: &str) -> ClassifiedIcon {
        ClassifiedIcon {
            variant,
            name: name.to_string(),
        }
    }

    #[test]
    fn test_filename_suffixes() {
        assert_eq!(
            classify_filename("foo-bar-bold.svg"),
            Ok(icon(StyleVariant::Bold, "foo-bar"))
        );
        assert_eq!(
            classify_filename("foo-bar-twotone.svg"),
            Ok(icon(StyleVariant::TwoTone, "foo-bar"))
        );
        assert_eq!(
            classify_filename("Archive-Add-BULK.SVG"),
            Ok(icon(StyleVariant::Bulk, "Archive-Add"))
        );
        assert_eq!(
            classify_filename("arrow-Outline.svg"),
            Ok(icon(StyleVariant::Outline, "arrow"))
        );
    }

    #[test]
    fn test_suffix_is_anchored() {
        assert_eq!(
            classify_filename("unbolded-linear.svg"),
            Ok(icon(StyleVariant::Linear, "unbolded"))
        );
        assert_eq!(
            classify_filename("bold-broken.svg"),
            Ok(icon(StyleVariant::Broken, "bold"))
        );
        assert_eq!(
            classify_filename("unbolded.svg"),
            Err(ClassifyError::MissingStyleSuffix("unbolded.svg".into()))
        );
        assert_eq!(
            classify_filename("boldface.svg"),
            Err(ClassifyError::MissingStyleSuffix("boldface.svg".into()))
        );
    }

    #[test]
    fn test_only_one_suffix_is_stripped() {
        assert_eq!(
            classify_filename("x-bold-bold.svg"),
            Ok(icon(StyleVariant::Bold, "x-bold"))
        );
        assert_eq!(
            classify_filename("x-linear-bold.svg"),
            Ok(icon(StyleVariant::Bold, "x-linear"))
        );
    }

    #[test]
    fn test_rejections_are_reported() {
        assert_eq!(
            classify_filename("notes.txt"),
            Err(ClassifyError::NotSvg("notes.txt".into()))
        );
        assert_eq!(
            classify_filename("-bold.svg"),
            Err(ClassifyError::EmptyName("-bold.svg".into()))
        );
        assert_eq!(
            classify_directory("misc"),
            Err(ClassifyError::UnknownStyleDirectory("misc".into()))
        );
    }

    #[test]
    fn test_style_directory_keeps_plain_names() {
        let variant = classify_directory("Outline").unwrap();
        assert_eq!(variant, StyleVariant::Outline);
        assert_eq!(
            classify_in_style_dir("x.svg", variant),
            Ok(icon(StyleVariant::Outline, "x"))
        );
        assert_eq!(
            classify_in_style_dir("y.svg", variant),
            Ok(icon(StyleVariant::Outline, "y"))
        );
        assert_eq!(
            classify_in_style_dir("z-outline.svg", variant),
            Ok(icon(StyleVariant::Outline, "z"))
        );
        // Only the directory's own suffix is stripped.
        assert_eq!(
            classify_in_style_dir("z-bold.svg", variant),
            Ok(icon(StyleVariant::Outline, "z-bold"))
        );
    }

    #[test]
    fn test_multibyte_names() {
        assert_eq!(icon_name("é", StyleVariant::Bold), "é");
        assert_eq!(
            classify_filename("häuser-bulk.svg"),
            Ok(icon(StyleVariant::Bulk, "häuser"))
        );
        assert_eq!(svg_stem("ü.svg"), Some("ü"));
        assert_eq!(svg_stem("svg"), None);
    }
}
