//! Style variants and the font families that group them.

use std::fmt;

/// First codepoint handed out in every family (Private Use Area).
pub const BASE_CODEPOINT: u32 = 0xE900;

/// CSS base class shared by every icon element.
pub const BASE_CLASS: &str = "saxi";

/// One visual treatment of the icon set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StyleVariant {
    Bold,
    Linear,
    Outline,
    Broken,
    TwoTone,
    Bulk,
}

impl StyleVariant {
    /// Every variant in suffix-matching priority order.
    pub const PRIORITY: [StyleVariant; 6] = [
        StyleVariant::Bold,
        StyleVariant::Linear,
        StyleVariant::Outline,
        StyleVariant::Broken,
        StyleVariant::Bulk,
        StyleVariant::TwoTone,
    ];

    /// Human readable label, also used as the font subfamily name.
    pub fn label(self) -> &'static str {
        match self {
            StyleVariant::Bold => "Bold",
            StyleVariant::Linear => "Linear",
            StyleVariant::Outline => "Outline",
            StyleVariant::Broken => "Broken",
            StyleVariant::TwoTone => "TwoTone",
            StyleVariant::Bulk => "Bulk",
        }
    }

    /// Lowercase token used for directory names and filename suffixes.
    pub fn token(self) -> &'static str {
        match self {
            StyleVariant::Bold => "bold",
            StyleVariant::Linear => "linear",
            StyleVariant::Outline => "outline",
            StyleVariant::Broken => "broken",
            StyleVariant::TwoTone => "twotone",
            StyleVariant::Bulk => "bulk",
        }
    }

    /// CSS / OS/2 weight class.
    pub fn weight(self) -> u16 {
        match self {
            StyleVariant::Bold | StyleVariant::Bulk => 700,
            StyleVariant::Linear | StyleVariant::Broken | StyleVariant::TwoTone => 400,
            StyleVariant::Outline => 300,
        }
    }

    /// Output filename prefix of the compiled font.
    pub fn out_prefix(self) -> &'static str {
        match self {
            StyleVariant::Bold => "saxi-icons-pro-bold",
            StyleVariant::Linear => "saxi-icons-pro-linear",
            StyleVariant::Outline => "saxi-icons-pro-outline",
            StyleVariant::Broken => "saxi-icons-pro-broken",
            StyleVariant::TwoTone => "saxi-icons-pro-twotone",
            StyleVariant::Bulk => "saxi-icons-pro-bulk",
        }
    }

    /// CSS class selecting this variant.
    pub fn css_prefix(self) -> &'static str {
        match self {
            StyleVariant::Bold => "saxi-solid",
            StyleVariant::Linear => "saxi-regular",
            StyleVariant::Outline => "saxi-light",
            StyleVariant::Broken => "saxi-broken",
            StyleVariant::TwoTone => "saxi-twotone",
            StyleVariant::Bulk => "saxi-bulk",
        }
    }

    /// Family whose codepoint space this variant shares.
    pub fn family(self) -> &'static FontFamily {
        match self {
            StyleVariant::TwoTone | StyleVariant::Bulk => &FAMILIES[1],
            _ => &FAMILIES[0],
        }
    }

    /// Match a directory token, ignoring case.
    pub fn from_token(token: &str) -> Option<StyleVariant> {
        Self::PRIORITY
            .into_iter()
            .find(|variant| token.eq_ignore_ascii_case(variant.token()))
    }
}

impl fmt::Display for StyleVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Variants sharing one glyph index space and one font family name.
#[derive(Debug, PartialEq, Eq)]
pub struct FontFamily {
    pub name: &'static str,
    /// Declared order; codepoint allocation visits variants in this order.
    pub variants: &'static [StyleVariant],
}

impl FontFamily {
    pub fn mapping_file(&self) -> String {
        format!("{}.json", self.name)
    }

    pub fn stylesheet_file(&self) -> String {
        format!("{}.css", self.name)
    }
}

pub static FAMILIES: [FontFamily; 2] = [
    FontFamily {
        name: "saxi-icons-pro",
        variants: &[
            StyleVariant::Bold,
            StyleVariant::Linear,
            StyleVariant::Outline,
            StyleVariant::Broken,
        ],
    },
    FontFamily {
        name: "saxi-icons-pro-twotone",
        variants: &[StyleVariant::TwoTone, StyleVariant::Bulk],
    },
];
