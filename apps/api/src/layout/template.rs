//! Template Resolver: maps a style-profile name to the typography and page geometry
//! the layout engine draws with.
//!
//! Two profiles exist, `ATS_CLASSIC` and `ATS_BLUE`. They share every constant except
//! the accent colour applied to section titles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::layout::font_metrics::FontFace;

/// US Letter, in points.
const LETTER_WIDTH_PT: f32 = 612.0;
const LETTER_HEIGHT_PT: f32 = 792.0;
/// 0.75" on every side.
const MARGIN_PT: f32 = 54.0;
/// 0.25" hanging indent for bullets and skills categories.
const BULLET_INDENT_PT: f32 = 18.0;

// ────────────────────────────────────────────────────────────────────────────
// Names
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StyleName {
    #[default]
    #[serde(rename = "ATS_CLASSIC")]
    AtsClassic,
    #[serde(rename = "ATS_BLUE")]
    AtsBlue,
}

impl StyleName {
    pub fn as_str(&self) -> &'static str {
        match self {
            StyleName::AtsClassic => "ATS_CLASSIC",
            StyleName::AtsBlue => "ATS_BLUE",
        }
    }

    /// Parses a profile name, falling back to `ATS_CLASSIC` for anything unrecognized.
    /// Silent: reporting the fallback is up to the caller.
    pub fn parse_or_default(name: &str) -> Self {
        name.parse().unwrap_or(StyleName::AtsClassic)
    }
}

impl fmt::Display for StyleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStyle(pub String);

impl FromStr for StyleName {
    type Err = UnknownStyle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ATS_CLASSIC" => Ok(StyleName::AtsClassic),
            "ATS_BLUE" => Ok(StyleName::AtsBlue),
            other => Err(UnknownStyle(other.to_string())),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Profile
// ────────────────────────────────────────────────────────────────────────────

/// 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    /// LinkedIn blue.
    pub const ACCENT_BLUE: Rgb = Rgb(0x0A, 0x66, 0xC2);

    /// `"0A66C2"`-style hex, as WordprocessingML expects.
    pub fn hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }

    /// Components in `0.0..=1.0`, as the PDF `rg` operator expects.
    pub fn unit(&self) -> [f32; 3] {
        [
            f32::from(self.0) / 255.0,
            f32::from(self.1) / 255.0,
            f32::from(self.2) / 255.0,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

/// Immutable typography and geometry constants for one rendering style.
///
/// All lengths are in points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleProfile {
    pub name: StyleName,
    pub body_font: FontFace,
    pub bold_font: FontFace,
    pub name_size: f32,
    pub section_size: f32,
    pub body_size: f32,
    pub contact_size: f32,
    pub subheading_size: f32,
    pub page_width: f32,
    pub page_height: f32,
    pub margins: Margins,
    pub bullet_indent: f32,
    pub accent: Rgb,
}

impl StyleProfile {
    /// Horizontal space between the left and right margins.
    pub fn usable_width(&self) -> f32 {
        self.page_width - self.margins.left - self.margins.right
    }

    /// Baseline of the first line on a fresh page.
    pub fn top_y(&self) -> f32 {
        self.page_height - self.margins.top
    }

    pub fn bottom_y(&self) -> f32 {
        self.margins.bottom
    }
}

/// Resolves a profile name to its constants. Unrecognized names yield `ATS_CLASSIC`.
pub fn resolve(name: &str) -> StyleProfile {
    profile_for(StyleName::parse_or_default(name))
}

/// Total over the closed set of profile names.
pub fn profile_for(name: StyleName) -> StyleProfile {
    let accent = match name {
        StyleName::AtsClassic => Rgb::BLACK,
        StyleName::AtsBlue => Rgb::ACCENT_BLUE,
    };

    StyleProfile {
        name,
        body_font: FontFace::Helvetica,
        bold_font: FontFace::HelveticaBold,
        name_size: 18.0,
        section_size: 12.0,
        body_size: 10.5,
        contact_size: 10.0,
        subheading_size: 11.0,
        page_width: LETTER_WIDTH_PT,
        page_height: LETTER_HEIGHT_PT,
        margins: Margins {
            top: MARGIN_PT,
            right: MARGIN_PT,
            bottom: MARGIN_PT,
            left: MARGIN_PT,
        },
        bullet_indent: BULLET_INDENT_PT,
        accent,
    }
}
