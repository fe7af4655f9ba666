//! Mapping of named design tokens onto concrete renderer styles.
//!
//! The design file refers to colors and fonts by name.  Those names are resolved once, when the
//! design is loaded, into the closed enumerations below; formatting only ever sees the validated
//! [`TableStyle`].

use std::fmt;
use std::str::FromStr;

use genpdf::style::Color;
use genpdf::Mm;

use crate::document::TableStyleSpec;
use crate::error::{Error, Result};

/// Colors supported for table grid lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GridColor {
    Grey,
    Black,
    DarkBlue,
}

impl GridColor {
    /// Returns the renderer color for this palette entry.
    pub fn color(self) -> Color {
        match self {
            GridColor::Grey => Color::Rgb(128, 128, 128),
            GridColor::Black => Color::Rgb(0, 0, 0),
            GridColor::DarkBlue => Color::Rgb(0, 0, 139),
        }
    }
}

impl FromStr for GridColor {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "grey" => Ok(GridColor::Grey),
            "black" => Ok(GridColor::Black),
            "darkblue" => Ok(GridColor::DarkBlue),
            other => Err(Error::UnknownColor(other.to_owned())),
        }
    }
}

/// Resolves a color name from the design file into the renderer's color type.
pub fn resolve_color(name: &str) -> Result<Color> {
    name.parse::<GridColor>().map(GridColor::color)
}

/// Font faces of the document font family that a design may select.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FontFace {
    #[default]
    Regular,
    Bold,
    Italic,
    BoldItalic,
}

impl FontFace {
    /// Returns whether the face is set in bold.
    pub fn is_bold(self) -> bool {
        matches!(self, FontFace::Bold | FontFace::BoldItalic)
    }

    /// Returns whether the face is set in italic.
    pub fn is_italic(self) -> bool {
        matches!(self, FontFace::Italic | FontFace::BoldItalic)
    }

    /// Applies the face to a renderer style.
    pub fn apply(self, mut style: genpdf::style::Style) -> genpdf::style::Style {
        if self.is_bold() {
            style.set_bold();
        }
        if self.is_italic() {
            style.set_italic();
        }
        style
    }
}

impl FromStr for FontFace {
    type Err = Error;

    /// Accepts plain face names (`bold`, `bold-italic`, ...) and the PostScript names of the
    /// standard sans family (`Helvetica-Bold`, `Helvetica-Oblique`, ...).
    fn from_str(name: &str) -> Result<Self> {
        let normalized = name.trim().to_ascii_lowercase();
        let face = normalized
            .strip_prefix("helvetica")
            .map(|rest| rest.trim_start_matches('-'))
            .unwrap_or(normalized.as_str());

        match face {
            "" | "regular" | "roman" => Ok(FontFace::Regular),
            "bold" => Ok(FontFace::Bold),
            "italic" | "oblique" => Ok(FontFace::Italic),
            "bold-italic" | "bolditalic" | "boldoblique" | "bold-oblique" => {
                Ok(FontFace::BoldItalic)
            }
            _ => Err(Error::UnknownFont(name.to_owned())),
        }
    }
}

impl fmt::Display for FontFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FontFace::Regular => "regular",
            FontFace::Bold => "bold",
            FontFace::Italic => "italic",
            FontFace::BoldItalic => "bold-italic",
        };
        f.write_str(name)
    }
}

/// Grid line decoration of a table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridLines {
    pub color: GridColor,
}

impl GridLines {
    /// Returns the renderer color the grid lines are stroked with.
    pub fn color(&self) -> Color {
        self.color.color()
    }
}

/// Validated table styling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableStyle {
    pub grid: Option<GridLines>,
    pub left_column_font: Option<FontFace>,
    pub right_column_font: Option<FontFace>,
    pub cell_font_size: u8,
}

impl TableStyle {
    /// Resolves the names in a design table style into a validated style.
    ///
    /// The grid color is validated even when grid lines are switched off.
    pub fn resolve(spec: &TableStyleSpec) -> Result<Self> {
        let color: GridColor = spec.grid_color.parse()?;
        let left_column_font = spec
            .left_column_font
            .as_deref()
            .map(str::parse::<FontFace>)
            .transpose()?;
        let right_column_font = spec
            .right_column_font
            .as_deref()
            .map(str::parse::<FontFace>)
            .transpose()?;

        Ok(Self {
            grid: spec.grid_lines.then_some(GridLines { color }),
            left_column_font,
            right_column_font,
            cell_font_size: font_size(spec.cell_font_size),
        })
    }

    /// Returns the font override for a cell in `column` of a table with `column_count` columns.
    ///
    /// The left override applies to the first column and the right override to the last one.
    /// In a single-column table the right override wins when both are set.
    pub fn face_for_column(&self, column: usize, column_count: usize) -> Option<FontFace> {
        if column + 1 == column_count {
            if let Some(face) = self.right_column_font {
                return Some(face);
            }
        }
        if column == 0 {
            return self.left_column_font;
        }
        None
    }
}

/// Converts a design font size into the renderer's point size.
pub fn font_size(value: f64) -> u8 {
    if value.is_nan() {
        return 1;
    }
    value.round().clamp(1.0, f64::from(u8::MAX)) as u8
}

/// Converts PDF points into the renderer's millimetre unit.
pub fn pt_to_mm(points: f64) -> Mm {
    Mm::from(printpdf::Mm::from(printpdf::Pt(points)))
}
