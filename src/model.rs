//! Data structures describing the renderable blocks of a cheat sheet.
//!
//! The formatters produce these values instead of `genpdf` elements so that the story can be
//! inspected, compared and tested without fonts.  [`crate::elements`] turns them into layout
//! engine elements right before rendering.
//!
//! Every block carries its own [`TextStyle`] value.  Styles are `Copy` and never shared by
//! reference, so configuring one cell cannot leak into another.

use crate::style::{FontFace, GridLines};

/// Horizontal alignment of table cell text.  Cheat sheet tables are always left aligned.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HorizontalAlignment {
    #[default]
    Left,
}

impl From<HorizontalAlignment> for genpdf::Alignment {
    fn from(alignment: HorizontalAlignment) -> Self {
        match alignment {
            HorizontalAlignment::Left => genpdf::Alignment::Left,
        }
    }
}

/// The typographic role of a text block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextRole {
    /// Paragraph and table titles, set in bold with extra space above.
    Heading,
    /// Body text and table cells.
    #[default]
    Normal,
}

/// Immutable style of a single text block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextStyle {
    role: TextRole,
    font_size: u8,
    face: Option<FontFace>,
}

impl TextStyle {
    /// Creates the heading style with the given font size.
    pub fn heading(font_size: u8) -> Self {
        Self {
            role: TextRole::Heading,
            font_size,
            face: None,
        }
    }

    /// Creates the normal style with the given font size.
    pub fn normal(font_size: u8) -> Self {
        Self {
            role: TextRole::Normal,
            font_size,
            face: None,
        }
    }

    /// Returns a copy of this style with the given font face override.
    pub fn with_face(self, face: impl Into<Option<FontFace>>) -> Self {
        Self {
            face: face.into(),
            ..self
        }
    }

    pub fn role(&self) -> TextRole {
        self.role
    }

    pub fn font_size(&self) -> u8 {
        self.font_size
    }

    /// Returns the font face override, if any.
    pub fn face(&self) -> Option<FontFace> {
        self.face
    }

    /// Builds the `genpdf` style for this block.
    ///
    /// Headings are bold unless a face override says otherwise.
    pub fn to_genpdf(&self) -> genpdf::style::Style {
        let style = genpdf::style::Style::new().with_font_size(self.font_size);
        match (self.face, self.role) {
            (Some(face), _) => face.apply(style),
            (None, TextRole::Heading) => style.bold(),
            (None, TextRole::Normal) => style,
        }
    }
}

/// A run of text (possibly containing inline markup) with its style.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextBlock {
    text: String,
    style: TextStyle,
}

impl TextBlock {
    pub fn new(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    /// Returns the raw text, inline markup included.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn style(&self) -> TextStyle {
        self.style
    }
}

/// A grid of styled cells with optional grid lines.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableBlock {
    rows: Vec<Vec<TextBlock>>,
    grid: Option<GridLines>,
    alignment: HorizontalAlignment,
}

impl TableBlock {
    /// Creates a table block from rectangular rows.
    pub fn new(rows: Vec<Vec<TextBlock>>, grid: Option<GridLines>) -> Self {
        Self {
            rows,
            grid,
            alignment: HorizontalAlignment::Left,
        }
    }

    pub fn rows(&self) -> &[Vec<TextBlock>] {
        &self.rows
    }

    pub fn grid(&self) -> Option<GridLines> {
        self.grid
    }

    pub fn alignment(&self) -> HorizontalAlignment {
        self.alignment
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Returns the total number of cells.
    pub fn cell_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }
}

/// One unit of the story handed to the layout engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderBlock {
    Text(TextBlock),
    Table(TableBlock),
}

impl RenderBlock {
    /// Returns the text block, if this is one.
    pub fn as_text(&self) -> Option<&TextBlock> {
        match self {
            RenderBlock::Text(text) => Some(text),
            RenderBlock::Table(_) => None,
        }
    }

    /// Returns the table block, if this is one.
    pub fn as_table(&self) -> Option<&TableBlock> {
        match self {
            RenderBlock::Table(table) => Some(table),
            RenderBlock::Text(_) => None,
        }
    }
}

impl From<TextBlock> for RenderBlock {
    fn from(block: TextBlock) -> Self {
        RenderBlock::Text(block)
    }
}

impl From<TableBlock> for RenderBlock {
    fn from(block: TableBlock) -> Self {
        RenderBlock::Table(block)
    }
}
