//! Declarative input documents: the content description and the design description.
//!
//! Both documents are deserialized from JSON or YAML (see [`crate::loader`]) using the key names
//! of the on-disk format, then held immutably for one build.  The paragraph variant is decided
//! here, at load time: the raw entry is converted into a [`ParagraphEntry`] and entries with no
//! (or both) content keys are rejected before any formatting happens.

use std::convert::TryFrom;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::loader;

/// Top-level document setup of a content file.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct DocumentSetup {
    /// Title drawn on the first page and used for the output file name.
    #[serde(rename = "doc title")]
    pub title: String,
    /// Path of the design file, relative to the content file when not absolute.
    #[serde(rename = "design file")]
    pub design_file: PathBuf,
}

/// One content item with a title and either free text or a table.
#[derive(Clone, Debug, PartialEq)]
pub enum ParagraphEntry {
    /// Title followed by a text body.
    Text { title: String, body: String },
    /// Title followed by a grid of cell strings.
    Table {
        title: String,
        rows: Vec<Vec<String>>,
    },
}

impl ParagraphEntry {
    /// Creates a text entry.
    pub fn text(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Text {
            title: title.into(),
            body: body.into(),
        }
    }

    /// Creates a table entry from any nested iterator of cell strings.
    pub fn table<R, C>(title: impl Into<String>, rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self::Table {
            title: title.into(),
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    /// Returns the entry title.
    pub fn title(&self) -> &str {
        match self {
            Self::Text { title, .. } | Self::Table { title, .. } => title,
        }
    }
}

#[derive(Deserialize)]
struct RawParagraph {
    title: String,
    text: Option<String>,
    table: Option<Vec<Vec<String>>>,
}

impl RawParagraph {
    fn into_entry(self, index: usize) -> Result<ParagraphEntry> {
        match (self.text, self.table) {
            (Some(body), None) => Ok(ParagraphEntry::Text {
                title: self.title,
                body,
            }),
            (None, Some(rows)) => Ok(ParagraphEntry::Table {
                title: self.title,
                rows,
            }),
            _ => Err(Error::MalformedEntry {
                index,
                title: self.title,
            }),
        }
    }
}

#[derive(Deserialize)]
pub(crate) struct RawContentDocument {
    #[serde(rename = "document setup")]
    setup: DocumentSetup,
    paragraphs: Vec<RawParagraph>,
}

/// The parsed content description of a cheat sheet.
#[derive(Clone, Debug, PartialEq)]
pub struct ContentDocument {
    setup: DocumentSetup,
    paragraphs: Vec<ParagraphEntry>,
}

impl ContentDocument {
    /// Creates a content document from already validated parts.
    pub fn new(setup: DocumentSetup, paragraphs: impl Into<Vec<ParagraphEntry>>) -> Self {
        Self {
            setup,
            paragraphs: paragraphs.into(),
        }
    }

    /// Loads a content document from a JSON or YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw: RawContentDocument = loader::read_document(path)?;
        Self::try_from(raw)
    }

    /// Parses a content document from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: RawContentDocument = loader::parse_json(json, Path::new("<inline>"))?;
        Self::try_from(raw)
    }

    /// Returns the document setup.
    pub fn setup(&self) -> &DocumentSetup {
        &self.setup
    }

    /// Returns the document title.
    pub fn title(&self) -> &str {
        &self.setup.title
    }

    /// Returns the paragraph entries in document order.
    pub fn paragraphs(&self) -> &[ParagraphEntry] {
        &self.paragraphs
    }
}

impl TryFrom<RawContentDocument> for ContentDocument {
    type Error = Error;

    fn try_from(raw: RawContentDocument) -> Result<Self> {
        let paragraphs = raw
            .paragraphs
            .into_iter()
            .enumerate()
            .map(|(index, paragraph)| paragraph.into_entry(index))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(raw.setup, paragraphs))
    }
}

/// Where and how large the document title is drawn on the first page.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct TitlePlacement {
    /// Distance of the title from the left page edge, in points.
    pub x: f64,
    /// Distance of the title baseline from the bottom page edge, in points.
    pub y: f64,
    #[serde(rename = "size")]
    pub font_size: f64,
}

/// Font sizes for paragraph titles and bodies.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct ParagraphStyle {
    #[serde(rename = "font-size title")]
    pub title_font_size: f64,
    #[serde(rename = "font-size text")]
    pub body_font_size: f64,
}

/// Table styling exactly as written in the design file.
///
/// Color and font names are kept as strings here and validated by
/// [`crate::style::TableStyle::resolve`].
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct TableStyleSpec {
    #[serde(rename = "grid lines")]
    pub grid_lines: bool,
    #[serde(rename = "grid color")]
    pub grid_color: String,
    #[serde(rename = "font left column", default)]
    pub left_column_font: Option<String>,
    #[serde(rename = "font right column", default)]
    pub right_column_font: Option<String>,
    #[serde(rename = "font-size")]
    pub cell_font_size: f64,
}

/// The parsed design description of a cheat sheet.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct DesignSpec {
    #[serde(rename = "doc title")]
    pub title_placement: TitlePlacement,
    #[serde(rename = "par style")]
    pub paragraph_style: ParagraphStyle,
    #[serde(rename = "table style")]
    pub table_style: TableStyleSpec,
}

impl DesignSpec {
    /// Loads a design document from a JSON or YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        loader::read_document(path)
    }
}
