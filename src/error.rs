//! Error types for the cheat_sheet crate.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for cheat sheet operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can abort a cheat sheet build.
///
/// All variants are fatal: a build that returns an error has not written or
/// overwritten any output file.
#[derive(Error, Debug)]
pub enum Error {
    /// The input file extension is not one of `json`, `yml` or `yaml`.
    #[error("Unsupported file type for {}: expected .json, .yml or .yaml", path.display())]
    UnsupportedFileType { path: PathBuf },

    /// A content or design file does not exist.
    #[error("File not found: {}", path.display())]
    MissingFile { path: PathBuf },

    /// A paragraph entry has neither (or both) of the `text` and `table` keys.
    #[error("Paragraph {index} ({title:?}) must have exactly one of `text` or `table`")]
    MalformedEntry { index: usize, title: String },

    /// A table has no rows, or its first row has no columns.
    #[error("Table is empty")]
    EmptyTable,

    /// A table row length differs from the length of the first row.
    #[error("Table row {row} has {found} columns, expected {expected}")]
    RaggedTable {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// The design references a color outside the supported palette.
    #[error("Unknown color {0:?}: expected one of grey, black, darkblue")]
    UnknownColor(String),

    /// The design references a font face that cannot be mapped.
    #[error("Unknown font {0:?}")]
    UnknownFont(String),

    /// The document title cannot be turned into a usable file name.
    #[error("Document title {0:?} does not yield a valid file name")]
    InvalidFileName(String),

    /// Inline markup inside a title, body or cell could not be parsed.
    #[error("Invalid markup in {text:?}: {message} (at byte {index})")]
    Markup {
        text: String,
        index: usize,
        message: String,
    },

    /// A JSON document could not be deserialized.
    #[error("Failed to parse JSON document {}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A YAML document could not be deserialized.
    #[error("Failed to parse YAML document {}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// I/O error when reading inputs or writing the output file.
    #[error("I/O error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The font family required by the layout engine could not be loaded.
    #[error("Failed to load fonts")]
    FontLoad(#[source] genpdf::error::Error),

    /// The layout engine failed while paginating or emitting the PDF.
    #[error("Failed to render PDF")]
    Render(#[from] genpdf::error::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            Error::MissingFile { path }
        } else {
            Error::Io { path, source }
        }
    }
}
