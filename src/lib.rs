//! Multi-column cheat sheet PDFs from declarative content and design files.
//!
//! A content file lists titled paragraphs of free text or tables; a design file sets font sizes,
//! table grid lines and where the document title goes.  [`CheatSheet`] formats the content into
//! a story of [`model::RenderBlock`]s, splits each landscape A4 page into three columns and lets
//! `genpdf` paginate and emit the PDF.
//!
//! ```no_run
//! let sheet = cheat_sheet::CheatSheet::load("content.json")?;
//! let path = sheet.write_to("pdfs")?;
//! println!("wrote {}", path.display());
//! # Ok::<(), cheat_sheet::Error>(())
//! ```

pub mod builder;
pub mod content;
pub mod document;
pub mod driver;
pub mod elements;
pub mod error;
pub mod fonts;
pub mod geometry;
pub mod loader;
pub mod model;
pub mod richtext;
pub mod style;
pub mod table;

pub use driver::{output_file_name, CheatSheet, SheetOptions};
pub use error::{Error, Result};
