//! End-to-end assembly of a cheat sheet: load, format, lay out, write.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::builder::DocumentBuilder;
use crate::content::{format_story, FormatContext};
use crate::document::{ContentDocument, DesignSpec};
use crate::elements::{ColumnFlow, PageSize, TitleDecorator};
use crate::error::{Error, Result};
use crate::geometry::{ColumnLayout, Frame};
use crate::model::RenderBlock;
use crate::style::TableStyle;

/// Landscape A4 width in PDF points.
pub const PAGE_WIDTH_PT: f64 = 841.89;
/// Landscape A4 height in PDF points.
pub const PAGE_HEIGHT_PT: f64 = 595.27;
/// Number of columns on every page.
pub const COLUMN_COUNT: usize = 3;

/// Fixed page and column settings of a build.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SheetOptions {
    pub page: PageSize,
    pub columns: usize,
    pub layout: ColumnLayout,
}

impl Default for SheetOptions {
    fn default() -> Self {
        Self {
            page: PageSize::new(PAGE_WIDTH_PT, PAGE_HEIGHT_PT),
            columns: COLUMN_COUNT,
            layout: ColumnLayout::default(),
        }
    }
}

/// A loaded and validated cheat sheet, ready to be rendered.
#[derive(Clone, Debug)]
pub struct CheatSheet {
    content: ContentDocument,
    design: DesignSpec,
    table_style: TableStyle,
    options: SheetOptions,
}

impl CheatSheet {
    /// Creates a cheat sheet from in-memory documents, validating the design.
    pub fn new(content: ContentDocument, design: DesignSpec) -> Result<Self> {
        let table_style = TableStyle::resolve(&design.table_style)?;
        Ok(Self {
            content,
            design,
            table_style,
            options: SheetOptions::default(),
        })
    }

    /// Loads the content document at `content_path` and the design file it references.
    ///
    /// A relative design path is resolved against the working directory.  When no file exists
    /// there, the directory of the content file is tried as well.
    pub fn load(content_path: impl AsRef<Path>) -> Result<Self> {
        let content_path = content_path.as_ref();
        let content = ContentDocument::load(content_path)?;
        let working_dir = env::current_dir().map_err(|err| Error::io(".", err))?;
        let design_path =
            resolve_design_path(&working_dir, content_path, &content.setup().design_file);
        let design = DesignSpec::load(&design_path)?;
        info!(
            "Loaded cheat sheet {:?} with {} paragraphs (design {})",
            content.title(),
            content.paragraphs().len(),
            design_path.display()
        );
        Self::new(content, design)
    }

    /// Replaces the page and column settings.
    pub fn with_options(mut self, options: SheetOptions) -> Self {
        self.options = options;
        self
    }

    pub fn content(&self) -> &ContentDocument {
        &self.content
    }

    pub fn design(&self) -> &DesignSpec {
        &self.design
    }

    pub fn table_style(&self) -> &TableStyle {
        &self.table_style
    }

    pub fn options(&self) -> &SheetOptions {
        &self.options
    }

    /// Returns the column frames of the first page.
    pub fn first_page_columns(&self) -> Vec<Frame> {
        let SheetOptions {
            page,
            columns,
            layout,
        } = self.options;
        layout.compute_columns(page.width, page.height, columns, true)
    }

    /// Formats every paragraph entry in document order.
    pub fn story(&self) -> Result<Vec<RenderBlock>> {
        let context = FormatContext::from_design(&self.design, &self.table_style);
        format_story(self.content.paragraphs(), &context)
    }

    /// Lays out the cheat sheet and returns the PDF bytes.
    pub fn render(&self) -> Result<Vec<u8>> {
        let story = self.story()?;
        let frames = self.first_page_columns();
        debug!(
            "Story has {} blocks; first page columns: {:?}",
            story.len(),
            frames
        );

        let SheetOptions {
            page,
            columns,
            layout,
        } = self.options;
        let flow = ColumnFlow::from_story(layout, page, columns, &story)?;
        let decorator = TitleDecorator::new(
            self.content.title(),
            self.design.title_placement,
            page.height,
        );

        let mut document = DocumentBuilder::new()
            .with_title(self.content.title())
            .with_paper_size_pt(page.width, page.height)
            .with_decorator(decorator)
            .build()?;
        document.push(flow);

        let mut bytes = Vec::new();
        document.render(&mut bytes)?;
        Ok(bytes)
    }

    /// Renders the cheat sheet and writes it to `<output_dir>/<title>.pdf`.
    ///
    /// Nothing is written unless loading, formatting and rendering all succeed.  An existing file
    /// with the same name is overwritten.
    pub fn write_to(&self, output_dir: impl AsRef<Path>) -> Result<PathBuf> {
        let output_dir = output_dir.as_ref();
        let path = output_dir.join(output_file_name(self.content.title())?);
        let bytes = self.render()?;

        fs::create_dir_all(output_dir).map_err(|err| Error::io(output_dir, err))?;
        fs::write(&path, &bytes).map_err(|err| Error::io(&path, err))?;
        info!("Wrote {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }
}

/// Returns the design file path relative to `working_dir`, or next to the content file when only
/// that one exists.
fn resolve_design_path(working_dir: &Path, content_path: &Path, design_file: &Path) -> PathBuf {
    let primary = working_dir.join(design_file);
    if design_file.is_absolute() || primary.is_file() {
        return primary;
    }
    let beside_content = content_path
        .parent()
        .map(|parent| working_dir.join(parent).join(design_file));
    match beside_content {
        Some(path) if path.is_file() => {
            debug!("Design file {} found next to the content file", path.display());
            path
        }
        _ => primary,
    }
}

fn is_unsafe_file_name_char(ch: char) -> bool {
    matches!(ch, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|') || ch.is_control()
}

/// Derives the output file name `<title>.pdf` from a document title.
///
/// Characters that are unsafe in file names on common platforms are replaced by `_`, and
/// surrounding whitespace and trailing dots are removed.
pub fn output_file_name(title: &str) -> Result<String> {
    let replaced: String = title
        .chars()
        .map(|ch| if is_unsafe_file_name_char(ch) { '_' } else { ch })
        .collect();
    let mut stem = replaced.trim();
    loop {
        let trimmed = stem.trim_end_matches('.').trim_end();
        if trimmed == stem {
            break;
        }
        stem = trimmed;
    }

    if stem.is_empty() || stem == "." || stem == ".." {
        return Err(Error::InvalidFileName(title.to_owned()));
    }
    if stem != title {
        warn!("Document title {:?} written as {:?}", title, stem);
    }
    Ok(format!("{stem}.pdf"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_is_the_title() {
        assert_eq!(output_file_name("Sheet1").unwrap(), "Sheet1.pdf");
        assert_eq!(output_file_name("Rust cheat sheet").unwrap(), "Rust cheat sheet.pdf");
    }

    #[test]
    fn unsafe_characters_are_replaced() {
        assert_eq!(output_file_name("a/b\\c:d").unwrap(), "a_b_c_d.pdf");
        assert_eq!(output_file_name(" Git?  ").unwrap(), "Git_.pdf");
        assert_eq!(output_file_name("notes...").unwrap(), "notes.pdf");
        assert_eq!(output_file_name("a. .").unwrap(), "a.pdf");
        assert_eq!(output_file_name("v1.2 . . ..").unwrap(), "v1.2.pdf");
    }

    #[test]
    fn unusable_titles_are_rejected() {
        for title in ["", "   ", "..", "."] {
            assert!(
                matches!(output_file_name(title), Err(Error::InvalidFileName(_))),
                "{title:?}"
            );
        }
    }

    #[test]
    fn design_path_is_resolved_from_the_working_directory() {
        let root = tempfile::tempdir().expect("temp dir");
        let sheets = root.path().join("sheets");
        fs::create_dir(&sheets).expect("create sheets dir");
        fs::write(sheets.join("d.json"), "{}").expect("write design");

        assert_eq!(
            resolve_design_path(
                root.path(),
                Path::new("sheets/c.json"),
                Path::new("sheets/d.json")
            ),
            root.path().join("sheets/d.json")
        );
    }

    #[test]
    fn design_path_falls_back_to_the_content_directory() {
        let root = tempfile::tempdir().expect("temp dir");
        let sheets = root.path().join("sheets");
        fs::create_dir(&sheets).expect("create sheets dir");
        fs::write(sheets.join("d.json"), "{}").expect("write design");

        assert_eq!(
            resolve_design_path(root.path(), Path::new("sheets/c.json"), Path::new("d.json")),
            sheets.join("d.json")
        );
        assert_eq!(
            resolve_design_path(root.path(), Path::new("sheets/c.json"), Path::new("x.json")),
            root.path().join("x.json")
        );
    }

    #[test]
    fn absolute_design_paths_are_kept() {
        let root = tempfile::tempdir().expect("temp dir");
        let design = root.path().join("design.yaml");
        assert_eq!(
            resolve_design_path(Path::new("/elsewhere"), Path::new("c.json"), &design),
            design
        );
    }

    #[test]
    fn default_options_are_landscape_a4_with_three_columns() {
        let options = SheetOptions::default();
        assert_eq!(options.page, PageSize::new(841.89, 595.27));
        assert_eq!(options.columns, 3);
        assert_eq!(options.layout, ColumnLayout::default());
    }
}
