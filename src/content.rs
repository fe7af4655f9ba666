//! Conversion of paragraph entries into renderable blocks.

use crate::document::{DesignSpec, ParagraphEntry, ParagraphStyle};
use crate::error::Result;
use crate::model::{RenderBlock, TextBlock, TextStyle};
use crate::style::{font_size, TableStyle};
use crate::table::format_table;

/// Styling inputs shared by all formatting calls of one build.
#[derive(Clone, Copy, Debug)]
pub struct FormatContext<'a> {
    pub paragraph: &'a ParagraphStyle,
    pub table: &'a TableStyle,
}

impl<'a> FormatContext<'a> {
    pub fn new(paragraph: &'a ParagraphStyle, table: &'a TableStyle) -> Self {
        Self { paragraph, table }
    }

    /// Creates a context from a design and its resolved table style.
    pub fn from_design(design: &'a DesignSpec, table: &'a TableStyle) -> Self {
        Self::new(&design.paragraph_style, table)
    }
}

fn format_title(title: &str, style: &ParagraphStyle) -> TextBlock {
    TextBlock::new(title, TextStyle::heading(font_size(style.title_font_size)))
}

/// Formats a title and body into a heading block and a normal text block.
///
/// Inline markup is kept verbatim in both blocks.
pub fn format_text(title: &str, body: &str, style: &ParagraphStyle) -> (TextBlock, TextBlock) {
    let body = TextBlock::new(body, TextStyle::normal(font_size(style.body_font_size)));
    (format_title(title, style), body)
}

/// Formats one paragraph entry into its title block followed by its body or table block.
pub fn format_entry(
    entry: &ParagraphEntry,
    context: &FormatContext<'_>,
) -> Result<Vec<RenderBlock>> {
    match entry {
        ParagraphEntry::Text { title, body } => {
            let (title, body) = format_text(title, body, context.paragraph);
            Ok(vec![title.into(), body.into()])
        }
        ParagraphEntry::Table { title, rows } => {
            let table = format_table(rows, context.table)?;
            let title = format_title(title, context.paragraph);
            Ok(vec![title.into(), table.into()])
        }
    }
}

/// Formats all entries in document order into one story.
pub fn format_story(
    entries: &[ParagraphEntry],
    context: &FormatContext<'_>,
) -> Result<Vec<RenderBlock>> {
    let mut story = Vec::with_capacity(entries.len() * 2);
    for entry in entries {
        story.extend(format_entry(entry, context)?);
    }
    Ok(story)
}
