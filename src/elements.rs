//! Layout engine elements built on top of `genpdf` primitives.
//!
//! [`ColumnFlow`] is the root element of a cheat sheet: it pours the story into the column frames
//! of each page.  [`TitleDecorator`] draws the document title into the band reserved above the
//! first page's columns.  [`MarkupText`] renders parsed inline markup and [`GridDecorator`] draws
//! colored table grids.  The remaining helpers turn [`RenderBlock`] values into `genpdf` elements.

use std::collections::VecDeque;
use std::mem;

use genpdf::elements::{CellDecorator, FrameCellDecorator, TableLayout};
use genpdf::error::Error as LayoutError;
use genpdf::fonts::FontCache;
use genpdf::style::{Color, Style};
use genpdf::{render, Alignment, Element, Margins, Mm, PageDecorator, Position, RenderResult, Size};
use log::{debug, warn};

use crate::document::TitlePlacement;
use crate::error::{Error, Result};
use crate::geometry::{ColumnLayout, Frame};
use crate::model::{RenderBlock, TableBlock, TextBlock, TextRole};
use crate::richtext::{parse_markup, Span};
use crate::style::{font_size, pt_to_mm, GridLines};

/// Space above a heading, in points.
const HEADING_SPACE_BEFORE_PT: f64 = 6.0;
/// Space below a heading, in points.
const HEADING_SPACE_AFTER_PT: f64 = 2.0;
/// Space below body text and tables, in points.
const BLOCK_SPACE_AFTER_PT: f64 = 3.0;
/// Inner padding of a table cell, in points.
const CELL_PADDING_PT: f64 = 1.5;
/// Distance of an underline below the baseline, relative to the font size.
const UNDERLINE_OFFSET: f64 = 0.12;

/// Page dimensions in PDF points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Root element that fills the column frames of every page in turn.
///
/// The first page uses the first-page geometry of its [`ColumnLayout`]; every later page uses the
/// full column height.  Elements that do not fit into the remaining space of a frame are
/// continued in the next frame, or on the next page after the last frame.
pub struct ColumnFlow {
    layout: ColumnLayout,
    page: PageSize,
    columns: usize,
    story: Vec<Box<dyn Element>>,
    next: usize,
    page_count: usize,
}

impl ColumnFlow {
    /// Creates a column flow over already converted story elements.
    pub fn new(
        layout: ColumnLayout,
        page: PageSize,
        columns: usize,
        story: Vec<Box<dyn Element>>,
    ) -> Self {
        Self {
            layout,
            page,
            columns,
            story,
            next: 0,
            page_count: 0,
        }
    }

    /// Converts the story into elements and wraps them in a column flow.
    pub fn from_story(
        layout: ColumnLayout,
        page: PageSize,
        columns: usize,
        story: &[RenderBlock],
    ) -> Result<Self> {
        let elements = story
            .iter()
            .map(block_element)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(layout, page, columns, elements))
    }

    /// Returns the frames of the page that is rendered next.
    fn next_frames(&self) -> Vec<Frame> {
        let first_page = self.page_count == 1;
        self.layout
            .compute_columns(self.page.width, self.page.height, self.columns, first_page)
    }

    fn frame_area<'p>(&self, page_area: &render::Area<'p>, frame: &Frame) -> render::Area<'p> {
        let mut area = page_area.clone();
        area.add_offset(Position::new(
            pt_to_mm(frame.x),
            pt_to_mm(frame.top_offset(self.page.height)),
        ));
        area.set_width(pt_to_mm(frame.width));
        area.set_height(pt_to_mm(frame.height));
        area
    }
}

impl Element for ColumnFlow {
    fn render(
        &mut self,
        context: &genpdf::Context,
        area: render::Area<'_>,
        style: Style,
    ) -> std::result::Result<RenderResult, LayoutError> {
        self.page_count += 1;
        let frames = self.next_frames();
        let start = self.next;
        let mut progressed = false;

        for frame in &frames {
            if self.next >= self.story.len() {
                break;
            }

            let mut column = self.frame_area(&area, frame);
            while self.next < self.story.len() {
                let result = self.story[self.next].render(context, column.clone(), style)?;
                if result.size.height > Mm::default() {
                    progressed = true;
                }
                column.add_offset(Position::new(0, result.size.height));
                if result.has_more {
                    break;
                }
                self.next += 1;
            }
        }

        debug!(
            "Page {}: rendered blocks {}..{} of {}",
            self.page_count,
            start,
            self.next,
            self.story.len()
        );

        let mut result = RenderResult::default();
        result.has_more = self.next < self.story.len();
        if progressed || !result.has_more {
            result.size = area.size();
        }
        Ok(result)
    }
}

/// Page decorator drawing the document title on the first page.
pub struct TitleDecorator {
    title: String,
    placement: TitlePlacement,
    page_height: f64,
    page: usize,
}

impl TitleDecorator {
    /// Creates a decorator for a page of `page_height` points.
    pub fn new(title: impl Into<String>, placement: TitlePlacement, page_height: f64) -> Self {
        Self {
            title: title.into(),
            placement,
            page_height,
            page: 0,
        }
    }

    /// Returns the top-left position of the title line.
    ///
    /// The design places the title baseline at `(x, y)` from the bottom-left corner; the line box
    /// starts one font size above the baseline.
    pub fn title_position(&self) -> (f64, f64) {
        let top = self.page_height - self.placement.y - self.placement.font_size;
        (self.placement.x, top.max(0.0))
    }
}

impl PageDecorator for TitleDecorator {
    fn decorate_page<'a>(
        &mut self,
        context: &genpdf::Context,
        area: render::Area<'a>,
        style: Style,
    ) -> std::result::Result<render::Area<'a>, LayoutError> {
        self.page += 1;
        if self.page == 1 {
            let (x, top) = self.title_position();
            let title_style = style
                .bold()
                .with_font_size(font_size(self.placement.font_size));
            let fits = area.print_str(
                &context.font_cache,
                Position::new(pt_to_mm(x), pt_to_mm(top)),
                title_style,
                &self.title,
            )?;
            if !fits {
                warn!("Document title {:?} does not fit on the page", self.title);
            }
        }
        Ok(area)
    }
}

/// Cell decorator drawing table grid lines in a fixed color.
///
/// The wrapped decorator strokes its lines with the color of the style it receives, so the grid
/// color is set on that style.
pub struct GridDecorator<D = FrameCellDecorator> {
    inner: D,
    color: Color,
}

impl GridDecorator {
    /// Creates a decorator drawing inner, outer and continuation borders in the grid color.
    pub fn new(grid: GridLines) -> Self {
        Self::wrap(FrameCellDecorator::new(true, true, true), grid.color())
    }
}

impl<D: CellDecorator> GridDecorator<D> {
    pub fn wrap(inner: D, color: Color) -> Self {
        Self { inner, color }
    }
}

impl<D: CellDecorator> CellDecorator for GridDecorator<D> {
    fn set_table_size(&mut self, num_columns: usize, num_rows: usize) {
        self.inner.set_table_size(num_columns, num_rows);
    }

    fn decorate_cell(
        &mut self,
        column: usize,
        row: usize,
        has_more: bool,
        area: render::Area<'_>,
        style: Style,
    ) {
        self.inner
            .decorate_cell(column, row, has_more, area, style.with_color(self.color));
    }
}

/// A word or word part of a wrapped line, printed in one style.
#[derive(Clone, Debug)]
struct Fragment {
    text: String,
    style: Style,
    underline: bool,
}

/// Text element for parsed inline markup.
///
/// Words are wrapped greedily at the width of the first area the element is rendered in, and
/// `'\n'` in a span starts a new line.  Lines that do not fit are kept for the next call, so a
/// long text continues in the next column.
pub struct MarkupText {
    spans: Vec<Span>,
    alignment: Alignment,
    lines: VecDeque<Vec<Fragment>>,
    wrapped: bool,
}

impl MarkupText {
    pub fn new(spans: Vec<Span>) -> Self {
        Self {
            spans,
            alignment: Alignment::Left,
            lines: VecDeque::new(),
            wrapped: false,
        }
    }

    /// Sets the alignment of every line and returns the element.
    pub fn aligned(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    fn wrap(&mut self, font_cache: &FontCache, style: Style, width: Mm) {
        let mut lines = VecDeque::new();
        let mut line: Vec<Fragment> = Vec::new();
        let mut x = Mm::default();

        for span in &self.spans {
            let span_style = style.and(span.style());
            for (index, segment) in span.text().split('\n').enumerate() {
                if index > 0 {
                    lines.push_back(mem::take(&mut line));
                    x = Mm::default();
                }
                for word in segment.split_inclusive(' ') {
                    let word_width = span_style.str_width(font_cache, word);
                    let at_word_boundary = line
                        .last()
                        .map_or(false, |fragment| fragment.text.ends_with(' '));
                    if at_word_boundary && x + word_width > width {
                        lines.push_back(mem::take(&mut line));
                        x = Mm::default();
                    }
                    line.push(Fragment {
                        text: word.to_owned(),
                        style: span_style,
                        underline: span.is_underlined(),
                    });
                    x += word_width;
                }
            }
        }
        if !line.is_empty() {
            lines.push_back(line);
        }

        self.lines = lines;
        self.wrapped = true;
    }

    fn line_offset(&self, width: Mm, max_width: Mm) -> Mm {
        match self.alignment {
            Alignment::Left => Mm::default(),
            Alignment::Center => (max_width - width) / 2.0,
            Alignment::Right => max_width - width,
        }
    }
}

fn line_width(font_cache: &FontCache, line: &[Fragment]) -> Mm {
    line.iter()
        .map(|fragment| fragment.style.str_width(font_cache, &fragment.text))
        .sum()
}

fn draw_underlines(
    area: &render::Area<'_>,
    font_cache: &FontCache,
    line: &[Fragment],
    offset: Mm,
    baseline: Mm,
) {
    let mut x = offset;
    for (index, fragment) in line.iter().enumerate() {
        let width = fragment.style.str_width(font_cache, &fragment.text);
        if fragment.underline {
            let continued = line.get(index + 1).map_or(false, |next| next.underline);
            let length = if continued {
                width
            } else {
                fragment.style.str_width(font_cache, fragment.text.trim_end())
            };
            let y = baseline + pt_to_mm(f64::from(fragment.style.font_size()) * UNDERLINE_OFFSET);
            area.draw_line(
                vec![Position::new(x, y), Position::new(x + length, y)],
                fragment.style,
            );
        }
        x += width;
    }
}

impl Element for MarkupText {
    fn render(
        &mut self,
        context: &genpdf::Context,
        mut area: render::Area<'_>,
        style: Style,
    ) -> std::result::Result<RenderResult, LayoutError> {
        let font_cache = &context.font_cache;
        if !self.wrapped {
            self.wrap(font_cache, style, area.size().width);
        }

        let line_height = style.line_height(font_cache);
        let baseline = style.font(font_cache).glyph_height(style.font_size());
        let mut result = RenderResult::default();

        while let Some(line) = self.lines.front() {
            let width = line_width(font_cache, line);
            let offset = self.line_offset(width, area.size().width);
            {
                let position = Position::new(offset, 0);
                let Some(mut section) = area.text_section(font_cache, position, style) else {
                    result.has_more = true;
                    break;
                };
                for fragment in line {
                    section.print_str(&fragment.text, fragment.style)?;
                }
            }
            draw_underlines(&area, font_cache, line, offset, baseline);

            result.size = result.size.stack_vertical(Size::new(width, line_height));
            area.add_offset(Position::new(0, line_height));
            self.lines.pop_front();
        }

        Ok(result)
    }
}

fn markup_error(text: &str, err: crate::richtext::ParseError) -> Error {
    Error::Markup {
        text: text.to_owned(),
        index: err.index(),
        message: err.message().to_owned(),
    }
}

/// Parses the inline markup of a text block into a markup text element.
pub fn markup_text(block: &TextBlock) -> Result<MarkupText> {
    let spans = parse_markup(block.text()).map_err(|err| markup_error(block.text(), err))?;
    Ok(MarkupText::new(spans))
}

fn text_element(block: &TextBlock) -> Result<Box<dyn Element>> {
    let text = markup_text(block)?.styled(block.style().to_genpdf());
    let padding = match block.style().role() {
        TextRole::Heading => Margins::trbl(
            pt_to_mm(HEADING_SPACE_BEFORE_PT),
            0,
            pt_to_mm(HEADING_SPACE_AFTER_PT),
            0,
        ),
        TextRole::Normal => Margins::trbl(0, 0, pt_to_mm(BLOCK_SPACE_AFTER_PT), 0),
    };
    Ok(Box::new(text.padded(padding)))
}

/// Converts a table block into a `genpdf` table with equal column weights.
pub fn table_layout(block: &TableBlock) -> Result<TableLayout> {
    let mut table = TableLayout::new(vec![1; block.column_count()]);
    if let Some(grid) = block.grid() {
        table.set_cell_decorator(GridDecorator::new(grid));
    }

    let alignment = Alignment::from(block.alignment());
    for row in block.rows() {
        let mut cells: Vec<Box<dyn Element>> = Vec::with_capacity(row.len());
        for cell in row {
            let text = markup_text(cell)?
                .aligned(alignment)
                .styled(cell.style().to_genpdf())
                .padded(Margins::all(pt_to_mm(CELL_PADDING_PT)));
            cells.push(Box::new(text));
        }
        table.push_row(cells)?;
    }
    Ok(table)
}

fn block_element(block: &RenderBlock) -> Result<Box<dyn Element>> {
    match block {
        RenderBlock::Text(text) => text_element(text),
        RenderBlock::Table(table) => {
            let padding = Margins::trbl(0, 0, pt_to_mm(BLOCK_SPACE_AFTER_PT), 0);
            Ok(Box::new(table_layout(table)?.padded(padding)))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::fonts;
    use crate::model::TextStyle;
    use crate::style::GridColor;

    #[test]
    fn title_position_is_measured_from_the_top() {
        let placement = TitlePlacement {
            x: 20.0,
            y: 560.0,
            font_size: 16.0,
        };
        let decorator = TitleDecorator::new("Sheet", placement, 595.27);
        let (x, top) = decorator.title_position();
        assert_eq!(x, 20.0);
        assert!((top - 19.27).abs() < 1e-9);
    }

    #[test]
    fn markup_errors_surface_before_rendering() {
        let block = TextBlock::new("<b>open", TextStyle::normal(9));
        let err = markup_text(&block).err().expect("markup error");
        assert!(matches!(err, Error::Markup { index: 7, .. }));
    }

    #[test]
    fn tables_convert_row_by_row() {
        let cell = TextBlock::new("<i>x</i> &amp; <u>y</u>", TextStyle::normal(8));
        let block = TableBlock::new(
            vec![vec![cell.clone(), cell.clone()], vec![cell.clone(), cell]],
            Some(GridLines {
                color: GridColor::Grey,
            }),
        );
        assert!(table_layout(&block).is_ok());
    }

    #[test]
    fn story_is_converted_eagerly() {
        let story = vec![
            RenderBlock::Text(TextBlock::new("a && b", TextStyle::heading(12))),
            RenderBlock::Text(TextBlock::new("a <q> b", TextStyle::normal(9))),
        ];
        let flow = ColumnFlow::from_story(
            ColumnLayout::default(),
            PageSize::new(841.89, 595.27),
            3,
            &story,
        );
        assert!(matches!(flow, Err(Error::Markup { index: 2, .. })));
    }

    #[derive(Default)]
    struct Recorded {
        table_size: Option<(usize, usize)>,
        colors: Vec<Option<Color>>,
    }

    struct RecordingDecorator(Rc<RefCell<Recorded>>);

    impl CellDecorator for RecordingDecorator {
        fn set_table_size(&mut self, num_columns: usize, num_rows: usize) {
            self.0.borrow_mut().table_size = Some((num_columns, num_rows));
        }

        fn decorate_cell(
            &mut self,
            _column: usize,
            _row: usize,
            _has_more: bool,
            _area: render::Area<'_>,
            style: Style,
        ) {
            self.0.borrow_mut().colors.push(style.color());
        }
    }

    #[test]
    fn grid_decorator_strokes_in_the_grid_color() {
        let recorded = Rc::new(RefCell::new(Recorded::default()));
        let grid = GridLines {
            color: GridColor::DarkBlue,
        };
        let mut decorator =
            GridDecorator::wrap(RecordingDecorator(Rc::clone(&recorded)), grid.color());

        let renderer = render::Renderer::new(Size::new(100, 100), "grid").expect("renderer");
        let area = renderer.first_page().first_layer().area();
        decorator.set_table_size(2, 1);
        decorator.decorate_cell(0, 0, false, area.clone(), Style::new().bold());
        decorator.decorate_cell(1, 0, false, area, Style::new().with_color(Color::Rgb(1, 2, 3)));

        let recorded = recorded.borrow();
        assert_eq!(recorded.table_size, Some((2, 1)));
        assert_eq!(recorded.colors, vec![Some(Color::Rgb(0, 0, 139)); 2]);
    }

    #[test]
    fn grid_decorator_draws_frames_with_the_resolved_color() {
        let mut decorator = GridDecorator::new(GridLines {
            color: GridColor::Grey,
        });
        assert_eq!(decorator.color, Color::Rgb(128, 128, 128));

        let renderer = render::Renderer::new(Size::new(100, 100), "grid").expect("renderer");
        let area = renderer.first_page().first_layer().area();
        decorator.set_table_size(1, 1);
        decorator.decorate_cell(0, 0, false, area, Style::new());
    }

    fn font_cache() -> Option<FontCache> {
        match fonts::default_font_family() {
            Ok(family) => Some(FontCache::new(family)),
            Err(err) => {
                eprintln!("Skipping wrapping assertions: {err}");
                None
            }
        }
    }

    fn wrapped_lines(text: &str, width: f64) -> Option<Vec<Vec<Fragment>>> {
        let cache = font_cache()?;
        let block = TextBlock::new(text, TextStyle::normal(9));
        let mut element = markup_text(&block).expect("valid markup");
        element.wrap(&cache, block.style().to_genpdf(), Mm::from(width));
        Some(element.lines.into_iter().collect())
    }

    fn line_texts(lines: &[Vec<Fragment>]) -> Vec<String> {
        lines
            .iter()
            .map(|line| line.iter().map(|fragment| fragment.text.as_str()).collect())
            .collect()
    }

    #[test]
    fn line_breaks_start_new_lines() {
        let Some(lines) = wrapped_lines("one<br/><u>two</u><br/><br/>three", 500.0) else {
            return;
        };
        assert_eq!(line_texts(&lines), vec!["one", "two", "", "three"]);
        assert!(lines[1][0].underline);
        assert!(!lines[0][0].underline);
    }

    #[test]
    fn words_wrap_at_spaces_only() {
        let Some(lines) = wrapped_lines("cmd1 && cmd2", 1.0) else {
            return;
        };
        assert_eq!(line_texts(&lines), vec!["cmd1 ", "&& ", "cmd2"]);

        let Some(lines) = wrapped_lines("foo<b>bar</b> baz", 1.0) else {
            return;
        };
        assert_eq!(line_texts(&lines), vec!["foobar ", "baz"]);
        assert!(lines[0][1].style.is_bold());
    }

    #[test]
    fn short_text_stays_on_one_line() {
        let Some(lines) = wrapped_lines("git <b>status</b>", 500.0) else {
            return;
        };
        assert_eq!(line_texts(&lines), vec!["git status"]);
    }
}
