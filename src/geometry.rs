//! Column geometry of a cheat sheet page.
//!
//! Frames are expressed in PDF points with the origin in the bottom-left corner of the page.

/// A rectangular page region into which flowed content is placed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    /// Left edge, measured from the left page edge.
    pub x: f64,
    /// Bottom edge, measured from the bottom page edge.
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Frame {
    /// Distance of the frame's top edge from the top page edge.
    pub fn top_offset(&self, page_height: f64) -> f64 {
        page_height - (self.y + self.height)
    }

    /// Right edge, measured from the left page edge.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }
}

/// Margins, gutter and first-page title band used to split a page into columns.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColumnLayout {
    pub left_margin: f64,
    pub right_margin: f64,
    pub top_margin: f64,
    pub bottom_margin: f64,
    /// Horizontal space between two adjacent columns.
    pub gutter: f64,
    /// Extra space above the columns of the first page, taken by the title band.
    pub first_page_reservation: f64,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            left_margin: 20.0,
            right_margin: 20.0,
            top_margin: 20.0,
            bottom_margin: 20.0,
            gutter: 20.0,
            first_page_reservation: 40.0,
        }
    }
}

impl ColumnLayout {
    /// Splits a page into `columns` equal frames laid out left to right.
    ///
    /// The values are not clamped: a page too small for the margins yields frames with negative
    /// width or height.
    pub fn compute_columns(
        &self,
        page_width: f64,
        page_height: f64,
        columns: usize,
        first_page: bool,
    ) -> Vec<Frame> {
        if columns == 0 {
            return Vec::new();
        }

        let gutters = self.gutter * (columns - 1) as f64;
        let usable_width = page_width - self.left_margin - self.right_margin - gutters;
        let width = usable_width / columns as f64;

        let mut height = page_height - self.top_margin - self.bottom_margin;
        if first_page {
            height -= self.first_page_reservation;
        }

        (0..columns)
            .map(|index| Frame {
                x: self.left_margin + index as f64 * (width + self.gutter),
                y: self.bottom_margin,
                width,
                height,
            })
            .collect()
    }
}

/// Splits a page into columns using the default [`ColumnLayout`].
pub fn compute_columns(
    page_width: f64,
    page_height: f64,
    columns: usize,
    first_page: bool,
) -> Vec<Frame> {
    ColumnLayout::default().compute_columns(page_width, page_height, columns, first_page)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDTH: f64 = 841.89;
    const HEIGHT: f64 = 595.27;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn returns_one_frame_per_column() {
        for columns in 1..=5 {
            let frames = compute_columns(WIDTH, HEIGHT, columns, false);
            assert_eq!(frames.len(), columns);
            assert!(frames.iter().all(|frame| frame.width > 0.0));
        }
    }

    #[test]
    fn frames_are_separated_by_the_gutter() {
        let layout = ColumnLayout::default();
        let frames = layout.compute_columns(WIDTH, HEIGHT, 3, true);

        assert!(approx(frames[0].x, layout.left_margin));
        for pair in frames.windows(2) {
            assert!(approx(pair[0].right() + layout.gutter, pair[1].x));
        }
        assert!(approx(
            frames[2].right(),
            WIDTH - layout.right_margin
        ));
    }

    #[test]
    fn three_columns_on_landscape_a4() {
        let frames = compute_columns(WIDTH, HEIGHT, 3, false);
        let width = (WIDTH - 40.0 - 40.0) / 3.0;
        for frame in &frames {
            assert!(approx(frame.width, width));
            assert!(approx(frame.y, 20.0));
            assert!(approx(frame.height, HEIGHT - 40.0));
        }
    }

    #[test]
    fn first_page_reserves_the_title_band() {
        let layout = ColumnLayout::default();
        let first = layout.compute_columns(WIDTH, HEIGHT, 3, true);
        let later = layout.compute_columns(WIDTH, HEIGHT, 3, false);

        for (first, later) in first.iter().zip(&later) {
            assert!(approx(
                later.height - first.height,
                layout.first_page_reservation
            ));
            assert!(approx(first.x, later.x));
            assert!(approx(first.y, later.y));
        }
        assert!(approx(first[0].top_offset(HEIGHT), 60.0));
        assert!(approx(later[0].top_offset(HEIGHT), 20.0));
    }

    #[test]
    fn zero_columns_yield_no_frames() {
        assert!(compute_columns(WIDTH, HEIGHT, 0, true).is_empty());
    }
}
