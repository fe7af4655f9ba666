//! Formatting of raw string grids into styled table blocks.

use crate::error::{Error, Result};
use crate::model::{TableBlock, TextBlock, TextStyle};
use crate::style::TableStyle;

/// Wraps one raw cell string in a text block with its own style value.
///
/// The cell uses the normal role at the table's cell font size, plus the column font override
/// that [`TableStyle::face_for_column`] selects for its position.
pub fn format_cell(
    raw: &str,
    column: usize,
    column_count: usize,
    style: &TableStyle,
) -> TextBlock {
    let cell_style = TextStyle::normal(style.cell_font_size)
        .with_face(style.face_for_column(column, column_count));
    TextBlock::new(raw, cell_style)
}

/// Formats every cell of `rows` in row-major order.
///
/// The resulting table has exactly as many rows and columns as the input, carries the table's
/// grid decoration and is left aligned.
pub fn format_table(rows: &[Vec<String>], style: &TableStyle) -> Result<TableBlock> {
    let column_count = validate_shape(rows)?;

    let cells: Vec<Vec<TextBlock>> = rows
        .iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(column, raw)| format_cell(raw, column, column_count, style))
                .collect()
        })
        .collect();

    Ok(TableBlock::new(cells, style.grid))
}

fn validate_shape(rows: &[Vec<String>]) -> Result<usize> {
    let expected = match rows.first() {
        Some(first) if !first.is_empty() => first.len(),
        _ => return Err(Error::EmptyTable),
    };

    for (row, cells) in rows.iter().enumerate().skip(1) {
        if cells.len() != expected {
            return Err(Error::RaggedTable {
                row,
                expected,
                found: cells.len(),
            });
        }
    }

    Ok(expected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HorizontalAlignment;
    use crate::style::{FontFace, GridColor, GridLines};

    fn rows(grid: &[&[&str]]) -> Vec<Vec<String>> {
        grid.iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect()
    }

    fn style(left: Option<FontFace>, right: Option<FontFace>) -> TableStyle {
        TableStyle {
            grid: Some(GridLines {
                color: GridColor::Black,
            }),
            left_column_font: left,
            right_column_font: right,
            cell_font_size: 8,
        }
    }

    #[test]
    fn table_shape_is_preserved() {
        let input = rows(&[&["a", "b", "c"], &["d", "e", "f"]]);
        let table = format_table(&input, &style(None, None)).unwrap();

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 3);
        assert_eq!(table.cell_count(), 6);
        assert_eq!(table.rows()[1][2].text(), "f");
        assert_eq!(table.alignment(), HorizontalAlignment::Left);
        assert_eq!(
            table.grid(),
            Some(GridLines {
                color: GridColor::Black
            })
        );
    }

    #[test]
    fn cells_use_the_cell_font_size() {
        let block = format_cell("x", 1, 3, &style(None, None));
        assert_eq!(block.style(), TextStyle::normal(8));
    }

    #[test]
    fn overrides_do_not_leak_into_inner_columns() {
        let input = rows(&[
            &["a", "b", "c", "d"],
            &["e", "f", "g", "h"],
            &["i", "j", "k", "l"],
        ]);
        let table =
            format_table(&input, &style(Some(FontFace::Bold), Some(FontFace::Italic))).unwrap();

        for row in table.rows() {
            let faces: Vec<_> = row.iter().map(|cell| cell.style().face()).collect();
            assert_eq!(
                faces,
                vec![Some(FontFace::Bold), None, None, Some(FontFace::Italic)]
            );
        }
    }

    #[test]
    fn right_override_does_not_bleed_into_the_next_row() {
        let input = rows(&[&["a", "b"], &["c", "d"]]);
        let table = format_table(&input, &style(None, Some(FontFace::Bold))).unwrap();

        assert_eq!(table.rows()[0][1].style().face(), Some(FontFace::Bold));
        assert_eq!(table.rows()[1][0].style().face(), None);
        assert_eq!(table.rows()[1][1].style().face(), Some(FontFace::Bold));
    }

    #[test]
    fn single_column_prefers_the_right_override() {
        let input = rows(&[&["a"], &["b"]]);
        let both =
            format_table(&input, &style(Some(FontFace::Bold), Some(FontFace::Italic))).unwrap();
        assert!(both
            .rows()
            .iter()
            .all(|row| row[0].style().face() == Some(FontFace::Italic)));

        let left_only = format_table(&input, &style(Some(FontFace::Bold), None)).unwrap();
        assert_eq!(left_only.rows()[0][0].style().face(), Some(FontFace::Bold));
    }

    #[test]
    fn ragged_table_is_rejected() {
        let input = rows(&[&["a", "b"], &["c"]]);
        let err = format_table(&input, &style(None, None)).unwrap_err();
        assert!(matches!(
            err,
            Error::RaggedTable {
                row: 1,
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn empty_tables_are_rejected() {
        let err = format_table(&[], &style(None, None)).unwrap_err();
        assert!(matches!(err, Error::EmptyTable));

        let err = format_table(&[Vec::new(), Vec::new()], &style(None, None)).unwrap_err();
        assert!(matches!(err, Error::EmptyTable));
    }
}
