//! Assembly of a region's cells into rows and columns.
//!
//! Boundaries come from the cells' own edges plus the region's bounding
//! box, which stands in for the outer frame when the page drew none.
//! Rows follow ascending top and columns ascending left. The
//! reading-order heuristic is never used here.

use std::sync::Arc;

use itertools::Itertools;
use tracing::trace;

use super::clustering::snapped_boundaries;
use super::rectangle::{HasBounds, Rectangle, reading_order_lines};
use super::types::{Cell, TableSettings, TextElement};

/// Placement of a cell that covers more than one slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span {
    pub row: usize,
    pub col: usize,
    pub row_span: usize,
    pub col_span: usize,
}

/// A reconstructed table.
///
/// Every row has the same number of slots. A spanning cell fills each
/// slot it covers with a clone of the same `Arc`, so content is shared,
/// never copied. `None` marks a hole in an incomplete grid.
#[derive(Clone, Debug)]
pub struct Table {
    bounds: Rectangle,
    row_boundaries: Vec<f64>,
    col_boundaries: Vec<f64>,
    rows: Vec<Vec<Option<Arc<Cell>>>>,
    spans: Vec<Span>,
    cell_count: usize,
}

impl HasBounds for Table {
    fn bounds(&self) -> Rectangle {
        self.bounds
    }
}

impl Table {
    pub fn bounds(&self) -> Rectangle {
        self.bounds
    }

    pub fn rows(&self) -> &[Vec<Option<Arc<Cell>>>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn col_count(&self) -> usize {
        self.col_boundaries.len().saturating_sub(1)
    }

    /// Distinct cells placed in the table.
    pub fn cell_count(&self) -> usize {
        self.cell_count
    }

    /// Row edges, top to bottom; one more than the row count.
    pub fn row_boundaries(&self) -> &[f64] {
        &self.row_boundaries
    }

    /// Column edges, left to right; one more than the column count.
    pub fn col_boundaries(&self) -> &[f64] {
        &self.col_boundaries
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row)?.get(col)?.as_deref()
    }

    /// Text at a slot; holes and out-of-range slots read as empty.
    pub fn text(&self, row: usize, col: usize) -> &str {
        self.cell(row, col).map_or("", |cell| cell.text.as_str())
    }

    /// Cell text per slot, `None` for holes.
    pub fn to_text_rows(&self) -> Vec<Vec<Option<String>>> {
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|slot| slot.as_ref().map(|cell| cell.text.clone()))
                    .collect()
            })
            .collect()
    }
}

/// Build a table from one region's cells.
///
/// `bounds` is the region's bounding box (or a larger caller area); its
/// edges join the boundary lists as virtual rulings. Overlapping cells
/// are not expected; if one shows up, the slot keeps the first cell and
/// the later cell records no [`Span`].
pub fn assemble_table(bounds: Rectangle, cells: Vec<Cell>, settings: &TableSettings) -> Table {
    let tol = settings.snap_tolerance;

    let mut ys = vec![bounds.top(), bounds.bottom()];
    let mut xs = vec![bounds.left(), bounds.right()];
    for cell in &cells {
        ys.extend([cell.bounds.top(), cell.bounds.bottom()]);
        xs.extend([cell.bounds.left(), cell.bounds.right()]);
    }
    let row_boundaries = snapped_boundaries(ys, tol);
    let col_boundaries = snapped_boundaries(xs, tol);

    let n_rows = row_boundaries.len().saturating_sub(1);
    let n_cols = col_boundaries.len().saturating_sub(1);
    let mut rows: Vec<Vec<Option<Arc<Cell>>>> = vec![vec![None; n_cols]; n_rows];
    let mut spans = Vec::new();
    let mut cell_count = 0usize;

    for cell in cells {
        let (r0, r1) = slot_range(&row_boundaries, cell.bounds.top(), cell.bounds.bottom());
        let (c0, c1) = slot_range(&col_boundaries, cell.bounds.left(), cell.bounds.right());
        if r1 > n_rows || c1 > n_cols {
            continue;
        }

        let shared = Arc::new(cell);
        let mut placed = false;
        let mut blocked = false;
        for row in &mut rows[r0..r1] {
            for slot in &mut row[c0..c1] {
                if slot.is_none() {
                    *slot = Some(Arc::clone(&shared));
                    placed = true;
                } else {
                    trace!(bounds = %shared.bounds, "slot already covered by another cell");
                    blocked = true;
                }
            }
        }
        if !placed {
            continue;
        }
        cell_count += 1;
        if !blocked && (r1 - r0 > 1 || c1 - c0 > 1) {
            spans.push(Span {
                row: r0,
                col: c0,
                row_span: r1 - r0,
                col_span: c1 - c0,
            });
        }
    }

    Table {
        bounds,
        row_boundaries,
        col_boundaries,
        rows,
        spans,
        cell_count,
    }
}

/// Slot range `[start, end)` covered by the interval `lo..hi`.
fn slot_range(boundaries: &[f64], lo: f64, hi: f64) -> (usize, usize) {
    let start = nearest_index(boundaries, lo);
    let end = nearest_index(boundaries, hi).max(start + 1);
    (start, end)
}

fn nearest_index(boundaries: &[f64], value: f64) -> usize {
    let pos = boundaries.partition_point(|b| *b < value);
    if pos == 0 {
        return 0;
    }
    if pos == boundaries.len() {
        return pos - 1;
    }
    if (boundaries[pos] - value).abs() < (value - boundaries[pos - 1]).abs() {
        pos
    } else {
        pos - 1
    }
}

/// Attach text to the cells containing each element's centre.
///
/// Inside a cell, elements are put in reading order; elements on one
/// line are joined by a space and lines by `'\r'` (or a space when
/// line returns are off).
pub fn assign_text(cells: Vec<Cell>, text: &[TextElement], settings: &TableSettings) -> Vec<Cell> {
    if text.is_empty() {
        return cells;
    }
    let mut per_cell: Vec<Vec<&TextElement>> = vec![Vec::new(); cells.len()];
    for element in text {
        let center = element.bounds.center();
        if let Some(idx) = cells.iter().position(|c| c.bounds.contains_point(center)) {
            per_cell[idx].push(element);
        }
    }

    let line_sep = if settings.use_line_returns { "\r" } else { " " };
    cells
        .into_iter()
        .zip(per_cell)
        .map(|(cell, elements)| {
            if elements.is_empty() {
                return cell;
            }
            let lines = reading_order_lines(elements, settings.vertical_comparison_threshold);
            let joined = lines
                .iter()
                .map(|line| {
                    line.iter()
                        .map(|e| e.text.trim())
                        .filter(|t| !t.is_empty())
                        .join(" ")
                })
                .join(line_sep);
            let text = joined.trim().to_string();
            cell.with_text(text)
        })
        .collect()
}
