//! Table reconstruction from ruling lines and cell rectangles.
//!
//! Rulings are cleaned and crossed into a grid of minimal cells, cells
//! are clustered into table regions, and each region is assembled into
//! rows and columns with shared spanning cells.

mod assemble;
mod clustering;
mod finder;
mod grid;
mod intersections;
mod rectangle;
mod ruling;
mod types;

// Re-export public types
pub use assemble::{Span, Table};
pub use clustering::Region;
pub use finder::{Extraction, GridSummary, PageInput, TableFinder};
pub use intersections::IntersectionMap;
pub use rectangle::{HasBounds, Rectangle};
pub use ruling::Ruling;
pub use types::{Cell, HRulingId, Orientation, Point, TableSettings, TextElement, VRulingId};

// Re-export public API functions
pub use assemble::{assemble_table, assign_text};
pub use clustering::{cluster_list, cluster_regions, find_regions, snap_values, snapped_boundaries};
pub use finder::{extract_pages, extract_pages_with_threads, extract_tables};
pub use grid::find_cells;
pub use intersections::find_intersections;
pub use rectangle::{
    bounding_box_of, compare_order, compare_order_with_threshold, reading_order_lines,
    sort_reading_order,
};
pub use ruling::{collapse, collapse_with, split_rulings};
