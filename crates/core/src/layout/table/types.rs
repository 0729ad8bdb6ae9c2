//! Table reconstruction types and settings.

use ordered_float::OrderedFloat;

use super::rectangle::{HasBounds, Rectangle};

// Default constants
pub(crate) const DEFAULT_VERTICAL_COMPARISON_THRESHOLD: f64 = 0.4;
pub(crate) const DEFAULT_ORIENTATION_SNAP_DEGREES: f64 = 1.0;
pub(crate) const DEFAULT_SNAP_TOLERANCE: f64 = 0.5;
pub(crate) const DEFAULT_JOIN_TOLERANCE: f64 = 1.0;
pub(crate) const DEFAULT_INTERSECTION_TOLERANCE: f64 = 2.0;
pub(crate) const DEFAULT_MIN_TABLE_CELLS: usize = 2;
pub(crate) const DEFAULT_MIN_TABULAR_CELLS: usize = 4;

/// Tolerance used when deciding whether two rectangles touch.
pub(crate) const TOUCH_TOLERANCE: f64 = 0.01;

/// A 2D point (x, y) in top-left origin page space.
pub type Point = (f64, f64);

// Key types for ordered float maps
pub(crate) type KeyF64 = OrderedFloat<f64>;
pub(crate) type KeyPoint = (KeyF64, KeyF64);

pub(crate) fn key_f64(v: f64) -> KeyF64 {
    OrderedFloat(v)
}

pub(crate) fn key_point(x: f64, y: f64) -> KeyPoint {
    (OrderedFloat(x), OrderedFloat(y))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// One unit of a reconstructed grid, with the text found inside it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Cell {
    pub bounds: Rectangle,
    pub text: String,
}

impl Cell {
    pub fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self::from_bounds(Rectangle::new(top, left, width, height))
    }

    pub fn from_bounds(bounds: Rectangle) -> Self {
        Self {
            bounds,
            text: String::new(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }
}

impl HasBounds for Cell {
    fn bounds(&self) -> Rectangle {
        self.bounds
    }
}

/// A positioned run of text supplied by the page geometry provider.
#[derive(Clone, Debug, PartialEq)]
pub struct TextElement {
    pub bounds: Rectangle,
    pub text: String,
}

impl TextElement {
    pub fn new(bounds: Rectangle, text: impl Into<String>) -> Self {
        Self {
            bounds,
            text: text.into(),
        }
    }
}

impl HasBounds for TextElement {
    fn bounds(&self) -> Rectangle {
        self.bounds
    }
}

/// Tunables for every stage of the reconstruction pipeline.
///
/// The defaults were picked against real-world PDFs whose line geometry
/// is re-derived from content streams and therefore rarely lines up
/// exactly. Adjust per document source rather than in algorithm code.
#[derive(Clone, Debug)]
pub struct TableSettings {
    /// Minimum vertical overlap ratio for two boxes to share a text line.
    pub vertical_comparison_threshold: f64,
    /// Maximum angle (degrees) a segment may deviate from an axis.
    pub orientation_snap_degrees: f64,
    /// Coordinates closer than this collapse to one canonical value.
    pub snap_tolerance: f64,
    /// Largest gap between collinear segments that still join.
    pub join_tolerance: f64,
    /// Perpendicular slack when testing whether two rulings cross.
    pub intersection_tolerance: f64,
    pub min_ruling_length: f64,
    pub min_table_cells: usize,
    /// Add the caller area's edges as rulings when an area is given.
    pub area_as_rulings: bool,
    pub use_line_returns: bool,
    pub min_tabular_cells: usize,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            vertical_comparison_threshold: DEFAULT_VERTICAL_COMPARISON_THRESHOLD,
            orientation_snap_degrees: DEFAULT_ORIENTATION_SNAP_DEGREES,
            snap_tolerance: DEFAULT_SNAP_TOLERANCE,
            join_tolerance: DEFAULT_JOIN_TOLERANCE,
            intersection_tolerance: DEFAULT_INTERSECTION_TOLERANCE,
            min_ruling_length: 0.0,
            min_table_cells: DEFAULT_MIN_TABLE_CELLS,
            area_as_rulings: true,
            use_line_returns: true,
            min_tabular_cells: DEFAULT_MIN_TABULAR_CELLS,
        }
    }
}

// Internal ID types for efficient indexing
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct VRulingId(pub usize);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct HRulingId(pub usize);
