//! Ruling lines: axis-snapped segments taken from page graphics.
//!
//! A ruling is horizontal or vertical once snapped; anything further
//! off-axis than the angular tolerance is oblique and never reaches the
//! grid stages.

use std::collections::BTreeMap;

use ordered_float::OrderedFloat;
use tracing::trace;

use crate::error::{Result, TableError};

use super::clustering::snap_values;
use super::rectangle::{HasBounds, Rectangle};
use super::types::{DEFAULT_ORIENTATION_SNAP_DEGREES, Orientation, Point};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ruling {
    x0: f64,
    x1: f64,
    top: f64,
    bottom: f64,
    orientation: Option<Orientation>,
}

impl HasBounds for Ruling {
    fn bounds(&self) -> Rectangle {
        Rectangle::from_edges(self.x0, self.top, self.x1, self.bottom)
    }
}

/// Order two coordinates ascending. Unlike `f64::min`/`max` a NaN is
/// kept, so [`Ruling::is_finite`] still sees it.
fn ascending(a: f64, b: f64) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}

impl Ruling {
    /// Horizontal ruling at `y` spanning `x0..x1` (either order).
    pub fn horizontal(y: f64, x0: f64, x1: f64) -> Self {
        let (x0, x1) = ascending(x0, x1);
        Self {
            x0,
            x1,
            top: y,
            bottom: y,
            orientation: Some(Orientation::Horizontal),
        }
    }

    /// Vertical ruling at `x` spanning `top..bottom` (either order).
    pub fn vertical(x: f64, top: f64, bottom: f64) -> Self {
        let (top, bottom) = ascending(top, bottom);
        Self {
            x0: x,
            x1: x,
            top,
            bottom,
            orientation: Some(Orientation::Vertical),
        }
    }

    /// Segment between two endpoints, snapped with the default angular tolerance.
    pub fn from_points(p0: Point, p1: Point) -> Self {
        Self::from_points_with_tolerance(p0, p1, DEFAULT_ORIENTATION_SNAP_DEGREES)
    }

    /// Segment between two endpoints.
    ///
    /// Within `snap_degrees` of an axis the segment is flattened onto it
    /// (the off-axis coordinate becomes the endpoints' mean). Otherwise
    /// the ruling is kept as an oblique segment and fails [`Ruling::validate`].
    pub fn from_points_with_tolerance(p0: Point, p1: Point, snap_degrees: f64) -> Self {
        let dx = (p1.0 - p0.0).abs();
        let dy = (p1.1 - p0.1).abs();
        let angle = dy.atan2(dx).to_degrees();

        if angle <= snap_degrees {
            Self::horizontal((p0.1 + p1.1) / 2.0, p0.0, p1.0)
        } else if angle >= 90.0 - snap_degrees {
            Self::vertical((p0.0 + p1.0) / 2.0, p0.1, p1.1)
        } else {
            let (x0, x1) = ascending(p0.0, p1.0);
            let (top, bottom) = ascending(p0.1, p1.1);
            Self {
                x0,
                x1,
                top,
                bottom,
                orientation: None,
            }
        }
    }

    pub fn x0(&self) -> f64 {
        self.x0
    }

    pub fn x1(&self) -> f64 {
        self.x1
    }

    pub fn top(&self) -> f64 {
        self.top
    }

    pub fn bottom(&self) -> f64 {
        self.bottom
    }

    pub fn orientation(&self) -> Option<Orientation> {
        self.orientation
    }

    pub fn is_horizontal(&self) -> bool {
        self.orientation == Some(Orientation::Horizontal)
    }

    pub fn is_vertical(&self) -> bool {
        self.orientation == Some(Orientation::Vertical)
    }

    pub fn is_oblique(&self) -> bool {
        self.orientation.is_none()
    }

    pub fn is_finite(&self) -> bool {
        self.x0.is_finite() && self.x1.is_finite() && self.top.is_finite() && self.bottom.is_finite()
    }

    /// Offset across the ruling's axis: y for horizontals, x otherwise.
    pub fn position(&self) -> f64 {
        match self.orientation {
            Some(Orientation::Horizontal) => self.top,
            _ => self.x0,
        }
    }

    /// Lower end along the ruling's axis.
    pub fn start(&self) -> f64 {
        match self.orientation {
            Some(Orientation::Horizontal) => self.x0,
            _ => self.top,
        }
    }

    /// Upper end along the ruling's axis.
    pub fn end(&self) -> f64 {
        match self.orientation {
            Some(Orientation::Horizontal) => self.x1,
            _ => self.bottom,
        }
    }

    pub fn length(&self) -> f64 {
        match self.orientation {
            Some(Orientation::Horizontal) => self.x1 - self.x0,
            Some(Orientation::Vertical) => self.bottom - self.top,
            None => (self.x1 - self.x0).hypot(self.bottom - self.top),
        }
    }

    /// Reject non-finite and oblique rulings.
    pub fn validate(&self) -> Result<Orientation> {
        if !self.is_finite() {
            return Err(TableError::InvalidGeometry(format!(
                "non-finite ruling ({}, {}) - ({}, {})",
                self.x0, self.top, self.x1, self.bottom
            )));
        }
        self.orientation.ok_or_else(|| {
            TableError::InvalidGeometry(format!(
                "oblique ruling ({}, {}) - ({}, {})",
                self.x0, self.top, self.x1, self.bottom
            ))
        })
    }

    /// Same ruling moved to a new cross-axis offset.
    pub(crate) fn with_position(&self, position: f64) -> Self {
        match self.orientation {
            Some(Orientation::Horizontal) => Self::horizontal(position, self.x0, self.x1),
            Some(Orientation::Vertical) => Self::vertical(position, self.top, self.bottom),
            None => *self,
        }
    }

    /// Same ruling with a new extent along its axis.
    pub(crate) fn with_span(&self, start: f64, end: f64) -> Self {
        match self.orientation {
            Some(Orientation::Horizontal) => Self::horizontal(self.top, start, end),
            Some(Orientation::Vertical) => Self::vertical(self.x0, start, end),
            None => *self,
        }
    }

    /// Lengthen both ends along the ruling's axis.
    pub fn expand(&self, amount: f64) -> Self {
        self.with_span(self.start() - amount, self.end() + amount)
    }

    /// Portion of the ruling inside `area`, if any.
    ///
    /// Non-finite rulings come back unchanged for [`Ruling::validate`] to reject.
    pub fn clip_to(&self, area: &Rectangle) -> Option<Self> {
        if !self.is_finite() {
            return Some(*self);
        }
        let (lo, hi, across, across_lo, across_hi) = match self.orientation? {
            Orientation::Horizontal => (
                area.left(),
                area.right(),
                self.top,
                area.top(),
                area.bottom(),
            ),
            Orientation::Vertical => (
                area.top(),
                area.bottom(),
                self.x0,
                area.left(),
                area.right(),
            ),
        };
        if across < across_lo || across > across_hi {
            return None;
        }
        let start = self.start().max(lo);
        let end = self.end().min(hi);
        if end < start {
            return None;
        }
        Some(self.with_span(start, end))
    }

    /// Crossing point of a horizontal/vertical pair.
    ///
    /// Each ruling is extended by `tolerance` along its axis first, so
    /// segments that stop a hair short of each other still meet.
    pub fn intersection_point(&self, other: &Ruling, tolerance: f64) -> Option<Point> {
        let (h, v) = match (self.orientation?, other.orientation?) {
            (Orientation::Horizontal, Orientation::Vertical) => (self, other),
            (Orientation::Vertical, Orientation::Horizontal) => (other, self),
            _ => return None,
        };
        let crosses = v.x0 >= h.x0 - tolerance
            && v.x0 <= h.x1 + tolerance
            && h.top >= v.top - tolerance
            && h.top <= v.bottom + tolerance;
        crosses.then_some((v.x0, h.top))
    }
}

/// Split rulings by orientation, dropping invalid geometry.
pub fn split_rulings(rulings: impl IntoIterator<Item = Ruling>) -> (Vec<Ruling>, Vec<Ruling>) {
    let mut horizontals = Vec::new();
    let mut verticals = Vec::new();
    for ruling in rulings {
        match ruling.validate() {
            Ok(Orientation::Horizontal) => horizontals.push(ruling),
            Ok(Orientation::Vertical) => verticals.push(ruling),
            Err(err) => trace!(%err, "dropping ruling"),
        }
    }
    (horizontals, verticals)
}

/// Merge near-duplicate collinear rulings, using one tolerance for both
/// position snapping and gap joining.
pub fn collapse(rulings: &[Ruling], tolerance: f64) -> Vec<Ruling> {
    collapse_with(rulings, tolerance, tolerance)
}

/// Merge near-duplicate collinear rulings.
///
/// Positions within `snap_tolerance` of each other (per orientation) are
/// moved to their cluster mean; rulings on the same position whose spans
/// overlap or leave a gap of at most `join_tolerance` become one ruling
/// covering both. The sweep is sorted by start, so a single pass reaches
/// the fixpoint. Oblique rulings are dropped.
pub fn collapse_with(rulings: &[Ruling], snap_tolerance: f64, join_tolerance: f64) -> Vec<Ruling> {
    let mut grouped: BTreeMap<(Orientation, OrderedFloat<f64>), Vec<Ruling>> = BTreeMap::new();
    for orientation in [Orientation::Horizontal, Orientation::Vertical] {
        let group: Vec<&Ruling> = rulings
            .iter()
            .filter(|r| r.orientation == Some(orientation))
            .collect();
        let snapped = snap_values(group.iter().map(|r| r.position()), snap_tolerance);
        for (ruling, position) in group.into_iter().zip(snapped) {
            grouped
                .entry((orientation, OrderedFloat(position)))
                .or_default()
                .push(ruling.with_position(position));
        }
    }

    let mut merged = Vec::new();
    for (_, group) in grouped {
        merged.extend(join_collinear(group, join_tolerance));
    }
    merged
}

/// Join rulings that share one position.
fn join_collinear(mut group: Vec<Ruling>, tolerance: f64) -> Vec<Ruling> {
    group.sort_by(|a, b| a.start().total_cmp(&b.start()));
    let mut joined: Vec<Ruling> = Vec::with_capacity(group.len());
    for ruling in group {
        match joined.last_mut() {
            Some(last) if ruling.start() <= last.end() + tolerance => {
                if ruling.end() > last.end() {
                    *last = last.with_span(last.start(), ruling.end());
                }
            }
            _ => joined.push(ruling),
        }
    }
    joined
}
