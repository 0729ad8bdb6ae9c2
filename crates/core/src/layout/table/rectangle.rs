//! Axis-aligned rectangle algebra shared by every layout stage.
//!
//! Coordinates use a top-left origin: `top` grows downward, so
//! `bottom = top + height` and `right = left + width`.

use std::cmp::Ordering;
use std::fmt;

use crate::error::{Result, TableError};

use super::clustering::DisjointSet;
use super::ruling::Ruling;
use super::types::{DEFAULT_VERTICAL_COMPARISON_THRESHOLD, Point};

/// Anything that occupies an axis-aligned box on the page.
pub trait HasBounds {
    fn bounds(&self) -> Rectangle;
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rectangle {
    top: f64,
    left: f64,
    width: f64,
    height: f64,
}

impl<T: HasBounds + ?Sized> HasBounds for &T {
    fn bounds(&self) -> Rectangle {
        (**self).bounds()
    }
}

impl HasBounds for Rectangle {
    fn bounds(&self) -> Rectangle {
        *self
    }
}

impl Rectangle {
    pub fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    /// Build a rectangle from its four edges.
    pub fn from_edges(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self::new(top, left, right - left, bottom - top)
    }

    /// Rectangle spanned by two opposite corners.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self::from_edges(a.0.min(b.0), a.1.min(b.1), a.0.max(b.0), a.1.max(b.1))
    }

    pub fn top(&self) -> f64 {
        self.top
    }

    pub fn left(&self) -> f64 {
        self.left
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn center(&self) -> Point {
        (self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    pub fn is_finite(&self) -> bool {
        self.top.is_finite()
            && self.left.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
    }

    /// Move the top edge, keeping the bottom edge fixed.
    pub fn set_top(&mut self, top: f64) {
        let bottom = self.bottom();
        self.top = top;
        self.height = bottom - top;
    }

    /// Move the left edge, keeping the right edge fixed.
    pub fn set_left(&mut self, left: f64) {
        let right = self.right();
        self.left = left;
        self.width = right - left;
    }

    /// Move the right edge, keeping the left edge fixed.
    pub fn set_right(&mut self, right: f64) {
        self.width = right - self.left;
    }

    /// Move the bottom edge, keeping the top edge fixed.
    pub fn set_bottom(&mut self, bottom: f64) {
        self.height = bottom - self.top;
    }

    pub fn vertical_overlap(&self, other: &Rectangle) -> f64 {
        (self.bottom().min(other.bottom()) - self.top.max(other.top)).max(0.0)
    }

    pub fn vertically_overlaps(&self, other: &Rectangle) -> bool {
        self.vertical_overlap(other) > 0.0
    }

    /// Vertical overlap divided by the height of the combined vertical span.
    pub fn vertical_overlap_ratio(&self, other: &Rectangle) -> f64 {
        let overlap = self.vertical_overlap(other);
        if overlap <= 0.0 {
            return 0.0;
        }
        let span = self.bottom().max(other.bottom()) - self.top.min(other.top);
        if span <= 0.0 { 0.0 } else { overlap / span }
    }

    pub fn horizontal_overlap(&self, other: &Rectangle) -> f64 {
        (self.right().min(other.right()) - self.left.max(other.left)).max(0.0)
    }

    pub fn horizontally_overlaps(&self, other: &Rectangle) -> bool {
        self.horizontal_overlap(other) > 0.0
    }

    /// Fraction of the shorter rectangle's height covered by the other's
    /// vertical span.
    ///
    /// Exactly one of four nesting cases applies to any pair whose
    /// vertical spans meet; disjoint spans yield 0.
    pub fn horizontal_overlap_ratio(&self, other: &Rectangle) -> f64 {
        let delta = self.height.min(other.height);
        if delta <= 0.0 {
            return 0.0;
        }
        let (a_top, a_bottom) = (self.top, self.bottom());
        let (b_top, b_bottom) = (other.top, other.bottom());

        let covered = if b_top <= a_top && a_top <= b_bottom && b_bottom <= a_bottom {
            b_bottom - a_top
        } else if a_top <= b_top && b_top <= a_bottom && a_bottom <= b_bottom {
            a_bottom - b_top
        } else if a_top <= b_top && b_top <= b_bottom && b_bottom <= a_bottom {
            b_bottom - b_top
        } else if b_top <= a_top && a_top <= a_bottom && a_bottom <= b_bottom {
            a_bottom - a_top
        } else {
            0.0
        };
        covered / delta
    }

    /// Intersection area over union area.
    pub fn overlap_ratio(&self, other: &Rectangle) -> f64 {
        let intersection = self.horizontal_overlap(other) * self.vertical_overlap(other);
        let union = self.area() + other.area() - intersection;
        if union <= 0.0 {
            return 0.0;
        }
        (intersection / union).clamp(0.0, 1.0)
    }

    /// Smallest rectangle containing both `self` and `other`.
    pub fn union(&self, other: &Rectangle) -> Rectangle {
        Rectangle::from_edges(
            self.left.min(other.left),
            self.top.min(other.top),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
    }

    /// Grow `self` in place to cover `other`; `other` is untouched.
    pub fn merge(&mut self, other: &Rectangle) -> &mut Self {
        *self = self.union(other);
        self
    }

    pub fn contains(&self, other: &Rectangle) -> bool {
        other.left >= self.left
            && other.top >= self.top
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    pub fn contains_point(&self, p: Point) -> bool {
        p.0 >= self.left && p.0 < self.right() && p.1 >= self.top && p.1 < self.bottom()
    }

    /// True when the boxes share positive area.
    pub fn intersects(&self, other: &Rectangle) -> bool {
        self.intersection(other).is_some()
    }

    /// True when the closed boxes share any point, edges and corners
    /// included, allowing `tolerance` of slack on every side.
    pub fn touches(&self, other: &Rectangle, tolerance: f64) -> bool {
        self.left <= other.right() + tolerance
            && other.left <= self.right() + tolerance
            && self.top <= other.bottom() + tolerance
            && other.top <= self.bottom() + tolerance
    }

    /// Overlapping region, if the boxes share positive area.
    pub fn intersection(&self, other: &Rectangle) -> Option<Rectangle> {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right > left && bottom > top {
            Some(Rectangle::from_edges(left, top, right, bottom))
        } else {
            None
        }
    }

    /// Corners in order: top-left, top-right, bottom-right, bottom-left.
    pub fn points(&self) -> [Point; 4] {
        [
            (self.left, self.top),
            (self.right(), self.top),
            (self.right(), self.bottom()),
            (self.left, self.bottom()),
        ]
    }

    /// The four boundary rulings: top, bottom, left, right.
    ///
    /// Empty when any of them would carry a non-finite coordinate.
    pub fn to_constituent_lines(&self) -> Vec<Ruling> {
        let (left, top, right, bottom) = (self.left, self.top, self.right(), self.bottom());
        let lines = vec![
            Ruling::horizontal(top, left, right),
            Ruling::horizontal(bottom, left, right),
            Ruling::vertical(left, top, bottom),
            Ruling::vertical(right, top, bottom),
        ];
        if lines.iter().all(Ruling::is_finite) {
            lines
        } else {
            Vec::new()
        }
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rectangle[x={:.6},y={:.6},w={:.6},h={:.6},bottom={:.6},right={:.6}]",
            self.left,
            self.top,
            self.width,
            self.height,
            self.bottom(),
            self.right()
        )
    }
}

/// Minimal rectangle enclosing every item.
pub fn bounding_box_of<T: HasBounds>(items: &[T]) -> Result<Rectangle> {
    let mut iter = items.iter();
    let mut bbox = iter.next().ok_or(TableError::EmptyInput)?.bounds();
    for item in iter {
        bbox.merge(&item.bounds());
    }
    Ok(bbox)
}

/// Reading-order comparison with the default same-line threshold.
pub fn compare_order(a: &Rectangle, b: &Rectangle) -> Ordering {
    compare_order_with_threshold(a, b, DEFAULT_VERTICAL_COMPARISON_THRESHOLD)
}

/// Reading-order heuristic for loose text boxes, NOT a spatial order.
///
/// Boxes whose vertical overlap ratio exceeds `threshold` count as one
/// text line and compare by left edge; anything else compares by bottom
/// edge. Overlap is not transitive, so this is not a strict weak order
/// over arbitrary input. Use [`sort_reading_order`] to sort
/// collections; grid rows and columns never use this at all.
pub fn compare_order_with_threshold(a: &Rectangle, b: &Rectangle, threshold: f64) -> Ordering {
    if a.vertical_overlap_ratio(b) > threshold {
        a.left.total_cmp(&b.left)
    } else {
        a.bottom().total_cmp(&b.bottom())
    }
}

/// Sort items into reading order without relying on a transitive
/// comparator. See [`reading_order_lines`].
pub fn sort_reading_order<T: HasBounds>(items: &mut Vec<T>, threshold: f64) {
    let lines = reading_order_lines(std::mem::take(items), threshold);
    items.extend(lines.into_iter().flatten());
}

/// Group items into text lines and put both in reading order.
///
/// Lines are the transitive closure of the same-line relation used by
/// [`compare_order_with_threshold`], so grouping does not depend on
/// input order and re-sorting is a no-op. Lines are ordered by their
/// lowest bottom edge (then leftmost left, then top); items inside a
/// line by left edge, then bottom.
pub fn reading_order_lines<T: HasBounds>(items: Vec<T>, threshold: f64) -> Vec<Vec<T>> {
    let bounds: Vec<Rectangle> = items.iter().map(HasBounds::bounds).collect();

    let mut by_top: Vec<usize> = (0..bounds.len()).collect();
    by_top.sort_by(|&a, &b| bounds[a].top.total_cmp(&bounds[b].top));

    let mut lines = DisjointSet::new(bounds.len());
    for (pos, &i) in by_top.iter().enumerate() {
        for &j in &by_top[pos + 1..] {
            if bounds[j].top >= bounds[i].bottom() {
                break;
            }
            if bounds[i].vertical_overlap_ratio(&bounds[j]) > threshold {
                lines.union(i, j);
            }
        }
    }

    // (bottom, left, top) of each line, keyed by its root
    let mut line_keys: Vec<Option<(f64, f64, f64)>> = vec![None; bounds.len()];
    let roots: Vec<usize> = (0..bounds.len()).map(|idx| lines.find(idx)).collect();
    for (b, &root) in bounds.iter().zip(&roots) {
        let key = line_keys[root].get_or_insert((b.bottom(), b.left, b.top));
        key.0 = key.0.min(b.bottom());
        key.1 = key.1.min(b.left);
        key.2 = key.2.min(b.top);
    }

    let mut keyed: Vec<(usize, T)> = items.into_iter().enumerate().collect();
    keyed.sort_by(|(a, _), (b, _)| {
        let ka = line_keys[roots[*a]].unwrap_or_default();
        let kb = line_keys[roots[*b]].unwrap_or_default();
        ka.0.total_cmp(&kb.0)
            .then(ka.1.total_cmp(&kb.1))
            .then(ka.2.total_cmp(&kb.2))
            .then(roots[*a].cmp(&roots[*b]))
            .then(bounds[*a].left.total_cmp(&bounds[*b].left))
            .then(bounds[*a].bottom().total_cmp(&bounds[*b].bottom()))
    });

    let mut out: Vec<Vec<T>> = Vec::new();
    let mut last_root = None;
    for (idx, item) in keyed {
        match out.last_mut() {
            Some(line) if last_root == Some(roots[idx]) => line.push(item),
            _ => out.push(vec![item]),
        }
        last_root = Some(roots[idx]);
    }
    out
}
