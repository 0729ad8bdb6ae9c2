//! Sweep-line algorithm for finding ruling intersections.
//!
//! This module finds every crossing between horizontal and vertical
//! rulings, which is the foundation for detecting cell boundaries.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use super::ruling::Ruling;
use super::types::{HRulingId, KeyF64, KeyPoint, Point, VRulingId, key_f64, key_point};

/// Crossing points keyed by `(x, y)`, each with every ruling pair that
/// produced it.
///
/// One point can carry several pairs, e.g. where overlapping fragments
/// of one visual line meet the same perpendicular. That is expected.
#[derive(Clone, Debug, Default)]
pub struct IntersectionMap {
    pub(crate) points: FxHashMap<KeyPoint, Vec<(HRulingId, VRulingId)>>,
}

impl IntersectionMap {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Ruling pairs crossing exactly at `point`.
    pub fn get(&self, point: Point) -> Option<&[(HRulingId, VRulingId)]> {
        self.points
            .get(&key_point(point.0, point.1))
            .map(Vec::as_slice)
    }

    /// All crossing points, ordered by y then x.
    pub fn sorted_points(&self) -> Vec<Point> {
        let mut keys: Vec<KeyPoint> = self.points.keys().copied().collect();
        keys.sort_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(&b.0)));
        keys.into_iter()
            .map(|(x, y)| (x.into_inner(), y.into_inner()))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Point, &[(HRulingId, VRulingId)])> {
        self.points
            .iter()
            .map(|((x, y), pairs)| ((x.into_inner(), y.into_inner()), pairs.as_slice()))
    }
}

/// Find all crossings between `horizontals` and `verticals`.
///
/// A pair crosses when the vertical's x lies within the horizontal's
/// span and the horizontal's y within the vertical's span, each span
/// widened by `tolerance` at both ends. A negative tolerance counts as
/// zero. Ids index the input slices; rulings of the wrong orientation
/// are ignored.
pub fn find_intersections(
    horizontals: &[Ruling],
    verticals: &[Ruling],
    tolerance: f64,
) -> IntersectionMap {
    let tolerance = tolerance.max(0.0);
    enum EventKind {
        AddV,
        QueryH,
        RemoveV,
    }

    struct Event {
        y: f64,
        kind: EventKind,
        idx: usize,
    }

    let mut events = Vec::with_capacity(verticals.len() * 2 + horizontals.len());
    for (idx, v) in verticals.iter().enumerate().filter(|(_, v)| v.is_vertical()) {
        events.push(Event {
            y: v.top() - tolerance,
            kind: EventKind::AddV,
            idx,
        });
        events.push(Event {
            y: v.bottom() + tolerance,
            kind: EventKind::RemoveV,
            idx,
        });
    }
    for (idx, h) in horizontals.iter().enumerate().filter(|(_, h)| h.is_horizontal()) {
        events.push(Event {
            y: h.top(),
            kind: EventKind::QueryH,
            idx,
        });
    }

    let kind_order = |kind: &EventKind| match kind {
        EventKind::AddV => 0,
        EventKind::QueryH => 1,
        EventKind::RemoveV => 2,
    };

    events.sort_by(|a, b| {
        a.y.total_cmp(&b.y)
            .then(kind_order(&a.kind).cmp(&kind_order(&b.kind)))
            .then(a.idx.cmp(&b.idx))
    });

    let mut active: BTreeMap<KeyF64, Vec<usize>> = BTreeMap::new();
    let mut points: FxHashMap<KeyPoint, Vec<(HRulingId, VRulingId)>> = FxHashMap::default();

    for event in events {
        match event.kind {
            EventKind::AddV => {
                let v = &verticals[event.idx];
                active.entry(key_f64(v.x0())).or_default().push(event.idx);
            }
            EventKind::RemoveV => {
                let key = key_f64(verticals[event.idx].x0());
                if let Some(bucket) = active.get_mut(&key) {
                    if let Some(pos) = bucket.iter().position(|&idx| idx == event.idx) {
                        bucket.remove(pos);
                    }
                    if bucket.is_empty() {
                        active.remove(&key);
                    }
                }
            }
            EventKind::QueryH => {
                let h = &horizontals[event.idx];
                let x_min = key_f64(h.x0() - tolerance);
                let x_max = key_f64(h.x1() + tolerance);
                if x_min > x_max {
                    continue;
                }
                for (_x, v_indices) in active.range(x_min..=x_max) {
                    for &v_idx in v_indices {
                        if let Some((x, y)) = h.intersection_point(&verticals[v_idx], tolerance) {
                            points
                                .entry(key_point(x, y))
                                .or_default()
                                .push((HRulingId(event.idx), VRulingId(v_idx)));
                        }
                    }
                }
            }
        }
    }

    for pairs in points.values_mut() {
        pairs.sort();
    }
    IntersectionMap { points }
}
