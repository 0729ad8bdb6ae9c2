//! Cell construction from ruling intersections.
//!
//! A cell is the smallest rectangle whose four corners are crossing
//! points and whose four sides each run along one real ruling.

use rustc_hash::FxHashMap;

use super::clustering::snap_values;
use super::intersections::{IntersectionMap, find_intersections};
use super::rectangle::Rectangle;
use super::ruling::Ruling;
use super::types::{Cell, HRulingId, KeyPoint, TableSettings, VRulingId};

/// Reconstruct the minimal cells implied by already-collapsed rulings.
///
/// Ruling positions within `snap_tolerance` are snapped onto one value
/// first so floating noise cannot open micro-cells. No horizontal or no
/// vertical ruling means no grid: the result is empty and the caller
/// should fall back to another strategy.
pub fn find_cells(horizontals: &[Ruling], verticals: &[Ruling], settings: &TableSettings) -> Vec<Cell> {
    let horizontals = snap_positions(horizontals, |r| r.is_horizontal(), settings.snap_tolerance);
    let verticals = snap_positions(verticals, |r| r.is_vertical(), settings.snap_tolerance);
    if horizontals.is_empty() || verticals.is_empty() {
        return Vec::new();
    }

    let intersections = find_intersections(&horizontals, &verticals, settings.intersection_tolerance);
    intersections_to_cells(&intersections)
        .into_iter()
        .map(Cell::from_bounds)
        .collect()
}

fn snap_positions(rulings: &[Ruling], keep: impl Fn(&Ruling) -> bool, tolerance: f64) -> Vec<Ruling> {
    let kept: Vec<&Ruling> = rulings.iter().filter(|r| keep(r) && r.is_finite()).collect();
    let snapped = snap_values(kept.iter().map(|r| r.position()), tolerance);
    kept.into_iter()
        .zip(snapped)
        .map(|(ruling, position)| ruling.with_position(position))
        .collect()
}

/// Convert intersections to cell rectangles.
pub(crate) fn intersections_to_cells(intersections: &IntersectionMap) -> Vec<Rectangle> {
    fn lists_intersect<T: Ord>(a: &[T], b: &[T]) -> bool {
        let mut i = 0usize;
        let mut j = 0usize;
        while i < a.len() && j < b.len() {
            match a[i].cmp(&b[j]) {
                std::cmp::Ordering::Equal => return true,
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
            }
        }
        false
    }

    let mut points: Vec<KeyPoint> = intersections.points.keys().copied().collect();
    points.sort_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(&b.0)));

    let mut point_index: FxHashMap<KeyPoint, usize> = FxHashMap::default();
    for (idx, point) in points.iter().enumerate() {
        point_index.insert(*point, idx);
    }

    let mut point_v: Vec<Vec<VRulingId>> = Vec::with_capacity(points.len());
    let mut point_h: Vec<Vec<HRulingId>> = Vec::with_capacity(points.len());
    for point in &points {
        let pairs = intersections
            .points
            .get(point)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let mut v_ids: Vec<VRulingId> = pairs.iter().map(|(_, v)| *v).collect();
        let mut h_ids: Vec<HRulingId> = pairs.iter().map(|(h, _)| *h).collect();
        v_ids.sort();
        v_ids.dedup();
        h_ids.sort();
        h_ids.dedup();
        point_v.push(v_ids);
        point_h.push(h_ids);
    }

    // Points along each ruling, ordered along the ruling
    let mut v_points: FxHashMap<VRulingId, Vec<usize>> = FxHashMap::default();
    let mut h_points: FxHashMap<HRulingId, Vec<usize>> = FxHashMap::default();
    for (pid, ids) in point_v.iter().enumerate() {
        for id in ids {
            v_points.entry(*id).or_default().push(pid);
        }
    }
    for (pid, ids) in point_h.iter().enumerate() {
        for id in ids {
            h_points.entry(*id).or_default().push(pid);
        }
    }
    for pids in v_points.values_mut() {
        pids.sort_by(|a, b| points[*a].1.cmp(&points[*b].1));
    }
    for pids in h_points.values_mut() {
        pids.sort_by(|a, b| points[*a].0.cmp(&points[*b].0));
    }

    let edge_connects = |p1: usize, p2: usize| -> bool {
        if points[p1].0 == points[p2].0 {
            return lists_intersect(&point_v[p1], &point_v[p2]);
        }
        if points[p1].1 == points[p2].1 {
            return lists_intersect(&point_h[p1], &point_h[p2]);
        }
        false
    };

    let mut cells = Vec::new();
    for (idx, point) in points.iter().enumerate() {
        let mut below: Vec<usize> = Vec::new();
        for id in &point_v[idx] {
            if let Some(pids) = v_points.get(id)
                && let Ok(pos) = pids.binary_search_by(|pid| points[*pid].1.cmp(&point.1))
            {
                below.extend(pids[pos + 1..].iter().copied());
            }
        }
        below.sort_by(|a, b| points[*a].1.cmp(&points[*b].1));
        below.dedup();

        let mut right: Vec<usize> = Vec::new();
        for id in &point_h[idx] {
            if let Some(pids) = h_points.get(id)
                && let Ok(pos) = pids.binary_search_by(|pid| points[*pid].0.cmp(&point.0))
            {
                right.extend(pids[pos + 1..].iter().copied());
            }
        }
        right.sort_by(|a, b| points[*a].0.cmp(&points[*b].0));
        right.dedup();

        'below: for &below_id in &below {
            if !edge_connects(idx, below_id) {
                continue;
            }
            for &right_id in &right {
                if !edge_connects(idx, right_id) {
                    continue;
                }
                let bottom_right = (points[right_id].0, points[below_id].1);
                if let Some(&br_id) = point_index.get(&bottom_right)
                    && edge_connects(br_id, right_id)
                    && edge_connects(br_id, below_id)
                {
                    cells.push(Rectangle::from_edges(
                        point.0.into_inner(),
                        point.1.into_inner(),
                        points[right_id].0.into_inner(),
                        points[below_id].1.into_inner(),
                    ));
                    break 'below;
                }
            }
        }
    }
    cells
}
