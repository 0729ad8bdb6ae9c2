//! Spatial clustering for table reconstruction.
//!
//! Tolerance-based clustering of coordinates (used to snap near-equal
//! values onto one canonical value) and connected-component clustering
//! of rectangles into table regions.

use rustc_hash::FxHashMap;

use super::rectangle::{HasBounds, Rectangle};
use super::types::{KeyF64, TOUCH_TOLERANCE, key_f64};

/// Cluster a list of f64 values based on tolerance.
///
/// Values are sorted and chained: each value joins the current group
/// when it lies within `tolerance` of the previous one.
pub fn cluster_list(mut xs: Vec<f64>, tolerance: f64) -> Vec<Vec<f64>> {
    xs.sort_by(f64::total_cmp);
    if tolerance == 0.0 || xs.len() < 2 {
        return xs.into_iter().map(|x| vec![x]).collect();
    }
    let mut groups: Vec<Vec<f64>> = Vec::new();
    let mut current: Vec<f64> = Vec::new();
    let mut last = xs[0];
    current.push(xs[0]);
    for x in xs.into_iter().skip(1) {
        if x <= last + tolerance {
            current.push(x);
        } else {
            groups.push(current);
            current = vec![x];
        }
        last = x;
    }
    groups.push(current);
    groups
}

/// Map every distinct value to the mean of its cluster.
pub fn make_snap_dict(values: Vec<f64>, tolerance: f64) -> FxHashMap<KeyF64, f64> {
    let mut dict = FxHashMap::default();
    for cluster in cluster_list(values, tolerance) {
        let mean = cluster.iter().sum::<f64>() / cluster.len() as f64;
        for value in cluster {
            dict.insert(key_f64(value), mean);
        }
    }
    dict
}

/// Snap values to their cluster means, preserving input order.
pub fn snap_values(values: impl IntoIterator<Item = f64>, tolerance: f64) -> Vec<f64> {
    let values: Vec<f64> = values.into_iter().collect();
    let dict = make_snap_dict(values.clone(), tolerance);
    values
        .into_iter()
        .map(|v| dict.get(&key_f64(v)).copied().unwrap_or(v))
        .collect()
}

/// Sorted, deduplicated cluster means.
pub fn snapped_boundaries(values: Vec<f64>, tolerance: f64) -> Vec<f64> {
    cluster_list(values, tolerance)
        .into_iter()
        .map(|cluster| cluster.iter().sum::<f64>() / cluster.len() as f64)
        .collect()
}

/// Union-find over dense indices.
pub(crate) struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    pub fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            rank: vec![0; len],
        }
    }

    pub fn find(&mut self, mut idx: usize) -> usize {
        while self.parent[idx] != idx {
            self.parent[idx] = self.parent[self.parent[idx]];
            idx = self.parent[idx];
        }
        idx
    }

    pub fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }
}

/// A connected group of rectangles: one candidate table.
#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    /// Union of every member's bounds.
    pub bounds: Rectangle,
    /// Indices into the clustered slice, ascending.
    pub members: Vec<usize>,
}

impl HasBounds for Region {
    fn bounds(&self) -> Rectangle {
        self.bounds
    }
}

/// Group rectangles that overlap or share a boundary into regions.
///
/// Membership depends only on the touch relation, never on input
/// order. Regions come back sorted by top, then left.
pub fn cluster_regions<T: HasBounds>(items: &[T]) -> Vec<Region> {
    let bounds: Vec<Rectangle> = items.iter().map(HasBounds::bounds).collect();

    let mut by_left: Vec<usize> = (0..bounds.len()).collect();
    by_left.sort_by(|&a, &b| bounds[a].left().total_cmp(&bounds[b].left()));

    let mut components = DisjointSet::new(bounds.len());
    for (pos, &i) in by_left.iter().enumerate() {
        let reach = bounds[i].right() + TOUCH_TOLERANCE;
        for &j in &by_left[pos + 1..] {
            if bounds[j].left() > reach {
                break;
            }
            if bounds[i].touches(&bounds[j], TOUCH_TOLERANCE) {
                components.union(i, j);
            }
        }
    }

    let mut by_root: FxHashMap<usize, Region> = FxHashMap::default();
    for (idx, b) in bounds.iter().enumerate() {
        let root = components.find(idx);
        by_root
            .entry(root)
            .and_modify(|region| {
                region.bounds.merge(b);
                region.members.push(idx);
            })
            .or_insert_with(|| Region {
                bounds: *b,
                members: vec![idx],
            });
    }

    let mut regions: Vec<Region> = by_root.into_values().collect();
    regions.sort_by(|a, b| {
        a.bounds
            .top()
            .total_cmp(&b.bounds.top())
            .then(a.bounds.left().total_cmp(&b.bounds.left()))
            .then(a.members.cmp(&b.members))
    });
    regions
}

/// Bounding boxes of [`cluster_regions`].
pub fn find_regions<T: HasBounds>(items: &[T]) -> Vec<Rectangle> {
    cluster_regions(items)
        .into_iter()
        .map(|region| region.bounds)
        .collect()
}
