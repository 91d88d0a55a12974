//! Boundary geometry assembly.
//!
//! The registry stores each contour as a flat stream of numbered points in
//! which every ring is closed by repeating its first point. This module
//! splits the stream into rings, emits points as `[y, x]` (easting first, as
//! the polygon output expects) and fixes the winding: outer rings clockwise,
//! holes counter-clockwise.

use std::collections::HashSet;
use std::ops::Range;

use serde::Serialize;

/// A boundary point as read from the extract.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialPoint {
    /// Registry X (northing).
    pub x: f64,
    /// Registry Y (easting).
    pub y: f64,
    /// Point number within the contour; repeats when a ring closes.
    pub marker: String,
}

impl SpatialPoint {
    pub fn new(x: f64, y: f64, marker: impl Into<String>) -> Self {
        Self {
            x,
            y,
            marker: marker.into(),
        }
    }

    fn same_position(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

/// One ring, implicitly closed (the first point is not repeated).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Ring {
    pub points: Vec<[f64; 2]>,
}

impl Ring {
    /// Signed area of the ring, see [`signed_area`].
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        signed_area(&self.points)
    }
}

/// Rings of one contour: the outer boundary followed by its holes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RingGroup {
    pub key: String,
    pub rings: Vec<Ring>,
}

/// Raw contour as gathered by an adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    pub key: String,
    pub points: Vec<SpatialPoint>,
}

impl Contour {
    pub fn new(key: impl Into<String>, points: Vec<SpatialPoint>) -> Self {
        Self {
            key: key.into(),
            points,
        }
    }
}

/// Ring groups of one object keyed by cadastral number or contour key,
/// in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Geometry {
    groups: Vec<RingGroup>,
}

impl Geometry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add rings under `key`; an existing key has its rings replaced.
    pub fn insert(&mut self, key: impl Into<String>, rings: Vec<Ring>) {
        let key = key.into();
        match self.groups.iter_mut().find(|group| group.key == key) {
            Some(group) => group.rings = rings,
            None => self.groups.push(RingGroup { key, rings }),
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[Ring]> {
        self.groups
            .iter()
            .find(|group| group.key == key)
            .map(|group| group.rings.as_slice())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|group| group.key.as_str())
    }

    pub fn groups(&self) -> &[RingGroup] {
        &self.groups
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Assemble the geometry of an object from its contours.
///
/// Contours that yield no ring are left out, so every key maps to at least
/// one ring.
pub fn assemble_geometry(contours: Vec<Contour>) -> Geometry {
    let mut geometry = Geometry::new();
    for contour in contours {
        let rings = assemble_rings(&contour.points);
        if rings.is_empty() {
            tracing::debug!(key = %contour.key, "contour has no usable ring");
            continue;
        }
        geometry.insert(contour.key, rings);
    }
    geometry
}

/// Split a point stream into oriented rings.
///
/// The first ring is the outer boundary and is made clockwise; every
/// following ring is a hole and is made counter-clockwise. Rings with fewer
/// than three points are dropped without changing the role of the others.
///
/// # Examples
/// ```
/// use egrn_extractor::geometry::{assemble_rings, SpatialPoint};
///
/// let square = [
///     SpatialPoint::new(0.0, 0.0, "1"),
///     SpatialPoint::new(10.0, 0.0, "2"),
///     SpatialPoint::new(10.0, 10.0, "3"),
///     SpatialPoint::new(0.0, 10.0, "4"),
///     SpatialPoint::new(0.0, 0.0, "1"),
/// ];
/// let rings = assemble_rings(&square);
/// assert_eq!(rings.len(), 1);
/// assert_eq!(rings[0].points.len(), 4);
/// assert!(rings[0].signed_area() < 0.0);
/// ```
pub fn assemble_rings(points: &[SpatialPoint]) -> Vec<Ring> {
    ring_ranges(points)
        .into_iter()
        .enumerate()
        .filter(|(_, range)| {
            let usable = range.len() >= 3;
            if !usable {
                tracing::debug!(start = range.start, points = range.len(), "dropping degenerate ring");
            }
            usable
        })
        .map(|(index, range)| {
            let mut ring: Vec<[f64; 2]> = points[range].iter().map(|p| [p.y, p.x]).collect();
            let area = signed_area(&ring);
            let outer = index == 0;
            if (outer && area > 0.0) || (!outer && area < 0.0) {
                ring.reverse();
            }
            Ring { points: ring }
        })
        .collect()
}

/// Half-open index ranges of the rings in a point stream.
///
/// A marker seen again within the current ring ends that ring at the
/// preceding point. When the repeated point is the ring's own closing point
/// (same marker and position as its first point) it is skipped and the next
/// ring starts after it; otherwise the repeated point starts the next ring.
pub fn ring_ranges(points: &[SpatialPoint]) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut start = 0;
    let mut seen: HashSet<&str> = HashSet::new();

    for (index, point) in points.iter().enumerate() {
        if !seen.insert(point.marker.as_str()) {
            let first = &points[start];
            ranges.push(start..index);
            seen.clear();
            if point.marker == first.marker && point.same_position(first) {
                start = index + 1;
            } else {
                start = index;
                seen.insert(point.marker.as_str());
            }
        }
    }

    if start < points.len() {
        ranges.push(start..points.len());
    }
    ranges.retain(|range| !range.is_empty());
    ranges
}

/// Shoelace signed area over `[a, b]` pairs with wrap-around:
/// `(Σ a[i]·b[i+1] − Σ b[i]·a[i+1]) / 2`.
///
/// Positive means counter-clockwise in the `(a, b)` plane.
pub fn signed_area(points: &[[f64; 2]]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let doubled: f64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(p, q)| p[0] * q[1] - p[1] * q[0])
        .sum();
    doubled / 2.0
}
