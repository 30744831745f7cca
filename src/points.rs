//! Weighted point sets and the split primitive used by every recursive builder.

use crate::types::MAX_DIM;
use std::cmp::Ordering;

/// A weighted position.
///
/// Only the first `dim` coordinates of the owning [`PointSet`] are meaningful,
/// the remaining ones are zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// Coordinates
    pub x: [f64; MAX_DIM],
    /// Weight
    pub w: f64,
}

impl Point {
    /// Create a point from its coordinates and weight
    pub fn new(coordinates: &[f64], w: f64) -> Self {
        let mut x = [0.0; MAX_DIM];
        x[..coordinates.len()].copy_from_slice(coordinates);
        Self { x, w }
    }
}

/// An ordered collection of weighted points with a fixed dimensionality.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PointSet {
    dim: usize,
    points: Vec<Point>,
}

impl PointSet {
    /// Create an empty point set
    ///
    /// # Panics
    ///
    /// Panics if `dim` is not between 1 and [`MAX_DIM`].
    pub fn new(dim: usize) -> Self {
        assert!(
            (1..=MAX_DIM).contains(&dim),
            "Points must have between 1 and {MAX_DIM} coordinates."
        );
        Self {
            dim,
            points: Vec::new(),
        }
    }

    /// Create a point set from row-major coordinates `[x_1, y_1, x_2, y_2, ...]`.
    ///
    /// Points get unit weight when `weights` is `None`.
    ///
    /// # Panics
    ///
    /// Panics if `dim` is out of range, if the length of `coordinates` is not a
    /// multiple of `dim`, or if `weights` does not hold one weight per point.
    pub fn from_coordinates(dim: usize, coordinates: &[f64], weights: Option<&[f64]>) -> Self {
        let mut set = Self::new(dim);
        assert_eq!(coordinates.len() % dim, 0);
        let npoints = coordinates.len() / dim;
        if let Some(w) = weights {
            assert_eq!(w.len(), npoints);
        }
        set.points = coordinates
            .chunks_exact(dim)
            .enumerate()
            .map(|(i, c)| Point::new(c, weights.map_or(1.0, |w| w[i])))
            .collect();
        set
    }

    /// Append a point
    ///
    /// # Panics
    ///
    /// Panics if `coordinates` does not hold exactly [`dim`](Self::dim) values.
    pub fn push(&mut self, coordinates: &[f64], w: f64) {
        assert_eq!(coordinates.len(), self.dim);
        self.points.push(Point::new(coordinates, w));
    }

    /// Number of coordinates per point
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the set has no points
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The points
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Mutable access to the points
    pub fn points_mut(&mut self) -> &mut [Point] {
        &mut self.points
    }
}

impl std::ops::Index<usize> for PointSet {
    type Output = Point;

    fn index(&self, index: usize) -> &Self::Output {
        &self.points[index]
    }
}

/// Split `points` in two along `axis`.
///
/// The left half receives the `n / 2` points with the smallest coordinate
/// along `axis`, the right half the remaining `n - n / 2`. Points are
/// reordered in place and keep their weights.
pub fn split_at_axis(points: &mut [Point], axis: usize) -> (&mut [Point], &mut [Point]) {
    let mid = points.len() / 2;
    if mid > 0 {
        points.select_nth_unstable_by(mid, |a, b| compare(a, b, axis));
    }
    points.split_at_mut(mid)
}

fn compare(a: &Point, b: &Point, axis: usize) -> Ordering {
    a.x[axis].total_cmp(&b.x[axis])
}

/// Per-axis minimum and maximum of the first `dim` coordinates.
pub fn bounds(points: &[Point], dim: usize) -> ([f64; MAX_DIM], [f64; MAX_DIM]) {
    let mut min = [f64::INFINITY; MAX_DIM];
    let mut max = [f64::NEG_INFINITY; MAX_DIM];
    for p in points {
        for d in 0..dim {
            min[d] = min[d].min(p.x[d]);
            max[d] = max[d].max(p.x[d]);
        }
    }
    (min, max)
}
