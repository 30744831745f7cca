//! Recursive tree construction

use super::{count_nodes, Tree};
use crate::geometry::{approximate_distance, exact_distance, to_radians};
use crate::options::TreeOptions;
use crate::points::{split_at_axis, Point, PointSet};
use crate::resample::Mask;
use crate::types::{Error, Result, MAX_DIM};
use log::debug;
use rayon::prelude::*;

/// Nodes with at least this many points scan for their farthest point in parallel.
const PARALLEL_SCAN_SIZE: usize = 1 << 14;

/// Builds a [`Tree`] over the points of one worker.
pub struct TreeBuilder<'a> {
    options: &'a TreeOptions,
    mask: &'a Mask,
}

/// State carried through the recursion.
struct BuildState<'t> {
    tree: &'t mut Tree,
    next_index: usize,
}

impl<'a> TreeBuilder<'a> {
    /// Create a tree builder.
    ///
    /// `mask` is ignored when resampling is disabled in `options`.
    pub fn new(options: &'a TreeOptions, mask: &'a Mask) -> Self {
        Self { options, mask }
    }

    /// Build the tree.
    ///
    /// The points are reordered in place while the tree is built and dropped
    /// afterwards: nodes keep only aggregate quantities.
    pub fn build(&self, mut points: PointSet) -> Result<Tree> {
        self.check(&points)?;

        let leaf_size = self.options.leaf_size();
        let size = count_nodes(points.len(), leaf_size);
        let mut tree = Tree::with_size(size, self.options);

        let mut state = BuildState {
            tree: &mut tree,
            next_index: 0,
        };
        self.build_node(&mut state, points.points_mut(), 0);
        debug_assert_eq!(state.next_index, size);

        debug!(
            "Built tree with {} nodes over {} points (leaf size {}).",
            size,
            points.len(),
            leaf_size
        );
        Ok(tree)
    }

    fn check(&self, points: &PointSet) -> Result<()> {
        if self.options.leaf_size() == 0 {
            return Err(Error::InvalidLeafSize);
        }
        if points.is_empty() {
            return Err(Error::EmptyPointSet);
        }
        if points.dim() != self.options.dim() {
            return Err(Error::DimensionMismatch {
                expected: self.options.dim(),
                found: points.dim(),
            });
        }
        if self.options.resampling() {
            let mask = self.mask;
            if mask.cells() != self.options.subsamples()
                || mask.resamples() != self.options.resamples()
                || mask.dim() != self.options.mask_dim()
            {
                return Err(Error::MaskMismatch(format!(
                    "mask has {} cells, {} draws and {} dimensions; options need {}, {} and {}",
                    mask.cells(),
                    mask.resamples(),
                    mask.dim(),
                    self.options.subsamples(),
                    self.options.resamples(),
                    self.options.mask_dim()
                )));
            }
        }
        Ok(())
    }

    /// Create the node for `points` and, recursively, its children. Returns
    /// the index of the node.
    fn build_node(&self, state: &mut BuildState<'_>, points: &mut [Point], axis: usize) -> usize {
        let index = state.next_index;
        state.next_index += 1;

        let dim = self.options.dim();
        let resamples = self.options.resamples();
        let (centroid, mean_weight) = weighted_centroid(points, dim);

        {
            let node = &mut state.tree.nodes[index];
            node.count = points.len();
            node.mean_weight = mean_weight;
            node.weighted_count = points.len() as f64 * mean_weight;
            node.centroid = centroid;
        }

        if resamples > 0 {
            if let Some(cell) = self.mask.cell_containing(&centroid[..self.mask.dim()]) {
                let weights = &mut state.tree.weights[resamples * index..resamples * (index + 1)];
                for (draw, w) in weights.iter_mut().enumerate() {
                    *w = self.mask.weight(draw, cell);
                }
            }
        }

        if let (Some(cos), Some(sin)) = (state.tree.cos.as_mut(), state.tree.sin.as_mut()) {
            let (ra, dec) = (to_radians(centroid[0]), to_radians(centroid[1]));
            cos[index] = [ra.cos(), dec.cos()];
            sin[index] = [ra.sin(), dec.sin()];
        }
        if let Some(comoving) = state.tree.comoving.as_mut() {
            comoving[index] = self.options.cosmology().comoving_distance(centroid[2]);
        }

        state.tree.nodes[index].radius = self.radius(points, &centroid);

        if points.len() > self.options.leaf_size() {
            let (left, right) = split_at_axis(points, axis);
            let next_axis = (axis + 1) % dim;
            let left = self.build_node(state, left, next_axis);
            let right = self.build_node(state, right, next_axis);

            let node = &mut state.tree.nodes[index];
            node.left = Some(left);
            node.right = Some(right);
        } else {
            let weighted_count = state.tree.nodes[index].weighted_count;
            let weights = &state.tree.weights[resamples * index..resamples * (index + 1)];
            for (total, &w) in state.tree.ntot.iter_mut().zip(weights) {
                *total += weighted_count * f64::from(w);
            }
        }

        index
    }

    /// Opening-angle radius of a node.
    ///
    /// The farthest point is located with the approximate metric. Angular
    /// trees then store the exact separation of that point, 3-D trees store the
    /// approximate maximum as is.
    fn radius(&self, points: &[Point], centroid: &[f64; MAX_DIM]) -> f64 {
        if points.len() == 1 {
            return 0.0;
        }
        let correlation = self.options.correlation();
        let (farthest, d_max) = farthest_point(points, centroid, |a, b| {
            approximate_distance(correlation, a, b)
        });
        if correlation.is_3d() {
            d_max
        } else {
            exact_distance(correlation, centroid, &points[farthest].x)
        }
    }
}

/// Weighted mean position and mean weight of `points`.
///
/// Points whose weights sum to zero fall back to the unweighted mean position.
fn weighted_centroid(points: &[Point], dim: usize) -> ([f64; MAX_DIM], f64) {
    let mut sum = [0.0; MAX_DIM];
    let mut plain = [0.0; MAX_DIM];
    let mut total_weight = 0.0;
    for p in points {
        for d in 0..dim {
            sum[d] += p.w * p.x[d];
            plain[d] += p.x[d];
        }
        total_weight += p.w;
    }

    let n = points.len() as f64;
    let mut centroid = [0.0; MAX_DIM];
    for d in 0..dim {
        centroid[d] = if total_weight != 0.0 {
            sum[d] / total_weight
        } else {
            plain[d] / n
        };
    }
    (centroid, total_weight / n)
}

/// Index of and distance to the point farthest from `centre`.
///
/// Ties go to the lowest index, so the parallel and sequential scans agree.
fn farthest_point<F>(points: &[Point], centre: &[f64; MAX_DIM], distance: F) -> (usize, f64)
where
    F: Fn(&[f64], &[f64]) -> f64 + Sync,
{
    let pick = |a: (usize, f64), b: (usize, f64)| {
        if b.1 > a.1 || (b.1 == a.1 && b.0 < a.0) {
            b
        } else {
            a
        }
    };

    if points.len() >= PARALLEL_SCAN_SIZE {
        points
            .par_iter()
            .enumerate()
            .map(|(i, p)| (i, distance(centre, &p.x)))
            .reduce(|| (0, 0.0), pick)
    } else {
        points
            .iter()
            .enumerate()
            .map(|(i, p)| (i, distance(centre, &p.x)))
            .fold((0, 0.0), pick)
    }
}
