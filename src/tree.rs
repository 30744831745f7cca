//! Balanced binary trees over weighted points.
//!
//! Nodes are stored densely in pre-order: a node's index is always smaller
//! than the indices of its children, and the root has index 0. The number of
//! nodes is known before the build starts (see [`count_nodes`]) so storage is
//! allocated once.

mod assignment;
mod builder;
mod counter;
mod dump;

pub use assignment::{partition, split_tree};
pub use builder::TreeBuilder;
pub use counter::count_nodes;

use crate::options::TreeOptions;
use crate::types::MAX_DIM;

/// Index of the root node
pub const ROOT: usize = 0;

/// A tree node.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Node {
    /// Left child, `None` for leaves
    pub left: Option<usize>,
    /// Right child, `None` for leaves
    pub right: Option<usize>,
    /// Number of points under the node
    pub count: usize,
    /// Number of points times their mean weight
    pub weighted_count: f64,
    /// Largest distance between the centroid and a point under the node
    pub radius: f64,
    /// Weighted mean position
    pub centroid: [f64; MAX_DIM],
    /// Mean weight of the points under the node
    pub mean_weight: f64,
}

impl Node {
    /// Whether the node has no children
    pub fn is_leaf(&self) -> bool {
        self.left.is_none()
    }

    /// Both children of an internal node
    pub fn children(&self) -> Option<(usize, usize)> {
        self.left.zip(self.right)
    }
}

/// A tree with per-node resampling weights and cached geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    dim: usize,
    resamples: usize,
    nodes: Vec<Node>,
    weights: Vec<u8>,
    cos: Option<Vec<[f64; 2]>>,
    sin: Option<Vec<[f64; 2]>>,
    comoving: Option<Vec<f64>>,
    ntot: Vec<f64>,
}

impl Tree {
    /// Allocate a tree of `size` nodes for the given options.
    pub(crate) fn with_size(size: usize, options: &TreeOptions) -> Self {
        let resamples = options.resamples();
        let angular = !options.correlation().is_3d();
        Self {
            dim: options.dim(),
            resamples,
            nodes: vec![Node::default(); size],
            weights: vec![0; size * resamples],
            cos: angular.then(|| vec![[0.0; 2]; size]),
            sin: angular.then(|| vec![[0.0; 2]; size]),
            comoving: options
                .projection()
                .needs_comoving_distance()
                .then(|| vec![0.0; size]),
            ntot: vec![0.0; resamples],
        }
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Index of the root node
    pub fn root(&self) -> usize {
        ROOT
    }

    /// Number of coordinates of each centroid
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of resampling draws
    pub fn resamples(&self) -> usize {
        self.resamples
    }

    /// A node
    pub fn node(&self, index: usize) -> &Node {
        &self.nodes[index]
    }

    /// All nodes in pre-order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Children of a node, `None` for leaves
    pub fn children(&self, index: usize) -> Option<(usize, usize)> {
        self.nodes[index].children()
    }

    /// Resampling weights of a node, one per draw
    pub fn weights(&self, index: usize) -> &[u8] {
        &self.weights[self.resamples * index..self.resamples * (index + 1)]
    }

    /// Effective number of points per draw, summed over leaves.
    ///
    /// Each leaf contributes its actual weighted count times its weight for the
    /// draw, not the nominal `leaf_size × mean_weight`. The two differ for
    /// leaves holding fewer than `leaf_size` points.
    pub fn ntot(&self) -> &[f64] {
        &self.ntot
    }

    /// Cosines of the two angular coordinates of a centroid
    pub fn cos(&self, index: usize) -> Option<[f64; 2]> {
        self.cos.as_ref().map(|c| c[index])
    }

    /// Sines of the two angular coordinates of a centroid
    pub fn sin(&self, index: usize) -> Option<[f64; 2]> {
        self.sin.as_ref().map(|s| s[index])
    }

    /// Comoving distance of a centroid
    pub fn comoving_distance(&self, index: usize) -> Option<f64> {
        self.comoving.as_ref().map(|d| d[index])
    }

    /// Indices of the leaves under `index`, left to right
    pub fn leaves(&self, index: usize) -> Vec<usize> {
        let mut leaves = vec![];
        let mut stack = vec![index];
        while let Some(current) = stack.pop() {
            match self.children(current) {
                Some((left, right)) => {
                    stack.push(right);
                    stack.push(left);
                }
                None => leaves.push(current),
            }
        }
        leaves
    }
}
