//! corrtree
//!
//! Hierarchical spatial index, resampling masks and worker partitioning for
//! two-point correlation function estimators.
//!
//! A run proceeds in three steps:
//! 1. [`resample::resample`] cuts the full catalogue into spatial cells on the
//!    coordinating process, draws per-cell weights for every resampling draw and
//!    shares the resulting [`resample::Mask`] with every worker.
//! 2. [`tree::TreeBuilder`] builds a balanced binary tree over each worker's
//!    points, attaching centroids, opening-angle radii and resampling weights to
//!    every node.
//! 3. [`tree::split_tree`] picks the subtree each worker is responsible for.
#![cfg_attr(feature = "strict", deny(warnings))]
#![warn(missing_docs)]

pub mod comm;
pub mod geometry;
pub mod options;
pub mod points;
pub mod resample;
pub mod traits;
pub mod tree;
pub mod types;

pub use options::TreeOptions;
pub use points::{Point, PointSet};
pub use resample::{resample, Mask, MaskBuilder};
pub use tree::{count_nodes, partition, split_tree, Tree, TreeBuilder};
pub use types::{Error, Result};
