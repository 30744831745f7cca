//! Tree and resampling options

use crate::geometry::Cosmology;
use crate::types::{CorrelationType, Projection, ResampleScheme};
use log::warn;

/// Options shared by the mask builder, the tree builder and the partitioner.
///
/// Every worker of a run must use identical options, otherwise masks and trees
/// built on different processes will not line up.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeOptions {
    /// Maximum number of points in a leaf
    leaf_size: usize,
    /// Correlation the tree is built for
    correlation: CorrelationType,
    /// Distance projection
    projection: Projection,
    /// Number of resampling draws, zero disables resampling
    resamples: usize,
    /// Number of spatial cells the full data set is cut into
    subsamples: usize,
    /// Resampling scheme
    scheme: ResampleScheme,
    /// Cut subsample cells using the two angular coordinates only
    resample_2d: bool,
    /// Seed for bootstrap draws
    seed: Option<u64>,
    /// Cosmology used for comoving distances
    cosmology: Cosmology,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            leaf_size: 1,
            correlation: CorrelationType::AutoAngular,
            projection: Projection::Theta,
            resamples: 0,
            subsamples: 32,
            scheme: ResampleScheme::Jackknife,
            resample_2d: false,
            seed: None,
            cosmology: Cosmology::default(),
        }
    }
}

impl TreeOptions {
    /// Create options for a given correlation type
    pub fn new(correlation: CorrelationType) -> Self {
        Self {
            correlation,
            ..Default::default()
        }
    }

    /// Set the maximum number of points in a leaf
    pub fn set_leaf_size(&mut self, leaf_size: usize) {
        self.leaf_size = leaf_size;
    }

    /// Set the correlation type
    pub fn set_correlation(&mut self, correlation: CorrelationType) {
        self.correlation = correlation;
    }

    /// Set the distance projection
    pub fn set_projection(&mut self, projection: Projection) {
        self.projection = projection;
    }

    /// Set the resampling scheme, number of draws and number of subsample cells
    pub fn set_resampling(&mut self, scheme: ResampleScheme, resamples: usize, subsamples: usize) {
        if scheme != ResampleScheme::Bootstrap && resamples > 0 && resamples != subsamples {
            warn!(
                "{:?} resampling with {} draws over {} subsamples: some draws or cells will be unused.",
                scheme, resamples, subsamples
            );
        }
        self.scheme = scheme;
        self.resamples = resamples;
        self.subsamples = subsamples;
    }

    /// Cut subsample cells on the two angular coordinates only
    pub fn set_resample_2d(&mut self, resample_2d: bool) {
        self.resample_2d = resample_2d;
    }

    /// Seed the bootstrap random number generator
    pub fn set_seed(&mut self, seed: u64) {
        self.seed = Some(seed);
    }

    /// Set the cosmology used for comoving distances
    pub fn set_cosmology(&mut self, cosmology: Cosmology) {
        self.cosmology = cosmology;
    }

    /// Maximum number of points in a leaf
    pub fn leaf_size(&self) -> usize {
        self.leaf_size
    }

    /// Correlation type
    pub fn correlation(&self) -> CorrelationType {
        self.correlation
    }

    /// Distance projection
    pub fn projection(&self) -> Projection {
        self.projection
    }

    /// Number of resampling draws
    pub fn resamples(&self) -> usize {
        self.resamples
    }

    /// Number of subsample cells
    pub fn subsamples(&self) -> usize {
        self.subsamples
    }

    /// Resampling scheme
    pub fn scheme(&self) -> ResampleScheme {
        self.scheme
    }

    /// Whether cells are cut on the angular coordinates only
    pub fn resample_2d(&self) -> bool {
        self.resample_2d
    }

    /// Bootstrap seed
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Cosmology
    pub fn cosmology(&self) -> &Cosmology {
        &self.cosmology
    }

    /// Number of coordinates per point
    pub fn dim(&self) -> usize {
        self.correlation.dim()
    }

    /// Number of coordinates used to place nodes in subsample cells
    pub fn mask_dim(&self) -> usize {
        if self.resample_2d {
            2
        } else {
            self.dim()
        }
    }

    /// Whether resampling is enabled
    pub fn resampling(&self) -> bool {
        self.resamples > 0
    }
}
