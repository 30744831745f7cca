//! Types specific to corrtree

/// Largest number of coordinates a point can carry.
pub const MAX_DIM: usize = 3;

/// The pair statistic the tree will be used for.
///
/// The correlation type decides the geometry of every distance evaluation:
/// angular types measure great-circle separations in degrees, 3-D types
/// measure Euclidean separations in Cartesian coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CorrelationType {
    /// Angular auto-correlation of (ra, dec) positions.
    AutoAngular,
    /// Angular cross-correlation of (ra, dec) positions.
    CrossAngular,
    /// Auto-correlation of Cartesian (x, y, z) positions.
    Auto3d,
    /// Cross-correlation of Cartesian (x, y, z) positions.
    Cross3d,
    /// Projected auto-correlation of (ra, dec, redshift) positions.
    AutoWp,
    /// Projected cross-correlation of (ra, dec, redshift) positions.
    CrossWp,
}

impl CorrelationType {
    /// True for Cartesian 3-D correlations.
    pub fn is_3d(&self) -> bool {
        matches!(self, CorrelationType::Auto3d | CorrelationType::Cross3d)
    }

    /// True for projected correlations, which carry a redshift coordinate.
    pub fn is_projected(&self) -> bool {
        matches!(self, CorrelationType::AutoWp | CorrelationType::CrossWp)
    }

    /// Number of coordinates each point carries.
    pub fn dim(&self) -> usize {
        if self.is_3d() || self.is_projected() {
            3
        } else {
            2
        }
    }
}

/// How angular separations are turned into distances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Projection {
    /// Plain angular separation.
    Theta,
    /// Comoving separation at the redshift of the pair.
    Comoving,
    /// Physical separation at the redshift of the pair.
    Physical,
}

impl Projection {
    /// True when nodes need a cached comoving distance.
    pub fn needs_comoving_distance(&self) -> bool {
        matches!(self, Projection::Comoving | Projection::Physical)
    }
}

/// Resampling scheme used to estimate errors.
///
/// - `Subsample`: draw `i` uses only cell `i`.
/// - `Jackknife`: draw `i` uses every cell but cell `i`.
/// - `Bootstrap`: draw `i` picks cells uniformly with replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResampleScheme {
    /// Each draw keeps a single cell.
    Subsample,
    /// Each draw removes a single cell.
    Jackknife,
    /// Each draw resamples cells with replacement.
    Bootstrap,
}

/// Generic error type
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The number of subsamples must be an exact power of two.
    #[error("number of subsamples must be a power of two, got {0}")]
    SubsampleCountNotPowerOfTwo(usize),
    /// There must be at least as many points as subsamples.
    #[error("number of subsamples ({subsamples}) exceeds number of points ({points})")]
    TooManySubsamples {
        /// Requested number of subsamples.
        subsamples: usize,
        /// Number of points in the full data set.
        points: usize,
    },
    /// A mask weight does not fit in a byte.
    #[error("mask weight {weight} for draw {draw}, cell {cell} exceeds 255")]
    WeightOverflow {
        /// Resampling draw.
        draw: usize,
        /// Subsample cell.
        cell: usize,
        /// Accumulated weight.
        weight: usize,
    },
    /// Leaves must be allowed to hold at least one point.
    #[error("leaf size must be at least 1")]
    InvalidLeafSize,
    /// Trees cannot be built over an empty point set.
    #[error("cannot build a tree from an empty point set")]
    EmptyPointSet,
    /// The mask was built for a different configuration.
    #[error("mask mismatch: {0}")]
    MaskMismatch(String),
    /// Points do not have the dimensionality required by the correlation type.
    #[error("expected points with {expected} coordinates, got {found}")]
    DimensionMismatch {
        /// Dimensionality required by the options.
        expected: usize,
        /// Dimensionality of the point set.
        found: usize,
    },
    /// The coordinating process was not given the full data set.
    #[error("the coordinating process needs the full data set to build the mask")]
    MissingData,
    /// Failure while writing a tree dump.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Exit code passed to the worker group when this error aborts a run.
    pub fn code(&self) -> i32 {
        match self {
            Error::SubsampleCountNotPowerOfTwo(_) => 2,
            Error::TooManySubsamples { .. } => 3,
            Error::WeightOverflow { .. } => 4,
            Error::InvalidLeafSize => 5,
            Error::EmptyPointSet => 6,
            Error::MaskMismatch(_) => 7,
            Error::DimensionMismatch { .. } => 8,
            Error::MissingData => 9,
            Error::Io(_) => 10,
        }
    }
}

/// Result Type
pub type Result<T> = std::result::Result<T, Error>;
