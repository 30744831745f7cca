//! Resampling masks.
//!
//! The full data set is cut into a power-of-two number of spatial cells by
//! recursive bisection. Each resampling draw assigns a byte weight to every
//! cell; tree nodes later inherit the weights of the cell holding their
//! centroid.

use crate::options::TreeOptions;
use crate::points::{bounds, split_at_axis, Point, PointSet};
use crate::traits::WorkerGroup;
use crate::types::{Error, ResampleScheme, Result};
use log::{error, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Rank that builds the mask
pub const COORDINATOR: usize = 0;

/// Cell bounding boxes and per-draw cell weights.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mask {
    dim: usize,
    cells: usize,
    resamples: usize,
    min: Vec<f64>,
    max: Vec<f64>,
    weights: Vec<u8>,
}

impl Mask {
    /// A mask for runs without resampling
    pub fn empty() -> Self {
        Self::default()
    }

    /// A mask with zeroed bounds and weights, ready to be filled or received.
    pub fn zeroed(dim: usize, cells: usize, resamples: usize) -> Self {
        Self {
            dim,
            cells,
            resamples,
            min: vec![0.0; dim * cells],
            max: vec![0.0; dim * cells],
            weights: vec![0; resamples * cells],
        }
    }

    /// Whether the mask carries no cells
    pub fn is_empty(&self) -> bool {
        self.cells == 0
    }

    /// Number of coordinates used by the cell bounds
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of subsample cells
    pub fn cells(&self) -> usize {
        self.cells
    }

    /// Number of resampling draws
    pub fn resamples(&self) -> usize {
        self.resamples
    }

    /// Lower corner of a cell
    pub fn min(&self, cell: usize) -> &[f64] {
        &self.min[self.dim * cell..self.dim * (cell + 1)]
    }

    /// Upper corner of a cell
    pub fn max(&self, cell: usize) -> &[f64] {
        &self.max[self.dim * cell..self.dim * (cell + 1)]
    }

    /// Weight of a cell in a draw
    pub fn weight(&self, draw: usize, cell: usize) -> u8 {
        self.weights[self.cells * draw + cell]
    }

    /// The full weight table, draw-major
    pub fn weights(&self) -> &[u8] {
        &self.weights
    }

    /// First cell whose box strictly contains `position` along every mask axis.
    pub fn cell_containing(&self, position: &[f64]) -> Option<usize> {
        (0..self.cells).find(|&cell| {
            self.min(cell)
                .iter()
                .zip(self.max(cell))
                .zip(position)
                .all(|((lo, hi), x)| lo < x && x < hi)
        })
    }
}

/// Builds the mask on the coordinating process.
pub struct MaskBuilder<'a> {
    options: &'a TreeOptions,
}

impl<'a> MaskBuilder<'a> {
    /// Create a mask builder
    pub fn new(options: &'a TreeOptions) -> Self {
        Self { options }
    }

    /// Build the mask from the full data set.
    ///
    /// Bootstrap draws use the seed of the options, or entropy if none is set.
    pub fn build(&self, points: &PointSet) -> Result<Mask> {
        self.build_with_rng(points, &mut seeded_rng(self.options))
    }

    /// Build the mask from the full data set with a given random number generator.
    pub fn build_with_rng<R: Rng>(&self, points: &PointSet, rng: &mut R) -> Result<Mask> {
        let subsamples = self.options.subsamples();
        let depth = subsample_depth(subsamples)?;
        if points.dim() != self.options.dim() {
            return Err(Error::DimensionMismatch {
                expected: self.options.dim(),
                found: points.dim(),
            });
        }
        if subsamples > points.len() {
            return Err(Error::TooManySubsamples {
                subsamples,
                points: points.len(),
            });
        }

        let dim = self.options.mask_dim();
        let mut mask = Mask::zeroed(dim, subsamples, self.options.resamples());
        mask.weights = self.weight_table(rng)?;

        let mut scratch: Vec<Point> = points.points().to_vec();
        let mut cursor = CellCursor {
            mask: &mut mask,
            next: 0,
        };
        cut(&mut scratch, 0, depth, dim, &mut cursor);
        debug_assert_eq!(cursor.next, subsamples);

        Ok(mask)
    }

    /// Weight of every cell in every draw, draw-major.
    pub fn weight_table<R: Rng>(&self, rng: &mut R) -> Result<Vec<u8>> {
        let resamples = self.options.resamples();
        let cells = self.options.subsamples();
        let mut table = vec![0usize; resamples * cells];

        for draw in 0..resamples {
            let row = &mut table[cells * draw..cells * (draw + 1)];
            match self.options.scheme() {
                ResampleScheme::Subsample => {
                    for (cell, w) in row.iter_mut().enumerate() {
                        *w = usize::from(draw == cell);
                    }
                }
                ResampleScheme::Jackknife => {
                    for (cell, w) in row.iter_mut().enumerate() {
                        *w = usize::from(draw != cell);
                    }
                }
                ResampleScheme::Bootstrap => {
                    for _ in 0..cells {
                        row[rng.gen_range(0..cells)] += 1;
                    }
                }
            }
        }

        table
            .into_iter()
            .enumerate()
            .map(|(i, weight)| {
                u8::try_from(weight).map_err(|_| Error::WeightOverflow {
                    draw: i / cells,
                    cell: i % cells,
                    weight,
                })
            })
            .collect()
    }
}

fn seeded_rng(options: &TreeOptions) -> StdRng {
    match options.seed() {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Depth of the bisection producing `subsamples` cells.
pub fn subsample_depth(subsamples: usize) -> Result<usize> {
    if !subsamples.is_power_of_two() {
        return Err(Error::SubsampleCountNotPowerOfTwo(subsamples));
    }
    Ok(subsamples.trailing_zeros() as usize)
}

struct CellCursor<'m> {
    mask: &'m mut Mask,
    next: usize,
}

fn cut(points: &mut [Point], axis: usize, depth: usize, dim: usize, cursor: &mut CellCursor<'_>) {
    if depth > 0 {
        let (left, right) = split_at_axis(points, axis);
        let next_axis = (axis + 1) % dim;
        cut(left, next_axis, depth - 1, dim, cursor);
        cut(right, next_axis, depth - 1, dim, cursor);
    } else {
        let (min, max) = bounds(points, dim);
        let cell = cursor.next;
        cursor.mask.min[dim * cell..dim * (cell + 1)].copy_from_slice(&min[..dim]);
        cursor.mask.max[dim * cell..dim * (cell + 1)].copy_from_slice(&max[..dim]);
        cursor.next += 1;
    }
}

/// Build the mask on the coordinating rank and share it with every worker.
///
/// `points` is the full data set and is only read on the coordinating rank.
/// Without resampling an empty mask is returned and nothing is communicated.
/// Errors detected on the coordinating rank abort the whole group before any
/// broadcast takes place.
pub fn resample<G: WorkerGroup>(
    options: &TreeOptions,
    points: Option<&PointSet>,
    group: &G,
) -> Result<Mask> {
    resample_with_rng(options, points, group, &mut seeded_rng(options))
}

/// [`resample`] with a given random number generator for bootstrap draws.
pub fn resample_with_rng<G: WorkerGroup, R: Rng>(
    options: &TreeOptions,
    points: Option<&PointSet>,
    group: &G,
    rng: &mut R,
) -> Result<Mask> {
    if !options.resampling() {
        return Ok(Mask::empty());
    }

    // Every rank sees the same options, so this fails everywhere or nowhere
    subsample_depth(options.subsamples())?;

    let mut mask = if group.rank() == COORDINATOR {
        let built = points
            .ok_or(Error::MissingData)
            .and_then(|points| MaskBuilder::new(options).build_with_rng(points, rng));
        match built {
            Ok(mask) => mask,
            Err(e) => {
                error!("Failed to build the resampling mask: {e}");
                group.abort(e.code());
                return Err(e);
            }
        }
    } else {
        Mask::zeroed(options.mask_dim(), options.subsamples(), options.resamples())
    };

    group.broadcast_f64(&mut mask.min, COORDINATOR);
    group.broadcast_f64(&mut mask.max, COORDINATOR);
    group.broadcast_u8(&mut mask.weights, COORDINATOR);

    info!(
        "Resampling mask ready: {} cells, {} {:?} draws.",
        mask.cells,
        mask.resamples,
        options.scheme()
    );

    Ok(mask)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::comm::SingleProcess;
    use crate::types::CorrelationType;
    use rand::rngs::mock::StepRng;

    fn grid(n: usize) -> PointSet {
        let mut set = PointSet::new(2);
        for i in 0..n {
            for j in 0..n {
                set.push(&[i as f64, j as f64], 1.0);
            }
        }
        set
    }

    fn options(scheme: ResampleScheme, resamples: usize, subsamples: usize) -> TreeOptions {
        let mut options = TreeOptions::new(CorrelationType::AutoAngular);
        options.set_resampling(scheme, resamples, subsamples);
        options.set_seed(42);
        options
    }

    #[test]
    fn test_subsample_depth() {
        assert_eq!(subsample_depth(1).unwrap(), 0);
        assert_eq!(subsample_depth(8).unwrap(), 3);
        assert!(matches!(
            subsample_depth(6),
            Err(Error::SubsampleCountNotPowerOfTwo(6))
        ));
        assert!(subsample_depth(0).is_err());
    }

    #[test]
    fn test_subsample_table_is_identity() {
        let options = options(ResampleScheme::Subsample, 4, 4);
        let mask = MaskBuilder::new(&options).build(&grid(4)).unwrap();
        for draw in 0..4 {
            for cell in 0..4 {
                assert_eq!(mask.weight(draw, cell), u8::from(draw == cell));
            }
        }
    }

    #[test]
    fn test_jackknife_table_is_complement() {
        let options = options(ResampleScheme::Jackknife, 4, 4);
        let mask = MaskBuilder::new(&options).build(&grid(4)).unwrap();
        for draw in 0..4 {
            for cell in 0..4 {
                assert_eq!(mask.weight(draw, cell), u8::from(draw != cell));
            }
        }
    }

    #[test]
    fn test_bootstrap_draws_sum_to_cell_count() {
        let options = options(ResampleScheme::Bootstrap, 10, 8);
        let mask = MaskBuilder::new(&options).build(&grid(8)).unwrap();
        for draw in 0..10 {
            let total: usize = (0..8).map(|cell| mask.weight(draw, cell) as usize).sum();
            assert_eq!(total, 8);
        }

        // Same seed, same table
        let again = MaskBuilder::new(&options).build(&grid(8)).unwrap();
        assert_eq!(mask, again);
    }

    #[test]
    fn test_bootstrap_overflow() {
        let options = options(ResampleScheme::Bootstrap, 1, 256);
        let mut rng = StepRng::new(0, 0);
        let result = MaskBuilder::new(&options).build_with_rng(&grid(16), &mut rng);
        assert!(matches!(
            result,
            Err(Error::WeightOverflow {
                draw: 0,
                cell: 0,
                weight: 256
            })
        ));
    }

    #[test]
    fn test_cells_tile_the_grid() {
        let options = options(ResampleScheme::Jackknife, 4, 4);
        let mask = MaskBuilder::new(&options).build(&grid(4)).unwrap();

        // First cut along x, then y: cells are the four 2x2 quadrants
        let expected = [
            ([0.0, 0.0], [1.0, 1.0]),
            ([0.0, 2.0], [1.0, 3.0]),
            ([2.0, 0.0], [3.0, 1.0]),
            ([2.0, 2.0], [3.0, 3.0]),
        ];
        for (cell, (min, max)) in expected.iter().enumerate() {
            assert_eq!(mask.min(cell), min);
            assert_eq!(mask.max(cell), max);
        }

        assert_eq!(mask.cell_containing(&[0.5, 2.5]), Some(1));
        // Boxes are open
        assert_eq!(mask.cell_containing(&[1.0, 0.5]), None);
    }

    #[test]
    fn test_too_many_subsamples() {
        let options = options(ResampleScheme::Jackknife, 32, 32);
        let result = MaskBuilder::new(&options).build(&grid(4));
        assert!(matches!(
            result,
            Err(Error::TooManySubsamples {
                subsamples: 32,
                points: 16
            })
        ));
    }

    #[test]
    fn test_no_resampling() {
        let options = TreeOptions::default();
        let mask = resample(&options, None, &SingleProcess).unwrap();
        assert!(mask.is_empty());
        assert!(mask.weights().is_empty());
    }

    #[test]
    fn test_missing_data() {
        let options = options(ResampleScheme::Jackknife, 4, 4);
        assert!(matches!(
            resample(&options, None, &SingleProcess),
            Err(Error::MissingData)
        ));
    }
}
