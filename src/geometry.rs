//! Distances between positions and the cosmology behind comoving distances.
//!
//! Angular positions are `[ra, dec, ...]` in degrees and angular distances are
//! returned in degrees. Cartesian positions are `[x, y, z]` in arbitrary but
//! consistent units.

use crate::types::CorrelationType;
use std::f64::consts::PI;

/// Speed of light in km/s
pub const SPEED_OF_LIGHT: f64 = 299_792.458;

/// Number of Simpson intervals used for the comoving distance integral
const INTEGRATION_STEPS: usize = 1000;

/// Convert degrees to radians
#[inline]
pub fn to_radians(degrees: f64) -> f64 {
    degrees * PI / 180.0
}

/// Convert radians to degrees
#[inline]
pub fn to_degrees(radians: f64) -> f64 {
    radians * 180.0 / PI
}

fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .take(3)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// Cheap distance between two positions.
///
/// For angular correlations this is the flat-sky approximation of the angular
/// separation: the ra offset is scaled by the cosine of the mean declination.
/// For 3-D correlations it is the Euclidean distance.
pub fn approximate_distance(correlation: CorrelationType, a: &[f64], b: &[f64]) -> f64 {
    if correlation.is_3d() {
        return euclidean(a, b);
    }
    let dx = (a[0] - b[0]) * to_radians(0.5 * (a[1] + b[1])).cos();
    let dy = a[1] - b[1];
    (dx * dx + dy * dy).sqrt()
}

/// Exact distance between two positions.
///
/// Great-circle separation (haversine) for angular correlations, Euclidean
/// distance for 3-D correlations.
pub fn exact_distance(correlation: CorrelationType, a: &[f64], b: &[f64]) -> f64 {
    if correlation.is_3d() {
        return euclidean(a, b);
    }
    let (ra1, dec1) = (to_radians(a[0]), to_radians(a[1]));
    let (ra2, dec2) = (to_radians(b[0]), to_radians(b[1]));
    let sin_ddec = ((dec1 - dec2) / 2.0).sin();
    let sin_dra = ((ra1 - ra2) / 2.0).sin();
    let h = sin_ddec * sin_ddec + dec1.cos() * dec2.cos() * sin_dra * sin_dra;
    to_degrees(2.0 * h.clamp(0.0, 1.0).sqrt().asin())
}

/// Flat or curved Lambda-CDM cosmology.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cosmology {
    /// Hubble constant in km/s/Mpc
    pub h0: f64,
    /// Matter density
    pub omega_m: f64,
    /// Dark energy density
    pub omega_l: f64,
}

impl Default for Cosmology {
    fn default() -> Self {
        Self {
            h0: 72.0,
            omega_m: 0.258,
            omega_l: 0.742,
        }
    }
}

impl Cosmology {
    /// Create a cosmology
    pub fn new(h0: f64, omega_m: f64, omega_l: f64) -> Self {
        Self {
            h0,
            omega_m,
            omega_l,
        }
    }

    /// Curvature density
    pub fn omega_k(&self) -> f64 {
        1.0 - self.omega_m - self.omega_l
    }

    /// Dimensionless Hubble parameter E(z)
    pub fn e(&self, z: f64) -> f64 {
        let a = 1.0 + z;
        (self.omega_m * a * a * a + self.omega_k() * a * a + self.omega_l).sqrt()
    }

    /// Hubble distance c/H0 in Mpc
    pub fn hubble_distance(&self) -> f64 {
        SPEED_OF_LIGHT / self.h0
    }

    /// Line-of-sight comoving distance to redshift `z` in Mpc.
    pub fn comoving_distance(&self, z: f64) -> f64 {
        if z <= 0.0 {
            return 0.0;
        }
        // Simpson's rule over [0, z]
        let h = z / INTEGRATION_STEPS as f64;
        let mut sum = 1.0 / self.e(0.0) + 1.0 / self.e(z);
        for i in 1..INTEGRATION_STEPS {
            let factor = if i % 2 == 1 { 4.0 } else { 2.0 };
            sum += factor / self.e(i as f64 * h);
        }
        self.hubble_distance() * sum * h / 3.0
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_angular_distances() {
        let a = [10.0, 0.0];
        let b = [11.0, 0.0];
        assert_relative_eq!(
            exact_distance(CorrelationType::AutoAngular, &a, &b),
            1.0,
            epsilon = 1e-10
        );
        assert_relative_eq!(
            approximate_distance(CorrelationType::AutoAngular, &a, &b),
            1.0,
            epsilon = 1e-10
        );

        // Pole to equator
        let a = [0.0, 90.0];
        let b = [123.0, 0.0];
        assert_relative_eq!(
            exact_distance(CorrelationType::CrossAngular, &a, &b),
            90.0,
            epsilon = 1e-10
        );
    }

    #[test]
    fn test_approximation_is_close_at_small_separations() {
        let a = [150.0, 2.0];
        let b = [150.01, 2.02];
        let exact = exact_distance(CorrelationType::AutoWp, &a, &b);
        let approx = approximate_distance(CorrelationType::AutoWp, &a, &b);
        assert_relative_eq!(exact, approx, max_relative = 1e-4);
    }

    #[test]
    fn test_3d_distances() {
        let a = [1.0, 2.0, 3.0];
        let b = [4.0, 6.0, 3.0];
        assert_relative_eq!(exact_distance(CorrelationType::Auto3d, &a, &b), 5.0);
        assert_relative_eq!(approximate_distance(CorrelationType::Cross3d, &a, &b), 5.0);
    }

    #[test]
    fn test_comoving_distance() {
        let cosmology = Cosmology::default();
        assert_eq!(cosmology.comoving_distance(0.0), 0.0);

        // Small redshift limit is cz/H0
        let z = 1e-3;
        assert_relative_eq!(
            cosmology.comoving_distance(z),
            SPEED_OF_LIGHT * z / cosmology.h0,
            max_relative = 1e-3
        );

        // Einstein-de Sitter has a closed form
        let eds = Cosmology::new(70.0, 1.0, 0.0);
        let z: f64 = 1.0;
        let expected = 2.0 * eds.hubble_distance() * (1.0 - 1.0 / (1.0 + z).sqrt());
        assert_relative_eq!(eds.comoving_distance(z), expected, max_relative = 1e-8);
    }
}
