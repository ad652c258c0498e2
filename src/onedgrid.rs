//! One-dimensional quadrature rules on an index domain.
//!
//! Radial transforms consume these rules and map them onto the physical
//! radial coordinate. Three rules are built in: `uniform_integer` (the
//! integer points 0..n-1 with unit weights), Gauss–Legendre on [-1, 1]
//! and Gauss–Laguerre on [0, ∞).

use crate::error::GridError;

/// Points and weights of a 1-D quadrature together with the interval the
/// points are declared to live on.
#[derive(Clone, Debug, PartialEq)]
pub struct OneDGrid {
    points: Vec<f64>,
    weights: Vec<f64>,
    domain: (f64, f64),
}

impl OneDGrid {
    pub fn new(points: Vec<f64>, weights: Vec<f64>, domain: (f64, f64)) -> Result<Self, GridError> {
        if points.len() != weights.len() {
            return Err(GridError::LengthMismatch {
                what: "1-D grid weights",
                expected: points.len(),
                actual: weights.len(),
            });
        }
        check_finite("1-D grid points", &points)?;
        check_finite("1-D grid weights", &weights)?;
        if !(domain.0 <= domain.1) {
            return Err(GridError::InvalidBounds {
                rmin: domain.0,
                rmax: domain.1,
            });
        }
        Ok(Self {
            points,
            weights,
            domain,
        })
    }

    /// Integer points 0, 1, ..., n-1 with unit weights.
    pub fn uniform_integer(npoint: usize) -> Result<Self, GridError> {
        require_points(npoint)?;
        let points: Vec<f64> = (0..npoint).map(|i| i as f64).collect();
        let weights = vec![1.0; npoint];
        Self::new(points, weights, (0.0, (npoint - 1) as f64))
    }

    /// Gauss–Legendre nodes and weights on [-1, 1], ascending.
    pub fn gauss_legendre(npoint: usize) -> Result<Self, GridError> {
        require_points(npoint)?;
        let (points, weights) = gauss_legendre_nodes(npoint, -1.0, 1.0);
        Self::new(points, weights, (-1.0, 1.0))
    }

    /// Gauss–Laguerre rule for ∫₀^∞ f(x) dx.
    ///
    /// The exponential weight function is folded into the weights, so the rule
    /// integrates plain functions rather than `e^-x f(x)`.
    pub fn gauss_laguerre(npoint: usize) -> Result<Self, GridError> {
        require_points(npoint)?;
        let (points, weights) = gauss_laguerre_nodes(npoint);
        Self::new(points, weights, (0.0, f64::INFINITY))
    }

    pub fn points(&self) -> &[f64] {
        &self.points
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn size(&self) -> usize {
        self.points.len()
    }

    /// Weighted sum of `values` sampled at the grid points.
    pub fn integrate(&self, values: &[f64]) -> Result<f64, GridError> {
        if values.len() != self.size() {
            return Err(GridError::LengthMismatch {
                what: "integrand values",
                expected: self.size(),
                actual: values.len(),
            });
        }
        Ok(self.weights.iter().zip(values).map(|(w, v)| w * v).sum())
    }
}

pub(crate) fn check_finite(what: &'static str, values: &[f64]) -> Result<(), GridError> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(GridError::NonFiniteValue {
            what,
            index,
            value: values[index],
        }),
        None => Ok(()),
    }
}

fn require_points(npoint: usize) -> Result<(), GridError> {
    if npoint < 2 {
        return Err(GridError::InvalidParameter {
            name: "npoint",
            requirement: "at least 2",
            value: npoint as f64,
        });
    }
    Ok(())
}

/// Gauss–Legendre nodes and weights on [a, b].
///
/// Simple Newton solver for roots of P_n(x).
pub(crate) fn gauss_legendre_nodes(n: usize, a: f64, b: f64) -> (Vec<f64>, Vec<f64>) {
    let m = (n + 1) / 2;
    let mut x = vec![0.0_f64; n];
    let mut w = vec![0.0_f64; n];
    let nn = n as f64;
    let xm = 0.5 * (b + a);
    let xl = 0.5 * (b - a);

    for i in 0..m {
        let mut z = (std::f64::consts::PI * (i as f64 + 0.75) / (nn + 0.5)).cos();
        for _ in 0..100 {
            let (p1, p2) = legendre_pn(n, z);
            let pp = (nn * (z * p1 - p2)) / (z * z - 1.0); // P'_n(z)
            let z1 = z;
            z = z1 - p1 / pp;
            if (z - z1).abs() < 1e-15 {
                break;
            }
        }
        let (p1, p2) = legendre_pn(n, z);
        let pp = (nn * (z * p1 - p2)) / (z * z - 1.0);
        x[i] = xm - xl * z;
        x[n - 1 - i] = xm + xl * z;
        let wi = 2.0 * xl / ((1.0 - z * z) * pp * pp);
        w[i] = wi;
        w[n - 1 - i] = wi;
    }
    (x, w)
}

/// Returns (P_n(z), P_{n-1}(z)).
fn legendre_pn(n: usize, z: f64) -> (f64, f64) {
    let mut p1 = 1.0;
    let mut p2 = 0.0;
    for j in 1..=n {
        let p3 = p2;
        p2 = p1;
        p1 = ((2.0 * j as f64 - 1.0) * z * p2 - (j as f64 - 1.0) * p3) / (j as f64);
    }
    (p1, p2)
}

/// Returns (L_n(z), L_{n-1}(z)).
fn laguerre_ln(n: usize, z: f64) -> (f64, f64) {
    let mut p1 = 1.0;
    let mut p2 = 0.0;
    for j in 1..=n {
        let p3 = p2;
        p2 = p1;
        let jf = j as f64;
        p1 = ((2.0 * jf - 1.0 - z) * p2 - (jf - 1.0) * p3) / jf;
    }
    (p1, p2)
}

fn gauss_laguerre_nodes(n: usize) -> (Vec<f64>, Vec<f64>) {
    let nn = n as f64;
    let mut x = vec![0.0_f64; n];
    let mut w = vec![0.0_f64; n];
    let mut z = 0.0_f64;

    for i in 0..n {
        // Asymptotic starting guesses, refined by Newton below.
        if i == 0 {
            z = 3.0 / (1.0 + 2.4 * nn);
        } else if i == 1 {
            z += 15.0 / (1.0 + 2.5 * nn);
        } else {
            let ai = (i - 1) as f64;
            z += (1.0 + 2.55 * ai) / (1.9 * ai) * (z - x[i - 2]);
        }
        for _ in 0..100 {
            let (p1, p2) = laguerre_ln(n, z);
            let pp = (nn * p1 - nn * p2) / z;
            let z1 = z;
            z = z1 - p1 / pp;
            if (z - z1).abs() <= 1e-14 * z.abs().max(1.0) {
                break;
            }
        }
        let (p1, p2) = laguerre_ln(n, z);
        let pp = (nn * p1 - nn * p2) / z;
        x[i] = z;
        w[i] = -1.0 / (pp * nn * p2) * z.exp();
    }
    (x, w)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_integer() {
        let grid = OneDGrid::uniform_integer(10).unwrap();
        assert_eq!(grid.size(), 10);
        assert_eq!(grid.points()[9], 9.0);
        assert_eq!(grid.domain(), (0.0, 9.0));
        assert!(grid.weights().iter().all(|&w| w == 1.0));
        assert!(OneDGrid::uniform_integer(1).is_err());
    }

    #[test]
    fn test_gauss_legendre_polynomial_exactness() {
        let grid = OneDGrid::gauss_legendre(10).unwrap();
        assert_eq!(grid.domain(), (-1.0, 1.0));
        assert!(grid.points().windows(2).all(|p| p[0] < p[1]));
        let values: Vec<f64> = grid.points().iter().map(|x| x.powi(18) + x * x).collect();
        let exact = 2.0 / 19.0 + 2.0 / 3.0;
        assert!((grid.integrate(&values).unwrap() - exact).abs() < 1e-13);
    }

    #[test]
    fn test_gauss_laguerre_exponential_moments() {
        let grid = OneDGrid::gauss_laguerre(40).unwrap();
        assert_eq!(grid.domain().0, 0.0);
        // ∫ x² e^{-x} dx = 2
        let values: Vec<f64> = grid.points().iter().map(|x| x * x * (-x).exp()).collect();
        assert!((grid.integrate(&values).unwrap() - 2.0).abs() < 1e-10);
        // ∫ e^{-2x} dx = 1/2
        let values: Vec<f64> = grid.points().iter().map(|x| (-2.0 * x).exp()).collect();
        assert!((grid.integrate(&values).unwrap() - 0.5).abs() < 1e-8);
    }

    #[test]
    fn test_integrate_length_mismatch() {
        let grid = OneDGrid::uniform_integer(5).unwrap();
        assert!(matches!(
            grid.integrate(&[1.0, 2.0]),
            Err(GridError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_new_rejects_bad_input() {
        assert!(OneDGrid::new(vec![0.0, 1.0], vec![1.0], (0.0, 1.0)).is_err());
        assert!(OneDGrid::new(vec![0.0, f64::NAN], vec![1.0, 1.0], (0.0, 1.0)).is_err());
    }
}
