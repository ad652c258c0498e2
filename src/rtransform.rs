//! Radial coordinate transforms.
//!
//! A transform maps an index coordinate `t` onto a physical radius `r(t)`.
//! Pushing a 1-D quadrature through a transform gives a radial quadrature:
//! points `r(t_i)` with weights `w_i * dr/dt(t_i)`.
//!
//! Scalar methods never fail. The `*_array` methods additionally check
//! constraints that depend on how many points are evaluated together (the
//! hyperbolic transform is singular past `t = 1/b`).

mod exp;
mod hyperbolic;
mod identity;
mod linear;
mod power;


pub use exp::ExpRTransform;
pub use hyperbolic::HyperbolicRTransform;
pub use identity::IdentityRTransform;
pub use linear::LinearInfiniteRTransform;
pub use power::PowerRTransform;

use crate::error::GridError;
use crate::onedgrid::OneDGrid;

/// Number of index points a bounded transform spans when none is given:
/// `t = DEFAULT_NPOINT - 1` maps onto `rmax`.
pub const DEFAULT_NPOINT: usize = 100;

/// Common contract of all radial transforms.
pub trait RTransform {
    fn name(&self) -> &'static str;

    /// Index interval accepted by the transform.
    fn domain(&self) -> (f64, f64) {
        (0.0, f64::INFINITY)
    }

    fn transform(&self, t: f64) -> f64;
    fn deriv(&self, t: f64) -> f64;
    fn deriv2(&self, t: f64) -> f64;
    fn deriv3(&self, t: f64) -> f64;
    fn inverse(&self, r: f64) -> f64;

    /// Validate constraints tied to the number of points evaluated at once.
    fn check_size(&self, _npoint: usize) -> Result<(), GridError> {
        Ok(())
    }

    fn transform_array(&self, t: &[f64]) -> Result<Vec<f64>, GridError> {
        self.check_size(t.len())?;
        Ok(t.iter().map(|&x| self.transform(x)).collect())
    }

    fn deriv_array(&self, t: &[f64]) -> Result<Vec<f64>, GridError> {
        self.check_size(t.len())?;
        Ok(t.iter().map(|&x| self.deriv(x)).collect())
    }

    fn deriv2_array(&self, t: &[f64]) -> Result<Vec<f64>, GridError> {
        self.check_size(t.len())?;
        Ok(t.iter().map(|&x| self.deriv2(x)).collect())
    }

    fn deriv3_array(&self, t: &[f64]) -> Result<Vec<f64>, GridError> {
        self.check_size(t.len())?;
        Ok(t.iter().map(|&x| self.deriv3(x)).collect())
    }

    fn inverse_array(&self, r: &[f64]) -> Result<Vec<f64>, GridError> {
        self.check_size(r.len())?;
        Ok(r.iter().map(|&x| self.inverse(x)).collect())
    }

    /// Map a 1-D quadrature onto the radial coordinate.
    ///
    /// The grid's declared domain must lie inside [`RTransform::domain`].
    fn transform_1d_grid(&self, grid: &OneDGrid) -> Result<OneDGrid, GridError> {
        map_1d_grid(self, grid)
    }
}

/// Push `grid` through `rtf` point by point.
pub(crate) fn map_1d_grid<R: RTransform + ?Sized>(
    rtf: &R,
    grid: &OneDGrid,
) -> Result<OneDGrid, GridError> {
    let (lo, hi) = rtf.domain();
    let (grid_lo, grid_hi) = grid.domain();
    if grid_lo < lo || grid_hi > hi {
        return Err(GridError::IncompatibleDomain {
            grid_lo,
            grid_hi,
            lo,
            hi,
        });
    }
    let points = rtf.transform_array(grid.points())?;
    let weights = rtf
        .deriv_array(grid.points())?
        .into_iter()
        .zip(grid.weights())
        .map(|(d, w)| d * w)
        .collect();
    let upper = if grid_hi.is_finite() {
        rtf.transform(grid_hi)
    } else {
        f64::INFINITY
    };
    OneDGrid::new(points, weights, (rtf.transform(grid_lo), upper))
}

pub(crate) fn check_bounds(rmin: f64, rmax: f64) -> Result<(), GridError> {
    if !(rmin < rmax) {
        return Err(GridError::InvalidBounds { rmin, rmax });
    }
    Ok(())
}

pub(crate) fn check_positive_rmin(transform: &'static str, rmin: f64) -> Result<(), GridError> {
    if !(rmin > 0.0) {
        return Err(GridError::NonPositiveRmin { transform, rmin });
    }
    Ok(())
}

pub(crate) fn check_npoint(npoint: usize) -> Result<(), GridError> {
    if npoint < 2 {
        return Err(GridError::InvalidParameter {
            name: "npoint",
            requirement: "at least 2",
            value: npoint as f64,
        });
    }
    Ok(())
}
