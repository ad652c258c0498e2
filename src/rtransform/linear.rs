use super::{check_bounds, check_npoint, map_1d_grid, RTransform, DEFAULT_NPOINT};
use crate::error::GridError;
use crate::onedgrid::OneDGrid;

/// Linear map `r = rmin + alpha * t` with `r(npoint - 1) = rmax`.
///
/// The index domain is unbounded above, so points past `npoint - 1`
/// extrapolate linearly beyond `rmax`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearInfiniteRTransform {
    rmin: f64,
    rmax: f64,
    npoint: usize,
    alpha: f64,
}

impl LinearInfiniteRTransform {
    pub fn new(rmin: f64, rmax: f64) -> Result<Self, GridError> {
        Self::with_npoint(rmin, rmax, DEFAULT_NPOINT)
    }

    pub fn with_npoint(rmin: f64, rmax: f64, npoint: usize) -> Result<Self, GridError> {
        check_bounds(rmin, rmax)?;
        check_npoint(npoint)?;
        let alpha = (rmax - rmin) / (npoint - 1) as f64;
        Ok(Self {
            rmin,
            rmax,
            npoint,
            alpha,
        })
    }

    pub fn rmin(&self) -> f64 {
        self.rmin
    }

    pub fn rmax(&self) -> f64 {
        self.rmax
    }

    pub fn npoint(&self) -> usize {
        self.npoint
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl RTransform for LinearInfiniteRTransform {
    fn name(&self) -> &'static str {
        "LinearInfiniteRTransform"
    }

    fn transform(&self, t: f64) -> f64 {
        self.alpha * t + self.rmin
    }

    fn deriv(&self, _t: f64) -> f64 {
        self.alpha
    }

    fn deriv2(&self, _t: f64) -> f64 {
        0.0
    }

    fn deriv3(&self, _t: f64) -> f64 {
        0.0
    }

    fn inverse(&self, r: f64) -> f64 {
        (r - self.rmin) / self.alpha
    }

    /// The scale is refitted to the grid's size so that its last index
    /// still lands on `rmax`.
    fn transform_1d_grid(&self, grid: &OneDGrid) -> Result<OneDGrid, GridError> {
        if grid.size() == self.npoint {
            return map_1d_grid(self, grid);
        }
        let refit = Self::with_npoint(self.rmin, self.rmax, grid.size())?;
        map_1d_grid(&refit, grid)
    }
}
