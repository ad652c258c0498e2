use super::{check_bounds, check_npoint, map_1d_grid, check_positive_rmin, RTransform, DEFAULT_NPOINT};
use crate::error::GridError;
use crate::onedgrid::OneDGrid;

/// Exponential map `r = rmin * exp(alpha * t)`, the classic logarithmic
/// radial grid. `alpha` is chosen so that `r(npoint - 1) = rmax`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExpRTransform {
    rmin: f64,
    rmax: f64,
    npoint: usize,
    alpha: f64,
}

impl ExpRTransform {
    pub fn new(rmin: f64, rmax: f64) -> Result<Self, GridError> {
        Self::with_npoint(rmin, rmax, DEFAULT_NPOINT)
    }

    pub fn with_npoint(rmin: f64, rmax: f64, npoint: usize) -> Result<Self, GridError> {
        check_positive_rmin("ExpRTransform", rmin)?;
        check_bounds(rmin, rmax)?;
        check_npoint(npoint)?;
        let alpha = (rmax / rmin).ln() / (npoint - 1) as f64;
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

impl RTransform for ExpRTransform {
    fn name(&self) -> &'static str {
        "ExpRTransform"
    }

    fn transform(&self, t: f64) -> f64 {
        self.rmin * (t * self.alpha).exp()
    }

    fn deriv(&self, t: f64) -> f64 {
        self.transform(t) * self.alpha
    }

    fn deriv2(&self, t: f64) -> f64 {
        self.deriv(t) * self.alpha
    }

    fn deriv3(&self, t: f64) -> f64 {
        self.deriv2(t) * self.alpha
    }

    fn inverse(&self, r: f64) -> f64 {
        (r / self.rmin).ln() / self.alpha
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
