use super::{check_bounds, check_npoint, map_1d_grid, check_positive_rmin, RTransform, DEFAULT_NPOINT};
use crate::error::GridError;
use crate::onedgrid::OneDGrid;
use tracing::warn;

/// Power-law map `r = rmin * (t + 1)^power` with `r(npoint - 1) = rmax`.
///
/// The exponent follows from the bounds, `power = ln(rmax / rmin) / ln(npoint)`.
/// An exponent below 2 concentrates too few points near the nucleus; this
/// is reported as a warning and the transform stays usable.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PowerRTransform {
    rmin: f64,
    rmax: f64,
    npoint: usize,
    power: f64,
}

impl PowerRTransform {
    pub fn new(rmin: f64, rmax: f64) -> Result<Self, GridError> {
        Self::with_npoint(rmin, rmax, DEFAULT_NPOINT)
    }

    pub fn with_npoint(rmin: f64, rmax: f64, npoint: usize) -> Result<Self, GridError> {
        check_positive_rmin("PowerRTransform", rmin)?;
        check_bounds(rmin, rmax)?;
        check_npoint(npoint)?;
        let power = (rmax.ln() - rmin.ln()) / (npoint as f64).ln();
        if power < 2.0 {
            warn!(
                "PowerRTransform exponent {:.4} is below 2 for rmin={}, rmax={}; radial precision is reduced",
                power, rmin, rmax
            );
        }
        Ok(Self {
            rmin,
            rmax,
            npoint,
            power,
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

    pub fn power(&self) -> f64 {
        self.power
    }

    pub fn is_well_conditioned(&self) -> bool {
        self.power >= 2.0
    }
}

impl RTransform for PowerRTransform {
    fn name(&self) -> &'static str {
        "PowerRTransform"
    }

    fn transform(&self, t: f64) -> f64 {
        self.rmin * (t + 1.0).powf(self.power)
    }

    fn deriv(&self, t: f64) -> f64 {
        self.power * self.rmin * (t + 1.0).powf(self.power - 1.0)
    }

    fn deriv2(&self, t: f64) -> f64 {
        self.power * (self.power - 1.0) * self.rmin * (t + 1.0).powf(self.power - 2.0)
    }

    fn deriv3(&self, t: f64) -> f64 {
        self.power
            * (self.power - 1.0)
            * (self.power - 2.0)
            * self.rmin
            * (t + 1.0).powf(self.power - 3.0)
    }

    fn inverse(&self, r: f64) -> f64 {
        (r / self.rmin).powf(1.0 / self.power) - 1.0
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
