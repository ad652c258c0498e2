use super::RTransform;
use crate::error::GridError;

/// Hyperbolic map `r = a * t / (1 - b * t)`.
///
/// The map diverges at `t = 1/b`, so a grid of `n` points is only valid
/// while `b * (n - 1) < 1`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HyperbolicRTransform {
    a: f64,
    b: f64,
}

impl HyperbolicRTransform {
    pub fn new(a: f64, b: f64) -> Result<Self, GridError> {
        if !(a > 0.0) {
            return Err(GridError::InvalidParameter {
                name: "a",
                requirement: "strictly positive",
                value: a,
            });
        }
        if !(b > 0.0) {
            return Err(GridError::InvalidParameter {
                name: "b",
                requirement: "strictly positive",
                value: b,
            });
        }
        Ok(Self { a, b })
    }

    /// Build the transform and check it stays regular over `npoint` points.
    pub fn with_npoint(a: f64, b: f64, npoint: usize) -> Result<Self, GridError> {
        let rtf = Self::new(a, b)?;
        rtf.check_size(npoint)?;
        Ok(rtf)
    }

    pub fn a(&self) -> f64 {
        self.a
    }

    pub fn b(&self) -> f64 {
        self.b
    }
}

impl RTransform for HyperbolicRTransform {
    fn name(&self) -> &'static str {
        "HyperbolicRTransform"
    }

    fn transform(&self, t: f64) -> f64 {
        self.a * t / (1.0 - self.b * t)
    }

    fn deriv(&self, t: f64) -> f64 {
        let x = 1.0 / (1.0 - self.b * t);
        self.a * x * x
    }

    fn deriv2(&self, t: f64) -> f64 {
        let x = 1.0 / (1.0 - self.b * t);
        2.0 * self.a * self.b * x * x * x
    }

    fn deriv3(&self, t: f64) -> f64 {
        let x = 1.0 / (1.0 - self.b * t);
        6.0 * self.a * self.b * self.b * x * x * x * x
    }

    fn inverse(&self, r: f64) -> f64 {
        r / (self.a + self.b * r)
    }

    fn check_size(&self, npoint: usize) -> Result<(), GridError> {
        let product = self.b * npoint.saturating_sub(1) as f64;
        if product >= 1.0 {
            return Err(GridError::SingularTransform { npoint, product });
        }
        Ok(())
    }
}
