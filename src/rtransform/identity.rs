use super::RTransform;

/// `r = t` on [0, ∞).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct IdentityRTransform;

impl IdentityRTransform {
    pub fn new() -> Self {
        Self
    }
}

impl RTransform for IdentityRTransform {
    fn name(&self) -> &'static str {
        "IdentityRTransform"
    }

    fn transform(&self, t: f64) -> f64 {
        t
    }

    fn deriv(&self, _t: f64) -> f64 {
        1.0
    }

    fn deriv2(&self, _t: f64) -> f64 {
        0.0
    }

    fn deriv3(&self, _t: f64) -> f64 {
        0.0
    }

    fn inverse(&self, r: f64) -> f64 {
        r
    }
}
