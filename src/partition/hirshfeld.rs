use super::owner_weights;
use crate::elements::{slater_shells, MAX_ATOMIC_NUMBER};
use crate::error::GridError;
use libm::lgamma;
use nalgebra::Vector3;
use std::f64::consts::PI;
use std::fmt;
use std::sync::Arc;

/// Spherically averaged density of a neutral free atom.
pub trait FreeAtomDensity: Send + Sync {
    /// ln ρ(r). May be `-inf` where the density vanishes.
    fn log_density(&self, atnum: u32, r: f64) -> Result<f64, GridError>;

    fn density(&self, atnum: u32, r: f64) -> Result<f64, GridError> {
        Ok(self.log_density(atnum, r)?.exp())
    }
}

/// One Slater-type radial term: ln(occ · N²) and the shape parameters.
#[derive(Clone, Copy, Debug)]
struct SlaterTerm {
    log_prefactor: f64,
    power: f64,
    two_zeta: f64,
}

/// Free-atom densities built from Slater's rules.
///
/// Each screening group contributes occ · R(r)² / 4π with the normalized
/// Slater orbital R(r) = N r^(n*−1) e^(−ζ r),
/// N = (2ζ)^(n*+½) / √Γ(2n* + 1), so every density integrates to Z.
#[derive(Clone, Debug)]
pub struct SlaterProatoms {
    terms: Vec<Vec<SlaterTerm>>,
}

impl SlaterProatoms {
    pub fn new() -> Self {
        let terms = (1..=MAX_ATOMIC_NUMBER)
            .map(|z| {
                slater_shells(z)
                    .unwrap_or_default()
                    .iter()
                    .map(|shell| {
                        let two_zeta = 2.0 * shell.zeta;
                        let log_norm_sq =
                            (2.0 * shell.n_eff + 1.0) * two_zeta.ln() - lgamma(2.0 * shell.n_eff + 1.0);
                        SlaterTerm {
                            log_prefactor: (shell.occupation as f64).ln() + log_norm_sq - (4.0 * PI).ln(),
                            power: 2.0 * (shell.n_eff - 1.0),
                            two_zeta,
                        }
                    })
                    .collect()
            })
            .collect();
        Self { terms }
    }
}

impl Default for SlaterProatoms {
    fn default() -> Self {
        Self::new()
    }
}

impl FreeAtomDensity for SlaterProatoms {
    fn log_density(&self, atnum: u32, r: f64) -> Result<f64, GridError> {
        let terms = atnum
            .checked_sub(1)
            .and_then(|i| self.terms.get(i as usize))
            .filter(|t| !t.is_empty())
            .ok_or(GridError::MissingElementData {
                what: "free-atom density",
                atnum,
            })?;
        let logs: Vec<f64> = terms
            .iter()
            .map(|t| {
                let radial = if t.power == 0.0 { 0.0 } else { t.power * r.ln() };
                t.log_prefactor + radial - t.two_zeta * r
            })
            .collect();
        Ok(log_sum_exp(&logs))
    }
}

fn log_sum_exp(values: &[f64]) -> f64 {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        return max;
    }
    max + values.iter().map(|v| (v - max).exp()).sum::<f64>().ln()
}

/// Hirshfeld (stockholder) partition: the weight of atom A is
/// ρ_A(|p − A|) / Σ_C ρ_C(|p − C|) with free-atom densities ρ.
#[derive(Clone)]
pub struct HirshfeldWeights {
    proatoms: Arc<dyn FreeAtomDensity>,
}

impl fmt::Debug for HirshfeldWeights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HirshfeldWeights").finish_non_exhaustive()
    }
}

impl Default for HirshfeldWeights {
    fn default() -> Self {
        Self::new()
    }
}

impl HirshfeldWeights {
    pub fn new() -> Self {
        Self::with_density(SlaterProatoms::new())
    }

    pub fn with_density<D: FreeAtomDensity + 'static>(proatoms: D) -> Self {
        Self {
            proatoms: Arc::new(proatoms),
        }
    }

    /// Weight of every atom at `point`; the entries sum to one.
    pub fn atom_weights(
        &self,
        point: &Vector3<f64>,
        atcoords: &[Vector3<f64>],
        atnums: &[u32],
    ) -> Result<Vec<f64>, GridError> {
        let logs = self.log_densities(point, atcoords, atnums)?;
        Ok(normalize_logs(&logs))
    }

    pub fn generate_weights(
        &self,
        points: &[Vector3<f64>],
        atcoords: &[Vector3<f64>],
        atnums: &[u32],
        offsets: &[usize],
    ) -> Result<Vec<f64>, GridError> {
        owner_weights(points, offsets, |atom, p| {
            let logs = self.log_densities(p, atcoords, atnums)?;
            Ok(normalize_logs(&logs)[atom])
        })
    }

    fn log_densities(
        &self,
        point: &Vector3<f64>,
        atcoords: &[Vector3<f64>],
        atnums: &[u32],
    ) -> Result<Vec<f64>, GridError> {
        if atnums.len() != atcoords.len() {
            return Err(GridError::LengthMismatch {
                what: "atomic numbers per coordinate",
                expected: atcoords.len(),
                actual: atnums.len(),
            });
        }
        atcoords
            .iter()
            .zip(atnums)
            .map(|(center, &z)| self.proatoms.log_density(z, (point - center).norm()))
            .collect()
    }
}

/// exp(l_i) / Σ exp(l_j), evaluated without overflow. Falls back to equal
/// shares when every density vanishes.
fn normalize_logs(logs: &[f64]) -> Vec<f64> {
    let total = log_sum_exp(logs);
    if !total.is_finite() {
        return vec![1.0 / logs.len() as f64; logs.len()];
    }
    logs.iter().map(|l| (l - total).exp()).collect()
}
