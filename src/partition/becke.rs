use super::owner_weights;
use crate::elements::bragg_slater_radius;
use crate::error::GridError;
use nalgebra::Vector3;
use std::collections::HashMap;

/// Becke's fuzzy Voronoi cells with the atomic-size adjustment.
///
/// For atoms A and B the confocal coordinate
/// μ = (|p − A| − |p − B|) / |A − B| is shifted to ν = μ + a(1 − μ²), with
/// `a` derived from the ratio of the atomic radii, then smoothed `order`
/// times by f(s) = 1.5 s − 0.5 s³. The cell function is
/// s_AB = ½ (1 − f(ν)) and the weight of A is Π_B s_AB normalized over all
/// atoms.
#[derive(Clone, Debug, PartialEq)]
pub struct BeckeWeights {
    order: u32,
    radii: HashMap<u32, f64>,
}

impl Default for BeckeWeights {
    fn default() -> Self {
        Self {
            order: Self::DEFAULT_ORDER,
            radii: HashMap::new(),
        }
    }
}

impl BeckeWeights {
    pub const DEFAULT_ORDER: u32 = 3;
    /// Bound on the size adjustment |a|, keeping ν monotone in μ.
    pub const ADJUSTMENT_CUTOFF: f64 = 0.45;

    pub fn new(order: u32) -> Result<Self, GridError> {
        if order == 0 {
            return Err(GridError::InvalidParameter {
                name: "becke order",
                requirement: "at least 1",
                value: 0.0,
            });
        }
        Ok(Self {
            order,
            radii: HashMap::new(),
        })
    }

    /// Override the default Bragg–Slater radii (bohr) for some elements.
    pub fn with_radii(mut self, radii: HashMap<u32, f64>) -> Result<Self, GridError> {
        for &radius in radii.values() {
            if !(radius.is_finite() && radius > 0.0) {
                return Err(GridError::InvalidParameter {
                    name: "becke radius",
                    requirement: "finite and strictly positive",
                    value: radius,
                });
            }
        }
        self.radii.extend(radii);
        Ok(self)
    }

    pub fn order(&self) -> u32 {
        self.order
    }

    pub fn radius(&self, atnum: u32) -> Result<f64, GridError> {
        match self.radii.get(&atnum) {
            Some(&r) => Ok(r),
            None => bragg_slater_radius(atnum),
        }
    }

    /// Weight of every atom at `point`; the entries sum to one.
    pub fn atom_weights(
        &self,
        point: &Vector3<f64>,
        atcoords: &[Vector3<f64>],
        atnums: &[u32],
    ) -> Result<Vec<f64>, GridError> {
        let pairs = self.pair_table(atcoords, atnums)?;
        let cells = pairs.cell_functions(point, atcoords, self.order);
        let total: f64 = cells.iter().sum();
        Ok(cells.iter().map(|c| c / total).collect())
    }

    pub fn generate_weights(
        &self,
        points: &[Vector3<f64>],
        atcoords: &[Vector3<f64>],
        atnums: &[u32],
        offsets: &[usize],
    ) -> Result<Vec<f64>, GridError> {
        let pairs = self.pair_table(atcoords, atnums)?;
        owner_weights(points, offsets, |atom, p| {
            let cells = pairs.cell_functions(p, atcoords, self.order);
            let total: f64 = cells.iter().sum();
            if total <= 0.0 || !total.is_finite() {
                return Ok(0.0);
            }
            Ok(cells[atom] / total)
        })
    }

    fn pair_table(&self, atcoords: &[Vector3<f64>], atnums: &[u32]) -> Result<PairTable, GridError> {
        if atnums.len() != atcoords.len() {
            return Err(GridError::LengthMismatch {
                what: "atomic numbers per coordinate",
                expected: atcoords.len(),
                actual: atnums.len(),
            });
        }
        let radii = atnums
            .iter()
            .map(|&z| self.radius(z))
            .collect::<Result<Vec<f64>, GridError>>()?;
        let n = atcoords.len();
        let mut distance = vec![0.0; n * n];
        let mut adjustment = vec![0.0; n * n];
        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                distance[i * n + j] = (atcoords[i] - atcoords[j]).norm();
                adjustment[i * n + j] = size_adjustment(radii[i], radii[j]);
            }
        }
        Ok(PairTable {
            n,
            distance,
            adjustment,
        })
    }
}

/// Interatomic distances and size adjustments, row-major `n × n`.
struct PairTable {
    n: usize,
    distance: Vec<f64>,
    adjustment: Vec<f64>,
}

impl PairTable {
    /// Unnormalized cell functions P_A(p) of every atom.
    fn cell_functions(&self, p: &Vector3<f64>, atcoords: &[Vector3<f64>], order: u32) -> Vec<f64> {
        let n = self.n;
        let dist: Vec<f64> = atcoords.iter().map(|a| (p - a).norm()).collect();
        let mut cells = vec![1.0_f64; n];
        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                let rij = self.distance[i * n + j];
                if rij < 1e-12 {
                    cells[i] *= 0.5;
                    continue;
                }
                let mu = (dist[i] - dist[j]) / rij;
                let nu = mu + self.adjustment[i * n + j] * (1.0 - mu * mu);
                cells[i] *= 0.5 * (1.0 - smoothed_step(nu, order));
            }
        }
        cells
    }
}

fn smoothed_step(mut s: f64, order: u32) -> f64 {
    for _ in 0..order {
        s = 1.5 * s - 0.5 * s * s * s;
    }
    s
}

fn size_adjustment(ri: f64, rj: f64) -> f64 {
    let chi = ri / rj;
    let u = (chi - 1.0) / (chi + 1.0);
    if u.abs() < 1e-14 {
        return 0.0;
    }
    let a = u / (u * u - 1.0);
    a.clamp(-BeckeWeights::ADJUSTMENT_CUTOFF, BeckeWeights::ADJUSTMENT_CUTOFF)
}
