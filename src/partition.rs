//! Atom-in-molecule partition weights.
//!
//! A partition assigns every point of a molecular grid a fraction of its
//! weight per atom; the fractions sum to one over atoms. [`MolGrid`] only
//! needs the fraction of the atom that contributed the point, so the
//! schemes return one value per point, evaluated for the owning atom.
//!
//! [`MolGrid`]: crate::molgrid::MolGrid

mod becke;
mod hirshfeld;

pub use becke::BeckeWeights;
pub use hirshfeld::{FreeAtomDensity, HirshfeldWeights, SlaterProatoms};

use crate::error::GridError;
use crate::onedgrid::check_finite;
use nalgebra::Vector3;
use rayon::prelude::*;

/// How a molecular grid splits its points between atoms.
#[derive(Clone, Debug)]
pub enum PartitionScheme {
    Becke(BeckeWeights),
    Hirshfeld(HirshfeldWeights),
    /// Externally supplied weights, one per global grid point.
    Precomputed(Vec<f64>),
}

impl PartitionScheme {
    /// Partition weight of every point for the atom that owns it.
    ///
    /// `offsets` has one entry per atom plus a final one equal to
    /// `points.len()`; atom `i` owns `points[offsets[i]..offsets[i + 1]]`.
    pub fn compute(
        &self,
        atcoords: &[Vector3<f64>],
        atnums: &[u32],
        points: &[Vector3<f64>],
        offsets: &[usize],
    ) -> Result<Vec<f64>, GridError> {
        check_layout(atcoords, atnums, points, offsets)?;
        match self {
            PartitionScheme::Becke(becke) => becke.generate_weights(points, atcoords, atnums, offsets),
            PartitionScheme::Hirshfeld(hirshfeld) => {
                hirshfeld.generate_weights(points, atcoords, atnums, offsets)
            }
            PartitionScheme::Precomputed(weights) => {
                if weights.len() != points.len() {
                    return Err(GridError::LengthMismatch {
                        what: "precomputed partition weights",
                        expected: points.len(),
                        actual: weights.len(),
                    });
                }
                check_finite("precomputed partition weights", weights)?;
                Ok(weights.clone())
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PartitionScheme::Becke(_) => "becke",
            PartitionScheme::Hirshfeld(_) => "hirshfeld",
            PartitionScheme::Precomputed(_) => "precomputed",
        }
    }
}

impl Default for PartitionScheme {
    fn default() -> Self {
        PartitionScheme::Becke(BeckeWeights::default())
    }
}

impl From<BeckeWeights> for PartitionScheme {
    fn from(value: BeckeWeights) -> Self {
        PartitionScheme::Becke(value)
    }
}

impl From<HirshfeldWeights> for PartitionScheme {
    fn from(value: HirshfeldWeights) -> Self {
        PartitionScheme::Hirshfeld(value)
    }
}

impl From<Vec<f64>> for PartitionScheme {
    fn from(value: Vec<f64>) -> Self {
        PartitionScheme::Precomputed(value)
    }
}

pub(crate) fn check_layout(
    atcoords: &[Vector3<f64>],
    atnums: &[u32],
    points: &[Vector3<f64>],
    offsets: &[usize],
) -> Result<(), GridError> {
    if atnums.len() != atcoords.len() {
        return Err(GridError::LengthMismatch {
            what: "atomic numbers per coordinate",
            expected: atcoords.len(),
            actual: atnums.len(),
        });
    }
    if offsets.len() != atcoords.len() + 1 {
        return Err(GridError::LengthMismatch {
            what: "atom offsets",
            expected: atcoords.len() + 1,
            actual: offsets.len(),
        });
    }
    let last = offsets[offsets.len() - 1];
    if offsets[0] != 0 || last != points.len() || offsets.windows(2).any(|w| w[0] > w[1]) {
        return Err(GridError::LengthMismatch {
            what: "points covered by atom offsets",
            expected: points.len(),
            actual: last,
        });
    }
    Ok(())
}

/// Evaluate `weight_of(owner, point)` for every point in parallel.
pub(crate) fn owner_weights<F>(
    points: &[Vector3<f64>],
    offsets: &[usize],
    weight_of: F,
) -> Result<Vec<f64>, GridError>
where
    F: Fn(usize, &Vector3<f64>) -> Result<f64, GridError> + Sync,
{
    let owners: Vec<usize> = offsets
        .windows(2)
        .enumerate()
        .flat_map(|(atom, w)| std::iter::repeat(atom).take(w[1] - w[0]))
        .collect();
    points
        .par_iter()
        .zip(owners.par_iter())
        .map(|(p, &atom)| weight_of(atom, p))
        .collect()
}
