//! Molecular integration grids assembled from atom-centered grids.


use crate::atomgrid::AtomGrid;
use crate::basegrid::{Grid, LocalGrid};
use crate::error::GridError;
use crate::onedgrid::OneDGrid;
use crate::partition::PartitionScheme;
use crate::presets::Preset;
use nalgebra::Vector3;
use rayon::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Whether a [`MolGrid`] keeps the atom grids it was built from.
#[derive(Clone, Debug)]
pub enum AtomGridStore {
    Stored(Vec<Arc<AtomGrid>>),
    /// Only the concatenated arrays are kept; atomic grids are served as
    /// views over them.
    Discarded,
}

/// One atom's part of a molecular grid.
#[derive(Clone, Debug)]
pub enum SubGrid<'a> {
    /// The atom grid handed to the constructor.
    Stored(&'a Arc<AtomGrid>),
    /// The atom's index range in the molecular arrays, with the atom grid's
    /// own weights.
    View(LocalGrid<'a>),
}

impl<'a> SubGrid<'a> {
    pub fn as_atom_grid(&self) -> Option<&'a Arc<AtomGrid>> {
        match self {
            SubGrid::Stored(grid) => Some(*grid),
            SubGrid::View(_) => None,
        }
    }

    pub fn as_local_grid(&self) -> Option<&LocalGrid<'a>> {
        match self {
            SubGrid::Stored(_) => None,
            SubGrid::View(local) => Some(local),
        }
    }

    pub fn center(&self) -> &Vector3<f64> {
        match self {
            SubGrid::Stored(grid) => grid.center(),
            SubGrid::View(local) => local.center(),
        }
    }

    pub fn size(&self) -> usize {
        match self {
            SubGrid::Stored(grid) => grid.size(),
            SubGrid::View(local) => local.size(),
        }
    }

    pub fn points(&self) -> Vec<Vector3<f64>> {
        match self {
            SubGrid::Stored(grid) => grid.points().to_vec(),
            SubGrid::View(local) => local.points(),
        }
    }

    pub fn weights(&self) -> Vec<f64> {
        match self {
            SubGrid::Stored(grid) => grid.weights().to_vec(),
            SubGrid::View(local) => local.weights(),
        }
    }

    pub fn integrate(&self, values: &[f64]) -> Result<f64, GridError> {
        match self {
            SubGrid::Stored(grid) => grid.integrate(values),
            SubGrid::View(local) => local.integrate(values),
        }
    }
}

/// A per-atom setting given once for all atoms, once per atom, or per
/// element.
#[derive(Clone, Debug)]
pub enum PerAtom<T> {
    Shared(T),
    List(Vec<T>),
    ByElement(HashMap<u32, T>),
}

impl<T> From<T> for PerAtom<T> {
    fn from(value: T) -> Self {
        PerAtom::Shared(value)
    }
}

impl<T: Clone> PerAtom<T> {
    /// One value per atom, in atom order.
    pub fn resolve(&self, atnums: &[u32], what: &'static str) -> Result<Vec<T>, GridError> {
        match self {
            PerAtom::Shared(value) => Ok(vec![value.clone(); atnums.len()]),
            PerAtom::List(values) => {
                if values.len() != atnums.len() {
                    return Err(GridError::LengthMismatch {
                        what,
                        expected: atnums.len(),
                        actual: values.len(),
                    });
                }
                Ok(values.clone())
            }
            PerAtom::ByElement(map) => atnums
                .iter()
                .map(|z| {
                    map.get(z)
                        .cloned()
                        .ok_or(GridError::MissingElementData { what, atnum: *z })
                })
                .collect(),
        }
    }
}

/// Atom grids concatenated into one molecular grid, with partition weights
/// folded into the integration weights.
#[derive(Clone, Debug)]
pub struct MolGrid {
    atnums: Vec<u32>,
    atcoords: Vec<Vector3<f64>>,
    points: Vec<Vector3<f64>>,
    weights: Vec<f64>,
    aim_weights: Vec<f64>,
    atweights: Vec<f64>,
    offsets: Vec<usize>,
    store: AtomGridStore,
}

impl MolGrid {
    /// Concatenate `atgrids` (one per entry of `atnums`) and weight every
    /// point with `scheme`. With `store` the atom grids are kept and handed
    /// back unchanged by [`MolGrid::get_atomic_grid`].
    pub fn new<G: Into<Arc<AtomGrid>>>(
        atnums: Vec<u32>,
        atgrids: Vec<G>,
        scheme: &PartitionScheme,
        store: bool,
    ) -> Result<Self, GridError> {
        if atnums.len() != atgrids.len() {
            return Err(GridError::LengthMismatch {
                what: "atom grids per atomic number",
                expected: atnums.len(),
                actual: atgrids.len(),
            });
        }
        let atgrids: Vec<Arc<AtomGrid>> = atgrids.into_iter().map(Into::into).collect();

        let total: usize = atgrids.iter().map(|g| g.size()).sum();
        let mut offsets = Vec::with_capacity(atgrids.len() + 1);
        let mut points = Vec::with_capacity(total);
        let mut atweights = Vec::with_capacity(total);
        offsets.push(0);
        for grid in &atgrids {
            points.extend_from_slice(grid.points());
            atweights.extend_from_slice(grid.weights());
            offsets.push(points.len());
        }
        let atcoords: Vec<Vector3<f64>> = atgrids.iter().map(|g| *g.center()).collect();

        let aim_weights = scheme.compute(&atcoords, &atnums, &points, &offsets)?;
        let weights = atweights
            .iter()
            .zip(&aim_weights)
            .map(|(w, aim)| w * aim)
            .collect();

        info!(
            "molecular grid: {} atoms, {} points, {} partition",
            atnums.len(),
            total,
            scheme.name()
        );

        let store = if store {
            AtomGridStore::Stored(atgrids)
        } else {
            AtomGridStore::Discarded
        };
        Ok(Self {
            atnums,
            atcoords,
            points,
            weights,
            aim_weights,
            atweights,
            offsets,
            store,
        })
    }

    /// Build every atom grid from a radial grid and a named accuracy level.
    pub fn from_preset(
        atnums: Vec<u32>,
        atcoords: &[Vector3<f64>],
        rgrid: impl Into<PerAtom<OneDGrid>>,
        preset: impl Into<PerAtom<Preset>>,
        scheme: &PartitionScheme,
        store: bool,
    ) -> Result<Self, GridError> {
        check_atom_count(&atnums, atcoords)?;
        let rgrids = rgrid.into().resolve(&atnums, "radial grid")?;
        let presets = preset.into().resolve(&atnums, "grid preset")?;
        let atgrids = rgrids
            .into_par_iter()
            .zip(presets.into_par_iter())
            .zip(atnums.par_iter().zip(atcoords.par_iter()))
            .map(|((rgrid, preset), (&z, &center))| {
                debug!("atom Z={} uses the {} preset", z, preset);
                AtomGrid::from_preset(rgrid, z, preset, center)
            })
            .collect::<Result<Vec<AtomGrid>, GridError>>()?;
        Self::new(atnums, atgrids, scheme, store)
    }

    /// Build every atom grid with the same angular rule on all shells, the
    /// smallest one holding at least `size` points.
    pub fn from_size(
        atnums: Vec<u32>,
        atcoords: &[Vector3<f64>],
        rgrid: impl Into<PerAtom<OneDGrid>>,
        size: impl Into<PerAtom<usize>>,
        scheme: &PartitionScheme,
        store: bool,
    ) -> Result<Self, GridError> {
        check_atom_count(&atnums, atcoords)?;
        let rgrids = rgrid.into().resolve(&atnums, "radial grid")?;
        let sizes = size.into().resolve(&atnums, "angular size")?;
        let atgrids = rgrids
            .into_par_iter()
            .zip(sizes.into_par_iter())
            .zip(atcoords.par_iter())
            .map(|((rgrid, size), &center)| AtomGrid::from_size(rgrid, size, center))
            .collect::<Result<Vec<AtomGrid>, GridError>>()?;
        Self::new(atnums, atgrids, scheme, store)
    }

    pub fn natoms(&self) -> usize {
        self.atnums.len()
    }

    pub fn atnums(&self) -> &[u32] {
        &self.atnums
    }

    pub fn atcoords(&self) -> &[Vector3<f64>] {
        &self.atcoords
    }

    /// Partition factor of every point, for the atom that owns it.
    pub fn aim_weights(&self) -> &[f64] {
        &self.aim_weights
    }

    /// Integration weights of the atom grids, before partitioning.
    pub fn atweights(&self) -> &[f64] {
        &self.atweights
    }

    /// Start of every atom's points, plus the total size.
    pub fn atom_offsets(&self) -> &[usize] {
        &self.offsets
    }

    pub fn store(&self) -> &AtomGridStore {
        &self.store
    }

    /// The grid of atom `index`: the stored atom grid, or a view over its
    /// points when the atom grids were discarded.
    pub fn get_atomic_grid(&self, index: usize) -> Result<SubGrid<'_>, GridError> {
        if index >= self.natoms() {
            return Err(GridError::IndexOutOfRange {
                what: "atom",
                index,
                len: self.natoms(),
            });
        }
        match &self.store {
            AtomGridStore::Stored(grids) => Ok(SubGrid::Stored(&grids[index])),
            AtomGridStore::Discarded => Ok(SubGrid::View(LocalGrid::from_range(
                &self.points,
                &self.atweights,
                self.offsets[index]..self.offsets[index + 1],
                self.atcoords[index],
            ))),
        }
    }
}

impl Grid for MolGrid {
    fn points(&self) -> &[Vector3<f64>] {
        &self.points
    }

    fn weights(&self) -> &[f64] {
        &self.weights
    }
}

fn check_atom_count(atnums: &[u32], atcoords: &[Vector3<f64>]) -> Result<(), GridError> {
    if atnums.len() != atcoords.len() {
        return Err(GridError::LengthMismatch {
            what: "coordinates per atomic number",
            expected: atnums.len(),
            actual: atcoords.len(),
        });
    }
    Ok(())
}
