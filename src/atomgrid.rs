//! Atom-centered grids: a radial grid combined with a pruned angular
//! schedule.
//!
//! Every radial shell `r_i` receives an angular rule whose degree comes from
//! the pruning schedule. The rule is scaled onto the sphere of radius `r_i`
//! around the center, and each angular weight is multiplied by the shell's
//! radial weight times `r_i²`:
//!
//!   w(i, j) = w_rad(i) · r_i² · w_ang(j)
//!
//! so that `Σ w f` approximates the 3-D integral of `f`.


use crate::angular::{AngularGrid, AngularRule, DefaultAngularRule};
use crate::basegrid::{Grid, LocalGrid};
use crate::error::GridError;
use crate::onedgrid::OneDGrid;
use crate::presets::{DefaultPresets, Preset, PresetTable};
use itertools::Itertools;
use nalgebra::{Rotation3, Vector3};
use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Clone, Debug)]
pub struct AtomGrid {
    rgrid: OneDGrid,
    center: Vector3<f64>,
    degrees: Vec<u32>,
    shell_offsets: Vec<usize>,
    points: Vec<Vector3<f64>>,
    weights: Vec<f64>,
}

impl AtomGrid {
    /// Build from an explicit angular degree per radial shell.
    pub fn new(rgrid: OneDGrid, degrees: Vec<u32>, center: Vector3<f64>) -> Result<Self, GridError> {
        Self::with_rule(&DefaultAngularRule, rgrid, degrees, center)
    }

    pub fn with_rule<R: AngularRule + Sync>(
        rule: &R,
        rgrid: OneDGrid,
        degrees: Vec<u32>,
        center: Vector3<f64>,
    ) -> Result<Self, GridError> {
        if degrees.len() != rgrid.size() {
            return Err(GridError::LengthMismatch {
                what: "angular degrees per shell",
                expected: rgrid.size(),
                actual: degrees.len(),
            });
        }

        let mut rules: BTreeMap<u32, AngularGrid> = BTreeMap::new();
        for &degree in &degrees {
            if !rules.contains_key(&degree) {
                rules.insert(degree, rule.rule(degree)?);
            }
        }

        let mut shell_offsets = Vec::with_capacity(degrees.len() + 1);
        shell_offsets.push(0);
        for degree in &degrees {
            let last = shell_offsets[shell_offsets.len() - 1];
            shell_offsets.push(last + rules[degree].size());
        }

        let shells: Vec<(Vec<Vector3<f64>>, Vec<f64>)> = rgrid
            .points()
            .par_iter()
            .zip(rgrid.weights().par_iter())
            .zip(degrees.par_iter())
            .map(|((&r, &w_rad), degree)| {
                let ang = &rules[degree];
                let shell_weight = w_rad * r * r;
                let points = ang.points().iter().map(|u| center + u * r).collect();
                let weights = ang.weights().iter().map(|w| w * shell_weight).collect();
                (points, weights)
            })
            .collect();

        // Record the degree each shell actually received.
        let degrees: Vec<u32> = degrees.iter().map(|d| rules[d].degree()).collect();
        let total = shell_offsets[degrees.len()];
        let mut points = Vec::with_capacity(total);
        let mut weights = Vec::with_capacity(total);
        for (p, w) in shells {
            points.extend(p);
            weights.extend(w);
        }
        debug!(
            "built atom grid with {} shells and {} points at [{:.4}, {:.4}, {:.4}]",
            degrees.len(),
            total,
            center.x,
            center.y,
            center.z
        );

        Ok(Self {
            rgrid,
            center,
            degrees,
            shell_offsets,
            points,
            weights,
        })
    }

    /// Build from a sector schedule.
    ///
    /// Shell `r_i` takes `sectors_degree[k]` where `k` counts the thresholds
    /// `sectors_r * radius` lying strictly below `r_i`; `sectors_degree`
    /// therefore has one more entry than `sectors_r`.
    pub fn from_pruned(
        rgrid: OneDGrid,
        radius: f64,
        sectors_r: &[f64],
        sectors_degree: &[u32],
        center: Vector3<f64>,
    ) -> Result<Self, GridError> {
        Self::from_pruned_with(&DefaultAngularRule, rgrid, radius, sectors_r, sectors_degree, center)
    }

    pub fn from_pruned_with<R: AngularRule + Sync>(
        rule: &R,
        rgrid: OneDGrid,
        radius: f64,
        sectors_r: &[f64],
        sectors_degree: &[u32],
        center: Vector3<f64>,
    ) -> Result<Self, GridError> {
        let degrees = degrees_from_sectors(rgrid.points(), radius, sectors_r, sectors_degree)?;
        Self::with_rule(rule, rgrid, degrees, center)
    }

    /// Same angular rule on every shell, the smallest one with at least
    /// `size` points.
    pub fn from_size(rgrid: OneDGrid, size: usize, center: Vector3<f64>) -> Result<Self, GridError> {
        let degree = DefaultAngularRule.degree_for_size(size)?;
        let degrees = vec![degree; rgrid.size()];
        Self::new(rgrid, degrees, center)
    }

    /// Pruned grid for element `atnum` at the given accuracy level.
    pub fn from_preset(
        rgrid: OneDGrid,
        atnum: u32,
        preset: Preset,
        center: Vector3<f64>,
    ) -> Result<Self, GridError> {
        Self::from_preset_with(&DefaultPresets, &DefaultAngularRule, rgrid, atnum, preset, center)
    }

    pub fn from_preset_with<T: PresetTable, R: AngularRule + Sync>(
        table: &T,
        rule: &R,
        rgrid: OneDGrid,
        atnum: u32,
        preset: Preset,
        center: Vector3<f64>,
    ) -> Result<Self, GridError> {
        let schedule = table.schedule(atnum, preset)?;
        Self::from_pruned_with(
            rule,
            rgrid,
            schedule.radius,
            &schedule.sectors_r,
            &schedule.sectors_degree,
            center,
        )
    }

    pub fn center(&self) -> &Vector3<f64> {
        &self.center
    }

    pub fn rgrid(&self) -> &OneDGrid {
        &self.rgrid
    }

    pub fn n_shells(&self) -> usize {
        self.degrees.len()
    }

    /// Angular degree used on each radial shell.
    pub fn degrees(&self) -> &[u32] {
        &self.degrees
    }

    pub fn points_per_shell(&self) -> Vec<usize> {
        self.shell_offsets.windows(2).map(|w| w[1] - w[0]).collect()
    }

    /// Offsets of each shell in the point array; `n_shells() + 1` entries.
    pub fn shell_offsets(&self) -> &[usize] {
        &self.shell_offsets
    }

    /// The points of one radial shell as a view into this grid.
    pub fn get_shell_grid(&self, shell: usize) -> Result<LocalGrid<'_>, GridError> {
        if shell >= self.n_shells() {
            return Err(GridError::IndexOutOfRange {
                what: "radial shell",
                index: shell,
                len: self.n_shells(),
            });
        }
        let range = self.shell_offsets[shell]..self.shell_offsets[shell + 1];
        Ok(LocalGrid::from_range(&self.points, &self.weights, range, self.center))
    }

    /// Same grid translated to `center`; weights are untouched.
    pub fn recentered(&self, center: Vector3<f64>) -> Self {
        let shift = center - self.center;
        Self {
            points: self.points.iter().map(|p| p + shift).collect(),
            center,
            ..self.clone()
        }
    }

    /// Same grid with every radius multiplied by `factor`.
    ///
    /// Weights pick up `factor³` so the grid still integrates over the
    /// stretched volume.
    pub fn scaled(&self, factor: f64) -> Result<Self, GridError> {
        if !(factor.is_finite() && factor > 0.0) {
            return Err(GridError::InvalidParameter {
                name: "scale factor",
                requirement: "finite and strictly positive",
                value: factor,
            });
        }
        let (lo, hi) = self.rgrid.domain();
        let rgrid = OneDGrid::new(
            self.rgrid.points().iter().map(|r| r * factor).collect(),
            self.rgrid.weights().iter().map(|w| w * factor).collect(),
            (lo * factor, hi * factor),
        )?;
        let volume = factor.powi(3);
        Ok(Self {
            rgrid,
            points: self
                .points
                .iter()
                .map(|p| self.center + (p - self.center) * factor)
                .collect(),
            weights: self.weights.iter().map(|w| w * volume).collect(),
            ..self.clone()
        })
    }

    /// Same grid rotated about its center; weights are untouched.
    pub fn rotated(&self, rotation: &Rotation3<f64>) -> Self {
        Self {
            points: self
                .points
                .iter()
                .map(|p| self.center + rotation * (p - self.center))
                .collect(),
            ..self.clone()
        }
    }
}

impl Grid for AtomGrid {
    fn points(&self) -> &[Vector3<f64>] {
        &self.points
    }

    fn weights(&self) -> &[f64] {
        &self.weights
    }
}

/// Map each radial point to the degree of the first sector it falls in.
pub fn degrees_from_sectors(
    radii: &[f64],
    radius: f64,
    sectors_r: &[f64],
    sectors_degree: &[u32],
) -> Result<Vec<u32>, GridError> {
    if sectors_degree.is_empty() {
        return Err(GridError::InvalidSectors(
            "sectors_degree must not be empty".to_string(),
        ));
    }
    if sectors_degree.len() != sectors_r.len() + 1 {
        return Err(GridError::InvalidSectors(format!(
            "expected {} degrees for {} sector radii, got {}",
            sectors_r.len() + 1,
            sectors_r.len(),
            sectors_degree.len()
        )));
    }
    if !(radius.is_finite() && radius > 0.0) {
        return Err(GridError::InvalidParameter {
            name: "atomic radius",
            requirement: "finite and strictly positive",
            value: radius,
        });
    }
    if sectors_r.iter().any(|r| !r.is_finite())
        || sectors_r.iter().tuple_windows().any(|(a, b)| a >= b)
    {
        return Err(GridError::InvalidSectors(format!(
            "sector radii must be finite and strictly ascending: {:?}",
            sectors_r
        )));
    }

    Ok(radii
        .iter()
        .map(|&r| {
            let position = sectors_r.iter().filter(|&&s| r > s * radius).count();
            sectors_degree[position]
        })
        .collect())
}
