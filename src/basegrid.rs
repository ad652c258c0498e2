//! Shared behaviour of 3-D grids and the local (index-based) grid view.

use crate::error::GridError;
use nalgebra::Vector3;
use std::ops::Range;

/// A set of 3-D points with integration weights.
pub trait Grid {
    fn points(&self) -> &[Vector3<f64>];
    fn weights(&self) -> &[f64];

    fn size(&self) -> usize {
        self.weights().len()
    }

    /// Weighted sum of `values` sampled at the grid points.
    fn integrate(&self, values: &[f64]) -> Result<f64, GridError> {
        self.integrate_product(&[values])
    }

    /// Weighted sum of the pointwise product of several sampled functions.
    fn integrate_product(&self, values: &[&[f64]]) -> Result<f64, GridError> {
        weighted_product_sum(self.weights().iter().copied(), self.size(), values)
    }

    /// Points within `radius` of `center`. An infinite radius selects the
    /// whole grid in its original order.
    fn get_localgrid(&self, center: &Vector3<f64>, radius: f64) -> Result<LocalGrid<'_>, GridError> {
        LocalGrid::within_radius(self.points(), self.weights(), *center, radius)
    }
}

pub(crate) fn weighted_product_sum(
    weights: impl Iterator<Item = f64>,
    size: usize,
    values: &[&[f64]],
) -> Result<f64, GridError> {
    if values.is_empty() {
        return Err(GridError::NoValues);
    }
    for v in values {
        if v.len() != size {
            return Err(GridError::LengthMismatch {
                what: "integrand values",
                expected: size,
                actual: v.len(),
            });
        }
    }
    Ok(weights
        .enumerate()
        .map(|(i, w)| values.iter().fold(w, |acc, v| acc * v[i]))
        .sum())
}

/// A subset of a parent grid, kept as indices into the parent's arrays.
///
/// Weights are the parent's weights, unscaled, so results from several
/// local grids can be scattered back through [`LocalGrid::indices`] and
/// superposed on the parent.
#[derive(Clone, Debug)]
pub struct LocalGrid<'a> {
    parent_points: &'a [Vector3<f64>],
    parent_weights: &'a [f64],
    indices: Vec<usize>,
    center: Vector3<f64>,
    radius: f64,
}

impl<'a> LocalGrid<'a> {
    pub(crate) fn within_radius(
        points: &'a [Vector3<f64>],
        weights: &'a [f64],
        center: Vector3<f64>,
        radius: f64,
    ) -> Result<Self, GridError> {
        if radius.is_nan() || radius < 0.0 {
            return Err(GridError::InvalidRadius(radius));
        }
        let indices: Vec<usize> = if radius.is_infinite() {
            (0..points.len()).collect()
        } else {
            let r2 = radius * radius;
            points
                .iter()
                .enumerate()
                .filter(|(_, p)| (*p - center).norm_squared() <= r2)
                .map(|(i, _)| i)
                .collect()
        };
        Ok(Self {
            parent_points: points,
            parent_weights: weights,
            indices,
            center,
            radius,
        })
    }

    /// View over a contiguous block of the parent, e.g. one atom's points.
    /// The radius is that of the smallest ball around `center` holding the
    /// block.
    pub(crate) fn from_range(
        points: &'a [Vector3<f64>],
        weights: &'a [f64],
        range: Range<usize>,
        center: Vector3<f64>,
    ) -> Self {
        let radius = points[range.clone()]
            .iter()
            .map(|p| (p - center).norm())
            .fold(0.0, f64::max);
        Self {
            parent_points: points,
            parent_weights: weights,
            indices: range.collect(),
            center,
            radius,
        }
    }

    pub fn size(&self) -> usize {
        self.indices.len()
    }

    /// Indices of the selected points in the parent grid.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn center(&self) -> &Vector3<f64> {
        &self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn point(&self, i: usize) -> &Vector3<f64> {
        &self.parent_points[self.indices[i]]
    }

    pub fn weight(&self, i: usize) -> f64 {
        self.parent_weights[self.indices[i]]
    }

    /// Copies of the selected points, in selection order.
    pub fn points(&self) -> Vec<Vector3<f64>> {
        self.indices.iter().map(|&i| self.parent_points[i]).collect()
    }

    pub fn weights(&self) -> Vec<f64> {
        self.indices.iter().map(|&i| self.parent_weights[i]).collect()
    }

    pub fn integrate(&self, values: &[f64]) -> Result<f64, GridError> {
        self.integrate_product(&[values])
    }

    pub fn integrate_product(&self, values: &[&[f64]]) -> Result<f64, GridError> {
        weighted_product_sum(
            self.indices.iter().map(|&i| self.parent_weights[i]),
            self.size(),
            values,
        )
    }
}
