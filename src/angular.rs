//! Quadrature rules on the unit sphere.
//!
//! Atomic grids ask an [`AngularRule`] for a rule of a given algebraic
//! degree and scale it onto each radial shell. Two providers exist:
//!
//! * [`LebedevRule`]: octahedrally symmetric Lebedev–Laikov rules, the most
//!   economical choice up to degree 29.
//! * [`ProductAngularRule`]: Gauss–Legendre nodes in cos θ times equally
//!   spaced azimuths, available for any degree up to 131.
//!
//! [`DefaultAngularRule`] combines the two and is what atomic grids use
//! unless told otherwise. Every rule integrates all spherical harmonics up
//! to its degree exactly.

use crate::error::GridError;
use crate::onedgrid::gauss_legendre_nodes;
use itertools::iproduct;
use nalgebra::Vector3;
use std::f64::consts::{FRAC_1_SQRT_2, PI};

/// Unit-sphere points with weights summing to 4π.
#[derive(Clone, Debug, PartialEq)]
pub struct AngularGrid {
    degree: u32,
    points: Vec<Vector3<f64>>,
    weights: Vec<f64>,
}

impl AngularGrid {
    pub fn new(degree: u32, points: Vec<Vector3<f64>>, weights: Vec<f64>) -> Result<Self, GridError> {
        if points.len() != weights.len() {
            return Err(GridError::LengthMismatch {
                what: "angular weights",
                expected: points.len(),
                actual: weights.len(),
            });
        }
        Ok(Self {
            degree,
            points,
            weights,
        })
    }

    pub fn degree(&self) -> u32 {
        self.degree
    }

    pub fn points(&self) -> &[Vector3<f64>] {
        &self.points
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn size(&self) -> usize {
        self.points.len()
    }
}

/// Supplies unit-sphere rules by degree.
pub trait AngularRule {
    fn max_degree(&self) -> u32;

    /// Number of points of the rule for `degree`.
    fn size_for_degree(&self, degree: u32) -> Result<usize, GridError>;

    fn rule(&self, degree: u32) -> Result<AngularGrid, GridError>;

    /// Smallest degree whose rule has at least `size` points.
    fn degree_for_size(&self, size: usize) -> Result<u32, GridError> {
        for degree in 0..=self.max_degree() {
            if self.size_for_degree(degree)? >= size {
                return Ok(degree);
            }
        }
        Err(GridError::InvalidParameter {
            name: "angular size",
            requirement: "reachable by a supported degree",
            value: size as f64,
        })
    }
}

/// Gauss–Legendre × trapezoid product rule.
///
/// Degree `d` uses `d/2 + 1` polar nodes and `d + 1` azimuths.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProductAngularRule;

impl ProductAngularRule {
    pub const MAX_DEGREE: u32 = 131;

    fn check_degree(&self, degree: u32) -> Result<(), GridError> {
        if degree > Self::MAX_DEGREE {
            return Err(GridError::UnsupportedDegree {
                degree,
                max: Self::MAX_DEGREE,
            });
        }
        Ok(())
    }

    fn layout(degree: u32) -> (usize, usize) {
        (degree as usize / 2 + 1, degree as usize + 1)
    }
}

impl AngularRule for ProductAngularRule {
    fn max_degree(&self) -> u32 {
        Self::MAX_DEGREE
    }

    fn size_for_degree(&self, degree: u32) -> Result<usize, GridError> {
        self.check_degree(degree)?;
        let (n_theta, n_phi) = Self::layout(degree);
        Ok(n_theta * n_phi)
    }

    fn rule(&self, degree: u32) -> Result<AngularGrid, GridError> {
        self.check_degree(degree)?;
        let (n_theta, n_phi) = Self::layout(degree);
        let (cos_theta, theta_weights) = if n_theta == 1 {
            (vec![0.0], vec![2.0])
        } else {
            gauss_legendre_nodes(n_theta, -1.0, 1.0)
        };
        let dphi = 2.0 * PI / n_phi as f64;

        let mut points = Vec::with_capacity(n_theta * n_phi);
        let mut weights = Vec::with_capacity(n_theta * n_phi);
        for (&ct, &wt) in cos_theta.iter().zip(&theta_weights) {
            let st = (1.0 - ct * ct).max(0.0).sqrt();
            for j in 0..n_phi {
                let phi = j as f64 * dphi;
                points.push(Vector3::new(st * phi.cos(), st * phi.sin(), ct));
                weights.push(wt * dphi);
            }
        }
        AngularGrid::new(degree, points, weights)
    }
}

/// One orbit of the octahedral group. `v` is the weight of each point,
/// normalized so that a full rule sums to one.
#[derive(Clone, Copy, Debug)]
enum Orbit {
    /// (±1, 0, 0) and permutations, 6 points.
    Vertices { v: f64 },
    /// (0, ±1/√2, ±1/√2) and permutations, 12 points.
    Edges { v: f64 },
    /// (±1/√3, ±1/√3, ±1/√3), 8 points.
    Faces { v: f64 },
    /// (±a, ±a, ±c) with c = √(1 - 2a²) and permutations, 24 points.
    Diagonal { a: f64, v: f64 },
    /// (±a, ±b, 0) with b = √(1 - a²) and permutations, 24 points.
    Planar { a: f64, v: f64 },
    /// (±a, ±b, ±c) with c = √(1 - a² - b²) and permutations, 48 points.
    General { a: f64, b: f64, v: f64 },
}

const SIGNS: [f64; 2] = [1.0, -1.0];
const PERMUTATIONS: [[usize; 3]; 6] = [
    [0, 1, 2],
    [0, 2, 1],
    [1, 0, 2],
    [1, 2, 0],
    [2, 0, 1],
    [2, 1, 0],
];

fn permuted(values: [f64; 3], perm: [usize; 3]) -> Vector3<f64> {
    let mut p = Vector3::<f64>::zeros();
    for (k, &axis) in perm.iter().enumerate() {
        p[axis] = values[k];
    }
    p
}

impl Orbit {
    fn weight(&self) -> f64 {
        match *self {
            Orbit::Vertices { v }
            | Orbit::Edges { v }
            | Orbit::Faces { v }
            | Orbit::Diagonal { v, .. }
            | Orbit::Planar { v, .. }
            | Orbit::General { v, .. } => v,
        }
    }

    fn size(&self) -> usize {
        match self {
            Orbit::Vertices { .. } => 6,
            Orbit::Edges { .. } => 12,
            Orbit::Faces { .. } => 8,
            Orbit::Diagonal { .. } | Orbit::Planar { .. } => 24,
            Orbit::General { .. } => 48,
        }
    }

    fn points(&self) -> Vec<Vector3<f64>> {
        match *self {
            Orbit::Vertices { .. } => iproduct!(0..3_usize, SIGNS)
                .map(|(axis, s)| {
                    let mut p = Vector3::<f64>::zeros();
                    p[axis] = s;
                    p
                })
                .collect(),
            Orbit::Edges { .. } => iproduct!(0..3_usize, SIGNS, SIGNS)
                .map(|(zero, s1, s2)| {
                    let a = FRAC_1_SQRT_2;
                    permuted([0.0, a * s1, a * s2], [zero, (zero + 1) % 3, (zero + 2) % 3])
                })
                .collect(),
            Orbit::Faces { .. } => {
                let a = 1.0 / 3f64.sqrt();
                iproduct!(SIGNS, SIGNS, SIGNS)
                    .map(|(s0, s1, s2)| Vector3::new(a * s0, a * s1, a * s2))
                    .collect()
            }
            Orbit::Diagonal { a, .. } => {
                let c = (1.0 - 2.0 * a * a).sqrt();
                iproduct!(0..3_usize, SIGNS, SIGNS, SIGNS)
                    .map(|(odd, s0, s1, s2)| {
                        permuted([c * s0, a * s1, a * s2], [odd, (odd + 1) % 3, (odd + 2) % 3])
                    })
                    .collect()
            }
            Orbit::Planar { a, .. } => {
                let b = (1.0 - a * a).sqrt();
                iproduct!(PERMUTATIONS, SIGNS, SIGNS)
                    .map(|(perm, s0, s1)| permuted([a * s0, b * s1, 0.0], perm))
                    .collect()
            }
            Orbit::General { a, b, .. } => {
                let c = (1.0 - a * a - b * b).sqrt();
                iproduct!(PERMUTATIONS, SIGNS, SIGNS, SIGNS)
                    .map(|(perm, s0, s1, s2)| permuted([a * s0, b * s1, c * s2], perm))
                    .collect()
            }
        }
    }
}

use Orbit::{Diagonal, Edges, Faces, General, Planar, Vertices};

/// Lebedev–Laikov rules by degree.
const LEBEDEV_TABLE: &[(u32, &[Orbit])] = &[
    (3, &[Vertices { v: 0.1666666666666667 }]),
    (
        5,
        &[
            Vertices { v: 0.6666666666666667e-1 },
            Faces { v: 0.7500000000000000e-1 },
        ],
    ),
    (
        7,
        &[
            Vertices { v: 0.4761904761904762e-1 },
            Edges { v: 0.3809523809523810e-1 },
            Faces { v: 0.3214285714285714e-1 },
        ],
    ),
    (
        9,
        &[
            Vertices { v: 0.9523809523809524e-2 },
            Faces { v: 0.3214285714285714e-1 },
            Planar { a: 0.4597008433809831, v: 0.2857142857142857e-1 },
        ],
    ),
    (
        11,
        &[
            Vertices { v: 0.1269841269841270e-1 },
            Edges { v: 0.2257495590828924e-1 },
            Faces { v: 0.2109375000000000e-1 },
            Diagonal { a: 0.3015113445777636, v: 0.2017333553791887e-1 },
        ],
    ),
    (
        13,
        &[
            Vertices { v: 0.5130671797338464e-3 },
            Edges { v: 0.1660406956574204e-1 },
            Faces { v: -0.2958603896103896e-1 },
            Diagonal { a: 0.4803844614152614, v: 0.2657620708215946e-1 },
            Planar { a: 0.3207726489807764, v: 0.1652217099371571e-1 },
        ],
    ),
    (
        15,
        &[
            Vertices { v: 0.1154401154401154e-1 },
            Faces { v: 0.1194390908585628e-1 },
            Diagonal { a: 0.3696028464541502, v: 0.1111055571060340e-1 },
            Diagonal { a: 0.6943540066026664, v: 0.1187650129453714e-1 },
            Planar { a: 0.3742430390903412, v: 0.1181230374690448e-1 },
        ],
    ),
    (
        17,
        &[
            Vertices { v: 0.3828270494937162e-2 },
            Faces { v: 0.9793737512487512e-2 },
            Diagonal { a: 0.1851156353447362, v: 0.8211737283191111e-2 },
            Diagonal { a: 0.6904210483822922, v: 0.9942814891178103e-2 },
            Diagonal { a: 0.3956894730559419, v: 0.9595471336070963e-2 },
            Planar { a: 0.4783690288121502, v: 0.9694996361663028e-2 },
        ],
    ),
    (
        21,
        &[
            Vertices { v: 0.5544842902037365e-2 },
            Edges { v: 0.6071332770670752e-2 },
            Faces { v: 0.6383674773515093e-2 },
            Diagonal { a: 0.2551252621114134, v: 0.5183387587747790e-2 },
            Diagonal { a: 0.6743601460362766, v: 0.6317929009813725e-2 },
            Diagonal { a: 0.4318910696719410, v: 0.6201670006589077e-2 },
            Planar { a: 0.2613931360335988, v: 0.5477143385137348e-2 },
            General { a: 0.4990453161796037, b: 0.1446630744325115, v: 0.5968383987681156e-2 },
        ],
    ),
    (
        23,
        &[
            Vertices { v: 0.1782340447244611e-2 },
            Edges { v: 0.5716905949977102e-2 },
            Faces { v: 0.5573383178848738e-2 },
            Diagonal { a: 0.6712973442695226, v: 0.5608704082587997e-2 },
            Diagonal { a: 0.2892465627575439, v: 0.5158237711805383e-2 },
            Diagonal { a: 0.4446933178717437, v: 0.5518771467273614e-2 },
            Diagonal { a: 0.1299335447650067, v: 0.4106777028169394e-2 },
            Planar { a: 0.3457702197611283, v: 0.5051846064614808e-2 },
            General { a: 0.1590417105383530, b: 0.8360360154824589, v: 0.5530248916233094e-2 },
        ],
    ),
    (
        29,
        &[
            Vertices { v: 0.8545911725128148e-3 },
            Faces { v: 0.3599119285025571e-2 },
            Diagonal { a: 0.3515640345570105, v: 0.3449788424305883e-2 },
            Diagonal { a: 0.6566329410219612, v: 0.3604822601419882e-2 },
            Diagonal { a: 0.4729054132581005, v: 0.3576729661743367e-2 },
            Diagonal { a: 0.9618308522614784e-1, v: 0.2352101413689164e-2 },
            Diagonal { a: 0.2219645236294178, v: 0.3108953122413675e-2 },
            Diagonal { a: 0.7011766416089545, v: 0.3650045807677255e-2 },
            Planar { a: 0.2644152887060663, v: 0.2982344963171804e-2 },
            Planar { a: 0.5718955891878961, v: 0.3600820932216460e-2 },
            General { a: 0.2510034751770465, b: 0.8000727494073952, v: 0.3571540554273387e-2 },
            General { a: 0.1233548532583327, b: 0.4127724083168531, v: 0.3392312205006170e-2 },
        ],
    ),
];

/// Lebedev–Laikov rules of degree 3 to 29.
///
/// A request is served by the lowest tabulated degree at or above it, so
/// `rule(16)` and `rule(17)` both return the 110-point degree-17 rule.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LebedevRule;

impl LebedevRule {
    pub const MAX_DEGREE: u32 = 29;

    fn entry(degree: u32) -> Result<(u32, &'static [Orbit]), GridError> {
        LEBEDEV_TABLE
            .iter()
            .find(|(d, _)| *d >= degree)
            .copied()
            .ok_or(GridError::UnsupportedDegree {
                degree,
                max: Self::MAX_DEGREE,
            })
    }

    /// Tabulated degrees in ascending order.
    pub fn degrees() -> impl Iterator<Item = u32> {
        LEBEDEV_TABLE.iter().map(|(d, _)| *d)
    }
}

impl AngularRule for LebedevRule {
    fn max_degree(&self) -> u32 {
        Self::MAX_DEGREE
    }

    fn size_for_degree(&self, degree: u32) -> Result<usize, GridError> {
        let (_, orbits) = Self::entry(degree)?;
        Ok(orbits.iter().map(Orbit::size).sum())
    }

    fn rule(&self, degree: u32) -> Result<AngularGrid, GridError> {
        let (actual, orbits) = Self::entry(degree)?;
        let mut points = Vec::new();
        let mut weights = Vec::new();
        for orbit in orbits {
            let orbit_points = orbit.points();
            weights.extend(std::iter::repeat(4.0 * PI * orbit.weight()).take(orbit_points.len()));
            points.extend(orbit_points);
        }
        AngularGrid::new(actual, points, weights)
    }

    fn degree_for_size(&self, size: usize) -> Result<u32, GridError> {
        for degree in Self::degrees() {
            if self.size_for_degree(degree)? >= size {
                return Ok(degree);
            }
        }
        Err(GridError::InvalidParameter {
            name: "angular size",
            requirement: "at most 302 points for a Lebedev rule",
            value: size as f64,
        })
    }
}

/// Lebedev rules where tabulated, product rules beyond.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DefaultAngularRule;

impl AngularRule for DefaultAngularRule {
    fn max_degree(&self) -> u32 {
        ProductAngularRule::MAX_DEGREE
    }

    fn size_for_degree(&self, degree: u32) -> Result<usize, GridError> {
        if degree <= LebedevRule::MAX_DEGREE {
            LebedevRule.size_for_degree(degree)
        } else {
            ProductAngularRule.size_for_degree(degree)
        }
    }

    fn rule(&self, degree: u32) -> Result<AngularGrid, GridError> {
        if degree <= LebedevRule::MAX_DEGREE {
            LebedevRule.rule(degree)
        } else {
            ProductAngularRule.rule(degree)
        }
    }

    fn degree_for_size(&self, size: usize) -> Result<u32, GridError> {
        if let Ok(degree) = LebedevRule.degree_for_size(size) {
            return Ok(degree);
        }
        for degree in LebedevRule::MAX_DEGREE + 1..=ProductAngularRule::MAX_DEGREE {
            if ProductAngularRule.size_for_degree(degree)? >= size {
                return Ok(degree);
            }
        }
        Err(GridError::InvalidParameter {
            name: "angular size",
            requirement: "reachable by a supported degree",
            value: size as f64,
        })
    }
}
