//! Error type shared by every grid component.

/// Failures raised while building or querying integration grids.
///
/// Every variant is an input error: grid construction is deterministic, so
/// nothing here is worth retrying.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    #[error("invalid radial bounds: rmin={rmin} must be smaller than rmax={rmax}")]
    InvalidBounds { rmin: f64, rmax: f64 },
    #[error("{transform} requires a strictly positive rmin, got {rmin}")]
    NonPositiveRmin { transform: &'static str, rmin: f64 },
    #[error("parameter '{name}' must be {requirement}, got {value}")]
    InvalidParameter {
        name: &'static str,
        requirement: &'static str,
        value: f64,
    },
    #[error("transform is singular for {npoint} points: b*(npoint-1)={product} must stay below 1")]
    SingularTransform { npoint: usize, product: f64 },
    #[error(
        "1-D grid domain [{grid_lo}, {grid_hi}] is not contained in the transform domain [{lo}, {hi}]"
    )]
    IncompatibleDomain {
        grid_lo: f64,
        grid_hi: f64,
        lo: f64,
        hi: f64,
    },
    #[error("length mismatch for {what}: expected {expected}, got {actual}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("{what} must contain finite values, index {index} got {value}")]
    NonFiniteValue {
        what: &'static str,
        index: usize,
        value: f64,
    },
    #[error("invalid pruning sectors: {0}")]
    InvalidSectors(String),
    #[error("no value arrays were given to integrate")]
    NoValues,
    #[error("local grid radius must be non-negative, got {0}")]
    InvalidRadius(f64),
    #[error("angular degree {degree} is not supported (maximum {max})")]
    UnsupportedDegree { degree: u32, max: u32 },
    #[error("unknown grid preset '{0}'")]
    UnknownPreset(String),
    #[error("no {what} available for atomic number {atnum}")]
    MissingElementData { what: &'static str, atnum: u32 },
    #[error("{what} index {index} is out of range for length {len}")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },
}
