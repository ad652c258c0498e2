//! Numerical integration grids for molecules.
//!
//! Radial transforms turn 1-D quadratures into radial grids, atom grids
//! combine them with pruned angular rules, and a molecular grid glues atom
//! grids together with Becke or Hirshfeld partition weights.

pub mod angular;
pub mod atomgrid;
pub mod basegrid;
pub mod elements;
pub mod error;
pub mod molgrid;
pub mod onedgrid;
pub mod partition;
pub mod presets;
pub mod rtransform;

pub use angular::{AngularGrid, AngularRule, DefaultAngularRule, LebedevRule, ProductAngularRule};
pub use atomgrid::AtomGrid;
pub use basegrid::{Grid, LocalGrid};
pub use error::GridError;
pub use molgrid::{AtomGridStore, MolGrid, PerAtom, SubGrid};
pub use onedgrid::OneDGrid;
pub use partition::{
    BeckeWeights, FreeAtomDensity, HirshfeldWeights, PartitionScheme, SlaterProatoms,
};
pub use presets::{DefaultPresets, Preset, PresetTable, PruningSchedule};
pub use rtransform::{
    ExpRTransform, HyperbolicRTransform, IdentityRTransform, LinearInfiniteRTransform,
    PowerRTransform, RTransform,
};
