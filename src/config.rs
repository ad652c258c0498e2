//! Configuration management for grid construction
//!
//! This module provides structures for parsing YAML configuration files
//! and command-line arguments for the `molgrid` binary.

use clap::Parser;
use molgrid::Preset;
use serde::{Deserialize, Serialize};

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "molgrid")]
#[command(about = "Molecular integration grid builder", long_about = None)]
pub struct Args {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = "demos/h2o.yaml")]
    pub config_file: String,

    /// Output file path (optional)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Angular accuracy level (overrides config file)
    #[arg(long)]
    pub preset: Option<Preset>,

    /// Becke smoothing order (overrides config file)
    #[arg(long)]
    pub becke_order: Option<u32>,

    /// Keep the atomic grids in the molecular grid
    #[arg(long)]
    pub store: bool,
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Molecular geometry
    pub geometry: Vec<AtomConfig>,

    /// Radial grid shared by all atoms
    #[serde(default)]
    pub radial: RadialConfig,

    /// Angular pruning
    #[serde(default)]
    pub angular: AngularConfig,

    /// Atom-in-molecule partitioning
    #[serde(default)]
    pub partition: PartitionConfig,

    /// Keep the atomic grids after assembly
    #[serde(default)]
    pub store: Option<bool>,
}

/// Atom configuration in the molecular geometry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtomConfig {
    /// Element symbol (e.g., "H", "O", "C")
    pub element: String,

    /// Atomic coordinates [x, y, z] in bohr
    pub coords: [f64; 3],
}

/// 1-D rules on [0, ∞), the only index domain the radial transforms accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OneDRule {
    UniformInteger,
    GaussLaguerre,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformKind {
    Identity,
    Linear,
    Exp,
    Power,
    Hyperbolic,
}

/// 1-D rule and the transform mapping it onto the radial coordinate
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RadialConfig {
    #[serde(default)]
    pub rule: Option<OneDRule>,

    #[serde(default)]
    pub npoint: Option<usize>,

    #[serde(default)]
    pub transform: Option<TransformKind>,

    /// Bounds for the linear, exponential and power transforms (bohr)
    #[serde(default)]
    pub rmin: Option<f64>,
    #[serde(default)]
    pub rmax: Option<f64>,

    /// Shape parameters of the hyperbolic transform
    #[serde(default)]
    pub a: Option<f64>,
    #[serde(default)]
    pub b: Option<f64>,
}

impl Default for RadialConfig {
    fn default() -> Self {
        RadialConfig {
            rule: Some(OneDRule::UniformInteger),
            npoint: Some(100),
            transform: Some(TransformKind::Exp),
            rmin: Some(1e-5),
            rmax: Some(20.0),
            a: None,
            b: None,
        }
    }
}

impl RadialConfig {
    /// Apply default values to any missing fields
    pub fn with_defaults(mut self) -> Self {
        let defaults = RadialConfig::default();
        if self.rule.is_none() {
            self.rule = defaults.rule;
        }
        if self.npoint.is_none() {
            self.npoint = defaults.npoint;
        }
        if self.transform.is_none() {
            self.transform = defaults.transform;
        }
        if self.rmin.is_none() {
            self.rmin = defaults.rmin;
        }
        if self.rmax.is_none() {
            self.rmax = defaults.rmax;
        }
        self
    }
}

/// Explicit pruning schedule shared by all atoms
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SectorsConfig {
    pub radius: f64,
    #[serde(default)]
    pub sectors_r: Vec<f64>,
    pub sectors_degree: Vec<u32>,
}

/// Angular grid selection; the first of `sectors`, `size`, `preset` that is
/// set wins
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AngularConfig {
    #[serde(default)]
    pub preset: Option<Preset>,

    /// Minimum number of angular points on every shell
    #[serde(default)]
    pub size: Option<usize>,

    #[serde(default)]
    pub sectors: Option<SectorsConfig>,
}

impl AngularConfig {
    pub fn with_defaults(mut self) -> Self {
        if self.preset.is_none() && self.size.is_none() && self.sectors.is_none() {
            self.preset = Some(Preset::Fine);
        }
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemeKind {
    Becke,
    Hirshfeld,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PartitionConfig {
    #[serde(default)]
    pub scheme: Option<SchemeKind>,

    /// Becke smoothing order
    #[serde(default)]
    pub order: Option<u32>,
}

impl PartitionConfig {
    pub fn with_defaults(mut self) -> Self {
        if self.scheme.is_none() {
            self.scheme = Some(SchemeKind::Becke);
        }
        if self.order.is_none() {
            self.order = Some(3);
        }
        self
    }
}

impl Config {
    /// Apply default values to any missing configuration fields
    pub fn with_defaults(mut self) -> Self {
        self.radial = self.radial.with_defaults();
        self.angular = self.angular.with_defaults();
        self.partition = self.partition.with_defaults();
        if self.store.is_none() {
            self.store = Some(false);
        }
        self
    }

    /// Command-line values take precedence over the file
    pub fn apply_args(mut self, args: &Args) -> Self {
        if let Some(preset) = args.preset {
            self.angular = AngularConfig {
                preset: Some(preset),
                size: None,
                sectors: None,
            };
        }
        if let Some(order) = args.becke_order {
            self.partition.order = Some(order);
        }
        if args.store {
            self.store = Some(true);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const H2: &str = r#"
geometry:
  - element: H
    coords: [0.0, 0.0, -0.7]
  - element: H
    coords: [0.0, 0.0, 0.7]
"#;

    #[test]
    fn test_config_defaults() {
        let config: Config = serde_yml::from_str::<Config>(H2).unwrap().with_defaults();
        assert_eq!(config.geometry.len(), 2);
        assert_eq!(config.radial, RadialConfig::default());
        assert_eq!(config.angular.preset, Some(Preset::Fine));
        assert_eq!(config.partition.scheme, Some(SchemeKind::Becke));
        assert_eq!(config.partition.order, Some(3));
        assert_eq!(config.store, Some(false));
    }

    #[test]
    fn test_config_sections() {
        let yaml = format!(
            "{}{}",
            H2,
            r#"
radial:
  rule: gauss_laguerre
  npoint: 50
  transform: identity
angular:
  sectors:
    radius: 0.5
    sectors_r: [0.5, 1.0]
    sectors_degree: [5, 11, 7]
partition:
  scheme: hirshfeld
store: true
"#
        );
        let config = serde_yml::from_str::<Config>(&yaml).unwrap().with_defaults();
        assert_eq!(config.radial.rule, Some(OneDRule::GaussLaguerre));
        assert_eq!(config.radial.npoint, Some(50));
        assert_eq!(config.radial.transform, Some(TransformKind::Identity));
        assert_eq!(config.angular.preset, None);
        assert_eq!(config.angular.sectors.unwrap().sectors_degree, vec![5, 11, 7]);
        assert_eq!(config.partition.scheme, Some(SchemeKind::Hirshfeld));
        assert_eq!(config.store, Some(true));
    }

    #[test]
    fn test_args_override_config() {
        let args = Args::parse_from(["molgrid", "--preset", "ultrafine", "--becke-order", "5"]);
        let config = serde_yml::from_str::<Config>(H2)
            .unwrap()
            .with_defaults()
            .apply_args(&args);
        assert_eq!(config.angular.preset, Some(Preset::Ultrafine));
        assert_eq!(config.partition.order, Some(5));
        assert_eq!(config.store, Some(false));
    }

    #[test]
    fn test_rejects_rules_outside_radial_domain() {
        let yaml = format!("{}radial:\n  rule: gauss_legendre\n", H2);
        assert!(serde_yml::from_str::<Config>(&yaml).is_err());
    }
}
