//! Molecular Grid Command-Line Interface
//!
//! Builds a molecular integration grid from a YAML configuration and reports
//! the partitioned atomic populations of the Slater promolecular density.

use clap::Parser;
use color_eyre::eyre::{eyre, Result, WrapErr};
use molgrid::{
    AtomGrid, BeckeWeights, ExpRTransform, FreeAtomDensity, Grid, HirshfeldWeights,
    HyperbolicRTransform, IdentityRTransform, LinearInfiniteRTransform, MolGrid, OneDGrid,
    PartitionScheme, PowerRTransform, RTransform, SlaterProatoms,
};
use nalgebra::Vector3;
use periodic_table_on_an_enum::Element;
use rayon::prelude::*;
use std::fs;
use tracing::info;

mod config;
mod io;

use config::{
    AngularConfig, Args, Config, OneDRule, PartitionConfig, RadialConfig, SchemeKind, TransformKind,
};
use io::{print_grid_report, setup_output};

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    setup_output(args.output.as_ref());

    info!("Reading configuration from: {}", args.config_file);
    let config_content = fs::read_to_string(&args.config_file)
        .wrap_err_with(|| format!("Unable to read configuration file: {}", args.config_file))?;

    let config: Config = serde_yml::from_str::<Config>(&config_content)
        .wrap_err("Failed to parse configuration file")?
        .with_defaults()
        .apply_args(&args);

    info!("Configuration loaded:\n{:?}", config);

    let (elements, atnums, coords) = prepare_geometry(&config)?;
    let rgrid = build_radial_grid(&config.radial)?;
    let scheme = build_partition(&config.partition)?;
    let store = config.store.unwrap_or(false);

    let grid = build_molgrid(&config.angular, atnums, &coords, rgrid, &scheme, store)?;
    let populations = promolecular_populations(&grid)?;

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    print_grid_report(&mut handle, &grid, &elements, &populations)?;
    Ok(())
}

/// Prepare element list, atomic numbers and coordinates from the configuration
fn prepare_geometry(config: &Config) -> Result<(Vec<Element>, Vec<u32>, Vec<Vector3<f64>>)> {
    info!("Preparing geometry...");
    let mut elements = Vec::new();
    let mut atnums = Vec::new();
    let mut coords = Vec::new();

    for atom_config in &config.geometry {
        let element = Element::from_symbol(&atom_config.element)
            .ok_or_else(|| eyre!("Invalid element symbol: {}", atom_config.element))?;
        let coord = Vector3::new(
            atom_config.coords[0],
            atom_config.coords[1],
            atom_config.coords[2],
        );
        info!(
            "  {} at [{:.6}, {:.6}, {:.6}]",
            element.get_symbol(),
            coord.x,
            coord.y,
            coord.z
        );
        atnums.push(element.get_atomic_number() as u32);
        elements.push(element);
        coords.push(coord);
    }
    if elements.is_empty() {
        return Err(eyre!("The configuration contains no atoms"));
    }
    Ok((elements, atnums, coords))
}

fn build_radial_grid(radial: &RadialConfig) -> Result<OneDGrid> {
    let npoint = radial.npoint.unwrap_or(100);
    let oned = match radial.rule.unwrap_or(OneDRule::UniformInteger) {
        OneDRule::UniformInteger => OneDGrid::uniform_integer(npoint)?,
        OneDRule::GaussLaguerre => OneDGrid::gauss_laguerre(npoint)?,
    };

    let rmin = radial.rmin.unwrap_or(1e-5);
    let rmax = radial.rmax.unwrap_or(20.0);
    let kind = radial.transform.unwrap_or(TransformKind::Exp);
    let rgrid = match kind {
        TransformKind::Identity => IdentityRTransform::new().transform_1d_grid(&oned)?,
        TransformKind::Linear => {
            LinearInfiniteRTransform::with_npoint(rmin, rmax, npoint)?.transform_1d_grid(&oned)?
        }
        TransformKind::Exp => ExpRTransform::with_npoint(rmin, rmax, npoint)?.transform_1d_grid(&oned)?,
        TransformKind::Power => PowerRTransform::with_npoint(rmin, rmax, npoint)?.transform_1d_grid(&oned)?,
        TransformKind::Hyperbolic => {
            let a = radial
                .a
                .ok_or_else(|| eyre!("The hyperbolic transform needs the parameter 'a'"))?;
            let b = radial
                .b
                .ok_or_else(|| eyre!("The hyperbolic transform needs the parameter 'b'"))?;
            HyperbolicRTransform::with_npoint(a, b, npoint)?.transform_1d_grid(&oned)?
        }
    };
    info!(
        "Radial grid: {} points, {:?} transform, r in [{:.3e}, {:.3e}]",
        rgrid.size(),
        kind,
        rgrid.points().first().copied().unwrap_or(0.0),
        rgrid.points().last().copied().unwrap_or(0.0)
    );
    Ok(rgrid)
}

fn build_partition(partition: &PartitionConfig) -> Result<PartitionScheme> {
    let scheme = match partition.scheme.unwrap_or(SchemeKind::Becke) {
        SchemeKind::Becke => {
            let order = partition.order.unwrap_or(BeckeWeights::DEFAULT_ORDER);
            PartitionScheme::Becke(BeckeWeights::new(order)?)
        }
        SchemeKind::Hirshfeld => PartitionScheme::Hirshfeld(HirshfeldWeights::new()),
    };
    Ok(scheme)
}

fn build_molgrid(
    angular: &AngularConfig,
    atnums: Vec<u32>,
    coords: &[Vector3<f64>],
    rgrid: OneDGrid,
    scheme: &PartitionScheme,
    store: bool,
) -> Result<MolGrid> {
    let grid = if let Some(sectors) = &angular.sectors {
        info!("Angular grid: explicit sectors {:?}", sectors);
        let atgrids = coords
            .iter()
            .map(|&center| {
                AtomGrid::from_pruned(
                    rgrid.clone(),
                    sectors.radius,
                    &sectors.sectors_r,
                    &sectors.sectors_degree,
                    center,
                )
            })
            .collect::<Result<Vec<AtomGrid>, _>>()?;
        MolGrid::new(atnums, atgrids, scheme, store)?
    } else if let Some(size) = angular.size {
        info!("Angular grid: at least {} points per shell", size);
        MolGrid::from_size(atnums, coords, rgrid, size, scheme, store)?
    } else {
        let preset = angular
            .preset
            .ok_or_else(|| eyre!("No angular grid selected"))?;
        info!("Angular grid: {} preset", preset);
        MolGrid::from_preset(atnums, coords, rgrid, preset, scheme, store)?
    };
    Ok(grid)
}

/// Partitioned populations of the sum of Slater free-atom densities
fn promolecular_populations(grid: &MolGrid) -> Result<Vec<f64>> {
    let proatoms = SlaterProatoms::new();
    let atnums = grid.atnums();
    let atcoords = grid.atcoords();
    let density = grid
        .points()
        .par_iter()
        .map(|p| {
            atnums
                .iter()
                .zip(atcoords)
                .map(|(&z, c)| proatoms.density(z, (p - c).norm()))
                .sum::<Result<f64, _>>()
        })
        .collect::<Result<Vec<f64>, _>>()?;

    let offsets = grid.atom_offsets();
    let weights = grid.weights();
    let populations = offsets
        .windows(2)
        .map(|w| (w[0]..w[1]).map(|i| weights[i] * density[i]).sum())
        .collect();
    Ok(populations)
}
