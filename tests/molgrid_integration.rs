//! Integration tests for molecular grids
//!
//! Hydrogen-like 1s densities exp(-2r)/π are normalized to one electron, so
//! integrating a sum of them over a molecular grid counts the centers.

use molgrid::{
    AtomGrid, BeckeWeights, ExpRTransform, Grid, GridError, HirshfeldWeights, MolGrid, OneDGrid,
    PartitionScheme, PerAtom, Preset, RTransform, SubGrid,
};
use nalgebra::Vector3;
use std::collections::HashMap;
use std::f64::consts::PI;

fn assert_almost_equal(actual: f64, expected: f64, decimal: i32) {
    let tolerance = 1.5 * 10f64.powi(-decimal);
    assert!(
        (actual - expected).abs() < tolerance,
        "{} != {} to {} decimals",
        actual,
        expected,
        decimal
    );
}

fn assert_allclose(actual: f64, expected: f64, rtol: f64) {
    assert!(
        (actual - expected).abs() <= rtol * expected.abs(),
        "{} != {} (rtol {})",
        actual,
        expected,
        rtol
    );
}

fn exp_rgrid(npoint: usize) -> OneDGrid {
    let oned = OneDGrid::uniform_integer(npoint).unwrap();
    ExpRTransform::new(1e-5, 20.0)
        .unwrap()
        .transform_1d_grid(&oned)
        .unwrap()
}

fn degree17(center: Vector3<f64>) -> AtomGrid {
    AtomGrid::from_pruned(exp_rgrid(100), 0.5, &[], &[17], center).unwrap()
}

fn slater_1s(grid: &MolGrid, centers: &[Vector3<f64>], scale: &[f64]) -> Vec<f64> {
    grid.points()
        .iter()
        .map(|p| {
            centers
                .iter()
                .zip(scale)
                .map(|(c, s)| s * (-2.0 * (p - c).norm()).exp() / PI)
                .sum::<f64>()
        })
        .collect()
}

fn sample(points: &[Vector3<f64>], center: &Vector3<f64>, alpha: f64) -> Vec<f64> {
    points
        .iter()
        .map(|p| (-alpha * (p - center).norm()).exp())
        .collect()
}

fn becke() -> PartitionScheme {
    PartitionScheme::Becke(BeckeWeights::new(3).unwrap())
}

#[test]
fn test_integrate_hydrogen_single_1s() {
    let center = Vector3::new(0.0, 0.0, -0.5);
    let mg = MolGrid::new(vec![1], vec![degree17(center)], &becke(), false).unwrap();
    let fn0 = slater_1s(&mg, &[center], &[1.0]);
    assert_almost_equal(mg.integrate(&fn0).unwrap(), 1.0, 6);
}

#[test]
fn test_integrate_hydrogen_pair_1s() {
    let centers = [Vector3::new(0.0, 0.0, -0.5), Vector3::new(0.0, 0.0, 0.5)];
    let atgrids: Vec<AtomGrid> = centers.iter().map(|&c| degree17(c)).collect();
    let mg = MolGrid::new(vec![1, 1], atgrids, &becke(), false).unwrap();
    let fn0 = slater_1s(&mg, &centers, &[1.0, 1.0]);
    assert_almost_equal(mg.integrate(&fn0).unwrap(), 2.0, 6);
}

#[test]
fn test_integrate_hydrogen_trimer_1s() {
    let centers = [
        Vector3::new(0.0, 0.0, -0.5),
        Vector3::new(0.0, 0.0, 0.5),
        Vector3::new(0.0, 0.5, 0.0),
    ];
    let atgrids: Vec<AtomGrid> = centers.iter().map(|&c| degree17(c)).collect();
    let mg = MolGrid::new(vec![1, 1, 1], atgrids, &becke(), false).unwrap();
    let fn0 = slater_1s(&mg, &centers, &[1.0; 3]);
    assert_almost_equal(mg.integrate(&fn0).unwrap(), 3.0, 4);
}

#[test]
fn test_integrate_hydrogen_8_1s() {
    let mut centers = Vec::new();
    for x in [-0.5, 0.5] {
        for y in [-0.5, 0.5] {
            for z in [-0.5, 0.5] {
                centers.push(Vector3::new(x, y, z));
            }
        }
    }
    let atgrids: Vec<AtomGrid> = centers.iter().map(|&c| degree17(c)).collect();
    let mg = MolGrid::new(vec![1; 8], atgrids, &becke(), false).unwrap();
    let fn0 = slater_1s(&mg, &centers, &[1.0; 8]);
    assert_almost_equal(mg.integrate(&fn0).unwrap(), 8.0, 2);
}

#[test]
fn test_from_preset_accuracy_levels() {
    let centers = [Vector3::new(0.0, 0.0, -0.5), Vector3::new(0.0, 0.0, 0.5)];
    for (preset, decimal) in [
        (Preset::Coarse, 3),
        (Preset::Medium, 4),
        (Preset::Fine, 5),
        (Preset::Veryfine, 6),
        (Preset::Ultrafine, 6),
        (Preset::Insane, 6),
    ] {
        let mg = MolGrid::from_preset(vec![1, 1], &centers, exp_rgrid(70), preset, &becke(), false)
            .unwrap();
        let fn0 = slater_1s(&mg, &centers, &[1.0, 1.0]);
        assert_almost_equal(mg.integrate(&fn0).unwrap(), 2.0, decimal);
    }
}

fn h2o_like() -> (Vec<u32>, [Vector3<f64>; 3]) {
    (
        vec![1, 8, 1],
        [
            Vector3::new(0.0, 0.0, -0.5),
            Vector3::new(0.0, 0.0, 0.5),
            Vector3::new(0.0, 0.5, 0.0),
        ],
    )
}

fn assert_same_grid(stored: &SubGrid<'_>, reference: &AtomGrid) {
    assert_eq!(stored.points(), reference.points().to_vec());
    assert_eq!(stored.weights(), reference.weights().to_vec());
}

#[test]
fn test_from_preset_per_atom_settings() {
    let (atnums, centers) = h2o_like();
    let rad2 = exp_rgrid(100);
    let rad3 = exp_rgrid(130);

    let presets = PerAtom::List(vec![Preset::Fine, Preset::Veryfine, Preset::Medium]);
    let mg = MolGrid::from_preset(atnums.clone(), &centers, rad2.clone(), presets, &becke(), true)
        .unwrap();
    let fn0 = slater_1s(&mg, &centers, &[1.0; 3]);
    assert_almost_equal(mg.integrate(&fn0).unwrap(), 3.0, 3);
    for (i, preset) in [Preset::Fine, Preset::Veryfine, Preset::Medium].into_iter().enumerate() {
        let reference = AtomGrid::from_preset(rad2.clone(), atnums[i], preset, centers[i]).unwrap();
        assert_same_grid(&mg.get_atomic_grid(i).unwrap(), &reference);
    }

    let rgrids = PerAtom::ByElement(HashMap::from([(1, rad2.clone()), (8, rad3.clone())]));
    let presets = PerAtom::ByElement(HashMap::from([(1, Preset::Fine), (8, Preset::Veryfine)]));
    let mg = MolGrid::from_preset(atnums.clone(), &centers, rgrids, presets, &becke(), true).unwrap();
    let fn0 = slater_1s(&mg, &centers, &[1.0; 3]);
    assert_almost_equal(mg.integrate(&fn0).unwrap(), 3.0, 3);
    let reference = AtomGrid::from_preset(rad3, 8, Preset::Veryfine, centers[1]).unwrap();
    assert_same_grid(&mg.get_atomic_grid(1).unwrap(), &reference);
}

#[test]
fn test_from_preset_radial_grid_per_atom() {
    let (atnums, centers) = h2o_like();
    let rad1 = exp_rgrid(70);
    let rad2 = exp_rgrid(100);
    let rad3 = exp_rgrid(130);
    let presets = || PerAtom::ByElement(HashMap::from([(1, Preset::Fine), (8, Preset::Veryfine)]));
    let expected_presets = [Preset::Fine, Preset::Veryfine, Preset::Fine];

    let rgrids = PerAtom::List(vec![rad1.clone(), rad2.clone(), rad3.clone()]);
    let mg = MolGrid::from_preset(atnums.clone(), &centers, rgrids, presets(), &becke(), true)
        .unwrap();
    let fn0 = slater_1s(&mg, &centers, &[1.0; 3]);
    assert_almost_equal(mg.integrate(&fn0).unwrap(), 3.0, 3);
    for (i, rad) in [&rad1, &rad2, &rad3].into_iter().enumerate() {
        let reference =
            AtomGrid::from_preset(rad.clone(), atnums[i], expected_presets[i], centers[i]).unwrap();
        assert_same_grid(&mg.get_atomic_grid(i).unwrap(), &reference);
    }

    let rgrids = PerAtom::ByElement(HashMap::from([(1, rad1.clone()), (8, rad3.clone())]));
    let mg = MolGrid::from_preset(atnums.clone(), &centers, rgrids, presets(), &becke(), true)
        .unwrap();
    let fn0 = slater_1s(&mg, &centers, &[1.0; 3]);
    assert_almost_equal(mg.integrate(&fn0).unwrap(), 3.0, 3);
    for (i, rad) in [&rad1, &rad3, &rad1].into_iter().enumerate() {
        let reference =
            AtomGrid::from_preset(rad.clone(), atnums[i], expected_presets[i], centers[i]).unwrap();
        assert_same_grid(&mg.get_atomic_grid(i).unwrap(), &reference);
    }
}

#[test]
fn test_from_size_matches_explicit_grids() {
    let centers = [Vector3::new(0.0, 0.0, -0.5), Vector3::new(0.0, 0.0, 0.5)];
    let mg = MolGrid::from_size(vec![1, 1], &centers, exp_rgrid(100), 110_usize, &becke(), false)
        .unwrap();
    let reference = MolGrid::new(
        vec![1, 1],
        centers.iter().map(|&c| degree17(c)).collect::<Vec<_>>(),
        &becke(),
        true,
    )
    .unwrap();
    assert_eq!(mg.points(), reference.points());
    assert_eq!(mg.weights(), reference.weights());
}

#[test]
fn test_precomputed_aim_weights() {
    let centers = [Vector3::new(0.0, 0.0, -0.5), Vector3::new(0.0, 0.0, 0.5)];
    let atgrids: Vec<AtomGrid> = centers.iter().map(|&c| degree17(c)).collect();
    let ones = PartitionScheme::Precomputed(vec![1.0; 2 * 100 * 110]);
    let mg = MolGrid::new(vec![1, 1], atgrids, &ones, false).unwrap();
    let fn0 = slater_1s(&mg, &centers, &[1.0, 1.0]);
    assert_almost_equal(mg.integrate(&fn0).unwrap(), 4.0, 4);
}

#[test]
fn test_integrate_hirshfeld_weights_single_1s() {
    let center = Vector3::new(0.0, 0.0, -0.5);
    let hirshfeld = PartitionScheme::Hirshfeld(HirshfeldWeights::new());
    let mg = MolGrid::new(vec![7], vec![degree17(center)], &hirshfeld, false).unwrap();
    let fn0 = slater_1s(&mg, &[center], &[1.0]);
    assert_almost_equal(mg.integrate(&fn0).unwrap(), 1.0, 6);
}

#[test]
fn test_integrate_hirshfeld_weights_pair_1s() {
    let centers = [Vector3::new(0.0, 0.0, -0.5), Vector3::new(0.0, 0.0, 0.5)];
    let hirshfeld = PartitionScheme::Hirshfeld(HirshfeldWeights::new());
    let atgrids: Vec<AtomGrid> = centers.iter().map(|&c| degree17(c)).collect();
    let mg = MolGrid::new(vec![1, 1], atgrids, &hirshfeld, false).unwrap();
    let fn0 = slater_1s(&mg, &centers, &[1.0, 1.5]);
    assert_almost_equal(mg.integrate(&fn0).unwrap(), 2.5, 5);
}

#[test]
fn test_get_localgrid_1s() {
    let center = Vector3::zeros();
    let mg = MolGrid::new(vec![1], vec![degree17(center)], &becke(), false).unwrap();
    let values: Vec<f64> = mg.points().iter().map(|p| (-2.0 * p.norm()).exp()).collect();
    assert_allclose(mg.integrate(&values).unwrap(), PI, 1e-6);

    let local = mg.get_localgrid(&center, 12.0).unwrap();
    assert!(local.size() < mg.size());
    assert_eq!(local.size(), 96 * 110);
    let local_values: Vec<f64> = local.points().iter().map(|p| (-2.0 * p.norm()).exp()).collect();
    assert_allclose(local.integrate(&local_values).unwrap(), PI, 1e-6);
    for (k, &i) in local.indices().iter().enumerate() {
        assert_eq!(values[i], local_values[k]);
    }

    let whole = mg.get_localgrid(&center, f64::INFINITY).unwrap();
    assert_eq!(whole.size(), mg.size());
    assert_eq!(whole.points(), mg.points().to_vec());
    assert_eq!(whole.weights(), mg.weights().to_vec());
    assert_eq!(whole.indices(), (0..mg.size()).collect::<Vec<_>>().as_slice());

    let mg = MolGrid::from_size(vec![1], &[center], exp_rgrid(100), 110_usize, &becke(), true)
        .unwrap();
    let values: Vec<f64> = mg.points().iter().map(|p| (-4.0 * p.norm()).exp()).collect();
    assert_allclose(mg.integrate(&values).unwrap(), PI / 8.0, 1e-6);
    let local = mg.get_localgrid(&center, 5.0).unwrap();
    assert_eq!(local.size(), 90 * 110);
    let local_values: Vec<f64> = local.points().iter().map(|p| (-4.0 * p.norm()).exp()).collect();
    assert_allclose(local.integrate(&local_values).unwrap(), PI / 8.0, 1e-5);
    for (k, &i) in local.indices().iter().enumerate() {
        assert_eq!(values[i], local_values[k]);
    }
}

#[test]
fn test_get_localgrid_1s1s_superposition() {
    let coords = [Vector3::new(0.0, 0.0, -0.5), Vector3::new(0.0, 0.0, 0.5)];
    let mg = MolGrid::from_size(vec![1, 3], &coords, exp_rgrid(100), 110_usize, &becke(), true)
        .unwrap();
    let fn0 = sample(mg.points(), &coords[0], 4.0);
    let fn1 = sample(mg.points(), &coords[1], 8.0);
    assert_allclose(mg.integrate(&fn0).unwrap(), PI / 8.0, 1e-5);
    assert_allclose(mg.integrate(&fn1).unwrap(), PI / 64.0, 1e-5);

    let local0 = mg.get_localgrid(&coords[0], 5.0).unwrap();
    assert!(local0.size() < mg.size());
    let localfn0 = sample(&local0.points(), &coords[0], 4.0);
    assert_allclose(local0.integrate(&localfn0).unwrap(), PI / 8.0, 1e-5);

    let local1 = mg.get_localgrid(&coords[1], 2.5).unwrap();
    assert!(local1.size() < mg.size());
    let localfn1 = sample(&local1.points(), &coords[1], 8.0);
    assert_allclose(local1.integrate(&localfn1).unwrap(), PI / 64.0, 1e-6);
    for (k, &i) in local1.indices().iter().enumerate() {
        assert_eq!(fn1[i], localfn1[k]);
    }

    let mut fnsum = vec![0.0; mg.size()];
    for (k, &i) in local0.indices().iter().enumerate() {
        fnsum[i] += localfn0[k];
    }
    for (k, &i) in local1.indices().iter().enumerate() {
        fnsum[i] += localfn1[k];
    }
    assert_allclose(mg.integrate(&fnsum).unwrap(), PI * (1.0 / 8.0 + 1.0 / 64.0), 1e-5);
}

#[test]
fn test_stored_and_discarded_atomic_grids_agree() {
    let centers = [Vector3::new(0.0, 0.2, -0.5), Vector3::new(0.1, 0.0, 0.5)];
    let atgrids: Vec<AtomGrid> = centers.iter().map(|&c| degree17(c)).collect();
    let stored = MolGrid::new(vec![6, 8], atgrids.clone(), &becke(), true).unwrap();
    let discarded = MolGrid::new(vec![6, 8], atgrids.clone(), &becke(), false).unwrap();
    assert_eq!(stored.size(), 2 * 100 * 110);
    for (i, atg) in atgrids.iter().enumerate() {
        let a = stored.get_atomic_grid(i).unwrap();
        let b = discarded.get_atomic_grid(i).unwrap();
        assert!(a.as_atom_grid().is_some());
        assert!(b.as_local_grid().is_some());
        assert_eq!(a.size(), 100 * 110);
        assert_eq!(a.points(), b.points());
        assert_eq!(a.weights(), b.weights());
        assert_eq!(b.weights(), atg.weights().to_vec());
        assert_eq!(a.center(), &centers[i]);
        assert_eq!(b.center(), &centers[i]);
    }
}

#[test]
fn test_errors() {
    let atg = degree17(Vector3::zeros());
    let radii = HashMap::from([(1, 0.472_431_53)]);
    let scheme = PartitionScheme::Becke(BeckeWeights::new(3).unwrap().with_radii(radii).unwrap());
    let mg = MolGrid::new(vec![1], vec![atg.clone()], &scheme, false).unwrap();

    assert!(matches!(mg.integrate_product(&[]), Err(GridError::NoValues)));
    assert!(matches!(
        mg.integrate(&[3.0, 5.0]),
        Err(GridError::LengthMismatch { .. })
    ));
    assert!(matches!(
        mg.get_atomic_grid(3),
        Err(GridError::IndexOutOfRange { .. })
    ));
    assert!(matches!(
        mg.get_localgrid(&Vector3::zeros(), -1.0),
        Err(GridError::InvalidRadius(_))
    ));
    assert!(matches!(
        MolGrid::new(vec![1], vec![atg.clone()], &PartitionScheme::Precomputed(vec![3.0, 5.0]), false),
        Err(GridError::LengthMismatch { .. })
    ));

    let centers = [Vector3::zeros()];
    assert!(matches!(
        MolGrid::from_preset(vec![1, 1], &centers, exp_rgrid(70), Preset::Fine, &becke(), false),
        Err(GridError::LengthMismatch { .. })
    ));
    let two = [Vector3::new(0.0, 0.0, -0.5), Vector3::new(0.0, 0.0, 0.5)];
    assert!(matches!(
        MolGrid::from_preset(
            vec![1, 1],
            &two,
            PerAtom::List(vec![exp_rgrid(70)]),
            Preset::Fine,
            &becke(),
            false
        ),
        Err(GridError::LengthMismatch { .. })
    ));
    assert!(matches!(
        MolGrid::from_preset(
            vec![1, 1],
            &two,
            exp_rgrid(70),
            PerAtom::ByElement(HashMap::from([(8, Preset::Fine)])),
            &becke(),
            false
        ),
        Err(GridError::MissingElementData { .. })
    ));
}
