//! Per-element constants used by pruning presets and partition schemes.

use crate::error::GridError;

pub const ANGSTROM_TO_BOHR: f64 = 1.0 / 0.529_177_210_903;

/// Bragg–Slater radii in Å for H..Xe. Noble gases take the values commonly
/// used in Becke partitioning codes.
const BRAGG_SLATER_ANGSTROM: [f64; 54] = [
    0.25, 1.40, // H, He
    1.45, 1.05, 0.85, 0.70, 0.65, 0.60, 0.50, 1.50, // Li..Ne
    1.80, 1.50, 1.25, 1.10, 1.00, 1.00, 1.00, 1.80, // Na..Ar
    2.20, 1.80, 1.60, 1.40, 1.35, 1.40, 1.40, 1.40, 1.35, 1.35, // K..Ni
    1.35, 1.35, 1.30, 1.25, 1.15, 1.15, 1.15, 1.90, // Cu..Kr
    2.35, 2.00, 1.80, 1.55, 1.45, 1.45, 1.35, 1.30, 1.35, 1.40, // Rb..Pd
    1.60, 1.55, 1.55, 1.45, 1.45, 1.40, 1.40, 2.10, // Ag..Xe
];

/// Highest atomic number with tabulated data.
pub const MAX_ATOMIC_NUMBER: u32 = BRAGG_SLATER_ANGSTROM.len() as u32;

/// Bragg–Slater radius in bohr.
pub fn bragg_slater_radius(atnum: u32) -> Result<f64, GridError> {
    if atnum == 0 || atnum > MAX_ATOMIC_NUMBER {
        return Err(GridError::MissingElementData {
            what: "Bragg-Slater radius",
            atnum,
        });
    }
    Ok(BRAGG_SLATER_ANGSTROM[atnum as usize - 1] * ANGSTROM_TO_BOHR)
}

/// Subshells in aufbau filling order: (n, l, capacity).
const AUFBAU: [(u32, u32, u32); 11] = [
    (1, 0, 2),
    (2, 0, 2),
    (2, 1, 6),
    (3, 0, 2),
    (3, 1, 6),
    (4, 0, 2),
    (3, 2, 10),
    (4, 1, 6),
    (5, 0, 2),
    (4, 2, 10),
    (5, 1, 6),
];

/// A Slater screening group: `(ns, np)` groups share one exponent, `d`
/// shells form their own group.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlaterShell {
    pub n: u32,
    pub is_d: bool,
    pub occupation: u32,
    /// Effective principal quantum number n*.
    pub n_eff: f64,
    /// Orbital exponent ζ = Z_eff / n*.
    pub zeta: f64,
}

fn effective_n(n: u32) -> f64 {
    match n {
        1 => 1.0,
        2 => 2.0,
        3 => 3.0,
        4 => 3.7,
        _ => 4.0,
    }
}

/// Ground-state shells of a neutral atom with exponents from Slater's rules.
pub fn slater_shells(atnum: u32) -> Result<Vec<SlaterShell>, GridError> {
    if atnum == 0 || atnum > MAX_ATOMIC_NUMBER {
        return Err(GridError::MissingElementData {
            what: "electron configuration",
            atnum,
        });
    }

    // Group occupations in screening order: 1s | 2sp | 3sp | 3d | 4sp | 4d | 5sp
    let mut groups: Vec<(u32, bool, u32)> = Vec::new();
    let mut remaining = atnum;
    for &(n, l, capacity) in AUFBAU.iter() {
        if remaining == 0 {
            break;
        }
        let occ = remaining.min(capacity);
        remaining -= occ;
        let is_d = l == 2;
        match groups.iter_mut().find(|g| g.0 == n && g.1 == is_d) {
            Some(group) => group.2 += occ,
            None => groups.push((n, is_d, occ)),
        }
    }
    groups.sort_by_key(|&(n, is_d, _)| (n, is_d));

    let z = atnum as f64;
    let shells = groups
        .iter()
        .enumerate()
        .map(|(i, &(n, is_d, occ))| {
            let same = if n == 1 { 0.30 } else { 0.35 };
            let mut shielding = (occ as f64 - 1.0) * same;
            for &(m, _, other) in &groups[..i] {
                let factor = if is_d || m + 2 <= n { 1.0 } else { 0.85 };
                shielding += factor * other as f64;
            }
            let n_eff = effective_n(n);
            SlaterShell {
                n,
                is_d,
                occupation: occ,
                n_eff,
                zeta: (z - shielding) / n_eff,
            }
        })
        .collect();
    Ok(shells)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radii() {
        assert!((bragg_slater_radius(1).unwrap() - 0.472_431_53).abs() < 1e-6);
        assert!(bragg_slater_radius(0).is_err());
        assert!(bragg_slater_radius(MAX_ATOMIC_NUMBER + 1).is_err());
    }

    #[test]
    fn test_slater_shells_occupations_sum_to_atomic_number() {
        for z in 1..=MAX_ATOMIC_NUMBER {
            let shells = slater_shells(z).unwrap();
            let total: u32 = shells.iter().map(|s| s.occupation).sum();
            assert_eq!(total, z);
            assert!(shells.iter().all(|s| s.zeta > 0.0));
        }
    }

    #[test]
    fn test_slater_rules_reference_values() {
        let h = slater_shells(1).unwrap();
        assert_eq!(h.len(), 1);
        assert!((h[0].zeta - 1.0).abs() < 1e-12);

        // Carbon 2sp: Z_eff = 6 - (3*0.35 + 2*0.85) = 3.25
        let c = slater_shells(6).unwrap();
        assert!((c[1].zeta * 2.0 - 3.25).abs() < 1e-12);

        // Iron 3d: Z_eff = 26 - (5*0.35 + 18) = 6.25
        let fe = slater_shells(26).unwrap();
        let d = fe.iter().find(|s| s.is_d).unwrap();
        assert_eq!(d.occupation, 6);
        assert!((d.zeta * 3.0 - 6.25).abs() < 1e-12);
    }
}
