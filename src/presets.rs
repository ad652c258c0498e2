//! Named accuracy levels and the tables that turn them into pruning
//! schedules.

use crate::elements::bragg_slater_radius;
use crate::error::GridError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Accuracy level of a pruned atomic grid, from cheapest to most accurate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Coarse,
    Medium,
    Fine,
    Veryfine,
    Ultrafine,
    Insane,
}

impl Preset {
    pub const ALL: [Preset; 6] = [
        Preset::Coarse,
        Preset::Medium,
        Preset::Fine,
        Preset::Veryfine,
        Preset::Ultrafine,
        Preset::Insane,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Coarse => "coarse",
            Preset::Medium => "medium",
            Preset::Fine => "fine",
            Preset::Veryfine => "veryfine",
            Preset::Ultrafine => "ultrafine",
            Preset::Insane => "insane",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Preset {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|p| p.as_str() == s.to_ascii_lowercase())
            .ok_or_else(|| GridError::UnknownPreset(s.to_string()))
    }
}

/// Sector schedule for one atom: shell radii up to `sectors_r[k] * radius`
/// use `sectors_degree[k]`, shells beyond the last threshold use the last
/// degree.
#[derive(Clone, Debug, PartialEq)]
pub struct PruningSchedule {
    pub radius: f64,
    pub sectors_r: Vec<f64>,
    pub sectors_degree: Vec<u32>,
}

/// Resolves an element and accuracy level into a pruning schedule.
pub trait PresetTable {
    fn schedule(&self, atnum: u32, preset: Preset) -> Result<PruningSchedule, GridError>;
}

/// Element-independent sector layout scaled by the Bragg–Slater radius.
///
/// Low degrees near the nucleus where the density is nearly spherical, the
/// highest degree in the bonding region, tapering off in the tail.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultPresets;

impl DefaultPresets {
    fn layout(preset: Preset) -> (&'static [f64], &'static [u32]) {
        match preset {
            Preset::Coarse => (&[0.3, 1.0, 3.0], &[5, 11, 15, 11]),
            Preset::Medium => (&[0.3, 1.0, 3.0], &[7, 15, 21, 13]),
            Preset::Fine => (&[0.25, 0.75, 2.5, 5.0], &[9, 17, 25, 21, 15]),
            Preset::Veryfine => (&[0.25, 0.75, 2.5, 5.0], &[11, 21, 31, 25, 19]),
            Preset::Ultrafine => (&[0.2, 0.6, 2.0, 5.0], &[15, 27, 41, 35, 25]),
            Preset::Insane => (&[0.2, 0.6, 2.0, 5.0], &[21, 35, 53, 47, 35]),
        }
    }
}

impl PresetTable for DefaultPresets {
    fn schedule(&self, atnum: u32, preset: Preset) -> Result<PruningSchedule, GridError> {
        let radius = bragg_slater_radius(atnum)?;
        let (sectors_r, sectors_degree) = Self::layout(preset);
        Ok(PruningSchedule {
            radius,
            sectors_r: sectors_r.to_vec(),
            sectors_degree: sectors_degree.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_presets() {
        assert_eq!("fine".parse::<Preset>().unwrap(), Preset::Fine);
        assert_eq!("VeryFine".parse::<Preset>().unwrap(), Preset::Veryfine);
        assert!(matches!(
            "extreme".parse::<Preset>(),
            Err(GridError::UnknownPreset(_))
        ));
        for preset in Preset::ALL {
            assert_eq!(preset.to_string().parse::<Preset>().unwrap(), preset);
        }
    }

    #[test]
    fn test_default_schedules_are_well_formed() {
        for preset in Preset::ALL {
            let schedule = DefaultPresets.schedule(8, preset).unwrap();
            assert_eq!(schedule.sectors_degree.len(), schedule.sectors_r.len() + 1);
            assert!(schedule.sectors_r.windows(2).all(|w| w[0] < w[1]));
            assert!(schedule.radius > 0.0);
        }
        assert!(DefaultPresets.schedule(0, Preset::Fine).is_err());
    }
}
