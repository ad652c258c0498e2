//! Output formatting and logging utilities

use color_eyre::eyre::Result;
use molgrid::{Grid, MolGrid};
use periodic_table_on_an_enum::Element;
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::time::SystemTime as StdSystemTime;
use tracing::info;
use tracing_subscriber::{
    fmt::format::Writer, fmt::layer, fmt::time::FormatTime, layer::SubscriberExt,
    util::SubscriberInitExt, Registry,
};

/// Custom time formatter that shows only seconds
struct SecondPrecisionTimer;

impl FormatTime for SecondPrecisionTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        let now = StdSystemTime::now();
        let duration = now
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default();

        let total_seconds = duration.as_secs();
        let hours = (total_seconds / 3600) % 24;
        let minutes = (total_seconds / 60) % 60;
        let seconds = total_seconds % 60;

        write!(w, "{:02}:{:02}:{:02}", hours, minutes, seconds)
    }
}

/// Setup output logging to file or stdout
pub fn setup_output(output_path: Option<&String>) {
    match output_path {
        Some(path) => {
            if let Ok(log) = File::create(path) {
                let file_layer = layer()
                    .with_writer(log)
                    .with_timer(SecondPrecisionTimer)
                    .with_ansi(false);
                Registry::default().with(file_layer).init();
                info!("Output will be written to: {}", path);
            } else {
                eprintln!("Could not create output file: {}", path);
            }
        }
        None => {
            let stdout_layer = layer()
                .with_writer(std::io::stdout)
                .with_timer(SecondPrecisionTimer)
                .with_ansi(true);
            Registry::default().with(stdout_layer).init();
            info!("Output will be printed to stdout");
        }
    }
}

/// Print grid statistics and per-atom populations to a writer
pub fn print_grid_report<W: Write>(
    writer: &mut W,
    grid: &MolGrid,
    elements: &[Element],
    populations: &[f64],
) -> Result<()> {
    let offsets = grid.atom_offsets();
    writeln!(writer, "Molecular grid: {} points on {} atoms", grid.size(), grid.natoms())?;
    writeln!(
        writer,
        "{:>4} {:>8} {:>12} {:>12} {:>12} {:>8} {:>12}",
        "Atom", "Element", "X", "Y", "Z", "Points", "Population"
    )?;
    writeln!(writer, "{}", "-".repeat(74))?;
    for (i, ((coord, elem), pop)) in grid
        .atcoords()
        .iter()
        .zip(elements.iter())
        .zip(populations)
        .enumerate()
    {
        writeln!(
            writer,
            "{:>4} {:>8} {:>12.6} {:>12.6} {:>12.6} {:>8} {:>12.6}",
            i + 1,
            elem.get_symbol(),
            coord.x,
            coord.y,
            coord.z,
            offsets[i + 1] - offsets[i],
            pop
        )?;
    }
    let total: f64 = populations.iter().sum();
    let electrons: usize = elements.iter().map(|e| e.get_atomic_number() as usize).sum();
    writeln!(writer, "{}", "-".repeat(74))?;
    writeln!(writer, "Total population: {:.8} (expected {})", total, electrons)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use molgrid::{AtomGrid, ExpRTransform, OneDGrid, PartitionScheme, RTransform};
    use nalgebra::Vector3;

    #[test]
    fn test_print_grid_report() {
        let oned = OneDGrid::uniform_integer(20).unwrap();
        let rgrid = ExpRTransform::new(1e-3, 10.0)
            .unwrap()
            .transform_1d_grid(&oned)
            .unwrap();
        let atg = AtomGrid::from_pruned(rgrid, 1.0, &[], &[3], Vector3::zeros()).unwrap();
        let grid = MolGrid::new(vec![1], vec![atg], &PartitionScheme::default(), false).unwrap();

        let mut buffer = Vec::new();
        print_grid_report(&mut buffer, &grid, &[Element::Hydrogen], &[0.999]).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("Molecular grid: 120 points on 1 atoms"));
        assert!(text.contains("H"));
        assert!(text.contains("expected 1"));
    }
}
