//! Input/Output operations for grid construction
//!
//! This module handles logging setup and report printing.

mod output;

pub use output::{print_grid_report, setup_output};
