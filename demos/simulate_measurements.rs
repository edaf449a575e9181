//! Basic example demonstrating the compositional workflow.
//!
//! This example shows how to:
//! 1. Build a small measurement table
//! 2. Close raw intensities into fractions
//! 3. Simulate synthetic fractions with each transform
//! 4. Compute calibration residuals

use isoflux::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> Result<()> {
    println!("=== isoflux example ===\n");

    let table = create_example_table();
    let table = apply_zero_policy(table, ZeroPolicy::Fail)?;

    println!("Table:");
    println!("  Rows:   {}", table.n_rows());
    println!("  Groups: {}", table.groups().len());
    println!();

    println!("=== Closed fractions ===\n");
    for row in table.rows() {
        println!(
            "  {} {} {}: {:.4}",
            row.sample,
            row.metabolite,
            row.isotopologue,
            row.measured_fraction.unwrap()
        );
    }
    println!();

    println!("=== Simulation ===\n");
    let mut rng = StdRng::seed_from_u64(42);
    for name in ["additive", "centered", "isometric"] {
        let config = SimulationConfig::new(name, 0.1)?;
        let simulated = simulate_table(&table, &config, &mut rng)?;
        println!("{} (error_sd = 0.1):", name);
        for (row, sim) in table.rows().iter().zip(&simulated) {
            println!("  {} {}: {:.4}", row.metabolite, row.isotopologue, sim);
        }
        println!();
    }

    println!("=== Calibration residuals (isometric) ===\n");
    let rows = residuals(&table, Transformation::Isometric)?;
    for r in &rows {
        println!(
            "  {} {} [{}]: residual {:+.4} (total {:.0})",
            r.sample, r.metabolite, r.ratio, r.residual, r.total_measurement
        );
    }
    let summary = summarize(&rows);
    println!(
        "\n  n = {}, mean = {:+.4}, sd = {:.4}, max |r| = {:.4}",
        summary.n, summary.mean, summary.sd, summary.max_abs
    );

    Ok(())
}

fn create_example_table() -> MeasurementTable {
    let row = |metabolite: &str, isotopologue: &str, measurement: f64, natural: f64| {
        MeasurementRow {
            sample: "QC1".to_string(),
            metabolite: metabolite.to_string(),
            isotopologue: isotopologue.to_string(),
            measurement: Some(measurement),
            measured_fraction: None,
            natural_fraction: Some(natural),
        }
    };
    MeasurementTable::new(vec![
        row("ru5p", "m0", 134443.22, 0.944),
        row("ru5p", "m1", 7651.59, 0.056),
        row("fdp", "m0", 80000.0, 0.88),
        row("fdp", "m1", 15000.0, 0.10),
        row("fdp", "m2", 2000.0, 0.02),
    ])
}
