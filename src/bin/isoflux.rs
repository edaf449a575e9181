//! isoflux - Compositional fluxomics CLI
//!
//! Command-line interface for preparing, simulating, and calibrating
//! isotope-labelling measurement tables.

use clap::{Parser, Subcommand, ValueEnum};
use isoflux::calibrate::{residuals, summarize};
use isoflux::data::MeasurementTable;
use isoflux::error::Result;
use isoflux::simulate::{simulate_table, SimulationConfig};
use isoflux::transform::Transformation;
use isoflux::zero::{apply_zero_policy, ZeroPolicy};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;

/// CLI-friendly zero policy enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliZeroPolicy {
    /// Any missing or non-positive measurement is an error
    Fail,
    /// Drop affected rows and degenerate groups, re-close the rest
    Drop,
    /// Add a pseudocount to every measurement (see --pseudocount)
    Pseudocount,
}

impl CliZeroPolicy {
    fn into_policy(self, pseudocount: f64) -> ZeroPolicy {
        match self {
            CliZeroPolicy::Fail => ZeroPolicy::Fail,
            CliZeroPolicy::Drop => ZeroPolicy::Drop,
            CliZeroPolicy::Pseudocount => ZeroPolicy::Pseudocount(pseudocount),
        }
    }
}

/// Compositional analysis of isotope-labelling measurements
#[derive(Parser)]
#[command(name = "isoflux")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate synthetic fractions by noise injection in transform space
    Simulate {
        /// Path to measurements CSV
        #[arg(short, long)]
        input: PathBuf,

        /// Output path for the table with a sim_fraction column
        #[arg(short, long)]
        output: PathBuf,

        /// Path to a simulation configuration YAML (overrides the flags below)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Transformation: additive, centered, or isometric
        #[arg(short, long, default_value = "centered")]
        transformation: String,

        /// Noise standard deviation on the transformed scale
        #[arg(short, long, default_value = "0.1")]
        error_sd: f64,

        /// Random seed
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Zero/missing-value policy applied before simulating
        #[arg(long, value_enum, default_value = "fail")]
        zero_policy: CliZeroPolicy,

        /// Pseudocount value (used with --zero-policy pseudocount)
        #[arg(long, default_value = "0.5")]
        pseudocount: f64,
    },

    /// Compute calibration residuals against natural fractions
    Residuals {
        /// Path to measurements CSV (needs measurement and natural_fraction)
        #[arg(short, long)]
        input: PathBuf,

        /// Output path for the residuals CSV
        #[arg(short, long)]
        output: PathBuf,

        /// Transformation: additive, centered, or isometric
        #[arg(short, long, default_value = "isometric")]
        transformation: String,

        /// Zero/missing-value policy applied before transforming
        #[arg(long, value_enum, default_value = "drop")]
        zero_policy: CliZeroPolicy,

        /// Pseudocount value (used with --zero-policy pseudocount)
        #[arg(long, default_value = "0.5")]
        pseudocount: f64,
    },

    /// Generate an example simulation configuration
    Example {
        /// Output path for the example YAML
        #[arg(short, long, default_value = "simulation.yaml")]
        output: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Simulate {
            input,
            output,
            config,
            transformation,
            error_sd,
            seed,
            zero_policy,
            pseudocount,
        } => cmd_simulate(
            &input,
            &output,
            config.as_ref(),
            &transformation,
            error_sd,
            seed,
            zero_policy.into_policy(pseudocount),
        ),

        Commands::Residuals {
            input,
            output,
            transformation,
            zero_policy,
            pseudocount,
        } => cmd_residuals(
            &input,
            &output,
            &transformation,
            zero_policy.into_policy(pseudocount),
        ),

        Commands::Example { output } => cmd_example(&output),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_simulate(
    input: &PathBuf,
    output: &PathBuf,
    config_path: Option<&PathBuf>,
    transformation: &str,
    error_sd: f64,
    seed: u64,
    zero_policy: ZeroPolicy,
) -> Result<()> {
    let config = match config_path {
        Some(path) => {
            eprintln!("Loading simulation configuration from {:?}...", path);
            SimulationConfig::from_yaml(&std::fs::read_to_string(path)?)?
        }
        None => SimulationConfig::new(transformation, error_sd)?,
    };

    eprintln!("Loading measurements from {:?}...", input);
    let table = MeasurementTable::from_csv(input)?;
    let table = apply_zero_policy(table, zero_policy)?;
    let n_groups = table.groups().len();
    eprintln!(
        "  {} rows, {} measurement groups",
        table.n_rows(),
        n_groups
    );

    eprintln!(
        "Simulating with {} transform, error_sd = {}...",
        config.transformation, config.error_sd
    );
    let mut rng = StdRng::seed_from_u64(seed);
    let simulated = simulate_table(&table, &config, &mut rng)?;

    eprintln!("Writing results to {:?}...", output);
    table.to_csv_with_column(output, "sim_fraction", &simulated)?;
    eprintln!("Done! {} simulated fractions", simulated.len());
    Ok(())
}

fn cmd_residuals(
    input: &PathBuf,
    output: &PathBuf,
    transformation: &str,
    zero_policy: ZeroPolicy,
) -> Result<()> {
    let transformation: Transformation = transformation.parse()?;

    eprintln!("Loading measurements from {:?}...", input);
    let table = MeasurementTable::from_csv(input)?;
    let table = apply_zero_policy(table, zero_policy)?;
    eprintln!(
        "  {} rows, {} measurement groups",
        table.n_rows(),
        table.groups().len()
    );

    eprintln!("Computing {} residuals...", transformation);
    let rows = residuals(&table, transformation)?;

    eprintln!("Writing residuals to {:?}...", output);
    let mut writer = csv::Writer::from_path(output)?;
    for row in &rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    let summary = summarize(&rows);
    eprintln!("Done! {} residuals", summary.n);
    eprintln!("  mean:    {:.4}", summary.mean);
    eprintln!("  sd:      {:.4}", summary.sd);
    eprintln!("  max |r|: {:.4}", summary.max_abs);
    Ok(())
}

fn cmd_example(output: &PathBuf) -> Result<()> {
    let config = SimulationConfig {
        transformation: Transformation::Centered,
        error_sd: 0.1,
    };
    std::fs::write(output, config.to_yaml()?)?;
    eprintln!("Wrote example configuration to {:?}", output);
    Ok(())
}
