//! Integration tests for the calibration and simulation pipeline.

use isoflux::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::Write;
use tempfile::NamedTempFile;

/// A small calibration export: two ru5p isotopologues that agree with the
/// textbook, a three-part fdp measurement with one undetected isotopologue,
/// and a second sample.
fn write_calibration_csv() -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    writeln!(
        file,
        "sample,metabolite,isotopologue,measurement,measured_fraction,natural_fraction"
    )
    .unwrap();
    let rows = [
        "HEK_Wt_QC1_1x_split2_inj1,ru5p,m0,134443.22,,0.944",
        "HEK_Wt_QC1_1x_split2_inj1,ru5p,m1,7651.59,,0.056",
        "HEK_Wt_QC1_1x_split1_inj1,fdp,m0,80000.0,,0.90",
        "HEK_Wt_QC1_1x_split1_inj1,fdp,m1,15000.0,,0.08",
        "HEK_Wt_QC1_1x_split1_inj1,fdp,m2,,,0.02",
        "HEK_Wt_QC2_1x_split1_inj1,fdp,m0,70000.0,,0.90",
        "HEK_Wt_QC2_1x_split1_inj1,fdp,m1,16000.0,,0.08",
        "HEK_Wt_QC2_1x_split1_inj1,fdp,m2,2000.0,,0.02",
    ];
    for row in rows {
        writeln!(file, "{}", row).unwrap();
    }
    file.flush().unwrap();
    file
}

#[test]
fn test_load_drop_and_close() {
    let file = write_calibration_csv();
    let table = MeasurementTable::from_csv(file.path()).unwrap();
    assert_eq!(table.n_rows(), 8);

    let table = apply_zero_policy(table, ZeroPolicy::Drop).unwrap();
    // The undetected fdp m2 row is gone, nothing else.
    assert_eq!(table.n_rows(), 7);

    // Every surviving group is closed.
    for group in table.groups() {
        let total: f64 = table
            .group_fractions(&group)
            .unwrap()
            .iter()
            .sum();
        assert!((total - 1.0).abs() < 1e-12);
    }
}

#[test]
fn test_fail_policy_rejects_incomplete_export() {
    let file = write_calibration_csv();
    let table = MeasurementTable::from_csv(file.path()).unwrap();
    let err = apply_zero_policy(table, ZeroPolicy::Fail).unwrap_err();
    assert!(matches!(err, FluxError::MissingValue { .. }));
}

#[test]
fn test_simulation_round_trip_through_csv() {
    let file = write_calibration_csv();
    let table = MeasurementTable::from_csv(file.path()).unwrap();
    let table = apply_zero_policy(table, ZeroPolicy::Drop).unwrap();

    // Zero noise: the simulated column reproduces the closed fractions.
    let config = SimulationConfig::new("isometric", 0.0).unwrap();
    let mut rng = StdRng::seed_from_u64(42);
    let simulated = simulate_table(&table, &config, &mut rng).unwrap();
    for (row, sim) in table.rows().iter().zip(&simulated) {
        assert!((row.measured_fraction.unwrap() - sim).abs() < 1e-12);
    }

    // The augmented table survives a CSV round trip.
    let out = NamedTempFile::new().unwrap();
    table
        .to_csv_with_column(out.path(), "sim_fraction", &simulated)
        .unwrap();
    let text = std::fs::read_to_string(out.path()).unwrap();
    let mut lines = text.lines();
    assert!(lines.next().unwrap().ends_with("sim_fraction"));
    assert_eq!(lines.count(), table.n_rows());
}

#[test]
fn test_simulation_with_noise_stays_compositional() {
    let file = write_calibration_csv();
    let table = MeasurementTable::from_csv(file.path()).unwrap();
    let table = apply_zero_policy(table, ZeroPolicy::Drop).unwrap();

    for name in ["additive", "centered", "isometric"] {
        let config = SimulationConfig::new(name, 0.5).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let simulated = simulate_table(&table, &config, &mut rng).unwrap();
        for group in table.groups() {
            let total: f64 = group.rows.iter().map(|&idx| simulated[idx]).sum();
            assert!(
                (total - 1.0).abs() < 1e-12,
                "{} simulation broke closure: {}",
                name,
                total
            );
        }
    }
}

#[test]
fn test_calibration_residuals_end_to_end() {
    let file = write_calibration_csv();
    let table = MeasurementTable::from_csv(file.path()).unwrap();
    let table = apply_zero_policy(table, ZeroPolicy::Drop).unwrap();

    let rows = residuals(&table, Transformation::Centered).unwrap();
    // 2 ru5p coordinates + 2 fdp (after drop) + 3 fdp in the second sample.
    assert_eq!(rows.len(), 7);

    // The ru5p measurement matches the textbook narrative: 0.946/0.054
    // against 0.944/0.056 leaves a near-zero residual.
    let ru5p: Vec<_> = rows.iter().filter(|r| r.metabolite == "ru5p").collect();
    assert_eq!(ru5p.len(), 2);
    for r in ru5p {
        assert!(
            r.residual.abs() < 0.05,
            "ru5p residual too large: {}",
            r.residual
        );
    }

    let summary = summarize(&rows);
    assert_eq!(summary.n, 7);
    assert!(summary.max_abs < 1.0);
}

#[test]
fn test_unknown_transformation_is_rejected_before_data() {
    let err = SimulationConfig::new("xyz", 0.1).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("'xyz'"));
    assert!(message.contains("additive"));
    assert!(message.contains("centered"));
    assert!(message.contains("isometric"));
}
