//! Long-format measurement table.
//!
//! Each row carries one isotopologue reading for one (sample, metabolite)
//! pair. All rows sharing a (sample, metabolite) key form one compositional
//! measurement and must be processed together; the table exposes that
//! structure as an ordered partition of row indices rather than leaning on
//! any dataframe library's grouping semantics.

use crate::error::{FluxError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// One isotopologue reading.
///
/// `measurement` is the raw instrument intensity; `None` marks an
/// isotopologue that should exist but was not detected. `measured_fraction`
/// is the closed fraction within the (sample, metabolite) group and
/// `natural_fraction` the theoretical natural-abundance baseline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MeasurementRow {
    pub sample: String,
    pub metabolite: String,
    pub isotopologue: String,
    #[serde(default)]
    pub measurement: Option<f64>,
    #[serde(default)]
    pub measured_fraction: Option<f64>,
    #[serde(default)]
    pub natural_fraction: Option<f64>,
}

/// Identifies one compositional measurement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupKey {
    pub sample: String,
    pub metabolite: String,
}

/// One group of the table: a key plus the indices of its rows, in the order
/// they appear in the table.
#[derive(Debug, Clone)]
pub struct MeasurementGroup {
    pub key: GroupKey,
    pub rows: Vec<usize>,
}

/// A table of isotopologue measurements.
#[derive(Debug, Clone, Default)]
pub struct MeasurementTable {
    rows: Vec<MeasurementRow>,
}

impl MeasurementTable {
    /// Create a table from rows.
    pub fn new(rows: Vec<MeasurementRow>) -> Self {
        Self { rows }
    }

    /// Load a table from a CSV file with a header row.
    ///
    /// Required columns: `sample`, `metabolite`, `isotopologue`. The numeric
    /// columns are optional; empty fields become `None`.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let mut reader = csv::Reader::from_reader(BufReader::new(file));
        let rows: Vec<MeasurementRow> = reader
            .deserialize()
            .collect::<std::result::Result<_, csv::Error>>()?;
        if rows.is_empty() {
            return Err(FluxError::EmptyData(
                "measurement CSV contains no data rows".to_string(),
            ));
        }
        Ok(Self { rows })
    }

    /// Write the table to a CSV file.
    pub fn to_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(BufWriter::new(file));
        for row in &self.rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Write the table with one extra numeric column appended.
    ///
    /// `values` must be row-aligned with the table. Used to persist simulated
    /// fractions next to the original rows.
    pub fn to_csv_with_column<P: AsRef<Path>>(
        &self,
        path: P,
        column_name: &str,
        values: &[f64],
    ) -> Result<()> {
        if values.len() != self.rows.len() {
            return Err(FluxError::DimensionMismatch {
                expected: self.rows.len(),
                actual: values.len(),
            });
        }
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(BufWriter::new(file));
        writer.write_record([
            "sample",
            "metabolite",
            "isotopologue",
            "measurement",
            "measured_fraction",
            "natural_fraction",
            column_name,
        ])?;
        let fmt = |v: &Option<f64>| v.map(|x| x.to_string()).unwrap_or_default();
        for (row, value) in self.rows.iter().zip(values) {
            let record = [
                row.sample.clone(),
                row.metabolite.clone(),
                row.isotopologue.clone(),
                fmt(&row.measurement),
                fmt(&row.measured_fraction),
                fmt(&row.natural_fraction),
                value.to_string(),
            ];
            writer.write_record(&record)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// All rows, in table order.
    pub fn rows(&self) -> &[MeasurementRow] {
        &self.rows
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Partition row indices by (sample, metabolite).
    ///
    /// Groups appear in first-appearance order and each group's rows keep
    /// their table order, so output built group by group stays aligned with
    /// the input rows.
    pub fn groups(&self) -> Vec<MeasurementGroup> {
        let mut positions: HashMap<(&str, &str), usize> = HashMap::new();
        let mut groups: Vec<MeasurementGroup> = Vec::new();
        for (idx, row) in self.rows.iter().enumerate() {
            let slot = positions
                .entry((row.sample.as_str(), row.metabolite.as_str()))
                .or_insert_with(|| {
                    groups.push(MeasurementGroup {
                        key: GroupKey {
                            sample: row.sample.clone(),
                            metabolite: row.metabolite.clone(),
                        },
                        rows: Vec::new(),
                    });
                    groups.len() - 1
                });
            groups[*slot].rows.push(idx);
        }
        groups
    }

    /// Extract a group's measured fractions in row order.
    ///
    /// Fails on the first row without a measured fraction; the zero policy
    /// (see [`crate::zero`]) is expected to have resolved those beforehand.
    pub fn group_fractions(&self, group: &MeasurementGroup) -> Result<Vec<f64>> {
        group
            .rows
            .iter()
            .map(|&idx| {
                let row = &self.rows[idx];
                row.measured_fraction.ok_or_else(|| FluxError::MissingValue {
                    sample: row.sample.clone(),
                    metabolite: row.metabolite.clone(),
                    isotopologue: row.isotopologue.clone(),
                })
            })
            .collect()
    }

    /// Close raw measurements into `measured_fraction`, per group.
    ///
    /// Rows with a missing measurement keep a missing fraction; present rows
    /// are divided by the group's sum of present measurements. A zero-sum
    /// group yields non-finite fractions that propagate to the caller
    /// unmasked.
    pub fn close_measurements(&mut self) {
        let groups = self.groups();
        for group in &groups {
            let total: f64 = group
                .rows
                .iter()
                .filter_map(|&idx| self.rows[idx].measurement)
                .sum();
            for &idx in &group.rows {
                self.rows[idx].measured_fraction =
                    self.rows[idx].measurement.map(|v| v / total);
            }
        }
    }

    /// Consume the table, returning its rows.
    pub fn into_rows(self) -> Vec<MeasurementRow> {
        self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn row(
        sample: &str,
        metabolite: &str,
        isotopologue: &str,
        measurement: Option<f64>,
    ) -> MeasurementRow {
        MeasurementRow {
            sample: sample.to_string(),
            metabolite: metabolite.to_string(),
            isotopologue: isotopologue.to_string(),
            measurement,
            measured_fraction: None,
            natural_fraction: None,
        }
    }

    #[test]
    fn test_groups_preserve_order() {
        let table = MeasurementTable::new(vec![
            row("s1", "ru5p", "m0", Some(10.0)),
            row("s1", "ru5p", "m1", Some(30.0)),
            row("s1", "fdp", "m0", Some(5.0)),
            row("s2", "ru5p", "m0", Some(7.0)),
            row("s1", "fdp", "m1", Some(15.0)),
        ]);
        let groups = table.groups();
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].key.metabolite, "ru5p");
        assert_eq!(groups[0].rows, vec![0, 1]);
        assert_eq!(groups[1].key.metabolite, "fdp");
        assert_eq!(groups[1].rows, vec![2, 4]);
        assert_eq!(groups[2].key.sample, "s2");
        assert_eq!(groups[2].rows, vec![3]);
    }

    #[test]
    fn test_close_measurements() {
        let mut table = MeasurementTable::new(vec![
            row("s1", "ru5p", "m0", Some(10.0)),
            row("s1", "ru5p", "m1", Some(30.0)),
            row("s1", "fdp", "m0", Some(5.0)),
        ]);
        table.close_measurements();
        assert_relative_eq!(table.rows()[0].measured_fraction.unwrap(), 0.25);
        assert_relative_eq!(table.rows()[1].measured_fraction.unwrap(), 0.75);
        assert_relative_eq!(table.rows()[2].measured_fraction.unwrap(), 1.0);
    }

    #[test]
    fn test_close_measurements_skips_missing() {
        let mut table = MeasurementTable::new(vec![
            row("s1", "fdp", "m0", Some(60.0)),
            row("s1", "fdp", "m1", None),
            row("s1", "fdp", "m2", Some(40.0)),
        ]);
        table.close_measurements();
        assert_relative_eq!(table.rows()[0].measured_fraction.unwrap(), 0.6);
        assert!(table.rows()[1].measured_fraction.is_none());
        assert_relative_eq!(table.rows()[2].measured_fraction.unwrap(), 0.4);
    }

    #[test]
    fn test_close_measurements_zero_sum_propagates() {
        let mut table = MeasurementTable::new(vec![
            row("s1", "akg", "m0", Some(0.0)),
            row("s1", "akg", "m1", Some(0.0)),
        ]);
        table.close_measurements();
        // Division by a zero group sum must surface as non-finite, not 0.
        assert!(!table.rows()[0].measured_fraction.unwrap().is_finite());
    }

    #[test]
    fn test_group_fractions_missing_value() {
        let mut table = MeasurementTable::new(vec![
            row("s1", "fdp", "m0", Some(60.0)),
            row("s1", "fdp", "m1", None),
        ]);
        table.close_measurements();
        let groups = table.groups();
        let err = table.group_fractions(&groups[0]).unwrap_err();
        assert!(matches!(err, FluxError::MissingValue { .. }));
    }
}
