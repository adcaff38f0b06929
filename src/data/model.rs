use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::configuration::ConfigurationLabel;

// ---------------------------------------------------------------------------
// Column – the shared vocabulary of measured quantities
// ---------------------------------------------------------------------------

/// A named numeric series that a squeeze-flow experiment can record.
///
/// Every institution populates a subset of these; the symbol is the short
/// name used by downstream plotting (`h` vs `F` and so on).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Column {
    #[serde(rename = "t")]
    Time,
    #[serde(rename = "F")]
    Force,
    #[serde(rename = "d")]
    Displacement,
    /// Molding gap, or sample thickness.
    #[serde(rename = "h")]
    Gap,
    #[serde(rename = "T")]
    Temperature,
    #[serde(rename = "v")]
    Velocity,
}

impl Column {
    /// All columns, in vocabulary order.
    pub const ALL: [Column; 6] = [
        Column::Time,
        Column::Force,
        Column::Displacement,
        Column::Gap,
        Column::Temperature,
        Column::Velocity,
    ];

    /// Short symbol used as the column name.
    pub fn symbol(self) -> &'static str {
        match self {
            Column::Time => "t",
            Column::Force => "F",
            Column::Displacement => "d",
            Column::Gap => "h",
            Column::Temperature => "T",
            Column::Velocity => "v",
        }
    }

    /// Inverse of [`Column::symbol`]. Symbols are case-sensitive (`t` is time,
    /// `T` is temperature).
    pub fn from_symbol(symbol: &str) -> Option<Column> {
        Column::ALL.into_iter().find(|c| c.symbol() == symbol)
    }

    /// Axis label with unit, for plots.
    pub fn axis_label(self) -> &'static str {
        match self {
            Column::Time => "Time in s",
            Column::Force => "Force in N",
            Column::Displacement => "Displacement in mm",
            Column::Gap => "Gap in mm",
            Column::Temperature => "Temperature in °C",
            Column::Velocity => "Velocity in mm/s",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

// ---------------------------------------------------------------------------
// ExperimentRecord – one squeeze test as a table of named series
// ---------------------------------------------------------------------------

/// Normalised time series of one experiment.
///
/// Rows are time-ordered samples; every populated column has the same
/// length. Built once by a parser and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentRecord {
    columns: BTreeMap<Column, Vec<f64>>,
    rows: usize,
    source: PathBuf,
}

impl ExperimentRecord {
    /// Assemble a record from equally long columns.
    ///
    /// Returns `None` when the columns disagree on their length.
    pub fn from_columns(source: &Path, columns: BTreeMap<Column, Vec<f64>>) -> Option<Self> {
        let rows = columns.values().next().map_or(0, Vec::len);
        if columns.values().any(|values| values.len() != rows) {
            return None;
        }
        Some(ExperimentRecord {
            columns,
            rows,
            source: source.to_path_buf(),
        })
    }

    /// Values of one column, if this record carries it.
    pub fn column(&self, column: Column) -> Option<&[f64]> {
        self.columns.get(&column).map(Vec::as_slice)
    }

    /// Values of a column looked up by its symbol (`"F"`, `"h"`, ...).
    pub fn by_name(&self, name: &str) -> Option<&[f64]> {
        Column::from_symbol(name).and_then(|c| self.column(c))
    }

    /// The populated columns, in vocabulary order.
    pub fn columns(&self) -> impl Iterator<Item = Column> + '_ {
        self.columns.keys().copied()
    }

    /// Symbols of the populated columns.
    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns().map(Column::symbol).collect()
    }

    /// Number of samples (rows).
    pub fn len(&self) -> usize {
        self.rows
    }

    /// Whether the record has no samples.
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// File this record was parsed from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Paired samples of two columns, e.g. gap against force for plotting.
    pub fn pairs(&self, x: Column, y: Column) -> Option<Vec<[f64; 2]>> {
        let xs = self.column(x)?;
        let ys = self.column(y)?;
        Some(xs.iter().zip(ys).map(|(&a, &b)| [a, b]).collect())
    }
}

// ---------------------------------------------------------------------------
// AggregatedDataset – material → configuration → experiments
// ---------------------------------------------------------------------------

/// All experiments of one configuration for one material, in read order.
#[derive(Debug, Clone)]
pub struct ConfigurationGroup {
    pub label: ConfigurationLabel,
    pub records: Vec<ExperimentRecord>,
}

/// All configurations tested for one material, in first-seen order.
#[derive(Debug, Clone)]
pub struct MaterialGroup {
    pub material: String,
    pub configurations: Vec<ConfigurationGroup>,
}

/// A file that was left out because the read ran with the skip policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// The result of reading one institution's directory.
///
/// Materials and configuration labels keep the order in which they were first
/// encountered, and each record list keeps the directory scan order.
#[derive(Debug, Clone, Default)]
pub struct AggregatedDataset {
    materials: Vec<MaterialGroup>,
    skipped: Vec<SkippedFile>,
}

impl AggregatedDataset {
    /// Append a record under `[material][label]`, creating either level on
    /// first use.
    pub fn insert(&mut self, material: &str, label: ConfigurationLabel, record: ExperimentRecord) {
        let idx = match self.materials.iter().position(|m| m.material == material) {
            Some(idx) => idx,
            None => {
                self.materials.push(MaterialGroup {
                    material: material.to_string(),
                    configurations: Vec::new(),
                });
                self.materials.len() - 1
            }
        };
        let configurations = &mut self.materials[idx].configurations;
        match configurations.iter_mut().find(|c| c.label == label) {
            Some(group) => group.records.push(record),
            None => configurations.push(ConfigurationGroup {
                label,
                records: vec![record],
            }),
        }
    }

    pub(crate) fn push_skipped(&mut self, skipped: SkippedFile) {
        self.skipped.push(skipped);
    }

    /// Material groups in first-seen order.
    pub fn materials(&self) -> &[MaterialGroup] {
        &self.materials
    }

    /// Material names in first-seen order.
    pub fn material_names(&self) -> Vec<&str> {
        self.materials.iter().map(|m| m.material.as_str()).collect()
    }

    /// Distinct configuration labels across all materials, in first-seen order.
    pub fn labels(&self) -> Vec<&ConfigurationLabel> {
        let mut labels: Vec<&ConfigurationLabel> = Vec::new();
        for group in self.materials.iter().flat_map(|m| &m.configurations) {
            if !labels.contains(&&group.label) {
                labels.push(&group.label);
            }
        }
        labels
    }

    /// Records for one `[material][label]` pair.
    pub fn get(&self, material: &str, label: &str) -> Option<&[ExperimentRecord]> {
        self.materials
            .iter()
            .find(|m| m.material == material)?
            .configurations
            .iter()
            .find(|c| c.label.as_str() == label)
            .map(|c| c.records.as_slice())
    }

    /// Walk every `(material, label, records)` triple.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigurationLabel, &[ExperimentRecord])> {
        self.materials.iter().flat_map(|m| {
            m.configurations
                .iter()
                .map(move |c| (m.material.as_str(), &c.label, c.records.as_slice()))
        })
    }

    /// Files left out under the skip policy.
    pub fn skipped(&self) -> &[SkippedFile] {
        &self.skipped
    }

    /// Total number of records.
    pub fn len(&self) -> usize {
        self.iter().map(|(_, _, records)| records.len()).sum()
    }

    /// Whether no material was read.
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(path: &str, force: Vec<f64>) -> ExperimentRecord {
        let mut columns = BTreeMap::new();
        columns.insert(Column::Time, (0..force.len()).map(|i| i as f64).collect());
        columns.insert(Column::Force, force);
        ExperimentRecord::from_columns(Path::new(path), columns).unwrap()
    }

    #[test]
    fn column_symbols_round_trip() {
        for column in Column::ALL {
            assert_eq!(Column::from_symbol(column.symbol()), Some(column));
        }
        assert_eq!(Column::from_symbol("x"), None);
        assert_ne!(Column::from_symbol("t"), Column::from_symbol("T"));
    }

    #[test]
    fn serde_uses_column_symbols() {
        for column in Column::ALL {
            let json = serde_json::to_string(&column).unwrap();
            assert_eq!(json, format!("\"{}\"", column.symbol()));
            let back: Column = serde_json::from_str(&json).unwrap();
            assert_eq!(back, column);
        }
        assert!(serde_json::from_str::<Column>("\"Force\"").is_err());
    }

    #[test]
    fn record_rejects_ragged_columns() {
        let mut columns = BTreeMap::new();
        columns.insert(Column::Time, vec![0.0, 1.0]);
        columns.insert(Column::Force, vec![5.0]);
        assert!(ExperimentRecord::from_columns(Path::new("a.txt"), columns).is_none());
    }

    #[test]
    fn record_exposes_columns_by_name() {
        let rec = record("a.txt", vec![1.0, 2.0, 3.0]);
        assert_eq!(rec.len(), 3);
        assert_eq!(rec.by_name("F"), Some(&[1.0, 2.0, 3.0][..]));
        assert_eq!(rec.by_name("h"), None);
        assert_eq!(rec.column_names(), vec!["t", "F"]);
    }

    #[test]
    fn insert_appends_and_keeps_first_seen_order() {
        let mut ds = AggregatedDataset::default();
        ds.insert("B", ConfigurationLabel::new("5mm 100x100"), record("1", vec![1.0]));
        ds.insert("A", ConfigurationLabel::new("3mm 100x100"), record("2", vec![2.0]));
        ds.insert("B", ConfigurationLabel::new("5mm 100x100"), record("3", vec![3.0]));

        assert_eq!(ds.material_names(), vec!["B", "A"]);
        let b = ds.get("B", "5mm 100x100").unwrap();
        assert_eq!(b.len(), 2);
        assert_eq!(b[0].source(), Path::new("1"));
        assert_eq!(b[1].source(), Path::new("3"));
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.labels().len(), 2);
    }
}
