use std::collections::BTreeSet;

use super::configuration::ConfigurationLabel;
use super::model::{AggregatedDataset, ExperimentRecord};

// ---------------------------------------------------------------------------
// Filter predicate: which materials and configurations are selected
// ---------------------------------------------------------------------------

/// Selected materials and configuration labels.
/// An empty set means nothing of that kind is shown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub materials: BTreeSet<String>,
    pub labels: BTreeSet<ConfigurationLabel>,
}

/// Initialise a [`FilterState`] with everything selected.
pub fn init_filter_state(dataset: &AggregatedDataset) -> FilterState {
    FilterState {
        materials: dataset
            .material_names()
            .into_iter()
            .map(str::to_string)
            .collect(),
        labels: dataset.labels().into_iter().cloned().collect(),
    }
}

/// A record that passes the filter, with where it sits in the dataset.
#[derive(Debug, Clone, Copy)]
pub struct VisibleRecord<'a> {
    pub material: &'a str,
    pub label: &'a ConfigurationLabel,
    /// Position within its `[material][label]` list.
    pub index: usize,
    pub record: &'a ExperimentRecord,
}

/// Records whose material and label are both selected, in dataset order.
pub fn visible_records<'a>(dataset: &'a AggregatedDataset, filters: &FilterState) -> Vec<VisibleRecord<'a>> {
    dataset
        .iter()
        .filter(|(material, label, _)| {
            filters.materials.contains(*material) && filters.labels.contains(*label)
        })
        .flat_map(|(material, label, records)| {
            records.iter().enumerate().map(move |(index, record)| VisibleRecord {
                material,
                label,
                index,
                record,
            })
        })
        .collect()
}
