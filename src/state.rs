use std::path::{Path, PathBuf};

use squeeze_bench::data::filter::{init_filter_state, visible_records, FilterState, VisibleRecord};
use squeeze_bench::{AggregatedDataset, Aggregator, ConfigurationLabel, FailurePolicy, Institution, ViewerSettings};

use crate::color::ColorMap;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until user opens a folder).
    pub dataset: Option<AggregatedDataset>,

    /// Folder the dataset was read from.
    pub folder: Option<PathBuf>,

    /// Institution whose export format is read.
    pub institution: Institution,

    /// Material / configuration selections.
    pub filters: FilterState,

    /// Colour per configuration label.
    pub color_map: Option<ColorMap>,

    pub settings: ViewerSettings,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(settings: ViewerSettings) -> Self {
        Self {
            dataset: None,
            folder: None,
            institution: settings.default_institution,
            filters: FilterState::default(),
            color_map: None,
            settings,
            status_message: None,
        }
    }

    /// Read `folder` for the current institution and make it the dataset.
    /// A failed read drops the previous dataset so nothing stale stays plotted.
    pub fn open_folder(&mut self, folder: &Path) {
        let result = Aggregator::standard(self.settings.read.clone())
            .and_then(|agg| agg.read(self.institution, folder));
        match result {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} experiments for materials {:?}",
                    dataset.len(),
                    dataset.material_names()
                );
                self.folder = Some(folder.to_path_buf());
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to read {}: {e}", folder.display());
                self.dataset = None;
                self.color_map = None;
                self.filters = FilterState::default();
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Re-read the current folder, e.g. after switching institution.
    pub fn reload(&mut self) {
        if let Some(folder) = self.folder.clone() {
            self.open_folder(&folder);
        }
    }

    /// Ingest a newly read dataset, initialise filters and colour.
    pub fn set_dataset(&mut self, dataset: AggregatedDataset) {
        self.filters = init_filter_state(&dataset);
        self.color_map = Some(ColorMap::new(dataset.labels()));
        self.status_message = match dataset.skipped().len() {
            0 => None,
            n => Some(format!("{n} file(s) skipped, see log")),
        };
        self.dataset = Some(dataset);
    }

    pub fn set_skip_bad_files(&mut self, skip: bool) {
        self.settings.read.failure_policy = if skip {
            FailurePolicy::Skip
        } else {
            FailurePolicy::Abort
        };
    }

    pub fn skip_bad_files(&self) -> bool {
        self.settings.read.failure_policy == FailurePolicy::Skip
    }

    /// Records passing the current filters.
    pub fn visible(&self) -> Vec<VisibleRecord<'_>> {
        self.dataset
            .as_ref()
            .map(|ds| visible_records(ds, &self.filters))
            .unwrap_or_default()
    }

    pub fn toggle_material(&mut self, material: &str) {
        if !self.filters.materials.remove(material) {
            self.filters.materials.insert(material.to_string());
        }
    }

    pub fn toggle_label(&mut self, label: &ConfigurationLabel) {
        if !self.filters.labels.remove(label) {
            self.filters.labels.insert(label.clone());
        }
    }

    /// Select every material and configuration.
    pub fn select_all(&mut self) {
        if let Some(ds) = &self.dataset {
            self.filters = init_filter_state(ds);
        }
    }

    /// Deselect everything.
    pub fn select_none(&mut self) {
        self.filters = FilterState::default();
    }
}
