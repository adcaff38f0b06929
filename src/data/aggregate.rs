use std::path::Path;

use crate::config::{FailurePolicy, ReadOptions};

use super::configuration::ConfigurationResolver;
use super::error::{ReadError, Result};
use super::institution::{read_file, scan_directory, Institution};
use super::model::{AggregatedDataset, SkippedFile};

/// Folds an institution's directory into material → configuration → records.
#[derive(Debug, Clone)]
pub struct Aggregator {
    resolver: ConfigurationResolver,
    options: ReadOptions,
}

impl Aggregator {
    pub fn new(resolver: ConfigurationResolver, options: ReadOptions) -> Self {
        Self { resolver, options }
    }

    /// Aggregator for the benchmark test plan.
    pub fn standard(options: ReadOptions) -> Result<Self> {
        Ok(Self::new(ConfigurationResolver::standard()?, options))
    }

    /// Read every matching file in `dir`.
    ///
    /// # Errors
    ///
    /// [`ReadError::DirectoryNotFound`] before any file is opened if `dir` is
    /// missing. Under [`FailurePolicy::Abort`] the first per-file error is
    /// returned as is; under [`FailurePolicy::Skip`] such files are logged and
    /// listed in [`AggregatedDataset::skipped`].
    pub fn read(&self, institution: Institution, dir: &Path) -> Result<AggregatedDataset> {
        if !dir.is_dir() {
            return Err(ReadError::DirectoryNotFound {
                path: dir.to_path_buf(),
            });
        }

        let files = scan_directory(institution, dir, self.options.sort_by_name)?;
        log::info!(
            "Reading {} {} files from {}",
            files.len(),
            institution,
            dir.display()
        );

        let mut dataset = AggregatedDataset::default();
        for path in &files {
            match self.read_one(institution, path, &mut dataset) {
                Ok(()) => {}
                Err(e) if e.is_per_file() && self.options.failure_policy == FailurePolicy::Skip => {
                    log::warn!("Skipping {}: {e}", path.display());
                    dataset.push_skipped(SkippedFile {
                        path: path.clone(),
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        log::info!(
            "Read {} experiments for {} materials ({} skipped)",
            dataset.len(),
            dataset.materials().len(),
            dataset.skipped().len()
        );
        Ok(dataset)
    }

    fn read_one(&self, institution: Institution, path: &Path, dataset: &mut AggregatedDataset) -> Result<()> {
        let parsed = read_file(institution, path)?;
        let label = self.resolver.resolve(institution, parsed.specimen_number)?;
        log::debug!(
            "{} -> {} / {} ({} samples)",
            path.display(),
            parsed.material,
            label,
            parsed.record.len()
        );
        dataset.insert(&parsed.material, label.clone(), parsed.record);
        Ok(())
    }
}

/// Read `dir` with the benchmark test plan and default options.
pub fn read(institution: Institution, dir: &Path) -> Result<AggregatedDataset> {
    Aggregator::standard(ReadOptions::default())?.read(institution, dir)
}

/// Like [`read`], taking the institution as a tag such as `"kit"`.
///
/// An unknown tag fails with [`ReadError::UnknownInstitution`] before the
/// directory is touched.
pub fn read_tagged(tag: &str, dir: &Path) -> Result<AggregatedDataset> {
    let institution: Institution = tag.parse()?;
    read(institution, dir)
}
