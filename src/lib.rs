//! Squeeze-flow benchmark data: reading per-institution raw exports into a
//! material → configuration → experiments structure.
//!
//! ```no_run
//! use std::path::Path;
//! use squeeze_bench::{read, Column, Institution};
//!
//! let data = read(Institution::Kit, Path::new("data/kit")).unwrap();
//! for (material, label, experiments) in data.iter() {
//!     for exp in experiments {
//!         let force = exp.column(Column::Force).unwrap_or_default();
//!         println!("{material} {label}: {} samples, max {:?}", exp.len(), force.iter().cloned().reduce(f64::max));
//!     }
//! }
//! ```

pub mod config;
pub mod data;

pub use config::{FailurePolicy, ReadOptions, ViewerSettings};
pub use data::aggregate::{read, read_tagged, Aggregator};
pub use data::configuration::{ConfigurationLabel, ConfigurationResolver, ConfigurationTable};
pub use data::error::ReadError;
pub use data::filename::{decode_filename, FilenameTriple};
pub use data::institution::Institution;
pub use data::layout::RecordParser;
pub use data::model::{AggregatedDataset, Column, ExperimentRecord, SkippedFile};
