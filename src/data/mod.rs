/// Data layer: raw-file formats, naming, configuration lookup, aggregation.
///
/// Architecture:
/// ```text
///  kit-CF5050K-3.txt / ut-CF5050K-3.csv
///        │
///        ▼
///   ┌─────────────┐   ┌──────────┐
///   │ institution  │──▶│ filename │  stem → (org, material, number)
///   │  (dispatch)  │   └──────────┘
///   │              │   ┌──────────┐
///   │              │──▶│  layout  │  raw text → ExperimentRecord
///   └─────────────┘   └──────────┘
///        │
///        ▼
///   ┌───────────┐   ┌───────────────┐
///   │ aggregate  │──▶│ configuration │  number → "3mm 100x100"
///   └───────────┘   └───────────────┘
///        │
///        ▼
///   AggregatedDataset  material → label → [ExperimentRecord]
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  material/label selection → visible records
///   └──────────┘
/// ```

pub mod aggregate;
pub mod configuration;
pub mod error;
pub mod filename;
pub mod filter;
pub mod institution;
pub mod layout;
pub mod model;
