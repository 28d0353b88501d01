//! visir-report - Wind Turbine Blade Inspection Reports
//!
//! Groups paired RGB/thermal inspection images by turbine-blade identifier,
//! generates a natural-language inspection report per blade through a
//! pretrained vision-language model, and renders all reports into a single
//! HTML document.
//!
//! Pipeline: [`grouping`] partitions the input directories into per-blade
//! groups, [`prompt`] builds the fixed inspection conversation for each
//! group, [`llm`] turns the conversation into a markdown report, and
//! [`render`] plus [`orchestrator`] assemble and write the final document.

pub mod config;
pub mod grouping;
pub mod llm;
pub mod orchestrator;
pub mod prompt;
pub mod render;

pub use config::ReportConfig;
pub use grouping::{group_by_blade, BladeGroup, ImageFile, Modality};
pub use llm::{ModelProvider, ProviderFactory};
pub use orchestrator::{run_batch, RunSummary};
