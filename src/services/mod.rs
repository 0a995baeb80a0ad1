//! Service layer: the pipeline stages and their composition.
//!
//! - `orchestrator`: runs the instrumented tests
//! - `exclusion_filter`: drops excluded records from a profile
//! - `aggregator`: asks a reporter for the aggregate percentage
//! - `threshold_gate`: pass/fail decision
//! - `pipeline`: wires the stages together

pub mod aggregator;
pub mod exclusion_filter;
pub mod orchestrator;
pub mod pipeline;
pub mod threshold_gate;

pub use aggregator::{Aggregate, Aggregator, HtmlReport};
pub use exclusion_filter::{FilterResult, PatternHits, filter_profile};
pub use orchestrator::RunOrchestrator;
pub use pipeline::{Pipeline, PipelineReport};
pub use threshold_gate::decide;
