//! Workflow orchestration: per-query state and the retrieve→respond pipeline

pub mod pipeline;
pub mod state;

pub use pipeline::{PipelineConfig, RagPipeline};
pub use state::RagState;
