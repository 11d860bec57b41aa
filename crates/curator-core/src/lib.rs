pub mod collector;
pub mod config;
pub mod executor;
pub mod llm;
pub mod mode;
pub mod pipeline;
pub mod planner;
pub mod state;
pub mod storage;
pub mod youtube;

pub use collector::Collector;
pub use config::Config;
pub use executor::{ExecutionOutcome, Executor};
pub use mode::RunMode;
pub use pipeline::{Curator, PipelineError, RunOutcome};
pub use planner::Planner;
pub use state::{
    Grouping, PlaylistStatus, RunState, RunSummary, TrackStatus, TrackTask, VideoRecord,
};
pub use storage::{FileStorage, Storage};
