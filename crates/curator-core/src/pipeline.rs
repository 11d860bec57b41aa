use std::path::PathBuf;

use thiserror::Error;
use tracing::info;

use crate::collector::{Collector, CollectorError};
use crate::config::{CurationConfig, DEFAULT_BATCH_SIZE};
use crate::executor::{ExecutionOutcome, Executor, ExecutorError};
use crate::llm::LLM;
use crate::mode::RunMode;
use crate::planner::{Planner, PlannerError};
use crate::state::{RunState, RunSummary, VideoRecord};
use crate::storage::{Storage, StorageError};
use crate::youtube::VideoPlatform;

/// How a curation run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// All planned work was attempted.
    Completed(RunSummary),
    /// The platform quota ran out; the next run picks up where this stopped.
    QuotaPaused(RunSummary),
}

impl RunOutcome {
    pub fn summary(&self) -> &RunSummary {
        match self {
            RunOutcome::Completed(summary) | RunOutcome::QuotaPaused(summary) => summary,
        }
    }
}

/// Drives a full run: collect and plan on the first run, then execute.
pub struct Curator<P: VideoPlatform, L: LLM, S: Storage> {
    platform: P,
    llm: L,
    storage: S,
    curation: CurationConfig,
    batch_size: usize,
}

impl<P: VideoPlatform, L: LLM, S: Storage> Curator<P, L, S> {
    pub fn new(platform: P, llm: L, storage: S, curation: CurationConfig) -> Self {
        Self {
            platform,
            llm,
            storage,
            curation,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Sets the metadata batch size used by the collector.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// The run mode implied by the current storage contents.
    pub fn detect_mode(&self) -> RunMode {
        RunMode::detect(&self.storage)
    }

    /// Runs the pipeline in the given mode.
    ///
    /// A quota pause is a normal outcome, not an error.
    pub async fn run(&self, mode: RunMode) -> Result<RunOutcome, PipelineError> {
        info!("Starting {}", mode.display_name());

        let (mut state, records) = match mode {
            RunMode::FirstRun => self.prepare().await?,
            RunMode::Resume => self.resume()?,
        };

        let executor = Executor::new(&self.platform, &self.storage);
        let outcome = executor.run(&mut state, &records).await?;
        let summary = state.summary();
        info!("{}", summary);

        Ok(match outcome {
            ExecutionOutcome::Finished => RunOutcome::Completed(summary),
            ExecutionOutcome::QuotaExceeded => RunOutcome::QuotaPaused(summary),
        })
    }

    /// Collects videos, asks for groupings and saves both snapshots.
    async fn prepare(&self) -> Result<(RunState, Vec<VideoRecord>), PipelineError> {
        let collector = Collector::new(&self.platform).with_batch_size(self.batch_size);
        let ids = collector
            .collect_unique_ids(&self.curation.source_playlist_ids)
            .await?;
        let records = collector.fetch_metadata(&ids).await?;
        if records.is_empty() {
            return Err(PipelineError::NoVideos);
        }

        self.storage.save_video_cache(&records)?;
        info!(
            "Cached {} video records at {}",
            records.len(),
            self.storage.video_cache_location().display()
        );

        let planner = Planner::new(&self.llm);
        let groupings = planner
            .plan(&records, self.curation.playlist_count)
            .await?;

        let state = RunState::new(groupings);
        self.storage.save_run_state(&state)?;
        info!(
            "Saved {} planned playlists to {}",
            state.playlists.len(),
            self.storage.run_state_location().display()
        );

        Ok((state, records))
    }

    /// Loads both snapshots; either one missing is fatal.
    fn resume(&self) -> Result<(RunState, Vec<VideoRecord>), PipelineError> {
        let state = self
            .storage
            .load_run_state()?
            .ok_or_else(|| PipelineError::MissingState(self.storage.run_state_location()))?;
        let records = self
            .storage
            .load_video_cache()?
            .ok_or_else(|| PipelineError::MissingState(self.storage.video_cache_location()))?;

        info!(
            "Resuming {} playlists over {} cached videos",
            state.playlists.len(),
            records.len()
        );
        Ok((state, records))
    }
}

/// Errors that abort a run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Cannot resume: {0} is missing. Run `curator reset --yes` to start over.")]
    MissingState(PathBuf),

    #[error("The source playlists contain no videos")]
    NoVideos,

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Collector(#[from] CollectorError),

    #[error("Planning failed: {0}")]
    Planner(#[from] PlannerError),

    #[error(transparent)]
    Executor(#[from] ExecutorError),
}
