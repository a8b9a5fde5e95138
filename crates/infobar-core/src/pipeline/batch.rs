//! Bounded-concurrency batch runs over an input directory.
//!
//! Every file is an independent unit on tokio's blocking pool. A semaphore
//! caps how many are in flight; the permit moves into the unit and is dropped
//! when it returns or unwinds. One unit failing never stops the others.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;

use crate::config::Config;
use crate::error::PipelineError;
use crate::render::AssetCache;
use crate::types::{BatchReport, JobOutcome};

use super::discovery::{Discovery, FileDiscovery};
use super::processor::{ImageProcessor, OutputDir};

/// Processes every supported file in a directory.
pub struct BatchRunner {
    processor: Arc<ImageProcessor>,
    discovery: FileDiscovery,
    max_workers: usize,
}

impl BatchRunner {
    pub fn new(config: &Config, assets: Arc<AssetCache>) -> Self {
        let output = Arc::new(OutputDir::new(config.output.dir.clone()));
        let processor = ImageProcessor::new(config, assets, output);
        Self::with_processor(config, processor)
    }

    /// Build a runner around an existing processor.
    pub fn with_processor(config: &Config, processor: ImageProcessor) -> Self {
        Self {
            processor: Arc::new(processor),
            discovery: FileDiscovery::new(config.processing.clone()),
            max_workers: config.processing.max_workers,
        }
    }

    /// Files a run over `input` would process.
    pub fn discover(&self, input: &Path) -> Result<Discovery, PipelineError> {
        self.discovery.discover(input)
    }

    /// Process everything in `input`, calling `on_outcome` as units finish.
    ///
    /// Fails only if the input directory is missing or the output
    /// directory cannot be created; per-file failures land in the report.
    pub async fn run<F>(&self, input: &Path, on_outcome: F) -> Result<BatchReport, PipelineError>
    where
        F: Fn(&JobOutcome) + Send + Sync + 'static,
    {
        let discovery = self.discover(input)?;
        self.run_discovered(discovery, on_outcome).await
    }

    /// Process an already discovered set of files.
    pub async fn run_discovered<F>(
        &self,
        discovery: Discovery,
        on_outcome: F,
    ) -> Result<BatchReport, PipelineError>
    where
        F: Fn(&JobOutcome) + Send + Sync + 'static,
    {
        self.processor.output_dir().ensure()?;
        tracing::info!(
            "Processing {} file(s) with up to {} worker(s)",
            discovery.files.len(),
            self.max_workers
        );

        let start = Instant::now();
        let paths = discovery.files.into_iter().map(|f| f.path).collect();
        let processor = self.processor.clone();
        let outcomes = run_units(
            paths,
            self.max_workers,
            move |path: &Path| processor.process(path),
            on_outcome,
        )
        .await;

        let report = BatchReport {
            outcomes,
            skipped: discovery.duplicates.len(),
            elapsed: start.elapsed(),
        };
        tracing::info!(
            "Batch finished in {:.2?}: {} written, {} failed, {} skipped",
            report.elapsed,
            report.succeeded(),
            report.failed(),
            report.skipped
        );
        Ok(report)
    }
}

/// Run `work` once per path with at most `max_workers` in flight.
///
/// Outcomes come back in dispatch order. A unit that panics is reported as
/// a `worker` failure.
pub async fn run_units<W, F>(
    paths: Vec<PathBuf>,
    max_workers: usize,
    work: W,
    on_outcome: F,
) -> Vec<JobOutcome>
where
    W: Fn(&Path) -> Result<PathBuf, PipelineError> + Send + Sync + 'static,
    F: Fn(&JobOutcome) + Send + Sync + 'static,
{
    let semaphore = Arc::new(Semaphore::new(max_workers.max(1)));
    let work = Arc::new(work);
    let on_outcome = Arc::new(on_outcome);
    let mut handles = Vec::with_capacity(paths.len());

    for path in paths {
        let Ok(permit) = semaphore.clone().acquire_owned().await else {
            tracing::warn!("Worker semaphore closed unexpectedly, stopping batch");
            break;
        };

        let work = work.clone();
        let on_outcome = on_outcome.clone();
        let unit_path = path.clone();
        let handle = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            let start = Instant::now();
            let outcome = match work(&unit_path) {
                Ok(output) => JobOutcome::Written {
                    source: unit_path,
                    output,
                    elapsed_ms: start.elapsed().as_millis() as u64,
                },
                Err(e) => {
                    tracing::error!(path = ?unit_path, stage = e.stage(), "{e}");
                    JobOutcome::Failed {
                        source: unit_path,
                        stage: e.stage().to_string(),
                        message: e.to_string(),
                        elapsed_ms: start.elapsed().as_millis() as u64,
                    }
                }
            };
            on_outcome(&outcome);
            outcome
        });
        handles.push((path, handle));
    }

    let mut outcomes = Vec::with_capacity(handles.len());
    for (path, handle) in handles {
        match handle.await {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => {
                let err = PipelineError::Worker {
                    path: path.clone(),
                    message: e.to_string(),
                };
                tracing::error!(path = ?path, stage = err.stage(), "{err}");
                let outcome = JobOutcome::Failed {
                    source: path,
                    stage: err.stage().to_string(),
                    message: err.to_string(),
                    elapsed_ms: 0,
                };
                on_outcome(&outcome);
                outcomes.push(outcome);
            }
        }
    }
    outcomes
}
