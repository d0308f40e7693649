//! Issue attribution pipeline
//!
//! Orchestrates the blame-attribution run:
//! 1. Drop issues whose file or rule is excluded
//! 2. Resolve each remaining issue to a contributor (blame, gated)
//! 3. Fold attributed issues into the shared [`Aggregator`]
//!
//! Issues are processed on a dedicated rayon pool no larger than the gate's
//! capacity. Issues whose blame fails or resolves to nothing are left out of
//! every aggregate.

pub mod aggregator;
pub mod gate;
pub mod resolver;

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

pub use aggregator::{AggregateSnapshot, Aggregator};
pub use gate::{Gate, GateError, Permit, DEFAULT_CONCURRENCY};
pub use resolver::Resolver;

use crate::git::BlameService;
use crate::models::Issue;

/// Called with (completed, total) after each issue.
pub type ProgressCallback = Box<dyn Fn(usize, usize) + Send + Sync>;

/// Attribution run over a batch of issues.
pub struct AttributionPipeline {
    resolver: Resolver,
    aggregator: Arc<Aggregator>,
    workers: usize,
    progress_callback: Option<ProgressCallback>,
}

impl AttributionPipeline {
    /// Create a pipeline whose worker count equals the gate's capacity.
    pub fn new(blame: Arc<BlameService>, gate: Arc<Gate>, aggregator: Arc<Aggregator>) -> Self {
        let workers = gate.capacity();
        Self {
            resolver: Resolver::new(blame, gate),
            aggregator,
            workers,
            progress_callback: None,
        }
    }

    /// Use fewer workers than the gate allows (never more).
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.clamp(1, self.workers);
        self
    }

    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Resolve and record every issue.
    pub fn run(&self, issues: &[Issue]) -> Result<PipelineStats> {
        let start = Instant::now();
        info!("Attributing {} issues with {} workers", issues.len(), self.workers);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .thread_name(|i| format!("blamerank-attr-{}", i))
            .build()
            .context("Failed to build attribution thread pool")?;

        let counters = Counters::default();
        let total = issues.len();

        pool.install(|| {
            issues.par_iter().for_each(|issue| {
                let outcome = self.process(issue);
                counters.add(outcome);
                let done = counters.completed.fetch_add(1, Ordering::SeqCst) + 1;
                if let Some(ref callback) = self.progress_callback {
                    callback(done, total);
                }
            });
        });

        let stats = counters.into_stats(total, start.elapsed().as_millis() as u64);
        info!("Attribution complete: {}", stats.summary());
        Ok(stats)
    }

    fn process(&self, issue: &Issue) -> Outcome {
        let policy = self.aggregator.policy();
        if policy.should_ignore_file(&issue.file_path) || policy.should_ignore_rule(&issue.rule_id) {
            return Outcome::Excluded;
        }

        match self.resolver.resolve(issue, self.aggregator.as_ref()) {
            Ok(Some(blame)) => {
                if self.aggregator.record(issue, &blame) {
                    Outcome::Recorded
                } else {
                    Outcome::Excluded
                }
            }
            Ok(None) => Outcome::Unattributed,
            Err(e) => {
                debug!("Unattributed issue in {}: {}", issue.file_path, e);
                Outcome::Failed
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Outcome {
    Recorded,
    Excluded,
    Unattributed,
    Failed,
}

#[derive(Default)]
struct Counters {
    completed: AtomicUsize,
    recorded: AtomicUsize,
    excluded: AtomicUsize,
    unattributed: AtomicUsize,
    failed: AtomicUsize,
}

impl Counters {
    fn add(&self, outcome: Outcome) {
        let counter = match outcome {
            Outcome::Recorded => &self.recorded,
            Outcome::Excluded => &self.excluded,
            Outcome::Unattributed => &self.unattributed,
            Outcome::Failed => &self.failed,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn into_stats(self, issues: usize, duration_ms: u64) -> PipelineStats {
        PipelineStats {
            issues,
            recorded: self.recorded.into_inner(),
            excluded: self.excluded.into_inner(),
            unattributed: self.unattributed.into_inner(),
            failed: self.failed.into_inner(),
            duration_ms,
        }
    }
}

/// Statistics from one attribution run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelineStats {
    /// Issues submitted
    pub issues: usize,
    /// Issues folded into the aggregates
    pub recorded: usize,
    /// Rejected by the ignore policy
    pub excluded: usize,
    /// Blame succeeded but no line could be attributed
    pub unattributed: usize,
    /// Blame failed for the issue's file
    pub failed: usize,
    pub duration_ms: u64,
}

impl PipelineStats {
    /// Get a summary string.
    pub fn summary(&self) -> String {
        let mut parts = vec![
            format!("{} issues", self.issues),
            format!("{} recorded", self.recorded),
        ];
        if self.excluded > 0 {
            parts.push(format!("{} excluded", self.excluded));
        }
        if self.unattributed + self.failed > 0 {
            parts.push(format!("{} unattributed", self.unattributed + self.failed));
        }
        parts.push(format!("{}ms", self.duration_ms));
        parts.join(", ")
    }
}
