//! The compile pipeline
//!
//! Skeleton, plan, dispatch, merge, sweep. Collaborator calls run with
//! bounded concurrency but their results are merged strictly in task order,
//! so the output never depends on which call finishes first.

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::plan::{contributing_sources, plan_tasks};
use crate::reader::{DocumentReader, SkippedSource, SourceUnit};
use crate::types::{CompileReport, CompileResult, SourceStats};
use dossier_domain::traits::FactExtractor;
use dossier_domain::{build_skeleton, CandidateExtraction, FieldCatalog, Template, TextChunk};
use dossier_gatekeeper::Gatekeeper;
use dossier_janitor::Janitor;
use futures::stream::{self, StreamExt};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Compiles source documents into an evidence-backed output document
pub struct Compiler<E> {
    extractor: Arc<E>,
    gatekeeper: Gatekeeper,
    janitor: Janitor,
    config: ExtractorConfig,
    extraction_timeout: Duration,
}

impl<E> Compiler<E>
where
    E: FactExtractor + Send + Sync + 'static,
    E::Error: Into<ExtractorError> + Send + 'static,
{
    /// Create a compiler with the default gatekeeper and janitor
    pub fn new(extractor: E, config: ExtractorConfig) -> Self {
        Self {
            extractor: Arc::new(extractor),
            gatekeeper: Gatekeeper::default_config(),
            janitor: Janitor::default_config(),
            extraction_timeout: config.extraction_timeout(),
            config,
        }
    }

    /// Use a specific gatekeeper
    pub fn with_gatekeeper(mut self, gatekeeper: Gatekeeper) -> Self {
        self.gatekeeper = gatekeeper;
        self
    }

    /// Use a specific janitor
    pub fn with_janitor(mut self, janitor: Janitor) -> Self {
        self.janitor = janitor;
        self
    }

    /// Override the per-call timeout with sub-second precision
    pub fn with_extraction_timeout(mut self, limit: Duration) -> Self {
        self.extraction_timeout = limit;
        self
    }

    /// The extractor configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Read every supported file in `dir` and compile it
    pub async fn compile_dir(
        &self,
        template: &Template,
        dir: &Path,
    ) -> Result<CompileResult, ExtractorError> {
        let set = DocumentReader::new().read_dir(dir)?;
        info!(
            dir = %dir.display(),
            units = set.units.len(),
            skipped = set.skipped.len(),
            "Read source documents"
        );
        self.run(template, &set.units, set.skipped).await
    }

    /// Compile already-read source units
    ///
    /// Unit text is expected to be normalized. Failed or timed-out calls are
    /// counted and contribute no candidates; they never abort the run.
    ///
    /// # Errors
    ///
    /// Fails only on an invalid configuration or an invalid janitor target.
    pub async fn compile(
        &self,
        template: &Template,
        units: &[SourceUnit],
    ) -> Result<CompileResult, ExtractorError> {
        self.run(template, units, Vec::new()).await
    }

    async fn run(
        &self,
        template: &Template,
        units: &[SourceUnit],
        skipped_sources: Vec<SkippedSource>,
    ) -> Result<CompileResult, ExtractorError> {
        self.config.validate()?;

        let mut document = build_skeleton(template);
        let tasks = plan_tasks(template, units, &self.config);

        info!(
            tasks = tasks.len(),
            granularity = %self.config.granularity,
            concurrency = self.config.max_concurrency,
            "Starting compile"
        );

        let mut chunks_failed = 0;
        let mut candidates_proposed = 0;
        let mut per_source: BTreeMap<String, SourceStats> = BTreeMap::new();
        let mut merges = Vec::with_capacity(tasks.len());

        let task_count = tasks.len();
        let limit = self.extraction_timeout;
        let mut results = stream::iter(tasks.into_iter().map(|task| {
            let extractor = Arc::clone(&self.extractor);
            async move {
                let result = run_task(
                    extractor,
                    Arc::clone(&task.catalog),
                    task.chunk.clone(),
                    limit,
                )
                .await;
                (task, result)
            }
        }))
        .buffered(self.config.max_concurrency);

        while let Some((task, result)) = results.next().await {
            let stats = per_source.entry(task.chunk.source_id.clone()).or_default();
            stats.tasks += 1;

            match result {
                Ok(candidates) => {
                    candidates_proposed += candidates.len();
                    let outcome =
                        self.gatekeeper
                            .merge(&mut document, template, &task.chunk, &candidates);
                    debug!(
                        source = %task.chunk.source_id,
                        location = %task.chunk.location,
                        proposed = candidates.len(),
                        accepted = outcome.accepted,
                        "Merged chunk"
                    );
                    merges.push((task.chunk.source_id, outcome));
                }
                Err(e) => {
                    warn!(
                        source = %task.chunk.source_id,
                        location = %task.chunk.location,
                        section = task.section.as_deref().unwrap_or("-"),
                        error = %e,
                        "Extraction failed, skipping chunk"
                    );
                    stats.failed += 1;
                    chunks_failed += 1;
                }
            }
        }

        let sources = contributing_sources(units);
        let sweep = self.janitor.sweep(&mut document, template, &sources)?;

        let mut report = CompileReport {
            granularity: self.config.granularity,
            tasks: task_count,
            chunks_failed,
            candidates_proposed,
            values_merged: 0,
            evidence_recorded: 0,
            evidence_dropped: 0,
            rejections_by_reason: BTreeMap::new(),
            per_source,
            skipped_sources,
            sweep,
        };
        for (source_id, outcome) in &merges {
            report.record_merge(source_id, outcome);
        }

        info!(
            merged = report.values_merged,
            rejected = report.rejected(),
            failed = report.chunks_failed,
            gaps = report.sweep.gaps.len(),
            "Compile complete"
        );

        Ok(CompileResult { document, report })
    }
}

/// Run one collaborator call on the blocking pool under a timeout
async fn run_task<E>(
    extractor: Arc<E>,
    catalog: Arc<FieldCatalog>,
    chunk: TextChunk,
    limit: Duration,
) -> Result<Vec<CandidateExtraction>, ExtractorError>
where
    E: FactExtractor + Send + Sync + 'static,
    E::Error: Into<ExtractorError> + Send + 'static,
{
    let handle = tokio::task::spawn_blocking(move || {
        extractor.extract(&catalog, &chunk).map_err(Into::into)
    });

    match timeout(limit, handle).await {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => Err(ExtractorError::Task(e.to_string())),
        Err(_) => Err(ExtractorError::Timeout),
    }
}

