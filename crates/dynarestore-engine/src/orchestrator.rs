//! Restore orchestrator: wires the producer to the dispatch worker pool.

use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Context};
use dynarestore_types::Record;
use tokio::io::{AsyncBufRead, BufReader};
use tokio::task::JoinSet;

use crate::config::RestoreConfig;
use crate::diagnostics::DiagnosticSink;
use crate::dispatcher::{run_worker, DispatchContext, WorkerSummary};
use crate::errors::PipelineError;
use crate::filter::TenantRules;
use crate::producer::produce;
use crate::result::RestoreSummary;
use crate::writer::BatchWriter;

/// Number of dispatch workers: the configured limit capped at the
/// available parallelism, never less than one.
#[must_use]
pub fn worker_count(configured: Option<usize>) -> usize {
    let available = std::thread::available_parallelism().map_or(1, NonZeroUsize::get);
    configured.map_or(available, |limit| limit.min(available)).max(1)
}

/// Restore the backup named by `config.file` through `writer`.
///
/// # Errors
///
/// Returns [`PipelineError`] when the input cannot be opened or a fatal
/// input error aborts the run.
pub async fn run_restore<W>(
    config: &RestoreConfig,
    writer: W,
    diagnostics: Arc<dyn DiagnosticSink>,
) -> Result<RestoreSummary, PipelineError>
where
    W: BatchWriter + 'static,
{
    let file = open_input(&config.file).await?;
    let rules = TenantRules::new(config.source.tenant_id(), config.destination.tenant_id());

    tracing::info!(
        file = %config.file.display(),
        table = config.table.as_str(),
        source_tenant = %rules.source(),
        destination_tenant = %rules.destination(),
        "Starting restore"
    );

    let ctx = Arc::new(DispatchContext::new(writer, diagnostics, config.table.clone()));
    restore_stream(BufReader::new(file), rules, ctx, worker_count(config.concurrency)).await
}

async fn open_input(path: &Path) -> Result<tokio::fs::File, PipelineError> {
    let file = tokio::fs::File::open(path)
        .await
        .with_context(|| format!("Failed to open backup file: {}", path.display()))?;
    Ok(file)
}

/// Run the pipeline over any line-oriented input.
///
/// The producer runs on the calling task; `workers` dispatch tasks pull
/// from one rendezvous channel. Returns once every worker has flushed its
/// tail batch and exited.
///
/// # Errors
///
/// A fatal producer error aborts all workers and is returned. A worker
/// panic is returned as [`PipelineError::Infrastructure`].
pub async fn restore_stream<R, W>(
    input: R,
    rules: TenantRules,
    ctx: Arc<DispatchContext<W>>,
    workers: usize,
) -> Result<RestoreSummary, PipelineError>
where
    R: AsyncBufRead + Unpin,
    W: BatchWriter + 'static,
{
    let start = Instant::now();
    let workers = workers.max(1);
    let (tx, rx) = flume::bounded::<Record>(0);

    let mut join_set: JoinSet<WorkerSummary> = JoinSet::new();
    for worker in 0..workers {
        join_set.spawn(run_worker(worker, Arc::clone(&ctx), rx.clone()));
    }
    drop(rx);
    tracing::debug!(workers, "Dispatch workers started");

    let producer = match produce(input, &rules, tx).await {
        Ok(summary) => summary,
        Err(e) => {
            join_set.abort_all();
            while join_set.join_next().await.is_some() {}
            return Err(e);
        }
    };

    let mut summaries = Vec::with_capacity(workers);
    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok(summary) => summaries.push(summary),
            Err(join_err) => {
                join_set.abort_all();
                while join_set.join_next().await.is_some() {}
                return Err(PipelineError::Infrastructure(anyhow!(
                    "Dispatch worker failed: {join_err}"
                )));
            }
        }
    }
    summaries.sort_by_key(|s| s.worker);

    let summary = RestoreSummary::aggregate(&producer, &summaries, start.elapsed());
    tracing::info!(
        lines = summary.lines_read,
        restored = summary.records_restored,
        other_tenant = summary.records_other_tenant,
        sentinels = summary.sentinels_excluded,
        written = summary.records_written,
        unprocessed = summary.records_unprocessed,
        failed_batches = summary.batches_failed,
        "Restore finished"
    );
    Ok(summary)
}
