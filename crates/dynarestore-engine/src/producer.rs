//! Sequential producer: decode, filter, rewrite, hand off.

use anyhow::anyhow;
use dynarestore_types::{ItemEnvelope, Record};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::errors::PipelineError;
use crate::filter::{Disposition, TenantRules};
use crate::identity::IDENTITY_FIELD;

/// Counters for the producer side of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProducerSummary {
    pub lines_read: u64,
    pub records_forwarded: u64,
    pub records_other_tenant: u64,
    pub sentinels_excluded: u64,
}

/// Read `input` line by line in order and send every source-tenant record,
/// rewritten to the destination tenant, into `records`.
///
/// `records` is dropped when this returns, which is the workers' drain
/// signal. Blank lines are skipped.
///
/// # Errors
///
/// The first malformed line, corrupt journal row, or read failure aborts
/// production with a [`PipelineError`].
pub async fn produce<R>(
    input: R,
    rules: &TenantRules,
    records: flume::Sender<Record>,
) -> Result<ProducerSummary, PipelineError>
where
    R: AsyncBufRead + Unpin,
{
    let mut summary = ProducerSummary::default();
    let mut lines = input.lines();

    loop {
        let next = lines.next_line().await.map_err(|source| PipelineError::Io {
            line: summary.lines_read,
            source,
        })?;
        let Some(line) = next else {
            break;
        };
        summary.lines_read += 1;
        let line_no = summary.lines_read;

        if line.trim().is_empty() {
            continue;
        }

        let mut record = ItemEnvelope::from_line(&line)
            .map_err(|source| PipelineError::Decode {
                line: line_no,
                source,
            })?
            .item;

        let disposition = rules
            .classify(&record)
            .map_err(|source| PipelineError::Sentinel {
                line: line_no,
                source,
            })?;

        match disposition {
            Disposition::OtherTenant => summary.records_other_tenant += 1,
            Disposition::Sentinel => {
                summary.sentinels_excluded += 1;
                // TODO: collect the sentinel's row id and delete index rows that reference it.
                tracing::debug!(
                    line = line_no,
                    identity = ?record.binary(IDENTITY_FIELD),
                    "Excluding default journal record"
                );
            }
            Disposition::Restore => {
                rules.rewrite(&mut record);
                records.send_async(record).await.map_err(|_| {
                    PipelineError::Infrastructure(anyhow!(
                        "all dispatch workers exited before input was exhausted"
                    ))
                })?;
                summary.records_forwarded += 1;
            }
        }
    }

    Ok(summary)
}
