//! End-to-end restore runs over in-memory input with a recording writer.

use std::collections::BTreeSet;
use std::io::Write;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dynarestore_engine::diagnostics::DiagnosticSink;
use dynarestore_engine::identity::IDENTITY_FIELD;
use dynarestore_engine::journal::{Journal, ProtoUuid, JOURNAL_TABLE_ID, PAYLOAD_FIELD, TYPE_FIELD};
use dynarestore_engine::{
    restore_stream, run_restore, BatchWriter, DispatchContext, MemoryDiagnostics, PipelineError,
    RestoreConfig, TenantId, TenantRules, TenantScope,
};
use dynarestore_types::diagnostic::DiagnosticEvent;
use dynarestore_types::{AttributeValue, ItemEnvelope, Record, WriteError};
use pretty_assertions::assert_eq;
use prost::Message;

#[derive(Default)]
struct RecordingWriter {
    batches: Mutex<Vec<Vec<Record>>>,
    unprocessed_per_batch: usize,
    fail_every_batch: bool,
}

impl RecordingWriter {
    fn batches(&self) -> Vec<Vec<Record>> {
        self.batches.lock().unwrap().clone()
    }
}

#[async_trait]
impl BatchWriter for RecordingWriter {
    async fn write_batch(&self, table: &str, items: Vec<Record>) -> Result<Vec<Record>, WriteError> {
        assert_eq!(table, "dest-table");
        assert!(items.len() <= 25, "batch of {} exceeds ceiling", items.len());
        self.batches.lock().unwrap().push(items.clone());
        if self.fail_every_batch {
            return Err(WriteError::validation("ValidationException", "rejected"));
        }
        Ok(items.into_iter().take(self.unprocessed_per_batch).collect())
    }
}

fn source() -> TenantId {
    TenantScope::new("111111111111", "us-west-2").tenant_id()
}

fn destination() -> TenantId {
    TenantScope::new("222222222222", "us-east-1").tenant_id()
}

fn other() -> TenantId {
    TenantScope::new("333333333333", "us-west-2").tenant_id()
}

fn row(tenant: &TenantId, n: usize) -> Record {
    let mut identity = tenant.as_bytes().to_vec();
    identity.extend_from_slice(format!("row-{n}").as_bytes());
    [
        (IDENTITY_FIELD, AttributeValue::B(identity)),
        ("n", AttributeValue::N(n.to_string())),
        (
            "m",
            AttributeValue::M(
                [("nested".to_string(), AttributeValue::L(vec![AttributeValue::Null]))]
                    .into_iter()
                    .collect(),
            ),
        ),
    ]
    .into_iter()
    .collect()
}

fn sentinel(tenant: &TenantId) -> Record {
    let mut record = row(tenant, 0);
    record.insert(TYPE_FIELD, AttributeValue::B(JOURNAL_TABLE_ID.as_bytes().to_vec()));
    let payload = Journal {
        journal_id: Some(ProtoUuid::default()),
    }
    .encode_to_vec();
    record.insert(PAYLOAD_FIELD, AttributeValue::B(payload));
    record
}

fn line(record: &Record) -> String {
    serde_json::to_string(&ItemEnvelope {
        item: record.clone(),
    })
    .unwrap()
}

fn input(records: &[Record]) -> String {
    records.iter().map(|r| line(r) + "\n").collect()
}

fn context(
    writer: RecordingWriter,
) -> (Arc<DispatchContext<RecordingWriter>>, Arc<MemoryDiagnostics>) {
    let diagnostics = Arc::new(MemoryDiagnostics::new());
    let ctx = Arc::new(DispatchContext::new(
        writer,
        Arc::clone(&diagnostics) as Arc<dyn DiagnosticSink>,
        "dest-table",
    ));
    (ctx, diagnostics)
}

fn rules() -> TenantRules {
    TenantRules::new(source(), destination())
}

#[tokio::test]
async fn restores_only_source_tenant_and_skips_sentinel() {
    let text = input(&[row(&source(), 1), row(&other(), 2), sentinel(&source())]);
    let (ctx, diagnostics) = context(RecordingWriter::default());

    let summary = restore_stream(text.as_bytes(), rules(), Arc::clone(&ctx), 2)
        .await
        .unwrap();

    let batches = ctx.writer.batches();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].len(), 1);

    let written = &batches[0][0];
    let identity = written.binary(IDENTITY_FIELD).unwrap();
    assert_eq!(&identity[..16], destination().as_bytes());
    assert_eq!(&identity[16..], b"row-1");
    assert_eq!(written.get("n"), Some(&AttributeValue::N("1".into())));

    assert_eq!(summary.lines_read, 3);
    assert_eq!(summary.records_restored, 1);
    assert_eq!(summary.records_other_tenant, 1);
    assert_eq!(summary.sentinels_excluded, 1);
    assert_eq!(summary.records_written, 1);
    assert!(summary.is_complete());
    assert!(diagnostics.events().is_empty());
}

#[tokio::test]
async fn every_record_written_exactly_once_across_workers() {
    let records: Vec<Record> = (0..1000).map(|n| row(&source(), n)).collect();
    let (ctx, _) = context(RecordingWriter::default());

    let summary = restore_stream(input(&records).as_bytes(), rules(), Arc::clone(&ctx), 8)
        .await
        .unwrap();

    let batches = ctx.writer.batches();
    assert!(batches.iter().all(|b| !b.is_empty() && b.len() <= 25));
    let seen: BTreeSet<String> = batches
        .iter()
        .flatten()
        .map(|r| match r.get("n") {
            Some(AttributeValue::N(n)) => n.clone(),
            other => panic!("unexpected n attribute: {other:?}"),
        })
        .collect();
    assert_eq!(seen.len(), 1000);
    assert_eq!(batches.iter().map(Vec::len).sum::<usize>(), 1000);
    assert_eq!(summary.records_written, 1000);
    assert!(summary.workers >= 1);
}

#[tokio::test]
async fn single_worker_batches_twenty_six_as_twenty_five_and_one() {
    let records: Vec<Record> = (0..26).map(|n| row(&source(), n)).collect();
    let (ctx, _) = context(RecordingWriter::default());

    restore_stream(input(&records).as_bytes(), rules(), Arc::clone(&ctx), 1)
        .await
        .unwrap();

    let sizes: Vec<usize> = ctx.writer.batches().iter().map(Vec::len).collect();
    assert_eq!(sizes, vec![25, 1]);
}

#[tokio::test]
async fn partial_failure_reports_exact_items_and_continues() {
    let records: Vec<Record> = (0..50).map(|n| row(&source(), n)).collect();
    let writer = RecordingWriter {
        unprocessed_per_batch: 2,
        ..RecordingWriter::default()
    };
    let (ctx, diagnostics) = context(writer);

    let summary = restore_stream(input(&records).as_bytes(), rules(), Arc::clone(&ctx), 1)
        .await
        .unwrap();

    let batches = ctx.writer.batches();
    assert_eq!(batches.len(), 2);

    let events = diagnostics.events();
    assert_eq!(events.len(), 2);
    for (event, batch) in events.iter().zip(&batches) {
        let DiagnosticEvent::UnprocessedItems(report) = event else {
            panic!("expected unprocessed report, got {event:?}");
        };
        let reported: Vec<Record> = report.records().cloned().collect();
        assert_eq!(reported, batch[..2].to_vec());
        assert_eq!(report.table, "dest-table");
    }
    assert_eq!(summary.records_unprocessed, 4);
    assert_eq!(summary.records_written, 46);
    assert!(!summary.is_complete());
}

#[tokio::test]
async fn failed_writes_do_not_fail_the_run() {
    let records: Vec<Record> = (0..30).map(|n| row(&source(), n)).collect();
    let writer = RecordingWriter {
        fail_every_batch: true,
        ..RecordingWriter::default()
    };
    let (ctx, diagnostics) = context(writer);

    let summary = restore_stream(input(&records).as_bytes(), rules(), Arc::clone(&ctx), 1)
        .await
        .unwrap();

    assert_eq!(summary.batches_failed, 2);
    assert_eq!(summary.records_failed, 30);
    assert_eq!(summary.records_written, 0);
    assert_eq!(diagnostics.events().len(), 2);
}

#[tokio::test]
async fn malformed_line_aborts_with_line_number() {
    let mut text = input(&[row(&source(), 1)]);
    text.push_str("{\"Item\": {\"a\": {\"B\": \n");
    text.push_str(&input(&[row(&source(), 2)]));
    let (ctx, _) = context(RecordingWriter::default());

    let err = restore_stream(text.as_bytes(), rules(), ctx, 2).await.unwrap_err();
    assert!(matches!(err, PipelineError::Decode { line: 2, .. }), "got: {err:?}");
}

#[tokio::test]
async fn unknown_discriminator_is_fatal() {
    let text = r#"{"Item":{"a":{"Z":"x"}}}"#;
    let (ctx, _) = context(RecordingWriter::default());

    let err = restore_stream(text.as_bytes(), rules(), ctx, 1).await.unwrap_err();
    assert!(matches!(err, PipelineError::Decode { line: 1, .. }));
}

#[tokio::test]
async fn corrupt_source_journal_is_fatal() {
    let mut record = sentinel(&source());
    record.insert(PAYLOAD_FIELD, AttributeValue::B(vec![0x0a, 0x7f]));
    let (ctx, _) = context(RecordingWriter::default());

    let err = restore_stream(input(&[record]).as_bytes(), rules(), ctx, 1)
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::Sentinel { line: 1, .. }));
}

#[tokio::test]
async fn blank_lines_are_skipped() {
    let text = format!("\n{}\n   \n", line(&row(&source(), 1)));
    let (ctx, _) = context(RecordingWriter::default());

    let summary = restore_stream(text.as_bytes(), rules(), Arc::clone(&ctx), 1)
        .await
        .unwrap();
    assert_eq!(summary.lines_read, 3);
    assert_eq!(summary.records_written, 1);
}

#[tokio::test]
async fn run_restore_reads_backup_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let source_scope = TenantScope::new("111111111111", "us-west-2");
    let dest_scope = TenantScope::new("222222222222", "us-east-1");
    file.write_all(input(&[row(&source_scope.tenant_id(), 7), row(&other(), 8)]).as_bytes())
        .unwrap();

    let config = RestoreConfig {
        source: source_scope,
        destination: dest_scope,
        file: file.path().to_path_buf(),
        table: "dest-table".into(),
        concurrency: Some(2),
        ..RestoreConfig::default()
    };
    let diagnostics: Arc<dyn DiagnosticSink> = Arc::new(MemoryDiagnostics::new());

    let summary = run_restore(&config, RecordingWriter::default(), diagnostics)
        .await
        .unwrap();
    assert_eq!(summary.records_restored, 1);
    assert_eq!(summary.records_written, 1);
}

#[tokio::test]
async fn missing_backup_file_is_infrastructure_error() {
    let config = RestoreConfig {
        file: "/nonexistent/backup.jsonl".into(),
        ..RestoreConfig::default()
    };
    let diagnostics: Arc<dyn DiagnosticSink> = Arc::new(MemoryDiagnostics::new());

    let err = run_restore(&config, RecordingWriter::default(), diagnostics)
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::Infrastructure(_)));
    assert!(format!("{err:#}").contains("Failed to open backup file"));
}
