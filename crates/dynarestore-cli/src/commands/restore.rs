use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use dest_dynamodb::{ClientConfig, DynamoDbWriter};
use dynarestore_engine::config::parser;
use dynarestore_engine::config::types::ConfigOverrides;
use dynarestore_engine::config::validator;
use dynarestore_engine::{
    run_restore, DiagnosticSink, DryRunWriter, JsonLinesDiagnostics, RestoreConfig,
    RestoreSummary,
};

/// Execute the `restore` command: resolve, validate, and run a restore.
pub async fn execute(
    config_path: Option<&Path>,
    overrides: ConfigOverrides,
    dry_run: bool,
) -> Result<()> {
    // 1. Resolve config: file (if any), then flags
    let base = match config_path {
        Some(path) => parser::parse_config(path)
            .with_context(|| format!("Failed to parse restore config: {}", path.display()))?,
        None => RestoreConfig::default(),
    };
    let config = base.with_overrides(overrides);

    // 2. Validate
    validator::validate_config(&config)?;
    if config.is_same_tenant() {
        tracing::warn!("Source and destination tenants are identical; records are rewritten in place");
    }

    tracing::info!(
        file = %config.file.display(),
        table = config.table.as_str(),
        source = %config.source.resource_name(),
        destination = %config.destination.resource_name(),
        dry_run,
        "Restore config validated"
    );

    // 3. Run
    let diagnostics: Arc<dyn DiagnosticSink> = Arc::new(JsonLinesDiagnostics::stderr());
    let summary = if dry_run {
        run_restore(&config, DryRunWriter::stdout(), diagnostics).await?
    } else {
        let writer = DynamoDbWriter::connect(&ClientConfig::from(&config)).await;
        run_restore(&config, writer, diagnostics).await?
    };

    print_summary(&config, &summary);
    if !summary.is_complete() {
        tracing::warn!(
            unprocessed = summary.records_unprocessed,
            failed = summary.records_failed,
            "Some records were not written; see diagnostics on stderr"
        );
    }

    Ok(())
}

fn print_summary(config: &RestoreConfig, summary: &RestoreSummary) {
    println!("Restore into '{}' completed.", config.table);
    println!("  Lines read:           {}", summary.lines_read);
    println!("  Records restored:     {}", summary.records_restored);
    println!("  Other tenants:        {}", summary.records_other_tenant);
    println!("  Sentinels excluded:   {}", summary.sentinels_excluded);
    println!("  Records written:      {}", summary.records_written);
    if summary.records_unprocessed > 0 {
        println!("  Records unprocessed:  {}", summary.records_unprocessed);
    }
    if summary.batches_failed > 0 {
        println!(
            "  Failed batches:       {} ({} records)",
            summary.batches_failed, summary.records_failed
        );
    }
    println!("  Batches written:      {}", summary.batches_written);
    println!("  Workers:              {}", summary.workers);
    println!("  Duration:             {:.2}s", summary.duration_secs);
    if summary.duration_secs > 0.0 {
        println!(
            "  Throughput:           {:.0} records/sec",
            summary.records_written as f64 / summary.duration_secs
        );
    }

    // Machine-readable JSON for scripts
    let json = serde_json::json!({
        "table": config.table,
        "lines_read": summary.lines_read,
        "records_restored": summary.records_restored,
        "records_other_tenant": summary.records_other_tenant,
        "sentinels_excluded": summary.sentinels_excluded,
        "batches_written": summary.batches_written,
        "batches_failed": summary.batches_failed,
        "records_written": summary.records_written,
        "records_unprocessed": summary.records_unprocessed,
        "records_failed": summary.records_failed,
        "workers": summary.workers,
        "duration_secs": summary.duration_secs,
    });
    println!("@@RESTORE_JSON@@{json}");
}
