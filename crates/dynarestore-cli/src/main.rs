mod commands;
mod logging;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use dynarestore_engine::config::types::ConfigOverrides;

#[derive(Parser)]
#[command(
    name = "dynarestore",
    version,
    about = "Restore one tenant's records from a DynamoDB backup into another tenant"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Restore a backup file into the destination table
    Restore(RestoreArgs),
    /// Print the tenant identifier derived for an account and region
    TenantId {
        #[arg(long, default_value = "000000000000")]
        account: String,
        #[arg(long, default_value = "us-west-2")]
        region: String,
    },
}

#[derive(Args)]
struct RestoreArgs {
    /// Restore YAML file; explicit flags override its values
    #[arg(long)]
    config: Option<PathBuf>,
    /// Account the backup was taken from [default: 000000000000]
    #[arg(long)]
    from_account: Option<String>,
    /// Region the backup was taken from [default: us-west-2]
    #[arg(long)]
    from_region: Option<String>,
    /// Account to restore into [default: 000000000000]
    #[arg(long)]
    to_account: Option<String>,
    /// Region to restore into [default: us-west-2]
    #[arg(long)]
    to_region: Option<String>,
    /// JSON-lines backup file [default: backup.jsonl]
    #[arg(long)]
    file: Option<PathBuf>,
    /// Destination table [default: 0a5ccc1d-7ac0-4efb-818b-d845b3a82165]
    #[arg(long)]
    table: Option<String>,
    /// DynamoDB endpoint override, e.g. http://localhost:8000
    #[arg(long)]
    endpoint: Option<String>,
    /// Maximum dispatch workers [default: available parallelism]
    #[arg(long)]
    concurrency: Option<usize>,
    /// Attempts per batch write, including the first [default: 16]
    #[arg(long)]
    max_attempts: Option<u32>,
    /// Deadline in seconds for one batch write, retries included [default: none]
    #[arg(long)]
    operation_timeout_secs: Option<u64>,
    /// Preview mode: print put requests to stdout instead of writing
    #[arg(long)]
    dry_run: bool,
}

impl RestoreArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            from_account: self.from_account.clone(),
            from_region: self.from_region.clone(),
            to_account: self.to_account.clone(),
            to_region: self.to_region.clone(),
            file: self.file.clone(),
            table: self.table.clone(),
            endpoint: self.endpoint.clone(),
            concurrency: self.concurrency,
            max_attempts: self.max_attempts,
            operation_timeout_secs: self.operation_timeout_secs,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init(&cli.log_level);

    match cli.command {
        Commands::Restore(args) => {
            commands::restore::execute(args.config.as_deref(), args.overrides(), args.dry_run)
                .await
        }
        Commands::TenantId { account, region } => {
            commands::tenant::execute(&account, &region);
            Ok(())
        }
    }
}
