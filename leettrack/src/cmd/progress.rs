use crate::cmd::{connect_pool, identity, print_json, progress_store};
use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use leettrack_libs::{
    progress::{
        local::FileSlot,
        model::{ProgressUpdate, Status},
        stats::ProgressStats,
        store::{Backend, LoadSource, ProgressStore, SaveReport},
    },
    store::postgres::PgRecordStore,
};

#[derive(Debug, Args)]
pub struct ProgressArgs {
    #[command(subcommand)]
    command: ProgressCommand,
    /// Signed-in user; progress is kept locally when absent
    #[arg(long, global = true)]
    user: Option<String>,
}

#[derive(Debug, Subcommand)]
enum ProgressCommand {
    Show,
    Set {
        problem_id: String,
        #[arg(long)]
        status: Option<Status>,
        #[arg(long)]
        remarks: Option<String>,
    },
    Stats,
}

pub async fn run(args: ProgressArgs) -> Result<()> {
    let store = progress_store();

    match identity(args.user.as_deref()) {
        Some(owner) => {
            let pool = connect_pool().await?;
            let records = PgRecordStore::new(&pool);
            execute(&store, args.command, Backend::remote(&owner, &records)).await
        }
        None => execute(&store, args.command, Backend::Local).await,
    }
}

async fn execute(
    store: &ProgressStore<FileSlot>,
    command: ProgressCommand,
    backend: Backend<'_>,
) -> Result<()> {
    let loaded = store.load(backend).await;
    if let LoadSource::LocalFallback(reason) = &loaded.source {
        tracing::warn!("remote progress unavailable, showing local progress: {}", reason);
    }

    match command {
        ProgressCommand::Show => print_json(&loaded.progress),
        ProgressCommand::Stats => {
            let stats = ProgressStats::from_map(&loaded.progress);
            for status in Status::ALL {
                println!(
                    "{:<12}{:>5}{:>8.1}%",
                    status.as_str(),
                    stats.count(status),
                    stats.share(status)
                );
            }
            println!("{:<12}{:>5}", "Total", stats.total);
            Ok(())
        }
        ProgressCommand::Set {
            problem_id,
            status,
            remarks,
        } => {
            let update = ProgressUpdate { status, remarks };
            if update.is_empty() {
                bail!("either --status or --remarks must be given");
            }

            let (progress, report) = store
                .update_one(&loaded.progress, &problem_id, &update, backend)
                .await;
            report_save(&report);
            print_json(&progress.get(&problem_id))
        }
    }
}

pub fn report_save(report: &SaveReport) {
    if let Some(e) = &report.local_error {
        tracing::error!("local progress was not saved: {}", e);
    }
    for failed in report.failed.iter() {
        tracing::error!("record {} was not synced: {}", failed.id, failed.reason);
    }
    if !report.skipped.is_empty() {
        tracing::info!("{} local-only entries kept out of remote sync", report.skipped.len());
    }
}
