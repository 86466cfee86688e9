use crate::cmd::{connect_pool, identity, print_json, progress::report_save, progress_store};
use anyhow::{Context, Result};
use clap::Args;
use leettrack_libs::{
    progress::store::LoadSource,
    store::postgres::PgRecordStore,
    sync::{SessionEvent, SessionSync, SyncOutcome, SyncReconciler},
};

#[derive(Debug, Args)]
pub struct SyncArgs {
    #[arg(long)]
    user: Option<String>,
}

pub async fn run(args: SyncArgs) -> Result<()> {
    let owner = identity(args.user.as_deref()).with_context(|| {
        let message = "--user or LEETTRACK_USER must be given to sync progress.";
        tracing::error!(message);
        message
    })?;

    let pool = connect_pool().await?;
    let records = PgRecordStore::new(&pool);
    let store = progress_store();
    let mut session = SessionSync::new(SyncReconciler::new(&store, &records));

    if let SessionEvent::SignedIn {
        owner,
        outcome,
        source,
    } = session.handle(Some(owner)).await
    {
        match outcome {
            SyncOutcome::NothingToSync => tracing::info!("no local progress to push for {}", owner),
            SyncOutcome::Pushed(report) => {
                report_save(&report);
                tracing::info!("{} entries pushed for {}", report.synced_count(), owner);
            }
        }
        if let LoadSource::LocalFallback(reason) = source {
            tracing::warn!("remote progress unavailable, showing local progress: {}", reason);
        }
    }

    print_json(session.progress())
}
