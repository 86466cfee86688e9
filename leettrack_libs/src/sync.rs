//! Folding anonymous progress into the remote store on sign-in.
use crate::{
    identity::Identity,
    progress::{
        local::LocalSlot,
        model::ProgressMap,
        store::{Backend, LoadSource, ProgressStore, SaveReport},
    },
    store::RecordStore,
};
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    NothingToSync,
    Pushed(SaveReport),
}

pub struct SyncReconciler<'a, L> {
    store: &'a ProgressStore<L>,
    records: &'a (dyn RecordStore + Send + Sync),
}

impl<'a, L> SyncReconciler<'a, L>
where
    L: LocalSlot + Send + Sync,
{
    pub fn new(store: &'a ProgressStore<L>, records: &'a (dyn RecordStore + Send + Sync)) -> Self {
        Self { store, records }
    }

    pub fn store(&self) -> &'a ProgressStore<L> {
        self.store
    }

    pub fn records(&self) -> &'a (dyn RecordStore + Send + Sync) {
        self.records
    }

    /// Pushes the local map to `owner`'s records. Local values overwrite remote
    /// ones for the same id and the local mirror is kept.
    pub async fn reconcile(&self, owner: &Identity) -> SyncOutcome {
        let local = self.store.load_local().await;
        if local.is_empty() {
            tracing::info!("no local progress to sync for {}", owner);
            return SyncOutcome::NothingToSync;
        }

        tracing::info!("sync {} local progress entries to {}", local.len(), owner);
        let report = self
            .store
            .save(&local, Backend::remote(owner, self.records))
            .await;
        SyncOutcome::Pushed(report)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn {
        owner: Identity,
        outcome: SyncOutcome,
        source: LoadSource,
    },
    SignedOut,
    Unchanged,
}

/// Follows identity changes and keeps the working progress map pointed at the right backend.
pub struct SessionSync<'a, L> {
    reconciler: SyncReconciler<'a, L>,
    identity: Option<Identity>,
    progress: ProgressMap,
}

impl<'a, L> SessionSync<'a, L>
where
    L: LocalSlot + Send + Sync,
{
    pub fn new(reconciler: SyncReconciler<'a, L>) -> Self {
        Self {
            reconciler,
            identity: None,
            progress: ProgressMap::new(),
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn progress(&self) -> &ProgressMap {
        &self.progress
    }

    pub async fn handle(&mut self, identity: Option<Identity>) -> SessionEvent {
        if identity == self.identity {
            return SessionEvent::Unchanged;
        }

        match identity {
            Some(owner) => {
                let outcome = self.reconciler.reconcile(&owner).await;
                let loaded = self
                    .reconciler
                    .store()
                    .load(Backend::remote(&owner, self.reconciler.records()))
                    .await;
                self.progress = loaded.progress;
                self.identity = Some(owner.clone());
                SessionEvent::SignedIn {
                    owner,
                    outcome,
                    source: loaded.source,
                }
            }
            None => {
                self.progress = self.reconciler.store().load_local().await;
                self.identity = None;
                SessionEvent::SignedOut
            }
        }
    }

    /// Handles the current identity and every later change until the provider is dropped.
    pub async fn follow(&mut self, mut rx: watch::Receiver<Option<Identity>>) {
        loop {
            let identity = rx.borrow_and_update().clone();
            match self.handle(identity).await {
                SessionEvent::SignedIn { owner, outcome, .. } => {
                    tracing::info!("session of {} synchronized: {:?}", owner, outcome);
                }
                SessionEvent::SignedOut => tracing::info!("session switched to local progress"),
                SessionEvent::Unchanged => {}
            }

            if rx.changed().await.is_err() {
                break;
            }
        }
    }
}
