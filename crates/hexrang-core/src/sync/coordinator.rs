//! Sync coordination
//!
//! Decides when and what to synchronize. Two triggers: a single attempt
//! right after a record is created, and a sweep of everything unsynced each
//! time connectivity returns. A record whose sync fails just waits for the
//! next trigger; there is no backoff, retry count, or cancellation.

use tokio::sync::watch;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::outcome::{SyncError, SyncOutcome};
use super::remote::{RemoteClient, RemoteStore};
use crate::models::ColorRecord;
use crate::storage::{ColorStore, StorageResult};

/// Success message for the very first completed sync
const FIRST_SYNC_MESSAGE: &str = "First sync complete!";
/// Success message for every sync after the first
const SYNC_MESSAGE: &str = "Synced to cloud!";

/// Result of a connectivity-restored sweep
#[derive(Debug)]
pub struct SyncReport {
    /// Number of unsynced records gathered for the batch
    pub attempted: usize,
    /// Number marked synced; all of `attempted` or zero
    pub synced: usize,
    /// Failure cause when the batch failed
    pub error: Option<SyncError>,
}

impl SyncReport {
    fn empty() -> Self {
        Self {
            attempted: 0,
            synced: 0,
            error: None,
        }
    }
}

/// Coordinates local records with the remote store
///
/// Constructed by the application root with an explicit remote client and a
/// connectivity subscription; owns no global state.
pub struct SyncCoordinator<R> {
    client: RemoteClient<R>,
    connectivity: watch::Receiver<bool>,
}

impl<R: RemoteStore> SyncCoordinator<R> {
    pub fn new(client: RemoteClient<R>, connectivity: watch::Receiver<bool>) -> Self {
        Self {
            client,
            connectivity,
        }
    }

    /// Current connectivity state as last published by the monitor
    pub fn is_online(&self) -> bool {
        *self.connectivity.borrow()
    }

    /// Immediate-sync trigger, fired once right after record creation
    ///
    /// Offline: the record stays unsynced and the caller is told it was
    /// saved locally; nothing further is scheduled for this record, the
    /// connectivity sweep picks it up later. Online: one upsert attempt,
    /// flag persisted on success, failure reported but not retried.
    pub async fn sync_record(
        &self,
        store: &mut ColorStore,
        record: &ColorRecord,
    ) -> StorageResult<SyncOutcome> {
        if record.synced {
            return Ok(SyncOutcome::Synced {
                message: SYNC_MESSAGE.to_string(),
            });
        }

        if !self.is_online() {
            debug!(hex = %record.hex, "offline, record saved locally");
            return Ok(SyncOutcome::OfflineSavedLocally);
        }

        match self.client.upsert(record).await {
            Ok(()) => {
                store.mark_synced(&[record.id])?;
                let message = self.success_message(store)?;
                info!(hex = %record.hex, "record synced");
                Ok(SyncOutcome::Synced { message })
            }
            Err(e) => {
                warn!(hex = %record.hex, error = %e, "remote write failed");
                Ok(SyncOutcome::Failed(SyncError::RemoteWrite(e)))
            }
        }
    }

    /// Connectivity-restored trigger: sweep every unsynced record
    ///
    /// The whole unsynced set is re-sent as one concurrent batch and the
    /// flags flip together only on full batch success. After a partial
    /// failure the records that did reach the remote are re-sent on the
    /// next sweep; the keyed upsert makes that a harmless overwrite.
    pub async fn sync_pending(&self, store: &mut ColorStore) -> StorageResult<SyncReport> {
        let pending = store.get_unsynced()?;
        if pending.is_empty() {
            return Ok(SyncReport::empty());
        }

        info!(count = pending.len(), "syncing pending records");
        match self.client.upsert_all(&pending).await {
            Ok(()) => {
                let ids: Vec<Uuid> = pending.iter().map(|r| r.id).collect();
                store.mark_synced(&ids)?;
                store.set_synced_before()?;
                info!(count = ids.len(), "pending records synced");
                Ok(SyncReport {
                    attempted: ids.len(),
                    synced: ids.len(),
                    error: None,
                })
            }
            Err(e) => {
                warn!(failed = e.failed, total = e.total, "batch sync failed");
                Ok(SyncReport {
                    attempted: pending.len(),
                    synced: 0,
                    error: Some(SyncError::Batch(e)),
                })
            }
        }
    }

    /// Run until the connectivity monitor goes away, sweeping on every
    /// offline-to-online transition
    ///
    /// Records left over from a previous session are swept immediately when
    /// the device is already online at startup.
    pub async fn run(&self, store: &mut ColorStore) -> StorageResult<()> {
        if self.is_online() {
            self.sync_pending(store).await?;
        }

        let mut rx = self.connectivity.clone();
        loop {
            if rx.changed().await.is_err() {
                // Monitor shut down
                return Ok(());
            }
            let online = *rx.borrow_and_update();
            if online {
                self.sync_pending(store).await?;
            }
        }
    }

    fn success_message(&self, store: &mut ColorStore) -> StorageResult<String> {
        let message = if store.has_synced_before()? {
            SYNC_MESSAGE
        } else {
            FIRST_SYNC_MESSAGE
        };
        store.set_synced_before()?;
        Ok(message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HexColor;
    use crate::sync::remote::MemoryRemoteStore;
    use std::sync::Arc;

    fn record(hex: &str) -> ColorRecord {
        ColorRecord::new(HexColor::parse(hex).unwrap())
    }

    struct Fixture {
        store: ColorStore,
        remote: Arc<MemoryRemoteStore>,
        coordinator: SyncCoordinator<Arc<MemoryRemoteStore>>,
        online_tx: watch::Sender<bool>,
    }

    fn fixture(online: bool) -> Fixture {
        let store = ColorStore::open_in_memory().unwrap();
        let remote = Arc::new(MemoryRemoteStore::new());
        let (online_tx, online_rx) = watch::channel(online);
        let client = RemoteClient::new(remote.clone(), "userColors");
        let coordinator = SyncCoordinator::new(client, online_rx);
        Fixture {
            store,
            remote,
            coordinator,
            online_tx,
        }
    }

    #[tokio::test]
    async fn test_offline_record_saved_locally() {
        let mut f = fixture(false);

        let r = record("#FF8800");
        f.store.insert(&r).unwrap();

        let outcome = f.coordinator.sync_record(&mut f.store, &r).await.unwrap();

        assert!(matches!(outcome, SyncOutcome::OfflineSavedLocally));
        assert!(!f.store.get(r.id).unwrap().unwrap().synced);
        assert!(f.remote.is_empty());
    }

    #[tokio::test]
    async fn test_online_record_synced_immediately() {
        let mut f = fixture(true);

        let r = record("#FF8800");
        f.store.insert(&r).unwrap();

        let outcome = f.coordinator.sync_record(&mut f.store, &r).await.unwrap();

        assert!(outcome.is_synced());
        assert!(f.store.get(r.id).unwrap().unwrap().synced);
        assert!(f.remote.document("userColors", "#FF8800").is_some());
    }

    #[tokio::test]
    async fn test_first_and_subsequent_sync_messages() {
        let mut f = fixture(true);

        let first = record("#111111");
        f.store.insert(&first).unwrap();
        match f
            .coordinator
            .sync_record(&mut f.store, &first)
            .await
            .unwrap()
        {
            SyncOutcome::Synced { message } => assert_eq!(message, "First sync complete!"),
            other => panic!("expected Synced, got {:?}", other),
        }

        let second = record("#222222");
        f.store.insert(&second).unwrap();
        match f
            .coordinator
            .sync_record(&mut f.store, &second)
            .await
            .unwrap()
        {
            SyncOutcome::Synced { message } => assert_eq!(message, "Synced to cloud!"),
            other => panic!("expected Synced, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_failed_write_leaves_record_unsynced() {
        let mut f = fixture(true);
        f.remote.fail_key("#FF8800");

        let r = record("#FF8800");
        f.store.insert(&r).unwrap();

        let outcome = f.coordinator.sync_record(&mut f.store, &r).await.unwrap();

        assert!(matches!(outcome, SyncOutcome::Failed(_)));
        assert!(!f.store.get(r.id).unwrap().unwrap().synced);
    }

    #[tokio::test]
    async fn test_already_synced_record_is_skipped() {
        let mut f = fixture(true);

        let mut r = record("#FF8800");
        r.synced = true;
        f.store.insert(&r).unwrap();

        let outcome = f.coordinator.sync_record(&mut f.store, &r).await.unwrap();

        assert!(outcome.is_synced());
        // No write was issued
        assert_eq!(f.remote.put_calls(), 0);
    }

    #[tokio::test]
    async fn test_offline_then_online_sweep() {
        let mut f = fixture(false);

        let r = record("#FF8800");
        f.store.insert(&r).unwrap();
        let outcome = f.coordinator.sync_record(&mut f.store, &r).await.unwrap();
        assert!(matches!(outcome, SyncOutcome::OfflineSavedLocally));

        // Connectivity returns
        f.online_tx.send(true).unwrap();

        let report = f.coordinator.sync_pending(&mut f.store).await.unwrap();
        assert_eq!(report.attempted, 1);
        assert_eq!(report.synced, 1);
        assert!(report.error.is_none());

        assert!(f.store.get(r.id).unwrap().unwrap().synced);
        assert!(f.remote.document("userColors", "#FF8800").is_some());
    }

    #[tokio::test]
    async fn test_sweep_with_nothing_pending() {
        let mut f = fixture(true);

        let report = f.coordinator.sync_pending(&mut f.store).await.unwrap();
        assert_eq!(report.attempted, 0);
        assert_eq!(f.remote.put_calls(), 0);
    }

    #[tokio::test]
    async fn test_batch_partial_failure_flips_no_flags() {
        let mut f = fixture(true);
        f.remote.fail_key("#222222");

        let a = record("#111111");
        let b = record("#222222");
        f.store.insert(&a).unwrap();
        f.store.insert(&b).unwrap();

        let report = f.coordinator.sync_pending(&mut f.store).await.unwrap();

        assert_eq!(report.attempted, 2);
        assert_eq!(report.synced, 0);
        assert!(report.error.is_some());

        // Flags flip together or not at all
        assert!(!f.store.get(a.id).unwrap().unwrap().synced);
        assert!(!f.store.get(b.id).unwrap().unwrap().synced);

        // The successful write is not rolled back; the next sweep re-sends
        // both and the overwrite is harmless
        assert!(f.remote.document("userColors", "#111111").is_some());

        let retry = f.coordinator.sync_pending(&mut f.store).await.unwrap();
        assert_eq!(retry.attempted, 2);
    }

    #[tokio::test]
    async fn test_duplicate_colors_collapse_remotely() {
        let mut f = fixture(true);

        let a = record("#FF8800");
        let b = record("#FF8800");
        f.store.insert(&a).unwrap();
        f.store.insert(&b).unwrap();

        let report = f.coordinator.sync_pending(&mut f.store).await.unwrap();
        assert_eq!(report.synced, 2);

        // Two local records, one remote document (last write wins)
        assert_eq!(f.store.count().unwrap(), 2);
        assert_eq!(f.remote.len(), 1);
    }

    #[tokio::test]
    async fn test_run_sweeps_on_reconnect() {
        let f = fixture(false);
        let Fixture {
            mut store,
            remote,
            coordinator,
            online_tx,
        } = f;

        let r = record("#FF8800");
        store.insert(&r).unwrap();

        let task = tokio::spawn(async move {
            coordinator.run(&mut store).await.unwrap();
            store
        });

        // Transition to online wakes the sweep; dropping the sender then
        // ends the loop
        online_tx.send(true).unwrap();
        drop(online_tx);

        let store = task.await.unwrap();
        assert!(store.get(r.id).unwrap().unwrap().synced);
        assert!(remote.document("userColors", "#FF8800").is_some());
    }

    #[tokio::test]
    async fn test_run_sweeps_at_startup_when_online() {
        let f = fixture(true);
        let Fixture {
            mut store,
            remote,
            coordinator,
            online_tx,
        } = f;

        let r = record("#FF8800");
        store.insert(&r).unwrap();

        // Leftovers from a previous session sync on launch
        drop(online_tx);
        coordinator.run(&mut store).await.unwrap();

        assert!(store.get(r.id).unwrap().unwrap().synced);
        assert_eq!(remote.len(), 1);
    }
}
