//! Relocator
//!
//! Moves one object from its current bucket to the canonical one:
//! download, upload with overwrite, resolve the new public URL, then delete
//! the source copy. The delete is the one non-fatal step: correctness of
//! the canonical pointer matters more than eager cleanup, so a failed
//! delete logs a warning and the relocation still counts as done, leaving a
//! stale source copy behind (expected dual-presence until a later run or
//! manual cleanup).
//!
//! Download and upload each retry independently; on top of that the whole
//! sequence re-runs from scratch if a fatal step exhausts its budget.

use crate::config::EngineConfig;
use crate::error::Result;
use crate::models::MigrationTask;
use crate::stores::ObjectStore;
use crate::utils::with_retry;
use tracing::{debug, info, warn};

/// Successful relocation: the object now lives at the canonical address.
#[derive(Debug, Clone)]
pub struct Relocated {
    pub new_public_url: String,
}

pub struct Relocator<'a> {
    store: &'a dyn ObjectStore,
    config: &'a EngineConfig,
}

impl<'a> Relocator<'a> {
    pub fn new(store: &'a dyn ObjectStore, config: &'a EngineConfig) -> Self {
        Self { store, config }
    }

    /// Execute one migration task.
    pub async fn relocate(&self, task: &MigrationTask) -> Result<Relocated> {
        with_retry(
            "relocate",
            self.config.max_attempts,
            self.config.relocate_backoff(),
            || self.relocate_once(task),
        )
        .await
    }

    async fn relocate_once(&self, task: &MigrationTask) -> Result<Relocated> {
        let key = &task.object_key;
        debug!(
            subject = %task.subject_id,
            key = %key,
            from = %task.source,
            to = %task.target,
            "Relocating object"
        );

        // Step 1: download from the source bucket. Nothing has been written
        // yet, so failure here is clean.
        let bytes = with_retry(
            "download",
            self.config.max_attempts,
            self.config.transfer_backoff(),
            || self.store.read(task.source, key),
        )
        .await?;

        // Step 2: upload to the target bucket with overwrite. From here the
        // object exists in both buckets until the delete lands.
        let payload = bytes.clone();
        with_retry(
            "upload",
            self.config.max_attempts,
            self.config.transfer_backoff(),
            move || {
                let payload = payload.clone();
                async move { self.store.write(task.target, key, payload).await }
            },
        )
        .await?;

        // Step 3: the object's new address.
        let new_public_url = self.store.resolve_public_url(task.target, key);

        // Step 4: delete the source copy. Non-fatal: the canonical copy and
        // pointer are what matter.
        if let Err(err) = self.store.delete(task.source, key).await {
            warn!(
                subject = %task.subject_id,
                key = %key,
                bucket = %task.source,
                error = %err,
                "Source delete failed, stale copy left behind"
            );
        }

        info!(
            subject = %task.subject_id,
            key = %key,
            from = %task.source,
            to = %task.target,
            "Object relocated"
        );

        Ok(Relocated { new_public_url })
    }
}
