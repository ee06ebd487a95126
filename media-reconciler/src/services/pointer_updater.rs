//! Pointer updater
//!
//! Rewrites a subject's record to point at the relocated object. The primary
//! pointer field is `profile_image_url`; the legacy `profile_image` field is
//! populated only when it is currently unset, so records written by older
//! code keep whatever value they already carry. `updated_at` is stamped on
//! every write.

use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::stores::RecordStore;
use crate::utils::with_retry;
use serde_json::{Map, Value};
use tracing::debug;

/// Primary pointer field.
pub const POINTER_FIELD: &str = "profile_image_url";
/// Legacy secondary pointer field, populated only when unset.
pub const LEGACY_POINTER_FIELD: &str = "profile_image";

pub struct PointerUpdater<'a> {
    store: &'a dyn RecordStore,
    config: &'a EngineConfig,
}

impl<'a> PointerUpdater<'a> {
    pub fn new(store: &'a dyn RecordStore, config: &'a EngineConfig) -> Self {
        Self { store, config }
    }

    /// Point the subject's record at `new_public_url`.
    ///
    /// A missing record fails with [`Error::NotFound`] immediately (the
    /// subject may have been deleted by an external writer mid-run);
    /// transient write failures are retried.
    pub async fn update_pointer(&self, subject_id: &str, new_public_url: &str) -> Result<()> {
        with_retry(
            "pointer update",
            self.config.max_attempts,
            self.config.pointer_backoff(),
            || self.update_once(subject_id, new_public_url),
        )
        .await
    }

    async fn update_once(&self, subject_id: &str, new_public_url: &str) -> Result<()> {
        let subject = self
            .store
            .get_one(subject_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("player {subject_id}")))?;

        let mut fields = Map::new();
        fields.insert(
            POINTER_FIELD.to_string(),
            Value::String(new_public_url.to_string()),
        );
        fields.insert(
            "updated_at".to_string(),
            Value::String(chrono::Utc::now().to_rfc3339()),
        );

        if !subject.field_is_set(LEGACY_POINTER_FIELD) {
            fields.insert(
                LEGACY_POINTER_FIELD.to_string(),
                Value::String(new_public_url.to_string()),
            );
        }

        self.store.update_fields(subject_id, fields).await?;

        debug!(subject = %subject_id, url = %new_public_url, "Pointer updated");
        Ok(())
    }
}
