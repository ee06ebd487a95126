//! Object locator
//!
//! Answers "does a media object exist for this subject in this category?"
//! by probing `{subject_id}.{ext}` for each configured extension candidate,
//! in order. Each candidate's probe is retried on transient error; a
//! candidate whose retries are exhausted is skipped with a warning rather
//! than failing the whole lookup. Read-only.

use crate::config::EngineConfig;
use crate::models::Category;
use crate::stores::ObjectStore;
use crate::utils::with_retry;
use tracing::warn;

/// A media object found in a specific category.
#[derive(Debug, Clone)]
pub struct LocatedObject {
    pub key: String,
    pub public_url: String,
}

pub struct Locator<'a> {
    store: &'a dyn ObjectStore,
    config: &'a EngineConfig,
}

impl<'a> Locator<'a> {
    pub fn new(store: &'a dyn ObjectStore, config: &'a EngineConfig) -> Self {
        Self { store, config }
    }

    /// Look for the subject's object in one category.
    ///
    /// Returns the first extension candidate whose probe succeeds; candidate
    /// order is the tie-break when multiple extensions exist. `None` means
    /// no candidate is present, which is a valid terminal state.
    pub async fn locate(&self, subject_id: &str, category: Category) -> Option<LocatedObject> {
        for ext in &self.config.extensions {
            let key = format!("{subject_id}.{ext}");
            let url = self.store.resolve_public_url(category, &key);

            let probe = with_retry(
                "probe",
                self.config.max_attempts,
                self.config.probe_backoff(),
                || self.store.probe(&url),
            )
            .await;

            match probe {
                Ok(true) => {
                    return Some(LocatedObject { key, public_url: url });
                }
                Ok(false) => {
                    // Candidate answered "not here": move on to the next
                    // extension without burning the retry budget.
                }
                Err(err) => {
                    warn!(
                        key = %key,
                        bucket = %category,
                        error = %err,
                        "Probe failed after retries, trying next extension"
                    );
                }
            }
        }

        None
    }
}
