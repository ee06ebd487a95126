//! Batch scheduler
//!
//! Drives the whole reconciliation run: load the population once, partition
//! it into fixed-size batches, and walk every subject strictly sequentially
//! through classify → scan → (execute mode) relocate → pointer update.
//!
//! There is deliberately no parallelism anywhere in this engine. Firing
//! concurrent probes at the stores has exhausted client-side network
//! resources before; the cure is sequential processing plus explicit
//! cooldown sleeps, owned by the single [`Pacer`] built here. Per-subject
//! failures are converted into report entries at the subject boundary and
//! never abort the batch or the run; only the initial population fetch is
//! fatal.

use crate::config::EngineConfig;
use crate::error::Result;
use crate::models::{Category, MigrationTask, Subject};
use crate::services::classifier::classify;
use crate::services::locator::Locator;
use crate::services::pointer_updater::PointerUpdater;
use crate::services::relocator::Relocator;
use crate::services::reporter::{
    FixOutcome, FixResult, MisplacedSubject, Report, Reporter,
};
use crate::services::scanner::{ScanHit, Scanner};
use crate::stores::{ObjectStore, RecordStore};
use crate::utils::Pacer;
use tracing::{debug, info, warn};

/// Reason recorded when the object moved but the record write failed.
/// Operators grep for this to find subjects needing pointer-only repair.
pub const DB_UPDATE_FAILED: &str = "Database update failed";

/// What a run is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Scan and report only; no writes anywhere.
    Check,
    /// Scan, then relocate misplaced objects and update record pointers.
    Execute,
}

/// Fixed-size partitioning of the subject population, in stable input
/// order. Pacing between batches is inserted by the run loop, not here.
pub struct BatchPlan<'s> {
    subjects: &'s [Subject],
    batch_size: usize,
}

impl<'s> BatchPlan<'s> {
    pub fn new(subjects: &'s [Subject], batch_size: usize) -> Self {
        Self {
            subjects,
            batch_size: batch_size.max(1),
        }
    }

    pub fn batch_count(&self) -> usize {
        self.subjects.len().div_ceil(self.batch_size)
    }

    /// Batches with their zero-based index.
    pub fn batches(&self) -> impl Iterator<Item = (usize, &'s [Subject])> {
        self.subjects.chunks(self.batch_size).enumerate()
    }
}

pub struct Scheduler<'a> {
    records: &'a dyn RecordStore,
    objects: &'a dyn ObjectStore,
    config: &'a EngineConfig,
}

impl<'a> Scheduler<'a> {
    pub fn new(
        records: &'a dyn RecordStore,
        objects: &'a dyn ObjectStore,
        config: &'a EngineConfig,
    ) -> Self {
        Self { records, objects, config }
    }

    /// Run a full reconciliation pass and return the final report.
    pub async fn run(&self, mode: RunMode) -> Result<Report> {
        // The one fatal failure: without the population there is nothing to
        // process.
        let mut subjects = self.records.get_all().await?;
        info!(total = subjects.len(), "Loaded subject population");

        if let Some(filter) = self.config.account_filter {
            subjects.retain(|s| classify(s) == filter);
            info!(
                account_type = filter.account_type(),
                remaining = subjects.len(),
                "Applied account-type filter"
            );
        }

        let pacer = Pacer::new(self.config.request_delay(), self.config.batch_delay());
        let scanner = Scanner::new(Locator::new(self.objects, self.config));
        let mut reporter = Reporter::new(mode == RunMode::Execute);

        let plan = BatchPlan::new(&subjects, self.config.batch_size);
        let batch_count = plan.batch_count();

        for (batch_index, batch) in plan.batches() {
            info!(
                batch = batch_index + 1,
                of = batch_count,
                size = batch.len(),
                "Processing batch"
            );

            for subject in batch {
                self.process_subject(subject, mode, &scanner, &pacer, &mut reporter)
                    .await;
            }

            // Cooldown between batches, skipped after the last one.
            if batch_index + 1 < batch_count {
                pacer.between_batches().await;
            }
        }

        Ok(reporter.finish())
    }

    /// Handle one subject end to end. Never returns an error: every outcome
    /// becomes a report entry.
    async fn process_subject(
        &self,
        subject: &Subject,
        mode: RunMode,
        scanner: &Scanner<'a>,
        pacer: &Pacer,
        reporter: &mut Reporter,
    ) {
        let canonical = classify(subject);
        reporter.record_subject(canonical);

        debug!(
            subject = %subject.id,
            name = %subject.display_name(),
            account_type = canonical.account_type(),
            "Scanning subject"
        );

        let Some(hit) = scanner.scan(&subject.id, canonical, pacer).await else {
            reporter.record_absent(canonical);
            return;
        };

        if hit.category == canonical {
            reporter.record_correct(canonical);
            return;
        }

        warn!(
            subject = %subject.id,
            found_in = %hit.category,
            canonical = %canonical,
            "Media object in wrong bucket"
        );
        reporter.record_misplaced(MisplacedSubject {
            subject_id: subject.id.clone(),
            display_name: subject.display_name().to_string(),
            source: hit.category,
            canonical,
        });

        if mode == RunMode::Execute {
            let outcome = self.fix_subject(subject, canonical, &hit).await;
            reporter.record_fix(outcome);
        }
    }

    /// Relocate one misplaced object and repoint its record.
    async fn fix_subject(
        &self,
        subject: &Subject,
        canonical: Category,
        hit: &ScanHit,
    ) -> FixOutcome {
        let task = MigrationTask {
            subject_id: subject.id.clone(),
            source: hit.category,
            target: canonical,
            object_key: hit.key.clone(),
        };

        let relocator = Relocator::new(self.objects, self.config);
        let updater = PointerUpdater::new(self.records, self.config);

        let result = match relocator.relocate(&task).await {
            Err(err) => {
                warn!(subject = %subject.id, error = %err, "Relocation failed");
                FixResult::Failed { reason: err.to_string() }
            }
            Ok(relocated) => {
                match updater
                    .update_pointer(&subject.id, &relocated.new_public_url)
                    .await
                {
                    Ok(()) => FixResult::Fixed { new_url: relocated.new_public_url },
                    Err(err) => {
                        // The object has moved but the record still points at
                        // the old address. Surfaced distinctly so a
                        // pointer-only repair can be re-run.
                        warn!(
                            subject = %subject.id,
                            error = %err,
                            "Object relocated but record update failed"
                        );
                        FixResult::Failed { reason: DB_UPDATE_FAILED.to_string() }
                    }
                }
            }
        };

        FixOutcome {
            subject_id: subject.id.clone(),
            display_name: subject.display_name().to_string(),
            account_type: canonical,
            source: hit.category,
            target: canonical,
            result,
        }
    }
}
