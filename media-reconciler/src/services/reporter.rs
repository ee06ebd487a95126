//! Reconciliation reporter
//!
//! Accumulates per-account-type counts and the remediation list while the
//! scheduler works through the population, then freezes into an immutable
//! report snapshot rendered as the run summary. The reporter has no failure
//! mode of its own; it only aggregates what the other components record.

use crate::models::Category;
use serde::Serialize;
use std::fmt::Write as _;

/// Scan counters for one account type.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct TypeCounts {
    pub total: usize,
    pub correct: usize,
    pub misplaced: usize,
    pub absent: usize,
}

/// One subject whose media lives in the wrong category.
#[derive(Debug, Clone, Serialize)]
pub struct MisplacedSubject {
    pub subject_id: String,
    pub display_name: String,
    pub source: Category,
    pub canonical: Category,
}

/// Fix counters for one account type (execute mode).
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct FixCounts {
    pub attempted: usize,
    pub successful: usize,
    pub failed: usize,
}

/// Outcome of one attempted fix.
#[derive(Debug, Clone, Serialize)]
pub struct FixOutcome {
    pub subject_id: String,
    pub display_name: String,
    pub account_type: Category,
    pub source: Category,
    pub target: Category,
    pub result: FixResult,
}

#[derive(Debug, Clone, Serialize)]
pub enum FixResult {
    Fixed { new_url: String },
    Failed { reason: String },
}

/// Findings of the scan pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckReport {
    pub total_subjects: usize,
    by_type: [TypeCounts; 5],
    pub misplaced: Vec<MisplacedSubject>,
}

impl CheckReport {
    pub fn counts(&self, category: Category) -> &TypeCounts {
        &self.by_type[category.index()]
    }

    fn counts_mut(&mut self, category: Category) -> &mut TypeCounts {
        &mut self.by_type[category.index()]
    }

    /// Sums across all account types.
    pub fn overall(&self) -> TypeCounts {
        let mut sum = TypeCounts::default();
        for counts in &self.by_type {
            sum.total += counts.total;
            sum.correct += counts.correct;
            sum.misplaced += counts.misplaced;
            sum.absent += counts.absent;
        }
        sum
    }
}

/// Results of the fix pass (execute mode).
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExecuteSummary {
    by_type: [FixCounts; 5],
    pub outcomes: Vec<FixOutcome>,
}

impl ExecuteSummary {
    pub fn counts(&self, category: Category) -> &FixCounts {
        &self.by_type[category.index()]
    }

    pub fn overall(&self) -> FixCounts {
        let mut sum = FixCounts::default();
        for counts in &self.by_type {
            sum.attempted += counts.attempted;
            sum.successful += counts.successful;
            sum.failed += counts.failed;
        }
        sum
    }
}

/// Immutable snapshot of a finished run.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub check: CheckReport,
    pub fixes: Option<ExecuteSummary>,
}

impl Report {
    /// Human-readable run summary. Always renders, even when every subject
    /// failed.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let line = "=".repeat(72);

        let _ = writeln!(out, "{line}");
        let _ = writeln!(out, "Media placement report");
        let _ = writeln!(out, "{line}");
        let _ = writeln!(out, "Subjects scanned: {}", self.check.total_subjects);
        let _ = writeln!(out);

        for category in Category::ALL {
            let counts = self.check.counts(category);
            if counts.total == 0 {
                continue;
            }
            let _ = writeln!(
                out,
                "{} (canonical bucket: {})",
                category.account_type().to_uppercase(),
                category.bucket()
            );
            let _ = writeln!(out, "  total: {}", counts.total);
            let _ = writeln!(out, "  in correct bucket: {}", counts.correct);
            let _ = writeln!(out, "  in wrong bucket: {}", counts.misplaced);
            let _ = writeln!(out, "  no media: {}", counts.absent);
        }

        let overall = self.check.overall();
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Overall: {} correct, {} misplaced, {} without media",
            overall.correct, overall.misplaced, overall.absent
        );

        if !self.check.misplaced.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(
                out,
                "Misplaced subjects ({}):",
                self.check.misplaced.len()
            );
            for category in Category::ALL {
                let of_type: Vec<&MisplacedSubject> = self
                    .check
                    .misplaced
                    .iter()
                    .filter(|m| m.canonical == category)
                    .collect();
                if of_type.is_empty() {
                    continue;
                }
                let _ = writeln!(
                    out,
                    "  {} ({}):",
                    category.account_type().to_uppercase(),
                    of_type.len()
                );
                for item in of_type.iter().take(3) {
                    let _ = writeln!(
                        out,
                        "    {} [{}]: {} -> {}",
                        item.display_name, item.subject_id, item.source, item.canonical
                    );
                }
                if of_type.len() > 3 {
                    let _ = writeln!(out, "    ... and {} more", of_type.len() - 3);
                }
            }
        }

        match &self.fixes {
            Some(fixes) => {
                let overall = fixes.overall();
                let _ = writeln!(out);
                let _ = writeln!(out, "Fix results:");
                let _ = writeln!(out, "  attempted: {}", overall.attempted);
                let _ = writeln!(out, "  successful: {}", overall.successful);
                let _ = writeln!(out, "  failed: {}", overall.failed);
                for outcome in &fixes.outcomes {
                    match &outcome.result {
                        FixResult::Fixed { new_url } => {
                            let _ = writeln!(
                                out,
                                "  OK   {} [{}]: {} -> {} ({})",
                                outcome.display_name,
                                outcome.subject_id,
                                outcome.source,
                                outcome.target,
                                new_url
                            );
                        }
                        FixResult::Failed { reason } => {
                            let _ = writeln!(
                                out,
                                "  FAIL {} [{}]: {} -> {}: {}",
                                outcome.display_name,
                                outcome.subject_id,
                                outcome.source,
                                outcome.target,
                                reason
                            );
                        }
                    }
                }
            }
            None if !self.check.misplaced.is_empty() => {
                let _ = writeln!(out);
                let _ = writeln!(out, "Run again with --execute to relocate misplaced media.");
            }
            None => {}
        }

        out
    }
}

/// Mutable accumulator owned by the scheduler's single processing task.
#[derive(Debug, Default)]
pub struct Reporter {
    check: CheckReport,
    fixes: Option<ExecuteSummary>,
}

impl Reporter {
    pub fn new(execute: bool) -> Self {
        Self {
            check: CheckReport::default(),
            fixes: execute.then(ExecuteSummary::default),
        }
    }

    /// Count a subject against its canonical account type.
    pub fn record_subject(&mut self, canonical: Category) {
        self.check.total_subjects += 1;
        self.check.counts_mut(canonical).total += 1;
    }

    pub fn record_correct(&mut self, canonical: Category) {
        self.check.counts_mut(canonical).correct += 1;
    }

    pub fn record_absent(&mut self, canonical: Category) {
        self.check.counts_mut(canonical).absent += 1;
    }

    pub fn record_misplaced(&mut self, item: MisplacedSubject) {
        self.check.counts_mut(item.canonical).misplaced += 1;
        self.check.misplaced.push(item);
    }

    /// Record a fix attempt (execute mode only).
    pub fn record_fix(&mut self, outcome: FixOutcome) {
        let Some(fixes) = self.fixes.as_mut() else {
            return;
        };
        let counts = &mut fixes.by_type[outcome.account_type.index()];
        counts.attempted += 1;
        match outcome.result {
            FixResult::Fixed { .. } => counts.successful += 1,
            FixResult::Failed { .. } => counts.failed += 1,
        }
        fixes.outcomes.push(outcome);
    }

    /// Freeze into the final snapshot.
    pub fn finish(self) -> Report {
        Report {
            check: self.check,
            fixes: self.fixes,
        }
    }
}
