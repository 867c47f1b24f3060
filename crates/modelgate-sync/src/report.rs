// Run reporting
//
// Every phase accumulates the same counters; the run status rolls up as
// success (no failures), failed (every operation failed), or partial.

use std::fmt;

/// What happened to one expected resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Created,
    /// Replaced an existing registration; duplicates_deleted counts the
    /// surplus remote copies removed beyond the one being replaced.
    Replaced { duplicates_deleted: usize },
    Skipped,
    Failed,
}

/// Operation counters for one resource type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResourceReport {
    pub created: usize,
    pub replaced: usize,
    pub skipped: usize,
    pub deleted: usize,
    pub failed: usize,
}

impl ResourceReport {
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Created => self.created += 1,
            Outcome::Replaced { duplicates_deleted } => {
                self.replaced += 1;
                self.deleted += duplicates_deleted;
            }
            Outcome::Skipped => self.skipped += 1,
            Outcome::Failed => self.failed += 1,
        }
    }

    /// Skips are not operations: a phase that only skipped is a success,
    /// and a phase whose every actual operation failed is a failure.
    pub fn status(&self) -> RunStatus {
        if self.failed == 0 {
            RunStatus::Success
        } else if self.created + self.replaced + self.deleted == 0 {
            RunStatus::Failed
        } else {
            RunStatus::Partial
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Success,
    Partial,
    Failed,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RunStatus::Success => "success",
            RunStatus::Partial => "partial",
            RunStatus::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Per-phase reports for one sync run; phases that did not run stay None.
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    pub credentials: Option<ResourceReport>,
    pub models: Option<ResourceReport>,
    pub aliases: Option<ResourceReport>,
    pub fallbacks: Option<ResourceReport>,
}

impl SyncReport {
    pub fn phases(&self) -> impl Iterator<Item = (&'static str, &ResourceReport)> {
        [
            ("credentials", self.credentials.as_ref()),
            ("models", self.models.as_ref()),
            ("aliases", self.aliases.as_ref()),
            ("fallbacks", self.fallbacks.as_ref()),
        ]
        .into_iter()
        .filter_map(|(name, report)| report.map(|report| (name, report)))
    }

    pub fn status(&self) -> RunStatus {
        let mut total = ResourceReport::default();
        for (_, report) in self.phases() {
            total.created += report.created;
            total.replaced += report.replaced;
            total.skipped += report.skipped;
            total.deleted += report.deleted;
            total.failed += report.failed;
        }
        total.status()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_outcome_counts_surplus_deletions() {
        let mut report = ResourceReport::default();
        report.record(Outcome::Replaced {
            duplicates_deleted: 2,
        });
        assert_eq!(report.replaced, 1);
        assert_eq!(report.deleted, 2);
    }

    #[test]
    fn status_rollup() {
        let all_skipped = ResourceReport {
            skipped: 4,
            ..Default::default()
        };
        assert_eq!(all_skipped.status(), RunStatus::Success);

        let mixed = ResourceReport {
            created: 2,
            failed: 1,
            ..Default::default()
        };
        assert_eq!(mixed.status(), RunStatus::Partial);

        let all_failed = ResourceReport {
            failed: 3,
            skipped: 1,
            ..Default::default()
        };
        assert_eq!(all_failed.status(), RunStatus::Failed);
    }

    #[test]
    fn sync_report_skips_absent_phases() {
        let report = SyncReport {
            models: Some(ResourceReport {
                created: 1,
                ..Default::default()
            }),
            ..Default::default()
        };
        let phases: Vec<_> = report.phases().map(|(name, _)| name).collect();
        assert_eq!(phases, vec!["models"]);
        assert_eq!(report.status(), RunStatus::Success);
    }
}
