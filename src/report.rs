//! Outcome of a preload run: one record per attempted entry plus totals.
//!
//! Failures never propagate out of the run; this is where they end up.

use crate::error::Stage;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EntryOutcome {
    /// Every compiler call for the entry succeeded.
    Compiled { calls: usize },
    /// Checked without compiling; `calls` is what a real run would issue.
    Validated { calls: usize },
    /// `issued_calls` is non-zero only when a compound entry failed part way
    /// through compiling.
    Skipped {
        stage: Stage,
        reason: String,
        issued_calls: usize,
    },
}

impl EntryOutcome {
    pub fn is_ok(&self) -> bool {
        !matches!(self, EntryOutcome::Skipped { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryRecord {
    pub operation: String,
    pub index: usize,
    pub family_id: &'static str,
    pub outcome: EntryOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PreloadTotals {
    pub operations: usize,
    pub unknown_operations: usize,
    pub entries: usize,
    /// Entries that compiled, or passed `check` when nothing is compiled.
    pub succeeded: usize,
    pub skipped: usize,
    pub compile_calls: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PreloadReport {
    pub records: Vec<EntryRecord>,
    pub unknown_operations: Vec<String>,
    pub totals: PreloadTotals,
}

impl PreloadReport {
    pub(crate) fn note_operation(&mut self) {
        self.totals.operations += 1;
    }

    pub(crate) fn note_unknown(&mut self, name: &str) {
        self.totals.unknown_operations += 1;
        self.unknown_operations.push(name.to_string());
    }

    pub(crate) fn push(&mut self, record: EntryRecord) {
        self.totals.entries += 1;
        match &record.outcome {
            EntryOutcome::Compiled { calls } | EntryOutcome::Validated { calls } => {
                self.totals.succeeded += 1;
                self.totals.compile_calls += calls;
            }
            EntryOutcome::Skipped { issued_calls, .. } => {
                self.totals.skipped += 1;
                self.totals.compile_calls += issued_calls;
            }
        }
        self.records.push(record);
    }

    /// Records for one operation, in entry order.
    pub fn for_operation<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a EntryRecord> + 'a {
        self.records.iter().filter(move |r| r.operation == name)
    }

    pub fn all_ok(&self) -> bool {
        self.totals.skipped == 0 && self.totals.unknown_operations == 0
    }
}
