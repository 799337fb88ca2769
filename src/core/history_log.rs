//! Point history storage
//!
//! This module provides the HistoryLog component that maintains the
//! append-only audit trail of balance changes. Every applied change and
//! every redemption debit lands here with the balance it produced, so the
//! trail for a student replays to their current balance.
//!
//! Entries are kept per student in append order. Nothing in the engine
//! ever rewrites or removes an entry except the student-removal cascade.

use crate::core::traits::HistoryStore;
use crate::types::{PointHistoryEntry, StudentId};
use std::collections::HashMap;

/// Append-only log of point changes, grouped by student
pub struct HistoryLog {
    /// Map of student ID to that student's entries in append order
    entries: HashMap<StudentId, Vec<PointHistoryEntry>>,
}

impl HistoryLog {
    /// Create a new empty history log
    pub fn new() -> Self {
        HistoryLog {
            entries: HashMap::new(),
        }
    }

    /// Append an entry to its student's trail
    pub fn append(&mut self, entry: PointHistoryEntry) {
        self.entries.entry(entry.student).or_default().push(entry);
    }

    /// Get a student's entries in append order
    ///
    /// Returns an empty slice for a student with no entries.
    pub fn entries_for(&self, student_id: StudentId) -> &[PointHistoryEntry] {
        self.entries
            .get(&student_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Drop a student's entire trail
    ///
    /// Part of the student-removal cascade. Removing an unknown student is
    /// a no-op.
    pub fn remove_student(&mut self, student_id: StudentId) {
        self.entries.remove(&student_id);
    }

    /// Total number of entries across all students
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Whether the log holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.values().all(Vec::is_empty)
    }
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStore for HistoryLog {
    fn append(&mut self, entry: PointHistoryEntry) {
        HistoryLog::append(self, entry);
    }
}
