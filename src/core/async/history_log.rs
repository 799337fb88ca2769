//! Thread-safe point history storage for async batch processing
//!
//! This module provides the `AsyncHistoryLog` struct, which stores the
//! append-only audit trail using concurrent data structures so multiple
//! worker tasks can record changes for different students simultaneously.
//!
//! Appends for one student are serialized by the student's map entry, which
//! keeps each per-student trail in application order.

use crate::types::{PointHistoryEntry, StudentId};
use dashmap::DashMap;

/// Thread-safe append-only log of point changes
///
/// Entries are grouped per student. Within a student the `Vec` preserves
/// append order, so `points_after` values replay cleanly; across students
/// no ordering is defined.
#[derive(Debug)]
pub struct AsyncHistoryLog {
    /// Concurrent HashMap storing each student's trail in append order
    entries: DashMap<StudentId, Vec<PointHistoryEntry>>,
}

impl AsyncHistoryLog {
    /// Create a new empty AsyncHistoryLog
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Append an entry to its student's trail (thread-safe)
    pub fn append(&self, entry: PointHistoryEntry) {
        self.entries
            .entry(entry.student)
            .or_insert_with(Vec::new)
            .push(entry);
    }

    /// Get a snapshot of a student's trail in append order
    ///
    /// A student with no recorded changes yields an empty vec.
    pub fn entries_for(&self, student_id: StudentId) -> Vec<PointHistoryEntry> {
        self.entries
            .get(&student_id)
            .map(|trail| trail.clone())
            .unwrap_or_default()
    }

    /// Drop a student's entire trail
    ///
    /// Called when the student is unenrolled. Unknown students are a no-op.
    pub fn remove_student(&self, student_id: StudentId) {
        self.entries.remove(&student_id);
    }

    /// Total number of entries across all students
    pub fn len(&self) -> usize {
        self.entries.iter().map(|trail| trail.value().len()).sum()
    }

    /// Whether the log holds no entries at all
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for AsyncHistoryLog {
    fn default() -> Self {
        Self::new()
    }
}
