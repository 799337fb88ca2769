//! Redemption record storage
//!
//! This module provides the RedemptionLog component that maintains the
//! append-only record of fulfilled redemptions. Records carry the reward
//! name and cost as copied at redemption time, so retiring or renaming a
//! reward later never changes what a student's record says they received.

use crate::core::traits::RedemptionStore;
use crate::types::{RedemptionRecord, StudentId};
use std::collections::HashMap;

/// Append-only log of redemptions, grouped by student
pub struct RedemptionLog {
    /// Map of student ID to that student's records in append order
    records: HashMap<StudentId, Vec<RedemptionRecord>>,
}

impl RedemptionLog {
    /// Create a new empty redemption log
    pub fn new() -> Self {
        RedemptionLog {
            records: HashMap::new(),
        }
    }

    /// Append a record to its student's log
    pub fn append(&mut self, record: RedemptionRecord) {
        self.records.entry(record.student).or_default().push(record);
    }

    /// Get a student's records in append order
    ///
    /// Returns an empty slice for a student with no redemptions.
    pub fn records_for(&self, student_id: StudentId) -> &[RedemptionRecord] {
        self.records
            .get(&student_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Drop a student's records
    ///
    /// Part of the student-removal cascade. Removing an unknown student is
    /// a no-op.
    pub fn remove_student(&mut self, student_id: StudentId) {
        self.records.remove(&student_id);
    }

    /// Total number of records across all students
    pub fn len(&self) -> usize {
        self.records.values().map(Vec::len).sum()
    }

    /// Whether the log holds no records
    pub fn is_empty(&self) -> bool {
        self.records.values().all(Vec::is_empty)
    }
}

impl Default for RedemptionLog {
    fn default() -> Self {
        Self::new()
    }
}

impl RedemptionStore for RedemptionLog {
    fn append(&mut self, record: RedemptionRecord) {
        RedemptionLog::append(self, record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(student: StudentId, reward_name: &str, points_spent: i64) -> RedemptionRecord {
        RedemptionRecord {
            student,
            reward_name: reward_name.to_string(),
            points_spent,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_new_log_is_empty() {
        let log = RedemptionLog::new();
        assert!(log.is_empty());
        assert_eq!(log.len(), 0);
        assert!(log.records_for(1).is_empty());
    }

    #[test]
    fn test_append_preserves_order() {
        let mut log = RedemptionLog::new();
        log.append(record(1, "Sticker", 10));
        log.append(record(1, "Pencil", 30));

        let names: Vec<&str> = log
            .records_for(1)
            .iter()
            .map(|r| r.reward_name.as_str())
            .collect();
        assert_eq!(names, vec!["Sticker", "Pencil"]);
    }

    #[test]
    fn test_records_grouped_per_student() {
        let mut log = RedemptionLog::new();
        log.append(record(1, "Sticker", 10));
        log.append(record(2, "Badge", 90));

        assert_eq!(log.records_for(1).len(), 1);
        assert_eq!(log.records_for(2).len(), 1);
        assert!(log.records_for(3).is_empty());
    }

    #[test]
    fn test_records_keep_copied_reward_data() {
        let mut log = RedemptionLog::new();
        log.append(record(1, "Sticker", 10));

        let stored = &log.records_for(1)[0];
        assert_eq!(stored.reward_name, "Sticker");
        assert_eq!(stored.points_spent, 10);
    }

    #[test]
    fn test_remove_student_drops_records() {
        let mut log = RedemptionLog::new();
        log.append(record(1, "Sticker", 10));
        log.append(record(2, "Badge", 90));

        log.remove_student(1);

        assert!(log.records_for(1).is_empty());
        assert_eq!(log.records_for(2).len(), 1);
    }
}
