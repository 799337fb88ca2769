//! Thread-safe redemption storage for async batch processing
//!
//! The async twin of the sync redemption log: per-student append-only
//! records over a `DashMap`, so concurrent redemptions by different
//! students never contend.

use crate::types::{RedemptionRecord, StudentId};
use dashmap::DashMap;

/// Thread-safe append-only log of completed redemptions
///
/// Records carry their own copy of the reward name and cost, so nothing
/// here is invalidated when a catalog entry is retired.
#[derive(Debug)]
pub struct AsyncRedemptionLog {
    /// Concurrent HashMap storing each student's redemptions in append order
    records: DashMap<StudentId, Vec<RedemptionRecord>>,
}

impl AsyncRedemptionLog {
    /// Create a new empty AsyncRedemptionLog
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
        }
    }

    /// Append a record to its student's list (thread-safe)
    pub fn append(&self, record: RedemptionRecord) {
        self.records
            .entry(record.student)
            .or_insert_with(Vec::new)
            .push(record);
    }

    /// Get a snapshot of a student's redemptions in append order
    pub fn records_for(&self, student_id: StudentId) -> Vec<RedemptionRecord> {
        self.records
            .get(&student_id)
            .map(|list| list.clone())
            .unwrap_or_default()
    }

    /// Drop a student's redemption records
    pub fn remove_student(&self, student_id: StudentId) {
        self.records.remove(&student_id);
    }

    /// Total number of records across all students
    pub fn len(&self) -> usize {
        self.records.iter().map(|list| list.value().len()).sum()
    }

    /// Whether the log holds no records at all
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for AsyncRedemptionLog {
    fn default() -> Self {
        Self::new()
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
    fn test_append_and_read_back() {
        let log = AsyncRedemptionLog::new();

        log.append(record(1, "Sticker", 10));
        log.append(record(1, "Homework pass", 50));
        log.append(record(2, "Sticker", 10));

        let records = log.records_for(1);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].reward_name, "Sticker");
        assert_eq!(records[1].points_spent, 50);
        assert_eq!(log.records_for(2).len(), 1);
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn test_unknown_student_has_no_records() {
        let log = AsyncRedemptionLog::new();
        assert!(log.records_for(42).is_empty());
        assert!(log.is_empty());
    }

    #[test]
    fn test_remove_student_drops_records() {
        let log = AsyncRedemptionLog::new();
        log.append(record(1, "Sticker", 10));
        log.append(record(2, "Sticker", 10));

        log.remove_student(1);

        assert!(log.records_for(1).is_empty());
        assert_eq!(log.records_for(2).len(), 1);
    }

    #[test]
    fn test_concurrent_appends_different_students() {
        use std::sync::Arc;
        use std::thread;

        let log = Arc::new(AsyncRedemptionLog::new());
        let mut handles = vec![];

        for i in 1u32..=8 {
            let log_clone = Arc::clone(&log);
            let handle = thread::spawn(move || {
                for _ in 0..5 {
                    log_clone.append(record(i, "Sticker", 10));
                }
            });
            handles.push(handle);
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(log.len(), 40);
        for i in 1u32..=8 {
            assert_eq!(log.records_for(i).len(), 5);
        }
    }
}
