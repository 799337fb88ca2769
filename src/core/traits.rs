//! Store traits for students, rewards, and audit logs
//!
//! This module defines the collaborator boundary the engine consumes. The
//! in-memory synchronous stores implement these traits; a durable backend
//! would plug in behind the same seam. The asynchronous stores keep `&self`
//! inherent methods instead, since their sharded maps do not fit the
//! `&mut self` receivers here.

use crate::types::{
    ClassroomId, PointHistoryEntry, PointsError, RedemptionRecord, Reward, RewardId, Student,
    StudentId,
};

/// Trait for student roster storage
///
/// Provides lookup and atomic read-modify-write persistence of student
/// state. `save` overwrites the stored student with the given snapshot.
pub trait StudentStore {
    /// Find a student by ID
    fn find(&self, student_id: StudentId) -> Option<Student>;

    /// Persist a student snapshot, replacing any stored state
    fn save(&mut self, student: Student) -> Result<(), PointsError>;
}

/// Trait for the append-only point history log
pub trait HistoryStore {
    /// Append one history entry
    ///
    /// Entries are never updated or removed individually; they go away
    /// only when their owning student is removed.
    fn append(&mut self, entry: PointHistoryEntry);
}

/// Trait for reward catalog storage
pub trait RewardStore {
    /// Find a reward by ID
    fn find(&self, reward_id: RewardId) -> Option<Reward>;

    /// List a classroom's rewards ordered ascending by cost
    fn list(&self, classroom: ClassroomId) -> Vec<Reward>;
}

/// Trait for the append-only redemption log
pub trait RedemptionStore {
    /// Append one redemption record
    fn append(&mut self, record: RedemptionRecord);
}
