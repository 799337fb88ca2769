//! Points processing orchestration for async batch processing
//!
//! This module provides the `AsyncPointsEngine`, the concurrent counterpart
//! of the synchronous `PointsEngine`. It applies the same business rules
//! over thread-safe stores so batches of operations can be processed in
//! parallel across students.
//!
//! # Architecture
//!
//! ```text
//! AsyncPointsEngine
//!     ├── Arc<AsyncStudentRoster>  (thread-safe roster state)
//!     ├── Arc<AsyncRewardCatalog>  (thread-safe reward catalog)
//!     ├── Arc<AsyncHistoryLog>     (thread-safe point history)
//!     └── Arc<AsyncRedemptionLog>  (thread-safe redemption records)
//! ```
//!
//! # Thread Safety
//!
//! The engine is cloneable and safe to share across tasks; clones operate
//! on the same ledger. Balance mutations run inside the owning student's
//! roster entry lock via the roster's closure-based `update`, so the
//! balance check, the write, and the audit appends for one student form a
//! single atomic step even under contention.
//!
//! Every path that touches more than one store takes the roster entry
//! first and the log entries inside it, never the reverse. Keeping that
//! order uniform is what keeps the nested appends deadlock-free.
use std::sync::Arc;

use crate::core::rankings::compute_rankings;
use crate::types::{
    classify, ChangeOutcome, ClassroomId, OperationRecord, OperationType, PointHistoryEntry,
    Points, PointsError, RankingEntry, RedemptionRecord, Reward, RewardId, Student, StudentId,
};
use chrono::Utc;

use super::{AsyncHistoryLog, AsyncRedemptionLog, AsyncRewardCatalog, AsyncStudentRoster};

/// Thread-safe points processing engine
///
/// `AsyncPointsEngine` coordinates operation processing across thread-safe
/// roster, catalog, and audit log components. Operations on different
/// students proceed concurrently; operations on the same student serialize
/// on that student's roster entry.
#[derive(Debug, Clone)]
pub struct AsyncPointsEngine {
    /// Thread-safe student roster (shared via Arc)
    roster: Arc<AsyncStudentRoster>,

    /// Thread-safe reward catalog (shared via Arc)
    catalog: Arc<AsyncRewardCatalog>,

    /// Thread-safe point history log (shared via Arc)
    history: Arc<AsyncHistoryLog>,

    /// Thread-safe redemption log (shared via Arc)
    redemptions: Arc<AsyncRedemptionLog>,
}

impl AsyncPointsEngine {
    /// Create a new AsyncPointsEngine over shared stores
    ///
    /// The stores are passed in rather than constructed here so callers
    /// can keep their own handles for inspection after processing
    /// completes.
    pub fn new(
        roster: Arc<AsyncStudentRoster>,
        catalog: Arc<AsyncRewardCatalog>,
        history: Arc<AsyncHistoryLog>,
        redemptions: Arc<AsyncRedemptionLog>,
    ) -> Self {
        Self {
            roster,
            catalog,
            history,
            redemptions,
        }
    }

    /// Process a single operation record
    ///
    /// Routes the operation to the appropriate handler. Field presence is
    /// validated in the handlers, exactly as the sync engine does it.
    pub fn process_operation(&self, record: OperationRecord) -> Result<(), PointsError> {
        match record.op_type {
            OperationType::Enroll => self.process_enroll(record),
            OperationType::Reward => self.process_reward(record),
            OperationType::Award => self.process_award(record),
            OperationType::Deduct => self.process_deduct(record),
            OperationType::Redeem => self.process_redeem(record),
            OperationType::Unenroll => self.process_unenroll(record),
            OperationType::Retire => self.process_retire(record),
        }
    }

    /// Process an enrollment operation
    ///
    /// Roster positions derive from the classroom size at enrollment time.
    /// The batch processor runs administrative operations sequentially, so
    /// positions come out deterministic there.
    fn process_enroll(&self, record: OperationRecord) -> Result<(), PointsError> {
        let classroom = record
            .classroom
            .ok_or_else(|| PointsError::missing_field("enroll", "classroom"))?;
        let student_id = record
            .student
            .ok_or_else(|| PointsError::missing_field("enroll", "student"))?;
        let name = record
            .text
            .ok_or_else(|| PointsError::missing_field("enroll", "text"))?;

        let mut student = Student::new(student_id, classroom, name);
        student.total_points = record.points.unwrap_or(0);
        student.order_number = self.roster.count_in(classroom) as u32 + 1;

        self.roster.enroll(student)
    }

    /// Process a reward catalog addition
    fn process_reward(&self, record: OperationRecord) -> Result<(), PointsError> {
        let classroom = record
            .classroom
            .ok_or_else(|| PointsError::missing_field("reward", "classroom"))?;
        let reward_id = record
            .reward
            .ok_or_else(|| PointsError::missing_field("reward", "reward"))?;
        let cost = record
            .points
            .ok_or_else(|| PointsError::missing_field("reward", "points"))?;
        let name = record
            .text
            .ok_or_else(|| PointsError::missing_field("reward", "text"))?;

        self.catalog.add(Reward::new(reward_id, classroom, name, cost))
    }

    /// Process an award operation
    fn process_award(&self, record: OperationRecord) -> Result<(), PointsError> {
        let student_id = record
            .student
            .ok_or_else(|| PointsError::missing_field("award", "student"))?;
        let points = record
            .points
            .ok_or_else(|| PointsError::missing_field("award", "points"))?;

        if points <= 0 {
            return Err(PointsError::validation("award amount must be positive"));
        }

        self.apply_point_change(student_id, points, record.text.unwrap_or_default())?;
        Ok(())
    }

    /// Process a deduction operation
    fn process_deduct(&self, record: OperationRecord) -> Result<(), PointsError> {
        let student_id = record
            .student
            .ok_or_else(|| PointsError::missing_field("deduct", "student"))?;
        let points = record
            .points
            .ok_or_else(|| PointsError::missing_field("deduct", "points"))?;
        let reason = record
            .text
            .ok_or_else(|| PointsError::missing_field("deduct", "text"))?;

        if points <= 0 {
            return Err(PointsError::validation("deduction amount must be positive"));
        }

        // Deductions must carry a justification
        if reason.trim().is_empty() {
            return Err(PointsError::validation(
                "a deduction requires a non-empty reason",
            ));
        }

        self.apply_point_change(student_id, -points, reason)?;
        Ok(())
    }

    /// Process a redemption operation
    fn process_redeem(&self, record: OperationRecord) -> Result<(), PointsError> {
        let student_id = record
            .student
            .ok_or_else(|| PointsError::missing_field("redeem", "student"))?;
        let reward_id = record
            .reward
            .ok_or_else(|| PointsError::missing_field("redeem", "reward"))?;

        self.redeem(student_id, reward_id)?;
        Ok(())
    }

    /// Process an unenrollment operation
    fn process_unenroll(&self, record: OperationRecord) -> Result<(), PointsError> {
        let student_id = record
            .student
            .ok_or_else(|| PointsError::missing_field("unenroll", "student"))?;

        self.remove_student(student_id)?;
        Ok(())
    }

    /// Process a reward retirement operation
    fn process_retire(&self, record: OperationRecord) -> Result<(), PointsError> {
        let reward_id = record
            .reward
            .ok_or_else(|| PointsError::missing_field("retire", "reward"))?;

        self.catalog.remove(reward_id)?;
        Ok(())
    }

    /// Apply a signed point change to a student's balance (atomic)
    ///
    /// The balance check, the write, and the history append all run inside
    /// the student's roster entry lock, so concurrent changes to the same
    /// student serialize and every history entry's `points_after` matches
    /// the balance it produced. Semantics match the sync engine: the
    /// change is rejected if it would drive the balance below zero, and
    /// only a positive change that lands in a new tier reports a rank
    /// increase.
    pub fn apply_point_change(
        &self,
        student_id: StudentId,
        change: Points,
        reason: impl Into<String>,
    ) -> Result<ChangeOutcome, PointsError> {
        let reason = reason.into();
        let history = Arc::clone(&self.history);

        self.roster.update(student_id, move |student| {
            let previous_total = student.total_points;
            let new_total = previous_total
                .checked_add(change)
                .ok_or_else(|| PointsError::arithmetic_overflow("apply_change", student_id))?;

            // Check before any write
            if new_total < 0 {
                return Err(PointsError::invalid_change(
                    student_id,
                    previous_total,
                    change,
                ));
            }

            student.total_points = new_total;

            // Appended inside the entry lock so the trail stays in balance order
            history.append(PointHistoryEntry {
                student: student_id,
                change,
                reason,
                points_after: new_total,
                timestamp: Utc::now(),
            });

            Ok(ChangeOutcome {
                rank_increased: classify(new_total) != classify(previous_total) && change > 0,
                student: student.clone(),
            })
        })
    }

    /// Redeem a reward for a student (atomic)
    ///
    /// The reward is snapshotted up front; the balance check, the debit,
    /// and both audit appends then run inside the student's roster entry
    /// lock. Two concurrent redemptions by the same student both see a
    /// consistent balance, so at most one succeeds when funds only cover
    /// one.
    pub fn redeem(
        &self,
        student_id: StudentId,
        reward_id: RewardId,
    ) -> Result<Student, PointsError> {
        if self.roster.get(student_id).is_none() {
            return Err(PointsError::student_not_found(student_id));
        }

        let reward = self
            .catalog
            .get(reward_id)
            .ok_or_else(|| PointsError::reward_not_found(reward_id))?;

        let history = Arc::clone(&self.history);
        let redemptions = Arc::clone(&self.redemptions);

        self.roster.update(student_id, move |student| {
            if student.total_points < reward.points_required {
                return Err(PointsError::insufficient_points(
                    student_id,
                    reward.points_required,
                    student.total_points,
                ));
            }

            let new_total = student
                .total_points
                .checked_sub(reward.points_required)
                .ok_or_else(|| PointsError::arithmetic_overflow("spend", student_id))?;
            student.total_points = new_total;

            let now = Utc::now();

            redemptions.append(RedemptionRecord {
                student: student_id,
                reward_name: reward.name.clone(),
                points_spent: reward.points_required,
                timestamp: now,
            });

            history.append(PointHistoryEntry {
                student: student_id,
                change: -reward.points_required,
                reason: format!("Redeemed reward: {}", reward.name),
                points_after: new_total,
                timestamp: now,
            });

            Ok(student.clone())
        })
    }

    /// Compute a classroom's ranking view from a roster snapshot
    pub fn rankings(&self, classroom: ClassroomId, limit: Option<usize>) -> Vec<RankingEntry> {
        let students = self.roster.students_in(classroom);
        compute_rankings(students.iter(), limit)
    }

    /// Compute ranking views for every classroom with students
    ///
    /// Classrooms are returned in ascending ID order for deterministic
    /// output.
    pub fn rankings_by_classroom(
        &self,
        limit: Option<usize>,
    ) -> Vec<(ClassroomId, Vec<RankingEntry>)> {
        let mut classrooms: Vec<ClassroomId> =
            self.roster.get_all().iter().map(|s| s.classroom).collect();
        classrooms.sort_unstable();
        classrooms.dedup();

        classrooms
            .into_iter()
            .map(|classroom| (classroom, self.rankings(classroom, limit)))
            .collect()
    }

    /// Enroll a student
    pub fn enroll_student(&self, student: Student) -> Result<(), PointsError> {
        self.roster.enroll(student)
    }

    /// Add a reward to the catalog
    pub fn add_reward(&self, reward: Reward) -> Result<(), PointsError> {
        self.catalog.add(reward)
    }

    /// Update a student's profile fields (atomic)
    ///
    /// Partial update; never touches the balance or the audit trail.
    pub fn update_student(
        &self,
        student_id: StudentId,
        name: Option<String>,
        order_number: Option<u32>,
        avatar: Option<String>,
    ) -> Result<Student, PointsError> {
        self.roster.update(student_id, move |student| {
            if let Some(name) = name {
                student.name = name;
            }
            if let Some(order_number) = order_number {
                student.order_number = order_number;
            }
            if let Some(avatar) = avatar {
                student.avatar = Some(avatar);
            }
            Ok(student.clone())
        })
    }

    /// Remove a student and their audit records
    pub fn remove_student(&self, student_id: StudentId) -> Result<Student, PointsError> {
        let student = self.roster.remove(student_id)?;
        self.history.remove_student(student_id);
        self.redemptions.remove_student(student_id);
        Ok(student)
    }

    /// Remove a classroom's students and rewards
    ///
    /// Returns how many students and rewards were removed; an unknown
    /// classroom removes nothing and is not an error.
    pub fn remove_classroom(&self, classroom: ClassroomId) -> (usize, usize) {
        let students = self.roster.remove_classroom(classroom);
        for student in &students {
            self.history.remove_student(student.id);
            self.redemptions.remove_student(student.id);
        }
        let rewards = self.catalog.remove_classroom(classroom);
        (students.len(), rewards.len())
    }

    /// Get a snapshot of a student
    pub fn get_student(&self, student_id: StudentId) -> Option<Student> {
        self.roster.get(student_id)
    }

    /// Get a snapshot of a classroom's students in roster order
    pub fn students_in(&self, classroom: ClassroomId) -> Vec<Student> {
        self.roster.students_in(classroom)
    }

    /// Get a snapshot of a classroom's rewards in ascending cost order
    pub fn rewards_in(&self, classroom: ClassroomId) -> Vec<Reward> {
        self.catalog.list_for(classroom)
    }

    /// Get a snapshot of a student's point history in append order
    ///
    /// # Errors
    ///
    /// Returns an error if the student is not enrolled.
    pub fn history_for(
        &self,
        student_id: StudentId,
    ) -> Result<Vec<PointHistoryEntry>, PointsError> {
        if self.roster.get(student_id).is_none() {
            return Err(PointsError::student_not_found(student_id));
        }
        Ok(self.history.entries_for(student_id))
    }

    /// Get a snapshot of a student's redemption records in append order
    ///
    /// # Errors
    ///
    /// Returns an error if the student is not enrolled.
    pub fn redemptions_for(
        &self,
        student_id: StudentId,
    ) -> Result<Vec<RedemptionRecord>, PointsError> {
        if self.roster.get(student_id).is_none() {
            return Err(PointsError::student_not_found(student_id));
        }
        Ok(self.redemptions.records_for(student_id))
    }
}
