//! Points ledger engine
//!
//! This module provides the PointsEngine that orchestrates operation
//! processing by coordinating the StudentRoster, RewardCatalog, HistoryLog,
//! and RedemptionLog components.
//!
//! The engine enforces business rules such as:
//! - The non-negative balance invariant (checked before any write)
//! - Required justification for deductions
//! - Redemption as one atomic unit (debit, redemption record, history entry)
//! - Cascading removal of audit records with their student

use crate::core::history_log::HistoryLog;
use crate::core::rankings::compute_rankings;
use crate::core::redemption_log::RedemptionLog;
use crate::core::reward_catalog::RewardCatalog;
use crate::core::student_roster::StudentRoster;
use crate::types::{
    classify, ChangeOutcome, ClassroomId, OperationRecord, OperationType, PointHistoryEntry,
    Points, PointsError, RankingEntry, RedemptionRecord, Reward, RewardId, Student, StudentId,
};
use chrono::Utc;

/// Points processing engine
///
/// Orchestrates operation processing by coordinating the roster, catalog,
/// and audit logs. Enforces business rules and maintains ledger invariants.
/// The engine holds no state of its own between calls; everything lives in
/// the stores it owns.
pub struct PointsEngine {
    roster: StudentRoster,
    catalog: RewardCatalog,
    history: HistoryLog,
    redemptions: RedemptionLog,
}

impl PointsEngine {
    /// Create a new PointsEngine
    ///
    /// Initializes an empty engine with no students or rewards.
    pub fn new() -> Self {
        PointsEngine {
            roster: StudentRoster::new(),
            catalog: RewardCatalog::new(),
            history: HistoryLog::new(),
            redemptions: RedemptionLog::new(),
        }
    }

    /// Process a single operation record
    ///
    /// Routes the operation to the appropriate handler based on operation
    /// type. Field presence is validated here, so records arriving from any
    /// input layer are checked the same way.
    ///
    /// # Arguments
    ///
    /// * `record` - The operation record to process
    ///
    /// # Returns
    ///
    /// * `Ok(())` if the operation was processed successfully
    /// * `Err(PointsError)` if the operation failed
    pub fn process(&mut self, record: OperationRecord) -> Result<(), PointsError> {
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
    /// Requires the classroom, student, and text (display name) fields.
    /// The points field is an optional starting balance, defaulting to
    /// zero. The student's roster position is assigned from the current
    /// classroom size.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A required field is missing
    /// - The student ID is already enrolled
    /// - The starting balance is negative
    fn process_enroll(&mut self, record: OperationRecord) -> Result<(), PointsError> {
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
    ///
    /// Requires the classroom, reward, points (cost), and text (name)
    /// fields.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A required field is missing
    /// - The reward ID already exists
    /// - The cost is not positive
    fn process_reward(&mut self, record: OperationRecord) -> Result<(), PointsError> {
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
    ///
    /// Requires the student and points fields; the amount must be
    /// positive. The text field is an optional reason.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A required field is missing
    /// - The amount is not positive
    /// - The student is not enrolled
    fn process_award(&mut self, record: OperationRecord) -> Result<(), PointsError> {
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
    ///
    /// Requires the student, points, and text fields; the amount must be
    /// positive and the text is the mandatory justification. The deduction
    /// is applied as a negative change, subject to the non-negative balance
    /// invariant.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A required field is missing
    /// - The amount is not positive
    /// - The justification is blank
    /// - The student is not enrolled
    /// - The change would drive the balance below zero
    fn process_deduct(&mut self, record: OperationRecord) -> Result<(), PointsError> {
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
    ///
    /// Requires the student and reward fields.
    fn process_redeem(&mut self, record: OperationRecord) -> Result<(), PointsError> {
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
    ///
    /// Requires the student field. Cascades to the student's audit records.
    fn process_unenroll(&mut self, record: OperationRecord) -> Result<(), PointsError> {
        let student_id = record
            .student
            .ok_or_else(|| PointsError::missing_field("unenroll", "student"))?;

        self.remove_student(student_id)?;
        Ok(())
    }

    /// Process a reward retirement operation
    ///
    /// Requires the reward field. Past redemption records are unaffected.
    fn process_retire(&mut self, record: OperationRecord) -> Result<(), PointsError> {
        let reward_id = record
            .reward
            .ok_or_else(|| PointsError::missing_field("retire", "reward"))?;

        self.catalog.remove(reward_id)?;
        Ok(())
    }

    /// Apply a signed point change to a student's balance
    ///
    /// Validates the resulting balance before writing, updates the balance,
    /// and appends a history entry recording the change and the balance it
    /// produced. The outcome reports whether the change lifted the student
    /// into a higher tier: a tier change only counts as a rank increase
    /// when the change itself was positive, so a deduction that drops a
    /// tier reports false.
    ///
    /// # Arguments
    ///
    /// * `student_id` - The student whose balance changes
    /// * `change` - Signed delta to apply
    /// * `reason` - Free-text reason recorded in the history entry
    ///
    /// # Returns
    ///
    /// * `Ok(ChangeOutcome)` - The updated student and the rank signal
    /// * `Err(PointsError)` - If the student is unknown or the change is
    ///   invalid; the balance and history are untouched
    pub fn apply_point_change(
        &mut self,
        student_id: StudentId,
        change: Points,
        reason: impl Into<String>,
    ) -> Result<ChangeOutcome, PointsError> {
        let applied = self.roster.apply_change(student_id, change)?;

        let old_tier = classify(applied.previous_total);
        let new_tier = classify(applied.student.total_points);

        self.history.append(PointHistoryEntry {
            student: student_id,
            change,
            reason: reason.into(),
            points_after: applied.student.total_points,
            timestamp: Utc::now(),
        });

        Ok(ChangeOutcome {
            rank_increased: new_tier != old_tier && change > 0,
            student: applied.student,
        })
    }

    /// Redeem a reward for a student
    ///
    /// Checks that both the student and the reward exist and that the
    /// balance covers the cost, then applies the three effects as one
    /// unit: the balance debit, a redemption record carrying the reward's
    /// name and cost as of now, and a history entry for the debit. A
    /// failure at any check leaves every store untouched.
    ///
    /// # Arguments
    ///
    /// * `student_id` - The student redeeming
    /// * `reward_id` - The reward being redeemed
    ///
    /// # Returns
    ///
    /// * `Ok(Student)` - Snapshot after the debit
    /// * `Err(PointsError)` - If the student or reward is unknown, or the
    ///   balance is short of the cost
    pub fn redeem(
        &mut self,
        student_id: StudentId,
        reward_id: RewardId,
    ) -> Result<Student, PointsError> {
        if self.roster.get(student_id).is_none() {
            return Err(PointsError::student_not_found(student_id));
        }

        let reward = self
            .catalog
            .get(reward_id)
            .cloned()
            .ok_or_else(|| PointsError::reward_not_found(reward_id))?;

        // Debit only happens once the balance check passes
        let student = self.roster.spend(student_id, reward.points_required)?;
        let now = Utc::now();

        self.redemptions.append(RedemptionRecord {
            student: student_id,
            reward_name: reward.name.clone(),
            points_spent: reward.points_required,
            timestamp: now,
        });

        self.history.append(PointHistoryEntry {
            student: student_id,
            change: -reward.points_required,
            reason: format!("Redeemed reward: {}", reward.name),
            points_after: student.total_points,
            timestamp: now,
        });

        Ok(student)
    }

    /// Compute a classroom's ranking view
    ///
    /// Students sort by balance descending, ties by enrollment order, with
    /// 1-based positions over the returned set. An unknown classroom yields
    /// an empty view.
    pub fn rankings(&self, classroom: ClassroomId, limit: Option<usize>) -> Vec<RankingEntry> {
        compute_rankings(self.roster.students_in(classroom), limit)
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
    ///
    /// See [`StudentRoster::enroll`] for validation rules.
    pub fn enroll_student(&mut self, student: Student) -> Result<(), PointsError> {
        self.roster.enroll(student)
    }

    /// Add a reward to the catalog
    ///
    /// See [`RewardCatalog::add`] for validation rules.
    pub fn add_reward(&mut self, reward: Reward) -> Result<(), PointsError> {
        self.catalog.add(reward)
    }

    /// Update a student's profile fields
    ///
    /// Partial update; never touches the balance or the audit trail.
    pub fn update_student(
        &mut self,
        student_id: StudentId,
        name: Option<String>,
        order_number: Option<u32>,
        avatar: Option<String>,
    ) -> Result<Student, PointsError> {
        self.roster
            .update_profile(student_id, name, order_number, avatar)
    }

    /// Remove a student and their audit records
    pub fn remove_student(&mut self, student_id: StudentId) -> Result<Student, PointsError> {
        let student = self.roster.remove(student_id)?;
        self.history.remove_student(student_id);
        self.redemptions.remove_student(student_id);
        Ok(student)
    }

    /// Remove a classroom's students and rewards
    ///
    /// Student removals cascade to their audit records. Returns how many
    /// students and rewards were removed; an unknown classroom removes
    /// nothing and is not an error.
    pub fn remove_classroom(&mut self, classroom: ClassroomId) -> (usize, usize) {
        let students = self.roster.remove_classroom(classroom);
        for student in &students {
            self.history.remove_student(student.id);
            self.redemptions.remove_student(student.id);
        }
        let rewards = self.catalog.remove_classroom(classroom);
        (students.len(), rewards.len())
    }

    /// Get a student by ID
    pub fn get_student(&self, student_id: StudentId) -> Option<&Student> {
        self.roster.get(student_id)
    }

    /// Get a classroom's students in roster order
    pub fn students_in(&self, classroom: ClassroomId) -> Vec<&Student> {
        self.roster.students_in(classroom)
    }

    /// Get a classroom's rewards in ascending cost order
    pub fn rewards_in(&self, classroom: ClassroomId) -> Vec<&Reward> {
        self.catalog.list_for(classroom)
    }

    /// Get a student's point history in append order
    ///
    /// # Errors
    ///
    /// Returns an error if the student is not enrolled.
    pub fn history_for(&self, student_id: StudentId) -> Result<&[PointHistoryEntry], PointsError> {
        if self.roster.get(student_id).is_none() {
            return Err(PointsError::student_not_found(student_id));
        }
        Ok(self.history.entries_for(student_id))
    }

    /// Get a student's redemption records in append order
    ///
    /// # Errors
    ///
    /// Returns an error if the student is not enrolled.
    pub fn redemptions_for(
        &self,
        student_id: StudentId,
    ) -> Result<&[RedemptionRecord], PointsError> {
        if self.roster.get(student_id).is_none() {
            return Err(PointsError::student_not_found(student_id));
        }
        Ok(self.redemptions.records_for(student_id))
    }
}

impl Default for PointsEngine {
    fn default() -> Self {
        Self::new()
    }
}
