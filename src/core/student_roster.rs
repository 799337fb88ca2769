//! Student roster module
//!
//! This module provides the `StudentRoster` struct which maintains the state
//! of all enrolled students and provides operations for managing balances.
//!
//! The StudentRoster is responsible for:
//! - Enrolling students with unique IDs and assigning enrollment sequence
//! - Tracking point balances and enforcing the non-negative invariant
//! - Profile updates that never touch the balance
//! - Providing sorted roster listings for views and output

use crate::core::traits::StudentStore;
use crate::types::{ClassroomId, Points, PointsError, Student, StudentId};
use std::collections::HashMap;

/// Result of a successful balance mutation
///
/// Carries the balance before the change alongside the updated student, so
/// callers can derive tier transitions without a second lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedChange {
    /// Balance before the change
    pub previous_total: Points,

    /// Student snapshot after the change
    pub student: Student,
}

/// Manages all enrolled students and their states
///
/// The StudentRoster maintains an in-memory map of student IDs to student
/// state plus a monotonic enrollment counter. It provides methods for
/// enrollment, balance mutation, profile updates, and retrieving students
/// for views and output generation.
pub struct StudentRoster {
    /// Map of student IDs to student states
    students: HashMap<StudentId, Student>,

    /// Next enrollment sequence number
    ///
    /// Strictly increasing across all enrollments; the ranking tie-breaker.
    next_seq: u64,
}

impl StudentRoster {
    /// Create a new StudentRoster with no students
    pub fn new() -> Self {
        StudentRoster {
            students: HashMap::new(),
            next_seq: 1,
        }
    }

    /// Enroll a student
    ///
    /// Validates the student's name and starting balance, rejects duplicate
    /// IDs, and assigns the enrollment sequence number.
    ///
    /// # Arguments
    ///
    /// * `student` - The student to enroll; `enrolled_seq` is overwritten
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The display name is empty
    /// - The starting balance is negative
    /// - The student ID is already enrolled
    pub fn enroll(&mut self, mut student: Student) -> Result<(), PointsError> {
        if student.name.trim().is_empty() {
            return Err(PointsError::validation("student name must not be empty"));
        }

        if student.total_points < 0 {
            return Err(PointsError::validation(
                "starting balance must not be negative",
            ));
        }

        if self.students.contains_key(&student.id) {
            return Err(PointsError::duplicate_student(student.id));
        }

        student.enrolled_seq = self.next_seq;
        self.next_seq += 1;
        self.students.insert(student.id, student);

        Ok(())
    }

    /// Get a student by ID
    pub fn get(&self, student_id: StudentId) -> Option<&Student> {
        self.students.get(&student_id)
    }

    /// Apply a signed point change to a student's balance
    ///
    /// Validates the resulting balance before writing: a change that would
    /// drive the balance below zero is rejected and the student is left
    /// untouched. Uses checked arithmetic to keep the balance intact.
    ///
    /// # Arguments
    ///
    /// * `student_id` - The student whose balance changes
    /// * `change` - Signed delta to apply
    ///
    /// # Returns
    ///
    /// * `Ok(AppliedChange)` - The previous balance and the updated student
    /// * `Err(PointsError)` - If the student is unknown, the result would be
    ///   negative, or the addition would overflow
    pub fn apply_change(
        &mut self,
        student_id: StudentId,
        change: Points,
    ) -> Result<AppliedChange, PointsError> {
        let student = self
            .students
            .get_mut(&student_id)
            .ok_or_else(|| PointsError::student_not_found(student_id))?;

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

        Ok(AppliedChange {
            previous_total,
            student: student.clone(),
        })
    }

    /// Debit a redemption cost from a student's balance
    ///
    /// Validates that the balance covers the cost before writing. The
    /// distinct error kind carries both the required and current amounts
    /// for user-facing display.
    ///
    /// # Arguments
    ///
    /// * `student_id` - The student redeeming
    /// * `cost` - The reward's point cost (positive)
    ///
    /// # Returns
    ///
    /// * `Ok(Student)` - Snapshot after the debit
    /// * `Err(PointsError)` - If the student is unknown or the balance is
    ///   short of the cost
    pub fn spend(&mut self, student_id: StudentId, cost: Points) -> Result<Student, PointsError> {
        let student = self
            .students
            .get_mut(&student_id)
            .ok_or_else(|| PointsError::student_not_found(student_id))?;

        // Check if the balance covers the cost
        if student.total_points < cost {
            return Err(PointsError::insufficient_points(
                student_id,
                cost,
                student.total_points,
            ));
        }

        let new_total = student
            .total_points
            .checked_sub(cost)
            .ok_or_else(|| PointsError::arithmetic_overflow("spend", student_id))?;

        student.total_points = new_total;

        Ok(student.clone())
    }

    /// Update a student's profile fields
    ///
    /// Partial update: only the provided fields change. Never touches the
    /// balance, the enrollment sequence, or the history.
    pub fn update_profile(
        &mut self,
        student_id: StudentId,
        name: Option<String>,
        order_number: Option<u32>,
        avatar: Option<String>,
    ) -> Result<Student, PointsError> {
        let student = self
            .students
            .get_mut(&student_id)
            .ok_or_else(|| PointsError::student_not_found(student_id))?;

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
    }

    /// Remove a student from the roster
    ///
    /// Returns the removed student so the caller can cascade their audit
    /// records.
    pub fn remove(&mut self, student_id: StudentId) -> Result<Student, PointsError> {
        self.students
            .remove(&student_id)
            .ok_or_else(|| PointsError::student_not_found(student_id))
    }

    /// Remove every student in a classroom
    ///
    /// Returns the removed students so the caller can cascade their audit
    /// records. An unknown classroom removes nothing.
    pub fn remove_classroom(&mut self, classroom: ClassroomId) -> Vec<Student> {
        let ids: Vec<StudentId> = self
            .students
            .values()
            .filter(|s| s.classroom == classroom)
            .map(|s| s.id)
            .collect();

        ids.iter()
            .filter_map(|id| self.students.remove(id))
            .collect()
    }

    /// Number of students enrolled in a classroom
    pub fn count_in(&self, classroom: ClassroomId) -> usize {
        self.students
            .values()
            .filter(|s| s.classroom == classroom)
            .count()
    }

    /// Get a classroom's students in roster order
    ///
    /// Sorted by `order_number`, ties by student ID, matching the roster
    /// view shown to teachers.
    pub fn students_in(&self, classroom: ClassroomId) -> Vec<&Student> {
        let mut students: Vec<&Student> = self
            .students
            .values()
            .filter(|s| s.classroom == classroom)
            .collect();
        students.sort_by_key(|s| (s.order_number, s.id));
        students
    }

    /// Get all students sorted by student ID
    ///
    /// Deterministic ordering for output generation.
    pub fn get_all(&self) -> Vec<&Student> {
        let mut students: Vec<&Student> = self.students.values().collect();
        students.sort_by_key(|s| s.id);
        students
    }
}

impl Default for StudentRoster {
    fn default() -> Self {
        Self::new()
    }
}

impl StudentStore for StudentRoster {
    fn find(&self, student_id: StudentId) -> Option<Student> {
        self.students.get(&student_id).cloned()
    }

    fn save(&mut self, student: Student) -> Result<(), PointsError> {
        match self.students.get_mut(&student.id) {
            Some(slot) => {
                *slot = student;
                Ok(())
            }
            None => Err(PointsError::student_not_found(student.id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enrolled(roster: &mut StudentRoster, id: StudentId, classroom: ClassroomId, points: Points) {
        let mut student = Student::new(id, classroom, format!("Student {}", id));
        student.total_points = points;
        roster.enroll(student).unwrap();
    }

    #[test]
    fn test_new_creates_empty_roster() {
        let roster = StudentRoster::new();
        assert_eq!(roster.students.len(), 0);
        assert_eq!(roster.get_all().len(), 0);
    }

    #[test]
    fn test_enroll_adds_student() {
        let mut roster = StudentRoster::new();

        roster.enroll(Student::new(1, 100, "An")).unwrap();

        let student = roster.get(1).unwrap();
        assert_eq!(student.name, "An");
        assert_eq!(student.classroom, 100);
        assert_eq!(student.total_points, 0);
    }

    #[test]
    fn test_enroll_assigns_increasing_sequence() {
        let mut roster = StudentRoster::new();

        roster.enroll(Student::new(1, 100, "An")).unwrap();
        roster.enroll(Student::new(2, 200, "Binh")).unwrap();
        roster.enroll(Student::new(3, 100, "Chi")).unwrap();

        let seq1 = roster.get(1).unwrap().enrolled_seq;
        let seq2 = roster.get(2).unwrap().enrolled_seq;
        let seq3 = roster.get(3).unwrap().enrolled_seq;

        assert!(seq1 < seq2);
        assert!(seq2 < seq3);
    }

    #[test]
    fn test_enroll_duplicate_id_is_rejected() {
        let mut roster = StudentRoster::new();

        roster.enroll(Student::new(1, 100, "An")).unwrap();
        let result = roster.enroll(Student::new(1, 100, "Imposter"));

        assert!(matches!(
            result.unwrap_err(),
            PointsError::DuplicateStudent { student: 1 }
        ));

        // Original enrollment is untouched
        assert_eq!(roster.get(1).unwrap().name, "An");
    }

    #[test]
    fn test_enroll_rejects_empty_name() {
        let mut roster = StudentRoster::new();

        let result = roster.enroll(Student::new(1, 100, "   "));

        assert!(matches!(result.unwrap_err(), PointsError::Validation { .. }));
        assert!(roster.get(1).is_none());
    }

    #[test]
    fn test_enroll_rejects_negative_starting_balance() {
        let mut roster = StudentRoster::new();

        let mut student = Student::new(1, 100, "An");
        student.total_points = -5;
        let result = roster.enroll(student);

        assert!(matches!(result.unwrap_err(), PointsError::Validation { .. }));
        assert!(roster.get(1).is_none());
    }

    #[test]
    fn test_enroll_keeps_provided_fields() {
        let mut roster = StudentRoster::new();

        let mut student = Student::new(1, 100, "An");
        student.order_number = 7;
        student.avatar = Some("https://example.test/an.png".to_string());
        student.total_points = 25;
        roster.enroll(student).unwrap();

        let stored = roster.get(1).unwrap();
        assert_eq!(stored.order_number, 7);
        assert_eq!(stored.avatar.as_deref(), Some("https://example.test/an.png"));
        assert_eq!(stored.total_points, 25);
    }

    #[test]
    fn test_get_missing_student_returns_none() {
        let roster = StudentRoster::new();
        assert!(roster.get(42).is_none());
    }

    #[test]
    fn test_apply_change_increases_balance() {
        let mut roster = StudentRoster::new();
        enrolled(&mut roster, 1, 100, 20);

        let applied = roster.apply_change(1, 10).unwrap();

        assert_eq!(applied.previous_total, 20);
        assert_eq!(applied.student.total_points, 30);
        assert_eq!(roster.get(1).unwrap().total_points, 30);
    }

    #[test]
    fn test_apply_change_decreases_balance() {
        let mut roster = StudentRoster::new();
        enrolled(&mut roster, 1, 100, 20);

        let applied = roster.apply_change(1, -5).unwrap();

        assert_eq!(applied.previous_total, 20);
        assert_eq!(applied.student.total_points, 15);
    }

    #[test]
    fn test_apply_change_to_exactly_zero_succeeds() {
        let mut roster = StudentRoster::new();
        enrolled(&mut roster, 1, 100, 20);

        let applied = roster.apply_change(1, -20).unwrap();

        assert_eq!(applied.student.total_points, 0);
    }

    #[test]
    fn test_apply_change_below_zero_is_rejected() {
        let mut roster = StudentRoster::new();
        enrolled(&mut roster, 1, 100, 20);

        let result = roster.apply_change(1, -25);

        assert!(matches!(
            result.unwrap_err(),
            PointsError::InvalidChange {
                student: 1,
                current: 20,
                change: -25
            }
        ));

        // Balance is untouched
        assert_eq!(roster.get(1).unwrap().total_points, 20);
    }

    #[test]
    fn test_apply_change_rejection_is_idempotent() {
        let mut roster = StudentRoster::new();
        enrolled(&mut roster, 1, 100, 20);

        for _ in 0..3 {
            let result = roster.apply_change(1, -25);
            assert!(matches!(
                result.unwrap_err(),
                PointsError::InvalidChange { .. }
            ));
            assert_eq!(roster.get(1).unwrap().total_points, 20);
        }
    }

    #[test]
    fn test_apply_change_unknown_student() {
        let mut roster = StudentRoster::new();

        let result = roster.apply_change(42, 10);

        assert!(matches!(
            result.unwrap_err(),
            PointsError::StudentNotFound { student: 42 }
        ));
    }

    #[test]
    fn test_apply_change_overflow_protection() {
        let mut roster = StudentRoster::new();
        let mut student = Student::new(1, 100, "An");
        student.total_points = Points::MAX;
        roster.enroll(student).unwrap();

        let result = roster.apply_change(1, 1);

        assert!(matches!(
            result.unwrap_err(),
            PointsError::ArithmeticOverflow { .. }
        ));

        // Balance is untouched
        assert_eq!(roster.get(1).unwrap().total_points, Points::MAX);
    }

    #[test]
    fn test_spend_decreases_balance() {
        let mut roster = StudentRoster::new();
        enrolled(&mut roster, 1, 100, 100);

        let student = roster.spend(1, 90).unwrap();

        assert_eq!(student.total_points, 10);
        assert_eq!(roster.get(1).unwrap().total_points, 10);
    }

    #[test]
    fn test_spend_exact_balance_reaches_zero() {
        let mut roster = StudentRoster::new();
        enrolled(&mut roster, 1, 100, 90);

        let student = roster.spend(1, 90).unwrap();

        assert_eq!(student.total_points, 0);
    }

    #[test]
    fn test_spend_with_insufficient_points() {
        let mut roster = StudentRoster::new();
        enrolled(&mut roster, 1, 100, 50);

        let result = roster.spend(1, 90);

        assert!(matches!(
            result.unwrap_err(),
            PointsError::InsufficientPoints {
                student: 1,
                required: 90,
                current: 50
            }
        ));

        // Balance is untouched
        assert_eq!(roster.get(1).unwrap().total_points, 50);
    }

    #[test]
    fn test_spend_unknown_student() {
        let mut roster = StudentRoster::new();

        let result = roster.spend(42, 10);

        assert!(matches!(
            result.unwrap_err(),
            PointsError::StudentNotFound { student: 42 }
        ));
    }

    #[test]
    fn test_update_profile_partial_updates() {
        let mut roster = StudentRoster::new();
        enrolled(&mut roster, 1, 100, 30);

        roster
            .update_profile(1, Some("Renamed".to_string()), None, None)
            .unwrap();
        assert_eq!(roster.get(1).unwrap().name, "Renamed");
        assert_eq!(roster.get(1).unwrap().order_number, 0);

        roster.update_profile(1, None, Some(9), None).unwrap();
        assert_eq!(roster.get(1).unwrap().name, "Renamed");
        assert_eq!(roster.get(1).unwrap().order_number, 9);

        roster
            .update_profile(1, None, None, Some("avatar.png".to_string()))
            .unwrap();
        assert_eq!(roster.get(1).unwrap().avatar.as_deref(), Some("avatar.png"));

        // Balance never changes through profile updates
        assert_eq!(roster.get(1).unwrap().total_points, 30);
    }

    #[test]
    fn test_update_profile_unknown_student() {
        let mut roster = StudentRoster::new();

        let result = roster.update_profile(42, Some("X".to_string()), None, None);

        assert!(matches!(
            result.unwrap_err(),
            PointsError::StudentNotFound { student: 42 }
        ));
    }

    #[test]
    fn test_remove_returns_student() {
        let mut roster = StudentRoster::new();
        enrolled(&mut roster, 1, 100, 30);

        let removed = roster.remove(1).unwrap();

        assert_eq!(removed.id, 1);
        assert!(roster.get(1).is_none());
    }

    #[test]
    fn test_remove_unknown_student() {
        let mut roster = StudentRoster::new();

        let result = roster.remove(42);

        assert!(matches!(
            result.unwrap_err(),
            PointsError::StudentNotFound { student: 42 }
        ));
    }

    #[test]
    fn test_remove_classroom_removes_only_that_classroom() {
        let mut roster = StudentRoster::new();
        enrolled(&mut roster, 1, 100, 10);
        enrolled(&mut roster, 2, 100, 20);
        enrolled(&mut roster, 3, 200, 30);

        let removed = roster.remove_classroom(100);

        assert_eq!(removed.len(), 2);
        assert!(roster.get(1).is_none());
        assert!(roster.get(2).is_none());
        assert!(roster.get(3).is_some());
    }

    #[test]
    fn test_remove_unknown_classroom_removes_nothing() {
        let mut roster = StudentRoster::new();
        enrolled(&mut roster, 1, 100, 10);

        let removed = roster.remove_classroom(999);

        assert!(removed.is_empty());
        assert!(roster.get(1).is_some());
    }

    #[test]
    fn test_students_in_sorted_by_order_number() {
        let mut roster = StudentRoster::new();

        let mut a = Student::new(1, 100, "An");
        a.order_number = 3;
        let mut b = Student::new(2, 100, "Binh");
        b.order_number = 1;
        let mut c = Student::new(3, 100, "Chi");
        c.order_number = 2;
        let d = Student::new(4, 200, "Dung");

        for student in [a, b, c, d] {
            roster.enroll(student).unwrap();
        }

        let ids: Vec<StudentId> = roster.students_in(100).iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_count_in_counts_per_classroom() {
        let mut roster = StudentRoster::new();
        enrolled(&mut roster, 1, 100, 0);
        enrolled(&mut roster, 2, 100, 0);
        enrolled(&mut roster, 3, 200, 0);

        assert_eq!(roster.count_in(100), 2);
        assert_eq!(roster.count_in(200), 1);
        assert_eq!(roster.count_in(300), 0);
    }

    #[test]
    fn test_get_all_sorted_by_id() {
        let mut roster = StudentRoster::new();
        enrolled(&mut roster, 3, 100, 0);
        enrolled(&mut roster, 1, 200, 0);
        enrolled(&mut roster, 2, 100, 0);

        let ids: Vec<StudentId> = roster.get_all().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
