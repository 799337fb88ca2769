//! Thread-safe student roster for async batch processing
//!
//! This module provides the `AsyncStudentRoster` struct, which manages student
//! state using concurrent data structures to enable safe multi-threaded access.
//!
//! # Design
//!
//! The `AsyncStudentRoster` uses `DashMap` (a concurrent HashMap) to provide
//! thread-safe student storage with fine-grained locking. Multiple threads can
//! safely operate on different students concurrently, while operations on the
//! same student are serialized by the student's map entry.
//!
//! Students are never created on demand: enrollment is explicit, and
//! balance operations against an unknown student fail.

use crate::types::{ClassroomId, PointsError, Student, StudentId};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe student state manager for async batch processing
///
/// `AsyncStudentRoster` provides concurrent access to student state using
/// `DashMap` for fine-grained locking. Multiple threads can safely access
/// different students simultaneously, while operations on the same student
/// are automatically serialized.
///
/// # Thread Safety
///
/// All methods are safe to call from multiple threads concurrently. The
/// internal `DashMap` ensures that:
/// - Concurrent reads of different students don't block each other
/// - Concurrent writes to different students don't block each other
/// - Operations on the same student are properly synchronized
#[derive(Debug)]
pub struct AsyncStudentRoster {
    /// Concurrent HashMap storing student state by student ID
    students: DashMap<StudentId, Student>,

    /// Next enrollment sequence number
    ///
    /// Strictly increasing across all enrollments; the ranking tie-breaker.
    next_seq: AtomicU64,
}

impl AsyncStudentRoster {
    /// Create a new empty AsyncStudentRoster
    pub fn new() -> Self {
        Self {
            students: DashMap::new(),
            next_seq: AtomicU64::new(1),
        }
    }

    /// Enroll a student
    ///
    /// Validates the student's name and starting balance, then inserts the
    /// student while holding the entry for their ID, so two concurrent
    /// enrollments of the same ID cannot both succeed.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The display name is empty
    /// - The starting balance is negative
    /// - The student ID is already enrolled
    pub fn enroll(&self, student: Student) -> Result<(), PointsError> {
        if student.name.trim().is_empty() {
            return Err(PointsError::validation("student name must not be empty"));
        }

        if student.total_points < 0 {
            return Err(PointsError::validation(
                "starting balance must not be negative",
            ));
        }

        let student_id = student.id;
        let mut newly_enrolled = false;
        self.students.entry(student_id).or_insert_with(|| {
            newly_enrolled = true;
            let mut student = student;
            // Uniqueness is all the sequence needs
            student.enrolled_seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
            student
        });

        if newly_enrolled {
            Ok(())
        } else {
            Err(PointsError::duplicate_student(student_id))
        }
    }

    /// Get a snapshot of a student
    ///
    /// The returned clone reflects the state at the time of the call;
    /// concurrent modifications by other threads won't be visible in it.
    pub fn get(&self, student_id: StudentId) -> Option<Student> {
        self.students.get(&student_id).map(|s| s.clone())
    }

    /// Update a student using a closure
    ///
    /// The closure receives a mutable reference to the student and runs
    /// while the student's map entry is held, so no other thread can
    /// observe a partially-updated state or interleave its own
    /// check-then-write. The closure's result is passed through, letting
    /// callers return snapshots or derived values computed under the lock.
    ///
    /// # Errors
    ///
    /// Returns `StudentNotFound` if the student is not enrolled, or
    /// whatever error the closure produces.
    pub fn update<F, R>(&self, student_id: StudentId, f: F) -> Result<R, PointsError>
    where
        F: FnOnce(&mut Student) -> Result<R, PointsError>,
    {
        let mut entry = self
            .students
            .get_mut(&student_id)
            .ok_or_else(|| PointsError::student_not_found(student_id))?;
        f(entry.value_mut())
    }

    /// Remove a student from the roster
    ///
    /// Returns the removed student so the caller can cascade their audit
    /// records.
    pub fn remove(&self, student_id: StudentId) -> Result<Student, PointsError> {
        self.students
            .remove(&student_id)
            .map(|(_, student)| student)
            .ok_or_else(|| PointsError::student_not_found(student_id))
    }

    /// Remove every student in a classroom
    ///
    /// Returns the removed students. An unknown classroom removes nothing.
    pub fn remove_classroom(&self, classroom: ClassroomId) -> Vec<Student> {
        let ids: Vec<StudentId> = self
            .students
            .iter()
            .filter(|entry| entry.value().classroom == classroom)
            .map(|entry| entry.value().id)
            .collect();

        ids.iter()
            .filter_map(|id| self.students.remove(id).map(|(_, student)| student))
            .collect()
    }

    /// Number of students enrolled in a classroom
    pub fn count_in(&self, classroom: ClassroomId) -> usize {
        self.students
            .iter()
            .filter(|entry| entry.value().classroom == classroom)
            .count()
    }

    /// Get a snapshot of a classroom's students in roster order
    ///
    /// Sorted by `order_number`, ties by student ID.
    pub fn students_in(&self, classroom: ClassroomId) -> Vec<Student> {
        let mut students: Vec<Student> = self
            .students
            .iter()
            .filter(|entry| entry.value().classroom == classroom)
            .map(|entry| entry.value().clone())
            .collect();
        students.sort_by_key(|s| (s.order_number, s.id));
        students
    }

    /// Get a snapshot of all students sorted by student ID
    pub fn get_all(&self) -> Vec<Student> {
        let mut students: Vec<Student> = self
            .students
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        students.sort_by_key(|s| s.id);
        students
    }
}

impl Default for AsyncStudentRoster {
    fn default() -> Self {
        Self::new()
    }
}
