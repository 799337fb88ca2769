//! Student-related types for the Classroom Points Engine
//!
//! This module defines the Student structure plus the outcome and ranking
//! views built from it.

use super::operation::{ClassroomId, Points, StudentId};
use super::tier::Tier;

/// Student roster state
///
/// Represents the current state of an enrolled student. The tier is
/// deliberately absent: it is derived from `total_points` on every read
/// via the classifier, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Student {
    /// The student ID (u32: 0-4,294,967,295)
    pub id: StudentId,

    /// Display name
    pub name: String,

    /// Roster position within the classroom (roll number)
    ///
    /// A display ordering chosen by the teacher, independent of points.
    pub order_number: u32,

    /// Optional avatar reference (URL or inline data)
    pub avatar: Option<String>,

    /// Current point balance
    ///
    /// Invariant: never negative. Every mutation checks the resulting
    /// balance before writing.
    pub total_points: Points,

    /// The classroom this student belongs to
    pub classroom: ClassroomId,

    /// Enrollment sequence assigned by the roster
    ///
    /// Monotonically increasing across all enrollments; used as the
    /// deterministic tie-breaker when ranking students with equal points.
    pub enrolled_seq: u64,
}

impl Student {
    /// Create a new student with a zero balance
    ///
    /// # Arguments
    ///
    /// * `id` - The student ID
    /// * `classroom` - The owning classroom
    /// * `name` - Display name
    ///
    /// # Returns
    ///
    /// A new Student with:
    /// - order_number = 0
    /// - avatar = None
    /// - total_points = 0
    /// - enrolled_seq = 0 (assigned by the roster at enrollment)
    pub fn new(id: StudentId, classroom: ClassroomId, name: impl Into<String>) -> Self {
        Student {
            id,
            name: name.into(),
            order_number: 0,
            avatar: None,
            total_points: 0,
            classroom,
            enrolled_seq: 0,
        }
    }
}

/// Result of a direct point change
///
/// Pairs the updated student snapshot with the rank-transition signal.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeOutcome {
    /// The student after the change was applied
    pub student: Student,

    /// Whether this change moved the student to a different tier
    ///
    /// True only for a positive change whose resulting tier differs from
    /// the previous one. Deductions never set this flag, even when they
    /// drop the student a tier.
    pub rank_increased: bool,
}

/// One row of a classroom leaderboard
///
/// Positions are 1-based over the returned (already limited) set and are
/// recomputed on every projection, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct RankingEntry {
    /// 1-based rank within the returned list
    pub position: usize,

    /// The ranked student's ID
    pub student_id: StudentId,

    /// Display name, copied from the student
    pub name: String,

    /// Avatar reference, copied from the student
    pub avatar: Option<String>,

    /// Current point balance
    pub total_points: Points,

    /// Tier derived from `total_points` at projection time
    pub tier: Tier,

    /// Movement versus a previous period
    ///
    /// Reserved for historical comparison; currently always 0 and carries
    /// no meaning.
    pub trend: i32,
}
