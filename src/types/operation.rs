//! Operation-related types for the Classroom Points Engine
//!
//! This module defines the operation kinds, id aliases, and parsed operation
//! records used throughout the system for processing point changes and
//! reward redemptions.

use serde::{Deserialize, Serialize};

/// Classroom identifier
///
/// Supports classroom IDs from 0 to 65,535
pub type ClassroomId = u16;

/// Student identifier
///
/// Supports student IDs from 0 to 4,294,967,295
pub type StudentId = u32;

/// Reward identifier
///
/// Supports reward IDs from 0 to 4,294,967,295
pub type RewardId = u32;

/// Point quantity
///
/// Signed so that deltas and balances share one type. Balances carry the
/// additional invariant of never being negative.
pub type Points = i64;

/// Operation kinds supported by the points engine
///
/// Each variant represents a different operation that can appear in the
/// input log. Awards, deductions, and redemptions mutate a student's
/// balance and append history; the remaining kinds manage the roster and
/// the reward catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    /// Add a student to a classroom roster
    ///
    /// Carries the student's display name and an optional starting balance.
    /// Fails if the student ID is already enrolled.
    Enroll,

    /// Add a reward to a classroom's catalog
    ///
    /// Carries the reward's display name and its point cost.
    /// Fails if the reward ID already exists.
    Reward,

    /// Credit points to a student
    ///
    /// Increases the student's balance and appends a history entry.
    /// May carry an optional reason.
    Award,

    /// Debit points from a student
    ///
    /// Decreases the student's balance and appends a history entry.
    /// Requires a non-empty reason and must not drive the balance below zero.
    Deduct,

    /// Exchange points for a catalog reward
    ///
    /// Debits the reward's cost and appends both a redemption record and a
    /// history entry. Requires the student to hold at least the cost.
    Redeem,

    /// Remove a student from the roster
    ///
    /// Deletes the student along with their history and redemption records.
    Unenroll,

    /// Remove a reward from the catalog
    ///
    /// Past redemptions of the reward are unaffected; they carry their own
    /// copy of the name and cost.
    Retire,
}

impl OperationType {
    /// Whether this kind manages the roster or catalog rather than a balance
    ///
    /// Administrative operations (enroll, reward, unenroll, retire) shape
    /// the state that point operations (award, deduct, redeem) depend on.
    /// Batch processing runs the administrative kinds sequentially before
    /// fanning the point kinds out across students.
    pub fn is_administrative(self) -> bool {
        matches!(
            self,
            OperationType::Enroll
                | OperationType::Reward
                | OperationType::Unenroll
                | OperationType::Retire
        )
    }
}

/// Input operation record from CSV
///
/// Represents a single operation as read from the input CSV file. Fields
/// other than the kind are optional because each operation kind uses a
/// different subset of columns; presence is validated during conversion
/// and re-checked by the engine.
#[derive(Debug, Clone)]
pub struct OperationRecord {
    /// The kind of operation
    pub op_type: OperationType,

    /// The classroom this operation applies to (enroll and reward)
    pub classroom: Option<ClassroomId>,

    /// The student this operation applies to (all kinds except reward/retire)
    pub student: Option<StudentId>,

    /// The reward this operation references (reward, redeem, and retire)
    pub reward: Option<RewardId>,

    /// Point quantity
    ///
    /// Starting balance for enroll, cost for reward, magnitude for
    /// award/deduct. Absent for redeem, unenroll, and retire.
    pub points: Option<Points>,

    /// Free-text column
    ///
    /// Display name for enroll/reward, reason for award/deduct.
    pub text: Option<String>,
}
