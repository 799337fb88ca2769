//! Audit record types for the Classroom Points Engine
//!
//! History and redemption records are append-only: created exactly once
//! per successful mutation, never updated, and deleted only when their
//! owning student is removed.

use super::operation::{Points, StudentId};
use chrono::{DateTime, Utc};

/// One ledger mutation, as seen after it was applied
#[derive(Debug, Clone, PartialEq)]
pub struct PointHistoryEntry {
    /// The student whose balance changed
    pub student: StudentId,

    /// Signed delta that was applied
    pub change: Points,

    /// Free-text justification
    ///
    /// Required to be non-empty for deductions; may be empty for awards.
    /// Redemptions synthesize a reason naming the reward.
    pub reason: String,

    /// Balance immediately after this entry was applied
    ///
    /// An audit snapshot: for each student, replaying `change` values in
    /// entry order reproduces every `points_after` value.
    pub points_after: Points,

    /// When the change was applied (UTC)
    pub timestamp: DateTime<Utc>,
}

/// One completed reward redemption
///
/// The name and cost are captured at redemption time, so later deletion
/// of the catalog entry does not alter this record.
#[derive(Debug, Clone, PartialEq)]
pub struct RedemptionRecord {
    /// The student who redeemed
    pub student: StudentId,

    /// Reward name as of the redemption
    pub reward_name: String,

    /// Points debited, equal to the reward's cost at the time
    pub points_spent: Points,

    /// When the redemption happened (UTC)
    pub timestamp: DateTime<Utc>,
}
