//! Reward catalog types for the Classroom Points Engine

use super::operation::{ClassroomId, Points, RewardId};

/// A redeemable catalog item
///
/// Immutable once created except for deletion. Redemptions copy the name
/// and cost into their own records, so deleting a reward never rewrites
/// history.
#[derive(Debug, Clone, PartialEq)]
pub struct Reward {
    /// The reward ID (u32: 0-4,294,967,295)
    pub id: RewardId,

    /// Display name
    pub name: String,

    /// Longer description shown in the shop view
    pub description: String,

    /// Short icon, typically a single emoji
    pub icon: String,

    /// Point cost to redeem
    ///
    /// Invariant: always greater than zero.
    pub points_required: Points,

    /// The classroom this reward belongs to
    pub classroom: ClassroomId,
}

impl Reward {
    /// Create a new reward with the default icon and an empty description
    pub fn new(
        id: RewardId,
        classroom: ClassroomId,
        name: impl Into<String>,
        points_required: Points,
    ) -> Self {
        Reward {
            id,
            name: name.into(),
            description: String::new(),
            icon: "🎁".to_string(),
            points_required,
            classroom,
        }
    }
}
