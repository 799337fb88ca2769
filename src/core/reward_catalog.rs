//! Reward catalog storage
//!
//! This module provides the RewardCatalog component that maintains the
//! rewards students can redeem. Rewards are scoped to a classroom and
//! listed in ascending cost order so the cheapest reward always appears
//! first in catalog views.
//!
//! # Ordering
//!
//! Catalog listings sort by `points_required` ascending, with ties broken
//! by reward ID, so repeated listings are deterministic.

use crate::core::traits::RewardStore;
use crate::types::{ClassroomId, PointsError, Reward, RewardId};
use std::collections::HashMap;

/// Reward catalog for redemption lookups
///
/// Maintains a HashMap of reward ID to reward data. Supports adding,
/// retrieving, retiring, and listing rewards per classroom.
pub struct RewardCatalog {
    /// Map of reward ID to reward
    rewards: HashMap<RewardId, Reward>,
}

impl RewardCatalog {
    /// Create a new empty reward catalog
    pub fn new() -> Self {
        RewardCatalog {
            rewards: HashMap::new(),
        }
    }

    /// Add a reward to the catalog
    ///
    /// # Arguments
    ///
    /// * `reward` - The reward to add
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The reward name is empty
    /// - The cost is zero or negative
    /// - The reward ID already exists
    pub fn add(&mut self, reward: Reward) -> Result<(), PointsError> {
        if reward.name.trim().is_empty() {
            return Err(PointsError::validation("reward name must not be empty"));
        }

        if reward.points_required <= 0 {
            return Err(PointsError::validation("reward cost must be positive"));
        }

        if self.rewards.contains_key(&reward.id) {
            return Err(PointsError::duplicate_reward(reward.id));
        }

        self.rewards.insert(reward.id, reward);
        Ok(())
    }

    /// Get a reward by ID
    ///
    /// # Returns
    ///
    /// * `Some(&Reward)` - If the reward exists
    /// * `None` - If the reward ID is not found
    pub fn get(&self, reward_id: RewardId) -> Option<&Reward> {
        self.rewards.get(&reward_id)
    }

    /// Remove a reward from the catalog
    ///
    /// Existing redemption records keep their denormalized reward name and
    /// cost, so retiring a reward never rewrites history.
    pub fn remove(&mut self, reward_id: RewardId) -> Result<Reward, PointsError> {
        self.rewards
            .remove(&reward_id)
            .ok_or_else(|| PointsError::reward_not_found(reward_id))
    }

    /// Remove every reward in a classroom
    ///
    /// Returns the removed rewards. An unknown classroom removes nothing.
    pub fn remove_classroom(&mut self, classroom: ClassroomId) -> Vec<Reward> {
        let ids: Vec<RewardId> = self
            .rewards
            .values()
            .filter(|r| r.classroom == classroom)
            .map(|r| r.id)
            .collect();

        ids.iter()
            .filter_map(|id| self.rewards.remove(id))
            .collect()
    }

    /// List a classroom's rewards in ascending cost order
    ///
    /// Ties by reward ID for deterministic listings.
    pub fn list_for(&self, classroom: ClassroomId) -> Vec<&Reward> {
        let mut rewards: Vec<&Reward> = self
            .rewards
            .values()
            .filter(|r| r.classroom == classroom)
            .collect();
        rewards.sort_by_key(|r| (r.points_required, r.id));
        rewards
    }
}

impl Default for RewardCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl RewardStore for RewardCatalog {
    fn find(&self, reward_id: RewardId) -> Option<Reward> {
        self.rewards.get(&reward_id).cloned()
    }

    fn list(&self, classroom: ClassroomId) -> Vec<Reward> {
        self.list_for(classroom).into_iter().cloned().collect()
    }
}
