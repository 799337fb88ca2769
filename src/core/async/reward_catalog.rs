//! Thread-safe reward catalog for async batch processing
//!
//! Mirrors the sync catalog's validation rules over a `DashMap`, so reward
//! lookups during concurrent redemptions never block unrelated students.

use crate::types::{ClassroomId, PointsError, Reward, RewardId};
use dashmap::DashMap;

/// Thread-safe reward catalog
///
/// Rewards are written by sequential administrative operations and read
/// concurrently during redemptions, so a snapshot-on-read map is all the
/// synchronization this needs.
#[derive(Debug)]
pub struct AsyncRewardCatalog {
    /// Concurrent HashMap storing rewards by reward ID
    rewards: DashMap<RewardId, Reward>,
}

impl AsyncRewardCatalog {
    /// Create a new empty AsyncRewardCatalog
    pub fn new() -> Self {
        Self {
            rewards: DashMap::new(),
        }
    }

    /// Add a reward to the catalog
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The reward name is empty
    /// - The cost is zero or negative
    /// - The reward ID already exists
    pub fn add(&self, reward: Reward) -> Result<(), PointsError> {
        if reward.name.trim().is_empty() {
            return Err(PointsError::validation("reward name must not be empty"));
        }

        if reward.points_required <= 0 {
            return Err(PointsError::validation("reward cost must be positive"));
        }

        let reward_id = reward.id;
        let mut newly_added = false;
        self.rewards.entry(reward_id).or_insert_with(|| {
            newly_added = true;
            reward
        });

        if newly_added {
            Ok(())
        } else {
            Err(PointsError::duplicate_reward(reward_id))
        }
    }

    /// Get a snapshot of a reward
    pub fn get(&self, reward_id: RewardId) -> Option<Reward> {
        self.rewards.get(&reward_id).map(|r| r.clone())
    }

    /// Retire a reward
    ///
    /// Redemption records that reference the reward keep their own copy of
    /// its name and cost, so retiring never rewrites history.
    pub fn remove(&self, reward_id: RewardId) -> Result<Reward, PointsError> {
        self.rewards
            .remove(&reward_id)
            .map(|(_, reward)| reward)
            .ok_or_else(|| PointsError::reward_not_found(reward_id))
    }

    /// Remove every reward belonging to a classroom
    pub fn remove_classroom(&self, classroom: ClassroomId) -> Vec<Reward> {
        let ids: Vec<RewardId> = self
            .rewards
            .iter()
            .filter(|entry| entry.value().classroom == classroom)
            .map(|entry| entry.value().id)
            .collect();

        ids.iter()
            .filter_map(|id| self.rewards.remove(id).map(|(_, reward)| reward))
            .collect()
    }

    /// Get a snapshot of a classroom's rewards, cheapest first
    ///
    /// Sorted by cost, ties by reward ID.
    pub fn list_for(&self, classroom: ClassroomId) -> Vec<Reward> {
        let mut rewards: Vec<Reward> = self
            .rewards
            .iter()
            .filter(|entry| entry.value().classroom == classroom)
            .map(|entry| entry.value().clone())
            .collect();
        rewards.sort_by_key(|r| (r.points_required, r.id));
        rewards
    }
}

impl Default for AsyncRewardCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_get() {
        let catalog = AsyncRewardCatalog::new();

        catalog
            .add(Reward::new(1, 100, "Homework pass", 50))
            .unwrap();

        let reward = catalog.get(1).unwrap();
        assert_eq!(reward.name, "Homework pass");
        assert_eq!(reward.points_required, 50);
        assert!(catalog.get(2).is_none());
    }

    #[test]
    fn test_add_duplicate_is_rejected() {
        let catalog = AsyncRewardCatalog::new();

        catalog.add(Reward::new(1, 100, "Sticker", 10)).unwrap();
        let result = catalog.add(Reward::new(1, 100, "Other sticker", 20));

        assert!(matches!(
            result.unwrap_err(),
            PointsError::DuplicateReward { reward: 1 }
        ));
        assert_eq!(catalog.get(1).unwrap().name, "Sticker");
    }

    #[test]
    fn test_add_rejects_invalid_input() {
        let catalog = AsyncRewardCatalog::new();

        let empty_name = catalog.add(Reward::new(1, 100, "  ", 10));
        assert!(matches!(
            empty_name.unwrap_err(),
            PointsError::Validation { .. }
        ));

        let free = catalog.add(Reward::new(2, 100, "Free lunch", 0));
        assert!(matches!(free.unwrap_err(), PointsError::Validation { .. }));

        assert!(catalog.get(1).is_none());
        assert!(catalog.get(2).is_none());
    }

    #[test]
    fn test_remove_returns_reward() {
        let catalog = AsyncRewardCatalog::new();
        catalog.add(Reward::new(1, 100, "Sticker", 10)).unwrap();

        let removed = catalog.remove(1).unwrap();

        assert_eq!(removed.id, 1);
        assert!(catalog.get(1).is_none());
        assert!(matches!(
            catalog.remove(1).unwrap_err(),
            PointsError::RewardNotFound { reward: 1 }
        ));
    }

    #[test]
    fn test_list_for_sorted_by_cost() {
        let catalog = AsyncRewardCatalog::new();
        catalog.add(Reward::new(1, 100, "Big prize", 90)).unwrap();
        catalog.add(Reward::new(2, 100, "Sticker", 10)).unwrap();
        catalog.add(Reward::new(3, 200, "Other room", 5)).unwrap();

        let costs: Vec<i64> = catalog
            .list_for(100)
            .iter()
            .map(|r| r.points_required)
            .collect();
        assert_eq!(costs, vec![10, 90]);
    }

    #[test]
    fn test_remove_classroom() {
        let catalog = AsyncRewardCatalog::new();
        catalog.add(Reward::new(1, 100, "Sticker", 10)).unwrap();
        catalog.add(Reward::new(2, 100, "Pass", 50)).unwrap();
        catalog.add(Reward::new(3, 200, "Other room", 5)).unwrap();

        let removed = catalog.remove_classroom(100);

        assert_eq!(removed.len(), 2);
        assert!(catalog.get(1).is_none());
        assert!(catalog.get(3).is_some());
    }

    #[test]
    fn test_concurrent_add_same_reward_one_wins() {
        use std::sync::Arc;
        use std::thread;

        let catalog = Arc::new(AsyncRewardCatalog::new());
        let mut handles = vec![];

        for i in 0..10 {
            let catalog_clone = Arc::clone(&catalog);
            let handle = thread::spawn(move || {
                catalog_clone.add(Reward::new(1, 100, format!("Variant {}", i), 10))
            });
            handles.push(handle);
        }

        let mut successful = 0;
        for handle in handles {
            if handle.join().unwrap().is_ok() {
                successful += 1;
            }
        }

        assert_eq!(successful, 1);
        assert_eq!(catalog.list_for(100).len(), 1);
    }
}
