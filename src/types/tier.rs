//! Tier classification for the Classroom Points Engine
//!
//! This module defines the ordered tier enumeration and the pure classifier
//! that derives a tier from a point total. Tiers are never stored; every
//! display or comparison recomputes them from the current balance so the
//! shown rank can never go stale.

use super::operation::Points;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Student standing derived from total points
///
/// Variants are declared in ascending order, so the derived `Ord` matches
/// the progression of the thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Starting tier, total points below 50
    Bronze,

    /// Total points of at least 50
    Silver,

    /// Total points of at least 100
    Gold,

    /// Total points of at least 200
    Diamond,
}

impl Tier {
    /// Lowercase name used in CSV output and display
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Bronze => "bronze",
            Tier::Silver => "silver",
            Tier::Gold => "gold",
            Tier::Diamond => "diamond",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a point total into a tier
///
/// Thresholds are inclusive lower bounds and the highest met threshold
/// wins: 0 → bronze, 50 → silver, 100 → gold, 200 → diamond. Pure and
/// total; balances are never negative in practice, but a negative input
/// classifies as bronze rather than panicking.
pub fn classify(total_points: Points) -> Tier {
    if total_points >= 200 {
        Tier::Diamond
    } else if total_points >= 100 {
        Tier::Gold
    } else if total_points >= 50 {
        Tier::Silver
    } else {
        Tier::Bronze
    }
}
