//! Classroom Points Engine Library
//! # Overview
//!
//! This library provides a streaming CSV-based classroom points processor implementing
//! both a sync and an async strategy
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Student, Reward, etc.)
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Business logic components:
//!   - [`core::engine`] - Operation processing orchestration
//!   - [`core::student_roster`] - Student state management and balance operations
//!   - [`core::reward_catalog`] - Redeemable reward definitions per classroom
//!   - [`core::history_log`] - Per-student point change history
//!   - [`core::redemption_log`] - Per-student redemption records
//!   - [`core::rankings`] - Classroom leaderboard computation
//! - [`io`] - I/O handling with pluggable processing strategies
//!
//! # Operation Types
//!
//! The engine supports seven operation types:
//!
//! - **Enroll**: Register a student in a classroom
//! - **Reward**: Add a redeemable reward to a classroom's catalog
//! - **Award**: Credit points to a student
//! - **Deduct**: Debit points from a student (requires a reason, never below zero)
//! - **Redeem**: Spend points on a reward, recording the redemption
//! - **Unenroll**: Remove a student along with their history and redemptions
//! - **Retire**: Remove a reward from its classroom's catalog
//!
//! # Tiers
//!
//! Each student's balance maps to a tier: bronze from 0, silver from 50,
//! gold from 100, and diamond from 200 points. Tiers are always derived
//! from the current balance, never stored.

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use core::{HistoryLog, PointsEngine, RedemptionLog, RewardCatalog, StudentRoster};
pub use io::write_rankings_csv;
pub use types::{
    ChangeOutcome, ClassroomId, OperationRecord, OperationType, PointHistoryEntry, Points,
    PointsError, RankingEntry, RedemptionRecord, Reward, RewardId, Student, StudentId, Tier,
};
