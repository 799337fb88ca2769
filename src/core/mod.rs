//! Core business logic module
//!
//! This module contains the core ledger components:
//! - `traits` - Store abstractions for interchangeable backends
//! - `engine` - Operation processing orchestration
//! - `student_roster` - Student state and balance operations
//! - `reward_catalog` - Redeemable reward storage
//! - `history_log` - Append-only point change trail
//! - `redemption_log` - Append-only redemption records
//! - `rankings` - Leaderboard projection
//! - `async` - Asynchronous implementations

pub mod r#async;
pub mod engine;
pub mod history_log;
pub mod rankings;
pub mod redemption_log;
pub mod reward_catalog;
pub mod student_roster;
pub mod traits;

pub use engine::PointsEngine;
pub use history_log::HistoryLog;
pub use r#async::{
    AsyncHistoryLog, AsyncPointsEngine, AsyncRedemptionLog, AsyncRewardCatalog, AsyncStudentRoster,
};
pub use rankings::compute_rankings;
pub use redemption_log::RedemptionLog;
pub use reward_catalog::RewardCatalog;
pub use student_roster::StudentRoster;
