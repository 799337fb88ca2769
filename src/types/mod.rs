//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `student`: Student roster state and derived views
//! - `reward`: Reward catalog items
//! - `history`: Append-only audit records
//! - `tier`: Tier enumeration and the pure classifier
//! - `operation`: Operation kinds, identifiers, and parsed records
//! - `error`: Error types for the points engine

pub mod error;
pub mod history;
pub mod operation;
pub mod reward;
pub mod student;
pub mod tier;

pub use error::PointsError;
pub use history::{PointHistoryEntry, RedemptionRecord};
pub use operation::{ClassroomId, OperationRecord, OperationType, Points, RewardId, StudentId};
pub use reward::Reward;
pub use student::{ChangeOutcome, RankingEntry, Student};
pub use tier::{classify, Tier};
