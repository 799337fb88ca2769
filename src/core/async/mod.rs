//! Asynchronous implementations of core components
//!
//! This module provides thread-safe, concurrent implementations of the core
//! points processing components using DashMap for locking.
//!
//! # Architecture
//!
//! The async implementations enforce the same rules as the synchronous
//! versions but over concurrent data structures:
//!
//! - **AsyncStudentRoster**: Thread-safe roster state using DashMap
//! - **AsyncRewardCatalog**: Thread-safe reward catalog using DashMap
//! - **AsyncHistoryLog**: Thread-safe point history using DashMap
//! - **AsyncRedemptionLog**: Thread-safe redemption records using DashMap
//! - **AsyncPointsEngine**: Orchestrates async operation processing
//! - **BatchProcessor**: Two-phase batch processing partitioned by student
//!
//! # Thread Safety
//!
//! All components are designed for safe concurrent access:
//! - Operations on different students proceed in parallel
//! - Operations on the same student are properly synchronized
//! - No global locks - fine-grained locking per entity

pub mod batch_processor;
pub mod engine;
pub mod history_log;
pub mod redemption_log;
pub mod reward_catalog;
pub mod student_roster;

pub use batch_processor::BatchProcessor;
pub use engine::AsyncPointsEngine;
pub use history_log::AsyncHistoryLog;
pub use redemption_log::AsyncRedemptionLog;
pub use reward_catalog::AsyncRewardCatalog;
pub use student_roster::AsyncStudentRoster;
