//! Error types for the Classroom Points Engine
//!
//! This module defines all error types that can occur during operation
//! processing. Errors are designed to be descriptive and user-friendly for
//! CLI output and user-facing display.
//!
//! # Error Categories
//!
//! - **File I/O Errors**: File not found, permission denied, etc.
//! - **CSV Parsing Errors**: Malformed CSV, invalid data types, etc.
//! - **Business Errors**: Unknown student/reward, insufficient points,
//!   below-zero changes, duplicate ids, missing justification, etc.
//! - **Arithmetic Errors**: Overflow in balance calculations

use super::operation::{Points, RewardId, StudentId};
use thiserror::Error;

/// Main error type for the points engine
///
/// This enum represents all possible errors that can occur during
/// operation processing. Each variant includes relevant context to help
/// diagnose and resolve the issue. All business errors are recoverable:
/// the offending operation is rejected with zero partial effects and
/// processing continues.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PointsError {
    /// File not found at the specified path
    ///
    /// This is a fatal error that prevents processing from starting.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error occurred while reading or writing files
    ///
    /// This is typically a fatal error (file permissions, disk full, etc.).
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// CSV parsing error occurred
    ///
    /// This is a recoverable error - the malformed record is skipped
    /// and processing continues with the next record.
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// A field required by this operation kind is absent
    ///
    /// The conversion layer validates presence, but the engine re-checks
    /// records handed to it directly. This is a recoverable error.
    #[error("{op_type} operation requires the {field} field")]
    MissingField {
        /// Operation kind that needs the field
        op_type: String,
        /// Name of the missing field
        field: String,
    },

    /// Referenced student does not exist
    ///
    /// This is a recoverable error - the operation is rejected and no
    /// state changes.
    #[error("Student {student} not found")]
    StudentNotFound {
        /// Student ID that was not found
        student: StudentId,
    },

    /// Referenced reward does not exist
    ///
    /// This is a recoverable error - the operation is rejected and no
    /// state changes.
    #[error("Reward {reward} not found")]
    RewardNotFound {
        /// Reward ID that was not found
        reward: RewardId,
    },

    /// Student ID already enrolled
    ///
    /// Student IDs must be unique. This is a recoverable error - the
    /// duplicate enrollment is rejected.
    #[error("Student {student} is already enrolled")]
    DuplicateStudent {
        /// Student ID that is duplicated
        student: StudentId,
    },

    /// Reward ID already in the catalog
    ///
    /// Reward IDs must be unique. This is a recoverable error - the
    /// duplicate reward is rejected.
    #[error("Reward {reward} already exists")]
    DuplicateReward {
        /// Reward ID that is duplicated
        reward: RewardId,
    },

    /// Point change would drive the balance negative
    ///
    /// This is a recoverable error - the change is rejected before any
    /// write, leaving balance and history untouched.
    #[error(
        "Invalid point change for student {student}: balance cannot go below zero (current {current}, change {change})"
    )]
    InvalidChange {
        /// Student ID
        student: StudentId,
        /// Current balance
        current: Points,
        /// Rejected delta
        change: Points,
    },

    /// Redemption cost exceeds the current balance
    ///
    /// This is a recoverable error - the redemption is rejected and the
    /// student state remains unchanged. The message carries both values
    /// for direct user-facing display.
    #[error("Insufficient points for student {student}: required {required}, current {current}")]
    InsufficientPoints {
        /// Student ID
        student: StudentId,
        /// The reward's cost
        required: Points,
        /// The student's balance
        current: Points,
    },

    /// Input violates a business validation rule
    ///
    /// Missing justification for a deduction, non-positive reward cost,
    /// negative starting balance, and similar. Recoverable.
    #[error("Validation error: {message}")]
    Validation {
        /// Description of the violated rule
        message: String,
    },

    /// Arithmetic overflow would occur
    ///
    /// This is a recoverable error - the operation is rejected to keep
    /// the balance intact.
    #[error("Arithmetic overflow in {operation} for student {student}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
        /// Student ID
        student: StudentId,
    },
}

// Conversion from io::Error to PointsError
impl From<std::io::Error> for PointsError {
    fn from(error: std::io::Error) -> Self {
        PointsError::IoError {
            message: error.to_string(),
        }
    }
}

// Conversion from csv::Error to PointsError
impl From<csv::Error> for PointsError {
    fn from(error: csv::Error) -> Self {
        // Extract line number if available
        let line = error.position().map(|pos| pos.line());

        PointsError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl PointsError {
    /// Create a StudentNotFound error
    pub fn student_not_found(student: StudentId) -> Self {
        PointsError::StudentNotFound { student }
    }

    /// Create a RewardNotFound error
    pub fn reward_not_found(reward: RewardId) -> Self {
        PointsError::RewardNotFound { reward }
    }

    /// Create a DuplicateStudent error
    pub fn duplicate_student(student: StudentId) -> Self {
        PointsError::DuplicateStudent { student }
    }

    /// Create a DuplicateReward error
    pub fn duplicate_reward(reward: RewardId) -> Self {
        PointsError::DuplicateReward { reward }
    }

    /// Create an InvalidChange error
    pub fn invalid_change(student: StudentId, current: Points, change: Points) -> Self {
        PointsError::InvalidChange {
            student,
            current,
            change,
        }
    }

    /// Create an InsufficientPoints error
    pub fn insufficient_points(student: StudentId, required: Points, current: Points) -> Self {
        PointsError::InsufficientPoints {
            student,
            required,
            current,
        }
    }

    /// Create a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        PointsError::Validation {
            message: message.into(),
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, student: StudentId) -> Self {
        PointsError::ArithmeticOverflow {
            operation: operation.to_string(),
            student,
        }
    }

    /// Create a MissingField error
    pub fn missing_field(op_type: &str, field: &str) -> Self {
        PointsError::MissingField {
            op_type: op_type.to_string(),
            field: field.to_string(),
        }
    }
}
