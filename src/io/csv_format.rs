//! CSV format handling for operation records and ranking output
//!
//! This module centralizes all CSV format concerns, providing:
//! - OperationCsvRecord structure for deserialization
//! - Conversion from CSV records to domain types
//! - Ranking output serialization
//!
//! All functions are pure (no I/O) for easy testing.

use crate::types::{
    ClassroomId, OperationRecord, OperationType, Points, RankingEntry, RewardId, StudentId,
};
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// CSV record structure for deserialization
///
/// Matches the input CSV format with columns: op, classroom, student,
/// reward, points, text. Only the op column is present on every row; each
/// operation kind uses its own subset of the rest, so they deserialize as
/// raw optional strings and are parsed during conversion.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct OperationCsvRecord {
    pub op: String,
    pub classroom: Option<String>,
    pub student: Option<String>,
    pub reward: Option<String>,
    pub points: Option<String>,
    pub text: Option<String>,
}

/// Parse an optional numeric column
///
/// Blank and absent cells both count as absent. A present cell that fails
/// to parse is a conversion error naming the column.
fn parse_column<T: FromStr>(
    value: Option<&String>,
    op: &str,
    column: &str,
) -> Result<Option<T>, String> {
    match value {
        Some(raw) if !raw.trim().is_empty() => match raw.trim().parse::<T>() {
            Ok(parsed) => Ok(Some(parsed)),
            Err(_) => Err(format!(
                "Invalid {} '{}' in {} operation",
                column, raw, op
            )),
        },
        _ => Ok(None),
    }
}

/// Require a column that the operation kind cannot do without
fn require<T>(value: Option<T>, op: &str, column: &str) -> Result<T, String> {
    value.ok_or_else(|| format!("{} operation requires a {} column", op, column))
}

/// Convert an OperationCsvRecord to an OperationRecord
///
/// This function:
/// - Parses the operation type string into an OperationType enum
/// - Parses the numeric columns that are present
/// - Validates that the columns the operation kind requires are present
///
/// Sign and business rules (positive amounts, non-blank deduction reasons)
/// are left to the engine, which re-checks field presence as well.
///
/// # Returns
///
/// Result containing either:
/// - Ok(OperationRecord) - Successfully converted record
/// - Err(String) - Error message describing the conversion failure
pub fn convert_operation_record(csv_record: OperationCsvRecord) -> Result<OperationRecord, String> {
    let op = csv_record.op.to_lowercase();
    let op_type = match op.as_str() {
        "enroll" => OperationType::Enroll,
        "reward" => OperationType::Reward,
        "award" => OperationType::Award,
        "deduct" => OperationType::Deduct,
        "redeem" => OperationType::Redeem,
        "unenroll" => OperationType::Unenroll,
        "retire" => OperationType::Retire,
        _ => return Err(format!("Invalid operation type: '{}'", csv_record.op)),
    };

    let classroom: Option<ClassroomId> =
        parse_column(csv_record.classroom.as_ref(), &op, "classroom")?;
    let student: Option<StudentId> = parse_column(csv_record.student.as_ref(), &op, "student")?;
    let reward: Option<RewardId> = parse_column(csv_record.reward.as_ref(), &op, "reward")?;
    let points: Option<Points> = parse_column(csv_record.points.as_ref(), &op, "points")?;
    let text = csv_record
        .text
        .filter(|t| !t.trim().is_empty());

    // Validate column presence based on operation type
    match op_type {
        OperationType::Enroll => {
            require(classroom, &op, "classroom")?;
            require(student, &op, "student")?;
            require(text.as_ref(), &op, "text")?;
        }
        OperationType::Reward => {
            require(classroom, &op, "classroom")?;
            require(reward, &op, "reward")?;
            require(points, &op, "points")?;
            require(text.as_ref(), &op, "text")?;
        }
        OperationType::Award => {
            require(student, &op, "student")?;
            require(points, &op, "points")?;
        }
        OperationType::Deduct => {
            require(student, &op, "student")?;
            require(points, &op, "points")?;
            require(text.as_ref(), &op, "text")?;
        }
        OperationType::Redeem => {
            require(student, &op, "student")?;
            require(reward, &op, "reward")?;
        }
        OperationType::Unenroll => {
            require(student, &op, "student")?;
        }
        OperationType::Retire => {
            require(reward, &op, "reward")?;
        }
    }

    Ok(OperationRecord {
        op_type,
        classroom,
        student,
        reward,
        points,
        text,
    })
}

/// Write classroom rankings to CSV format
///
/// Writes rankings in CSV format with columns: classroom, position,
/// student, name, avatar, points, tier, trend. The caller supplies the
/// views grouped per classroom; groups are written in the given order and
/// rows within a group in position order. An absent avatar writes as an
/// empty cell.
///
/// # Returns
///
/// * `Ok(())` if writing succeeded
/// * `Err(String)` if a write error occurred
pub fn write_rankings_csv(
    views: &[(ClassroomId, Vec<RankingEntry>)],
    output: &mut dyn Write,
) -> Result<(), String> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    // Write header
    writer
        .write_record([
            "classroom", "position", "student", "name", "avatar", "points", "tier", "trend",
        ])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    for (classroom, entries) in views {
        for entry in entries {
            writer
                .write_record(&[
                    classroom.to_string(),
                    entry.position.to_string(),
                    entry.student_id.to_string(),
                    entry.name.clone(),
                    entry.avatar.clone().unwrap_or_default(),
                    entry.total_points.to_string(),
                    entry.tier.to_string(),
                    entry.trend.to_string(),
                ])
                .map_err(|e| format!("Failed to write ranking record: {}", e))?;
        }
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}
