//! Batch processing with student-based partitioning for async operation processing
//!
//! This module provides the `BatchProcessor` struct, which manages concurrent
//! batch processing with student-based partitioning to enable parallel
//! processing while maintaining per-student operation ordering.
//!
//! # Design
//!
//! A batch runs in two phases. Administrative operations (enroll, reward,
//! unenroll, retire) apply sequentially in input order first, so the roster
//! and catalog they shape are settled before any balance moves. Point
//! operations (award, deduct, redeem) are then partitioned by student and
//! processed concurrently, one task per student, with each student's
//! operations kept in their original order.
//!
//! # Architecture
//!
//! ```text
//! BatchProcessor
//!     └── Arc<AsyncPointsEngine>  (shared operation processor)
//! ```
//!
//! # Thread Safety
//!
//! The processor is cloneable and can be safely shared across async tasks.
//! All internal state is protected by Arc, and the underlying engine uses
//! thread-safe components.

use std::collections::HashMap;
use std::sync::Arc;

use super::AsyncPointsEngine;
use crate::types::{OperationRecord, PointsError, StudentId};

/// Result of processing a single operation
///
/// Contains the original operation record and the result of processing it.
#[derive(Debug)]
pub struct ProcessingResult {
    /// The operation record that was processed
    pub record: OperationRecord,

    /// The result of processing (success or error)
    pub result: Result<(), PointsError>,
}

/// Batch processor with student-based partitioning
///
/// `BatchProcessor` manages concurrent batch processing by running
/// administrative operations up front and partitioning point operations by
/// student ID. This enables parallel processing of point operations for
/// different students while maintaining sequential ordering for each
/// student.
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    /// Thread-safe points processing engine
    ///
    /// Wrapped in Arc to enable sharing across async tasks.
    engine: Arc<AsyncPointsEngine>,
}

impl BatchProcessor {
    /// Create a new BatchProcessor
    ///
    /// # Arguments
    ///
    /// * `engine` - Arc-wrapped AsyncPointsEngine for operation processing
    pub fn new(engine: Arc<AsyncPointsEngine>) -> Self {
        Self { engine }
    }

    /// Partition point operations by student ID
    ///
    /// Each sub-batch holds the operations of a single student in their
    /// original order. Records with no student field share the `None`
    /// partition; each of those fails with a missing-field error during
    /// processing rather than being dropped here.
    ///
    /// # Guarantees
    ///
    /// - Each operation appears in exactly one sub-batch
    /// - No operations are lost or duplicated
    /// - Operations for each student maintain their original order
    pub fn partition_by_student(
        &self,
        batch: Vec<OperationRecord>,
    ) -> HashMap<Option<StudentId>, Vec<OperationRecord>> {
        let mut student_batches: HashMap<Option<StudentId>, Vec<OperationRecord>> = HashMap::new();

        for record in batch {
            student_batches
                .entry(record.student)
                .or_default()
                .push(record);
        }

        student_batches
    }

    /// Process all operations for a single student sequentially
    ///
    /// Operations are processed in the order they appear in the input
    /// vector, so per-student ordering is maintained even when multiple
    /// students are being processed concurrently. Errors are captured in
    /// the results and don't stop processing.
    pub async fn process_student_operations(
        &self,
        operations: Vec<OperationRecord>,
    ) -> Vec<ProcessingResult> {
        let mut results = Vec::with_capacity(operations.len());

        for record in operations {
            let result = self.engine.process_operation(record.clone());
            results.push(ProcessingResult { record, result });
        }

        results
    }

    /// Process a batch of operations in two phases
    ///
    /// This method processes a batch by:
    /// 1. Running administrative operations sequentially in input order
    /// 2. Partitioning the remaining point operations by student ID
    /// 3. Spawning tokio tasks to process each student's operations concurrently
    /// 4. Waiting for all tasks to complete
    /// 5. Collecting and returning all results
    ///
    /// # Returns
    ///
    /// A vector of `ProcessingResult` containing the outcome of each
    /// operation. Administrative results come first in input order; point
    /// operation results may be in a different order than the input due to
    /// concurrent processing.
    ///
    /// # Guarantees
    ///
    /// - Administrative operations settle before any point operation runs
    /// - Point operations for different students are processed concurrently
    /// - Point operations for the same student are processed sequentially in order
    /// - All operations are processed, even if some fail
    /// - Errors are captured in results and don't stop processing
    pub async fn process_batch(&self, batch: Vec<OperationRecord>) -> Vec<ProcessingResult> {
        let (admin_ops, point_ops): (Vec<OperationRecord>, Vec<OperationRecord>) = batch
            .into_iter()
            .partition(|record| record.op_type.is_administrative());

        // Phase 1: administrative operations, sequentially in input order
        let mut results = Vec::with_capacity(admin_ops.len() + point_ops.len());
        for record in admin_ops {
            let result = self.engine.process_operation(record.clone());
            results.push(ProcessingResult { record, result });
        }

        // Phase 2: point operations, partitioned by student
        let student_batches = self.partition_by_student(point_ops);

        let mut tasks = Vec::new();
        for (_student_id, operations) in student_batches {
            let processor = self.clone();
            let task =
                tokio::spawn(async move { processor.process_student_operations(operations).await });
            tasks.push(task);
        }

        // Wait for all tasks to complete and collect results
        for task in tasks {
            match task.await {
                Ok(student_results) => results.extend(student_results),
                Err(e) => {
                    eprintln!("Task panicked: {:?}", e);
                }
            }
        }

        results
    }
}
