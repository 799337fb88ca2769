//! Synchronous processing strategy
//!
//! This module provides a synchronous, single-threaded implementation of the
//! ProcessingStrategy trait. It orchestrates operation processing by coordinating
//! between the SyncReader (for CSV input) and PointsEngine (for business logic).
//!
//! # Design
//!
//! The SyncProcessingStrategy focuses on orchestration, delegating:
//! - CSV parsing to `SyncReader` (iterator interface)
//! - Operation processing to `PointsEngine` (business logic)
//! - CSV output to `csv_format::write_rankings_csv` (format handling)
//!
//! This separation of concerns makes the code more maintainable and testable.
//!
//! # Memory Efficiency
//!
//! This strategy maintains constant memory usage:
//! - Processes CSV records one at a time (streaming via iterator)
//! - Does not load entire file into memory
//! - Memory usage is O(students + history), not O(all_operations)
//!
//! # Thread Safety
//!
//! While this strategy is single-threaded, it implements Send + Sync to be
//! compatible with the ProcessingStrategy trait, allowing it to be used in
//! multi-threaded contexts if needed.

use crate::core::PointsEngine;
use crate::io::csv_format::write_rankings_csv;
use crate::io::sync_reader::SyncReader;
use crate::strategy::ProcessingStrategy;
use log::{debug, warn};
use std::io::Write;
use std::path::Path;

/// Synchronous processing strategy
///
/// Implements the ProcessingStrategy trait using single-threaded, synchronous
/// processing. Orchestrates the flow between CSV reading, operation processing,
/// and rankings output.
///
/// # Examples
///
/// ```no_run
/// use classroom_points_engine::strategy::{ProcessingStrategy, SyncProcessingStrategy};
/// use std::path::Path;
/// use std::io;
///
/// let strategy = SyncProcessingStrategy::new(None);
/// let mut output = io::stdout();
///
/// strategy.process(Path::new("operations.csv"), &mut output)
///     .expect("Processing failed");
/// ```
///
/// # Thread Safety
///
/// SyncProcessingStrategy is Send + Sync, allowing it to be shared across threads
/// safely, even though it performs single-threaded processing.
#[derive(Debug, Clone, Copy)]
pub struct SyncProcessingStrategy {
    /// Optional cap on ranked students per classroom
    limit: Option<usize>,
}

impl SyncProcessingStrategy {
    /// Create a new SyncProcessingStrategy
    ///
    /// # Arguments
    ///
    /// * `limit` - Optional cap on the number of ranked students per classroom
    pub fn new(limit: Option<usize>) -> Self {
        Self { limit }
    }
}

impl ProcessingStrategy for SyncProcessingStrategy {
    /// Process operations from input file and write rankings to output
    ///
    /// This method orchestrates the complete synchronous processing pipeline:
    /// 1. Creates a SyncReader to stream operation records from the CSV file
    /// 2. Creates a PointsEngine to process operations
    /// 3. Iterates through records, processing each through the engine
    /// 4. Collects final classroom rankings from the engine
    /// 5. Writes rankings to output using csv_format::write_rankings_csv
    ///
    /// # Arguments
    ///
    /// * `input_path` - Path to the input CSV file
    /// * `output` - Mutable reference to a writer for outputting rankings
    ///
    /// # Returns
    ///
    /// * `Ok(())` if processing completed successfully
    /// * `Err(String)` if a fatal error occurred
    ///
    /// # Error Handling
    ///
    /// Fatal errors (file not found, I/O errors) are returned immediately.
    /// Individual operation errors are logged and processing continues.
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String> {
        // Create points engine
        let mut engine = PointsEngine::new();

        // Create sync reader for streaming CSV input
        let reader = SyncReader::new(input_path)?;

        // Process each operation record through the engine
        // The iterator interface allows us to process one record at a time
        for result in reader {
            match result {
                Ok(operation_record) => {
                    // Individual operation errors are logged and skipped
                    let op_type = operation_record.op_type;
                    match engine.process(operation_record) {
                        Ok(()) => debug!("Applied {:?} operation", op_type),
                        Err(e) => warn!("Operation processing error: {}", e),
                    }
                }
                Err(e) => {
                    warn!("CSV parsing error: {}", e);
                }
            }
        }

        // Compute final classroom rankings
        let rankings = engine.rankings_by_classroom(self.limit);

        // Write rankings to output using csv_format module
        write_rankings_csv(&rankings, output)?;

        Ok(())
    }
}
