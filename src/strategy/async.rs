//! Asynchronous batch processing strategy
//!
//! This module provides an asynchronous, multi-threaded implementation of the
//! ProcessingStrategy trait. It processes operations in batches using thread-based
//! parallelism with student-based partitioning.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, max_concurrent_batches)
//!     ├── AsyncReader (batch CSV reading)
//!     ├── BatchProcessor (admin/point phases + student partitioning)
//!     └── AsyncPointsEngine (thread-safe processing)
//!         ├── AsyncStudentRoster (thread-safe student state)
//!         ├── AsyncRewardCatalog (thread-safe reward catalog)
//!         ├── AsyncHistoryLog (thread-safe point history)
//!         └── AsyncRedemptionLog (thread-safe redemption records)
//! ```
//!
//! # Thread-Based Parallelism
//!
//! This strategy uses true thread-based parallelism:
//! - Processes batches sequentially to maintain per-student ordering across entire file
//! - Within each batch, administrative operations run first, then point operations
//!   partitioned by student ID for parallel processing
//! - Spawns worker threads via tokio multi-threaded runtime
//! - Maintains per-student operation ordering both within and across batches
//! - Uses Arc + DashMap for thread-safe shared state

use crate::core::r#async::{
    AsyncHistoryLog, AsyncPointsEngine, AsyncRedemptionLog, AsyncRewardCatalog,
    AsyncStudentRoster, BatchProcessor,
};
use crate::io::async_reader::AsyncReader;
use crate::io::csv_format::write_rankings_csv;
use crate::strategy::ProcessingStrategy;
use log::{debug, warn};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

/// Configuration for batch processing
///
/// Controls how operations are batched and the number of worker threads
/// for parallel processing within each batch.
#[derive(Clone, Debug)]
pub struct BatchConfig {
    /// Number of operations per batch
    pub batch_size: usize,
    /// Maximum number of batches processing concurrently
    pub max_concurrent_batches: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent_batches: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig with custom values
    pub fn new(batch_size: usize, max_concurrent_batches: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            eprintln!(
                "Warning: Invalid batch_size ({}), using default ({})",
                batch_size, default.batch_size
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent_batches = if max_concurrent_batches == 0 {
            eprintln!(
                "Warning: Invalid max_concurrent_batches ({}), using default ({})",
                max_concurrent_batches, default.max_concurrent_batches
            );
            default.max_concurrent_batches
        } else {
            max_concurrent_batches
        };

        Self {
            batch_size,
            max_concurrent_batches,
        }
    }
}

/// Asynchronous batch processing strategy
///
/// Implements the ProcessingStrategy trait using multi-threaded, asynchronous
/// batch processing. Operations are read in batches and processed sequentially
/// (batch-by-batch) to maintain ordering guarantees. Within each batch,
/// administrative operations run first in input order, then point operations
/// are partitioned by student ID and processed in parallel across threads.
///
/// # Thread Safety
///
/// AsyncProcessingStrategy is Send + Sync and uses thread-safe components
/// internally (Arc-wrapped AsyncPointsEngine with DashMap-based state).
///
/// # Configuration
///
/// The strategy accepts a BatchConfig with:
/// - `batch_size`: Number of operations per batch (default: 1000)
/// - `max_concurrent_batches`: Number of worker threads (default: CPU cores)
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    /// Batch processing configuration
    config: BatchConfig,
    /// Optional cap on ranked students per classroom
    limit: Option<usize>,
}

impl AsyncProcessingStrategy {
    /// Create a new AsyncProcessingStrategy with the specified configuration
    ///
    /// # Arguments
    ///
    /// * `config` - BatchConfig with batch_size and max_concurrent_batches
    /// * `limit` - Optional cap on the number of ranked students per classroom
    ///
    /// # Returns
    ///
    /// A new `AsyncProcessingStrategy` configured for batch processing
    pub fn new(config: BatchConfig, limit: Option<usize>) -> Self {
        Self { config, limit }
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    /// Process operations from input file and write rankings to output
    ///
    /// This method implements the complete asynchronous batch processing pipeline:
    /// 1. Creates thread-safe engine components (AsyncPointsEngine, etc.)
    /// 2. Creates a BatchProcessor for phased, student-partitioned processing
    /// 3. Creates a tokio multi-threaded runtime
    /// 4. Reads operations in batches from CSV using AsyncReader
    /// 5. Processes each batch sequentially (waits for completion before next batch)
    /// 6. Within each batch, processes different students in parallel
    /// 7. Collects final classroom rankings
    /// 8. Writes rankings to output using csv_format module
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
    /// Fatal errors (file not found, I/O errors, runtime errors) are returned immediately.
    /// Individual operation errors are logged and processing continues.
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String> {
        // Create tokio runtime for async execution
        // Use multi-threaded runtime with configured number of worker threads
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent_batches)
            .build()
            .map_err(|e| format!("Failed to create tokio runtime: {}", e))?;

        // Execute async processing within the runtime
        runtime.block_on(async {
            // Create thread-safe engine components
            let roster = Arc::new(AsyncStudentRoster::new());
            let catalog = Arc::new(AsyncRewardCatalog::new());
            let history = Arc::new(AsyncHistoryLog::new());
            let redemptions = Arc::new(AsyncRedemptionLog::new());
            let engine = Arc::new(AsyncPointsEngine::new(
                Arc::clone(&roster),
                Arc::clone(&catalog),
                Arc::clone(&history),
                Arc::clone(&redemptions),
            ));

            // Create batch processor
            let processor = BatchProcessor::new(Arc::clone(&engine));

            // Open the CSV file
            let file = tokio::fs::File::open(input_path)
                .await
                .map_err(|e| format!("Failed to open file '{}': {}", input_path.display(), e))?;

            // Wrap tokio file in a compatibility layer for csv-async
            let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);

            // Create async CSV reader
            let mut reader = AsyncReader::new(compat_file);

            // Process batches sequentially to maintain per-student ordering across entire file
            // Each batch is still processed in parallel across different students
            loop {
                // Read a batch of records using AsyncReader
                let batch = reader.read_batch(self.config.batch_size).await;

                // If batch is empty, we've reached end of file
                if batch.is_empty() {
                    break;
                }

                // Process batch and wait for completion before reading next batch
                // This ensures that if a student's operations span multiple batches,
                // they are processed in the correct order
                let results = processor.process_batch(batch).await;

                let mut applied = 0usize;
                for outcome in &results {
                    match &outcome.result {
                        Ok(()) => applied += 1,
                        Err(e) => warn!("Operation processing error: {}", e),
                    }
                }
                debug!(
                    "Batch complete: {} applied, {} rejected",
                    applied,
                    results.len() - applied
                );
            }

            // Compute final classroom rankings
            let rankings = engine.rankings_by_classroom(self.limit);

            // Write rankings to output using csv_format module
            write_rankings_csv(&rankings, output)?;

            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Helper function to create a temporary CSV file for testing
    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    #[test]
    fn test_async_strategy_processes_valid_enroll() {
        let csv_content = "op,classroom,student,reward,points,text\nenroll,100,1,,,An\n";
        let file = create_temp_csv(csv_content);

        let config = BatchConfig::default();
        let strategy = AsyncProcessingStrategy::new(config, None);
        let mut output = Vec::new();

        let result = strategy.process(file.path(), &mut output);
        assert!(result.is_ok());

        let output_str = String::from_utf8(output).unwrap();
        assert!(output_str.contains("classroom,position,student"));
        assert!(output_str.contains("100,1,1,An"));
    }

    #[test]
    fn test_async_strategy_processes_multiple_students() {
        let csv_content = "op,classroom,student,reward,points,text\n\
                          enroll,100,1,,,An\n\
                          enroll,100,2,,,Binh\n\
                          award,,1,,30,Quiz win\n\
                          award,,2,,80,Science fair\n";
        let file = create_temp_csv(csv_content);

        let config = BatchConfig::default();
        let strategy = AsyncProcessingStrategy::new(config, None);
        let mut output = Vec::new();

        let result = strategy.process(file.path(), &mut output);
        assert!(result.is_ok());

        let output_str = String::from_utf8(output).unwrap();
        assert!(output_str.contains("100,1,2,Binh,,80,silver,0"));
        assert!(output_str.contains("100,2,1,An,,30,bronze,0"));
    }

    #[test]
    fn test_async_strategy_handles_missing_file() {
        let config = BatchConfig::default();
        let strategy = AsyncProcessingStrategy::new(config, None);
        let mut output = Vec::new();

        let result = strategy.process(Path::new("nonexistent.csv"), &mut output);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Failed to open file"));
    }

    #[test]
    fn test_async_strategy_maintains_ordering_across_batches() {
        // This test verifies that sequential batch processing maintains
        // per-student ordering even when a student's operations span
        // multiple batches
        let csv_content = "op,classroom,student,reward,points,text\n\
                          enroll,100,1,,,An\n\
                          enroll,100,2,,,Binh\n\
                          award,,1,,100,Project\n\
                          award,,2,,50,Quiz win\n\
                          deduct,,1,,30,Missed practice\n\
                          award,,2,,25,Homework\n\
                          deduct,,1,,20,Late homework\n";
        let file = create_temp_csv(csv_content);

        // Use a small batch size to force multiple batches
        let config = BatchConfig::new(2, num_cpus::get());
        let strategy = AsyncProcessingStrategy::new(config, None);
        let mut output = Vec::new();

        let result = strategy.process(file.path(), &mut output);
        assert!(result.is_ok());

        let output_str = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = output_str.lines().collect();

        // Student 1's balance should be 100 - 30 - 20 = 50
        let student1_line = lines.iter().find(|line| line.contains(",1,An,")).unwrap();
        assert!(
            student1_line.contains(",50,"),
            "Student 1 should have 50 points, got: {}",
            student1_line
        );

        // Student 2's balance should be 50 + 25 = 75
        let student2_line = lines.iter().find(|line| line.contains(",2,Binh,")).unwrap();
        assert!(
            student2_line.contains(",75,"),
            "Student 2 should have 75 points, got: {}",
            student2_line
        );
    }

    #[test]
    fn test_async_strategy_applies_limit() {
        let csv_content = "op,classroom,student,reward,points,text\n\
                          enroll,100,1,,,An\n\
                          enroll,100,2,,,Binh\n\
                          enroll,100,3,,,Chi\n\
                          award,,3,,60,Science fair\n";
        let file = create_temp_csv(csv_content);

        let config = BatchConfig::default();
        let strategy = AsyncProcessingStrategy::new(config, Some(2));
        let mut output = Vec::new();

        let result = strategy.process(file.path(), &mut output);
        assert!(result.is_ok());

        let output_str = String::from_utf8(output).unwrap();
        let data_lines = output_str.lines().skip(1).count();
        assert_eq!(data_lines, 2);
        assert!(output_str.contains("100,1,3,Chi"));
    }

    #[test]
    fn test_async_strategy_redemption_within_batch() {
        // Enrollment, reward creation, and the point operations that depend
        // on them all land in one batch; the admin phase must run first
        let csv_content = "op,classroom,student,reward,points,text\n\
                          enroll,100,1,,,An\n\
                          reward,100,,7,90,Homework pass\n\
                          award,,1,,100,Project\n\
                          redeem,,1,7,,\n";
        let file = create_temp_csv(csv_content);

        let config = BatchConfig::default();
        let strategy = AsyncProcessingStrategy::new(config, None);
        let mut output = Vec::new();

        let result = strategy.process(file.path(), &mut output);
        assert!(result.is_ok());

        let output_str = String::from_utf8(output).unwrap();
        assert!(output_str.contains("100,1,1,An,,10,bronze,0"));
    }
}
