//! Processing strategy module for operation processing
//!
//! This module defines the Strategy pattern for complete operation processing pipelines,
//! encompassing both CSV parsing and points engine processing. This allows different
//! processing implementations (synchronous, asynchronous batch) to be selected at runtime.

use crate::cli::StrategyType;
use std::io::Write;
use std::path::Path;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Processing strategy trait for complete operation processing pipelines
///
/// This trait defines the interface for different operation processing implementations.
/// Each strategy must be able to read operations from a CSV file, process them through
/// the appropriate engine, and write the final classroom rankings to output.
pub trait ProcessingStrategy: Send + Sync {
    /// Process operations from input file and write rankings to output
    ///
    /// This method reads operation records from the specified CSV file, processes
    /// them through the appropriate points engine, and writes the final classroom
    /// rankings to the provided output writer.
    ///
    /// # Arguments
    ///
    /// * `input_path` - Path to the input CSV file containing operation records
    /// * `output` - Mutable reference to a writer for outputting rankings
    ///
    /// # Returns
    ///
    /// * `Ok(())` if all processing completed successfully (or with recoverable errors)
    /// * `Err(String)` if a fatal error occurred (file not found, I/O error, etc.)
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The input file cannot be opened (file not found, permission denied)
    /// - A fatal I/O error occurs during reading or writing
    /// - The CSV structure is fundamentally invalid
    /// - Output cannot be written
    ///
    /// Individual operation processing errors should be logged but should not
    /// cause this method to return an error. Processing should continue with
    /// the next operation.
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String>;
}

/// Create a processing strategy based on the specified strategy type
///
/// This factory function implements the Strategy pattern by selecting and
/// instantiating the appropriate processing strategy implementation at runtime
/// based on the provided strategy type and optional configuration.
///
/// # Arguments
///
/// * `strategy_type` - The type of processing strategy to create (Sync or Async)
/// * `config` - Optional configuration for async batch processing (ignored for sync)
/// * `limit` - Optional cap on the number of ranked students per classroom
///
/// # Returns
///
/// A boxed trait object implementing the ProcessingStrategy trait
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<crate::strategy::BatchConfig>,
    limit: Option<usize>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy::new(limit)),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncProcessingStrategy::new(config, limit))
        }
    }
}
