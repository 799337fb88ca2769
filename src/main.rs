//! Classroom Points Engine CLI
//!
//! Command-line interface for processing classroom point operations from CSV files.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- operations.csv > rankings.csv
//! cargo run -- --strategy sync operations.csv > rankings.csv
//! cargo run -- --strategy async operations.csv > rankings.csv
//! cargo run -- --strategy async --batch-size 2000 --max-concurrent 8 operations.csv > rankings.csv
//! cargo run -- --limit 10 operations.csv > rankings.csv
//! ```
//!
//! The program reads operation records from the input CSV file, processes them
//! through the points engine using the selected processing strategy, and outputs
//! the final classroom rankings to stdout.
//!
//! # Processing Strategies
//!
//! - **sync**: Synchronous CSV parsing with single-threaded processing
//! - **async**: Asynchronous batch processing with multi-threaded parallelism (default)
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (missing arguments, file not found, file not readable, etc.)

use classroom_points_engine::cli;
use classroom_points_engine::strategy;
use std::process;

fn main() {
    env_logger::init();

    // Parse command-line arguments using clap
    let args = cli::parse_args();

    // Create the appropriate processing strategy based on CLI arguments
    let strategy = {
        let config = if matches!(args.strategy, cli::StrategyType::Async) {
            Some(args.to_batch_config())
        } else {
            None
        };
        strategy::create_strategy(args.strategy, config, args.limit)
    };

    // Process operations using the selected strategy
    // Output goes to stdout
    let mut output = std::io::stdout();
    if let Err(e) = strategy.process(&args.input_file, &mut output) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
