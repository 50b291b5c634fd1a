//! Logging utilities for regenradar.
//!
//! Structured `tracing` helpers shared by the refresh cycle, the playback
//! controller and the binary.

use std::time::Instant;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Initialize the tracing subscriber with the given log level
pub fn init_tracing(log_level: &str) {
    let filter = match std::env::var("RUST_LOG") {
        Ok(val) => val,
        Err(_) => log_level.to_string(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();
}

/// Log a start message for a significant operation
pub fn log_operation_start(operation: &str, details: Option<&str>) {
    if let Some(details) = details {
        info!(
            operation = operation,
            details = details,
            "Starting operation"
        );
    } else {
        info!(operation = operation, "Starting operation");
    }
}

/// Log the completion of a significant operation
pub fn log_operation_end(operation: &str, start_time: Instant, success: bool) {
    let duration = start_time.elapsed();
    let duration_ms = duration.as_secs_f64() * 1000.0;

    if success {
        info!(
            operation = operation,
            duration_ms = duration_ms,
            "Operation completed successfully"
        );
    } else {
        warn!(
            operation = operation,
            duration_ms = duration_ms,
            "Operation completed with warnings"
        );
    }
}

/// Log an operation with timing and result in a single statement
pub fn log_timed_operation<F, R>(operation: &str, f: F) -> R
where
    F: FnOnce() -> R,
{
    let start = Instant::now();

    debug!(operation = operation, "Starting operation");

    let result = f();

    debug!(
        operation = operation,
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Operation completed"
    );

    result
}

/// Log the outcome of one refresh cycle
pub fn log_refresh_stats(
    cycle_id: &str,
    generation: u64,
    record_count: usize,
    frame_count: usize,
    grid_width: usize,
    grid_height: usize,
) {
    let skipped = record_count.saturating_sub(frame_count);
    if skipped > 0 {
        warn!(
            operation = "refresh",
            cycle_id = cycle_id,
            generation = generation,
            records = record_count,
            frames = frame_count,
            skipped = skipped,
            grid = %format!("{}x{}", grid_width, grid_height),
            "Refresh completed with skipped records"
        );
    } else {
        info!(
            operation = "refresh",
            cycle_id = cycle_id,
            generation = generation,
            records = record_count,
            frames = frame_count,
            grid = %format!("{}x{}", grid_width, grid_height),
            "Refresh completed"
        );
    }
}

/// Log an error with context
pub fn log_error(error: &crate::error::RadarError, context: &str) {
    error!(
        error = %error,
        context = context,
        error_type = std::any::type_name_of_val(error),
        "Error occurred"
    );
}

/// Generate a unique identifier for a refresh cycle
pub fn generate_cycle_id() -> String {
    Uuid::new_v4().to_string()
}
