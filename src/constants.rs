//! Global Constants
//!
//! Centralized constants for configuration and tuning.

/// Report file naming
pub mod report {
    /// Inserted between the source stem and the timestamp
    pub const FILE_SUFFIX: &str = "_documentation";

    /// Timestamp used in report file names
    pub const FILE_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

    /// Timestamp shown in the report's "Generated" line
    pub const DISPLAY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
}

/// Run history constants
pub mod history {
    /// Decimal places kept for a single run's cost
    pub const RUN_COST_DECIMALS: i32 = 6;

    /// Decimal places kept for the summary's total cost
    pub const SUMMARY_COST_DECIMALS: i32 = 4;
}

/// HTTP/Network constants
pub mod network {
    /// Default request timeout (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

    /// Connection timeout (seconds)
    pub const CONNECTION_TIMEOUT_SECS: u64 = 30;
}

/// Round `value` to `decimals` places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
