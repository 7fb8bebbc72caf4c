use std::time::Duration;

pub const WINDOW_SECS: usize = 300;
pub const ROTATION_INTERVAL: Duration = Duration::from_secs(1);

// Returned by the sentinel query API for an invalid window.
pub const INVALID_QUERY: i64 = -1;

pub const TICK_RATE_MS: u64 = 500;
pub const DEFAULT_RUN_SECS: u64 = 10;

// Upper bound on records per pump so input and redraws stay responsive.
pub const PUMP_BATCH: u64 = 10_000;
pub const BURST_MS: u64 = 200;

pub const REPORT_WINDOWS: [u16; 3] = [1, 10, 60];
