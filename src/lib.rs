//! A constant-space sliding-window event counter.
//!
//! [`SlidingWindowCounter`] records events and answers how many happened in the
//! last N seconds, for N in `1..=300`, at one-second resolution. The rest of the
//! crate is a harness that drives it with synthetic load and reports readings on
//! the console or in a terminal dashboard.
//!
//! ```
//! use rate_window::SlidingWindowCounter;
//!
//! let mut counter = SlidingWindowCounter::new();
//! counter.record();
//! assert_eq!(counter.query(60), 0); // still pending
//! assert_eq!(counter.query(0), -1);
//! ```

pub mod app;
pub mod clock;
pub mod config;
pub mod console;
pub mod constants;
pub mod counter;
pub mod error;
pub mod load;
pub mod logger;
pub mod span;
pub mod ui;
pub mod util;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use counter::SlidingWindowCounter;
pub use error::InvalidArgument;
pub use span::WindowSpan;
