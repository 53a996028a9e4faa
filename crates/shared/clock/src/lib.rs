//! Paper-Trading Clocks
//!
//! Time sources behind the [`Clock`] port:
//!
//! - [`SystemClock`] - wall-clock time, used by the server
//! - [`ManualClock`] - frozen time that only moves when told to, used to
//!   drive cache expiry and order timestamps deterministically in tests
//!
//! ```ignore
//! use papertrade_clock::{Clock, ManualClock};
//! use chrono::Duration;
//!
//! let clock = ManualClock::new(None);
//! let t0 = clock.now();
//! clock.advance(Duration::minutes(5));
//! assert_eq!(clock.now() - t0, Duration::minutes(5));
//! ```

mod manual;
mod system;

pub use manual::ManualClock;
pub use system::SystemClock;

// Re-export the Clock trait for convenience
pub use papertrade_ports::Clock;
