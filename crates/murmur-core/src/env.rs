//! Environment abstraction for deterministic testing.
//!
//! The `Environment` trait decouples the dispatcher's timers from the system
//! clock. Production code runs on the tokio clock and timers; tests
//! drive a manual clock and never sleep.
//!
//! # Invariants
//!
//! - Monotonicity: `env.now()` must never go backwards
//! - Isolation: Implementations must not share global state

use std::{fmt, ops::Sub, time::Duration};

/// Abstract environment providing time and async sleeping.
pub trait Environment: Clone + Send + Sync + 'static {
    /// Point-in-time type. Subtracting two instants yields the elapsed time.
    type Instant: Copy + Ord + Sub<Output = Duration> + fmt::Debug + Send + Sync;

    /// Returns the current time.
    ///
    /// # Invariants
    ///
    /// - Monotonicity: Subsequent calls must return times >= previous calls.
    fn now(&self) -> Self::Instant;

    /// Sleeps for the specified duration.
    ///
    /// Only the event loop awaits this; the dispatcher itself never blocks.
    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send;
}
