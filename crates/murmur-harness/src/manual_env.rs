//! Manually advanced clock.

use std::{
    ops::Sub,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use murmur_core::Environment;

/// Time since the clock was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ManualInstant(Duration);

impl ManualInstant {
    /// Elapsed time since the clock started.
    pub fn elapsed(self) -> Duration {
        self.0
    }
}

impl Sub for ManualInstant {
    type Output = Duration;

    fn sub(self, other: Self) -> Duration {
        self.0.saturating_sub(other.0)
    }
}

/// Environment whose clock moves only via [`ManualEnv::advance`] or `sleep`.
///
/// Clones share the same clock.
#[derive(Debug, Clone, Default)]
pub struct ManualEnv {
    elapsed_ms: Arc<AtomicU64>,
}

impl ManualEnv {
    /// Create a clock at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let millis = u64::try_from(by.as_millis()).unwrap_or(u64::MAX);
        self.elapsed_ms.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Environment for ManualEnv {
    type Instant = ManualInstant;

    fn now(&self) -> Self::Instant {
        ManualInstant(Duration::from_millis(self.elapsed_ms.load(Ordering::SeqCst)))
    }

    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send {
        self.advance(duration);
        std::future::ready(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_clock() {
        let env = ManualEnv::new();
        let other = env.clone();

        other.advance(Duration::from_secs(3));

        assert_eq!(env.now().elapsed(), Duration::from_secs(3));
    }

    #[test]
    fn earlier_minus_later_saturates() {
        let env = ManualEnv::new();
        let before = env.now();
        env.advance(Duration::from_secs(1));

        assert_eq!(before - env.now(), Duration::ZERO);
        assert_eq!(env.now() - before, Duration::from_secs(1));
    }
}
