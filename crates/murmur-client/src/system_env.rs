//! Production Environment implementation using the tokio clock.
//!
//! This module provides `SystemEnv`, the production implementation of the
//! `Environment` trait. It reads time from tokio so that a paused test
//! runtime controls keepalive timing as well as sleeping.

use std::time::Duration;

use murmur_core::Environment;
use tokio::time::Instant;

/// Production environment backed by tokio's clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnv;

impl SystemEnv {
    /// Create a new system environment.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Environment for SystemEnv {
    type Instant = Instant;

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn system_env_sleep_works() {
        let env = SystemEnv::new();

        let start = env.now();
        env.sleep(Duration::from_millis(50)).await;
        let elapsed = env.now() - start;

        assert!(elapsed >= Duration::from_millis(50), "Sleep should wait at least 50ms");
    }

    #[tokio::test(start_paused = true)]
    async fn paused_clock_advances_on_sleep() {
        let env = SystemEnv::new();

        let start = env.now();
        env.sleep(Duration::from_secs(600)).await;

        assert_eq!(env.now() - start, Duration::from_secs(600));
    }
}
