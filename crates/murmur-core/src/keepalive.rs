//! Keepalive timer.
//!
//! The event loop waits at most one probe interval for input. Each wait that
//! ends with no input asks the timer what to do: probe the remote, or give
//! up because the remote has been silent past the timeout.

use std::{ops::Sub, time::Duration};

/// Default wait before probing a silent remote.
pub const DEFAULT_PROBE_INTERVAL: Duration = Duration::from_secs(120);

/// Default silence after which the remote is presumed unreachable.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Keepalive timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeepaliveConfig {
    probe_interval: Duration,
    timeout: Duration,
}

impl KeepaliveConfig {
    /// Build a configuration.
    ///
    /// The timeout is raised to twice the probe interval if it is shorter, so
    /// at least one probe always goes out before giving up.
    pub fn new(probe_interval: Duration, timeout: Duration) -> Self {
        let floor = probe_interval.saturating_mul(2);
        if timeout < floor {
            tracing::warn!(?timeout, ?floor, "keepalive timeout raised to twice the interval");
        }
        Self { probe_interval, timeout: timeout.max(floor) }
    }

    /// Wait before probing a silent remote.
    pub fn probe_interval(&self) -> Duration {
        self.probe_interval
    }

    /// Silence after which the session is abandoned.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for KeepaliveConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PROBE_INTERVAL, DEFAULT_TIMEOUT)
    }
}

/// What to do after a wait interval passed without input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeepaliveAction {
    /// Send one probe to the remote.
    Probe,

    /// The remote has been silent too long.
    Expired {
        /// Time since the remote was last heard from.
        silent_for: Duration,
    },
}

/// Tracks when the remote was last heard from.
#[derive(Debug, Clone)]
pub struct Keepalive<I> {
    config: KeepaliveConfig,
    last_heard: I,
}

impl<I> Keepalive<I>
where
    I: Copy + Ord + Sub<Output = Duration>,
{
    /// Start tracking at `now`, the moment the connection was established.
    pub fn new(config: KeepaliveConfig, now: I) -> Self {
        Self { config, last_heard: now }
    }

    /// Timing in effect.
    pub fn config(&self) -> &KeepaliveConfig {
        &self.config
    }

    /// Record that a line arrived from the remote at `now`.
    pub fn heard(&mut self, now: I) {
        self.last_heard = self.last_heard.max(now);
    }

    /// Decide what to do after a wait ended with no input at `now`.
    pub fn on_idle(&self, now: I) -> KeepaliveAction {
        let silent_for = now - self.last_heard;
        if silent_for >= self.config.timeout {
            KeepaliveAction::Expired { silent_for }
        } else {
            KeepaliveAction::Probe
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;

    const SECOND: Duration = Duration::from_secs(1);

    #[test]
    fn default_matches_documented_values() {
        let config = KeepaliveConfig::default();
        assert_eq!(config.probe_interval(), Duration::from_secs(120));
        assert_eq!(config.timeout(), Duration::from_secs(300));
    }

    #[test]
    fn short_timeout_is_raised() {
        let config = KeepaliveConfig::new(SECOND * 10, SECOND * 5);
        assert_eq!(config.timeout(), SECOND * 20);
    }

    #[test]
    fn probes_until_timeout() {
        let start = Instant::now();
        let keepalive = Keepalive::new(KeepaliveConfig::default(), start);

        assert_eq!(keepalive.on_idle(start + SECOND * 120), KeepaliveAction::Probe);
        assert_eq!(keepalive.on_idle(start + SECOND * 240), KeepaliveAction::Probe);
        assert_eq!(
            keepalive.on_idle(start + SECOND * 360),
            KeepaliveAction::Expired { silent_for: SECOND * 360 }
        );
    }

    #[test]
    fn hearing_from_remote_resets_silence() {
        let start = Instant::now();
        let mut keepalive = Keepalive::new(KeepaliveConfig::default(), start);

        keepalive.heard(start + SECOND * 250);

        assert_eq!(keepalive.on_idle(start + SECOND * 360), KeepaliveAction::Probe);
    }

    #[test]
    fn heard_never_moves_backwards() {
        let start = Instant::now();
        let mut keepalive = Keepalive::new(KeepaliveConfig::default(), start + SECOND * 100);

        keepalive.heard(start);

        assert_eq!(keepalive.on_idle(start + SECOND * 380), KeepaliveAction::Probe);
    }
}
