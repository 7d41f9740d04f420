//! Cooperative polling with an optional deadline.

use embedded_hal::delay::DelayNs;

use crate::config::ControllerConfig;

/// How often to poll and when to give up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Delay between polls in milliseconds.
    pub interval_ms: u32,
    /// Maximum accumulated delay before giving up. `None` polls forever.
    pub timeout_ms: Option<u32>,
}

impl PollPolicy {
    /// 100 ms between polls, no deadline.
    pub const DEFAULT: Self = Self {
        interval_ms: 100,
        timeout_ms: None,
    };

    /// Take the poll settings from a controller configuration.
    pub fn from_config(config: &ControllerConfig) -> Self {
        Self {
            interval_ms: config.poll_interval_ms,
            timeout_ms: config.move_timeout_ms,
        }
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Tracks time spent waiting in one polling loop.
///
/// Time is measured as the sum of requested delays, so the deadline is
/// deterministic for a given policy regardless of link latency.
#[derive(Debug, Clone)]
pub struct Poller {
    policy: PollPolicy,
    waited_ms: u64,
    polls: u32,
}

impl Poller {
    /// Start a polling loop.
    pub fn new(policy: PollPolicy) -> Self {
        Self {
            policy,
            waited_ms: 0,
            polls: 0,
        }
    }

    /// Sleep one interval.
    ///
    /// Returns `false` without sleeping once the deadline has been used up.
    pub fn wait<D: DelayNs>(&mut self, delay: &mut D) -> bool {
        if let Some(timeout) = self.policy.timeout_ms {
            if self.waited_ms >= u64::from(timeout) {
                return false;
            }
        }
        delay.delay_ms(self.policy.interval_ms);
        self.waited_ms += u64::from(self.policy.interval_ms);
        self.polls += 1;
        true
    }

    /// Total time slept so far.
    #[inline]
    pub fn waited_ms(&self) -> u64 {
        self.waited_ms
    }

    /// Number of intervals slept so far.
    #[inline]
    pub fn polls(&self) -> u32 {
        self.polls
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::delay::NoopDelay;

    #[test]
    fn test_unbounded_poller_always_waits() {
        let mut poller = Poller::new(PollPolicy::DEFAULT);
        let mut delay = NoopDelay::new();

        for _ in 0..1000 {
            assert!(poller.wait(&mut delay));
        }
        assert_eq!(poller.waited_ms(), 100_000);
    }

    #[test]
    fn test_deadline() {
        let mut poller = Poller::new(PollPolicy {
            interval_ms: 100,
            timeout_ms: Some(250),
        });
        let mut delay = NoopDelay::new();

        assert!(poller.wait(&mut delay));
        assert!(poller.wait(&mut delay));
        assert!(poller.wait(&mut delay));
        assert!(!poller.wait(&mut delay));
        assert_eq!(poller.polls(), 3);
        assert_eq!(poller.waited_ms(), 300);
    }

    #[test]
    fn test_from_config() {
        let config = crate::config::ControllerConfig::from_stages(
            &[Some(crate::config::StageModel::Zfm2030)],
            &[false],
        )
        .unwrap()
        .with_poll_interval_ms(20)
        .with_move_timeout_ms(1000);

        assert_eq!(
            PollPolicy::from_config(&config),
            PollPolicy {
                interval_ms: 20,
                timeout_ms: Some(1000)
            }
        );
    }
}
