use std::time::Duration;

/// Exponential backoff parameters with a cap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackoffPolicy {
    initial_delay: Duration,
    max_delay: Duration,
    multiplier: f64,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(64),
            multiplier: 2.0,
        }
    }
}

impl BackoffPolicy {
    /// Build a policy. A multiplier below 1 (or non-finite) is treated as 1,
    /// and the initial delay never exceeds the cap.
    pub fn new(initial_delay: Duration, max_delay: Duration, multiplier: f64) -> Self {
        let multiplier = if multiplier.is_finite() && multiplier >= 1.0 {
            multiplier
        } else {
            1.0
        };
        Self {
            initial_delay: initial_delay.min(max_delay),
            max_delay,
            multiplier,
        }
    }

    pub fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    fn grow(&self, delay: Duration) -> Duration {
        let next = delay.as_secs_f64() * self.multiplier;
        let capped = next.min(self.max_delay.as_secs_f64());
        Duration::from_secs_f64(capped)
    }
}

/// Mutable backoff state: the delay to use for the next failure.
///
/// `next_delay` hands out the current delay and grows it for the following
/// failure; `reset` goes back to the initial delay after a successful connect.
#[derive(Debug, Clone)]
pub struct Backoff {
    policy: BackoffPolicy,
    current: Duration,
}

impl Backoff {
    pub fn new(policy: BackoffPolicy) -> Self {
        Self {
            current: policy.initial_delay,
            policy,
        }
    }

    pub fn policy(&self) -> &BackoffPolicy {
        &self.policy
    }

    /// Delay that the next failure will wait for.
    pub fn current(&self) -> Duration {
        self.current
    }

    /// Return the delay for this failure and double it (capped) for the next.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = self.policy.grow(delay);
        delay
    }

    /// Back to the initial delay, regardless of how far the delay had grown.
    pub fn reset(&mut self) {
        self.current = self.policy.initial_delay;
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new(BackoffPolicy::default())
    }
}
