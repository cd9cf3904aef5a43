//! Bounded polling.
//!
//! Timeouts here are attempt counts, not wall-clock deadlines: the worst case
//! is `max_attempts` probes with `delay` between consecutive ones.

use std::time::Duration;

use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(12, Duration::from_secs(10))
    }
}

impl From<mlws_config::ReclaimSettings> for RetryPolicy {
    fn from(settings: mlws_config::ReclaimSettings) -> Self {
        Self::new(settings.max_attempts, settings.delay())
    }
}

/// Blocking wait between attempts.
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

/// Sleeps the current thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome<T> {
    /// `predicate` held on attempt number `attempts`.
    Satisfied { attempts: u32, value: T },
    /// Every attempt ran and none satisfied `predicate`.
    Exhausted { attempts: u32, last: Option<T> },
}

impl<T> PollOutcome<T> {
    pub fn attempts(&self) -> u32 {
        match self {
            PollOutcome::Satisfied { attempts, .. } | PollOutcome::Exhausted { attempts, .. } => {
                *attempts
            }
        }
    }

    pub fn is_satisfied(&self) -> bool {
        matches!(self, PollOutcome::Satisfied { .. })
    }
}

/// Probe up to `policy.max_attempts` times, returning as soon as `predicate`
/// accepts a probe result. Probe errors abort the poll immediately.
///
/// `probe` receives the 1-based attempt number. There is no sleep after the
/// final attempt.
pub fn poll_until<T, E, P, F>(
    policy: &RetryPolicy,
    sleeper: &dyn Sleeper,
    mut probe: P,
    predicate: F,
) -> Result<PollOutcome<T>, E>
where
    P: FnMut(u32) -> Result<T, E>,
    F: Fn(&T) -> bool,
{
    let mut last = None;
    for attempt in 1..=policy.max_attempts {
        let value = probe(attempt)?;
        if predicate(&value) {
            return Ok(PollOutcome::Satisfied {
                attempts: attempt,
                value,
            });
        }
        last = Some(value);

        if attempt < policy.max_attempts {
            trace!(
                attempt,
                delay_ms = policy.delay.as_millis() as u64,
                "Condition not met, sleeping"
            );
            sleeper.sleep(policy.delay);
        }
    }

    Ok(PollOutcome::Exhausted {
        attempts: policy.max_attempts,
        last,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::RecordingSleeper;

    #[test]
    fn test_short_circuits_on_first_success() {
        let sleeper = RecordingSleeper::default();
        let mut probes = 0;
        let outcome: Result<_, ()> = poll_until(
            &RetryPolicy::new(5, Duration::from_secs(1)),
            &sleeper,
            |_| {
                probes += 1;
                Ok(probes)
            },
            |n| *n == 2,
        );

        assert_eq!(
            outcome,
            Ok(PollOutcome::Satisfied {
                attempts: 2,
                value: 2
            })
        );
        assert_eq!(probes, 2);
        assert_eq!(sleeper.sleeps(), vec![Duration::from_secs(1)]);
    }

    #[test]
    fn test_exhausts_after_exact_budget() {
        let sleeper = RecordingSleeper::default();
        let mut seen = Vec::new();
        let outcome: Result<_, ()> = poll_until(
            &RetryPolicy::new(4, Duration::from_millis(5)),
            &sleeper,
            |attempt| {
                seen.push(attempt);
                Ok(false)
            },
            |ok| *ok,
        );

        assert_eq!(
            outcome,
            Ok(PollOutcome::Exhausted {
                attempts: 4,
                last: Some(false)
            })
        );
        assert_eq!(seen, vec![1, 2, 3, 4]);
        assert_eq!(sleeper.sleeps().len(), 3);
    }

    #[test]
    fn test_probe_error_stops_polling() {
        let sleeper = RecordingSleeper::default();
        let mut calls = 0;
        let outcome: Result<PollOutcome<bool>, &str> = poll_until(
            &RetryPolicy::new(10, Duration::ZERO),
            &sleeper,
            |_| {
                calls += 1;
                if calls == 3 {
                    Err("provider unavailable")
                } else {
                    Ok(false)
                }
            },
            |ok| *ok,
        );

        assert_eq!(outcome, Err("provider unavailable"));
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_zero_budget_never_probes() {
        let sleeper = RecordingSleeper::default();
        let outcome: Result<PollOutcome<bool>, ()> = poll_until(
            &RetryPolicy::new(0, Duration::ZERO),
            &sleeper,
            |_| panic!("must not probe"),
            |ok| *ok,
        );
        assert_eq!(
            outcome,
            Ok(PollOutcome::Exhausted {
                attempts: 0,
                last: None
            })
        );
    }
}
