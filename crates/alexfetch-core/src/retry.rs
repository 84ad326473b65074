//! Injectable retry with exponential backoff for page requests

use std::time::Duration;

use crate::error::FetchError;

/// How many times a retryable failure is re-attempted, and how long to wait.
///
/// The default is [`RetryPolicy::none`]: every failure is fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// No retries
    pub const fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::ZERO,
        }
    }

    pub const fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Exponential backoff: base * 2^(attempt-1) (base, 2*base, 4*base, ...)
    pub fn backoff_duration(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

/// Retry a fallible request under `policy`.
///
/// Non-retryable errors and exhaustion return the last error unchanged.
pub fn retry_with_backoff<T>(
    label: &str,
    policy: &RetryPolicy,
    mut attempt_fn: impl FnMut() -> Result<T, FetchError>,
) -> Result<T, FetchError> {
    let max_retries = policy.max_retries;
    let mut attempt = 0u32;
    loop {
        match attempt_fn() {
            Ok(v) => return Ok(v),
            Err(e) if attempt < max_retries && e.is_retryable() => {
                attempt += 1;
                let delay = policy.backoff_duration(attempt);
                log::warn!("{label}: attempt {attempt}/{max_retries} failed: {e}, retrying in {delay:?}");
                std::thread::sleep(delay);
            }
            Err(e) => {
                if attempt > 0 {
                    log::error!("{label}: failed permanently after {attempt} retries: {e}");
                }
                return Err(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http_err(status: u16) -> FetchError {
        FetchError::Http {
            status: Some(status),
            message: "test".to_string(),
        }
    }

    #[test]
    fn backoff_exponential() {
        let policy = RetryPolicy::new(3, Duration::from_secs(2));
        assert_eq!(policy.backoff_duration(1), Duration::from_secs(2));
        assert_eq!(policy.backoff_duration(2), Duration::from_secs(4));
        assert_eq!(policy.backoff_duration(3), Duration::from_secs(8));
    }

    #[test]
    fn default_is_none() {
        assert_eq!(RetryPolicy::default(), RetryPolicy::none());
    }

    #[test]
    fn none_fails_on_first_error() {
        let mut calls = 0;
        let result: Result<(), _> = retry_with_backoff("t", &RetryPolicy::none(), || {
            calls += 1;
            Err(http_err(503))
        });
        assert!(result.is_err());
        assert_eq!(calls, 1);
    }

    #[test]
    fn retries_transient_then_succeeds() {
        let policy = RetryPolicy::new(3, Duration::ZERO);
        let mut calls = 0;
        let result = retry_with_backoff("t", &policy, || {
            calls += 1;
            if calls < 3 { Err(http_err(500)) } else { Ok(calls) }
        });
        assert_eq!(result.unwrap(), 3);
    }

    #[test]
    fn gives_up_after_max_retries() {
        let policy = RetryPolicy::new(2, Duration::ZERO);
        let mut calls = 0;
        let result: Result<(), _> = retry_with_backoff("t", &policy, || {
            calls += 1;
            Err(http_err(429))
        });
        assert!(matches!(result, Err(FetchError::Http { status: Some(429), .. })));
        assert_eq!(calls, 3);
    }

    #[test]
    fn permanent_error_not_retried() {
        let policy = RetryPolicy::new(5, Duration::ZERO);
        let mut calls = 0;
        let result: Result<(), _> = retry_with_backoff("t", &policy, || {
            calls += 1;
            Err(http_err(404))
        });
        assert!(result.is_err());
        assert_eq!(calls, 1);
    }
}
