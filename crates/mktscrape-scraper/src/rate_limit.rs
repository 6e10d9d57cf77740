//! Request pacing and retry utilities.
//!
//! [`Pacing`] is the wait inserted after every request so a run stays under the
//! source's rate limits. [`retry_with_backoff`] retries transient failures with
//! jittered exponential backoff. Non-retriable errors (parse failures, 4xx,
//! suspected rate limiting) are propagated immediately.

use std::future::Future;
use std::time::Duration;

use mktscrape_core::DelayRange;
use rand::Rng;

use crate::error::ScraperError;

/// Longest single backoff sleep.
const MAX_BACKOFF_SECS: u64 = 600;

/// Wait applied after each request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pacing {
    /// No wait. Used by tests.
    None,
    Fixed(Duration),
    /// Uniformly random wait in `[min, max]`.
    Random { min: Duration, max: Duration },
}

impl Pacing {
    /// Random pacing over a configured range of whole seconds.
    #[must_use]
    pub fn from_range(range: DelayRange) -> Self {
        Self::Random {
            min: Duration::from_secs(range.min_secs),
            max: Duration::from_secs(range.max_secs),
        }
    }

    /// The delay to use for the next wait.
    #[must_use]
    pub fn next_delay(&self) -> Duration {
        match *self {
            Self::None => Duration::ZERO,
            Self::Fixed(d) => d,
            Self::Random { min, max } if max > min => rand::rng().random_range(min..=max),
            Self::Random { min, .. } => min,
        }
    }

    pub async fn wait(&self) {
        let delay = self.next_delay();
        if !delay.is_zero() {
            tracing::debug!(delay_ms = delay.as_millis(), "pacing");
            tokio::time::sleep(delay).await;
        }
    }
}

/// Returns `true` if `err` represents a transient condition that should be
/// retried after a backoff delay.
///
/// Retriable: [`ScraperError::Http`] (network failure or timeout),
/// [`ScraperError::RateLimited`] (HTTP 429), and 5xx
/// [`ScraperError::UnexpectedStatus`].
///
/// [`ScraperError::RateLimitSuspected`] is deliberately not retried: another
/// request only extends the block.
#[must_use]
pub fn is_retriable(err: &ScraperError) -> bool {
    match err {
        ScraperError::Http(_) | ScraperError::RateLimited { .. } => true,
        other => other.is_server_error(),
    }
}

/// Backoff before retry number `attempt + 1`: `base * 2^attempt`, jittered by
/// up to 25% either way and capped at ten minutes.
fn backoff_delay(backoff_base_secs: u64, attempt: u32) -> Duration {
    let exp_secs = backoff_base_secs
        .saturating_mul(1u64 << attempt.min(20))
        .min(MAX_BACKOFF_SECS);
    if exp_secs == 0 {
        return Duration::ZERO;
    }
    #[allow(clippy::cast_precision_loss)]
    let base = exp_secs as f64;
    let jitter = rand::rng().random_range(-0.25..=0.25);
    let max = Duration::from_secs(MAX_BACKOFF_SECS);
    Duration::from_secs_f64(base * (1.0 + jitter)).min(max)
}

/// Executes `operation` with exponential backoff retries on transient errors.
///
/// With `max_retries = 3` the operation is attempted at most 4 times total.
/// A [`ScraperError::RateLimited`] carrying a longer `Retry-After` than the
/// computed backoff waits for the server's value instead (still capped).
///
/// # Errors
///
/// Returns the first non-retriable error, or the last error once retries are
/// exhausted.
pub async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    let mut attempt = 0u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if !is_retriable(&err) || attempt >= max_retries {
            return Err(err);
        }

        let mut delay = backoff_delay(backoff_base_secs, attempt);
        if let ScraperError::RateLimited {
            retry_after_secs, ..
        } = &err
        {
            if backoff_base_secs > 0 {
                let server = Duration::from_secs((*retry_after_secs).min(MAX_BACKOFF_SECS));
                delay = delay.max(server);
            }
        }

        tracing::warn!(
            attempt,
            max_retries,
            delay_secs = delay.as_secs(),
            error = %err,
            "transient fetch error, retrying after backoff"
        );
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn rate_limited(retry_after_secs: u64) -> ScraperError {
        ScraperError::RateLimited {
            domain: "api.pullpush.io".to_owned(),
            retry_after_secs,
        }
    }

    async fn count_calls(
        max_retries: u32,
        make_err: impl Fn(u32) -> Option<ScraperError>,
    ) -> (Result<u32, ScraperError>, u32) {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(max_retries, 0, || {
            let n = c.fetch_add(1, Ordering::SeqCst);
            let outcome = make_err(n).map_or(Ok(n), Err);
            async move { outcome }
        })
        .await;
        (result, calls.load(Ordering::SeqCst))
    }

    #[tokio::test]
    async fn succeeds_immediately_on_first_try() {
        let (result, calls) = count_calls(3, |_| None).await;
        assert_eq!(result.unwrap(), 0);
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn retries_on_rate_limited_then_succeeds() {
        let (result, calls) = count_calls(3, |n| (n < 2).then(|| rate_limited(0))).await;
        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn propagates_last_error_after_exhausting_retries() {
        let (result, calls) = count_calls(2, |_| Some(rate_limited(0))).await;
        assert_eq!(calls, 3);
        assert!(matches!(result, Err(ScraperError::RateLimited { .. })));
    }

    #[tokio::test]
    async fn retries_server_errors_but_not_client_errors() {
        let (result, calls) = count_calls(1, |_| {
            Some(ScraperError::UnexpectedStatus {
                status: 503,
                url: "https://api.pullpush.io".to_owned(),
            })
        })
        .await;
        assert_eq!(calls, 2);
        assert!(result.is_err());

        let (_, calls) = count_calls(3, |_| {
            Some(ScraperError::UnexpectedStatus {
                status: 403,
                url: "https://api.pullpush.io".to_owned(),
            })
        })
        .await;
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn does_not_retry_suspected_rate_limiting() {
        let (result, calls) = count_calls(3, |_| {
            Some(ScraperError::RateLimitSuspected {
                url: "https://api.pullpush.io".to_owned(),
                body_preview: "<html>".to_owned(),
            })
        })
        .await;
        assert_eq!(calls, 1);
        assert!(matches!(result, Err(ScraperError::RateLimitSuspected { .. })));
    }

    #[tokio::test]
    async fn does_not_retry_parse_error() {
        let (_, calls) = count_calls(3, |_| {
            Some(ScraperError::Parse {
                context: "pullpush".to_owned(),
                reason: "missing data array".to_owned(),
            })
        })
        .await;
        assert_eq!(calls, 1);
    }

    #[test]
    fn backoff_is_jittered_within_a_quarter() {
        for attempt in 0..4 {
            let nominal = 30.0 * f64::from(1u32 << attempt);
            let secs = backoff_delay(30, attempt).as_secs_f64();
            assert!(secs >= nominal * 0.75 - 1e-6, "{secs} below range");
            assert!(secs <= nominal * 1.25 + 1e-6, "{secs} above range");
        }
    }

    #[test]
    fn backoff_is_capped_at_ten_minutes() {
        assert!(backoff_delay(30, 15) <= Duration::from_secs(MAX_BACKOFF_SECS));
        assert_eq!(backoff_delay(0, 5), Duration::ZERO);
    }

    #[test]
    fn random_pacing_stays_in_range() {
        let pacing = Pacing::Random {
            min: Duration::from_secs(2),
            max: Duration::from_secs(5),
        };
        for _ in 0..50 {
            let d = pacing.next_delay();
            assert!(d >= Duration::from_secs(2) && d <= Duration::from_secs(5));
        }
        assert_eq!(Pacing::None.next_delay(), Duration::ZERO);
        assert_eq!(
            Pacing::from_range(DelayRange {
                min_secs: 3,
                max_secs: 3
            })
            .next_delay(),
            Duration::from_secs(3)
        );
    }
}
