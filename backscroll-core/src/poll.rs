use crate::error::{NavError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Retry budget for [`wait_for`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaitOptions {
    /// Total number of predicate evaluations, including the first one
    pub max_attempts: u32,
    /// Delay between two evaluations
    pub interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            max_attempts: 20,
            interval_ms: 50,
        }
    }
}

impl WaitOptions {
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_interval_ms(mut self, interval_ms: u64) -> Self {
        self.interval_ms = interval_ms;
        self
    }
}

/// Evaluates `predicate` until it holds, sleeping `interval_ms` between tries.
///
/// Returns the number of evaluations it took. Gives up with
/// [`NavError::MaxRetriesExceeded`] once `max_attempts` evaluations have all
/// been false. A budget of 0 is treated as 1.
pub async fn wait_for<F>(name: &str, options: WaitOptions, mut predicate: F) -> Result<u32>
where
    F: FnMut() -> bool,
{
    let max_attempts = options.max_attempts.max(1);
    let mut attempts = 0;

    loop {
        attempts += 1;
        if predicate() {
            debug!("waitFor: {}: satisfied after {} attempt(s)", name, attempts);
            return Ok(attempts);
        }

        if attempts >= max_attempts {
            return Err(NavError::MaxRetriesExceeded {
                name: name.to_string(),
                attempts,
            });
        }

        debug!("waitFor: {}: waiting ...", name);
        tokio::time::sleep(Duration::from_millis(options.interval_ms)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_always_false_evaluates_exactly_max_attempts() {
        for max_attempts in [1, 2, 5, 20] {
            let calls = Cell::new(0);
            let started = Instant::now();
            let options = WaitOptions::default().with_max_attempts(max_attempts);

            let result = wait_for("never", options, || {
                calls.set(calls.get() + 1);
                false
            })
            .await;

            assert_eq!(calls.get(), max_attempts);
            assert_eq!(
                result,
                Err(NavError::MaxRetriesExceeded {
                    name: "never".to_string(),
                    attempts: max_attempts,
                })
            );
            // no sleep after the last evaluation
            assert_eq!(
                started.elapsed(),
                Duration::from_millis(50 * (max_attempts as u64 - 1))
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_on_kth_evaluation() {
        for k in [1, 3, 7] {
            let calls = Cell::new(0);
            let result = wait_for("kth", WaitOptions::default(), || {
                calls.set(calls.get() + 1);
                calls.get() == k
            })
            .await;

            assert_eq!(result, Ok(k));
            assert_eq!(calls.get(), k);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_is_respected() {
        let started = Instant::now();
        let calls = Cell::new(0);
        let options = WaitOptions::default().with_interval_ms(100);

        wait_for("third", options, || {
            calls.set(calls.get() + 1);
            calls.get() == 3
        })
        .await
        .unwrap();

        assert_eq!(started.elapsed(), Duration::from_millis(200));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_budget_still_evaluates_once() {
        let calls = Cell::new(0);
        let options = WaitOptions::default().with_max_attempts(0);
        let result = wait_for("zero", options, || {
            calls.set(calls.get() + 1);
            false
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: WaitOptions = serde_json::from_str(r#"{"interval_ms": 100}"#).unwrap();
        assert_eq!(options.max_attempts, 20);
        assert_eq!(options.interval_ms, 100);
    }
}
