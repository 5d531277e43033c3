//! Retry policy and per-request retry state
//!
//! Status dispatch is a pure function over [`RETRYABLE_STATUSES`]; the fetch
//! loop feeds every failure into a [`RetryState`] and obeys its decision.

use crate::error::Error;
use std::time::Duration;

/// Statuses that are retried with backoff
pub const RETRYABLE_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// Outcome class of an HTTP status code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// 2xx
    Success,
    /// Transient, worth another attempt
    Retryable,
    /// Fails immediately without consuming a retry
    Terminal(TerminalKind),
}

/// Kind of terminal failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalKind {
    /// 401 or 403
    Authentication,
    /// 404
    NotFound,
    /// Any other non-retryable status
    Other,
}

/// Classify an HTTP status code
pub fn classify_status(status: u16) -> StatusClass {
    match status {
        200..=299 => StatusClass::Success,
        s if RETRYABLE_STATUSES.contains(&s) => StatusClass::Retryable,
        401 | 403 => StatusClass::Terminal(TerminalKind::Authentication),
        404 => StatusClass::Terminal(TerminalKind::NotFound),
        _ => StatusClass::Terminal(TerminalKind::Other),
    }
}

/// Retry limits and backoff timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries allowed after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry
    pub initial_backoff: Duration,
    /// Upper bound for any single delay
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// Exponential delay before retry number `attempt + 1`
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        let delay = self
            .initial_backoff
            .checked_mul(factor)
            .unwrap_or(self.max_backoff);
        delay.min(self.max_backoff)
    }

    /// Delay for a failure, honoring a server supplied `Retry-After`
    pub fn delay_for(&self, attempt: u32, error: &Error) -> Duration {
        let backoff = self.backoff(attempt);
        match error {
            Error::RateLimited {
                retry_after_seconds: Some(secs),
            } => backoff.max(Duration::from_secs(*secs)).min(self.max_backoff),
            _ => backoff,
        }
    }
}

/// What the fetch loop should do next
#[derive(Debug)]
pub enum RetryDecision {
    /// Sleep, then send again
    Retry {
        /// One-based number of the retry about to happen
        attempt: u32,
        delay: Duration,
    },
    /// Stop and surface this error
    Fail(Error),
}

/// Transient per-request retry bookkeeping
#[derive(Debug)]
pub struct RetryState {
    policy: RetryPolicy,
    attempt: u32,
}

impl RetryState {
    /// Start a fresh request
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy, attempt: 0 }
    }

    /// Retries performed so far
    pub fn retries(&self) -> u32 {
        self.attempt
    }

    /// Record a failed attempt and decide whether to try again
    pub fn record_failure(&mut self, error: Error) -> RetryDecision {
        if !error.is_retryable() {
            return RetryDecision::Fail(error);
        }

        if self.attempt >= self.policy.max_retries {
            return RetryDecision::Fail(Error::RetriesExhausted {
                attempts: self.attempt + 1,
                source: Box::new(error),
            });
        }

        let delay = self.policy.delay_for(self.attempt, &error);
        self.attempt += 1;
        RetryDecision::Retry {
            attempt: self.attempt,
            delay,
        }
    }
}
