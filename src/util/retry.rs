//! 気象庁APIへの再試行ポリシー。
//!
//! 指数バックオフに Full Jitter を組み合わせる。
use std::time::Duration;

use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RetryPolicy {
    /// 初回を含む最大試行回数
    pub(crate) max_attempts: usize,
    pub(crate) base_delay_ms: u64,
    pub(crate) max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, 250, 10_000)
    }
}

impl RetryPolicy {
    #[must_use]
    pub(crate) const fn new(max_attempts: usize, base_delay_ms: u64, max_delay_ms: u64) -> Self {
        Self {
            max_attempts,
            base_delay_ms,
            max_delay_ms,
        }
    }

    /// `attempt` 回目（0始まり）の前に待つ時間。初回は待たない。
    #[must_use]
    pub(crate) fn backoff(&self, attempt: usize) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        let shift = u32::try_from(attempt - 1).unwrap_or(u32::MAX).min(63);
        let ceiling = self
            .base_delay_ms
            .saturating_mul(1_u64 << shift)
            .min(self.max_delay_ms);
        if ceiling == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::rng().random_range(0..=ceiling))
    }

    #[must_use]
    pub(crate) const fn allows(&self, attempt: usize) -> bool {
        attempt < self.max_attempts
    }
}

/// タイムアウト・接続失敗・5xx・429 は再試行する。
pub(crate) fn is_retryable(error: &reqwest::Error) -> bool {
    if error.is_timeout() || error.is_connect() {
        return true;
    }
    error.status().is_some_and(is_retryable_status)
}

pub(crate) fn is_retryable_status(status: reqwest::StatusCode) -> bool {
    status.is_server_error() || status == reqwest::StatusCode::TOO_MANY_REQUESTS
}
