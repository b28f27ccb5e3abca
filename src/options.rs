use std::time::Duration;

use crate::{HttpClientError, Result};

pub(crate) const DEFAULT_RETRY_BACKOFF_MS: u64 = 200;

const TIMEOUT_ENV: &str = "HTTPCLIENT_TIMEOUT_MS";
const MAX_RETRIES_ENV: &str = "HTTPCLIENT_MAX_RETRIES";
const RETRY_BACKOFF_ENV: &str = "HTTPCLIENT_RETRY_BACKOFF_MS";

/// Default timeout and retry behavior stamped onto every request a
/// [`Client`](crate::Client) creates.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientOptions {
    /// Per-attempt timeout in milliseconds. `None` or `Some(0)` waits forever.
    pub timeout_ms: Option<u64>,
    /// Maximum number of retries after the initial attempt.
    pub max_retries: usize,
    /// Linear backoff step in milliseconds: the n-th retry waits `n * step`.
    pub retry_backoff_ms: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_ms: None,
            max_retries: 0,
            retry_backoff_ms: DEFAULT_RETRY_BACKOFF_MS,
        }
    }
}

impl ClientOptions {
    /// Reads options from the environment.
    ///
    /// Reads:
    /// - `HTTPCLIENT_TIMEOUT_MS`: per-attempt timeout, `0` for none
    /// - `HTTPCLIENT_MAX_RETRIES`: retries after the first attempt
    /// - `HTTPCLIENT_RETRY_BACKOFF_MS`: linear backoff step
    ///
    /// Unset or empty variables keep their default. A value that is not an
    /// unsigned integer is an error.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut options = Self::default();
        if let Some(timeout) = parse_var(&lookup, TIMEOUT_ENV)? {
            options.timeout_ms = Some(timeout);
        }
        if let Some(retries) = parse_var(&lookup, MAX_RETRIES_ENV)? {
            options.max_retries = retries;
        }
        if let Some(backoff) = parse_var(&lookup, RETRY_BACKOFF_ENV)? {
            options.retry_backoff_ms = backoff;
        }
        Ok(options)
    }

    pub(crate) fn timeout(&self) -> Option<Duration> {
        self.timeout_ms
            .filter(|ms| *ms != 0)
            .map(Duration::from_millis)
    }

    pub(crate) fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse().map(Some).map_err(|_| {
        HttpClientError::Config(format!("{key} must be an unsigned integer, got {raw:?}"))
    })
}
