use std::time::Duration;

use regex::Regex;
use tracing::{debug, info};

use crate::domain::{error::RefreshError, models::MAX_BATCH_SIZE};

const DEFAULT_INVENTORY_DIR: &str = "./inventories";
const DEFAULT_SNAPSHOT_PATTERN: &str = r"\.json$";
const DEFAULT_MAX_RETRIES: u32 = 10;
const DEFAULT_INITIAL_BACKOFF_MS: u64 = 50;
const DEFAULT_MAX_BACKOFF_MS: u64 = 5_000;

/// Bounds the unprocessed-items retry loop of a single writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Resubmissions allowed after the first request.
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl RetryPolicy {
    /// Delay before the `retry`-th resubmission (1-based).
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 1u32
            .checked_shl(retry.saturating_sub(1))
            .unwrap_or(u32::MAX);
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }

    pub fn immediate(max_retries: u32) -> Self {
        Self {
            max_retries,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_backoff: Duration::from_millis(DEFAULT_INITIAL_BACKOFF_MS),
            max_backoff: Duration::from_millis(DEFAULT_MAX_BACKOFF_MS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RefreshConfig {
    pub table_name: String,
    pub inventory_dir: String,
    pub snapshot_pattern: Regex,
    pub endpoint_url: Option<String>,
    pub batch_size: usize,
    pub retry: RetryPolicy,
}

impl RefreshConfig {
    pub fn from_env() -> Result<Self, RefreshError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, RefreshError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let table_name = get("TABLE_NAME")
            .ok_or_else(|| RefreshError::Config("TABLE_NAME environment variable is required".to_string()))?;
        info!("Target table: {}", table_name);

        let inventory_dir = get("INVENTORY_DIR").unwrap_or_else(|| DEFAULT_INVENTORY_DIR.to_string());
        debug!("Inventory directory: {}", inventory_dir);

        let pattern = get("SNAPSHOT_PATTERN").unwrap_or_else(|| DEFAULT_SNAPSHOT_PATTERN.to_string());
        let snapshot_pattern = Regex::new(&pattern)
            .map_err(|e| RefreshError::Config(format!("invalid SNAPSHOT_PATTERN '{}': {}", pattern, e)))?;

        let endpoint_url = get("AWS_ENDPOINT_URL").or_else(|| get("AWS_TEST_ENDPOINT"));
        if let Some(endpoint) = &endpoint_url {
            info!("Using custom AWS endpoint: {}", endpoint);
        }

        let batch_size = parse_number(&get, "BATCH_SIZE", MAX_BATCH_SIZE)?;
        if batch_size == 0 || batch_size > MAX_BATCH_SIZE {
            return Err(RefreshError::Config(format!(
                "BATCH_SIZE must be between 1 and {}, got {}",
                MAX_BATCH_SIZE, batch_size
            )));
        }

        let retry = RetryPolicy {
            max_retries: parse_number(&get, "MAX_WRITE_RETRIES", DEFAULT_MAX_RETRIES)?,
            initial_backoff: Duration::from_millis(parse_number(
                &get,
                "RETRY_INITIAL_BACKOFF_MS",
                DEFAULT_INITIAL_BACKOFF_MS,
            )?),
            max_backoff: Duration::from_millis(parse_number(
                &get,
                "RETRY_MAX_BACKOFF_MS",
                DEFAULT_MAX_BACKOFF_MS,
            )?),
        };
        if retry.initial_backoff > retry.max_backoff {
            return Err(RefreshError::Config(
                "RETRY_INITIAL_BACKOFF_MS must not exceed RETRY_MAX_BACKOFF_MS".to_string(),
            ));
        }
        debug!("Batch size: {}, retry policy: {:?}", batch_size, retry);

        Ok(Self {
            table_name,
            inventory_dir,
            snapshot_pattern,
            endpoint_url,
            batch_size,
            retry,
        })
    }
}

fn parse_number<T, G>(get: &G, key: &str, default: T) -> Result<T, RefreshError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| RefreshError::Config(format!("invalid {} '{}': {}", key, raw, e))),
        None => Ok(default),
    }
}
