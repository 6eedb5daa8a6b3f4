//! # Favorites Service Module
//!
//! Wraps a [`RecordSource`] with the recovery policy (timeout, retry with
//! jittered backoff, circuit breaker) and produces the ranking reply for a
//! district.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tracing::{debug, error, info, warn};

use crate::circuit_breaker::CircuitBreaker;
use crate::config::RecoveryConfig;
use crate::db::RecordSource;
use crate::district::District;
use crate::errors::DataSourceError;
use crate::ranking::{format_ranking, rank, RankingEntry};

/// Delay before retry number `attempt` (1-based), in milliseconds.
///
/// Exponential backoff from `base_retry_delay_ms` with up to 10% random
/// jitter, never above `max_retry_delay_ms`.
pub fn calculate_retry_delay(attempt: u32, config: &RecoveryConfig) -> u64 {
    let backoff = config.backoff_ms(attempt);
    let jitter = rand::thread_rng().gen_range(0..=backoff / 10);
    (backoff + jitter).min(config.max_retry_delay_ms)
}

pub struct FavoritesService {
    source: Arc<dyn RecordSource>,
    breaker: CircuitBreaker,
    recovery: RecoveryConfig,
    search_url_template: String,
}

impl FavoritesService {
    pub fn new(
        source: Arc<dyn RecordSource>,
        recovery: RecoveryConfig,
        search_url_template: impl Into<String>,
    ) -> Self {
        Self {
            source,
            breaker: CircuitBreaker::new(recovery.clone()),
            recovery,
            search_url_template: search_url_template.into(),
        }
    }

    /// Ranked favorites for a district.
    ///
    /// An empty vector means no record matched. Failures, timeouts and an
    /// open circuit are all reported as [`DataSourceError`].
    pub async fn top_favorites(&self, district: District) -> Result<Vec<RankingEntry>, DataSourceError> {
        if self.breaker.is_open() {
            warn!(district = %district, "Circuit breaker open, skipping lookup");
            return Err(DataSourceError::CircuitOpen);
        }

        let timeout = Duration::from_secs(self.recovery.query_timeout_secs);
        let mut attempt = 0;

        loop {
            let result = match tokio::time::timeout(
                timeout,
                self.source.find_by_address_substring(district.label()),
            )
            .await
            {
                Ok(result) => result,
                Err(_) => Err(DataSourceError::Timeout(format!(
                    "lookup exceeded {}s",
                    self.recovery.query_timeout_secs
                ))),
            };

            match result {
                Ok(records) => {
                    self.breaker.record_success();
                    let ranking = rank(district.label(), &records);
                    debug!(
                        district = %district,
                        matched = records.len(),
                        ranked = ranking.len(),
                        "Ranking computed"
                    );
                    return Ok(ranking);
                }
                Err(e) if attempt < self.recovery.max_retries => {
                    attempt += 1;
                    let delay = calculate_retry_delay(attempt, &self.recovery);
                    warn!(
                        district = %district,
                        attempt,
                        delay_ms = delay,
                        error = %e,
                        "Record lookup failed, retrying"
                    );
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                }
                Err(e) => {
                    self.breaker.record_failure();
                    return Err(e);
                }
            }
        }
    }

    /// Formatted ranking reply for a district.
    ///
    /// Lookup failures are logged here and passed on so the caller can
    /// show a retry prompt.
    pub async fn reply_for(&self, district: District) -> Result<String, DataSourceError> {
        match self.top_favorites(district).await {
            Ok(ranking) => {
                info!(district = %district, entries = ranking.len(), "Sending favorites");
                Ok(format_ranking(district.label(), &ranking, &self.search_url_template))
            }
            Err(e) => {
                error!(district = %district, error = %e, "Favorites lookup failed");
                Err(e)
            }
        }
    }
}
