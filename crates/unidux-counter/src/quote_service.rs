//! Simulated remote quote service
//!
//! Stands in for a slow network collaborator: every request waits for the
//! configured latency, and every n-th request fails when `fail_every` is set.

use anyhow::{bail, Result};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use unidux_config::AppConfig;

pub struct QuoteService {
    quotes: Vec<String>,
    latency: Duration,
    fail_every: u32,
    requests: AtomicU32,
}

impl QuoteService {
    pub fn new(quotes: Vec<String>, latency: Duration, fail_every: u32) -> Self {
        Self {
            quotes,
            latency,
            fail_every,
            requests: AtomicU32::new(0),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.quotes.clone(),
            Duration::from_millis(config.fetch_latency_ms),
            config.fail_every,
        )
    }

    /// Fetch the next quote
    pub async fn fetch(&self) -> Result<String> {
        let request = self.requests.fetch_add(1, Ordering::Relaxed) + 1;
        log::debug!("QuoteService: request #{}", request);

        tokio::time::sleep(self.latency).await;

        if self.fail_every > 0 && request % self.fail_every == 0 {
            bail!("quote service unavailable (request #{})", request);
        }
        if self.quotes.is_empty() {
            bail!("no quotes configured");
        }

        let index = (request as usize - 1) % self.quotes.len();
        Ok(self.quotes[index].clone())
    }
}
