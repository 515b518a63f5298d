//! Shared plumbing for the outbound HTTP clients.

use crate::APP_USER_AGENT;
use anyhow::{Context, Result};
use reqwest::Client;
use std::{sync::Arc, time::Duration};
use tokio::sync::{Semaphore, SemaphorePermit};

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_CONCURRENCY: usize = 16;

/// Per-upstream limits applied to every outbound call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpstreamOptions {
    pub timeout: Duration,
    pub concurrency: usize,
}

impl Default for UpstreamOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl UpstreamOptions {
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub const fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }
}

/// A pooled `reqwest` client plus the in-flight request budget for one upstream.
#[derive(Debug, Clone)]
pub(crate) struct Upstream {
    client: Client,
    permits: Arc<Semaphore>,
}

impl Upstream {
    pub(crate) fn new(options: &UpstreamOptions) -> Result<Self> {
        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(options.timeout)
            .build()
            .context("Error creating reqwest client")?;

        Ok(Self {
            client,
            permits: Arc::new(Semaphore::new(options.concurrency.max(1))),
        })
    }

    pub(crate) const fn client(&self) -> &Client {
        &self.client
    }

    /// Wait for an in-flight slot. `None` only if the semaphore was closed.
    pub(crate) async fn acquire(&self) -> Option<SemaphorePermit<'_>> {
        self.permits.acquire().await.ok()
    }
}
