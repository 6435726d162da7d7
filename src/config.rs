// src/config.rs
// =============================================================================
// Run-wide settings for an audit.
//
// The CLI flags in cli.rs are the only configuration surface; main.rs bridges
// them into an AuditConfig. Library users build one directly, usually starting
// from AuditConfig::default().
// =============================================================================

use std::time::Duration;
use thiserror::Error;

/// Settings shared by the fetcher, the checks and the orchestrator
#[derive(Debug, Clone)]
pub struct AuditConfig {
    /// Timeout applied to every HTTP request (page fetches and link probes)
    pub request_timeout: Duration,
    /// Redirects followed before giving up with TooManyRedirects
    pub max_redirects: usize,
    /// User-Agent header sent with every request
    pub user_agent: String,
    /// How many pages are analysed at once
    pub page_concurrency: usize,
    /// How many link targets of a single page are probed at once
    pub link_concurrency: usize,
    /// Treat `alt=""` as a decorative-image marker instead of a missing alt
    pub allow_empty_alt: bool,
    /// Probe every `<a href>` on the page
    pub validate_links: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            max_redirects: 5,
            user_agent: format!("html-auditor/{}", env!("CARGO_PKG_VERSION")),
            page_concurrency: 4,
            link_concurrency: 5,
            allow_empty_alt: false,
            validate_links: true,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be at least 1")]
    ZeroConcurrency(&'static str),
    #[error("request timeout must be greater than zero")]
    ZeroTimeout,
}

impl AuditConfig {
    /// Rejects settings that would stall the run instead of auditing anything
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency("page concurrency"));
        }
        if self.link_concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency("link concurrency"));
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }
}
