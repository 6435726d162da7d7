// src/auditor.rs
// =============================================================================
// The orchestrator: everything that happens to one URL.
//
// Steps for each page:
// 1. Fetch it. Transport failure -> one "unreachable" finding, stop.
// 2. 4xx/5xx status -> one "http-status" finding, stop.
// 3. Parse it. Binary/non-HTML content -> one "unparseable" finding, stop.
// 4. Run every check, collect findings, tag them with the page URL.
//
// Nothing that goes wrong with one page can leak into another: analyze()
// never returns an error, it returns a report that describes the failure.
//
// Parsing and the synchronous checks happen inside inspect(), which drops
// the Document before any link probe is awaited.
// =============================================================================

use crate::checks::{self, links, links::LinkTarget};
use crate::config::{AuditConfig, ConfigError};
use crate::document::{self, Document, ParseError};
use crate::fetcher::{FetchedPage, Fetcher};
use crate::finding::{Category, Finding};
use futures::stream::{self, Stream, StreamExt};
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

/// What happened to a page as a whole
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStatus {
    /// Fetched, parsed and checked; findings may still be empty
    Audited,
    /// The server answered with this 4xx/5xx status
    HttpError(u16),
    Unreachable,
    Unparseable,
}

/// Everything found on one URL
#[derive(Debug, Clone)]
pub struct PageReport {
    pub url: String,
    pub status: PageStatus,
    pub findings: Vec<Finding>,
}

impl PageReport {
    fn failed(url: &str, status: PageStatus, finding: Finding) -> Self {
        Self {
            url: url.to_string(),
            status,
            findings: vec![finding.for_url(url)],
        }
    }

    /// Audited with nothing to report
    pub fn is_clean(&self) -> bool {
        self.status == PageStatus::Audited && self.findings.is_empty()
    }
}

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to create HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

// The output of the synchronous half of an analysis
struct Inspection {
    findings: Vec<Finding>,
    link_targets: Vec<LinkTarget>,
}

// Owns the run's Fetcher and configuration
//
// Create one per run; it can analyse any number of URLs, concurrently.
pub struct Auditor {
    fetcher: Fetcher,
    config: AuditConfig,
}

impl Auditor {
    pub fn new(config: AuditConfig) -> Result<Self, SetupError> {
        config.validate()?;
        let fetcher = Fetcher::new(&config)?;
        Ok(Self { fetcher, config })
    }

    // Runs the whole pipeline for one URL
    pub async fn analyze(&self, url: &str) -> PageReport {
        info!(url, "auditing page");

        let page = match self.fetcher.fetch(url).await {
            Ok(page) => page,
            Err(e) => {
                warn!(url, error = %e, "page unreachable");
                return PageReport::failed(
                    url,
                    PageStatus::Unreachable,
                    Finding::new(Category::Unreachable, format!("Page unreachable: {}", e)),
                );
            }
        };

        if page.is_error_status() {
            warn!(url, status = page.status, "page returned an error status");
            return PageReport::failed(
                url,
                PageStatus::HttpError(page.status),
                Finding::new(Category::HttpStatus, format!("Page returned HTTP {}", page.status)),
            );
        }

        let inspection = match inspect(&page, &self.config) {
            Ok(inspection) => inspection,
            Err(e) => {
                warn!(url, error = %e, "page unparseable");
                return PageReport::failed(
                    url,
                    PageStatus::Unparseable,
                    Finding::new(
                        Category::Unparseable,
                        format!("Page could not be parsed as HTML: {}", e),
                    ),
                );
            }
        };

        let mut findings = Vec::new();
        if self.config.validate_links {
            let link_findings = links::validate(
                inspection.link_targets,
                &self.fetcher,
                self.config.link_concurrency,
            )
            .await;
            findings.extend(link_findings);
        }
        findings.extend(inspection.findings);

        let findings: Vec<Finding> = findings.into_iter().map(|f| f.for_url(url)).collect();
        info!(url, findings = findings.len(), "page audited");

        PageReport {
            url: url.to_string(),
            status: PageStatus::Audited,
            findings,
        }
    }

    // Analyses many URLs, at most `page_concurrency` at a time
    //
    // Reports are yielded in input order, whatever order the pages finish in.
    pub fn audit_stream<'a>(&'a self, urls: &'a [String]) -> impl Stream<Item = PageReport> + 'a {
        stream::iter(urls)
            .map(move |url| self.analyze(url))
            .buffered(self.config.page_concurrency.max(1))
    }

    pub async fn analyze_all(&self, urls: &[String]) -> Vec<PageReport> {
        self.audit_stream(urls).collect().await
    }
}

// Parse the body and run every synchronous check on it
fn inspect(page: &FetchedPage, config: &AuditConfig) -> Result<Inspection, ParseError> {
    document::ensure_markup_content_type(page.content_type.as_deref())?;
    let document = Document::parse(&page.body)?;

    let page_url = Url::parse(&page.final_url).ok();
    let link_targets = if config.validate_links {
        links::collect_targets(&document, page_url.as_ref())
    } else {
        Vec::new()
    };

    Ok(Inspection {
        findings: checks::run_all(&document, config),
        link_targets,
    })
}
