// src/checks/links.rs
// =============================================================================
// Link validation.
//
// Unlike the other checks this one needs the network, so it runs in two
// steps:
// 1. collect_targets: walk the parsed document, resolve every <a href> to an
//    absolute http(s) URL (synchronous, needs the Document)
// 2. validate: probe each distinct target through the shared Fetcher, with a
//    bounded number of probes in flight (async, Document already dropped)
//
// Skipped: empty hrefs, same-page "#..." anchors, and anything that doesn't
// resolve to http/https (mailto:, tel:, javascript:, data:, ...).
// =============================================================================

use crate::document::{self, Document};
use crate::fetcher::{FetchError, Fetcher};
use crate::finding::{Category, Finding};
use futures::stream::{self, StreamExt};
use std::collections::{HashMap, HashSet};
use tracing::debug;
use url::Url;

/// A link found on the page, ready to be probed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTarget {
    /// The href exactly as written in the page
    pub href: String,
    /// Absolute URL the href resolves to (fragment removed)
    pub url: String,
}

// Extracts the checkable link targets of a page
//
// Parameters:
//   document: the parsed page
//   page_url: where the page was served from (None if it isn't a valid URL,
//             in which case only absolute hrefs can be resolved)
//
// Returns: one target per <a href>, in page order. Several anchors may share
// the same resolved URL; validate() probes each URL only once.
pub fn collect_targets(document: &Document, page_url: Option<&Url>) -> Vec<LinkTarget> {
    let base = document_base(document, page_url);
    let mut targets = Vec::new();

    for anchor in document.elements_named(&["a"]) {
        let Some(href) = anchor.value().attr("href").map(str::trim) else {
            continue;
        };
        if href.is_empty() || href.starts_with('#') {
            continue;
        }

        let Some(mut url) = resolve_url(base.as_ref(), href) else {
            continue;
        };
        if !is_checkable_link(&url) {
            continue;
        }
        url.set_fragment(None);

        targets.push(LinkTarget {
            href: href.to_string(),
            url: url.to_string(),
        });
    }

    targets
}

// Probes every distinct target URL and reports each anchor pointing at a
// broken one
//
// Up to `concurrency` probes run at the same time. Findings are built from
// `targets`, so they stay in page order whatever order the probes finish in.
pub async fn validate(
    targets: Vec<LinkTarget>,
    fetcher: &Fetcher,
    concurrency: usize,
) -> Vec<Finding> {
    let distinct: Vec<String> = {
        let mut seen = HashSet::new();
        targets
            .iter()
            .filter(|target| seen.insert(target.url.as_str()))
            .map(|target| target.url.clone())
            .collect()
    };

    let probes = distinct.into_iter().map(|url| {
        let fetcher = fetcher.clone();
        async move {
            let outcome = fetcher.probe(&url).await;
            (url, outcome)
        }
    });

    let outcomes: HashMap<String, Result<u16, FetchError>> = stream::iter(probes)
        .buffered(concurrency.max(1))
        .collect::<Vec<_>>()
        .await
        .into_iter()
        .collect();

    targets
        .into_iter()
        .filter_map(|target| {
            let outcome = outcomes.get(&target.url)?;
            broken_link_finding(target, outcome)
        })
        .collect()
}

fn broken_link_finding(
    target: LinkTarget,
    outcome: &Result<u16, FetchError>,
) -> Option<Finding> {
    match outcome {
        Ok(status) if *status >= 400 => {
            debug!(url = %target.url, status, "broken link");
            Some(
                Finding::new(
                    Category::BrokenLink,
                    format!("Broken link (HTTP {}): {}", status, target.url),
                )
                .at(target.href),
            )
        }
        Ok(_) => None,
        Err(e) => {
            debug!(url = %target.url, error = %e, "link unreachable");
            Some(
                Finding::new(
                    Category::BrokenLink,
                    format!("Failed to access link ({}): {}", e, target.url),
                )
                .at(target.href),
            )
        }
    }
}

// The URL relative hrefs resolve against: <base href> if the page has one,
// otherwise the page URL itself
fn document_base(document: &Document, page_url: Option<&Url>) -> Option<Url> {
    let declared = document
        .first_named("base")
        .and_then(|base| document::non_empty_attr(base, "href"))
        .and_then(|href| resolve_url(page_url, href.trim()));

    declared.or_else(|| page_url.cloned())
}

// Resolves a possibly-relative href to an absolute URL
//
// Examples (base = "https://example.com/page"):
//   "/docs" -> "https://example.com/docs"
//   "../other" -> "https://example.com/other"
//   "https://other.com" -> "https://other.com/"
fn resolve_url(base: Option<&Url>, href: &str) -> Option<Url> {
    match Url::parse(href) {
        Ok(url) => Some(url),
        Err(_) => base?.join(href).ok(),
    }
}

fn is_checkable_link(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why two steps instead of one async function?
//    - scraper's Html is not Send, so holding a Document across an .await
//      would make the whole page future non-Send
//    - Collecting targets first lets the Document be dropped before any
//      network I/O starts
//
// 2. buffered vs buffer_unordered
//    - Both run up to N futures at once
//    - buffered(N) yields results in the order the futures were created
//    - buffer_unordered(N) yields them as they complete
//
// 3. Url::join
//    - Resolves a relative reference the way a browser does
//    - "https://example.com/a/b" + "../c" = "https://example.com/c"
// -----------------------------------------------------------------------------
