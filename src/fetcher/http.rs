// src/fetcher/http.rs
// =============================================================================
// The HTTP side of the auditor.
//
// Key functionality:
// - GET a page and hand back its status, content type, final URL and body
// - Probe a link target with HEAD, falling back to GET when HEAD is refused
// - Turn transport failures into a small FetchError taxonomy
//
// HTTP error statuses (4xx/5xx) are NOT errors here. They are ordinary
// responses; deciding what they mean is up to the caller.
// =============================================================================

use crate::config::AuditConfig;
use reqwest::{header, Client, StatusCode};
use std::error::Error as StdError;
use std::io;
use thiserror::Error;
use tracing::debug;

// Why a request never produced a response
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,
    #[error("connection refused")]
    ConnectionRefused,
    #[error("could not resolve hostname")]
    DnsFailure,
    #[error("too many redirects")]
    TooManyRedirects,
    #[error("TLS/SSL error")]
    Tls,
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("{0}")]
    Other(String),
}

/// A page as it came back from the server
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL after following redirects; relative links resolve against this
    pub final_url: String,
    pub status: u16,
    /// Value of the Content-Type header, if the server sent one
    pub content_type: Option<String>,
    pub body: String,
}

impl FetchedPage {
    /// 4xx and 5xx responses
    pub fn is_error_status(&self) -> bool {
        self.status >= 400
    }
}

// Thin wrapper around a pooled reqwest client
//
// Cloning is cheap (the client is reference counted internally), which is
// how link validation shares the same connection pool as the page fetches.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(config: &AuditConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { client })
    }

    // Fetches a page with GET
    //
    // Returns the response for ANY status code; only transport failures
    // (timeout, DNS, refused connection, redirect loop) are errors.
    pub async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let response = self.client.get(url).send().await.map_err(categorize_error)?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response.text().await.map_err(categorize_error)?;
        debug!(url, status, bytes = body.len(), "fetched page");

        Ok(FetchedPage {
            final_url,
            status,
            content_type,
            body,
        })
    }

    // Checks whether a link target answers, returning its status code
    //
    // HEAD first (no body download). Some servers reject HEAD outright, so
    // 405/501 answers are retried with GET before being believed.
    pub async fn probe(&self, url: &str) -> Result<u16, FetchError> {
        let response = self.client.head(url).send().await.map_err(categorize_error)?;

        if matches!(
            response.status(),
            StatusCode::METHOD_NOT_ALLOWED | StatusCode::NOT_IMPLEMENTED
        ) {
            debug!(url, "HEAD refused, retrying with GET");
            let response = self.client.get(url).send().await.map_err(categorize_error)?;
            return Ok(response.status().as_u16());
        }

        Ok(response.status().as_u16())
    }
}

// Categorizes reqwest errors into our taxonomy
//
// reqwest wraps the interesting cause (an io::Error, a DNS error from the
// resolver) several sources deep, so we walk the whole chain.
fn categorize_error(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        return FetchError::Timeout;
    }
    if error.is_redirect() {
        return FetchError::TooManyRedirects;
    }
    if error.is_builder() {
        return FetchError::InvalidUrl(error.to_string());
    }

    let chain = error_chain(&error);

    if io_error_kind(&error) == Some(io::ErrorKind::ConnectionRefused)
        || chain.contains("connection refused")
    {
        FetchError::ConnectionRefused
    } else if io_error_kind(&error) == Some(io::ErrorKind::TimedOut) {
        FetchError::Timeout
    } else if chain.contains("dns") || chain.contains("failed to lookup address") {
        FetchError::DnsFailure
    } else if chain.contains("certificate") || chain.contains("tls") || chain.contains("ssl") {
        FetchError::Tls
    } else {
        FetchError::Other(error.to_string())
    }
}

// The error and all of its sources, lowercased, joined with ": "
fn error_chain(error: &reqwest::Error) -> String {
    let mut parts = vec![error.to_string()];
    let mut source = error.source();
    while let Some(err) = source {
        parts.push(err.to_string());
        source = err.source();
    }
    parts.join(": ").to_lowercase()
}

// The kind of the first io::Error found in the source chain
fn io_error_kind(error: &reqwest::Error) -> Option<io::ErrorKind> {
    let mut source = error.source();
    while let Some(err) = source {
        if let Some(io_err) = err.downcast_ref::<io::Error>() {
            return Some(io_err.kind());
        }
        source = err.source();
    }
    None
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is thiserror?
//    - A derive macro that writes the Display and Error impls for an enum
//    - #[error("...")] becomes the Display text of that variant
//
// 2. Why is a 404 not a FetchError?
//    - The server answered; that answer is information the caller reports
//    - FetchError only covers requests that never got an answer
//
// 3. What is Error::source()?
//    - Errors can wrap other errors; source() returns the wrapped one
//    - Walking source() repeatedly visits the whole chain of causes
// -----------------------------------------------------------------------------
