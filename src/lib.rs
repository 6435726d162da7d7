// src/lib.rs
// =============================================================================
// html-auditor: audits web pages for HTML issues that hurt SEO and
// accessibility, and turns the findings into a tabular report.
//
// Pipeline:
//   URL list -> Auditor (fetch, parse, run checks) -> PageReports
//            -> report::aggregate -> ReportRows -> CSV / JSON / table
//
// The binary in main.rs is a thin CLI around this library.
// =============================================================================

pub mod auditor;
pub mod checks;
pub mod config;
pub mod document;
pub mod fetcher;
pub mod finding;
pub mod input;
pub mod report;

pub use auditor::{Auditor, PageReport, PageStatus, SetupError};
pub use config::{AuditConfig, ConfigError};
pub use document::{Document, ParseError};
pub use fetcher::{FetchError, FetchedPage, Fetcher};
pub use finding::{Category, Finding};
pub use report::{aggregate, summarize, ReportRow, Summary};
