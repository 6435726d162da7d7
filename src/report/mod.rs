// src/report/mod.rs
// =============================================================================
// The report aggregator.
//
// Flattens per-page findings into rows for tabular output:
// - URL order is the input order
// - within a URL, rows keep the order the checks emitted them
// - a clean page produces no rows at all
// - a page that failed (unreachable, error status, unparseable) produces
//   exactly one status row, because the orchestrator gave it exactly one
//   finding
//
// Submodules:
// - csv: writes rows as an RFC 4180 CSV file
// =============================================================================

pub mod csv;

use crate::auditor::{PageReport, PageStatus};
use crate::finding::Finding;
use serde::Serialize;

pub use self::csv::write_csv;

/// One finding, flattened for tabular export
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub url: String,
    pub category: String,
    pub message: String,
    /// Empty when the finding doesn't point at anything specific
    pub locator: String,
}

impl From<&Finding> for ReportRow {
    fn from(finding: &Finding) -> Self {
        Self {
            url: finding.url.clone(),
            category: finding.category.to_string(),
            message: finding.message.clone(),
            locator: finding.locator.clone().unwrap_or_default(),
        }
    }
}

// Builds the report rows for a whole run
pub fn aggregate(reports: &[PageReport]) -> Vec<ReportRow> {
    reports
        .iter()
        .flat_map(|report| report.findings.iter().map(ReportRow::from))
        .collect()
}

/// Page-level tallies for the end-of-run summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub pages: usize,
    pub clean: usize,
    pub with_findings: usize,
    pub failed: usize,
    pub findings: usize,
}

pub fn summarize(reports: &[PageReport]) -> Summary {
    let mut summary = Summary {
        pages: reports.len(),
        ..Summary::default()
    };

    for report in reports {
        summary.findings += report.findings.len();
        match report.status {
            PageStatus::Audited if report.findings.is_empty() => summary.clean += 1,
            PageStatus::Audited => summary.with_findings += 1,
            _ => summary.failed += 1,
        }
    }

    summary
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::finding::Category;
    use proptest::prelude::*;

    const CHECK_CATEGORIES: &[Category] = &[
        Category::BrokenLink,
        Category::MissingAlt,
        Category::EmptyTag,
        Category::HeadingHierarchy,
        Category::DeprecatedTag,
        Category::FormValidation,
        Category::MetaTag,
        Category::TableStructure,
    ];

    // A page that was audited (with 0..6 findings) or that failed with its
    // single status finding
    fn page_outcome() -> impl Strategy<Value = (PageStatus, Vec<Category>)> {
        prop_oneof![
            prop::collection::vec(prop::sample::select(CHECK_CATEGORIES), 0..6)
                .prop_map(|categories| (PageStatus::Audited, categories)),
            Just((PageStatus::Unreachable, vec![Category::Unreachable])),
            Just((PageStatus::Unparseable, vec![Category::Unparseable])),
            (400u16..600)
                .prop_map(|code| (PageStatus::HttpError(code), vec![Category::HttpStatus])),
        ]
    }

    fn reports() -> impl Strategy<Value = Vec<PageReport>> {
        prop::collection::vec(page_outcome(), 0..20).prop_map(|outcomes| {
            outcomes
                .into_iter()
                .enumerate()
                .map(|(i, (status, categories))| {
                    let url = format!("http://site{}.test/", i);
                    PageReport {
                        findings: categories
                            .iter()
                            .map(|c| Finding::new(*c, c.as_str()).for_url(&url))
                            .collect(),
                        url,
                        status,
                    }
                })
                .collect()
        })
    }

    proptest! {
        /// Property: row count is the sum of findings, one per failed page
        #[test]
        fn row_count_matches_findings(reports in reports()) {
            let rows = aggregate(&reports);
            let expected: usize = reports.iter().map(|r| r.findings.len()).sum();
            prop_assert_eq!(rows.len(), expected);

            for report in &reports {
                let for_url = rows.iter().filter(|row| row.url == report.url).count();
                match report.status {
                    PageStatus::Audited => prop_assert_eq!(for_url, report.findings.len()),
                    _ => prop_assert_eq!(for_url, 1),
                }
            }
        }

        /// Property: rows follow input URL order and each page's finding order
        #[test]
        fn rows_keep_input_order(reports in reports()) {
            let rows = aggregate(&reports);
            let expected: Vec<(String, String)> = reports
                .iter()
                .flat_map(|r| r.findings.iter().map(|f| (f.url.clone(), f.category.to_string())))
                .collect();
            let got: Vec<(String, String)> =
                rows.into_iter().map(|row| (row.url, row.category)).collect();
            prop_assert_eq!(got, expected);
        }

        /// Property: every page lands in exactly one summary bucket
        #[test]
        fn summary_buckets_partition_pages(reports in reports()) {
            let summary = summarize(&reports);
            prop_assert_eq!(summary.pages, reports.len());
            prop_assert_eq!(summary.clean + summary.with_findings + summary.failed, summary.pages);
            prop_assert_eq!(summary.findings, aggregate(&reports).len());
        }
    }
}
