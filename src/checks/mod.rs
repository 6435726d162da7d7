// src/checks/mod.rs
// =============================================================================
// The rule ensemble.
//
// Every synchronous check is a unit struct implementing `Check`, registered in
// the fixed CHECKS list below. The orchestrator runs them in that order, so
// report rows always come out in the same sequence.
//
// Link validation is the odd one out: it needs the network, so it lives in
// `links` as two steps. Targets are collected from the document synchronously,
// then probed asynchronously once the document is no longer needed.
//
// Submodules:
// - links: <a href> collection and probing
// - structure: empty tags, missing alt/src, duplicate ids
// - headings: heading hierarchy
// - deprecated: obsolete tags
// - forms: form actions and control labels
// - meta: viewport and description meta tags
// - encoding: declared character encoding
// - inline: inline styles, event handlers and script bodies
// - lists: list and table structure
// =============================================================================

pub mod deprecated;
pub mod encoding;
pub mod forms;
pub mod headings;
pub mod inline;
pub mod links;
pub mod lists;
pub mod meta;
pub mod structure;

use crate::config::AuditConfig;
use crate::document::Document;
use crate::finding::Finding;
use tracing::debug;

/// A stateless rule evaluated against one parsed page
pub trait Check: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Inspect the document and return every issue found
    ///
    /// Must never panic on malformed markup; malformed markup is a finding.
    fn run(&self, document: &Document, config: &AuditConfig) -> Vec<Finding>;
}

/// All synchronous checks, in report order
pub static CHECKS: [&dyn Check; 8] = [
    &structure::StructureCheck,
    &headings::HeadingCheck,
    &deprecated::DeprecatedTagCheck,
    &forms::FormCheck,
    &meta::MetaTagCheck,
    &encoding::EncodingCheck,
    &inline::InlineCodeCheck,
    &lists::ListTableCheck,
];

// Runs every registered check and concatenates their findings
pub fn run_all(document: &Document, config: &AuditConfig) -> Vec<Finding> {
    let mut findings = Vec::new();
    for check in CHECKS.iter() {
        let found = check.run(document, config);
        debug!(check = check.name(), count = found.len(), "check finished");
        findings.extend(found);
    }
    findings
}
