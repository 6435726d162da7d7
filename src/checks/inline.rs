// src/checks/inline.rs
// =============================================================================
// Inline style and script detection.
//
// Reports, one finding each:
// - an element with a non-empty style="..." attribute
// - an element carrying inline event handlers (onclick, onload, ...)
// - a <script> with a JavaScript body instead of a src
//
// JSON-LD and other non-JavaScript <script> types hold data, not code, and
// are left alone.
// =============================================================================

use super::Check;
use crate::config::AuditConfig;
use crate::document::{self, Document};
use crate::finding::{Category, Finding};
use scraper::ElementRef;

pub struct InlineCodeCheck;

// MIME types browsers execute as classic scripts
const JAVASCRIPT_TYPES: &[&str] = &[
    "text/javascript",
    "application/javascript",
    "application/ecmascript",
    "text/ecmascript",
    "application/x-javascript",
    "module",
];

impl Check for InlineCodeCheck {
    fn name(&self) -> &'static str {
        "inline-code"
    }

    fn run(&self, document: &Document, _config: &AuditConfig) -> Vec<Finding> {
        let mut findings = Vec::new();

        for element in document.elements() {
            let tag = element.value().name();

            if document::non_empty_attr(element, "style").is_some() {
                findings.push(
                    Finding::new(
                        Category::InlineStyle,
                        format!("Inline style attribute on <{}>", tag),
                    )
                    .at(tag),
                );
            }

            let handlers: Vec<&str> = element
                .value()
                .attrs()
                .map(|(name, _)| name)
                .filter(|name| is_event_handler(name))
                .collect();
            if !handlers.is_empty() {
                findings.push(
                    Finding::new(
                        Category::InlineScript,
                        format!("Inline event handler {} on <{}>", handlers.join(", "), tag),
                    )
                    .at(format!("{}[{}]", tag, handlers.join(","))),
                );
            }

            if tag == "script" && has_inline_body(element) {
                findings.push(
                    Finding::new(Category::InlineScript, "Inline <script> body").at("script"),
                );
            }
        }

        findings
    }
}

// onclick, onload, onmouseover... but not "on" on its own
fn is_event_handler(name: &str) -> bool {
    name.len() > 2 && name.starts_with("on") && name.bytes().all(|b| b.is_ascii_alphabetic())
}

fn has_inline_body(script: ElementRef<'_>) -> bool {
    if document::non_empty_attr(script, "src").is_some() {
        return false;
    }

    let is_javascript = match document::non_empty_attr(script, "type") {
        None => true,
        Some(kind) => {
            let kind = kind.trim().to_ascii_lowercase();
            JAVASCRIPT_TYPES.contains(&kind.as_str())
        }
    };

    is_javascript && !document::text_content(script).trim().is_empty()
}
