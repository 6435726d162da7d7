// src/checks/structure.rs
// =============================================================================
// Structure analysis: the basic hygiene of the element tree.
//
// Reports:
// - content containers with no content and no meaningful attributes
// - <img> without a usable alt text, and <img> without a src
// - id values used more than once
// =============================================================================

use super::Check;
use crate::config::AuditConfig;
use crate::document::{self, Document};
use crate::finding::{Category, Finding};
use std::collections::HashSet;

pub struct StructureCheck;

// Elements that exist to hold content; an empty one is almost always a
// leftover. Void elements (br, hr, img, input...) never appear here.
const CONTENT_TAGS: &[&str] = &[
    "div", "p", "span", "a", "h1", "h2", "h3", "h4", "h5", "h6", "li", "strong", "em",
    "section", "article", "button",
];

// Attributes that give an empty element a purpose (styling hook, anchor
// target, script handle, ARIA semantics...)
const MEANINGFUL_ATTRS: &[&str] = &["id", "class", "href", "name", "role", "title"];

impl Check for StructureCheck {
    fn name(&self) -> &'static str {
        "structure"
    }

    fn run(&self, document: &Document, config: &AuditConfig) -> Vec<Finding> {
        let mut findings = Vec::new();

        check_empty_tags(document, &mut findings);
        check_images(document, config.allow_empty_alt, &mut findings);
        check_duplicate_ids(document, &mut findings);

        findings
    }
}

fn check_empty_tags(document: &Document, findings: &mut Vec<Finding>) {
    for element in document.elements_named(CONTENT_TAGS) {
        if !document::is_empty(element) {
            continue;
        }

        let meaningful = element.value().attrs().any(|(name, value)| {
            !value.trim().is_empty()
                && (MEANINGFUL_ATTRS.contains(&name)
                    || name.starts_with("aria-")
                    || name.starts_with("data-"))
        });
        if meaningful {
            continue;
        }

        let tag = element.value().name();
        findings.push(
            Finding::new(Category::EmptyTag, format!("Empty <{}> tag found", tag)).at(tag),
        );
    }
}

// Every <img> needs a src and a text alternative
//
// alt="" is the accessibility convention for decorative images. Whether we
// accept it is a policy decision, so it comes from the config.
fn check_images(document: &Document, allow_empty_alt: bool, findings: &mut Vec<Finding>) {
    for img in document.elements_named(&["img"]) {
        let src = document::non_empty_attr(img, "src");
        let source = src.unwrap_or("unknown source");

        match img.value().attr("alt") {
            None => findings.push(
                Finding::new(Category::MissingAlt, "Image missing alt text").at(source),
            ),
            Some(alt) if alt.trim().is_empty() && !allow_empty_alt => findings.push(
                Finding::new(Category::MissingAlt, "Image has empty alt text").at(source),
            ),
            Some(_) => {}
        }

        if src.is_none() {
            findings.push(
                Finding::new(Category::MissingSrc, "Image missing src attribute").at("img"),
            );
        }
    }
}

// One finding per repeated occurrence; the first use of an id is fine
fn check_duplicate_ids(document: &Document, findings: &mut Vec<Finding>) {
    let mut seen = HashSet::new();

    for element in document.elements() {
        let Some(id) = document::non_empty_attr(element, "id") else {
            continue;
        };
        if !seen.insert(id) {
            findings.push(
                Finding::new(Category::DuplicateId, format!("Duplicate ID found: {}", id))
                    .at(format!("id=\"{}\"", id)),
            );
        }
    }
}
