// src/checks/forms.rs
// =============================================================================
// Form validation.
//
// Checks:
// - every <form> has a non-empty action
// - every user-facing <input>, <textarea> and <select> has a label, either a
//   <label for="..."> pointing at its id or a <label> wrapped around it
//
// A control with an id needs a matching <label for> or a wrapping <label>.
// Controls without an id can also be labelled by ARIA or title.
// =============================================================================

use super::Check;
use crate::config::AuditConfig;
use crate::document::{self, Document};
use crate::finding::{Category, Finding};
use scraper::ElementRef;
use std::collections::HashSet;

pub struct FormCheck;

/// Input types that do not need a visible label
const EXEMPT_INPUT_TYPES: &[&str] = &["hidden", "submit", "reset", "button", "image"];

const CONTROLS: &[&str] = &["input", "textarea", "select"];

impl Check for FormCheck {
    fn name(&self) -> &'static str {
        "forms"
    }

    fn run(&self, document: &Document, _config: &AuditConfig) -> Vec<Finding> {
        let mut findings = Vec::new();

        for form in document.elements_named(&["form"]) {
            if document::non_empty_attr(form, "action").is_none() {
                findings.push(
                    Finding::new(Category::FormValidation, "Form missing action attribute")
                        .at("form"),
                );
            }
        }

        // Collect all label[for] values up front
        let label_targets: HashSet<&str> = document
            .elements_named(&["label"])
            .filter_map(|label| document::non_empty_attr(label, "for"))
            .collect();

        for control in document.elements_named(CONTROLS) {
            if is_exempt(control) || is_labelled(control, &label_targets) {
                continue;
            }

            let locator = describe_control(control);
            findings.push(
                Finding::new(
                    Category::FormValidation,
                    format!("Form control missing associated label: {}", locator),
                )
                .at(locator),
            );
        }

        findings
    }
}

fn is_exempt(control: ElementRef<'_>) -> bool {
    if control.value().name() != "input" {
        return false;
    }
    let input_type = control
        .value()
        .attr("type")
        .map(|t| t.trim().to_ascii_lowercase())
        .unwrap_or_default();
    EXEMPT_INPUT_TYPES.contains(&input_type.as_str())
}

fn is_labelled(control: ElementRef<'_>, label_targets: &HashSet<&str>) -> bool {
    if document::has_ancestor(control, "label") {
        return true;
    }
    if let Some(id) = document::non_empty_attr(control, "id") {
        return label_targets.contains(id);
    }

    document::non_empty_attr(control, "aria-label").is_some()
        || document::non_empty_attr(control, "aria-labelledby").is_some()
        || document::non_empty_attr(control, "title").is_some()
}

// "input#email", "select[name=country]" or just "textarea"
fn describe_control(control: ElementRef<'_>) -> String {
    let tag = control.value().name();
    if let Some(id) = document::non_empty_attr(control, "id") {
        format!("{}#{}", tag, id)
    } else if let Some(name) = document::non_empty_attr(control, "name") {
        format!("{}[name={}]", tag, name)
    } else {
        tag.to_string()
    }
}
