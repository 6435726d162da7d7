// src/checks/deprecated.rs
// =============================================================================
// Deprecated tags: one finding per occurrence of an obsolete element, with
// the modern replacement in the message.
// =============================================================================

use super::Check;
use crate::config::AuditConfig;
use crate::document::Document;
use crate::finding::{Category, Finding};

pub struct DeprecatedTagCheck;

// (tag, what to use instead)
const DEPRECATED_TAGS: &[(&str, &str)] = &[
    ("acronym", "<abbr>"),
    ("applet", "<object> or <embed>"),
    ("basefont", "CSS font properties"),
    ("big", "CSS font-size"),
    ("blink", "CSS animations"),
    ("center", "CSS text-align or flexbox"),
    ("dir", "<ul>"),
    ("font", "CSS font properties"),
    ("frame", "<iframe> or a single-page layout"),
    ("frameset", "<iframe> or a single-page layout"),
    ("marquee", "CSS animations"),
    ("nobr", "CSS white-space: nowrap"),
    ("noframes", "regular page content"),
    ("spacer", "CSS margin or padding"),
    ("strike", "<del> or <s>"),
    ("tt", "<code> or <kbd>"),
    ("u", "CSS text-decoration"),
];

impl Check for DeprecatedTagCheck {
    fn name(&self) -> &'static str {
        "deprecated-tags"
    }

    fn run(&self, document: &Document, _config: &AuditConfig) -> Vec<Finding> {
        document
            .elements()
            .filter_map(|element| {
                let tag = element.value().name();
                let (_, replacement) = DEPRECATED_TAGS.iter().find(|(name, _)| *name == tag)?;
                Some(
                    Finding::new(
                        Category::DeprecatedTag,
                        format!(
                            "Deprecated tag found: <{}>; use {} instead",
                            tag, replacement
                        ),
                    )
                    .at(tag),
                )
            })
            .collect()
    }
}
