// src/checks/meta.rs
// =============================================================================
// Meta tag verification for the two tags search engines and mobile browsers
// care about most: viewport and description.
// =============================================================================

use super::Check;
use crate::config::AuditConfig;
use crate::document::{self, Document};
use crate::finding::{Category, Finding};

pub struct MetaTagCheck;

const REQUIRED_META: &[&str] = &["viewport", "description"];

impl Check for MetaTagCheck {
    fn name(&self) -> &'static str {
        "meta-tags"
    }

    fn run(&self, document: &Document, _config: &AuditConfig) -> Vec<Finding> {
        let mut findings = Vec::new();

        for required in REQUIRED_META {
            // Names are matched case-insensitively: name="Description" counts
            let tag = document.elements_named(&["meta"]).find(|meta| {
                meta.value()
                    .attr("name")
                    .map(|name| name.trim().eq_ignore_ascii_case(required))
                    .unwrap_or(false)
            });

            let message = match tag {
                None => format!("Missing {} meta tag", required),
                Some(meta) if document::non_empty_attr(meta, "content").is_none() => {
                    format!("Empty {} meta tag", required)
                }
                Some(_) => continue,
            };
            findings.push(
                Finding::new(Category::MetaTag, message).at(format!("meta[name={}]", required)),
            );
        }

        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(html: &str) -> Vec<Finding> {
        let doc = Document::parse(html).unwrap();
        MetaTagCheck.run(&doc, &AuditConfig::default())
    }

    #[test]
    fn test_both_present() {
        let findings = run(
            r#"<head>
                 <meta name="viewport" content="width=device-width">
                 <meta name="Description" content="About us">
               </head>"#,
        );
        assert!(findings.is_empty());
    }

    #[test]
    fn test_both_missing() {
        let findings = run("<head><title>x</title></head>");
        let messages: Vec<_> = findings.iter().map(|f| f.message.as_str()).collect();
        assert_eq!(messages, vec!["Missing viewport meta tag", "Missing description meta tag"]);
    }

    #[test]
    fn test_empty_content() {
        let findings = run(
            r#"<head>
                 <meta name="viewport" content="width=device-width">
                 <meta name="description" content=" ">
               </head>"#,
        );
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].message, "Empty description meta tag");
        assert_eq!(findings[0].locator.as_deref(), Some("meta[name=description]"));
    }
}
