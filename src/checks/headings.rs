// src/checks/headings.rs
// =============================================================================
// Heading hierarchy.
//
// Headings are walked in document order. A heading may go back up any number
// of levels, but may only go ONE level deeper than the heading before it
// (h2 -> h3 is fine, h2 -> h4 skips h3). The first heading is measured
// against h1, so a page that opens with an h3 is reported too.
//
// A page should also have exactly one h1.
// =============================================================================

use super::Check;
use crate::config::AuditConfig;
use crate::document::Document;
use crate::finding::{Category, Finding};

pub struct HeadingCheck;

const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

impl Check for HeadingCheck {
    fn name(&self) -> &'static str {
        "headings"
    }

    fn run(&self, document: &Document, _config: &AuditConfig) -> Vec<Finding> {
        let mut findings = Vec::new();
        let mut previous: Option<u8> = None;
        let mut h1_count = 0usize;

        for heading in document.elements_named(HEADINGS) {
            let tag = heading.value().name();
            let level = heading_level(tag);

            if level == 1 {
                h1_count += 1;
                if h1_count > 1 {
                    findings.push(
                        Finding::new(
                            Category::HeadingHierarchy,
                            format!("Multiple h1 headings found (occurrence {})", h1_count),
                        )
                        .at("h1"),
                    );
                }
            }

            match previous {
                Some(prev) if level > prev + 1 => findings.push(
                    Finding::new(
                        Category::HeadingHierarchy,
                        format!("Heading level skipped: from h{} to h{}", prev, level),
                    )
                    .at(tag),
                ),
                None if level > 2 => findings.push(
                    Finding::new(
                        Category::HeadingHierarchy,
                        format!("Heading level skipped: document starts at h{}", level),
                    )
                    .at(tag),
                ),
                _ => {}
            }

            previous = Some(level);
        }

        if h1_count == 0 {
            findings.push(
                Finding::new(Category::HeadingHierarchy, "No h1 heading found").at("h1"),
            );
        }

        findings
    }
}

// "h3" -> 3; only ever called with names from HEADINGS
fn heading_level(tag: &str) -> u8 {
    tag.as_bytes().get(1).map(|b| b.saturating_sub(b'0')).unwrap_or(1)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    // Levels after a leading h1, each between h2 and one deeper than the
    // heading before it
    fn valid_levels() -> impl Strategy<Value = Vec<u8>> {
        prop::collection::vec(any::<u8>(), 0..30).prop_map(|steps| {
            let mut previous = 1u8;
            steps
                .into_iter()
                .map(|step| {
                    let allowed = (previous + 1).min(6) - 1;
                    previous = 2 + step % allowed;
                    previous
                })
                .collect()
        })
    }

    fn render(levels: &[u8], wrap: &[bool]) -> String {
        let mut html = String::from("<h1>Title</h1>");
        for (i, level) in levels.iter().enumerate() {
            let heading = format!("<h{0}>Heading {1}</h{0}><p>text</p>", level, i);
            if wrap.get(i).copied().unwrap_or(false) {
                html.push_str(&format!("<section><div>{}</div></section>", heading));
            } else {
                html.push_str(&heading);
            }
        }
        html
    }

    proptest! {
        /// Property: one h1 and no level rising by more than one yields no
        /// findings, however the headings are nested
        #[test]
        fn well_formed_hierarchy_is_clean(
            levels in valid_levels(),
            wrap in prop::collection::vec(any::<bool>(), 0..30),
        ) {
            let doc = Document::parse(&render(&levels, &wrap)).unwrap();
            let findings = HeadingCheck.run(&doc, &AuditConfig::default());
            prop_assert!(findings.is_empty(), "levels {:?}: {:?}", levels, findings);
        }

        /// Property: inserting a jump of two or more levels is always reported
        #[test]
        fn skipped_level_is_reported(levels in valid_levels(), gap in 2u8..5) {
            let last = levels.last().copied().unwrap_or(1);
            prop_assume!(last + gap <= 6);

            let mut with_skip = levels.clone();
            with_skip.push(last + gap);
            let doc = Document::parse(&render(&with_skip, &[])).unwrap();
            let findings = HeadingCheck.run(&doc, &AuditConfig::default());

            prop_assert_eq!(findings.len(), 1);
            let expected = format!("Heading level skipped: from h{} to h{}", last, last + gap);
            prop_assert_eq!(&findings[0].message, &expected);
        }
    }
}
