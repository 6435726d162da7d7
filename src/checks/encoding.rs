// src/checks/encoding.rs
// =============================================================================
// Character encoding: the <head> must declare one, either as
// <meta charset="..."> or the older
// <meta http-equiv="Content-Type" content="text/html; charset=...">.
// =============================================================================

use super::Check;
use crate::config::AuditConfig;
use crate::document::{self, Document};
use crate::finding::{Category, Finding};
use scraper::ElementRef;

pub struct EncodingCheck;

impl Check for EncodingCheck {
    fn name(&self) -> &'static str {
        "encoding"
    }

    fn run(&self, document: &Document, _config: &AuditConfig) -> Vec<Finding> {
        let declared = document
            .head()
            .map(|head| {
                head.descendants()
                    .filter_map(ElementRef::wrap)
                    .filter(|el| el.value().name() == "meta")
                    .any(declares_charset)
            })
            .unwrap_or(false);

        if declared {
            Vec::new()
        } else {
            vec![
                Finding::new(Category::Encoding, "No character encoding declared")
                    .at("meta[charset]"),
            ]
        }
    }
}

fn declares_charset(meta: ElementRef<'_>) -> bool {
    if document::non_empty_attr(meta, "charset").is_some() {
        return true;
    }

    let is_content_type = meta
        .value()
        .attr("http-equiv")
        .map(|v| v.trim().eq_ignore_ascii_case("content-type"))
        .unwrap_or(false);

    is_content_type
        && meta
            .value()
            .attr("content")
            .map(|content| content.to_ascii_lowercase().contains("charset="))
            .unwrap_or(false)
}
