// src/finding.rs
// =============================================================================
// The value objects every check produces.
//
// A Finding is one issue detected on one page. Its category comes from a
// closed enum, so a check cannot invent a category the report doesn't know
// about.
// =============================================================================

use serde::{Deserialize, Serialize};
use std::fmt;

// Every kind of issue the auditor can report
//
// The first group comes from the rule checks; the last three are per-URL
// status markers produced by the orchestrator when a page can't be analysed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    BrokenLink,
    MissingAlt,
    MissingSrc,
    EmptyTag,
    DuplicateId,
    HeadingHierarchy,
    DeprecatedTag,
    FormValidation,
    MetaTag,
    Encoding,
    InlineStyle,
    InlineScript,
    ListStructure,
    TableStructure,
    /// The page could not be fetched at all
    Unreachable,
    /// The page was fetched but is not HTML
    Unparseable,
    /// The page answered with a 4xx/5xx status
    HttpStatus,
}

impl Category {
    /// The kebab-case name used in reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::BrokenLink => "broken-link",
            Category::MissingAlt => "missing-alt",
            Category::MissingSrc => "missing-src",
            Category::EmptyTag => "empty-tag",
            Category::DuplicateId => "duplicate-id",
            Category::HeadingHierarchy => "heading-hierarchy",
            Category::DeprecatedTag => "deprecated-tag",
            Category::FormValidation => "form-validation",
            Category::MetaTag => "meta-tag",
            Category::Encoding => "encoding",
            Category::InlineStyle => "inline-style",
            Category::InlineScript => "inline-script",
            Category::ListStructure => "list-structure",
            Category::TableStructure => "table-structure",
            Category::Unreachable => "unreachable",
            Category::Unparseable => "unparseable",
            Category::HttpStatus => "http-status",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// One detected issue
//
// Checks build findings without a URL; the orchestrator tags each one with
// the page it came from before handing them on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// The page the issue was found on
    pub url: String,
    pub category: Category,
    /// Human-readable description
    pub message: String,
    /// Tag, attribute or href implicated, when there is one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locator: Option<String>,
}

impl Finding {
    pub fn new(category: Category, message: impl Into<String>) -> Self {
        Self {
            url: String::new(),
            category,
            message: message.into(),
            locator: None,
        }
    }

    /// Attach the tag/attribute/href this finding points at
    pub fn at(mut self, locator: impl Into<String>) -> Self {
        self.locator = Some(locator.into());
        self
    }

    /// Tag the finding with its source URL
    pub fn for_url(mut self, url: &str) -> Self {
        self.url = url.to_string();
        self
    }
}
