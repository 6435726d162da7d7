// src/document.rs
// =============================================================================
// This module turns raw HTML text into a document the checks can walk.
//
// We use the `scraper` crate which:
// - Parses HTML with html5ever, the same tree-construction algorithm browsers
//   use, so unclosed tags, stray end tags and a missing DOCTYPE are repaired
//   instead of rejected
// - Gives us a tree of elements, attributes and text nodes
//
// Tolerance rules the rest of the crate relies on:
// - Any text is accepted as HTML, including the empty string
// - Only content that is clearly binary (NUL bytes, mostly control
//   characters) or served with a non-HTML content type is a ParseError
// - Traversal is always document order: depth-first, pre-order
// - Tag and attribute names are lowercase
// - When an attribute is repeated on one start tag, the last value wins.
//   html5ever would keep the first one, so such tags are rewritten before
//   parsing (see keep_last_attributes)
// =============================================================================

use scraper::{ElementRef, Html};
use std::borrow::Cow;
use std::ops::Range;
use thiserror::Error;

// How much of the body we sample when sniffing for binary content
const SNIFF_LEN: usize = 1024;

// Elements whose content is raw text: a '<' inside them never opens a tag
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "textarea", "title", "xmp", "iframe", "noembed", "noframes",
];

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("content looks like binary data, not HTML")]
    Binary,
    #[error("unsupported content type: {0}")]
    UnsupportedContentType(String),
}

/// A parsed page, immutable once built
#[derive(Debug)]
pub struct Document {
    html: Html,
}

impl Document {
    // Parses HTML text into a Document
    //
    // Malformed markup is never an error here; the checks report it.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        if looks_binary(text) {
            return Err(ParseError::Binary);
        }

        Ok(Self {
            html: Html::parse_document(&keep_last_attributes(text)),
        })
    }

    /// All elements in document order
    pub fn elements(&self) -> impl Iterator<Item = ElementRef<'_>> + '_ {
        self.html.tree.root().descendants().filter_map(ElementRef::wrap)
    }

    /// Elements whose tag name is one of `names`, in document order
    pub fn elements_named<'a>(
        &'a self,
        names: &'a [&'a str],
    ) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        self.elements()
            .filter(move |el| names.contains(&el.value().name()))
    }

    /// First element with the given tag name
    pub fn first_named(&self, name: &str) -> Option<ElementRef<'_>> {
        self.elements().find(|el| el.value().name() == name)
    }

    /// The `<head>` element (the parser always creates one)
    pub fn head(&self) -> Option<ElementRef<'_>> {
        self.first_named("head")
    }
}

// Rejects responses whose Content-Type says they aren't markup
//
// No header at all is fine: plenty of servers omit it for HTML.
pub fn ensure_markup_content_type(content_type: Option<&str>) -> Result<(), ParseError> {
    let Some(raw) = content_type else {
        return Ok(());
    };

    let mime = raw
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    let markup = mime.contains("html") || mime.contains("xml") || mime.starts_with("text/");
    if mime.is_empty() || markup {
        Ok(())
    } else {
        Err(ParseError::UnsupportedContentType(mime))
    }
}

/// Element children of `element`, skipping text and comments
pub fn child_elements<'a>(element: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    element.children().filter_map(ElementRef::wrap)
}

/// Concatenated text of every descendant text node
pub fn text_content(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// True if the element has no child elements and no non-whitespace text
pub fn is_empty(element: ElementRef<'_>) -> bool {
    !element.children().any(|node| {
        if node.value().is_element() {
            return true;
        }
        node.value()
            .as_text()
            .map(|text| !text.trim().is_empty())
            .unwrap_or(false)
    })
}

/// Non-whitespace text sitting directly inside `element`
pub fn has_stray_text(element: ElementRef<'_>) -> bool {
    element.children().any(|node| {
        node.value()
            .as_text()
            .map(|text| !text.trim().is_empty())
            .unwrap_or(false)
    })
}

/// Attribute value, treating whitespace-only values as absent
pub fn non_empty_attr<'a>(element: ElementRef<'a>, name: &str) -> Option<&'a str> {
    element
        .value()
        .attr(name)
        .filter(|value| !value.trim().is_empty())
}

/// Whether any ancestor of `element` has the given tag name
pub fn has_ancestor(element: ElementRef<'_>, name: &str) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| ancestor.value().name() == name)
}

// Sniffs the start of the text for binary content
//
// A NUL byte anywhere is conclusive. Otherwise, more than 10% control or
// replacement characters in the first SNIFF_LEN characters means the bytes
// were never text to begin with.
fn looks_binary(text: &str) -> bool {
    if text.contains('\0') {
        return true;
    }

    let mut sampled = 0usize;
    let mut suspicious = 0usize;
    for c in text.chars().take(SNIFF_LEN) {
        sampled += 1;
        let is_control = c.is_control() && !matches!(c, '\t' | '\n' | '\r' | '\x0c');
        if is_control || c == char::REPLACEMENT_CHARACTER {
            suspicious += 1;
        }
    }

    sampled > 0 && suspicious * 10 > sampled
}

// Rewrites start tags that repeat an attribute so only the last value of each
// name is left
//
// html5ever drops repeated attributes while tokenizing, before anything
// reaches the tree, so this has to happen on the text. Tags without repeats
// are copied untouched, and text without any comes back borrowed.
fn keep_last_attributes(text: &str) -> Cow<'_, str> {
    let lower = text.to_ascii_lowercase();
    let mut output = String::new();
    let mut copied = 0;
    let mut pos = 0;

    while let Some(offset) = text[pos..].find('<') {
        let start = pos + offset;

        if text[start..].starts_with("<!--") {
            match text[start + 4..].find("-->") {
                Some(end) => {
                    pos = start + 4 + end + 3;
                    continue;
                }
                None => break,
            }
        }

        let Some(tag) = scan_start_tag(text, start) else {
            pos = start + 1;
            continue;
        };

        if tag.has_repeats() {
            output.push_str(&text[copied..start]);
            output.push_str(&tag.rewrite(text));
            copied = tag.end;
        }

        pos = tag.end;
        if RAW_TEXT_ELEMENTS.contains(&tag.name.as_str()) {
            let closing = format!("</{}", tag.name);
            pos = lower[pos..].find(&closing).map_or(text.len(), |i| pos + i);
        }
    }

    if copied == 0 {
        Cow::Borrowed(text)
    } else {
        output.push_str(&text[copied..]);
        Cow::Owned(output)
    }
}

// A start tag as written in the source, as byte offsets into the text
struct StartTag {
    start: usize,
    /// Lowercased tag name
    name: String,
    name_end: usize,
    attributes: Vec<RawAttribute>,
    self_closing: bool,
    /// Offset just past the closing '>'
    end: usize,
}

struct RawAttribute {
    /// Lowercased, the way the parser compares names
    name: String,
    /// `name`, `name=value` or `name="value"` exactly as written
    span: Range<usize>,
}

impl StartTag {
    fn has_repeats(&self) -> bool {
        self.attributes
            .iter()
            .enumerate()
            .any(|(i, attr)| self.repeated_after(i, &attr.name))
    }

    fn repeated_after(&self, index: usize, name: &str) -> bool {
        self.attributes[index + 1..]
            .iter()
            .any(|later| later.name == name)
    }

    // The tag with every overridden attribute removed
    fn rewrite(&self, text: &str) -> String {
        let mut tag = text[self.start..self.name_end].to_string();
        for (i, attr) in self.attributes.iter().enumerate() {
            if !self.repeated_after(i, &attr.name) {
                tag.push(' ');
                tag.push_str(&text[attr.span.clone()]);
            }
        }
        if self.self_closing {
            tag.push('/');
        }
        tag.push('>');
        tag
    }
}

// Reads the start tag opening at `start` (which holds a '<')
//
// Follows the tokenizer's attribute rules: names run until whitespace, '/',
// '>' or '='; values are quoted or run until whitespace or '>'. Returns None
// for anything that isn't a complete start tag.
fn scan_start_tag(text: &str, start: usize) -> Option<StartTag> {
    let bytes = text.as_bytes();
    if !bytes.get(start + 1)?.is_ascii_alphabetic() {
        return None;
    }

    let name_end = skip_until(bytes, start + 1, is_tag_delimiter);
    let name = text[start + 1..name_end].to_ascii_lowercase();

    let mut attributes = Vec::new();
    let mut self_closing = false;
    let mut i = name_end;

    loop {
        match *bytes.get(i)? {
            b'>' => break,
            b'/' => {
                self_closing = true;
                i += 1;
            }
            b if b.is_ascii_whitespace() => i += 1,
            _ => {
                self_closing = false;
                let attr_start = i;
                // the first character of a name may be '='
                i = skip_until(bytes, i + 1, |b| is_tag_delimiter(b) || b == b'=');
                let attr_name = text[attr_start..i].to_ascii_lowercase();

                let after_name = skip_until(bytes, i, |b| !b.is_ascii_whitespace());
                if bytes.get(after_name) == Some(&b'=') {
                    let value_start =
                        skip_until(bytes, after_name + 1, |b| !b.is_ascii_whitespace());
                    i = match *bytes.get(value_start)? {
                        quote @ (b'"' | b'\'') => {
                            let close = text[value_start + 1..].find(char::from(quote))?;
                            value_start + 1 + close + 1
                        }
                        b'>' => value_start,
                        _ => skip_until(bytes, value_start, |b| {
                            b.is_ascii_whitespace() || b == b'>'
                        }),
                    };
                }

                attributes.push(RawAttribute {
                    name: attr_name,
                    span: attr_start..i,
                });
            }
        }
    }

    Some(StartTag {
        start,
        name,
        name_end,
        attributes,
        self_closing,
        end: i + 1,
    })
}

fn is_tag_delimiter(b: u8) -> bool {
    b.is_ascii_whitespace() || b == b'/' || b == b'>'
}

// First index at or after `from` whose byte matches, or the end of the text
fn skip_until(bytes: &[u8], from: usize, stop: impl Fn(u8) -> bool) -> usize {
    bytes[from.min(bytes.len())..]
        .iter()
        .position(|b| stop(*b))
        .map_or(bytes.len(), |i| from + i)
}
