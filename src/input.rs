// src/input.rs
// =============================================================================
// Reading the list of URLs to audit.
//
// Format: one URL per line, surrounding whitespace trimmed, blank lines
// ignored. URLs are NOT validated here; a bad one simply comes back from the
// fetcher as an "unreachable" finding.
// =============================================================================

use anyhow::{Context, Result};
use std::path::Path;

pub fn parse_url_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

// Reads and parses a URL list file
//
// A missing or unreadable file is fatal for the run, so it comes back as an
// error with the path attached.
pub fn read_url_list(path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("could not read URL list {}", path.display()))?;
    Ok(parse_url_list(&text))
}
