// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two subcommands:
// - audit: audit every URL listed in a file
// - page:  audit a single URL given on the command line
//
// Both share the same tuning flags (AuditArgs), which main.rs turns into an
// AuditConfig.
// =============================================================================

use clap::{Args, Parser, Subcommand};
use html_auditor::AuditConfig;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "html-auditor",
    version,
    about = "Audit web pages for HTML, SEO and accessibility issues",
    long_about = "html-auditor fetches each page, parses its markup and reports broken links, \
                  missing alt text, heading hierarchy problems, deprecated tags, form and meta \
                  tag issues, inline code and list/table structure problems."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Audit every URL listed in a file (one per line, blank lines ignored)
    ///
    /// Example: html-auditor audit urls.txt --output report.csv
    Audit {
        /// File containing the URLs to audit
        urls_file: PathBuf,

        #[command(flatten)]
        args: AuditArgs,
    },

    /// Audit a single page
    ///
    /// Example: html-auditor page https://example.com --json
    Page {
        /// URL of the page to audit
        url: String,

        #[command(flatten)]
        args: AuditArgs,
    },
}

// Flags shared by both subcommands
#[derive(Args, Debug, Clone)]
pub struct AuditArgs {
    /// Also write the report as CSV to this file
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Print report rows as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Timeout for every HTTP request, in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,

    /// Redirects to follow before giving up
    #[arg(long, default_value_t = 5)]
    pub max_redirects: usize,

    /// Pages audited at the same time
    #[arg(long, default_value_t = 4)]
    pub concurrency: usize,

    /// Links of one page probed at the same time
    #[arg(long, default_value_t = 5)]
    pub link_concurrency: usize,

    /// Accept alt="" as a decorative-image marker
    #[arg(long)]
    pub allow_empty_alt: bool,

    /// Don't probe the links found on each page
    #[arg(long)]
    pub skip_links: bool,

    /// User-Agent header sent with every request
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Show debug logging on stderr
    #[arg(long, short)]
    pub verbose: bool,
}

impl AuditArgs {
    pub fn to_config(&self) -> AuditConfig {
        let defaults = AuditConfig::default();
        AuditConfig {
            request_timeout: Duration::from_secs(self.timeout),
            max_redirects: self.max_redirects,
            user_agent: self.user_agent.clone().unwrap_or(defaults.user_agent),
            page_concurrency: self.concurrency,
            link_concurrency: self.link_concurrency,
            allow_empty_alt: self.allow_empty_alt,
            validate_links: !self.skip_links,
        }
    }
}
