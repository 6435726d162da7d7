// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (stderr, so stdout stays clean for JSON)
// 3. Read the URL list, run the audit, print progress as pages finish
// 4. Print the report and optionally write it as CSV
// 5. Exit with proper code (0 = clean, 1 = issues found, 2 = error)
// =============================================================================

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{AuditArgs, Cli, Commands};
use futures::StreamExt;
use html_auditor::report::{self, ReportRow, Summary};
use html_auditor::{input, Auditor, PageReport, PageStatus};
use std::fs::File;
use std::io::BufWriter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = every page is clean
//   Ok(1) = at least one report row
//   Err   = fatal error (bad config, unreadable input, unwritable output)
async fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Audit { urls_file, args } => {
            init_logging(args.verbose);
            let urls = input::read_url_list(&urls_file)?;
            handle_audit(urls, &args).await
        }
        Commands::Page { url, args } => {
            init_logging(args.verbose);
            handle_audit(vec![url], &args).await
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "html_auditor=debug"
    } else {
        "html_auditor=warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn handle_audit(urls: Vec<String>, args: &AuditArgs) -> Result<i32> {
    let auditor = Auditor::new(args.to_config()).context("could not start the audit")?;
    let progress = !args.json;

    if progress {
        println!("🔍 Auditing {} URL(s)...", urls.len());
        println!("{}", "-".repeat(50));
    }

    // Reports arrive in input order while up to --concurrency pages run at once
    let mut reports = Vec::with_capacity(urls.len());
    let mut stream = Box::pin(auditor.audit_stream(&urls));
    while let Some(page) = stream.next().await {
        if progress {
            print_page_status(&page);
        }
        reports.push(page);
    }

    let rows = report::aggregate(&reports);

    if let Some(path) = &args.output {
        let file = File::create(path)
            .with_context(|| format!("could not create report file {}", path.display()))?;
        report::write_csv(&rows, BufWriter::new(file))
            .with_context(|| format!("could not write report file {}", path.display()))?;
        if progress {
            println!("\n💾 Report saved to: {}", path.display());
        }
    }

    print_results(&rows, report::summarize(&reports), args.json)?;

    if rows.is_empty() {
        Ok(0)
    } else {
        Ok(1)
    }
}

// One progress line per finished page
fn print_page_status(page: &PageReport) {
    match page.status {
        PageStatus::Audited if page.findings.is_empty() => println!("✅ {}", page.url),
        PageStatus::Audited => println!("❌ {} ({} issue(s))", page.url, page.findings.len()),
        PageStatus::HttpError(status) => println!("⚠️  {} (HTTP {})", page.url, status),
        PageStatus::Unreachable => println!("🌐 {} (unreachable)", page.url),
        PageStatus::Unparseable => println!("📄 {} (not HTML)", page.url),
    }
}

// Prints the rows either as a table or JSON
fn print_results(rows: &[ReportRow], summary: Summary, json: bool) -> Result<()> {
    if json {
        let json_output = serde_json::to_string_pretty(rows)?;
        println!("{}", json_output);
    } else {
        print_table(rows, summary);
    }
    Ok(())
}

fn print_table(rows: &[ReportRow], summary: Summary) {
    if !rows.is_empty() {
        println!();
        println!("{:<45} {:<18} {:<50}", "URL", "CATEGORY", "MESSAGE");
        println!("{}", "=".repeat(113));

        for row in rows {
            println!(
                "{:<45} {:<18} {:<50}",
                truncate(&row.url, 45),
                row.category,
                row.message
            );
        }
    }

    println!();
    println!("📊 Summary:");
    println!("   ✅ Clean pages: {}", summary.clean);
    println!("   ❌ Pages with issues: {}", summary.with_findings);
    println!("   ⚠️  Pages that failed: {}", summary.failed);
    println!("   📋 Total issues: {}", summary.findings);
}

// Shortens long URLs for the table, respecting char boundaries
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept)
}
