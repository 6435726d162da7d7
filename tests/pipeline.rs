//! End-to-end tests for the audit pipeline: fetch -> parse -> checks -> report.
//!
//! All tests use wiremock to serve pages locally - no real network calls.

use html_auditor::report::{aggregate, summarize};
use html_auditor::{AuditConfig, Auditor, Category, PageStatus};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Head section that satisfies the meta and encoding checks
const GOOD_HEAD: &str = r#"<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <meta name="description" content="Test page">
  <title>Test</title>
</head>"#;

fn page(body: &str) -> String {
    format!("<!DOCTYPE html><html lang=\"en\">{}<body>{}</body></html>", GOOD_HEAD, body)
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8")
}

fn test_config() -> AuditConfig {
    AuditConfig {
        request_timeout: Duration::from_secs(2),
        ..AuditConfig::default()
    }
}

async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html(body))
        .mount(server)
        .await;
}

const PNG_HEADER: [u8; 6] = [0x89, b'P', b'N', b'G', 0, 0];

// A port nothing is listening on
fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/", port)
}

#[tokio::test]
async fn test_heading_skip_and_missing_alt() {
    let server = MockServer::start().await;
    mount_page(&server, "/ok.html", page(r#"<h1>A</h1><h3>B</h3><img src="photo.jpg">"#)).await;

    let auditor = Auditor::new(test_config()).unwrap();
    let url = format!("{}/ok.html", server.uri());
    let report = auditor.analyze(&url).await;

    assert_eq!(report.status, PageStatus::Audited);
    let mut categories: Vec<&str> = report.findings.iter().map(|f| f.category.as_str()).collect();
    categories.sort();
    assert_eq!(categories, vec!["heading-hierarchy", "missing-alt"]);
    assert!(report.findings.iter().all(|f| f.url == url));
}

#[tokio::test]
async fn test_broken_link_reported_with_href() {
    let server = MockServer::start().await;
    let href = format!("{}/404", server.uri());
    mount_page(
        &server,
        "/broken.html",
        page(&format!(r#"<h1>Links</h1><p><a href="{}">gone</a></p>"#, href)),
    )
    .await;
    Mock::given(path("/404"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let auditor = Auditor::new(test_config()).unwrap();
    let report = auditor.analyze(&format!("{}/broken.html", server.uri())).await;

    assert_eq!(report.findings.len(), 1, "findings: {:?}", report.findings);
    let finding = &report.findings[0];
    assert_eq!(finding.category, Category::BrokenLink);
    assert_eq!(finding.locator.as_deref(), Some(href.as_str()));
    assert!(finding.message.contains("HTTP 404"));
}

#[tokio::test]
async fn test_repeated_broken_link_reported_per_anchor() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/repeat.html",
        page(r#"<h1>x</h1><a href="/gone">one</a><p>text</p><a href="/gone">two</a>"#),
    )
    .await;
    Mock::given(method("HEAD"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let auditor = Auditor::new(test_config()).unwrap();
    let report = auditor.analyze(&format!("{}/repeat.html", server.uri())).await;

    assert_eq!(report.findings.len(), 2, "findings: {:?}", report.findings);
    assert!(report.findings.iter().all(|f| f.category == Category::BrokenLink));
}

#[tokio::test]
async fn test_timeout_yields_single_unreachable_finding() {
    let server = MockServer::start().await;
    Mock::given(path("/timeout"))
        .respond_with(html(page("<h1>late</h1>")).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let config = AuditConfig {
        request_timeout: Duration::from_millis(300),
        ..test_config()
    };
    let auditor = Auditor::new(config).unwrap();
    let report = auditor.analyze(&format!("{}/timeout", server.uri())).await;

    assert_eq!(report.status, PageStatus::Unreachable);
    assert_eq!(report.findings.len(), 1);
    assert_eq!(report.findings[0].category, Category::Unreachable);
    assert!(report.findings[0].message.contains("timed out"));
}

#[tokio::test]
async fn test_connection_refused_is_unreachable() {
    let auditor = Auditor::new(test_config()).unwrap();
    let report = auditor.analyze(&closed_port_url()).await;

    assert_eq!(report.status, PageStatus::Unreachable);
    assert_eq!(report.findings.len(), 1);
    assert_eq!(report.findings[0].category, Category::Unreachable);
}

#[tokio::test]
async fn test_error_status_page_yields_status_row() {
    let server = MockServer::start().await;
    Mock::given(path("/gone"))
        .respond_with(ResponseTemplate::new(500).set_body_raw(page("<p>oops</p>"), "text/html"))
        .mount(&server)
        .await;

    let auditor = Auditor::new(test_config()).unwrap();
    let report = auditor.analyze(&format!("{}/gone", server.uri())).await;

    assert_eq!(report.status, PageStatus::HttpError(500));
    assert_eq!(report.findings.len(), 1);
    assert_eq!(report.findings[0].category, Category::HttpStatus);
}

#[tokio::test]
async fn test_non_html_content_is_unparseable() {
    let server = MockServer::start().await;
    Mock::given(path("/logo.png"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(PNG_HEADER.to_vec(), "image/png"))
        .mount(&server)
        .await;
    Mock::given(path("/binary.html"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(vec![0u8, 1, 2, 3, 0, 0], "text/html"),
        )
        .mount(&server)
        .await;

    let auditor = Auditor::new(test_config()).unwrap();
    for route in ["/logo.png", "/binary.html"] {
        let report = auditor.analyze(&format!("{}{}", server.uri(), route)).await;
        assert_eq!(report.status, PageStatus::Unparseable, "route {}", route);
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].category, Category::Unparseable);
    }
}

#[tokio::test]
async fn test_unreachable_link_target_is_broken() {
    let server = MockServer::start().await;
    let dead = closed_port_url();
    let body = page(&format!(r#"<h1>x</h1><a href="{}">dead</a>"#, dead));
    mount_page(&server, "/p.html", body).await;

    let auditor = Auditor::new(test_config()).unwrap();
    let report = auditor.analyze(&format!("{}/p.html", server.uri())).await;

    assert_eq!(report.findings.len(), 1);
    assert_eq!(report.findings[0].category, Category::BrokenLink);
    assert!(report.findings[0].message.starts_with("Failed to access link"));
}

#[tokio::test]
async fn test_relative_links_probed_once() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/docs/index.html",
        page(concat!(
            r##"<h1>Docs</h1><a href="guide.html">1</a><a href="guide.html#setup">2</a>"##,
            r##"<a href="#top">top</a><a href="mailto:a@b.test">mail</a>"##,
        )),
    )
    .await;
    Mock::given(method("HEAD"))
        .and(path("/docs/guide.html"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let auditor = Auditor::new(test_config()).unwrap();
    let report = auditor.analyze(&format!("{}/docs/index.html", server.uri())).await;
    assert!(report.is_clean(), "findings: {:?}", report.findings);
}

#[tokio::test]
async fn test_skip_links_makes_no_probes() {
    let server = MockServer::start().await;
    mount_page(&server, "/p.html", page(r#"<h1>x</h1><a href="/missing">m</a>"#)).await;
    Mock::given(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(0)
        .mount(&server)
        .await;

    let config = AuditConfig {
        validate_links: false,
        ..test_config()
    };
    let report = Auditor::new(config)
        .unwrap()
        .analyze(&format!("{}/p.html", server.uri()))
        .await;
    assert!(report.is_clean());
}

#[tokio::test]
async fn test_batch_keeps_order_and_isolates_failures() {
    let server = MockServer::start().await;
    // The first page is the slowest, so it finishes last
    Mock::given(method("GET"))
        .and(path("/slow.html"))
        .respond_with(
            html(page(r#"<h1>A</h1><img src="a.png">"#)).set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    mount_page(&server, "/clean.html", page("<h1>Clean</h1><p>Nothing wrong here.</p>")).await;
    mount_page(&server, "/messy.html", page("<h1>A</h1><center>x</center><font>y</font>")).await;

    let urls = vec![
        format!("{}/slow.html", server.uri()),
        closed_port_url(),
        format!("{}/clean.html", server.uri()),
        format!("{}/messy.html", server.uri()),
    ];

    let auditor = Auditor::new(test_config()).unwrap();
    let reports = auditor.analyze_all(&urls).await;

    let report_urls: Vec<&str> = reports.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(report_urls, urls.iter().map(String::as_str).collect::<Vec<_>>());

    let rows = aggregate(&reports);
    // 1 missing-alt + 1 unreachable status row + 0 + 2 deprecated tags
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0].category, "missing-alt");
    assert_eq!(rows[1].category, "unreachable");
    assert_eq!(rows[1].locator, "");
    assert_eq!(rows[2].category, "deprecated-tag");
    assert_eq!(rows[3].category, "deprecated-tag");
    assert!(rows.iter().all(|r| r.url != urls[2]));

    let summary = summarize(&reports);
    assert_eq!(summary.clean, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.with_findings, 2);
}

#[tokio::test]
async fn test_repeated_runs_are_identical() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/p.html",
        page(concat!(
            r#"<h2>x</h2><div></div>"#,
            r#"<button onclick="go()" style="color:red">Go</button><ul><p>bad</p></ul>"#,
        )),
    )
    .await;

    let auditor = Auditor::new(test_config()).unwrap();
    let urls = vec![format!("{}/p.html", server.uri())];
    let first = aggregate(&auditor.analyze_all(&urls).await);
    let second = aggregate(&auditor.analyze_all(&urls).await);

    assert!(!first.is_empty());
    assert_eq!(first, second);
}
