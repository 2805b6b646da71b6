mod common;

use common::{DenyListRobots, MockFetcher};
use contact_crawler::extract::contact_form::ContactFormDetector;
use contact_crawler::robots::RobotsPolicy;
use std::sync::Arc;

const ROOT: &str = "https://acme.co.jp/";

fn root_page(links: &str) -> String {
    format!(
        r#"<html><body><nav>{}</nav><footer><a href="/contact/">お問い合わせ</a></footer></body></html>"#,
        links
    )
}

#[tokio::test]
async fn selects_form_page_by_score() {
    let fetcher = MockFetcher::new()
        .with_page(
            ROOT,
            &root_page(r#"<a href="/contact/">お問い合わせ</a><a href="/about/">会社案内</a>"#),
        )
        .with_page(
            "https://acme.co.jp/contact/",
            r#"<html><body><form action="/send"><input type="email" name="email"></form></body></html>"#,
        );

    let detector = ContactFormDetector::new().with_fetcher(Arc::new(fetcher));
    let result = detector.detect(ROOT, None).await;

    assert_eq!(result.form_url.as_deref(), Some("https://acme.co.jp/contact/"));
    assert!(result.remarks.contains("Contains form tag"));
    assert!(result.remarks.contains("Has email fields"));
    assert!(result.remarks.contains("Found in header/footer"));
    assert!(!result.candidates.is_empty());
    // link text 0.6 + url pattern 0.5 + form 0.8 + email field 0.2 + footer 0.3
    assert!(result.remarks.contains("Score: 2.40"));
}

#[tokio::test]
async fn reference_url_overrides_score_ranking() {
    let fetcher = MockFetcher::new()
        .with_page(
            ROOT,
            &root_page(
                r#"<a href="/inquiry/">お問い合わせ</a><a href="/contact/">contact</a>"#,
            ),
        )
        .with_page(
            "https://acme.co.jp/inquiry/",
            r#"<html><body><form><input type="email" name="email"></form></body></html>"#,
        )
        .with_page("https://acme.co.jp/contact/", "<html><body>phone only</body></html>");

    let detector = ContactFormDetector::new().with_fetcher(Arc::new(fetcher));

    // Score ranking alone would pick /inquiry/ (it has the form).
    let by_score = detector.detect(ROOT, None).await;
    assert_eq!(
        by_score.form_url.as_deref(),
        Some("https://acme.co.jp/inquiry/")
    );

    // A reference URL with an equivalent path prefers /contact/.
    let by_reference = detector
        .detect(ROOT, Some("https://acme.co.jp/contact/index.html"))
        .await;
    assert_eq!(
        by_reference.form_url.as_deref(),
        Some("https://acme.co.jp/contact/")
    );
    assert!(by_reference.remarks.contains("(fuzzy/path match)"));
}

#[tokio::test]
async fn distant_reference_falls_back_to_score() {
    let fetcher = MockFetcher::new()
        .with_page(ROOT, &root_page(r#"<a href="/inquiry/">お問い合わせ</a>"#))
        .with_page(
            "https://acme.co.jp/inquiry/",
            r#"<html><body><form></form></body></html>"#,
        );

    let detector = ContactFormDetector::new().with_fetcher(Arc::new(fetcher));
    let result = detector
        .detect(ROOT, Some("https://acme.co.jp/totally/unrelated/page.html"))
        .await;

    assert_eq!(
        result.form_url.as_deref(),
        Some("https://acme.co.jp/inquiry/")
    );
    assert!(!result.remarks.contains("fuzzy"));
}

#[tokio::test]
async fn page_without_contact_links_yields_no_candidates() {
    let fetcher = MockFetcher::new().with_page(
        ROOT,
        r#"<html><body><a href="/news/">ニュース</a></body></html>"#,
    );

    let detector = ContactFormDetector::new().with_fetcher(Arc::new(fetcher));
    let result = detector.detect(ROOT, None).await;

    assert!(result.form_url.is_none());
    assert!(result.candidates.is_empty());
    assert_eq!(result.remarks, "No contact form candidates found");
}

#[tokio::test]
async fn missing_fetcher_reports_detector_unavailable() {
    let detector = ContactFormDetector::new();
    let result = detector.detect(ROOT, None).await;

    assert!(result.form_url.is_none());
    assert!(result.candidates.is_empty());
    assert_eq!(result.remarks, "Fetcher not available");
}

#[tokio::test]
async fn root_fetch_failure_is_reported() {
    let detector = ContactFormDetector::new().with_fetcher(Arc::new(MockFetcher::new()));
    let result = detector.detect(ROOT, None).await;

    assert!(result.form_url.is_none());
    assert!(result.remarks.starts_with("Failed to fetch root page"));
}

#[tokio::test]
async fn robots_disallowed_candidates_are_skipped() {
    let fetcher = MockFetcher::new()
        .with_page(ROOT, &root_page(r#"<a href="/inquiry/">お問い合わせ</a>"#))
        .with_page(
            "https://acme.co.jp/inquiry/",
            r#"<html><body><form></form></body></html>"#,
        )
        .with_page(
            "https://acme.co.jp/contact/",
            r#"<html><body><form></form></body></html>"#,
        );

    let robots = DenyListRobots::denying(&["https://acme.co.jp/inquiry/"]);
    let detector = ContactFormDetector::new()
        .with_fetcher(Arc::new(fetcher))
        .with_robots(Arc::new(robots), RobotsPolicy::Respect);
    let result = detector.detect(ROOT, None).await;

    // Only the footer's /contact/ link survives the robots gate.
    assert_eq!(
        result.form_url.as_deref(),
        Some("https://acme.co.jp/contact/")
    );
    assert!(result
        .candidates
        .iter()
        .all(|c| c.value != "https://acme.co.jp/inquiry/"));
}

#[tokio::test]
async fn ignore_policy_bypasses_robots_denial() {
    let fetcher = MockFetcher::new()
        .with_page(ROOT, &root_page(r#"<a href="/inquiry/">お問い合わせ</a>"#))
        .with_page(
            "https://acme.co.jp/inquiry/",
            r#"<html><body><form></form></body></html>"#,
        );

    let robots = DenyListRobots::denying(&["https://acme.co.jp/inquiry/"]);
    let detector = ContactFormDetector::new()
        .with_fetcher(Arc::new(fetcher))
        .with_robots(Arc::new(robots), RobotsPolicy::Ignore);
    let result = detector.detect(ROOT, None).await;

    assert_eq!(
        result.form_url.as_deref(),
        Some("https://acme.co.jp/inquiry/")
    );
}
