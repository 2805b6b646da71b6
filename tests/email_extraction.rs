mod common;

use common::StaticRenderer;
use contact_crawler::extract::email::{EmailExtractor, EmailExtractorConfig};
use contact_crawler::extract::keywords::EmailRules;
use contact_crawler::extract::Source;
use std::sync::Arc;

#[tokio::test]
async fn single_mailto_page_selects_that_email() {
    // The canonical minimal page: one mailto link, nothing else. With the
    // reject table emptied the placeholder domain passes validation.
    let rules = EmailRules {
        reject_patterns: Vec::new(),
        ..EmailRules::default()
    };
    let extractor = EmailExtractor::new("https://example.com/").with_config(EmailExtractorConfig {
        rules,
        ..EmailExtractorConfig::default()
    });

    let html = concat!(
        "<title>テスト株式会社 | サービス</title>",
        r#"<a href="mailto:info@example.com">Contact</a>"#
    );
    let result = extractor.extract(html, None).await;

    let selected = result.selected.expect("mailto address must be selected");
    assert_eq!(selected.value, "info@example.com");
    assert_eq!(selected.source, Source::MailtoLink);
    assert!(selected.confidence >= 0.6);
}

#[tokio::test]
async fn default_rules_reject_placeholder_domain() {
    let extractor = EmailExtractor::new("https://example.com/");
    let html = r#"<a href="mailto:info@example.com">Contact</a>"#;
    let result = extractor.extract(html, None).await;

    assert!(result.selected.is_none());
    assert!(result.candidates.is_empty());
}

#[tokio::test]
async fn jsonld_email_is_detected_as_structured_data() {
    let extractor = EmailExtractor::new("https://acme.co.jp/");
    let html = r#"<html><head>
        <script type="application/ld+json">
        {"@type":"Organization","name":"Acme","email":"desk@acme.co.jp"}
        </script>
        </head><body></body></html>"#;
    let result = extractor.extract(html, None).await;

    // jsonld 30 + same-domain 20 = 0.50, below the 0.6 acceptance line: the
    // candidate is recorded for audit but not selected.
    assert!(result.selected.is_none());
    assert_eq!(result.candidates.len(), 1);
    assert_eq!(result.candidates[0].value, "desk@acme.co.jp");
    assert_eq!(result.candidates[0].source, Source::JsonldSchema);
    assert!((result.candidates[0].confidence - 0.5).abs() < f64::EPSILON);
}

#[tokio::test]
async fn form_placeholder_email_lands_in_candidates() {
    let extractor = EmailExtractor::new("https://acme.co.jp/");
    let html = r#"<form><input type="email" placeholder="info@acme.co.jp"></form>"#;
    let result = extractor.extract(html, None).await;

    assert_eq!(result.candidates.len(), 1);
    assert_eq!(result.candidates[0].source, Source::FormPlaceholder);
    assert_eq!(result.candidates[0].value, "info@acme.co.jp");
}

#[tokio::test]
async fn renderer_fallback_recovers_js_only_email() {
    let rendered = r#"<html><body><a href="mailto:info@acme.co.jp">mail</a></body></html>"#;
    let extractor = EmailExtractor::new("https://acme.co.jp/")
        .with_renderer(Arc::new(StaticRenderer {
            markup: rendered.to_string(),
        }));

    // Static markup carries a script fingerprint but no address at all.
    let html = r#"<html><body><div id="app"></div><script src="/bundle.js"></script></body></html>"#;
    let result = extractor.extract(html, None).await;

    let selected = result.selected.expect("rendered markup must be re-scanned");
    assert_eq!(selected.value, "info@acme.co.jp");
    assert_eq!(selected.source, Source::MailtoLink);
}

#[tokio::test]
async fn renderer_is_not_used_when_static_detection_succeeds() {
    // If the renderer were consulted it would replace the real address.
    let extractor = EmailExtractor::new("https://acme.co.jp/")
        .with_renderer(Arc::new(StaticRenderer {
            markup: r#"<a href="mailto:wrong@acme.co.jp">x</a>"#.to_string(),
        }));

    let html = r#"<body><a href="mailto:info@acme.co.jp">mail</a><script>var x=1;</script></body>"#;
    let result = extractor.extract(html, None).await;

    assert_eq!(result.selected.unwrap().value, "info@acme.co.jp");
}

#[tokio::test]
async fn candidate_lists_are_deterministic_across_runs() {
    let html = r#"<html><body>
        <a href="mailto:info@acme.co.jp">Contact</a>
        <footer>sales@acme.co.jp / desk[at]acme[dot]co[dot]jp</footer>
        <form><input type="email" placeholder="you@acme.co.jp"></form>
        </body></html>"#;

    let first = EmailExtractor::new("https://acme.co.jp/")
        .extract(html, None)
        .await;
    let second = EmailExtractor::new("https://acme.co.jp/")
        .extract(html, None)
        .await;

    assert_eq!(first.candidates.len(), second.candidates.len());
    for (a, b) in first.candidates.iter().zip(second.candidates.iter()) {
        assert_eq!(a.value, b.value);
        assert_eq!(a.source, b.source);
        assert!((a.confidence - b.confidence).abs() < f64::EPSILON);
    }
    assert_eq!(
        first.selected.map(|c| c.value),
        second.selected.map(|c| c.value)
    );
}

#[tokio::test]
async fn candidates_never_contain_empty_values() {
    let html = r#"<html><body>
        <a href="mailto:">empty</a>
        <a href="mailto:info@acme.co.jp">real</a>
        </body></html>"#;
    let result = EmailExtractor::new("https://acme.co.jp/")
        .extract(html, None)
        .await;

    assert!(result
        .candidates
        .iter()
        .all(|c| !c.value.trim().is_empty()));
}
