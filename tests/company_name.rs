mod common;

use common::MockFetcher;
use contact_crawler::extract::company_name::CompanyNameExtractor;
use contact_crawler::extract::Source;
use std::sync::Arc;

#[tokio::test]
async fn header_image_alt_beats_header_footer_text() {
    // Two legal-entity-bearing alt texts in the header and no metadata: the
    // first header-image candidate must win over every lower-priority source.
    let extractor = CompanyNameExtractor::new("https://acme.co.jp/");
    let html = r#"<html><body>
        <header>
            <img src="/logo.png" alt="株式会社アクメ">
            <img src="/group.png" alt="株式会社アクメグループ">
        </header>
        <footer>© 株式会社アクメ商事</footer>
        </body></html>"#;
    let result = extractor.extract(html, None).await;

    let best = result.selected.unwrap();
    assert_eq!(best.source, Source::HeaderImageAlt);
    assert_eq!(best.value, "株式会社アクメ");
    assert!((best.confidence - 0.95).abs() < f64::EPSILON);

    // The header/footer candidate is still present in the audit list.
    assert!(result
        .candidates
        .iter()
        .any(|c| c.source == Source::HeaderFooter));
}

#[tokio::test]
async fn profile_page_fetch_reads_name_from_table() {
    let fetcher = MockFetcher::new().with_page(
        "https://acme.co.jp/company/",
        r#"<html><body><table>
            <tr><th>会社名</th><td>株式会社アクメ</td></tr>
            <tr><th>所在地</th><td>東京都</td></tr>
            </table></body></html>"#,
    );
    let extractor =
        CompanyNameExtractor::new("https://acme.co.jp/").with_fetcher(Arc::new(fetcher));

    let html = r#"<html><body><a href="/company/">会社概要</a></body></html>"#;
    let result = extractor.extract(html, None).await;

    let best = result.selected.unwrap();
    assert_eq!(best.value, "株式会社アクメ");
    assert_eq!(best.source, Source::CompanyProfilePage);
    assert!((best.confidence - 0.85).abs() < f64::EPSILON);
}

#[tokio::test]
async fn profile_page_is_skipped_without_fetcher() {
    let extractor = CompanyNameExtractor::new("https://acme.co.jp/");
    let html = r#"<html><body><a href="/company/">会社概要</a></body></html>"#;
    let result = extractor.extract(html, None).await;

    // Only the domain fallback remains.
    let best = result.selected.unwrap();
    assert_eq!(best.source, Source::DomainFallback);
    assert_eq!(best.value, "Acme");
}

#[tokio::test]
async fn profile_fetch_failure_degrades_to_remaining_sources() {
    // Fetcher present but the profile page 404s: the detector contributes
    // nothing and lower-priority sources still answer.
    let fetcher = MockFetcher::new();
    let extractor =
        CompanyNameExtractor::new("https://acme.co.jp/").with_fetcher(Arc::new(fetcher));

    let html = r#"<html><body>
        <a href="/company/">会社概要</a>
        <h1>株式会社アクメ</h1>
        </body></html>"#;
    let result = extractor.extract(html, None).await;

    let best = result.selected.unwrap();
    assert_eq!(best.source, Source::TextNer);
    assert_eq!(best.value, "株式会社アクメ");
}

#[tokio::test]
async fn metadata_beats_text_but_loses_to_profile_page() {
    let fetcher = MockFetcher::new().with_page(
        "https://acme.co.jp/about/",
        r#"<html><body><table><tr><th>商号</th><td>株式会社アクメ本社</td></tr></table></body></html>"#,
    );
    let extractor =
        CompanyNameExtractor::new("https://acme.co.jp/").with_fetcher(Arc::new(fetcher));

    let html = r#"<html><head>
        <meta property="og:site_name" content="アクメ採用サイト">
        </head><body><a href="/about/">会社情報</a></body></html>"#;
    let result = extractor.extract(html, None).await;

    // metadata 0.9 outranks company_profile_page 0.85
    let best = result.selected.unwrap();
    assert_eq!(best.source, Source::Metadata);
    assert_eq!(best.value, "アクメ採用サイト");

    let profile = result
        .candidates
        .iter()
        .find(|c| c.source == Source::CompanyProfilePage)
        .expect("profile candidate should be in the audit list");
    assert_eq!(profile.value, "株式会社アクメ本社");
}
