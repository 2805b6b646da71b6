// src/extract/dom.rs
//
// Helpers over the parsed document: named-section lookup, the bounded
// ancestor walk used by context scoring, and URL resolution.

use scraper::{ElementRef, Html, Selector};
use url::Url;

/// First element matching any of the given selectors, in selector order.
pub fn select_first<'a>(doc: &'a Html, selectors: &[&str]) -> Option<ElementRef<'a>> {
    for raw in selectors {
        if let Ok(selector) = Selector::parse(raw) {
            if let Some(element) = doc.select(&selector).next() {
                return Some(element);
            }
        }
    }
    None
}

pub fn header_element(doc: &Html) -> Option<ElementRef<'_>> {
    select_first(doc, &["header", "#header", "div[class*=\"header\"]"])
}

pub fn footer_element(doc: &Html) -> Option<ElementRef<'_>> {
    select_first(doc, &["footer", "#footer", "div[class*=\"footer\"]"])
}

pub fn element_text(element: ElementRef) -> String {
    element.text().collect::<Vec<_>>().join(" ")
}

/// Deepest element whose text contains `needle`, case-insensitive. Ties on
/// text length go to the later element in document order, which is the
/// deeper node of a wrapper chain.
pub fn element_containing<'a>(doc: &'a Html, needle: &str) -> Option<ElementRef<'a>> {
    let needle = needle.to_lowercase();
    let all = Selector::parse("*").unwrap();

    let mut best: Option<(usize, ElementRef)> = None;
    for element in doc.select(&all) {
        let text = element_text(element).to_lowercase();
        if text.contains(&needle) {
            match best {
                Some((best_len, _)) if best_len < text.len() => {}
                _ => best = Some((text.len(), element)),
            }
        }
    }
    best.map(|(_, element)| element)
}

/// Walks the ancestor chain up to the document root, adding `bonus` for each
/// ancestor whose tag/id/class matches a positive marker and `penalty` for
/// each matching a negative marker. Positive markers take precedence when an
/// ancestor matches both lists.
pub fn ancestor_context_score(
    element: ElementRef,
    positive: &[&str],
    negative: &[&str],
    bonus: i32,
    penalty: i32,
) -> i32 {
    let mut score = 0;

    for node in element.ancestors() {
        let Some(ancestor) = ElementRef::wrap(node) else {
            continue;
        };
        let value = ancestor.value();

        let mut haystack = value.name().to_lowercase();
        if let Some(id) = value.attr("id") {
            haystack.push(' ');
            haystack.push_str(&id.to_lowercase());
        }
        if let Some(class) = value.attr("class") {
            haystack.push(' ');
            haystack.push_str(&class.to_lowercase());
        }

        if positive.iter().any(|marker| haystack.contains(marker)) {
            score += bonus;
        } else if negative.iter().any(|marker| haystack.contains(marker)) {
            score -= penalty;
        }
    }

    score
}

/// Whether `needle` appears in the text of any section named by tag, id, or
/// class substring (e.g. "footer" matches `<footer>`, `#footer`, `.footer`).
pub fn in_named_section(doc: &Html, needle: &str, names: &[&str]) -> bool {
    let needle = needle.to_lowercase();

    for name in names {
        let selectors = [
            name.to_string(),
            format!("#{}", name),
            format!("[class*=\"{}\"]", name),
        ];
        for raw in &selectors {
            if let Ok(selector) = Selector::parse(raw) {
                for element in doc.select(&selector) {
                    if element_text(element).to_lowercase().contains(&needle) {
                        return true;
                    }
                }
            }
        }
    }
    false
}

/// Resolve `href` against `base`, absolute or relative.
pub fn resolve_url(base: &str, href: &str) -> Option<String> {
    match Url::parse(href) {
        Ok(url) => Some(url.to_string()),
        Err(_) => Url::parse(base).ok()?.join(href).ok().map(|u| u.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_footer_by_class() {
        let doc = Html::parse_document(
            r#"<html><body><div class="site-footer">info@acme.co.jp</div></body></html>"#,
        );
        assert!(footer_element(&doc).is_some());
        assert!(in_named_section(&doc, "info@acme.co.jp", &["footer"]));
    }

    #[test]
    fn ancestor_walk_scores_contact_section() {
        let doc = Html::parse_document(
            r#"<html><body><div id="contact"><p>mail: info@acme.co.jp</p></div></body></html>"#,
        );
        let element = element_containing(&doc, "info@acme.co.jp").unwrap();
        let score = ancestor_context_score(element, &["contact"], &["sidebar"], 25, 15);
        assert_eq!(score, 25);
    }

    #[test]
    fn ancestor_walk_penalizes_sidebar() {
        let doc = Html::parse_document(
            r#"<html><body><aside class="sidebar"><p>info@acme.co.jp</p></aside></body></html>"#,
        );
        let element = element_containing(&doc, "info@acme.co.jp").unwrap();
        let score = ancestor_context_score(element, &["contact"], &["sidebar"], 25, 15);
        assert_eq!(score, -15);
    }

    #[test]
    fn resolves_relative_links() {
        assert_eq!(
            resolve_url("https://acme.co.jp/", "/contact/").as_deref(),
            Some("https://acme.co.jp/contact/")
        );
        assert_eq!(
            resolve_url("https://acme.co.jp/", "https://other.jp/x").as_deref(),
            Some("https://other.jp/x")
        );
    }
}
