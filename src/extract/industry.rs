// src/extract/industry.rs
//
// Industry classification against a fixed bilingual taxonomy. Each source
// yields at most one candidate; the highest-confidence one wins and there is
// no fallback — a page with no signal classifies as null.

use crate::extract::dom;
use crate::extract::keywords::Taxonomy;
use crate::extract::{Candidate, ExtractionResult, Source};
use scraper::{Html, Selector};
use tracing::{debug, info};
use url::Url;

pub struct IndustryClassifier {
    base_url: String,
    taxonomy: Taxonomy,
}

impl IndustryClassifier {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            taxonomy: Taxonomy::default(),
        }
    }

    pub fn with_taxonomy(mut self, taxonomy: Taxonomy) -> Self {
        self.taxonomy = taxonomy;
        self
    }

    pub fn classify(&self, html: &str, final_url: Option<&str>) -> ExtractionResult {
        let url = final_url.unwrap_or(&self.base_url);
        let doc = Html::parse_document(html);
        let mut candidates = Vec::new();

        if let Some(label) = self.domain_hint(url) {
            candidates.push(Candidate::new(label, Source::DomainHint, 0.4));
        }
        if let Some(candidate) = self.from_jsonld(&doc) {
            candidates.push(candidate);
        }
        if let Some(candidate) = self.from_metadata(&doc) {
            candidates.push(candidate);
        }
        if let Some(candidate) = self.from_text(&doc) {
            candidates.push(candidate);
        }

        let result = ExtractionResult::select(candidates, |_| true);
        if let Some(best) = &result.selected {
            info!(
                "Extracted industry: {} (source: {:?}, confidence: {:.2})",
                best.value, best.source, best.confidence
            );
        }
        result
    }

    /// Counts keyword hits per industry over lowercased text. The strictly
    /// highest count wins; equal counts keep the first-declared industry.
    fn match_keywords(&self, text_lower: &str) -> Option<&'static str> {
        let mut best: Option<&'static str> = None;
        let mut best_count = 0usize;

        for entry in &self.taxonomy.entries {
            let mut count = 0usize;
            for keyword in entry.en {
                if text_lower.contains(&keyword.to_lowercase()) {
                    count += 1;
                }
            }
            // Japanese keywords match exactly (lowercasing leaves them intact).
            for keyword in entry.ja {
                if text_lower.contains(keyword) {
                    count += 1;
                }
            }

            if count > best_count {
                best_count = count;
                best = Some(entry.label);
            }
        }

        best
    }

    /// Weak signal: the bare domain label equals a taxonomy keyword.
    fn domain_hint(&self, url: &str) -> Option<&'static str> {
        let parsed = Url::parse(url).ok()?;
        let host = parsed.host_str()?.to_lowercase();
        let host = host.strip_prefix("www.").unwrap_or(&host);
        let label = host.split('.').next()?;

        for entry in &self.taxonomy.entries {
            for keyword in entry.en.iter().chain(entry.ja.iter()) {
                if keyword.to_lowercase() == label {
                    return Some(entry.label);
                }
            }
        }
        None
    }

    fn from_jsonld(&self, doc: &Html) -> Option<Candidate> {
        let selector = Selector::parse(r#"script[type="application/ld+json"]"#).unwrap();

        for script in doc.select(&selector) {
            let text: String = script.text().collect();
            let Ok(value) = serde_json::from_str::<serde_json::Value>(&text) else {
                continue;
            };
            if let Some(label) = self.industry_from_json(&value) {
                debug!("Found industry in JSON-LD: {}", label);
                return Some(Candidate::new(label, Source::Jsonld, 0.9));
            }
        }
        None
    }

    fn industry_from_json(&self, value: &serde_json::Value) -> Option<&'static str> {
        match value {
            serde_json::Value::Object(map) => {
                for field in ["industry", "sector", "businessType", "description"] {
                    if let Some(text) = map.get(field).and_then(|v| v.as_str()) {
                        if let Some(label) = self.match_keywords(&text.to_lowercase()) {
                            return Some(label);
                        }
                    }
                }

                if let Some(schema_type) = map.get("@type").and_then(|v| v.as_str()) {
                    let schema_type = schema_type.to_lowercase();
                    if let Some((_, mapped)) = self
                        .taxonomy
                        .schema_types
                        .iter()
                        .find(|(known, _)| *known == schema_type)
                    {
                        // Generic types map to None and are skipped.
                        if let Some(label) = mapped {
                            return Some(label);
                        }
                    }
                }

                for (_, nested) in map {
                    if nested.is_object() || nested.is_array() {
                        if let Some(label) = self.industry_from_json(nested) {
                            return Some(label);
                        }
                    }
                }
                None
            }
            serde_json::Value::Array(items) => {
                items.iter().find_map(|item| self.industry_from_json(item))
            }
            _ => None,
        }
    }

    fn from_metadata(&self, doc: &Html) -> Option<Candidate> {
        let sources: [(&str, f64); 5] = [
            (r#"meta[name="description"]"#, 0.8),
            (r#"meta[property="og:description"]"#, 0.8),
            (r#"meta[name="keywords"]"#, 0.75),
            (r#"meta[name="industry"]"#, 0.85),
            (r#"meta[name="business"]"#, 0.8),
        ];

        for (raw, confidence) in sources {
            let selector = Selector::parse(raw).unwrap();
            if let Some(meta) = doc.select(&selector).next() {
                let content = meta.value().attr("content").unwrap_or("").to_lowercase();
                if content.is_empty() {
                    continue;
                }
                if let Some(label) = self.match_keywords(&content) {
                    debug!("Found industry in {}: {}", raw, label);
                    return Some(Candidate::new(label, Source::Metadata, confidence));
                }
            }
        }
        None
    }

    /// Key page sections combined into one text, matched once against the
    /// full taxonomy. Sections are assembled in descending weight order:
    /// title, leading h1s, meta description, about/company blocks.
    fn from_text(&self, doc: &Html) -> Option<Candidate> {
        let mut sections: Vec<String> = Vec::new();

        if let Some(title) = doc.select(&Selector::parse("title").unwrap()).next() {
            sections.push(dom::element_text(title));
        }
        for h1 in doc.select(&Selector::parse("h1").unwrap()).take(3) {
            sections.push(dom::element_text(h1));
        }
        if let Some(meta) = doc
            .select(&Selector::parse(r#"meta[name="description"]"#).unwrap())
            .next()
        {
            if let Some(content) = meta.value().attr("content") {
                sections.push(content.to_string());
            }
        }

        let blocks = Selector::parse("section, div").unwrap();
        for element in doc.select(&blocks) {
            let value = element.value();
            let mut markers = value.attr("class").unwrap_or("").to_lowercase();
            markers.push(' ');
            markers.push_str(&value.attr("id").unwrap_or("").to_lowercase());

            if ["about", "company", "intro", "description"]
                .iter()
                .any(|m| markers.contains(m))
            {
                let text: String = dom::element_text(element).chars().take(500).collect();
                sections.push(text);
            }
        }

        let combined = sections.join(" ").to_lowercase();
        let label = self.match_keywords(&combined)?;
        debug!("Found industry in page text: {}", label);
        Some(Candidate::new(label, Source::Text, 0.7))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::keywords::IndustryEntry;

    #[test]
    fn jsonld_description_maps_to_technology() {
        let classifier = IndustryClassifier::new("https://beta.example/");
        let html = r#"<html><head>
            <script type="application/ld+json">
            {"@type":"Organization","name":"Beta Inc","description":"leading software company"}
            </script>
            </head><body></body></html>"#;
        let result = classifier.classify(html, None);

        let best = result.selected.unwrap();
        assert_eq!(best.value, "technology");
        assert_eq!(best.source, Source::Jsonld);
        assert!((best.confidence - 0.9).abs() < f64::EPSILON);
    }

    #[test]
    fn generic_schema_types_are_excluded() {
        let classifier = IndustryClassifier::new("https://beta.example/");
        let html = r#"<html><head>
            <script type="application/ld+json">{"@type":"Organization","name":"Beta Inc"}</script>
            </head><body></body></html>"#;
        let result = classifier.classify(html, None);

        assert!(result.selected.is_none());
        assert!(result.candidates.is_empty());
    }

    #[test]
    fn schema_type_table_maps_restaurant() {
        let classifier = IndustryClassifier::new("https://beta.example/");
        let html = r#"<html><head>
            <script type="application/ld+json">{"@type":"Restaurant","name":"Beta Diner"}</script>
            </head><body></body></html>"#;
        let result = classifier.classify(html, None);

        assert_eq!(result.selected.unwrap().value, "food_beverage");
    }

    #[test]
    fn tie_counts_resolve_to_first_declared_industry() {
        let taxonomy = Taxonomy {
            entries: vec![
                IndustryEntry {
                    label: "finance",
                    en: &["banking"],
                    ja: &[],
                },
                IndustryEntry {
                    label: "retail",
                    en: &["shopping"],
                    ja: &[],
                },
            ],
            schema_types: Vec::new(),
        };
        let classifier = IndustryClassifier::new("https://beta.example/").with_taxonomy(taxonomy);

        // One hit each: the first-declared industry must win regardless of
        // where the keywords sit in the text.
        let html = r#"<html><head>
            <meta name="description" content="shopping and banking services">
            </head><body></body></html>"#;
        let result = classifier.classify(html, None);
        assert_eq!(result.selected.unwrap().value, "finance");

        let html_reversed = r#"<html><head>
            <meta name="description" content="banking and shopping services">
            </head><body></body></html>"#;
        let result = classifier.classify(html_reversed, None);
        assert_eq!(result.selected.unwrap().value, "finance");
    }

    #[test]
    fn weighted_text_scan_reads_about_section() {
        let classifier = IndustryClassifier::new("https://beta.example/");
        let html = r#"<html><head><title>ベータ</title></head><body>
            <div class="about-us">私たちは物流と配送のプロフェッショナルです。倉庫管理も行います。</div>
            </body></html>"#;
        let result = classifier.classify(html, None);

        let best = result.selected.unwrap();
        assert_eq!(best.value, "logistics");
        assert_eq!(best.source, Source::Text);
        assert!((best.confidence - 0.7).abs() < f64::EPSILON);
    }

    #[test]
    fn no_signal_classifies_as_null() {
        let classifier = IndustryClassifier::new("https://beta.example/");
        let result = classifier.classify("<html><body><p>hello</p></body></html>", None);
        assert!(result.selected.is_none());
    }
}
