// src/extract/company_name.rs
//
// Company name extraction for (mostly Japanese) corporate sites. Six
// detectors run in priority order; each carries a fixed confidence and the
// highest-confidence candidate wins. A company name is always returned when
// any candidate survives, down to the domain-name fallback.

use crate::extract::dom;
use crate::extract::keywords::{
    CLEAN_SUFFIXES, COMPANY_INFO_KEYWORDS, COMPANY_NAME_FIELDS, COPYRIGHT_RE, GENERIC_NAMES,
    JUNK_NAME_KEYWORDS, LEGAL_ENTITIES, LEGAL_ENTITY_RE, PRODUCT_KEYWORDS,
};
use crate::extract::{Candidate, ExtractionResult, Source};
use crate::fetcher::PageFetcher;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::Arc;
use tracing::{debug, info, warn};
use unicode_normalization::UnicodeNormalization;
use url::Url;

static TLD_SUFFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.(co\.jp|com|jp|net|org|co|biz)$").unwrap());

/// Similarity cutoff for matching a caller-supplied reference name.
const REFERENCE_SIMILARITY_CUTOFF: f64 = 0.7;

pub struct CompanyNameExtractor {
    base_url: String,
    fetcher: Option<Arc<dyn PageFetcher>>,
}

impl CompanyNameExtractor {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            fetcher: None,
        }
    }

    pub fn with_fetcher(mut self, fetcher: Arc<dyn PageFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub async fn extract(&self, html: &str, final_url: Option<&str>) -> ExtractionResult {
        let url = final_url.unwrap_or(&self.base_url);
        let doc = Html::parse_document(html);
        let mut candidates = Vec::new();

        if let Some(candidate) = self.from_header_image_alt(&doc) {
            debug!("Candidate from header image alt: {}", candidate.value);
            candidates.push(candidate);
        }
        if let Some(candidate) = self.from_metadata(&doc) {
            debug!("Candidate from metadata: {}", candidate.value);
            candidates.push(candidate);
        }
        if let Some(candidate) = self.from_header_footer(&doc) {
            debug!("Candidate from header/footer: {}", candidate.value);
            candidates.push(candidate);
        }
        if let Some(candidate) = self.from_profile_page(&doc, url).await {
            debug!("Candidate from company profile page: {}", candidate.value);
            candidates.push(candidate);
        }
        if let Some(candidate) = self.from_text(&doc) {
            debug!("Candidate from main text: {}", candidate.value);
            candidates.push(candidate);
        }
        if let Some(candidate) = self.domain_fallback(url) {
            debug!("Candidate from domain fallback: {}", candidate.value);
            candidates.push(candidate);
        }

        let result = ExtractionResult::select(candidates, |_| true);
        if let Some(best) = &result.selected {
            info!(
                "Extracted company name: {} (source: {:?}, confidence: {:.2})",
                best.value, best.source, best.confidence
            );
        }
        result
    }

    /// Reference-aware variant: ranks the full candidate pool by the point
    /// rubric and, when a reference name is supplied, prefers the fuzzy
    /// closest pool entry over the rubric pick.
    pub async fn extract_with_reference(
        &self,
        html: &str,
        final_url: Option<&str>,
        reference: Option<&str>,
    ) -> ExtractionResult {
        let Some(reference) = reference else {
            return self.extract(html, final_url).await;
        };

        let doc = Html::parse_document(html);
        let pool = self.gather_pool(&doc);
        if pool.is_empty() {
            return self.extract(html, final_url).await;
        }

        let ranked: Vec<Candidate> = pool
            .iter()
            .map(|(value, source)| {
                let points = rubric_points(value);
                Candidate::new(
                    value.clone(),
                    *source,
                    f64::from(points.clamp(0, 100)) / 100.0,
                )
            })
            .collect();

        let reference_norm = normalize_for_similarity(reference);
        let mut best_match: Option<(f64, &Candidate)> = None;
        for candidate in &ranked {
            let similarity =
                strsim::normalized_levenshtein(&reference_norm, &normalize_for_similarity(&candidate.value));
            match best_match {
                Some((best, _)) if best >= similarity => {}
                _ => best_match = Some((similarity, candidate)),
            }
        }

        let fuzzy_pick = best_match
            .filter(|(similarity, _)| *similarity >= REFERENCE_SIMILARITY_CUTOFF)
            .map(|(_, candidate)| candidate.clone());

        let mut result = ExtractionResult::select(ranked, |_| true);
        if let Some(pick) = fuzzy_pick {
            info!("Matched reference company name: {}", pick.value);
            result.selected = Some(pick);
        }
        result
    }

    fn from_header_image_alt(&self, doc: &Html) -> Option<Candidate> {
        let header = dom::header_element(doc)?;
        let images = Selector::parse("img").unwrap();

        for img in header.select(&images) {
            let alt = img.value().attr("alt").unwrap_or("").trim();
            if alt.is_empty() {
                continue;
            }

            if let Some(found) = LEGAL_ENTITY_RE.find(alt) {
                let cleaned = clean_name(found.as_str());
                if is_valid_name(&cleaned) {
                    return Some(Candidate::new(cleaned, Source::HeaderImageAlt, 0.95));
                }
            }

            // The alt text itself may be the company name.
            let cleaned = clean_name(alt);
            if is_valid_name(&cleaned)
                && (LEGAL_ENTITIES.iter().any(|e| cleaned.contains(e)) || has_cjk(&cleaned))
            {
                return Some(Candidate::new(cleaned, Source::HeaderImageAlt, 0.95));
            }
        }
        None
    }

    fn from_metadata(&self, doc: &Html) -> Option<Candidate> {
        let metas = [
            r#"meta[property="og:site_name"]"#,
            r#"meta[name="application-name"]"#,
            r#"meta[itemprop="name"]"#,
        ];
        for raw in metas {
            let selector = Selector::parse(raw).unwrap();
            if let Some(meta) = doc.select(&selector).next() {
                let content = meta.value().attr("content").unwrap_or("").trim();
                if !content.is_empty() {
                    let cleaned = clean_name(content);
                    if !cleaned.is_empty() {
                        return Some(Candidate::new(cleaned, Source::Metadata, 0.9));
                    }
                }
            }
        }

        let title = Selector::parse("title").unwrap();
        if let Some(element) = doc.select(&title).next() {
            let cleaned = clean_title(&dom::element_text(element));
            if !cleaned.is_empty() {
                return Some(Candidate::new(cleaned, Source::Metadata, 0.9));
            }
        }
        None
    }

    fn from_header_footer(&self, doc: &Html) -> Option<Candidate> {
        let sections = [dom::header_element(doc), dom::footer_element(doc)];

        for section in sections.into_iter().flatten() {
            let text = dom::element_text(section);

            for found in LEGAL_ENTITY_RE.find_iter(&text) {
                let cleaned = clean_name(found.as_str());
                if is_valid_name(&cleaned) {
                    return Some(Candidate::new(cleaned, Source::HeaderFooter, 0.8));
                }
            }

            // Copyright line: © 株式会社〇〇
            for found in COPYRIGHT_RE.find_iter(&text) {
                let stripped = found.as_str().replace(['©', 'Ⓒ'], "");
                let cleaned = clean_name(&stripped);
                if is_valid_name(&cleaned) {
                    return Some(Candidate::new(cleaned, Source::HeaderFooter, 0.8));
                }
            }
        }
        None
    }

    /// Follows a 会社概要/About link and reads the official name out of the
    /// profile page's label/value table, falling back to a legal-entity scan.
    async fn from_profile_page(&self, doc: &Html, url: &str) -> Option<Candidate> {
        let fetcher = self.fetcher.as_ref()?;

        let anchors = Selector::parse("a[href]").unwrap();
        let mut profile_url = None;
        for link in doc.select(&anchors) {
            let text = dom::element_text(link);
            let text = text.trim();
            if COMPANY_INFO_KEYWORDS.iter().any(|k| text.contains(k)) {
                if let Some(href) = link.value().attr("href") {
                    if let Some(absolute) = dom::resolve_url(url, href) {
                        debug!("Found company info page link: {}", absolute);
                        profile_url = Some(absolute);
                        break;
                    }
                }
            }
        }
        let profile_url = profile_url?;

        let fetched = fetcher.fetch_page(&profile_url).await;
        if !fetched.is_ok() {
            warn!("Failed to fetch company profile page: {}", profile_url);
            return None;
        }
        let body = fetched.body.unwrap_or_default();
        let profile = Html::parse_document(&body);

        // <th>会社名</th><td>株式会社〇〇</td>
        let headers = Selector::parse("th").unwrap();
        let cells = Selector::parse("td").unwrap();
        for th in profile.select(&headers) {
            let label = dom::element_text(th);
            if !COMPANY_NAME_FIELDS.iter().any(|f| label.contains(f)) {
                continue;
            }

            let mut value = None;
            for sibling in th.next_siblings() {
                if let Some(element) = ElementRef::wrap(sibling) {
                    if element.value().name() == "td" {
                        value = Some(dom::element_text(element));
                        break;
                    }
                }
            }
            if value.is_none() {
                if let Some(row) = th
                    .ancestors()
                    .filter_map(ElementRef::wrap)
                    .find(|e| e.value().name() == "tr")
                {
                    value = row.select(&cells).next().map(dom::element_text);
                }
            }

            if let Some(text) = value {
                let cleaned = clean_name(&text);
                if is_valid_name(&cleaned) {
                    return Some(Candidate::new(cleaned, Source::CompanyProfilePage, 0.85));
                }
            }
        }

        let page_text = dom::element_text(profile.root_element());
        for found in LEGAL_ENTITY_RE.find_iter(&page_text) {
            let cleaned = clean_name(found.as_str());
            if is_valid_name(&cleaned) {
                return Some(Candidate::new(cleaned, Source::CompanyProfilePage, 0.85));
            }
        }
        None
    }

    fn from_text(&self, doc: &Html) -> Option<Candidate> {
        let headings = Selector::parse("h1, h2, h3").unwrap();
        for heading in doc.select(&headings) {
            let text = dom::element_text(heading);
            for found in LEGAL_ENTITY_RE.find_iter(&text) {
                let cleaned = clean_name(found.as_str());
                if is_valid_name(&cleaned) {
                    return Some(Candidate::new(cleaned, Source::TextNer, 0.6));
                }
            }
        }

        let body = Selector::parse("body").unwrap();
        if let Some(element) = doc.select(&body).next() {
            let text = dom::element_text(element);
            for found in LEGAL_ENTITY_RE.find_iter(&text) {
                let cleaned = clean_name(found.as_str());
                if is_valid_name(&cleaned) {
                    return Some(Candidate::new(cleaned, Source::TextNer, 0.6));
                }
            }
        }
        None
    }

    fn domain_fallback(&self, url: &str) -> Option<Candidate> {
        let parsed = Url::parse(url).ok()?;
        let host = parsed.host_str()?;
        let host = host.strip_prefix("www.").unwrap_or(host);
        let trimmed = TLD_SUFFIX_RE.replace(host, "").into_owned();

        let label = trimmed.split('.').next_back().unwrap_or(&trimmed);
        let spaced = label.replace(['-', '_'], " ");
        let name = title_case(&spaced);

        if name.chars().count() > 1 {
            Some(Candidate::new(name, Source::DomainFallback, 0.3))
        } else {
            None
        }
    }

    /// Every name-shaped string on the page, tagged with where it came from.
    /// Deduped by value, document order preserved.
    fn gather_pool(&self, doc: &Html) -> Vec<(String, Source)> {
        let mut pool: Vec<(String, Source)> = Vec::new();
        let mut push = |value: String, source: Source, pool: &mut Vec<(String, Source)>| {
            let trimmed = value.trim().to_string();
            let len = trimmed.chars().count();
            if len > 2 && len < 150 && !pool.iter().any(|(v, _)| *v == trimmed) {
                pool.push((trimmed, source));
            }
        };

        if let Some(element) = doc.select(&Selector::parse("title").unwrap()).next() {
            push(dom::element_text(element), Source::Metadata, &mut pool);
        }
        for raw in [
            r#"meta[property="og:title"]"#,
            r#"meta[name="author"]"#,
            r#"meta[name="publisher"]"#,
        ] {
            if let Some(meta) = doc.select(&Selector::parse(raw).unwrap()).next() {
                if let Some(content) = meta.value().attr("content") {
                    push(content.to_string(), Source::Metadata, &mut pool);
                }
            }
        }
        if let Some(h1) = doc.select(&Selector::parse("h1").unwrap()).next() {
            push(dom::element_text(h1), Source::TextNer, &mut pool);
        }
        for raw in [".site-title", ".company-name", ".brand", ".logo-text"] {
            if let Some(element) = doc.select(&Selector::parse(raw).unwrap()).next() {
                push(dom::element_text(element), Source::HeaderFooter, &mut pool);
            }
        }
        for name in jsonld_organization_names(doc) {
            push(name, Source::JsonldSchema, &mut pool);
        }
        if let Some(header) = dom::header_element(doc) {
            for img in header.select(&Selector::parse("img").unwrap()) {
                if let Some(alt) = img.value().attr("alt") {
                    push(alt.to_string(), Source::HeaderImageAlt, &mut pool);
                }
            }
        }
        let text = dom::element_text(doc.root_element());
        if let Some(found) = LEGAL_ENTITY_RE.find(&text) {
            push(found.as_str().to_string(), Source::TextNer, &mut pool);
        }

        pool
    }
}

/// Point rubric for pool ranking.
fn rubric_points(value: &str) -> i32 {
    let mut points = 0;
    let len = value.chars().count();
    if len <= 30 {
        points += 10;
    } else if len <= 50 {
        points += 5;
    }
    if LEGAL_ENTITIES.iter().any(|e| value.contains(e)) {
        points += 20;
    }
    if value.chars().any(is_kana) {
        points += 8;
    }
    let separators = value
        .chars()
        .filter(|c| "|｜-—–/\\・".contains(*c))
        .count();
    if separators > 2 {
        points -= 10;
    }
    for junk in JUNK_NAME_KEYWORDS {
        if value.contains(junk) {
            points -= 5;
        }
    }
    points
}

fn jsonld_organization_names(doc: &Html) -> Vec<String> {
    let selector = Selector::parse(r#"script[type="application/ld+json"]"#).unwrap();
    let mut names = Vec::new();

    for script in doc.select(&selector) {
        let text: String = script.text().collect();
        let Ok(value) = serde_json::from_str::<serde_json::Value>(&text) else {
            continue;
        };
        collect_org_names(&value, &mut names);
    }
    names
}

fn collect_org_names(value: &serde_json::Value, out: &mut Vec<String>) {
    match value {
        serde_json::Value::Object(map) => {
            let is_org = map
                .get("@type")
                .and_then(|t| t.as_str())
                .map(|t| {
                    let t = t.to_lowercase();
                    t == "organization" || t == "localbusiness"
                })
                .unwrap_or(false);
            if is_org {
                if let Some(name) = map.get("name").and_then(|n| n.as_str()) {
                    out.push(name.to_string());
                }
            }
            for (_, nested) in map {
                collect_org_names(nested, out);
            }
        }
        serde_json::Value::Array(items) => {
            for item in items {
                collect_org_names(item, out);
            }
        }
        _ => {}
    }
}

/// NFKC, known title-suffix stripping, whitespace collapse, edge trim.
pub fn clean_name(name: &str) -> String {
    let mut cleaned: String = name.nfkc().collect();
    for suffix in CLEAN_SUFFIXES.iter() {
        cleaned = suffix.replace_all(&cleaned, "").into_owned();
    }
    let cleaned = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    cleaned
        .trim_matches(|c: char| !(c.is_alphanumeric() || c == '_'))
        .to_string()
}

/// Titles usually read "Company | Service | ..." — the first segment is the
/// name. Splits on the first separator, then cleans.
pub fn clean_title(title: &str) -> String {
    let separators = ['|', '｜', '—', '–', '-', '/', '\\', '「', '」'];
    let first = title
        .find(separators)
        .map(|idx| &title[..idx])
        .unwrap_or(title);
    clean_name(first)
}

pub fn is_valid_name(name: &str) -> bool {
    if name.chars().count() < 2 {
        return false;
    }

    let has_legal = LEGAL_ENTITIES.iter().any(|e| name.contains(e));
    if !(has_cjk(name) || has_legal) {
        let lower = name.to_lowercase();
        if GENERIC_NAMES.contains(&lower.as_str()) {
            return false;
        }
    }

    let lower = name.to_lowercase();
    if PRODUCT_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return false;
    }

    true
}

fn has_cjk(name: &str) -> bool {
    name.chars().any(|c| {
        ('\u{4e00}'..='\u{9fff}').contains(&c)
            || ('\u{3040}'..='\u{309f}').contains(&c)
            || ('\u{30a0}'..='\u{30ff}').contains(&c)
    })
}

fn is_kana(c: char) -> bool {
    ('\u{3040}'..='\u{309f}').contains(&c) || ('\u{30a0}'..='\u{30ff}').contains(&c)
}

/// Strips legal suffixes and symbols so similar names compare equal.
fn normalize_for_similarity(name: &str) -> String {
    let mut normalized: String = name.nfkc().collect::<String>().to_lowercase();
    for entity in LEGAL_ENTITIES {
        normalized = normalized.replace(entity, "");
    }
    normalized
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect()
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
