// src/extract/contact_form.rs
//
// Contact-form URL detection: same-domain link discovery on the root page,
// keyword/path filtering, a fetch-and-score pass per candidate, and either
// fuzzy path matching against a reference URL or highest-score selection.
// A human-readable remarks string is part of the output contract.

use crate::extract::dom;
use crate::extract::keywords::{
    CONTACT_KEYWORDS_EN, CONTACT_KEYWORDS_JA, CONTACT_URL_RE, EMAIL_FIELD_PATTERNS,
};
use crate::extract::{Candidate, Source};
use crate::fetcher::PageFetcher;
use crate::robots::{RobotsChecker, RobotsPolicy};
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

/// Sum of all score components, used to map raw scores into [0,1] for the
/// candidate audit list. Selection still runs on the raw score.
const MAX_FORM_SCORE: f64 = 2.4;

/// Similarity cutoff for fuzzy path matching against a reference URL.
const PATH_SIMILARITY_CUTOFF: f64 = 0.7;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormDetection {
    pub form_url: Option<String>,
    pub candidates: Vec<Candidate>,
    pub remarks: String,
}

#[derive(Debug, Clone)]
struct FormCandidate {
    url: String,
    link_text: Option<String>,
    keywords: Vec<String>,
    score: f64,
    has_form: bool,
    has_email_fields: bool,
    in_header_footer: bool,
}

impl FormCandidate {
    fn new(url: String, link_text: Option<String>, keywords: Vec<String>) -> Self {
        Self {
            url,
            link_text,
            keywords,
            score: 0.0,
            has_form: false,
            has_email_fields: false,
            in_header_footer: false,
        }
    }

    fn source(&self) -> Source {
        if self.keywords.iter().any(|k| k != "url_pattern") {
            Source::LinkKeyword
        } else {
            Source::UrlPattern
        }
    }
}

#[derive(Default)]
pub struct ContactFormDetector {
    fetcher: Option<Arc<dyn PageFetcher>>,
    robots: Option<Arc<dyn RobotsChecker>>,
    policy: RobotsPolicy,
}

impl ContactFormDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fetcher(mut self, fetcher: Arc<dyn PageFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub fn with_robots(mut self, robots: Arc<dyn RobotsChecker>, policy: RobotsPolicy) -> Self {
        self.robots = Some(robots);
        self.policy = policy;
        self
    }

    pub async fn detect(&self, root_url: &str, reference_url: Option<&str>) -> FormDetection {
        let Some(fetcher) = &self.fetcher else {
            return FormDetection {
                form_url: None,
                candidates: Vec::new(),
                remarks: "Fetcher not available".to_string(),
            };
        };

        let fetched = fetcher.fetch_page(root_url).await;
        if !fetched.is_ok() {
            let why = fetched
                .error_message
                .clone()
                .unwrap_or_else(|| format!("HTTP {}", fetched.http_status));
            return FormDetection {
                form_url: None,
                candidates: Vec::new(),
                remarks: format!("Failed to fetch root page: {}", why),
            };
        }

        let body = fetched.body.unwrap_or_default();
        let root_final = fetched.final_url.unwrap_or_else(|| root_url.to_string());
        let root_doc = Html::parse_document(&body);

        let prospects = identify_candidates(&root_doc, &root_final);
        info!(
            "Identified {} contact page candidates on {}",
            prospects.len(),
            root_final
        );

        let mut scored: Vec<FormCandidate> = Vec::new();
        for prospect in prospects {
            if let Some(candidate) = self
                .score_candidate(prospect, &root_doc, &root_final, fetcher.as_ref())
                .await
            {
                debug!(
                    "Candidate {}: score={:.2}, has_form={}",
                    candidate.url, candidate.score, candidate.has_form
                );
                scored.push(candidate);
            }
        }

        // Stable sort keeps document order on score ties.
        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let candidates: Vec<Candidate> = scored
            .iter()
            .map(|c| {
                Candidate::new(
                    c.url.clone(),
                    c.source(),
                    (c.score / MAX_FORM_SCORE).clamp(0.0, 1.0),
                )
            })
            .collect();

        // A reference URL takes precedence via fuzzy path matching.
        if let Some(reference) = reference_url {
            let urls: Vec<&str> = scored.iter().map(|c| c.url.as_str()).collect();
            let matched = fuzzy_path_match(reference, &urls);
            if let Some(best) = matched.and_then(|m| scored.iter().find(|c| c.url == m)) {
                let remarks =
                    format!("{} (fuzzy/path match)", generate_remarks(best, scored.len()));
                info!("Selected contact form URL by reference: {}", best.url);
                return FormDetection {
                    form_url: Some(best.url.clone()),
                    candidates,
                    remarks,
                };
            }
        }

        match scored.first() {
            Some(best) if best.score > 0.0 => {
                info!(
                    "Selected contact form URL: {} (score: {:.2})",
                    best.url, best.score
                );
                FormDetection {
                    form_url: Some(best.url.clone()),
                    remarks: generate_remarks(best, scored.len()),
                    candidates,
                }
            }
            Some(_) => FormDetection {
                form_url: None,
                candidates,
                remarks: "No candidate scored above 0".to_string(),
            },
            None => FormDetection {
                form_url: None,
                candidates,
                remarks: "No contact form candidates found".to_string(),
            },
        }
    }

    /// Robots gate, fetch, and the additive score rubric for one candidate.
    async fn score_candidate(
        &self,
        mut candidate: FormCandidate,
        root_doc: &Html,
        root_url: &str,
        fetcher: &dyn PageFetcher,
    ) -> Option<FormCandidate> {
        if let Some(robots) = &self.robots {
            if !robots.is_allowed(&candidate.url, self.policy).await {
                debug!("robots.txt disallows: {}", candidate.url);
                return None;
            }
        }

        let fetched = fetcher.fetch_page(&candidate.url).await;
        if !fetched.is_ok() {
            debug!(
                "Failed to fetch candidate {}: {}",
                candidate.url,
                fetched
                    .error_message
                    .as_deref()
                    .unwrap_or("non-200 response")
            );
            return None;
        }
        if let Some(final_url) = fetched.final_url {
            candidate.url = final_url;
        }
        let body = fetched.body.unwrap_or_default();
        let page = Html::parse_document(&body);

        if let Some(text) = &candidate.link_text {
            if text_matches_keywords(text) {
                candidate.score += 0.6;
            }
        }

        if CONTACT_URL_RE.is_match(&candidate.url) {
            candidate.score += 0.5;
        }

        let forms = Selector::parse("form").unwrap();
        if page.select(&forms).next().is_some() {
            candidate.has_form = true;
            candidate.score += 0.8;

            if EMAIL_FIELD_PATTERNS.iter().any(|p| p.is_match(&body)) {
                candidate.has_email_fields = true;
                candidate.score += 0.2;
            }
        }

        if in_header_footer(root_doc, root_url, &candidate.url) {
            candidate.in_header_footer = true;
            candidate.score += 0.3;
        }

        Some(candidate)
    }
}

/// Same-domain links that look contact-like by URL pattern, anchor text, or
/// path keywords. Document order, deduped by URL.
fn identify_candidates(root_doc: &Html, base_url: &str) -> Vec<FormCandidate> {
    let base_host = Url::parse(base_url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string));
    let Some(base_host) = base_host else {
        return Vec::new();
    };

    let anchors = Selector::parse("a[href]").unwrap();
    let mut candidates = Vec::new();
    let mut seen: Vec<String> = Vec::new();

    for link in root_doc.select(&anchors) {
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        let Some(absolute) = dom::resolve_url(base_url, href) else {
            continue;
        };

        let Ok(parsed) = Url::parse(&absolute) else {
            continue;
        };
        if !matches!(parsed.scheme(), "http" | "https")
            || parsed.host_str() != Some(base_host.as_str())
        {
            continue;
        }
        if seen.contains(&absolute) {
            continue;
        }

        let link_text = dom::element_text(link).trim().to_string();
        let path = parsed.path().to_lowercase();

        let url_matches = CONTACT_URL_RE.is_match(&absolute);
        let text_matches = text_matches_keywords(&link_text);
        let path_matches = CONTACT_KEYWORDS_JA.iter().any(|k| path.contains(k))
            || CONTACT_KEYWORDS_EN.iter().any(|k| path.contains(k));

        if !(url_matches || text_matches || path_matches) {
            continue;
        }

        let mut keywords: Vec<String> = Vec::new();
        let lower_text = link_text.to_lowercase();
        keywords.extend(
            CONTACT_KEYWORDS_JA
                .iter()
                .filter(|k| link_text.contains(*k))
                .map(|k| k.to_string()),
        );
        keywords.extend(
            CONTACT_KEYWORDS_EN
                .iter()
                .filter(|k| lower_text.contains(*k))
                .map(|k| k.to_string()),
        );
        if url_matches {
            keywords.push("url_pattern".to_string());
        }

        seen.push(absolute.clone());
        candidates.push(FormCandidate::new(
            absolute,
            Some(link_text).filter(|t| !t.is_empty()),
            keywords,
        ));
    }

    candidates
}

fn text_matches_keywords(text: &str) -> bool {
    let lower = text.to_lowercase();
    CONTACT_KEYWORDS_JA.iter().any(|k| text.contains(k))
        || CONTACT_KEYWORDS_EN.iter().any(|k| lower.contains(k))
}

/// Whether the candidate URL is linked from the root page's header or footer.
fn in_header_footer(root_doc: &Html, root_url: &str, candidate_url: &str) -> bool {
    let anchors = Selector::parse("a[href]").unwrap();
    let sections = [dom::header_element(root_doc), dom::footer_element(root_doc)];

    for section in sections.into_iter().flatten() {
        for link in section.select(&anchors) {
            if let Some(href) = link.value().attr("href") {
                if dom::resolve_url(root_url, href).as_deref() == Some(candidate_url) {
                    return true;
                }
            }
        }
    }
    false
}

/// Lowercased path with the trailing slash and common index-page suffixes
/// collapsed, so `/contact/` and `/contact/index.html` compare equal.
fn normalize_url_path(url: &str) -> String {
    let path = Url::parse(url)
        .map(|u| u.path().to_lowercase())
        .unwrap_or_else(|_| url.to_lowercase());

    let mut path = path.as_str();
    if path.len() > 1 {
        path = path.strip_suffix('/').unwrap_or(path);
    }
    for suffix in [
        "/index.html",
        "/index.htm",
        "/contactus.html",
        "/contact.html",
        "/inquiry.html",
    ] {
        if let Some(stripped) = path.strip_suffix(suffix) {
            path = stripped;
            break;
        }
    }
    path.to_string()
}

/// Closest candidate by normalized path similarity, if it clears the cutoff.
fn fuzzy_path_match(target: &str, candidates: &[&str]) -> Option<String> {
    if candidates.is_empty() {
        return None;
    }
    let target_norm = normalize_url_path(target);

    let mut best: Option<(f64, &str)> = None;
    for candidate in candidates {
        let similarity =
            strsim::normalized_levenshtein(&target_norm, &normalize_url_path(candidate));
        match best {
            Some((best_sim, _)) if best_sim >= similarity => {}
            _ => best = Some((similarity, candidate)),
        }
    }

    best.filter(|(similarity, _)| *similarity >= PATH_SIMILARITY_CUTOFF)
        .map(|(_, url)| url.to_string())
}

fn generate_remarks(best: &FormCandidate, pool_size: usize) -> String {
    let mut parts: Vec<String> = Vec::new();

    if best.has_form {
        parts.push("Contains form tag".to_string());
    } else {
        parts.push("No form tag found".to_string());
    }
    if !best.keywords.is_empty() {
        let shown: Vec<&str> = best.keywords.iter().take(3).map(String::as_str).collect();
        parts.push(format!("Keywords: {}", shown.join(", ")));
    }
    if best.has_email_fields {
        parts.push("Has email fields".to_string());
    }
    if best.in_header_footer {
        parts.push("Found in header/footer".to_string());
    }
    parts.push(format!("Score: {:.2}", best.score));
    if pool_size > 1 {
        parts.push(format!("Selected from {} candidates", pool_size));
    }

    parts.join("; ")
}
