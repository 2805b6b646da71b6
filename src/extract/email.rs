// src/extract/email.rs
//
// Email extraction over a fetched page: six detectors in fixed priority
// order, normalization, reject-list validation, additive scoring on a 0-100
// accumulator, and selection at the 0.6 threshold.

use crate::extract::dom;
use crate::extract::keywords::{
    EmailRules, EMAIL_EXACT_RE, EMAIL_RE, JS_ASSEMBLY_RE, NEGATIVE_SECTION_MARKERS,
    OBFUSCATION_PATTERNS, POSITIVE_SECTION_MARKERS,
};
use crate::extract::{Candidate, ExtractionResult, Source};
use crate::renderer::HeadlessRenderer;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;
use scraper::{Html, Selector};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};
use unicode_normalization::UnicodeNormalization;
use url::Url;

const ACCEPT_THRESHOLD: f64 = 0.6;

#[derive(Debug, Clone, Default)]
pub struct EmailExtractorConfig {
    pub validate_mx: bool,
    pub context_score: bool,
    pub rules: EmailRules,
}

pub struct EmailExtractor {
    base_url: String,
    page_host: String,
    config: EmailExtractorConfig,
    renderer: Option<Arc<dyn HeadlessRenderer>>,
}

struct RawMatch {
    email: String,
    method: Source,
}

impl EmailExtractor {
    pub fn new(base_url: &str) -> Self {
        let page_host = Url::parse(base_url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_default();

        Self {
            base_url: base_url.to_string(),
            page_host,
            config: EmailExtractorConfig::default(),
            renderer: None,
        }
    }

    pub fn with_config(mut self, config: EmailExtractorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn HeadlessRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub async fn extract(&self, html: &str, final_url: Option<&str>) -> ExtractionResult {
        let url = final_url.unwrap_or(&self.base_url);
        let mut markup = html.to_string();

        // JS-rendering fallback: at most once per page, only when static
        // detection has nothing and the page carries script fingerprints.
        if let Some(renderer) = &self.renderer {
            if self.needs_js_rendering(&markup) {
                match renderer.render(url).await {
                    Some(rendered) => {
                        info!("Rendered {} with headless browser", url);
                        markup = rendered;
                    }
                    None => warn!("Headless rendering failed for {}", url),
                }
            }
        }

        let doc = Html::parse_document(&markup);

        let mut raw: Vec<RawMatch> = Vec::new();
        raw.extend(self.detect_mailto(&doc));
        raw.extend(self.detect_structured(&doc));
        raw.extend(self.detect_plain(&markup, &doc));
        raw.extend(self.detect_form_inputs(&doc));
        raw.extend(self.detect_obfuscated(&markup));
        raw.extend(self.detect_js_assembly(&doc));

        // Normalize and dedupe by normalized value. Detection runs in
        // priority order, so the first method recorded for an address is its
        // highest-scoring one; later methods are merged as evidence.
        let mut merged: Vec<(String, Vec<Source>)> = Vec::new();
        for raw_match in raw {
            let Some(email) = normalize_email(&raw_match.email) else {
                continue;
            };
            match merged.iter_mut().find(|(existing, _)| *existing == email) {
                Some((_, methods)) => {
                    if !methods.contains(&raw_match.method) {
                        methods.push(raw_match.method);
                    }
                }
                None => merged.push((email, vec![raw_match.method])),
            }
        }

        let mut validated: Vec<(String, Vec<Source>)> = Vec::new();
        let mut dns_cache: HashMap<String, bool> = HashMap::new();
        for (email, methods) in merged {
            if self.is_rejected(&email) {
                debug!("Rejected email candidate: {}", email);
                continue;
            }
            if self.config.validate_mx && !self.domain_resolves(&email, &mut dns_cache).await {
                debug!("No MX/A records for {}", email);
                continue;
            }
            validated.push((email, methods));
        }

        let mut candidates = Vec::new();
        for (email, methods) in validated {
            let score = self.score(&email, &methods, &doc);
            info!(
                "Email candidate: {} (method: {:?}, score: {:.2})",
                email, methods[0], score
            );
            candidates.push(Candidate::new(email, methods[0], score));
        }

        ExtractionResult::select(candidates, |c| c.confidence >= ACCEPT_THRESHOLD)
    }

    /// Whether extraction over this markup would take the JS-rendering
    /// fallback path. Lets the orchestrator gate secondary fetches on it.
    pub fn uses_render_fallback(&self, markup: &str) -> bool {
        self.renderer.is_some() && self.needs_js_rendering(markup)
    }

    /// Script/SPA fingerprints with no statically detectable address.
    fn needs_js_rendering(&self, markup: &str) -> bool {
        let lower = markup.to_lowercase();
        let has_scripts = lower.contains("<script");
        let has_spa =
            lower.contains("react") || lower.contains("vue") || lower.contains("ng-") || lower.contains("angular");
        if !(has_scripts || has_spa) {
            return false;
        }

        let doc = Html::parse_document(markup);
        self.detect_mailto(&doc).is_empty() && self.detect_plain(markup, &doc).is_empty()
    }

    fn detect_mailto(&self, doc: &Html) -> Vec<RawMatch> {
        let selector = Selector::parse(r#"a[href^="mailto:"]"#).unwrap();
        doc.select(&selector)
            .filter_map(|link| {
                let href = link.value().attr("href")?;
                let found = EMAIL_RE.find(href)?;
                Some(RawMatch {
                    email: found.as_str().to_string(),
                    method: Source::MailtoLink,
                })
            })
            .collect()
    }

    /// JSON-LD blocks and schema.org microdata.
    fn detect_structured(&self, doc: &Html) -> Vec<RawMatch> {
        let mut out = Vec::new();

        let jsonld = Selector::parse(r#"script[type="application/ld+json"]"#).unwrap();
        for script in doc.select(&jsonld) {
            let text: String = script.text().collect();
            let Ok(value) = serde_json::from_str::<serde_json::Value>(&text) else {
                continue;
            };
            let mut emails = Vec::new();
            collect_json_emails(&value, &mut emails);
            out.extend(emails.into_iter().map(|email| RawMatch {
                email,
                method: Source::JsonldSchema,
            }));
        }

        let scopes = Selector::parse(r#"[itemtype*="schema.org"]"#).unwrap();
        let props = Selector::parse(r#"[itemprop*="email"]"#).unwrap();
        for scope in doc.select(&scopes) {
            for element in scope.select(&props) {
                let text = element
                    .value()
                    .attr("content")
                    .map(str::to_string)
                    .unwrap_or_else(|| dom::element_text(element));
                let text = text.trim();
                if EMAIL_EXACT_RE.is_match(text) {
                    out.push(RawMatch {
                        email: text.to_string(),
                        method: Source::SchemaMicrodata,
                    });
                }
            }
        }

        out
    }

    /// Raw-markup regex sweep plus data-email/data-contact/data-mail attributes.
    fn detect_plain(&self, markup: &str, doc: &Html) -> Vec<RawMatch> {
        let mut out: Vec<RawMatch> = EMAIL_RE
            .find_iter(markup)
            .map(|found| RawMatch {
                email: found.as_str().to_string(),
                method: Source::RegexPlain,
            })
            .collect();

        for attr in ["data-email", "data-contact", "data-mail"] {
            let selector = Selector::parse(&format!("[{}]", attr)).unwrap();
            for element in doc.select(&selector) {
                if let Some(value) = element.value().attr(attr) {
                    if let Some(found) = EMAIL_RE.find(value) {
                        out.push(RawMatch {
                            email: found.as_str().to_string(),
                            method: Source::RegexPlain,
                        });
                    }
                }
            }
        }

        out
    }

    fn detect_form_inputs(&self, doc: &Html) -> Vec<RawMatch> {
        let selector = Selector::parse("input").unwrap();
        let mut out = Vec::new();

        for input in doc.select(&selector) {
            let value = input.value();
            let is_email_input = value
                .attr("type")
                .map(|t| t.eq_ignore_ascii_case("email"))
                .unwrap_or(false)
                || value
                    .attr("placeholder")
                    .map(|p| p.to_lowercase().contains("email"))
                    .unwrap_or(false);
            if !is_email_input {
                continue;
            }

            if let Some(placeholder) = value.attr("placeholder") {
                if let Some(found) = EMAIL_RE.find(placeholder) {
                    out.push(RawMatch {
                        email: found.as_str().to_string(),
                        method: Source::FormPlaceholder,
                    });
                }
            }
            if let Some(preset) = value.attr("value") {
                if let Some(found) = EMAIL_RE.find(preset) {
                    out.push(RawMatch {
                        email: found.as_str().to_string(),
                        method: Source::FormValue,
                    });
                }
            }
        }

        out
    }

    /// Reconstructs addresses around obfuscation tokens ([at], (dot), ...).
    fn detect_obfuscated(&self, markup: &str) -> Vec<RawMatch> {
        let mut out = Vec::new();

        for (pattern, _) in OBFUSCATION_PATTERNS.iter() {
            for found in pattern.find_iter(markup) {
                let mut start = found.start().saturating_sub(50);
                while !markup.is_char_boundary(start) {
                    start -= 1;
                }
                let mut end = (found.end() + 50).min(markup.len());
                while !markup.is_char_boundary(end) {
                    end += 1;
                }

                let mut snippet = markup[start..end].to_string();
                for (replace_pattern, replacement) in OBFUSCATION_PATTERNS.iter() {
                    snippet = replace_pattern.replace_all(&snippet, *replacement).into_owned();
                }

                if let Some(email) = EMAIL_RE.find(&snippet) {
                    out.push(RawMatch {
                        email: email.as_str().to_string(),
                        method: Source::ObfuscatedPattern,
                    });
                }
            }
        }

        out
    }

    /// "info" + "@" + "example.co.jp" inside script bodies.
    fn detect_js_assembly(&self, doc: &Html) -> Vec<RawMatch> {
        let selector = Selector::parse("script").unwrap();
        let mut out = Vec::new();

        for script in doc.select(&selector) {
            let content: String = script.text().collect();
            for caps in JS_ASSEMBLY_RE.captures_iter(&content) {
                let local = &caps[1];
                let domain = &caps[2];
                if local.contains('@') {
                    continue;
                }
                let assembled = format!("{}@{}", local, domain);
                if EMAIL_EXACT_RE.is_match(&assembled) {
                    out.push(RawMatch {
                        email: assembled,
                        method: Source::JsAssembly,
                    });
                }
            }
        }

        out
    }

    fn is_rejected(&self, email: &str) -> bool {
        self.config
            .rules
            .reject_patterns
            .iter()
            .any(|pattern| email.contains(pattern.as_str()))
    }

    /// MX lookup with A/AAAA fallback. Resolver errors count as valid so a
    /// transient DNS failure cannot drop a real address.
    async fn domain_resolves(&self, email: &str, cache: &mut HashMap<String, bool>) -> bool {
        let Some((_, domain)) = email.split_once('@') else {
            return false;
        };
        if let Some(&known) = cache.get(domain) {
            return known;
        }

        let resolver = TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default());
        let resolves = match resolver.mx_lookup(domain).await {
            Ok(mx) if mx.iter().next().is_some() => true,
            _ => match resolver.lookup_ip(domain).await {
                Ok(ips) => ips.iter().next().is_some(),
                Err(_) => true,
            },
        };

        cache.insert(domain.to_string(), resolves);
        resolves
    }

    fn score(&self, email: &str, methods: &[Source], doc: &Html) -> f64 {
        let mut score: i32 = base_score(methods[0]);

        if dom::in_named_section(doc, email, &["footer", "contact", "header"]) {
            score += 15;
        }
        if self.is_same_domain(email) {
            score += 20;
        }
        if methods[0] == Source::ObfuscatedPattern {
            score -= 10;
        }

        if self.config.context_score {
            score += self.context_score(email, methods, doc);
        }

        f64::from(score.clamp(0, 100)) / 100.0
    }

    /// Ancestor-walk rubric plus address-shape signals.
    fn context_score(&self, email: &str, methods: &[Source], doc: &Html) -> i32 {
        let mut score = 0;

        if let Some(element) = dom::element_containing(doc, email) {
            score += dom::ancestor_context_score(
                element,
                POSITIVE_SECTION_MARKERS,
                NEGATIVE_SECTION_MARKERS,
                25,
                15,
            );
        }

        let (local, domain) = email.split_once('@').unwrap_or((email, ""));

        if self
            .config
            .rules
            .priority_local_keywords
            .iter()
            .any(|keyword| local.contains(keyword.as_str()))
        {
            score += 20;
        }

        let registered = self.registered_domain();
        if !registered.is_empty() && domain.contains(registered) {
            score += 25;
        }

        // A hyphen in a non-freemail domain usually means a dedicated
        // business domain.
        if domain.contains('-') && !self.config.rules.is_free_mail(email) {
            score += 8;
        }

        if methods.len() > 1 {
            score += 10;
        }
        if local.chars().count() > 30 {
            score -= 5;
        }
        if self
            .config
            .rules
            .generic_local_parts
            .iter()
            .any(|generic| local.contains(generic.as_str()))
        {
            score -= 10;
        }

        score
    }

    fn is_same_domain(&self, email: &str) -> bool {
        match email.split_once('@') {
            Some((_, domain)) => {
                let email_domain = domain.strip_prefix("www.").unwrap_or(domain);
                let page_domain = self.registered_domain();
                !page_domain.is_empty() && email_domain == page_domain
            }
            None => false,
        }
    }

    fn registered_domain(&self) -> &str {
        self.page_host
            .strip_prefix("www.")
            .unwrap_or(&self.page_host)
    }
}

fn base_score(method: Source) -> i32 {
    match method {
        Source::MailtoLink => 40,
        Source::JsonldSchema | Source::SchemaMicrodata => 30,
        Source::RegexPlain => 20,
        Source::FormPlaceholder | Source::FormValue => 15,
        Source::ObfuscatedPattern => 10,
        Source::JsAssembly => 5,
        _ => 10,
    }
}

fn collect_json_emails(value: &serde_json::Value, out: &mut Vec<String>) {
    match value {
        serde_json::Value::String(s) => {
            let trimmed = s.trim();
            if EMAIL_EXACT_RE.is_match(trimmed) && !out.iter().any(|seen| seen == trimmed) {
                out.push(trimmed.to_string());
            }
        }
        serde_json::Value::Array(items) => {
            for item in items {
                collect_json_emails(item, out);
            }
        }
        serde_json::Value::Object(map) => {
            for (_, item) in map {
                collect_json_emails(item, out);
            }
        }
        _ => {}
    }
}

/// Canonicalize a raw address: NFKC (folds fullwidth digits/letters/＠/．),
/// obfuscation-token replacement, lowercasing, mailto/query stripping, and
/// IDNA encoding of a non-ASCII domain. Returns `None` for anything that
/// fails the base pattern or is 5 characters or shorter. Idempotent.
pub fn normalize_email(raw: &str) -> Option<String> {
    if raw.trim().is_empty() {
        return None;
    }

    let mut email: String = raw.nfkc().collect();
    for (pattern, replacement) in OBFUSCATION_PATTERNS.iter() {
        email = pattern.replace_all(&email, *replacement).into_owned();
    }

    let mut email = email.trim().to_lowercase();
    if let Some(rest) = email.strip_prefix("mailto:") {
        email = rest.to_string();
    }
    if let Some(query) = email.find('?') {
        email.truncate(query);
    }

    if let Some((local, domain)) = email.split_once('@') {
        if !domain.is_ascii() {
            let ascii = Url::parse(&format!("http://{}", domain))
                .ok()
                .and_then(|u| u.host_str().map(str::to_string))?;
            email = format!("{}@{}", local, ascii);
        }
    }

    if email.chars().count() <= 5 || !EMAIL_EXACT_RE.is_match(&email) {
        return None;
    }

    Some(email)
}
