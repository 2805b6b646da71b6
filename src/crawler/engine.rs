// src/crawler/engine.rs
//
// Orchestrates one crawl: exclude-pattern gate, robots gate, root fetch,
// then the four extractors run independently over the fetched page. Any
// single extractor degrading to zero candidates never fails the crawl; only
// the gates and the root fetch produce an error record.

use crate::config::CrawlerConfig;
use crate::crawler::types::CrawlRecord;
use crate::extract::company_name::CompanyNameExtractor;
use crate::extract::contact_form::ContactFormDetector;
use crate::extract::email::{EmailExtractor, EmailExtractorConfig};
use crate::extract::industry::IndustryClassifier;
use crate::extract::keywords::EmailRules;
use crate::fetcher::PageFetcher;
use crate::models::CrawlTarget;
use crate::renderer::HeadlessRenderer;
use crate::robots::RobotsChecker;
use std::sync::Arc;
use tracing::{info, warn};

pub struct CrawlerEngine {
    config: CrawlerConfig,
    fetcher: Arc<dyn PageFetcher>,
    robots: Arc<dyn RobotsChecker>,
    renderer: Option<Arc<dyn HeadlessRenderer>>,
}

impl CrawlerEngine {
    pub fn new(
        config: CrawlerConfig,
        fetcher: Arc<dyn PageFetcher>,
        robots: Arc<dyn RobotsChecker>,
    ) -> Self {
        Self {
            config,
            fetcher,
            robots,
            renderer: None,
        }
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn HeadlessRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub async fn crawl(&self, target: &CrawlTarget) -> CrawlRecord {
        let url = &target.url;
        info!("Starting crawl for {}", url);

        if self
            .config
            .exclude_patterns
            .iter()
            .any(|pattern| url.contains(pattern.as_str()))
        {
            warn!("URL matches exclude pattern: {}", url);
            return CrawlRecord::error(url, 0, "URL matches exclude pattern");
        }

        let robots_allowed = self
            .robots
            .is_allowed(url, self.config.robots_policy)
            .await;
        if !robots_allowed {
            warn!("robots.txt disallows crawling: {}", url);
            let mut record = CrawlRecord::error(url, 0, "Robots.txt disallows crawling");
            record.robots_allowed = false;
            return record;
        }

        let fetched = self.fetcher.fetch_page(url).await;
        let final_url = fetched.final_url.clone().unwrap_or_else(|| url.clone());
        if !fetched.is_ok() {
            let message = fetched
                .error_message
                .clone()
                .unwrap_or_else(|| format!("HTTP {}", fetched.http_status));
            warn!("Failed to fetch {}: {}", url, message);
            return CrawlRecord::error(&final_url, fetched.http_status, message);
        }
        let body = fetched.body.unwrap_or_default();

        let mut record = CrawlRecord::new(&final_url);
        record.http_status = fetched.http_status;
        record.robots_allowed = robots_allowed;

        // Email
        let mut email_extractor = EmailExtractor::new(&final_url).with_config(EmailExtractorConfig {
            validate_mx: self.config.validate_mx,
            context_score: self.config.context_score,
            rules: EmailRules::default(),
        });
        if let Some(renderer) = &self.renderer {
            email_extractor = email_extractor.with_renderer(renderer.clone());
        }
        let render_fallback = email_extractor.uses_render_fallback(&body);
        let secondary_fetches_allowed =
            !render_fallback || self.config.secondary_fetch_after_render;

        let email = email_extractor.extract(&body, Some(&final_url)).await;
        if let Some(best) = &email.selected {
            info!(
                "Found email: {} (confidence: {:.2})",
                best.value, best.confidence
            );
            record.email = Some(best.value.clone());
            record.email_confidence = best.confidence;
        }
        record.email_candidates = email.candidates;

        // Contact form. The detector fetches the root page through the same
        // fetcher and walks candidate pages one at a time.
        if secondary_fetches_allowed {
            let detector = ContactFormDetector::new()
                .with_fetcher(self.fetcher.clone())
                .with_robots(self.robots.clone(), self.config.robots_policy);
            let form = detector
                .detect(&final_url, target.reference_form_url.as_deref())
                .await;
            if let Some(form_url) = &form.form_url {
                info!("Found contact form URL: {} ({})", form_url, form.remarks);
            }
            record.inquiry_form_url = form.form_url;
            record.inquiry_form_remarks = form.remarks;
            record.inquiry_form_candidates = form.candidates;
        } else {
            record.inquiry_form_remarks =
                "Secondary fetches disabled after JS-rendered root fetch".to_string();
        }

        // Company name
        let mut name_extractor = CompanyNameExtractor::new(&final_url);
        if secondary_fetches_allowed {
            name_extractor = name_extractor.with_fetcher(self.fetcher.clone());
        }
        let name = name_extractor
            .extract_with_reference(
                &body,
                Some(&final_url),
                target.reference_company_name.as_deref(),
            )
            .await;
        if let Some(best) = &name.selected {
            record.company_name = Some(best.value.clone());
            record.company_name_source = Some(best.source);
            record.company_name_confidence = best.confidence;
        }
        record.company_name_candidates = name.candidates;

        // Industry
        let classifier = IndustryClassifier::new(&final_url);
        let industry = classifier.classify(&body, Some(&final_url));
        if let Some(best) = &industry.selected {
            record.industry = Some(best.value.clone());
            record.industry_source = Some(best.source);
            record.industry_confidence = best.confidence;
        }
        record.industry_candidates = industry.candidates;

        info!("Crawl completed for {}", final_url);
        record
    }

    /// Sequential batch loop over many targets.
    pub async fn crawl_many(&self, targets: &[CrawlTarget]) -> Vec<CrawlRecord> {
        let mut records = Vec::with_capacity(targets.len());

        info!("Starting batch crawl of {} URLs", targets.len());
        for (i, target) in targets.iter().enumerate() {
            info!("Crawling {}/{}: {}", i + 1, targets.len(), target.url);
            records.push(self.crawl(target).await);
        }
        info!(
            "Batch crawl complete: {}/{} successful",
            records
                .iter()
                .filter(|r| r.crawl_status == crate::crawler::types::CrawlStatus::Success)
                .count(),
            targets.len()
        );

        records
    }
}
