// src/crawler/types.rs
use crate::extract::{Candidate, Source};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrawlStatus {
    Success,
    Error,
}

/// The one record produced per crawled URL. Fields with no confident answer
/// stay null; the schema itself never shrinks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlRecord {
    pub id: String,
    pub url: String,

    pub email: Option<String>,
    pub email_confidence: f64,
    pub email_candidates: Vec<Candidate>,

    pub inquiry_form_url: Option<String>,
    pub inquiry_form_remarks: String,
    pub inquiry_form_candidates: Vec<Candidate>,

    pub company_name: Option<String>,
    pub company_name_source: Option<Source>,
    pub company_name_confidence: f64,
    pub company_name_candidates: Vec<Candidate>,

    pub industry: Option<String>,
    pub industry_source: Option<Source>,
    pub industry_confidence: f64,
    pub industry_candidates: Vec<Candidate>,

    pub http_status: u16,
    pub robots_allowed: bool,
    pub crawl_status: CrawlStatus,
    pub error_message: Option<String>,
    pub last_crawled_at: DateTime<Utc>,
}

impl CrawlRecord {
    pub fn new(url: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            url: url.to_string(),
            email: None,
            email_confidence: 0.0,
            email_candidates: Vec::new(),
            inquiry_form_url: None,
            inquiry_form_remarks: String::new(),
            inquiry_form_candidates: Vec::new(),
            company_name: None,
            company_name_source: None,
            company_name_confidence: 0.0,
            company_name_candidates: Vec::new(),
            industry: None,
            industry_source: None,
            industry_confidence: 0.0,
            industry_candidates: Vec::new(),
            http_status: 0,
            robots_allowed: true,
            crawl_status: CrawlStatus::Success,
            error_message: None,
            last_crawled_at: Utc::now(),
        }
    }

    pub fn error(url: &str, http_status: u16, message: impl Into<String>) -> Self {
        let mut record = Self::new(url);
        record.http_status = http_status;
        record.crawl_status = CrawlStatus::Error;
        record.error_message = Some(message.into());
        record
    }
}
