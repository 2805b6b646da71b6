use serde::{Deserialize, Serialize};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// One crawl input: the root URL plus optional reference values supplied by
/// the caller (e.g. a spreadsheet row with a known company name, or a
/// previously recorded contact form URL to re-match against).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlTarget {
    pub url: String,
    pub reference_company_name: Option<String>,
    pub reference_form_url: Option<String>,
}

impl CrawlTarget {
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            reference_company_name: None,
            reference_form_url: None,
        }
    }
}
