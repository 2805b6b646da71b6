// Shared collaborator mocks for integration tests. No network involved:
// pages are registered up front and served from memory.

use async_trait::async_trait;
use contact_crawler::fetcher::{FetchedPage, PageFetcher};
use contact_crawler::renderer::HeadlessRenderer;
use contact_crawler::robots::{RobotsChecker, RobotsPolicy};
use std::collections::HashMap;

#[derive(Default)]
pub struct MockFetcher {
    pages: HashMap<String, String>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), body.to_string());
        self
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn fetch_page(&self, url: &str) -> FetchedPage {
        match self.pages.get(url) {
            Some(body) => FetchedPage {
                body: Some(body.clone()),
                http_status: 200,
                final_url: Some(url.to_string()),
                error_message: None,
            },
            None => FetchedPage {
                body: None,
                http_status: 404,
                final_url: Some(url.to_string()),
                error_message: Some("HTTP error: 404".to_string()),
            },
        }
    }
}

/// Denies exactly the URLs it was given; everything else is allowed.
#[derive(Default)]
pub struct DenyListRobots {
    denied: Vec<String>,
}

impl DenyListRobots {
    pub fn denying(urls: &[&str]) -> Self {
        Self {
            denied: urls.iter().map(|u| u.to_string()).collect(),
        }
    }
}

#[async_trait]
impl RobotsChecker for DenyListRobots {
    async fn is_allowed(&self, url: &str, policy: RobotsPolicy) -> bool {
        if policy == RobotsPolicy::Ignore {
            return true;
        }
        !self.denied.iter().any(|d| d == url)
    }
}

/// Returns a fixed markup string for every render request.
pub struct StaticRenderer {
    pub markup: String,
}

#[async_trait]
impl HeadlessRenderer for StaticRenderer {
    async fn render(&self, _url: &str) -> Option<String> {
        Some(self.markup.clone())
    }
}
