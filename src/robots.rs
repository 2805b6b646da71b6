// src/robots.rs
use crate::fetcher::PageFetcher;
use async_trait::async_trait;
use robotstxt::DefaultMatcher;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;
use url::Url;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RobotsPolicy {
    #[default]
    Respect,
    Ignore,
}

/// robots.txt permission seam. Under `Ignore` every URL is allowed.
#[async_trait]
pub trait RobotsChecker: Send + Sync {
    async fn is_allowed(&self, url: &str, policy: RobotsPolicy) -> bool;
}

/// Fetches and caches robots.txt per origin, one lookup per site.
pub struct HttpRobotsChecker {
    fetcher: Arc<dyn PageFetcher>,
    user_agent: String,
    cache: Mutex<HashMap<String, Option<String>>>,
}

impl HttpRobotsChecker {
    pub fn new(fetcher: Arc<dyn PageFetcher>, user_agent: impl Into<String>) -> Self {
        Self {
            fetcher,
            user_agent: user_agent.into(),
            cache: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl RobotsChecker for HttpRobotsChecker {
    async fn is_allowed(&self, url: &str, policy: RobotsPolicy) -> bool {
        if policy == RobotsPolicy::Ignore {
            return true;
        }

        let origin = match Url::parse(url) {
            Ok(parsed) => match parsed.host_str() {
                Some(host) => format!("{}://{}", parsed.scheme(), host),
                None => return true,
            },
            Err(_) => return true,
        };

        let body = {
            let mut cache = self.cache.lock().await;
            match cache.get(&origin) {
                Some(cached) => cached.clone(),
                None => {
                    let robots_url = format!("{}/robots.txt", origin);
                    let fetched = self.fetcher.fetch_page(&robots_url).await;
                    let body = if fetched.is_ok() { fetched.body } else { None };
                    debug!(
                        "Cached robots.txt for {} (present: {})",
                        origin,
                        body.is_some()
                    );
                    cache.insert(origin, body.clone());
                    body
                }
            }
        };

        match body {
            // A missing or unreadable robots.txt allows everything.
            None => true,
            Some(robots) => {
                DefaultMatcher::default().one_agent_allowed_by_robots(&robots, &self.user_agent, url)
            }
        }
    }
}

/// Permissive checker for callers that opt out of robots handling entirely.
pub struct AllowAll;

#[async_trait]
impl RobotsChecker for AllowAll {
    async fn is_allowed(&self, _url: &str, _policy: RobotsPolicy) -> bool {
        true
    }
}
