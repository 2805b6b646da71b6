// src/fetcher.rs
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// Outcome of fetching a single page. `body` is only populated on a
/// successful 2xx response with a readable body.
#[derive(Debug, Clone, Default)]
pub struct FetchedPage {
    pub body: Option<String>,
    pub http_status: u16,
    pub final_url: Option<String>,
    pub error_message: Option<String>,
}

impl FetchedPage {
    pub fn is_ok(&self) -> bool {
        self.body.is_some() && self.http_status == 200
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            body: None,
            http_status: 0,
            final_url: None,
            error_message: Some(message.into()),
        }
    }
}

/// Page fetching seam. Implementations must follow redirects, report the
/// final URL, and stay safely callable any number of times.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, url: &str) -> FetchedPage;
}

pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> crate::models::Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for ReqwestFetcher {
    async fn fetch_page(&self, url: &str) -> FetchedPage {
        let mut last_error = String::new();

        for attempt in 0..2 {
            if attempt > 0 {
                let jitter = fastrand::u64(0..=500);
                tokio::time::sleep(Duration::from_millis(500 + jitter)).await;
                debug!("Retrying fetch of {}", url);
            }

            match self.client.get(url).send().await {
                Ok(response) => {
                    let status = response.status().as_u16();
                    let final_url = response.url().to_string();

                    if !response.status().is_success() {
                        return FetchedPage {
                            body: None,
                            http_status: status,
                            final_url: Some(final_url),
                            error_message: Some(format!("HTTP error: {}", status)),
                        };
                    }

                    match response.text().await {
                        Ok(body) => {
                            debug!("Fetched {} bytes from {}", body.len(), url);
                            return FetchedPage {
                                body: Some(body),
                                http_status: status,
                                final_url: Some(final_url),
                                error_message: None,
                            };
                        }
                        Err(e) => {
                            return FetchedPage {
                                body: None,
                                http_status: status,
                                final_url: Some(final_url),
                                error_message: Some(format!("Failed to read body: {}", e)),
                            };
                        }
                    }
                }
                Err(e) if attempt == 0 && (e.is_timeout() || e.is_connect()) => {
                    warn!("Fetch attempt failed for {}: {}", url, e);
                    last_error = e.to_string();
                }
                Err(e) => {
                    return FetchedPage::error(e.to_string());
                }
            }
        }

        FetchedPage::error(last_error)
    }
}
