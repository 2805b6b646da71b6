// src/main.rs
use contact_crawler::config::{load_config, Config};
use contact_crawler::crawler::engine::CrawlerEngine;
use contact_crawler::fetcher::{PageFetcher, ReqwestFetcher};
use contact_crawler::models::{CrawlTarget, Result};
use contact_crawler::robots::{HttpRobotsChecker, RobotsChecker};
use contact_crawler::storage;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let config = match load_config("config.yml").await {
        Ok(config) => config,
        Err(e) => {
            warn!("Failed to load config.yml: {}. Using defaults.", e);
            Config::default()
        }
    };

    // Setup logging
    std::env::set_var("RUST_LOG", "contact_crawler=info,hyper=warn");
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("contact_crawler=info".parse().unwrap()),
        )
        .init();

    // Create output directory
    tokio::fs::create_dir_all(&config.output.directory).await?;

    let urls: Vec<String> = std::env::args().skip(1).collect();
    if urls.is_empty() {
        warn!("No URLs given. Usage: contact-crawler <url> [<url> ...]");
        return Ok(());
    }

    let fetcher: Arc<dyn PageFetcher> = Arc::new(ReqwestFetcher::new(
        &config.crawler.user_agent,
        Duration::from_secs(config.crawler.timeout_seconds),
    )?);
    let robots: Arc<dyn RobotsChecker> = Arc::new(HttpRobotsChecker::new(
        fetcher.clone(),
        config.crawler.user_agent.clone(),
    ));
    let engine = CrawlerEngine::new(config.crawler.clone(), fetcher, robots);

    let output_path = Path::new(&config.output.directory).join("crawl_results.jsonl");
    let targets: Vec<CrawlTarget> = urls.into_iter().map(CrawlTarget::from_url).collect();

    for record in engine.crawl_many(&targets).await {
        if config.output.pretty_json {
            println!("{}", storage::to_json(&record, true)?);
        }
        storage::append_jsonl(&record, &output_path).await?;
        info!(
            "{} -> {:?} (email: {:?}, form: {:?})",
            record.url, record.crawl_status, record.email, record.inquiry_form_url
        );
    }

    Ok(())
}
