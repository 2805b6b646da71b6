pub mod config;
pub mod crawler;
pub mod extract;
pub mod fetcher;
pub mod models;
pub mod renderer;
pub mod robots;
pub mod storage;

pub use crawler::engine::CrawlerEngine;
pub use crawler::types::{CrawlRecord, CrawlStatus};
pub use extract::{Candidate, ExtractionResult, Source};
pub use fetcher::{FetchedPage, PageFetcher, ReqwestFetcher};
pub use models::{CrawlTarget, Result};
pub use robots::{RobotsChecker, RobotsPolicy};
