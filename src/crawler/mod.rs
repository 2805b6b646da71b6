pub mod engine;
pub mod types;

pub use engine::CrawlerEngine;
pub use types::{CrawlRecord, CrawlStatus};
