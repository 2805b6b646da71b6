// src/storage.rs
use crate::crawler::types::CrawlRecord;
use crate::models::Result;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Appends one record per line to a JSONL file, creating it on first use.
pub async fn append_jsonl(record: &CrawlRecord, path: &Path) -> Result<()> {
    let line = serde_json::to_string(record)?;

    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(line.as_bytes()).await?;
    file.write_all(b"\n").await?;

    debug!("Stored crawl result to {}", path.display());
    Ok(())
}

pub fn to_json(record: &CrawlRecord, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(record)?
    } else {
        serde_json::to_string(record)?
    };
    Ok(json)
}
