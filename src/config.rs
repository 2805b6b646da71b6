use crate::robots::RobotsPolicy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub logging: LoggingConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CrawlerConfig {
    pub timeout_seconds: u64,
    pub user_agent: String,
    pub robots_policy: RobotsPolicy,

    /// Verify MX/A records for extracted email domains. Lookup failures
    /// count as valid so transient DNS errors cannot drop real addresses.
    #[serde(default)]
    pub validate_mx: bool,

    /// Enable the ancestor-walk context rubric for email scoring.
    #[serde(default)]
    pub context_score: bool,

    /// Allow the company-profile and contact-form secondary fetches when the
    /// root page itself came from the JS-rendering fallback.
    #[serde(default = "default_true")]
    pub secondary_fetch_after_render: bool,

    #[serde(default)]
    pub exclude_patterns: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    pub directory: String,
    pub pretty_json: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crawler: CrawlerConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            output: OutputConfig {
                directory: "out".to_string(),
                pretty_json: true,
            },
        }
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            user_agent: "Mozilla/5.0 (compatible; ContactCrawler/1.0)".to_string(),
            robots_policy: RobotsPolicy::Respect,
            validate_mx: false,
            context_score: false,
            secondary_fetch_after_render: true,
            exclude_patterns: Vec::new(),
        }
    }
}

pub async fn load_config(path: &str) -> crate::models::Result<Config> {
    let content = tokio::fs::read_to_string(path).await?;
    let config: Config = serde_yaml::from_str(&content)?;
    Ok(config)
}
