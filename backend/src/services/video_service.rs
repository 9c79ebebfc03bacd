use crate::error::SourceError;
use crate::models::{Keyword, VideoRecord};
use crate::services::{youtube_api, youtube_scraper};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How videos are looked up for a keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoStrategy {
    /// YouTube Data API v3, needs an API key
    #[default]
    Structured,
    /// Public results page, no key, view counts parsed from text
    Scrape,
}

impl FromStr for VideoStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "structured" | "api" => Ok(VideoStrategy::Structured),
            "scrape" | "scraping" => Ok(VideoStrategy::Scrape),
            other => Err(format!("unknown video strategy '{other}'")),
        }
    }
}

impl fmt::Display for VideoStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VideoStrategy::Structured => f.write_str("structured"),
            VideoStrategy::Scrape => f.write_str("scrape"),
        }
    }
}

/// Video lookups over a shared HTTP client.
#[derive(Debug, Clone)]
pub struct VideoSource {
    client: Client,
    api_url: String,
    web_url: String,
    api_key: Option<String>,
}

impl VideoSource {
    pub fn new(client: Client, api_url: &str, web_url: &str, api_key: Option<String>) -> Self {
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            web_url: web_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    pub async fn fetch_videos(
        &self,
        strategy: VideoStrategy,
        keyword: &Keyword,
        max_results: u32,
        region: &str,
    ) -> Result<Vec<VideoRecord>, SourceError> {
        let max_results = clamp_max_results(max_results);
        match strategy {
            VideoStrategy::Structured => {
                youtube_api::search_videos(
                    &self.client,
                    &self.api_url,
                    self.api_key.as_deref(),
                    keyword,
                    max_results,
                    region,
                )
                .await
            }
            VideoStrategy::Scrape => {
                youtube_scraper::search_videos(
                    &self.client,
                    &self.web_url,
                    keyword,
                    max_results,
                    region,
                )
                .await
            }
        }
    }

    pub async fn trending(
        &self,
        strategy: VideoStrategy,
        region: &str,
        max_results: u32,
    ) -> Result<Vec<VideoRecord>, SourceError> {
        let max_results = clamp_max_results(max_results);
        match strategy {
            VideoStrategy::Structured => {
                youtube_api::trending_videos(
                    &self.client,
                    &self.api_url,
                    self.api_key.as_deref(),
                    region,
                    max_results,
                )
                .await
            }
            VideoStrategy::Scrape => Err(SourceError::Unsupported(
                "trending videos need the Data API".to_string(),
            )),
        }
    }
}

/// Both strategies return between 1 and one API page of results per lookup.
fn clamp_max_results(max_results: u32) -> u32 {
    max_results.clamp(1, youtube_api::API_MAX_RESULTS)
}
