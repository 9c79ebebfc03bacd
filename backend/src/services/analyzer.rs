use crate::config::AppConfig;
use crate::error::{SourceError, SourceKind, SourceWarning};
use crate::models::{AnalysisReport, ScoredVideo, VideoRecord};
use crate::services::aggregator::{aggregate_keywords, filter_keywords};
use crate::services::result_table::{ResultTable, SortKey, SortOrder};
use crate::services::scoring::ScoringHeuristic;
use crate::services::video_service::{VideoSource, VideoStrategy};
use crate::services::{suggestion_service, trends_service};
use anyhow::Result;
use chrono::Utc;
use log::{info, warn};
use reqwest::Client;
use std::time::Duration;

/// One user interaction: a topic plus the form toggles.
#[derive(Debug, Clone, Default)]
pub struct AnalyzeRequest {
    pub topic: String,
    pub region: String,
    pub strategy: VideoStrategy,
    pub include_trending: bool,
    pub include_rising: bool,
    /// Extra keywords typed by the user, ahead of every other source.
    pub manual_keywords: Vec<String>,
    /// Multiselect; empty means the first `keyword_limit` aggregated keywords
    /// (`AppConfig::keyword_limit`), not all of them.
    pub selected: Vec<String>,
    pub max_results: Option<u32>,
    pub sort: Option<(SortKey, SortOrder)>,
}

/// Runs the suggestion → trends → videos → scoring pipeline.
///
/// Built once per process; holds no per-request state.
#[derive(Debug, Clone)]
pub struct Analyzer {
    client: Client,
    videos: VideoSource,
    scoring: ScoringHeuristic,
    suggest_url: String,
    trends_url: String,
    keyword_limit: usize,
    max_results: u32,
}

impl Analyzer {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: Client, config: &AppConfig) -> Self {
        Self {
            videos: VideoSource::new(
                client.clone(),
                &config.youtube_api_url,
                &config.youtube_web_url,
                config.youtube_api_key.clone(),
            ),
            client,
            scoring: ScoringHeuristic::default(),
            suggest_url: config.suggest_url.clone(),
            trends_url: config.trends_url.trim_end_matches('/').to_string(),
            keyword_limit: config.keyword_limit,
            max_results: config.max_results,
        }
    }

    pub fn scoring(&self) -> &ScoringHeuristic {
        &self.scoring
    }

    pub async fn suggest(&self, topic: &str) -> Result<Vec<String>, SourceError> {
        suggestion_service::suggest(&self.client, &self.suggest_url, topic).await
    }

    pub async fn analyze(&self, request: &AnalyzeRequest) -> AnalysisReport {
        let topic = request.topic.trim();
        let region = request.region.trim();
        let max_results = request.max_results.unwrap_or(self.max_results);
        let mut warnings = Vec::new();

        info!(
            "Analyzing '{}' (region: '{}', strategy: {}, trending: {}, rising: {})",
            topic, region, request.strategy, request.include_trending, request.include_rising
        );

        let suggestions = match self.suggest(topic).await {
            Ok(list) => list,
            Err(e) => {
                warn!("Suggestions failed for '{topic}': {e}");
                warnings.push(SourceWarning::new(SourceKind::Suggestions, &e, Some(topic)));
                Vec::new()
            }
        };

        let mut trending = Vec::new();
        if request.include_trending {
            match self.videos.trending(request.strategy, region, max_results).await {
                Ok(videos) => trending = self.score_all(videos, Some(topic)),
                Err(e) => {
                    warn!("Trending videos failed: {e}");
                    warnings.push(SourceWarning::new(SourceKind::Trending, &e, None));
                }
            }
        }
        let trending_titles: Vec<String> =
            trending.iter().map(|v| v.video.title.clone()).collect();

        let mut rising = Vec::new();
        if request.include_rising {
            match trends_service::rising_queries(&self.client, &self.trends_url, topic, region)
                .await
            {
                Ok(queries) => rising = queries,
                Err(e) => {
                    warn!("Rising queries failed for '{topic}': {e}");
                    warnings.push(SourceWarning::new(SourceKind::RisingTrends, &e, Some(topic)));
                }
            }
        }

        let keywords =
            aggregate_keywords(&request.manual_keywords, &suggestions, &trending_titles, &rising);

        let selected_keywords = if request.selected.is_empty() {
            keywords.iter().take(self.keyword_limit).cloned().collect()
        } else {
            filter_keywords(&keywords, &request.selected)
        };

        let mut rows = ResultTable::new();
        for keyword in &selected_keywords {
            match self
                .videos
                .fetch_videos(request.strategy, keyword, max_results, region)
                .await
            {
                Ok(videos) => rows.extend(self.score_all(videos, None)),
                Err(e) => {
                    warn!("Video lookup failed for '{}': {e}", keyword.text);
                    warnings.push(SourceWarning::new(
                        SourceKind::Videos,
                        &e,
                        Some(keyword.text.as_str()),
                    ));
                }
            }
        }

        if let Some((key, order)) = request.sort {
            rows.sort_by(key, order, Utc::now());
        }

        let credential_error = warnings.iter().any(|w| w.actionable);
        info!(
            "Analysis of '{}' done: {} keywords, {} videos, {} warnings",
            topic,
            keywords.len(),
            rows.len(),
            warnings.len()
        );

        AnalysisReport {
            topic: topic.to_string(),
            region: region.to_string(),
            strategy: request.strategy,
            suggestions,
            keywords,
            selected_keywords,
            rows,
            trending,
            warnings,
            credential_error,
        }
    }

    /// Scores against `target`, or each record's own origin keyword.
    fn score_all(&self, videos: Vec<VideoRecord>, target: Option<&str>) -> Vec<ScoredVideo> {
        videos
            .into_iter()
            .map(|video| {
                let keyword = target.unwrap_or(video.origin_keyword.text.as_str());
                let score = self.scoring.score(&video.title, keyword);
                ScoredVideo { video, score }
            })
            .collect()
    }
}
