use chrono::{DateTime, Utc};
use rocket::http::{ContentType, Status};
use rocket::request::Request;
use rocket::response::Responder;
use rocket::{response, Response};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Cursor;

use crate::error::SourceWarning;
use crate::services::result_table::ResultTable;
use crate::services::scoring::RuleHit;
use crate::services::video_service::VideoStrategy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordSource {
    Manual,
    Suggestion,
    Trending,
    Rising,
}

/// A search phrase tagged with where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Keyword {
    pub text: String,
    pub source: KeywordSource,
}

impl Keyword {
    /// Returns `None` for blank input.
    pub fn new(text: &str, source: KeywordSource) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        Some(Keyword {
            text: text.to_string(),
            source,
        })
    }

    pub fn manual(text: &str) -> Option<Self> {
        Self::new(text, KeywordSource::Manual)
    }

    pub fn suggestion(text: &str) -> Option<Self> {
        Self::new(text, KeywordSource::Suggestion)
    }

    pub fn trending(text: &str) -> Option<Self> {
        Self::new(text, KeywordSource::Trending)
    }

    pub fn rising(text: &str) -> Option<Self> {
        Self::new(text, KeywordSource::Rising)
    }

    /// Tags every non-blank entry with `source`, keeping order.
    pub fn tag_all<S: AsRef<str>>(texts: &[S], source: KeywordSource) -> Vec<Keyword> {
        texts
            .iter()
            .filter_map(|t| Keyword::new(t.as_ref(), source))
            .collect()
    }
}

impl AsRef<str> for Keyword {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// One video as returned by either fetch strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub title: String,
    pub channel: String,
    pub published_at: Option<DateTime<Utc>>,
    /// `None` when the source did not expose a count; never defaulted to zero.
    pub view_count: Option<u64>,
    pub thumbnail_url: Option<String>,
    pub link: String,
    pub origin_keyword: Keyword,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredVideo {
    #[serde(flatten)]
    pub video: VideoRecord,
    pub score: u8,
}

#[derive(Debug, Serialize)]
pub struct AnalysisReport {
    pub topic: String,
    pub region: String,
    pub strategy: VideoStrategy,
    pub suggestions: Vec<String>,
    pub keywords: Vec<Keyword>,
    pub selected_keywords: Vec<Keyword>,
    pub rows: ResultTable,
    pub trending: Vec<ScoredVideo>,
    pub warnings: Vec<SourceWarning>,
    /// Set when any source rejected the API key or ran out of quota.
    pub credential_error: bool,
}

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    pub score: u8,
    pub breakdown: Vec<RuleHit>,
}

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl<'r> Responder<'r, 'static> for ErrorResponse {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        let json = serde_json::to_string(&self).unwrap_or_else(|_| String::from("{}"));
        Response::build()
            .status(Status::BadRequest)
            .header(ContentType::JSON)
            .sized_body(json.len(), Cursor::new(json))
            .ok()
    }
}
