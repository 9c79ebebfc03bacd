use crate::error::SourceError;
use crate::models::{Keyword, VideoRecord};
use crate::utils::{parse_published, watch_url};
use log::{debug, info, warn};
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use std::collections::HashMap;

/// Data API caps `maxResults` at 50.
pub const API_MAX_RESULTS: u32 = 50;

/// Keyword search through the YouTube Data API v3.
///
/// Documentation: https://developers.google.com/youtube/v3/docs/search/list
pub async fn search_videos(
    client: &Client,
    api_url: &str,
    api_key: Option<&str>,
    keyword: &Keyword,
    max_results: u32,
    region: &str,
) -> Result<Vec<VideoRecord>, SourceError> {
    let api_key = require_key(api_key)?;
    let max_results = max_results.clamp(1, API_MAX_RESULTS).to_string();

    let mut params = vec![
        ("part", "snippet"),
        ("type", "video"),
        ("q", keyword.text.as_str()),
        ("maxResults", max_results.as_str()),
        ("key", api_key),
    ];
    if !region.is_empty() {
        params.push(("regionCode", region));
    }

    let search = get_json(client.get(format!("{api_url}/search")).query(&params)).await?;
    let items = search["items"]
        .as_array()
        .ok_or_else(|| SourceError::Malformed("search response has no items".to_string()))?;

    let hits: Vec<(&str, &Value)> = items
        .iter()
        .filter_map(|item| Some((item["id"]["videoId"].as_str()?, &item["snippet"])))
        .collect();

    if hits.is_empty() {
        info!("No videos found for '{}'", keyword.text);
        return Ok(Vec::new());
    }

    let ids: Vec<&str> = hits.iter().map(|(id, _)| *id).collect();
    let view_counts = match fetch_view_counts(client, api_url, api_key, &ids).await {
        Ok(counts) => counts,
        Err(e) => {
            warn!("Failed to fetch statistics for '{}': {e}", keyword.text);
            HashMap::new()
        }
    };

    let videos: Vec<VideoRecord> = hits
        .into_iter()
        .filter_map(|(id, snippet)| {
            record_from_snippet(id, snippet, view_counts.get(id).copied(), keyword.clone())
        })
        .collect();

    info!("Fetched {} videos for '{}' via Data API", videos.len(), keyword.text);
    Ok(videos)
}

/// Most popular videos for a region, independent of any keyword.
///
/// Each record's origin keyword is its own title.
pub async fn trending_videos(
    client: &Client,
    api_url: &str,
    api_key: Option<&str>,
    region: &str,
    max_results: u32,
) -> Result<Vec<VideoRecord>, SourceError> {
    let api_key = require_key(api_key)?;
    let max_results = max_results.clamp(1, API_MAX_RESULTS).to_string();

    let mut params = vec![
        ("part", "snippet,statistics"),
        ("chart", "mostPopular"),
        ("maxResults", max_results.as_str()),
        ("key", api_key),
    ];
    if !region.is_empty() {
        params.push(("regionCode", region));
    }

    let response = get_json(client.get(format!("{api_url}/videos")).query(&params)).await?;
    let items = response["items"]
        .as_array()
        .ok_or_else(|| SourceError::Malformed("videos response has no items".to_string()))?;

    let videos: Vec<VideoRecord> = items
        .iter()
        .filter_map(|item| {
            let id = item["id"].as_str()?;
            let origin = Keyword::trending(item["snippet"]["title"].as_str()?)?;
            record_from_snippet(id, &item["snippet"], view_count(item), origin)
        })
        .collect();

    info!(
        "Fetched {} trending videos for region '{}'",
        videos.len(),
        if region.is_empty() { "default" } else { region }
    );
    Ok(videos)
}

/// One batched `videos.list` call for all ids.
async fn fetch_view_counts(
    client: &Client,
    api_url: &str,
    api_key: &str,
    ids: &[&str],
) -> Result<HashMap<String, u64>, SourceError> {
    let joined = ids.join(",");
    let params = [("part", "statistics"), ("id", joined.as_str()), ("key", api_key)];

    let response = get_json(client.get(format!("{api_url}/videos")).query(&params)).await?;

    let counts: HashMap<String, u64> = response["items"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| Some((item["id"].as_str()?.to_string(), view_count(item)?)))
                .collect()
        })
        .unwrap_or_default();

    debug!("Statistics: {counts:?}");
    Ok(counts)
}

fn require_key(api_key: Option<&str>) -> Result<&str, SourceError> {
    match api_key {
        Some(key) if !key.trim().is_empty() => Ok(key),
        _ => Err(SourceError::InvalidCredential {
            status: 0,
            message: "YOUTUBE_API_KEY is not configured".to_string(),
        }),
    }
}

async fn get_json(request: RequestBuilder) -> Result<Value, SourceError> {
    let response = request.send().await?;
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(SourceError::from_status(status.as_u16(), api_error_message(&body)));
    }

    Ok(response.json::<Value>().await?)
}

/// `error.message` from a Google API error body, or the raw body.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(String::from))
        .unwrap_or_else(|| body.to_string())
}

/// `statistics.viewCount` is a decimal string; hidden counts are simply absent.
fn view_count(item: &Value) -> Option<u64> {
    let raw = &item["statistics"]["viewCount"];
    raw.as_str()
        .and_then(|s| s.parse().ok())
        .or_else(|| raw.as_u64())
}

fn thumbnail(snippet: &Value) -> Option<String> {
    ["high", "medium", "default"]
        .iter()
        .find_map(|size| snippet["thumbnails"][size]["url"].as_str())
        .map(String::from)
}

fn record_from_snippet(
    video_id: &str,
    snippet: &Value,
    view_count: Option<u64>,
    origin_keyword: Keyword,
) -> Option<VideoRecord> {
    let link = match watch_url(video_id) {
        Some(link) => link,
        None => {
            warn!("Skipping video with invalid id '{video_id}'");
            return None;
        }
    };

    Some(VideoRecord {
        title: snippet["title"].as_str().unwrap_or("").to_string(),
        channel: snippet["channelTitle"].as_str().unwrap_or("").to_string(),
        published_at: snippet["publishedAt"].as_str().and_then(parse_published),
        view_count,
        thumbnail_url: thumbnail(snippet),
        link,
        origin_keyword,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn maps_snippet_fields() {
        let snippet = json!({
            "title": "Fitness app review",
            "channelTitle": "Gym Lab",
            "publishedAt": "2024-03-01T08:00:00Z",
            "thumbnails": {
                "default": {"url": "https://i.ytimg.com/vi/abcdefghijk/default.jpg"},
                "high": {"url": "https://i.ytimg.com/vi/abcdefghijk/hqdefault.jpg"}
            }
        });
        let record = record_from_snippet(
            "abcdefghijk",
            &snippet,
            Some(42),
            Keyword::suggestion("fitness app").unwrap(),
        )
        .unwrap();

        assert_eq!(record.title, "Fitness app review");
        assert_eq!(record.channel, "Gym Lab");
        assert_eq!(record.view_count, Some(42));
        assert_eq!(record.link, "https://www.youtube.com/watch?v=abcdefghijk");
        assert_eq!(
            record.thumbnail_url.as_deref(),
            Some("https://i.ytimg.com/vi/abcdefghijk/hqdefault.jpg")
        );
        assert!(record.published_at.is_some());
    }

    #[test]
    fn invalid_id_is_dropped() {
        let snippet = json!({"title": "x"});
        assert!(record_from_snippet("bad", &snippet, None, Keyword::manual("k").unwrap()).is_none());
    }

    #[test]
    fn view_count_string_or_missing() {
        assert_eq!(view_count(&json!({"statistics": {"viewCount": "1234"}})), Some(1234));
        assert_eq!(view_count(&json!({"statistics": {}})), None);
        assert_eq!(view_count(&json!({})), None);
    }

    #[test]
    fn error_message_from_body() {
        let body = r#"{"error": {"code": 403, "message": "The request cannot be completed because you have exceeded your quota."}}"#;
        assert!(api_error_message(body).contains("quota"));
        assert_eq!(api_error_message("plain"), "plain");
    }

    #[test]
    fn missing_key_is_a_credential_error() {
        assert!(require_key(None).unwrap_err().is_actionable());
        assert!(require_key(Some(" ")).unwrap_err().is_actionable());
        assert_eq!(require_key(Some("k")).unwrap(), "k");
    }
}
