use crate::error::SourceError;
use crate::models::{Keyword, VideoRecord};
use crate::utils::{extract_youtube_video_id, parse_relative_age, parse_views, watch_url};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use reqwest::header::{ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::Client;
use serde_json::Value;

const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Keyword search by scraping the public results page, no API key required.
///
/// The page layout is not a stable interface: when the embedded data cannot
/// be found or walked, the result is empty rather than an error.
pub async fn search_videos(
    client: &Client,
    web_url: &str,
    keyword: &Keyword,
    max_results: u32,
    region: &str,
) -> Result<Vec<VideoRecord>, SourceError> {
    let mut params = vec![("search_query", keyword.text.as_str()), ("hl", "en")];
    if !region.is_empty() {
        params.push(("gl", region));
    }

    let response = client
        .get(format!("{web_url}/results"))
        .query(&params)
        .header(USER_AGENT, BROWSER_USER_AGENT)
        .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9")
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::Upstream {
            status: status.as_u16(),
            message: format!("results page returned {status}"),
        });
    }

    let html = response.text().await?;
    let Some(data) = extract_initial_data(&html) else {
        warn!("No ytInitialData on results page for '{}'", keyword.text);
        return Ok(Vec::new());
    };

    let mut videos = parse_video_results(&data, keyword, Utc::now());
    videos.truncate(max_results as usize);

    info!("Scraped {} videos for '{}'", videos.len(), keyword.text);
    Ok(videos)
}

/// Pull the `ytInitialData` JSON out of the results page.
fn extract_initial_data(html: &str) -> Option<Value> {
    let start_marker = "ytInitialData = ";
    let start = html.find(start_marker)?;
    let json_start = start + start_marker.len();

    let end = html[json_start..].find(";</script>")?;
    let json_str = &html[json_start..json_start + end];

    match serde_json::from_str(json_str) {
        Ok(data) => Some(data),
        Err(e) => {
            debug!("ytInitialData is not valid JSON: {e}");
            None
        }
    }
}

/// Walk `contents.twoColumnSearchResultsRenderer...videoRenderer` entries.
fn parse_video_results(data: &Value, keyword: &Keyword, now: DateTime<Utc>) -> Vec<VideoRecord> {
    let sections = data
        .pointer("/contents/twoColumnSearchResultsRenderer/primaryContents/sectionListRenderer/contents")
        .and_then(|c| c.as_array());

    let Some(sections) = sections else {
        warn!("Unexpected results page layout for '{}'", keyword.text);
        return Vec::new();
    };

    sections
        .iter()
        .filter_map(|section| section.pointer("/itemSectionRenderer/contents")?.as_array())
        .flatten()
        .filter_map(|item| item.get("videoRenderer"))
        .filter_map(|renderer| parse_video_renderer(renderer, keyword, now))
        .collect()
}

fn parse_video_renderer(
    renderer: &Value,
    keyword: &Keyword,
    now: DateTime<Utc>,
) -> Option<VideoRecord> {
    let video_id = renderer["videoId"].as_str().map(String::from).or_else(|| {
        renderer
            .pointer("/navigationEndpoint/commandMetadata/webCommandMetadata/url")
            .and_then(|u| u.as_str())
            .and_then(|path| extract_youtube_video_id(&format!("https://www.youtube.com{path}")))
    })?;
    let link = watch_url(&video_id)?;

    let channel = renderer
        .get("ownerText")
        .or_else(|| renderer.get("longBylineText"))
        .map(text_of)
        .unwrap_or_default();

    // Live streams show "N watching" or nothing; keep the count unknown then.
    let view_count = renderer
        .get("viewCountText")
        .map(text_of)
        .filter(|text| {
            text.to_lowercase().starts_with("no view")
                || (text.chars().any(|c| c.is_ascii_digit()) && !text.contains("watching"))
        })
        .map(|text| parse_views(&text));

    let published_at = renderer
        .get("publishedTimeText")
        .map(text_of)
        .and_then(|text| parse_relative_age(&text, now));

    let thumbnail_url = renderer
        .pointer("/thumbnail/thumbnails")
        .and_then(|t| t.as_array())
        .and_then(|t| t.last())
        .and_then(|t| t["url"].as_str())
        .map(String::from);

    Some(VideoRecord {
        title: renderer.get("title").map(text_of).unwrap_or_default(),
        channel,
        published_at,
        view_count,
        thumbnail_url,
        link,
        origin_keyword: keyword.clone(),
    })
}

/// Text from either `{"runs": [{"text": ..}]}` or `{"simpleText": ..}`.
fn text_of(element: &Value) -> String {
    if let Some(runs) = element.get("runs").and_then(|r| r.as_array()) {
        return runs
            .iter()
            .filter_map(|r| r.get("text").and_then(|t| t.as_str()))
            .collect::<Vec<_>>()
            .join("");
    }
    element
        .get("simpleText")
        .and_then(|s| s.as_str())
        .unwrap_or("")
        .to_string()
}
