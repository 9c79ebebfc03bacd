#![allow(dead_code)]

use niche_finder::config::AppConfig;
use niche_finder::services::analyzer::Analyzer;
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const API_KEY: &str = "test-key";

/// Points every upstream at the mock server.
pub fn config_for(server: &MockServer) -> AppConfig {
    AppConfig {
        youtube_api_key: Some(API_KEY.to_string()),
        suggest_url: format!("{}/complete/search", server.uri()),
        youtube_api_url: format!("{}/youtube/v3", server.uri()),
        youtube_web_url: server.uri(),
        trends_url: format!("{}/trends", server.uri()),
        http_timeout_secs: 5,
        ..AppConfig::default()
    }
}

pub fn analyzer_for(server: &MockServer) -> Analyzer {
    Analyzer::new(&config_for(server)).expect("analyzer")
}

pub async fn mount_suggestions(server: &MockServer, topic: &str, suggestions: &[&str]) {
    Mock::given(method("GET"))
        .and(path("/complete/search"))
        .and(query_param("q", topic))
        .and(query_param("ds", "yt"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([topic, suggestions])))
        .mount(server)
        .await;
}

fn search_item(id: &str, title: &str) -> Value {
    json!({
        "id": {"kind": "youtube#video", "videoId": id},
        "snippet": {
            "title": title,
            "channelTitle": format!("{title} Channel"),
            "publishedAt": "2024-05-01T10:00:00Z",
            "thumbnails": {"high": {"url": format!("https://i.ytimg.com/vi/{id}/hqdefault.jpg")}}
        }
    })
}

/// Data API search hits for `keyword`, plus their statistics.
pub async fn mount_api_search(server: &MockServer, keyword: &str, videos: &[(&str, &str, u64)]) {
    let items: Vec<Value> = videos.iter().map(|(id, title, _)| search_item(id, title)).collect();
    Mock::given(method("GET"))
        .and(path("/youtube/v3/search"))
        .and(query_param("q", keyword))
        .and(query_param("key", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": items})))
        .with_priority(1)
        .mount(server)
        .await;

    let ids: Vec<&str> = videos.iter().map(|(id, _, _)| *id).collect();
    let stats: Vec<Value> = videos
        .iter()
        .map(|(id, _, views)| json!({"id": id, "statistics": {"viewCount": views.to_string()}}))
        .collect();
    Mock::given(method("GET"))
        .and(path("/youtube/v3/videos"))
        .and(query_param("id", ids.join(",")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": stats})))
        .mount(server)
        .await;
}

/// Any other search query finds nothing.
pub async fn mount_empty_api_search(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/youtube/v3/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .with_priority(10)
        .mount(server)
        .await;
}

/// `topic="fitness"` with two suggestions and two videos per suggestion.
pub async fn mount_fitness_scenario(server: &MockServer) {
    mount_suggestions(server, "fitness", &["fitness app", "fitness tips"]).await;
    mount_api_search(
        server,
        "fitness app",
        &[
            ("appVideo001", "Best fitness app 2024 review", 120_000),
            ("appVideo002", "I tried 5 fitness apps for 30 days", 45_000),
        ],
    )
    .await;
    mount_api_search(
        server,
        "fitness tips",
        &[
            ("tipVideo001", "10 fitness tips for beginners", 980_000),
            ("tipVideo002", "Fitness tips nobody tells you", 3_100),
        ],
    )
    .await;
}

pub fn results_page(videos: &[(&str, &str, &str)]) -> String {
    let items: Vec<Value> = videos
        .iter()
        .map(|(id, title, views)| {
            json!({"videoRenderer": {
                "videoId": id,
                "title": {"runs": [{"text": title}]},
                "ownerText": {"runs": [{"text": format!("{title} Channel")}]},
                "viewCountText": {"simpleText": views},
                "publishedTimeText": {"simpleText": "3 weeks ago"},
                "thumbnail": {"thumbnails": [{"url": format!("https://i.ytimg.com/vi/{id}/hq720.jpg")}]}
            }})
        })
        .collect();

    let data = json!({
        "contents": {"twoColumnSearchResultsRenderer": {"primaryContents": {
            "sectionListRenderer": {"contents": [
                {"itemSectionRenderer": {"contents": items}}
            ]}
        }}}
    });

    format!(
        "<!DOCTYPE html><html><head></head><body><script nonce=\"x\">var ytInitialData = {data};</script></body></html>"
    )
}

pub async fn mount_results_page(server: &MockServer, keyword: &str, videos: &[(&str, &str, &str)]) {
    Mock::given(method("GET"))
        .and(path("/results"))
        .and(query_param("search_query", keyword))
        .respond_with(ResponseTemplate::new(200).set_body_raw(results_page(videos), "text/html"))
        .mount(server)
        .await;
}
