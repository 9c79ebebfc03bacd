use crate::error::SourceError;
use log::{debug, info};
use reqwest::Client;
use serde_json::{json, Value};

/// Trends window for related queries.
const TIMEFRAME: &str = "now 7-d";
const RELATED_QUERIES_WIDGET: &str = "RELATED_QUERIES";

/// Related queries the trends service marks as "rising" for `keyword` over
/// the last seven days of YouTube searches. An empty region means worldwide.
pub async fn rising_queries(
    client: &Client,
    trends_url: &str,
    keyword: &str,
    region: &str,
) -> Result<Vec<String>, SourceError> {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        return Ok(Vec::new());
    }

    let explore_req = json!({
        "comparisonItem": [{"keyword": keyword, "geo": region, "time": TIMEFRAME}],
        "category": 0,
        "property": "youtube",
    })
    .to_string();

    let explore = fetch_guarded_json(
        client,
        &format!("{trends_url}/api/explore"),
        &[("hl", "en-US"), ("tz", "0"), ("req", explore_req.as_str())],
    )
    .await?;

    let Some((token, widget_request)) = related_queries_widget(&explore) else {
        info!("No related queries widget for '{keyword}'");
        return Ok(Vec::new());
    };

    let widget_req = widget_request.to_string();
    let related = fetch_guarded_json(
        client,
        &format!("{trends_url}/api/widgetdata/relatedsearches"),
        &[
            ("hl", "en-US"),
            ("tz", "0"),
            ("req", widget_req.as_str()),
            ("token", token.as_str()),
        ],
    )
    .await?;

    let rising = parse_rising(&related);
    info!("Found {} rising queries for '{keyword}'", rising.len());
    Ok(rising)
}

async fn fetch_guarded_json(
    client: &Client,
    url: &str,
    params: &[(&str, &str)],
) -> Result<Value, SourceError> {
    let response = client.get(url).query(params).send().await?;
    let status = response.status();

    if !status.is_success() {
        return Err(SourceError::Upstream {
            status: status.as_u16(),
            message: format!("trends request returned {status}"),
        });
    }

    let body = response.text().await?;
    debug!("Trends response: {} bytes", body.len());
    Ok(serde_json::from_str(strip_json_guard(&body))?)
}

/// Trends bodies start with an anti-JSON-hijacking prefix such as `)]}'`.
fn strip_json_guard(body: &str) -> &str {
    body.find(['{', '['])
        .map(|start| &body[start..])
        .unwrap_or(body)
}

fn related_queries_widget(explore: &Value) -> Option<(String, Value)> {
    explore["widgets"]
        .as_array()?
        .iter()
        .find(|w| w["id"].as_str() == Some(RELATED_QUERIES_WIDGET))
        .and_then(|w| Some((w["token"].as_str()?.to_string(), w["request"].clone())))
}

/// `default.rankedList[1]` holds the rising list; `[0]` is "top".
fn parse_rising(related: &Value) -> Vec<String> {
    related
        .pointer("/default/rankedList/1/rankedKeyword")
        .and_then(|k| k.as_array())
        .map(|keywords| {
            keywords
                .iter()
                .filter_map(|k| k["query"].as_str())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}
