use crate::error::SourceError;
use log::{debug, info};
use reqwest::Client;
use serde_json::Value;

/// Autocomplete suggestions scoped to YouTube (`ds=yt`).
///
/// A blank topic yields no suggestions without touching the network.
pub async fn suggest(
    client: &Client,
    suggest_url: &str,
    topic: &str,
) -> Result<Vec<String>, SourceError> {
    let topic = topic.trim();
    if topic.is_empty() {
        return Ok(Vec::new());
    }

    let response = client
        .get(suggest_url)
        .query(&[("client", "firefox"), ("ds", "yt"), ("q", topic)])
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(SourceError::Upstream {
            status: status.as_u16(),
            message: body,
        });
    }

    // Body is not guaranteed to be served as application/json
    let body = response.text().await?;
    let json: Value = serde_json::from_str(&body)?;
    let suggestions = parse_suggestions(&json)?;

    info!("Found {} suggestions for '{}'", suggestions.len(), topic);
    debug!("Suggestions: {}", suggestions.join(", "));
    Ok(suggestions)
}

/// Reads `[query, [suggestion, ...], ...]`.
fn parse_suggestions(json: &Value) -> Result<Vec<String>, SourceError> {
    let list = json
        .get(1)
        .and_then(|v| v.as_array())
        .ok_or_else(|| SourceError::Malformed("suggestion list missing".to_string()))?;

    Ok(list
        .iter()
        .filter_map(|v| v.as_str())
        .map(String::from)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_second_element() {
        let json = json!(["fitness", ["fitness app", "fitness tips"], [], {}]);
        assert_eq!(
            parse_suggestions(&json).unwrap(),
            vec!["fitness app", "fitness tips"]
        );
    }

    #[test]
    fn skips_non_strings() {
        let json = json!(["x", ["a", 1, null, "b"]]);
        assert_eq!(parse_suggestions(&json).unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn wrong_shape_is_malformed() {
        for json in [json!({"q": "x"}), json!(["x"]), json!(["x", "not a list"])] {
            assert!(matches!(
                parse_suggestions(&json),
                Err(SourceError::Malformed(_))
            ));
        }
    }

    #[tokio::test]
    async fn blank_topic_skips_request() {
        // unroutable URL: any request would fail
        let client = Client::new();
        let result = suggest(&client, "http://127.0.0.1:9/complete", "   ").await;
        assert!(result.unwrap().is_empty());
    }
}
