//! Suggestion fetcher - turns a prefix into the round's candidate list.
//!
//! The default source is Bilibili's search-suggest endpoint. Its payload is
//! `{"code": 0, "data": {"result": {"tag": [{"term": "..."}, ...]}}}`; an
//! empty or absent `result`/`tag` section is a valid "no suggestions" answer.

use async_trait::async_trait;
use autoguess_common::{GameError, MAX_CANDIDATES};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Anything that can produce autocomplete suggestions for a prefix.
#[async_trait]
pub trait SuggestionSource: Send + Sync {
    /// Ordered, prefix-filtered candidates, at most [`MAX_CANDIDATES`] long.
    async fn fetch(&self, prefix: &str) -> Result<Vec<String>, GameError>;
}

/// Keep only exact, case-sensitive prefix matches, in source order, capped.
pub fn filter_candidates<I>(prefix: &str, terms: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    terms
        .into_iter()
        .filter(|term| term.starts_with(prefix))
        .take(MAX_CANDIDATES)
        .collect()
}

/// Extract raw suggestion terms from a Bilibili suggest payload.
///
/// A missing `data` object or a non-zero `code` is malformed; a missing or
/// empty `result`/`tag` is an empty list. Tag entries without a string
/// `term` are skipped.
pub fn parse_bilibili_terms(body: &Value) -> Result<Vec<String>, GameError> {
    if let Some(code) = body.get("code").and_then(|c| c.as_i64()) {
        if code != 0 {
            let message = body
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("unknown");
            return Err(GameError::SuggestionSource(format!(
                "upstream returned code {}: {}",
                code, message
            )));
        }
    }

    let data = body
        .get("data")
        .filter(|d| d.is_object())
        .ok_or_else(|| GameError::SuggestionSource("response has no data object".to_string()))?;

    let tags = match data
        .get("result")
        .and_then(|r| r.get("tag"))
        .and_then(|t| t.as_array())
    {
        Some(tags) => tags,
        None => return Ok(Vec::new()),
    };

    Ok(tags
        .iter()
        .filter_map(|entry| entry.get("term").and_then(|t| t.as_str()))
        .map(String::from)
        .collect())
}

/// Bilibili search-suggest client
pub struct BilibiliSuggestions {
    http_client: reqwest::Client,
    endpoint: String,
}

impl BilibiliSuggestions {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, GameError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GameError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SuggestionSource for BilibiliSuggestions {
    async fn fetch(&self, prefix: &str) -> Result<Vec<String>, GameError> {
        let response = self
            .http_client
            .get(&self.endpoint)
            .query(&[("term", prefix)])
            .send()
            .await
            .map_err(|e| {
                warn!("Suggestion request failed: {}", e);
                GameError::SuggestionSource(format!("request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Suggestion source returned {}", status);
            return Err(GameError::SuggestionSource(format!(
                "upstream returned HTTP {}",
                status
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| GameError::SuggestionSource(format!("failed to read body: {}", e)))?;
        debug!("Suggestion payload ({} bytes): {}", text.len(), text);

        let body: Value = serde_json::from_str(&text)
            .map_err(|e| GameError::SuggestionSource(format!("body is not JSON: {}", e)))?;

        let raw = parse_bilibili_terms(&body)?;
        let raw_count = raw.len();
        let candidates = filter_candidates(prefix, raw);
        info!(
            "Fetched {} suggestions for {:?}, kept {}",
            raw_count,
            prefix,
            candidates.len()
        );

        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_filter_keeps_prefix_matches_in_order() {
        let terms = strings(&["cats", "dog", "category", "Catalog", "catalog"]);
        assert_eq!(
            filter_candidates("cat", terms),
            strings(&["cats", "category", "catalog"])
        );
    }

    #[test]
    fn test_filter_caps_at_table_length() {
        let terms: Vec<String> = (0..15).map(|i| format!("cat{}", i)).collect();
        let kept = filter_candidates("cat", terms);
        assert_eq!(kept.len(), MAX_CANDIDATES);
        assert_eq!(kept[0], "cat0");
        assert_eq!(kept[9], "cat9");
    }

    #[test]
    fn test_parse_terms() {
        let body = json!({
            "code": 0,
            "data": {"result": {"tag": [
                {"value": "cats", "term": "cats"},
                {"value": "category", "term": "category"},
                {"value": "broken"}
            ]}}
        });
        assert_eq!(parse_bilibili_terms(&body).unwrap(), strings(&["cats", "category"]));
    }

    #[test]
    fn test_parse_missing_result_is_empty() {
        let body = json!({"code": 0, "data": {}});
        assert!(parse_bilibili_terms(&body).unwrap().is_empty());

        let body = json!({"code": 0, "data": {"result": {}}});
        assert!(parse_bilibili_terms(&body).unwrap().is_empty());
    }

    #[test]
    fn test_parse_missing_data_is_error() {
        let body = json!({"code": 0});
        assert!(matches!(
            parse_bilibili_terms(&body),
            Err(GameError::SuggestionSource(_))
        ));
    }

    #[test]
    fn test_parse_nonzero_code_is_error() {
        let body = json!({"code": -400, "message": "bad request", "data": {}});
        assert!(parse_bilibili_terms(&body).is_err());
    }

    #[tokio::test]
    async fn test_fetch_filters_upstream_terms() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/suggest"))
            .and(query_param("term", "cat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 0,
                "data": {"result": {"tag": [
                    {"term": "cats"},
                    {"term": "scatter"},
                    {"term": "category"}
                ]}}
            })))
            .mount(&server)
            .await;

        let source =
            BilibiliSuggestions::new(format!("{}/suggest", server.uri()), Duration::from_secs(5))
                .unwrap();
        let candidates = source.fetch("cat").await.unwrap();
        assert_eq!(candidates, strings(&["cats", "category"]));
    }

    #[tokio::test]
    async fn test_fetch_non_json_body_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let source = BilibiliSuggestions::new(server.uri(), Duration::from_secs(5)).unwrap();
        assert!(matches!(
            source.fetch("cat").await,
            Err(GameError::SuggestionSource(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_http_error_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let source = BilibiliSuggestions::new(server.uri(), Duration::from_secs(5)).unwrap();
        assert!(source.fetch("cat").await.is_err());
    }

    #[tokio::test]
    async fn test_fetch_timeout_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"code": 0, "data": {}}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let source = BilibiliSuggestions::new(server.uri(), Duration::from_millis(50)).unwrap();
        assert!(matches!(
            source.fetch("cat").await,
            Err(GameError::SuggestionSource(_))
        ));
    }
}
