// HTTP history source - Fetches speed-test history from the speed tester
use crate::application::error::PipelineError;
use crate::application::sample_source::HistorySource;
use crate::domain::sample::{HistoryRange, HistoryRecord};
use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct HttpHistoryClient {
    client: reqwest::Client,
    base_url: String,
    site_root: String,
}

impl HttpHistoryClient {
    pub fn new(client: reqwest::Client, base_url: &str, site_root: &str) -> Self {
        let site_root = site_root.trim().trim_matches('/');
        let site_root = if site_root.is_empty() {
            String::new()
        } else {
            format!("/{}", site_root)
        };

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            site_root,
        }
    }

    pub fn history_url(&self, range: HistoryRange) -> String {
        format!("{}{}{}", self.base_url, self.site_root, range.path())
    }
}

#[async_trait]
impl HistorySource for HttpHistoryClient {
    async fn fetch_history(&self, range: HistoryRange) -> Result<Vec<HistoryRecord>, PipelineError> {
        let url = self.history_url(range);
        let unavailable = |reason: String| PipelineError::SourceUnavailable {
            url: url.clone(),
            reason,
        };

        tracing::debug!("Fetching history from {}", url);
        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(unavailable(format!("status {}", response.status())));
        }

        let body = response
            .text()
            .await
            .map_err(|e| unavailable(format!("failed to read body: {}", e)))?;

        decode_history(&body)
    }
}

/// Decode a history body. The server encodes an empty history as `null`.
pub fn decode_history(body: &str) -> Result<Vec<HistoryRecord>, PipelineError> {
    let records: Option<Vec<HistoryRecord>> = serde_json::from_str(body)
        .map_err(|e| PipelineError::malformed(format!("invalid history body: {}", e)))?;

    Ok(records.unwrap_or_default())
}
