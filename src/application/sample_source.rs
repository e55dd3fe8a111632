// Sample sources - Page-embedded samples and the history endpoint seam
use crate::application::error::PipelineError;
use crate::domain::sample::{EmbeddedSample, HistoryRange, HistoryRecord, RawSamples};
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait HistorySource: Send + Sync {
    /// Fetch the records of one history window. One request per call, no caching.
    async fn fetch_history(&self, range: HistoryRange) -> Result<Vec<HistoryRecord>, PipelineError>;
}

/// Acquires the raw samples of each granularity
#[derive(Clone)]
pub struct SampleSourceAdapter {
    page_samples: Arc<Vec<EmbeddedSample>>,
    history: Arc<dyn HistorySource>,
}

impl SampleSourceAdapter {
    pub fn new(page_samples: Vec<EmbeddedSample>, history: Arc<dyn HistorySource>) -> Self {
        Self {
            page_samples: Arc::new(page_samples),
            history,
        }
    }

    /// Samples embedded in the page, newest first. Never suspends.
    pub fn page_samples(&self) -> RawSamples {
        RawSamples::Embedded(self.page_samples.as_ref().clone())
    }

    pub async fn history_samples(&self, range: HistoryRange) -> Result<RawSamples, PipelineError> {
        let records = self.history.fetch_history(range).await?;
        tracing::debug!("Fetched {} history records for {:?}", records.len(), range);
        Ok(RawSamples::History(records))
    }
}
