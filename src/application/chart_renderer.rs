// Render target seam
use crate::application::error::PipelineError;
use crate::domain::chart::{ChartDescriptor, Granularity, RenderTarget};
use async_trait::async_trait;

#[async_trait]
pub trait ChartRenderer: Send + Sync {
    /// Draw a chart on its target. The descriptor is consumed.
    async fn render(&self, chart: ChartDescriptor) -> anyhow::Result<()>;

    /// Put a target whose pipeline failed into its fallback state
    async fn render_unavailable(
        &self,
        target: &RenderTarget,
        granularity: Granularity,
        error: &PipelineError,
    ) -> anyhow::Result<()>;
}
