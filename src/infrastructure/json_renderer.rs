// JSON file render targets - One document per chart target
use crate::application::chart_renderer::ChartRenderer;
use crate::application::error::PipelineError;
use crate::domain::chart::{ChartDescriptor, Granularity, RenderTarget};
use anyhow::Context;
use async_trait::async_trait;
use serde_json::json;
use std::path::{Path, PathBuf};

/// Writes each chart to `{output_dir}/{target}.json`
#[derive(Debug, Clone)]
pub struct JsonFileRenderer {
    output_dir: PathBuf,
}

impl JsonFileRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn target_path(&self, target: &RenderTarget) -> PathBuf {
        self.output_dir.join(format!("{}.json", target))
    }

    async fn write(&self, path: &Path, document: serde_json::Value) -> anyhow::Result<()> {
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .with_context(|| format!("Failed to create {}", self.output_dir.display()))?;

        let bytes = serde_json::to_vec_pretty(&document).context("Failed to encode chart")?;
        tokio::fs::write(path, bytes)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))
    }
}

#[async_trait]
impl ChartRenderer for JsonFileRenderer {
    async fn render(&self, chart: ChartDescriptor) -> anyhow::Result<()> {
        let path = self.target_path(&chart.target);
        let document = json!({
            "status": "ready",
            "chart": chart,
        });
        self.write(&path, document).await
    }

    async fn render_unavailable(
        &self,
        target: &RenderTarget,
        granularity: Granularity,
        error: &PipelineError,
    ) -> anyhow::Result<()> {
        let document = json!({
            "status": "unavailable",
            "granularity": granularity,
            "target": target,
            "error": error.to_string(),
        });
        self.write(&self.target_path(target), document).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::chart_assembly::assemble;
    use crate::domain::chart::{Point, PointSeries, SeriesKey};
    use chrono::{TimeZone, Utc};

    fn read(path: &Path) -> serde_json::Value {
        serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_render_writes_descriptor() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = JsonFileRenderer::new(dir.path().join("charts"));
        let chart = assemble(
            Granularity::Day,
            RenderTarget::new("speed-test-chart--month"),
            vec![PointSeries::new(
                SeriesKey::Median,
                vec![
                    Point::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(), 40.0),
                    Point::new(Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(), f64::NAN),
                ],
            )],
        );

        renderer.render(chart).await.unwrap();

        let doc = read(&dir.path().join("charts/speed-test-chart--month.json"));
        assert_eq!(doc["status"], "ready");
        assert_eq!(doc["chart"]["granularity"], "day");
        assert_eq!(doc["chart"]["target"], "speed-test-chart--month");
        let points = &doc["chart"]["series"][0]["points"];
        assert_eq!(points[0]["t"], "2024-01-01T00:00:00Z");
        assert_eq!(points[0]["y"], 40.0);
        assert!(points[1]["y"].is_null());
    }

    #[tokio::test]
    async fn test_render_unavailable_writes_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = JsonFileRenderer::new(dir.path());
        let target = RenderTarget::new("speed-test-chart--year");
        let error = PipelineError::SourceUnavailable {
            url: "http://localhost:10000/history/lastYear/".to_string(),
            reason: "status 502 Bad Gateway".to_string(),
        };

        renderer
            .render_unavailable(&target, Granularity::Month, &error)
            .await
            .unwrap();

        let doc = read(&renderer.target_path(&target));
        assert_eq!(doc["status"], "unavailable");
        assert_eq!(doc["granularity"], "month");
        assert!(doc["error"].as_str().unwrap().contains("502"));
    }
}
