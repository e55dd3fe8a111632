// Main entry point - Dependency injection and one chart build cycle
mod application;
mod domain;
mod infrastructure;

use std::{sync::Arc, time::Duration};
use tracing_subscriber::EnvFilter;

use crate::application::dashboard_service::DashboardService;
use crate::application::sample_source::SampleSourceAdapter;
use crate::infrastructure::config::load_dashboard_config;
use crate::infrastructure::history_client::HttpHistoryClient;
use crate::infrastructure::json_renderer::JsonFileRenderer;
use crate::infrastructure::page_snapshot::PageSnapshot;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration and the page the charts belong to
    let config = load_dashboard_config()?;
    let snapshot = PageSnapshot::load(&config.page_snapshot)?;
    let site_root = config.resolve_site_root(snapshot.site_root.as_deref());

    // Create sources (infrastructure layer)
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()?;
    let history = Arc::new(HttpHistoryClient::new(client, &config.base_url, &site_root));
    let sources = SampleSourceAdapter::new(snapshot.samples, history);

    // Run one build cycle
    let service = DashboardService::new(sources, config.render_targets(), config.value_policy);
    let renderer = JsonFileRenderer::new(&config.output_dir);
    let report = service.build_charts(&renderer).await;

    tracing::info!(
        "Build finished: {} rendered, {} unavailable, {} render errors",
        report.rendered.len(),
        report.unavailable.len(),
        report.render_errors.len()
    );

    Ok(())
}
