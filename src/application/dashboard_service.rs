// Dashboard service - Runs one chart pipeline per granularity and dispatches the results
use crate::application::chart_assembly::assemble;
use crate::application::chart_renderer::ChartRenderer;
use crate::application::error::PipelineError;
use crate::application::normalizer::{normalize, ValuePolicy};
use crate::application::orderer::order_series;
use crate::application::sample_source::SampleSourceAdapter;
use crate::domain::chart::{ChartDescriptor, Granularity, PointSeries, RenderTarget, RenderTargets};
use crate::domain::sample::{RawSamples, SampleOrigin};
use futures::StreamExt;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

/// Outcome of one granularity's pipeline
#[derive(Debug)]
pub enum ChartMessage {
    Ready(ChartDescriptor),
    Failed {
        granularity: Granularity,
        target: RenderTarget,
        error: PipelineError,
    },
}

/// Targets touched by one build cycle
#[derive(Debug, Default)]
pub struct BuildReport {
    pub rendered: Vec<RenderTarget>,
    pub unavailable: Vec<RenderTarget>,
    pub render_errors: Vec<RenderTarget>,
}

#[derive(Clone)]
pub struct DashboardService {
    sources: SampleSourceAdapter,
    targets: RenderTargets,
    policy: ValuePolicy,
}

impl DashboardService {
    pub fn new(sources: SampleSourceAdapter, targets: RenderTargets, policy: ValuePolicy) -> Self {
        Self {
            sources,
            targets,
            policy,
        }
    }

    /// Start one build cycle. The page pipeline completes inline; each history
    /// pipeline runs as its own task. Messages arrive in completion order and
    /// the channel closes once every pipeline has reported.
    pub async fn stream_charts(&self) -> mpsc::Receiver<ChartMessage> {
        let (tx, rx) = mpsc::channel(Granularity::ALL.len());

        for granularity in Granularity::ALL {
            let target = self.targets.for_granularity(granularity).clone();
            let policy = self.policy;

            match granularity.origin() {
                SampleOrigin::Page => {
                    let samples = self.sources.page_samples();
                    let msg = into_message(granularity, target, run_pipeline(granularity, samples, policy));
                    let _ = tx.send(msg).await;
                }
                SampleOrigin::History(range) => {
                    let tx = tx.clone();
                    let sources = self.sources.clone();

                    tokio::spawn(async move {
                        let start = Instant::now();
                        let result = match sources.history_samples(range).await {
                            Ok(samples) => run_pipeline(granularity, samples, policy),
                            Err(e) => Err(e),
                        };
                        tracing::debug!(
                            "{} pipeline finished in {}ms",
                            granularity,
                            start.elapsed().as_millis()
                        );
                        let _ = tx.send(into_message(granularity, target, result)).await;
                    });
                }
            }
        }

        rx
    }

    /// Run one build cycle and deliver each chart to its target as soon as its
    /// pipeline completes. A failed pipeline only affects its own target.
    pub async fn build_charts(&self, renderer: &dyn ChartRenderer) -> BuildReport {
        let mut report = BuildReport::default();
        let mut messages = ReceiverStream::new(self.stream_charts().await);

        while let Some(msg) = messages.next().await {
            match msg {
                ChartMessage::Ready(chart) => {
                    let target = chart.target.clone();
                    match renderer.render(chart).await {
                        Ok(()) => {
                            tracing::info!("Rendered {}", target);
                            report.rendered.push(target);
                        }
                        Err(e) => {
                            tracing::error!("Failed to render {}: {:#}", target, e);
                            report.render_errors.push(target);
                        }
                    }
                }
                ChartMessage::Failed {
                    granularity,
                    target,
                    error,
                } => {
                    tracing::error!("{} chart unavailable: {}", granularity, error);
                    if let Err(e) = renderer.render_unavailable(&target, granularity, &error).await {
                        tracing::error!("Failed to render fallback for {}: {:#}", target, e);
                        report.render_errors.push(target);
                    } else {
                        report.unavailable.push(target);
                    }
                }
            }
        }

        report
    }
}

/// Normalize, order and assemble one granularity's samples
pub fn run_pipeline(
    granularity: Granularity,
    samples: RawSamples,
    policy: ValuePolicy,
) -> Result<PipelineOutput, PipelineError> {
    let normalized = normalize(&samples, policy)?;
    for warning in &normalized.warnings {
        tracing::warn!("{} chart: {}", granularity, warning);
    }

    let series = order_series(normalized.series, granularity.origin());
    Ok(PipelineOutput {
        granularity,
        series,
    })
}

/// Ordered series awaiting assembly onto a target
#[derive(Debug)]
pub struct PipelineOutput {
    granularity: Granularity,
    series: Vec<PointSeries>,
}

fn into_message(
    granularity: Granularity,
    target: RenderTarget,
    result: Result<PipelineOutput, PipelineError>,
) -> ChartMessage {
    match result {
        Ok(output) => ChartMessage::Ready(assemble(output.granularity, target, output.series)),
        Err(error) => ChartMessage::Failed {
            granularity,
            target,
            error,
        },
    }
}
