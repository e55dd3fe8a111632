// Chart domain models - points, series and renderer-agnostic chart descriptors
use super::sample::{HistoryRange, SampleOrigin};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// A single plotted value. `y` is NaN when the source value could not be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub t: DateTime<Utc>,
    pub y: f64,
}

impl Point {
    pub fn new(t: DateTime<Utc>, y: f64) -> Self {
        Self { t, y }
    }
}

/// Time bucket of one chart; selects both the axis unit and the sample source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Hour,
    Day,
    Month,
}

impl Granularity {
    pub const ALL: [Granularity; 3] = [Granularity::Hour, Granularity::Day, Granularity::Month];

    pub fn time_unit(self) -> TimeUnit {
        match self {
            Granularity::Hour => TimeUnit::Hour,
            Granularity::Day => TimeUnit::Day,
            Granularity::Month => TimeUnit::Month,
        }
    }

    pub fn origin(self) -> SampleOrigin {
        match self {
            Granularity::Hour => SampleOrigin::Page,
            Granularity::Day => SampleOrigin::History(HistoryRange::LastMonth),
            Granularity::Month => SampleOrigin::History(HistoryRange::LastYear),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Granularity::Hour => "hour",
            Granularity::Day => "day",
            Granularity::Month => "month",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Hour,
    Day,
    Month,
}

/// Identity of a series within a chart. `Median` is the primary series;
/// sources with a single speed field report into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKey {
    Median,
    P90,
}

/// An unstyled series as produced by normalization
#[derive(Debug, Clone, PartialEq)]
pub struct PointSeries {
    pub key: SeriesKey,
    pub points: Vec<Point>,
}

impl PointSeries {
    pub fn new(key: SeriesKey, points: Vec<Point>) -> Self {
        Self { key, points }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    /// Monotone cubic
    Monotone,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesStyle {
    pub border_color: &'static str,
    pub background_color: &'static str,
    pub point_border_color: &'static str,
    pub border_width: u32,
    pub interpolation: Interpolation,
    pub fill: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub key: SeriesKey,
    pub style: SeriesStyle,
    pub points: Vec<Point>,
}

impl Series {
    pub fn new(key: SeriesKey, style: SeriesStyle, points: Vec<Point>) -> Self {
        Self { key, style, points }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AxisScale {
    Time { unit: TimeUnit },
    Linear,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub scale: AxisScale,
    pub grid_color: &'static str,
    pub tick_color: &'static str,
    pub draw_on_chart_area: bool,
}

/// Identifier of the drawing surface a chart is delivered to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RenderTarget(String);

impl RenderTarget {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for RenderTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fully resolved description of one chart. Built once per granularity per
/// build cycle and moved into the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDescriptor {
    pub granularity: Granularity,
    pub target: RenderTarget,
    pub series: Vec<Series>,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub legend: bool,
}

impl ChartDescriptor {
    pub fn new(
        granularity: Granularity,
        target: RenderTarget,
        series: Vec<Series>,
        x_axis: Axis,
        y_axis: Axis,
        legend: bool,
    ) -> Self {
        Self {
            granularity,
            target,
            series,
            x_axis,
            y_axis,
            legend,
        }
    }
}

/// The three render targets of the dashboard, one per granularity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderTargets {
    pub hour: RenderTarget,
    pub day: RenderTarget,
    pub month: RenderTarget,
}

impl RenderTargets {
    pub fn for_granularity(&self, granularity: Granularity) -> &RenderTarget {
        match granularity {
            Granularity::Hour => &self.hour,
            Granularity::Day => &self.day,
            Granularity::Month => &self.month,
        }
    }
}

impl Default for RenderTargets {
    fn default() -> Self {
        Self {
            hour: RenderTarget::new("speed-test-chart--day"),
            day: RenderTarget::new("speed-test-chart--month"),
            month: RenderTarget::new("speed-test-chart--year"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_granularity_units_and_origins() {
        assert_eq!(Granularity::Hour.time_unit(), TimeUnit::Hour);
        assert_eq!(Granularity::Day.time_unit(), TimeUnit::Day);
        assert_eq!(Granularity::Month.time_unit(), TimeUnit::Month);

        assert_eq!(Granularity::Hour.origin(), SampleOrigin::Page);
        assert_eq!(
            Granularity::Day.origin(),
            SampleOrigin::History(HistoryRange::LastMonth)
        );
        assert_eq!(
            Granularity::Month.origin(),
            SampleOrigin::History(HistoryRange::LastYear)
        );
    }

    #[test]
    fn test_default_targets_are_distinct() {
        let targets = RenderTargets::default();
        assert_ne!(targets.hour, targets.day);
        assert_ne!(targets.day, targets.month);
        assert_eq!(
            targets.for_granularity(Granularity::Month),
            &RenderTarget::new("speed-test-chart--year")
        );
    }

    #[test]
    fn test_point_serializes_nan_as_null() {
        let t = DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let json = serde_json::to_value(Point::new(t, f64::NAN)).unwrap();
        assert_eq!(json["t"], "2024-01-01T00:00:00Z");
        assert!(json["y"].is_null());
    }
}
