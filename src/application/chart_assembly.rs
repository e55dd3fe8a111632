// Chart assembly - Builds renderer-agnostic chart descriptors
use crate::domain::chart::{
    Axis, AxisScale, ChartDescriptor, Granularity, Interpolation, PointSeries, RenderTarget,
    Series, SeriesKey, SeriesStyle,
};

const GRID_COLOR: &str = "#888";
const TICK_COLOR: &str = "#eee";

const MEDIAN_STYLE: SeriesStyle = SeriesStyle {
    border_color: "#888",
    background_color: "#ccc",
    point_border_color: "#ccc",
    border_width: 2,
    interpolation: Interpolation::Monotone,
    fill: false,
};

const P90_STYLE: SeriesStyle = SeriesStyle {
    border_color: "#e07b39",
    background_color: "#f0b48a",
    point_border_color: "#f0b48a",
    border_width: 2,
    interpolation: Interpolation::Monotone,
    fill: false,
};

pub fn style_for(key: SeriesKey) -> SeriesStyle {
    match key {
        SeriesKey::Median => MEDIAN_STYLE,
        SeriesKey::P90 => P90_STYLE,
    }
}

/// Build the line chart for one granularity: one curve per series, a time
/// x axis in the granularity's unit, a linear y axis and no legend.
pub fn assemble(
    granularity: Granularity,
    target: RenderTarget,
    series: Vec<PointSeries>,
) -> ChartDescriptor {
    let series = series
        .into_iter()
        .map(|s| Series::new(s.key, style_for(s.key), s.points))
        .collect();

    ChartDescriptor::new(
        granularity,
        target,
        series,
        axis(AxisScale::Time {
            unit: granularity.time_unit(),
        }),
        axis(AxisScale::Linear),
        false,
    )
}

fn axis(scale: AxisScale) -> Axis {
    Axis {
        scale,
        grid_color: GRID_COLOR,
        tick_color: TICK_COLOR,
        draw_on_chart_area: false,
    }
}
