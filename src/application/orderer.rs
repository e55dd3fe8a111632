// Temporal orderer - Puts every series in oldest-to-newest order
use crate::domain::chart::{Point, PointSeries};
use crate::domain::sample::SampleOrigin;

/// Order normalized series for rendering.
///
/// History series are sorted by timestamp. Page series arrive newest first
/// and are reversed as-is; the result is checked but not re-sorted.
pub fn order_series(mut series: Vec<PointSeries>, origin: SampleOrigin) -> Vec<PointSeries> {
    for s in &mut series {
        match origin {
            SampleOrigin::History(_) => sort_ascending(&mut s.points),
            SampleOrigin::Page => reverse_page_order(&mut s.points),
        }
    }
    series
}

/// Stable ascending sort by timestamp; equal timestamps keep their relative order
pub fn sort_ascending(points: &mut [Point]) {
    points.sort_by_key(|p| p.t);
}

/// Reverse newest-first page order into oldest-first
pub fn reverse_page_order(points: &mut [Point]) {
    points.reverse();

    if let Some(i) = first_out_of_order(points) {
        tracing::warn!(
            "Page samples were not newest-first: point {} ({}) precedes point {} ({}) after reversal",
            i,
            points[i].t,
            i + 1,
            points[i + 1].t
        );
    }
}

fn first_out_of_order(points: &[Point]) -> Option<usize> {
    points.windows(2).position(|w| w[0].t > w[1].t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chart::SeriesKey;
    use crate::domain::sample::HistoryRange;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn points(pairs: &[(i64, f64)]) -> Vec<Point> {
        pairs.iter().map(|&(t, y)| Point::new(at(t), y)).collect()
    }

    fn values(points: &[Point]) -> Vec<f64> {
        points.iter().map(|p| p.y).collect()
    }

    #[test]
    fn test_sort_orders_by_timestamp() {
        let mut pts = points(&[(3, 30.0), (1, 10.0), (2, 20.0)]);

        sort_ascending(&mut pts);

        assert_eq!(pts.iter().map(|p| p.t).collect::<Vec<_>>(), vec![at(1), at(2), at(3)]);
        assert_eq!(values(&pts), vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn test_sort_is_idempotent() {
        let mut once = points(&[(5, 1.0), (2, 2.0), (9, 3.0), (2, 4.0), (1, 5.0)]);
        sort_ascending(&mut once);
        let mut twice = once.clone();
        sort_ascending(&mut twice);

        assert_eq!(values(&once), values(&twice));
    }

    #[test]
    fn test_sort_keeps_ties_in_input_order() {
        let mut pts = points(&[(2, 1.0), (1, 2.0), (2, 3.0), (2, 4.0)]);

        sort_ascending(&mut pts);

        assert_eq!(values(&pts), vec![2.0, 1.0, 3.0, 4.0]);
    }

    #[test]
    fn test_page_order_is_reversed() {
        let mut pts = points(&[(30, 3.0), (20, 2.0), (10, 1.0)]);

        reverse_page_order(&mut pts);

        assert_eq!(values(&pts), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_page_order_reversal_does_not_sort() {
        // Already-ascending page data comes out reversed
        let mut pts = points(&[(10, 1.0), (20, 2.0), (30, 3.0)]);

        reverse_page_order(&mut pts);

        assert_eq!(values(&pts), vec![3.0, 2.0, 1.0]);
        assert_eq!(first_out_of_order(&pts), Some(0));
    }

    #[test]
    fn test_order_series_by_origin() {
        let history = vec![
            PointSeries::new(SeriesKey::Median, points(&[(3, 3.0), (1, 1.0), (2, 2.0)])),
            PointSeries::new(SeriesKey::P90, points(&[(3, 6.0), (1, 4.0), (2, 5.0)])),
        ];
        let ordered = order_series(history, SampleOrigin::History(HistoryRange::LastMonth));
        assert_eq!(values(&ordered[0].points), vec![1.0, 2.0, 3.0]);
        assert_eq!(values(&ordered[1].points), vec![4.0, 5.0, 6.0]);

        let page = vec![PointSeries::new(SeriesKey::Median, points(&[(2, 2.0), (1, 1.0)]))];
        let ordered = order_series(page, SampleOrigin::Page);
        assert_eq!(values(&ordered[0].points), vec![1.0, 2.0]);
    }
}
