// Series normalizer - Maps raw samples into timestamped point series
use crate::application::error::{ParseWarning, PipelineError};
use crate::domain::chart::{Point, PointSeries, SeriesKey};
use crate::domain::sample::{EmbeddedSample, HistoryRecord, RawSamples, SpeedField};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::Value;

const EMBEDDED_DOWNLOAD_FIELD: &str = "data-download";

/// How unparseable speed values are treated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValuePolicy {
    /// Keep the point with a NaN value and report a warning
    #[default]
    Tolerant,
    /// Fail the pipeline with `InvalidValue`
    Strict,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub series: Vec<PointSeries>,
    pub warnings: Vec<ParseWarning>,
}

/// Normalize one granularity's samples into one or two series.
///
/// Page samples always yield a single `Median` series. History records yield
/// a `Median` series (from `DownloadSpeedMedian`, falling back to
/// `DownloadSpeed`) and a `P90` series when any record carries
/// `DownloadSpeed90th`. Every series has one point per input record.
pub fn normalize(samples: &RawSamples, policy: ValuePolicy) -> Result<Normalized, PipelineError> {
    let mut warnings = Vec::new();
    let series = match samples {
        RawSamples::Embedded(samples) => vec![normalize_embedded(samples, policy, &mut warnings)?],
        RawSamples::History(records) => normalize_history(records, policy, &mut warnings)?,
    };

    Ok(Normalized { series, warnings })
}

fn normalize_embedded(
    samples: &[EmbeddedSample],
    policy: ValuePolicy,
    warnings: &mut Vec<ParseWarning>,
) -> Result<PointSeries, PipelineError> {
    let points = samples
        .iter()
        .enumerate()
        .map(|(index, sample)| {
            let t = parse_timestamp(&sample.date).ok_or_else(|| {
                PipelineError::malformed(format!(
                    "sample {} has unparseable date {:?}",
                    index, sample.date
                ))
            })?;
            let y = resolve_value(
                parse_decimal(&sample.download),
                index,
                EMBEDDED_DOWNLOAD_FIELD,
                || sample.download.clone(),
                policy,
                warnings,
            )?;
            Ok(Point::new(t, y))
        })
        .collect::<Result<Vec<_>, PipelineError>>()?;

    Ok(PointSeries::new(SeriesKey::Median, points))
}

fn normalize_history(
    records: &[HistoryRecord],
    policy: ValuePolicy,
    warnings: &mut Vec<ParseWarning>,
) -> Result<Vec<PointSeries>, PipelineError> {
    if records.is_empty() {
        return Ok(vec![PointSeries::new(SeriesKey::Median, Vec::new())]);
    }

    let carried = |field: SpeedField| records.iter().any(|r| r.field(field).is_some());

    let primary = if carried(SpeedField::Median) {
        SpeedField::Median
    } else if carried(SpeedField::Single) {
        SpeedField::Single
    } else {
        return Err(PipelineError::malformed(
            "history records carry no download speed field",
        ));
    };

    let timestamps = records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            parse_timestamp(&record.time).ok_or_else(|| {
                PipelineError::malformed(format!(
                    "record {} has unparseable Time {:?}",
                    index, record.time
                ))
            })
        })
        .collect::<Result<Vec<_>, PipelineError>>()?;

    let mut series = vec![extract_series(
        records,
        &timestamps,
        primary,
        SeriesKey::Median,
        policy,
        warnings,
    )?];

    if carried(SpeedField::Percentile90) {
        series.push(extract_series(
            records,
            &timestamps,
            SpeedField::Percentile90,
            SeriesKey::P90,
            policy,
            warnings,
        )?);
    }

    Ok(series)
}

fn extract_series(
    records: &[HistoryRecord],
    timestamps: &[DateTime<Utc>],
    field: SpeedField,
    key: SeriesKey,
    policy: ValuePolicy,
    warnings: &mut Vec<ParseWarning>,
) -> Result<PointSeries, PipelineError> {
    let points = records
        .iter()
        .zip(timestamps)
        .enumerate()
        .map(|(index, (record, t))| {
            let raw = record.field(field);
            let y = resolve_value(
                raw.and_then(parse_json_value),
                index,
                field.wire_name(),
                || raw.map(describe_value).unwrap_or_else(|| "<missing>".to_string()),
                policy,
                warnings,
            )?;
            Ok(Point::new(*t, y))
        })
        .collect::<Result<Vec<_>, PipelineError>>()?;

    Ok(PointSeries::new(key, points))
}

fn resolve_value(
    parsed: Option<f64>,
    index: usize,
    field: &'static str,
    raw: impl FnOnce() -> String,
    policy: ValuePolicy,
    warnings: &mut Vec<ParseWarning>,
) -> Result<f64, PipelineError> {
    match (parsed, policy) {
        (Some(value), _) => Ok(value),
        (None, ValuePolicy::Tolerant) => {
            warnings.push(ParseWarning {
                index,
                field,
                raw: raw(),
            });
            Ok(f64::NAN)
        }
        (None, ValuePolicy::Strict) => Err(PipelineError::InvalidValue {
            field,
            raw: raw(),
            index,
        }),
    }
}

/// Parse an RFC 3339 instant, or a bare `YYYY-MM-DD` date as UTC midnight
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|n| n.and_utc())
        })
}

/// Parse a decimal speed value. Non-finite results count as failures.
pub fn parse_decimal(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_json_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => parse_decimal(s),
        _ => None,
    }
}

fn describe_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
