// Raw sample models - page-embedded results and remote history records
use serde::Deserialize;
use serde_json::Value;

/// A speed-test result embedded in the dashboard page as element attributes.
/// Both fields hold the attribute text as written by the page template.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedSample {
    pub date: String,
    pub download: String,
}

impl EmbeddedSample {
    pub fn new(date: impl Into<String>, download: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            download: download.into(),
        }
    }
}

/// One record of the history endpoints. Field names are the server's wire
/// contract; speed values arrive either as decimal strings or as numbers.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryRecord {
    #[serde(rename = "Time")]
    pub time: String,
    #[serde(rename = "DownloadSpeed", default)]
    pub download_speed: Option<Value>,
    #[serde(rename = "DownloadSpeedMedian", default)]
    pub download_speed_median: Option<Value>,
    #[serde(rename = "DownloadSpeed90th", default)]
    pub download_speed_90th: Option<Value>,
}

impl HistoryRecord {
    pub fn field(&self, field: SpeedField) -> Option<&Value> {
        match field {
            SpeedField::Single => self.download_speed.as_ref(),
            SpeedField::Median => self.download_speed_median.as_ref(),
            SpeedField::Percentile90 => self.download_speed_90th.as_ref(),
        }
    }
}

/// Speed fields a history record may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedField {
    Single,
    Median,
    Percentile90,
}

impl SpeedField {
    pub fn wire_name(self) -> &'static str {
        match self {
            SpeedField::Single => "DownloadSpeed",
            SpeedField::Median => "DownloadSpeedMedian",
            SpeedField::Percentile90 => "DownloadSpeed90th",
        }
    }
}

/// The raw sample collection acquired for one granularity in one build cycle
#[derive(Debug, Clone)]
pub enum RawSamples {
    /// Page order, newest first
    Embedded(Vec<EmbeddedSample>),
    /// Server order, unspecified
    History(Vec<HistoryRecord>),
}

/// History windows served by the speed tester
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HistoryRange {
    LastMonth,
    LastYear,
}

impl HistoryRange {
    /// Endpoint path relative to the site root
    pub fn path(self) -> &'static str {
        match self {
            HistoryRange::LastMonth => "/history/lastMonth/",
            HistoryRange::LastYear => "/history/lastYear/",
        }
    }
}

/// Where a granularity's samples come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleOrigin {
    Page,
    History(HistoryRange),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_record_accepts_strings_and_numbers() {
        let body = r#"[
            {"Time":"2024-01-01T00:00:00Z","DownloadSpeedMedian":"40.0","DownloadSpeed90th":70.5},
            {"Time":"2024-01-02T00:00:00Z","DownloadSpeed":12}
        ]"#;
        let records: Vec<HistoryRecord> = serde_json::from_str(body).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].field(SpeedField::Median), Some(&Value::from("40.0")));
        assert_eq!(records[0].field(SpeedField::Percentile90), Some(&Value::from(70.5)));
        assert!(records[0].field(SpeedField::Single).is_none());
        assert_eq!(records[1].field(SpeedField::Single), Some(&Value::from(12)));
    }

    #[test]
    fn test_history_record_requires_time() {
        let result: Result<Vec<HistoryRecord>, _> =
            serde_json::from_str(r#"[{"DownloadSpeed":"1.0"}]"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_history_paths() {
        assert_eq!(HistoryRange::LastMonth.path(), "/history/lastMonth/");
        assert_eq!(HistoryRange::LastYear.path(), "/history/lastYear/");
    }
}
