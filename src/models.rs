use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SleepStage {
    Awake,
    Light,
    Deep,
    Rem,
    Unknown,
}

impl SleepStage {
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => SleepStage::Awake,
            2 => SleepStage::Light,
            3 => SleepStage::Deep,
            4 => SleepStage::Rem,
            _ => SleepStage::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SleepQuality {
    Excellent,
    Good,
    Average,
    Poor,
}

impl SleepQuality {
    pub fn label(self) -> &'static str {
        match self {
            SleepQuality::Excellent => "Excellent",
            SleepQuality::Good => "Good",
            SleepQuality::Average => "Average",
            SleepQuality::Poor => "Poor",
        }
    }
}

/// One staged interval rebuilt from a point and one of its coded values.
#[derive(Debug, Clone, PartialEq)]
pub struct SleepSegment {
    pub start_time_nanos: i64,
    pub end_time_nanos: i64,
    pub duration_minutes: f64,
    pub stage: SleepStage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySleepSummary {
    pub date: String,
    pub total_minutes: f64,
    pub light_minutes: f64,
    pub deep_minutes: f64,
    pub rem_minutes: f64,
    pub awake_minutes: f64,
    #[serde(rename = "efficiency")]
    pub efficiency_percent: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<SleepQuality>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySteps {
    pub date: String,
    pub steps: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyHeartRate {
    pub date: String,
    pub avg_bpm: f64,
    pub min_bpm: f64,
    pub max_bpm: f64,
    pub readings_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyActivity {
    pub date: String,
    pub calories: f64,
    pub active_minutes: i64,
    /// Kilometres.
    pub distance: f64,
}

/// Records keyed by their `YYYY-MM-DD` date.
pub trait Dated {
    fn date(&self) -> &str;
}

macro_rules! impl_dated {
    ($($ty:ty),*) => {
        $(impl Dated for $ty {
            fn date(&self) -> &str {
                &self.date
            }
        })*
    };
}

impl_dated!(DailySleepSummary, DailySteps, DailyHeartRate, DailyActivity);

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppData {
    #[serde(default)]
    pub sleep: BTreeMap<String, DailySleepSummary>,
    #[serde(default)]
    pub steps: BTreeMap<String, DailySteps>,
    #[serde(default)]
    pub heart_rate: BTreeMap<String, DailyHeartRate>,
    #[serde(default)]
    pub activity: BTreeMap<String, DailyActivity>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DateRangeQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub data: Vec<T>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct DashboardMetrics {
    pub avg_steps: f64,
    pub avg_sleep_minutes: f64,
    pub avg_sleep_efficiency: f64,
    pub avg_bpm: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub start_date: String,
    pub end_date: String,
    pub steps: Vec<DailySteps>,
    pub sleep: Vec<DailySleepSummary>,
    pub heart_rate: Vec<DailyHeartRate>,
    pub activity: Vec<DailyActivity>,
    pub metrics: DashboardMetrics,
}

#[derive(Debug, Serialize)]
pub struct DailyOverview {
    pub date: String,
    pub sleep_minutes: Option<f64>,
    pub sleep_efficiency: Option<f64>,
    pub steps: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct WeeklySleepPoint {
    pub week: String,
    pub start_date: String,
    pub end_date: String,
    pub nights_recorded: u8,
    pub avg_total_minutes: f64,
    pub avg_deep_minutes: f64,
    pub avg_efficiency: f64,
}

#[derive(Debug, Serialize)]
pub struct WeeklyStepsPoint {
    pub week: String,
    pub days_counted: u8,
    pub total_steps: i64,
    pub avg_steps: f64,
}

#[derive(Debug, Serialize)]
pub struct TrendsResponse {
    pub last_7_days: Vec<DailyOverview>,
    pub weekly_sleep: Vec<WeeklySleepPoint>,
    pub weekly_steps: Vec<WeeklyStepsPoint>,
}
