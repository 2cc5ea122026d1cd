use crate::errors::AppError;
use crate::metrics::{parse_activity, parse_heart_rate, parse_steps};
use crate::models::{
    AppData, DailyActivity, DailyHeartRate, DailySleepSummary, DailySteps, DashboardResponse,
    DataResponse, DateRangeQuery, Dated, TrendsResponse,
};
use crate::sleep::SleepAggregator;
use crate::state::AppState;
use crate::stats::{build_dashboard, build_trends_at, date_key, in_range};
use crate::storage::persist_data;
use crate::ui::render_index;
use axum::{
    extract::{Query, State},
    response::Html,
    Json,
};
use chrono::{Duration, NaiveDate};
use serde_json::Value;
use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use tracing::info;

const DEFAULT_RANGE_DAYS: i64 = 7;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let today = state.zone.today();
    let data = state.data.lock().await;
    Html(render_index(today, &data))
}

pub async fn ingest_sleep(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Json<DataResponse<DailySleepSummary>>, AppError> {
    let nights = SleepAggregator::new(state.zone).aggregate(&payload);
    store(&state, "sleep", nights, |data| &mut data.sleep).await
}

pub async fn ingest_steps(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Json<DataResponse<DailySteps>>, AppError> {
    let days = parse_steps(&state.zone, &payload);
    store(&state, "steps", days, |data| &mut data.steps).await
}

pub async fn ingest_heart_rate(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Json<DataResponse<DailyHeartRate>>, AppError> {
    let days = parse_heart_rate(&state.zone, &payload);
    store(&state, "heart_rate", days, |data| &mut data.heart_rate).await
}

pub async fn ingest_activity(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Json<DataResponse<DailyActivity>>, AppError> {
    let days = parse_activity(&state.zone, &payload);
    store(&state, "activity", days, |data| &mut data.activity).await
}

pub async fn get_sleep(
    State(state): State<AppState>,
    Query(query): Query<DateRangeQuery>,
) -> Result<Json<DataResponse<DailySleepSummary>>, AppError> {
    let keys = key_range(resolve_range(&query, state.zone.today())?);
    let data = state.data.lock().await;
    Ok(Json(DataResponse {
        data: in_range(&data.sleep, keys),
    }))
}

pub async fn get_steps(
    State(state): State<AppState>,
    Query(query): Query<DateRangeQuery>,
) -> Result<Json<DataResponse<DailySteps>>, AppError> {
    let keys = key_range(resolve_range(&query, state.zone.today())?);
    let data = state.data.lock().await;
    Ok(Json(DataResponse {
        data: in_range(&data.steps, keys),
    }))
}

pub async fn get_heart_rate(
    State(state): State<AppState>,
    Query(query): Query<DateRangeQuery>,
) -> Result<Json<DataResponse<DailyHeartRate>>, AppError> {
    let keys = key_range(resolve_range(&query, state.zone.today())?);
    let data = state.data.lock().await;
    Ok(Json(DataResponse {
        data: in_range(&data.heart_rate, keys),
    }))
}

pub async fn get_activity(
    State(state): State<AppState>,
    Query(query): Query<DateRangeQuery>,
) -> Result<Json<DataResponse<DailyActivity>>, AppError> {
    let keys = key_range(resolve_range(&query, state.zone.today())?);
    let data = state.data.lock().await;
    Ok(Json(DataResponse {
        data: in_range(&data.activity, keys),
    }))
}

pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(query): Query<DateRangeQuery>,
) -> Result<Json<DashboardResponse>, AppError> {
    let range = resolve_range(&query, state.zone.today())?;
    let data = state.data.lock().await;
    Ok(Json(build_dashboard(&data, range)))
}

pub async fn get_trends(State(state): State<AppState>) -> Result<Json<TrendsResponse>, AppError> {
    let today = state.zone.today();
    let data = state.data.lock().await;
    Ok(Json(build_trends_at(today, &data)))
}

/// Upserts records by date into a copy of the state, persists the copy while
/// holding the lock and only then swaps it in, so memory never runs ahead of
/// the file.
async fn store<T, F>(
    state: &AppState,
    kind: &'static str,
    records: Vec<T>,
    select: F,
) -> Result<Json<DataResponse<T>>, AppError>
where
    T: Dated + Clone,
    F: FnOnce(&mut AppData) -> &mut BTreeMap<String, T>,
{
    let mut data = state.data.lock().await;
    let mut next = data.clone();
    let map = select(&mut next);
    for record in &records {
        map.insert(record.date().to_string(), record.clone());
    }

    persist_data(&state.data_path, &next).await?;
    *data = next;
    info!(kind, days = records.len(), "stored normalized records");

    Ok(Json(DataResponse { data: records }))
}

fn resolve_range(
    query: &DateRangeQuery,
    today: NaiveDate,
) -> Result<RangeInclusive<NaiveDate>, AppError> {
    let end = match query.end_date.as_deref() {
        Some(value) => parse_date("end_date", value)?,
        None => today,
    };
    let start = match query.start_date.as_deref() {
        Some(value) => parse_date("start_date", value)?,
        None => end - Duration::days(DEFAULT_RANGE_DAYS),
    };

    if start > end {
        return Err(AppError::bad_request("start_date must not be after end_date"));
    }

    Ok(start..=end)
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::bad_request(format!("{field} must be formatted as YYYY-MM-DD")))
}

fn key_range(range: RangeInclusive<NaiveDate>) -> RangeInclusive<String> {
    date_key(*range.start())..=date_key(*range.end())
}
