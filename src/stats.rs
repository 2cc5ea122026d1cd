use crate::metrics::round_to;
use crate::models::{
    AppData, DailyOverview, DashboardMetrics, DashboardResponse, TrendsResponse,
    WeeklySleepPoint, WeeklyStepsPoint,
};
use chrono::{Datelike, Duration, NaiveDate};
use std::collections::BTreeMap;
use std::ops::RangeInclusive;

const WEEK_COUNT: usize = 8;

pub fn build_trends_at(today: NaiveDate, data: &AppData) -> TrendsResponse {
    let mut last_7_days = Vec::with_capacity(7);
    for offset in (0..7).rev() {
        let key = date_key(today - Duration::days(offset));
        let sleep = data.sleep.get(&key);
        last_7_days.push(DailyOverview {
            sleep_minutes: sleep.map(|night| night.total_minutes),
            sleep_efficiency: sleep.map(|night| night.efficiency_percent),
            steps: data.steps.get(&key).map(|day| day.steps),
            date: key,
        });
    }

    let current_week_start = week_start(today);
    let mut weekly_sleep = Vec::with_capacity(WEEK_COUNT);
    let mut weekly_steps = Vec::with_capacity(WEEK_COUNT);

    for offset in (0..WEEK_COUNT).rev() {
        let start = current_week_start - Duration::weeks(offset as i64);
        let end = start + Duration::days(6);

        let mut nights = 0u8;
        let mut total_sum = 0.0;
        let mut deep_sum = 0.0;
        let mut efficiency_sum = 0.0;
        let mut steps_sum = 0i64;
        for day_offset in 0..7 {
            let key = date_key(start + Duration::days(day_offset));
            if let Some(night) = data.sleep.get(&key) {
                nights += 1;
                total_sum += night.total_minutes;
                deep_sum += night.deep_minutes;
                efficiency_sum += night.efficiency_percent;
            }
            if let Some(day) = data.steps.get(&key) {
                steps_sum = steps_sum.saturating_add(day.steps);
            }
        }

        let days_counted = if today < start {
            0
        } else if today > end {
            7
        } else {
            (today - start).num_days() as u8 + 1
        };

        let nights_denom = if nights == 0 { 1.0 } else { f64::from(nights) };
        let days_denom = if days_counted == 0 { 1.0 } else { f64::from(days_counted) };

        weekly_sleep.push(WeeklySleepPoint {
            week: week_label(start),
            start_date: start.to_string(),
            end_date: end.to_string(),
            nights_recorded: nights,
            avg_total_minutes: round_to(total_sum / nights_denom, 2),
            avg_deep_minutes: round_to(deep_sum / nights_denom, 2),
            avg_efficiency: round_to(efficiency_sum / nights_denom, 2),
        });

        weekly_steps.push(WeeklyStepsPoint {
            week: week_label(start),
            days_counted,
            total_steps: steps_sum,
            avg_steps: round_to(steps_sum as f64 / days_denom, 2),
        });
    }

    TrendsResponse {
        last_7_days,
        weekly_sleep,
        weekly_steps,
    }
}

/// Records whose date falls in `range`, plus averages over what was found.
pub fn build_dashboard(data: &AppData, range: RangeInclusive<NaiveDate>) -> DashboardResponse {
    let keys = date_key(*range.start())..=date_key(*range.end());

    let steps = in_range(&data.steps, keys.clone());
    let sleep = in_range(&data.sleep, keys.clone());
    let heart_rate = in_range(&data.heart_rate, keys.clone());
    let activity = in_range(&data.activity, keys);

    let metrics = DashboardMetrics {
        avg_steps: mean(steps.iter().map(|day| day.steps as f64)),
        avg_sleep_minutes: mean(sleep.iter().map(|night| night.total_minutes)),
        avg_sleep_efficiency: mean(sleep.iter().map(|night| night.efficiency_percent)),
        avg_bpm: mean(heart_rate.iter().map(|day| day.avg_bpm)),
    };

    DashboardResponse {
        start_date: range.start().to_string(),
        end_date: range.end().to_string(),
        steps,
        sleep,
        heart_rate,
        activity,
        metrics,
    }
}

pub fn in_range<T: Clone>(records: &BTreeMap<String, T>, keys: RangeInclusive<String>) -> Vec<T> {
    // BTreeMap::range panics on a reversed range.
    if keys.start() > keys.end() {
        return Vec::new();
    }
    records.range(keys).map(|(_, record)| record.clone()).collect()
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
    if count == 0 {
        0.0
    } else {
        round_to(sum / count as f64, 2)
    }
}

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

fn week_label(date: NaiveDate) -> String {
    let iso = date.iso_week();
    format!("{}-W{:02}", iso.year(), iso.week())
}
