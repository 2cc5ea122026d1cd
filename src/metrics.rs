//! Daily steps, heart rate and activity from provider aggregate responses.

use crate::config::Zone;
use crate::fit::RawResponse;
use crate::models::{DailyActivity, DailyHeartRate, DailySteps};
use serde_json::Value;
use tracing::debug;

pub fn parse_steps(zone: &Zone, response: &Value) -> Vec<DailySteps> {
    RawResponse::new(response)
        .buckets()
        .map(|bucket| {
            // Step deltas carry a single value per point.
            let steps = bucket
                .datasets()
                .flat_map(|dataset| dataset.points())
                .filter_map(|point| point.values().next().and_then(|value| value.int_val()))
                .sum();
            DailySteps {
                date: zone.date_key(bucket.start_time_millis()),
                steps,
            }
        })
        .collect()
}

pub fn parse_heart_rate(zone: &Zone, response: &Value) -> Vec<DailyHeartRate> {
    let mut days = Vec::new();

    for bucket in RawResponse::new(response).buckets() {
        let date = zone.date_key(bucket.start_time_millis());
        let readings: Vec<f64> = bucket
            .datasets()
            .flat_map(|dataset| dataset.points())
            .flat_map(|point| point.values())
            .filter_map(|value| value.fp_val())
            .collect();

        if readings.is_empty() {
            debug!(%date, "heart rate bucket has no readings");
            continue;
        }

        let sum: f64 = readings.iter().sum();
        days.push(DailyHeartRate {
            date,
            avg_bpm: round_to(sum / readings.len() as f64, 1),
            min_bpm: readings.iter().copied().fold(f64::INFINITY, f64::min),
            max_bpm: readings.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            readings_count: readings.len(),
        });
    }

    days
}

/// Datasets are told apart by their `dataSourceId`.
pub fn parse_activity(zone: &Zone, response: &Value) -> Vec<DailyActivity> {
    let mut days = Vec::new();

    for bucket in RawResponse::new(response).buckets() {
        let mut calories = 0.0;
        let mut active_minutes = 0;
        let mut distance_m = 0.0;

        for dataset in bucket.datasets() {
            let source = dataset.data_source_id();
            for value in dataset.points().flat_map(|point| point.values()) {
                if source.contains("calories") {
                    calories += value.fp_val().unwrap_or(0.0);
                } else if source.contains("active_minutes") {
                    active_minutes += value.int_val().unwrap_or(0);
                } else if source.contains("distance") {
                    distance_m += value.fp_val().unwrap_or(0.0);
                }
            }
        }

        days.push(DailyActivity {
            date: zone.date_key(bucket.start_time_millis()),
            calories: round_to(calories, 2),
            active_minutes,
            distance: round_to(distance_m / 1000.0, 2),
        });
    }

    days
}

pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // 2021-04-05T00:00:00Z and the following day
    const APRIL_FIFTH: &str = "1617580800000";
    const APRIL_SIXTH: &str = "1617667200000";

    #[test]
    fn steps_sum_first_value_per_point() {
        let payload = json!({
            "bucket": [
                { "startTimeMillis": APRIL_FIFTH, "dataset": [{ "point": [
                    { "value": [{ "intVal": 7500 }] },
                    { "value": [{ "intVal": 250 }, { "intVal": 99999 }] },
                ]}]},
                { "startTimeMillis": APRIL_SIXTH, "dataset": [{ "point": [
                    { "value": [{ "intVal": 9000 }] },
                ]}]},
                { "startTimeMillis": APRIL_SIXTH, "dataset": [] },
            ]
        });

        let days = parse_steps(&Zone::utc(), &payload);
        assert_eq!(
            days,
            vec![
                DailySteps { date: "2021-04-05".into(), steps: 7750 },
                DailySteps { date: "2021-04-06".into(), steps: 9000 },
                DailySteps { date: "2021-04-06".into(), steps: 0 },
            ]
        );
    }

    #[test]
    fn heart_rate_summarizes_readings() {
        let payload = json!({
            "bucket": [
                { "startTimeMillis": APRIL_FIFTH, "dataset": [{ "point": [
                    { "value": [{ "fpVal": 70.0 }, { "fpVal": 75.0 }, { "fpVal": 80.0 }] },
                ]}]},
                { "startTimeMillis": APRIL_SIXTH, "dataset": [{ "point": [] }] },
            ]
        });

        let days = parse_heart_rate(&Zone::utc(), &payload);
        assert_eq!(days.len(), 1);
        let day = &days[0];
        assert_eq!(day.date, "2021-04-05");
        assert_eq!(day.avg_bpm, 75.0);
        assert_eq!(day.min_bpm, 70.0);
        assert_eq!(day.max_bpm, 80.0);
        assert_eq!(day.readings_count, 3);
    }

    #[test]
    fn activity_splits_by_source() {
        let payload = json!({
            "bucket": [{
                "startTimeMillis": APRIL_FIFTH,
                "dataset": [
                    {
                        "dataSourceId": "derived:com.google.calories.expended:com.google.android.gms:merge_calories_expended",
                        "point": [{ "value": [{ "fpVal": 1800.456 }] }],
                    },
                    {
                        "dataSourceId": "derived:com.google.active_minutes:com.google.android.gms:merge_active_minutes",
                        "point": [{ "value": [{ "intVal": 30 }] }, { "value": [{ "intVal": 12 }] }],
                    },
                    {
                        "dataSourceId": "derived:com.google.distance.delta:com.google.android.gms:merge_distance_delta",
                        "point": [{ "value": [{ "fpVal": 4250.0 }] }],
                    },
                ],
            }]
        });

        let days = parse_activity(&Zone::utc(), &payload);
        assert_eq!(
            days,
            vec![DailyActivity {
                date: "2021-04-05".into(),
                calories: 1800.46,
                active_minutes: 42,
                distance: 4.25,
            }]
        );
    }

    #[test]
    fn rounding() {
        assert_eq!(round_to(72.46, 1), 72.5);
        assert_eq!(round_to(1.005, 0), 1.0);
    }
}
