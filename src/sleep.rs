//! Per-day sleep summaries from a provider sleep-segment aggregate.
//!
//! Each bucket becomes at most one [`DailySleepSummary`]. The bucket's start
//! time picks the calendar day, so a segment running past midnight still
//! belongs to the day its bucket opened on. A point carrying several coded
//! values contributes its full duration once per value.

use crate::config::Zone;
use crate::fit::{RawBucket, RawResponse};
use crate::models::{DailySleepSummary, SleepQuality, SleepSegment, SleepStage};
use serde_json::Value;
use tracing::debug;

const NANOS_PER_MINUTE: f64 = 1e9 * 60.0;

/// Aggregates using host-local calendar days.
pub fn aggregate(response: &Value) -> Vec<DailySleepSummary> {
    SleepAggregator::default().aggregate(response)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SleepAggregator {
    zone: Zone,
    skip_degenerate_points: bool,
}

impl SleepAggregator {
    pub fn new(zone: Zone) -> Self {
        Self {
            zone,
            skip_degenerate_points: false,
        }
    }

    /// Strict mode: ignore points with a zero start or end, or a duration
    /// that is not positive. Off by default.
    pub fn skip_degenerate_points(mut self, skip: bool) -> Self {
        self.skip_degenerate_points = skip;
        self
    }

    pub fn aggregate(&self, response: &Value) -> Vec<DailySleepSummary> {
        let mut summaries = Vec::new();

        for bucket in RawResponse::new(response).buckets() {
            let date = self.zone.date_key(bucket.start_time_millis());
            let segments = self.segments(bucket);
            if segments.is_empty() {
                debug!(%date, "sleep bucket has no staged segments");
                continue;
            }
            summaries.push(summarize(date, &segments));
        }

        summaries
    }

    pub fn segments(&self, bucket: RawBucket<'_>) -> Vec<SleepSegment> {
        let mut segments = Vec::new();

        for point in bucket.datasets().flat_map(|dataset| dataset.points()) {
            let start_time_nanos = point.start_time_nanos();
            let end_time_nanos = point.end_time_nanos();
            let duration_minutes =
                end_time_nanos.saturating_sub(start_time_nanos) as f64 / NANOS_PER_MINUTE;

            if self.skip_degenerate_points
                && (start_time_nanos == 0 || end_time_nanos == 0 || duration_minutes <= 0.0)
            {
                continue;
            }

            for code in point.values().filter_map(|value| value.int_val()) {
                segments.push(SleepSegment {
                    start_time_nanos,
                    end_time_nanos,
                    duration_minutes,
                    stage: SleepStage::from_code(code),
                });
            }
        }

        segments
    }
}

fn summarize(date: String, segments: &[SleepSegment]) -> DailySleepSummary {
    let mut light = 0.0;
    let mut deep = 0.0;
    let mut rem = 0.0;
    let mut awake = 0.0;
    let mut unknown = 0.0;

    for segment in segments {
        match segment.stage {
            SleepStage::Light => light += segment.duration_minutes,
            SleepStage::Deep => deep += segment.duration_minutes,
            SleepStage::Rem => rem += segment.duration_minutes,
            SleepStage::Awake => awake += segment.duration_minutes,
            SleepStage::Unknown => unknown += segment.duration_minutes,
        }
    }

    // Same order as the named stages, so their sum never exceeds the total.
    let total = light + deep + rem + awake + unknown;

    DailySleepSummary {
        date,
        total_minutes: total,
        light_minutes: light,
        deep_minutes: deep,
        rem_minutes: rem,
        awake_minutes: awake,
        efficiency_percent: efficiency_percent(total, awake),
        quality: quality(total, light, deep, rem),
    }
}

/// Share of recorded time not spent awake; `0` for an empty night.
pub fn efficiency_percent(total_minutes: f64, awake_minutes: f64) -> f64 {
    if total_minutes == 0.0 {
        return 0.0;
    }
    (total_minutes - awake_minutes) / total_minutes * 100.0
}

/// Deep sleep weighs triple, REM double, light single.
pub fn quality(total_minutes: f64, light: f64, deep: f64, rem: f64) -> Option<SleepQuality> {
    if total_minutes <= 0.0 {
        return None;
    }
    let score = (deep * 3.0 + rem * 2.0 + light) / total_minutes * 100.0;
    Some(if score > 80.0 {
        SleepQuality::Excellent
    } else if score > 60.0 {
        SleepQuality::Good
    } else if score > 40.0 {
        SleepQuality::Average
    } else {
        SleepQuality::Poor
    })
}
