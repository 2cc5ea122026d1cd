//! Read-only views over a provider `dataset:aggregate` response.
//!
//! The provider nests readings as `bucket[] -> dataset[] -> point[] -> value[]`.
//! Every accessor here degrades to a zero value or an empty iterator instead of
//! failing, so a partially malformed payload still yields whatever is usable.

use serde_json::Value;

#[derive(Debug, Clone, Copy)]
pub struct RawResponse<'a>(&'a Value);

#[derive(Debug, Clone, Copy)]
pub struct RawBucket<'a>(&'a Value);

#[derive(Debug, Clone, Copy)]
pub struct RawDataset<'a>(&'a Value);

#[derive(Debug, Clone, Copy)]
pub struct RawPoint<'a>(&'a Value);

#[derive(Debug, Clone, Copy)]
pub struct RawValue<'a>(&'a Value);

impl<'a> RawResponse<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self(value)
    }

    pub fn buckets(self) -> impl Iterator<Item = RawBucket<'a>> {
        items(self.0, "bucket").map(RawBucket)
    }
}

impl<'a> RawBucket<'a> {
    /// Bucket start in epoch milliseconds, `0` when absent or malformed.
    pub fn start_time_millis(self) -> i64 {
        int_field(self.0, "startTimeMillis")
    }

    pub fn datasets(self) -> impl Iterator<Item = RawDataset<'a>> {
        items(self.0, "dataset").map(RawDataset)
    }
}

impl<'a> RawDataset<'a> {
    pub fn data_source_id(self) -> &'a str {
        self.0
            .get("dataSourceId")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    pub fn points(self) -> impl Iterator<Item = RawPoint<'a>> {
        items(self.0, "point").map(RawPoint)
    }
}

impl<'a> RawPoint<'a> {
    pub fn start_time_nanos(self) -> i64 {
        int_field(self.0, "startTimeNanos")
    }

    pub fn end_time_nanos(self) -> i64 {
        int_field(self.0, "endTimeNanos")
    }

    pub fn values(self) -> impl Iterator<Item = RawValue<'a>> {
        items(self.0, "value").map(RawValue)
    }
}

impl RawValue<'_> {
    /// Only a JSON integer counts; `3.0` or `"3"` do not.
    pub fn int_val(self) -> Option<i64> {
        self.0.get("intVal").and_then(Value::as_i64)
    }

    pub fn fp_val(self) -> Option<f64> {
        self.0.get("fpVal").and_then(Value::as_f64)
    }
}

fn items<'a>(value: &'a Value, key: &str) -> std::slice::Iter<'a, Value> {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
        .iter()
}

// Timestamps arrive as decimal strings from the provider, but plain numbers
// are accepted too.
fn int_field(value: &Value, key: &str) -> i64 {
    match value.get(key) {
        Some(Value::Number(number)) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|float| float as i64))
            .unwrap_or(0),
        Some(Value::String(text)) => text.trim().parse().unwrap_or(0),
        _ => 0,
    }
}
