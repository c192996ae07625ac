use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use super::error::EngineError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyUsage {
    /// `MM-DD` tail of the provider-reported ISO date.
    pub day: String,
    pub amount: f64,
}

/// One provider-reported day: a date plus per-price usage values.
#[derive(Debug, Clone, PartialEq)]
pub struct UsageEntry {
    pub date: String,
    pub values: BTreeMap<String, f64>,
}

/// Tolerant numeric read; the portal mixes numbers and numeric strings.
pub(crate) fn as_f64(v: Option<&Value>) -> Option<f64> {
    let v = v?;
    v.as_f64()
        .or_else(|| v.as_i64().map(|n| n as f64))
        .or_else(|| v.as_u64().map(|n| n as f64))
        .or_else(|| v.as_str().and_then(|s| s.trim().parse::<f64>().ok()))
}

/// Parses the per-day usage series. A response without the series array is
/// fatal; individual days tolerate missing values.
pub fn parse_series(payload: &Value) -> Result<Vec<UsageEntry>, EngineError> {
    let items = payload
        .get("data")
        .or_else(|| payload.get("usage"))
        .and_then(Value::as_array)
        .ok_or(EngineError::MissingUsageSeries)?;

    let mut out = Vec::with_capacity(items.len());
    for item in items {
        let date = item
            .get("date")
            .or_else(|| item.get("timeframe_start"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let mut values = BTreeMap::new();
        if let Some(map) = item
            .get("usage")
            .or_else(|| item.get("values"))
            .and_then(Value::as_object)
        {
            for (k, v) in map {
                if let Some(n) = as_f64(Some(v)) {
                    values.insert(k.clone(), n);
                }
            }
        }
        out.push(UsageEntry { date, values });
    }
    Ok(out)
}

fn day_label(date: &str) -> String {
    let date = date.split('T').next().unwrap_or(date);
    match date.len().checked_sub(5).and_then(|i| date.get(i..)) {
        Some(tail) => tail.to_string(),
        None => date.to_string(),
    }
}

/// Folds the series into a chronological daily list keyed by the resolved
/// price id. Days without a value for that price still appear, zero-filled,
/// so the chart keeps full date coverage.
pub fn aggregate(series: &[UsageEntry], price_id: &str) -> (Vec<DailyUsage>, f64) {
    let mut days = Vec::with_capacity(series.len());
    let mut used = 0.0;
    for entry in series {
        let amount = entry.values.get(price_id).copied().unwrap_or(0.0);
        used += amount;
        days.push(DailyUsage {
            day: day_label(&entry.date),
            amount,
        });
    }
    (days, used)
}
