use serde::Serialize;
use serde_json::Value;

use super::error::EngineError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Allocation {
    pub amount: String,
    pub cadence: String,
    pub pricing_unit_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Price {
    pub id: String,
    pub name: String,
    pub unit_amount: String,
    pub currency: String,
    pub model_type: String,
}

/// One normalized pricing interval. The portal ships many overlapping and
/// historical intervals per subscription; selection happens in `resolve`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceInterval {
    pub id: String,
    pub start_date: String,
    pub end_date: String,
    pub billing_cycle_day: Option<i64>,
    pub allocation: Option<Allocation>,
    pub price: Price,
    pub current_period_start: Option<String>,
    pub current_period_end: Option<String>,
}

impl PriceInterval {
    /// Presence of both period markers is the only "currently active" signal
    /// the portal gives us. The marker values themselves are unreliable and
    /// are never checked against the wall clock.
    pub fn is_active(&self) -> bool {
        self.current_period_start.is_some() && self.current_period_end.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubscriptionDoc {
    pub id: String,
    pub email: String,
    pub start_date: String,
    pub end_date: String,
    pub intervals: Vec<PriceInterval>,
}

fn text(v: Option<&Value>) -> String {
    v.and_then(Value::as_str).unwrap_or_default().to_string()
}

fn opt_text(v: Option<&Value>) -> Option<String> {
    v.and_then(Value::as_str).map(str::to_string)
}

/// Lifts the loose portal payload into the typed document. The subscription
/// arrives wrapped in `{ data: [sub] }`; older responses used `{ subscription }`.
pub fn parse_subscription(payload: &Value) -> Result<SubscriptionDoc, EngineError> {
    let root = payload
        .pointer("/data/0")
        .or_else(|| payload.get("subscription"))
        .filter(|v| v.is_object())
        .ok_or(EngineError::MissingSubscription)?;

    let mut email = text(root.pointer("/customer/email"));
    if email.is_empty() {
        email = text(root.pointer("/customer/name"));
    }

    let mut start_date = text(root.get("start_date"));
    if start_date.is_empty() {
        start_date = text(root.get("created_at"));
    }

    let intervals = root
        .get("price_intervals")
        .and_then(Value::as_array)
        .map(|items| items.iter().map(parse_interval).collect())
        .unwrap_or_default();

    Ok(SubscriptionDoc {
        id: text(root.get("id")),
        email,
        start_date,
        end_date: text(root.get("end_date")),
        intervals,
    })
}

fn parse_interval(v: &Value) -> PriceInterval {
    let allocation = v
        .get("allocation")
        .filter(|a| a.is_object())
        .map(|a| Allocation {
            amount: text(a.get("amount")),
            cadence: text(a.get("cadence")),
            pricing_unit_name: text(a.pointer("/pricing_unit/display_name")),
        });

    let price = v.get("price").cloned().unwrap_or(Value::Null);

    PriceInterval {
        id: text(v.get("id")),
        start_date: text(v.get("start_date")),
        end_date: text(v.get("end_date")),
        billing_cycle_day: v.get("billing_cycle_day").and_then(Value::as_i64),
        allocation,
        price: Price {
            id: text(price.get("id")),
            name: text(price.get("name")),
            unit_amount: text(price.get("unit_amount")),
            currency: text(price.get("currency")),
            model_type: text(price.get("model_type")),
        },
        current_period_start: opt_text(v.get("current_billing_period_start_date")),
        current_period_end: opt_text(v.get("current_billing_period_end_date")),
    }
}
