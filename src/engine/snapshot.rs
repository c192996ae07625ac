use serde::Serialize;
use serde_json::Value;

use super::api::PortalClient;
use super::config::EngineConfig;
use super::credential::extract_token;
use super::error::EngineError;
use super::reconcile::reconcile;
use super::resolve::{resolve_plan, BillingMode};
use super::subscription::{parse_subscription, PriceInterval};
use super::timefmt::to_display_time;
use super::usage::{aggregate, as_f64, parse_series, DailyUsage};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillingPeriod {
    pub start: String,
    pub end: String,
}

/// The resolved usage snapshot handed to display collaborators. Immutable
/// once produced; `remaining` is always derived as `total - used`, never
/// fetched independently.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageSnapshot {
    pub email: String,
    pub mode: BillingMode,
    pub unit: String,
    pub total: f64,
    pub used: f64,
    pub remaining: f64,
    pub started_at: String,
    pub expires_at: String,
    pub current_period: Option<BillingPeriod>,
    pub daily: Vec<DailyUsage>,
    pub intervals: Vec<PriceInterval>,
    pub default_allowance_applied: bool,
}

impl UsageSnapshot {
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Runs one full resolution: subscription fetch, mode/interval resolution,
/// best-effort ledger lookup, usage aggregation and reconciliation. Any fatal
/// failure propagates before a snapshot exists, so partial snapshots are never
/// observable. The engine keeps no state between calls; every resolution
/// fetches fresh documents.
pub async fn resolve_snapshot(
    client: &PortalClient,
    cfg: &EngineConfig,
    credential: &str,
) -> Result<UsageSnapshot, EngineError> {
    let token = extract_token(credential);

    let payload = client.subscription_from_link(token).await?;
    let doc = parse_subscription(&payload)?;
    let plan = resolve_plan(&doc.intervals)?;

    // The ledger is authoritative for credit pools but never required; any
    // failure on this path degrades to the allocation figures.
    let ledger = match plan.mode {
        BillingMode::CreditPool => fetch_ledger_balance(client, token).await,
        BillingMode::PerMessage => None,
    };

    let usage_payload = client.usage(&doc.id, &plan.price_id, token).await?;
    let series = parse_series(&usage_payload)?;
    let (daily, used) = aggregate(&series, &plan.price_id);

    let reconciled = reconcile(cfg, plan.mode, plan.allocation, ledger, used);

    let current_period = match &plan.current_period {
        Some((start, end)) => Some(BillingPeriod {
            start: to_display_time(start)?,
            end: to_display_time(end)?,
        }),
        None => None,
    };

    Ok(UsageSnapshot {
        email: doc.email,
        mode: plan.mode,
        unit: plan.unit.to_string(),
        total: reconciled.total,
        used,
        remaining: reconciled.remaining,
        started_at: to_display_time(&doc.start_date)?,
        expires_at: to_display_time(&doc.end_date)?,
        current_period,
        daily,
        intervals: doc.intervals,
        default_allowance_applied: reconciled.default_applied,
    })
}

async fn fetch_ledger_balance(client: &PortalClient, token: &str) -> Option<f64> {
    let customer = match client.customer_from_link(token).await {
        Ok(v) => v,
        Err(e) => {
            log::warn!("ledger lookup skipped, customer fetch failed: {e}");
            return None;
        }
    };
    let Some(customer_id) = customer.pointer("/customer/id").and_then(Value::as_str) else {
        log::warn!("ledger lookup skipped: customer id missing");
        return None;
    };
    let Some(pricing_unit_id) = customer
        .pointer("/customer/ledger_pricing_units/0/id")
        .and_then(Value::as_str)
    else {
        log::warn!("ledger lookup skipped: pricing unit missing");
        return None;
    };

    let summary = match client
        .ledger_summary(customer_id, pricing_unit_id, token)
        .await
    {
        Ok(v) => v,
        Err(e) => {
            log::warn!("ledger summary fetch failed: {e}");
            return None;
        }
    };

    let balance = as_f64(summary.get("credits_balance"));
    if balance.is_none() {
        log::warn!("ledger summary has no parseable credits balance");
    }
    balance
}
