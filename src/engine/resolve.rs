use std::fmt;

use serde::Serialize;

use super::error::EngineError;
use super::subscription::PriceInterval;
use super::timefmt::parse_instant;

/// Metering regime. Carried as a tagged union through resolver, reconciler and
/// assembler so exhaustiveness stays checkable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BillingMode {
    CreditPool,
    PerMessage,
}

impl BillingMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim() {
            "credit-pool" => Some(Self::CreditPool),
            "per-message" => Some(Self::PerMessage),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreditPool => "credit-pool",
            Self::PerMessage => "per-message",
        }
    }

    pub fn unit_label(&self) -> &'static str {
        match self {
            Self::CreditPool => "Credits",
            Self::PerMessage => "User Messages",
        }
    }
}

impl fmt::Display for BillingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the resolver settled on: the regime, the allowance declared by the
/// subscription itself, and the price id that keys usage attribution.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPlan {
    pub mode: BillingMode,
    pub unit: &'static str,
    /// Allocation amount from the selected interval, 0 when none resolved.
    pub allocation: f64,
    pub price_id: String,
    /// Raw period markers from the first active interval, if any.
    pub current_period: Option<(String, String)>,
}

/// Integer part of the portal's decimal amount strings ("600.00" -> 600.0).
fn amount_value(amount: &str) -> f64 {
    amount.trim().parse::<f64>().map(f64::trunc).unwrap_or(0.0)
}

fn latest_by_start<'a, F>(intervals: &'a [PriceInterval], pred: F) -> Option<&'a PriceInterval>
where
    F: Fn(&PriceInterval) -> bool,
{
    intervals
        .iter()
        .filter(|iv| pred(iv))
        .max_by_key(|iv| parse_instant(&iv.start_date))
}

fn is_credit_price(iv: &PriceInterval) -> bool {
    iv.price.name.contains("Credit") && !iv.price.name.contains("Included Allocation")
}

fn is_message_price(iv: &PriceInterval) -> bool {
    iv.price.name == "User Message" || iv.price.name == "Fractional Messages"
}

/// Classifies the billing mode and picks the interval/price that defines the
/// current allowance and usage key.
///
/// The portal has no explicit "this interval is canonical" flag; activity is
/// inferred from period-marker presence, and several naming conventions for
/// the same economic concept have to be reconciled in a fixed precedence.
/// Rules run in fixed precedence order: active allocation pass, active price
/// pass, then the latest-start-date fallbacks over the whole interval history.
pub fn resolve_plan(intervals: &[PriceInterval]) -> Result<ResolvedPlan, EngineError> {
    let active: Vec<&PriceInterval> = intervals.iter().filter(|iv| iv.is_active()).collect();

    let mut mode: Option<BillingMode> = None;
    let mut allocation: Option<f64> = None;
    let mut price_id: Option<String> = None;

    // Allocation pass over active intervals; the last matching one wins.
    for iv in &active {
        let Some(alloc) = &iv.allocation else { continue };
        let label = alloc.pricing_unit_name.to_lowercase();
        if label.contains("credits") {
            mode = Some(BillingMode::CreditPool);
            allocation = Some(amount_value(&alloc.amount));
        } else if label.contains("user messages") {
            mode = Some(BillingMode::PerMessage);
            allocation = Some(amount_value(&alloc.amount));
        }
    }

    // Price pass over active intervals. Rule order outranks interval order:
    // the literal "Augment Credits" price beats any other credit-named price,
    // and the message prices only apply when nothing else matched.
    if let Some(iv) = active.iter().find(|iv| iv.price.name == "Augment Credits") {
        mode = Some(BillingMode::CreditPool);
        price_id = Some(iv.price.id.clone());
    } else if let Some(iv) = active.iter().find(|iv| is_credit_price(iv)) {
        mode = Some(BillingMode::CreditPool);
        price_id = Some(iv.price.id.clone());
    } else if let Some(iv) = active.iter().find(|iv| is_message_price(iv)) {
        mode = Some(BillingMode::PerMessage);
        price_id = Some(iv.price.id.clone());
    }

    // No active allocation: fall back to the whole history, latest start wins.
    // "Included Allocation (Credits)" counts as a credit allocation here even
    // though the price pass above deliberately skips it.
    if allocation.is_none() {
        if let Some(iv) = latest_by_start(intervals, |iv| {
            iv.allocation.is_some() && iv.price.name.contains("Credits")
        }) {
            mode = Some(BillingMode::CreditPool);
            allocation = iv.allocation.as_ref().map(|a| amount_value(&a.amount));
        } else if let Some(iv) = latest_by_start(intervals, |iv| {
            iv.allocation.is_some() && iv.price.name == "Included Allocation (User Messages)"
        }) {
            mode = Some(BillingMode::PerMessage);
            allocation = iv.allocation.as_ref().map(|a| amount_value(&a.amount));
        }
    }

    // No active price id: same rule order, across all intervals, each rule
    // taking its latest-start-date match.
    if price_id.is_none() {
        if let Some(iv) = latest_by_start(intervals, |iv| iv.price.name == "Augment Credits") {
            mode = Some(BillingMode::CreditPool);
            price_id = Some(iv.price.id.clone());
        } else if let Some(iv) = latest_by_start(intervals, is_credit_price) {
            mode = Some(BillingMode::CreditPool);
            price_id = Some(iv.price.id.clone());
        } else if let Some(iv) = latest_by_start(intervals, is_message_price) {
            mode = Some(BillingMode::PerMessage);
            price_id = Some(iv.price.id.clone());
        }
    }

    let mode = mode.unwrap_or(BillingMode::PerMessage);
    let Some(price_id) = price_id.filter(|id| !id.is_empty()) else {
        return Err(EngineError::UnresolvablePrice { mode });
    };

    let current_period = active.first().and_then(|iv| {
        match (&iv.current_period_start, &iv.current_period_end) {
            (Some(s), Some(e)) => Some((s.clone(), e.clone())),
            _ => None,
        }
    });

    Ok(ResolvedPlan {
        mode,
        unit: mode.unit_label(),
        allocation: allocation.unwrap_or(0.0),
        price_id,
        current_period,
    })
}
