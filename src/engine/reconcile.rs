use super::config::EngineConfig;
use super::resolve::BillingMode;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reconciled {
    pub total: f64,
    pub remaining: f64,
    /// Set when a configured default stood in for a missing allowance. Callers
    /// may surface this as an informational condition; it is never an error.
    pub default_applied: bool,
}

/// Combines the resolved allocation with the optional ledger balance.
///
/// The ledger is ground truth when present: remaining comes straight from it
/// and the allocation is ignored. Without a ledger the allocation carries the
/// total, with a documented default substituted when the portal reports none.
/// `remaining = total - used` holds on every path.
pub fn reconcile(
    cfg: &EngineConfig,
    mode: BillingMode,
    allocation: f64,
    ledger: Option<f64>,
    used: f64,
) -> Reconciled {
    if mode == BillingMode::CreditPool {
        if let Some(balance) = ledger {
            let total = balance + used;
            if total > 0.0 {
                return Reconciled {
                    total,
                    remaining: balance,
                    default_applied: false,
                };
            }
            // A zero ledger total would break the non-zero-total contract.
            log::warn!(
                "ledger total is zero, using fallback total {}",
                cfg.ledger_fallback_total
            );
            let total = cfg.ledger_fallback_total;
            return Reconciled {
                total,
                remaining: total - used,
                default_applied: true,
            };
        }
    }

    let mut total = allocation;
    let mut default_applied = false;
    if total <= 0.0 {
        total = match mode {
            BillingMode::CreditPool => cfg.default_credit_pool_total,
            BillingMode::PerMessage => cfg.default_per_message_total,
        };
        default_applied = true;
        log::warn!(
            "no allocation resolved, using default {} allowance {}",
            mode.as_str(),
            total
        );
    }

    Reconciled {
        total,
        remaining: total - used,
        default_applied,
    }
}
