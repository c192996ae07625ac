use thiserror::Error;

use super::resolve::BillingMode;

/// Failures a resolution can surface to the caller.
///
/// Ledger-balance problems are intentionally absent: a missing or broken ledger
/// degrades to the allocation path inside the snapshot pipeline and is only
/// logged, never raised.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{what} request returned http {status}")]
    Provider { what: &'static str, status: u16 },

    #[error("provider response has no subscription document")]
    MissingSubscription,

    #[error("no resolvable price for {mode} subscription")]
    UnresolvablePrice { mode: BillingMode },

    #[error("provider response has no usage series")]
    MissingUsageSeries,

    #[error("unparseable timestamp: {0:?}")]
    Timestamp(String),

    #[error("a refresh is already in flight")]
    RefreshInFlight,
}
